//! Task handles and shared task plumbing.
//!
//! Vendors and customers run on dedicated OS threads. Each thread gets a
//! clone of a shared stop receiver; cancellation is signalled by dropping
//! the sender (or sending on it), which unblocks every sleeping task at
//! once. A task blocked inside the pool itself is unblocked by closing the
//! pool instead.

use std::fmt;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::core::PoolError;

/// Receiver side of the coordinator's stop channel.
pub type StopSignal = Receiver<()>;

/// Which side of the pool a task works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRole {
    /// Releases tickets into the pool.
    Vendor,
    /// Retrieves tickets from the pool.
    Customer,
}

impl fmt::Display for TaskRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vendor => write!(f, "vendor"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

/// Terminal state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// The task completed its full quantity.
    Finished,
    /// The task was cancelled before reaching its quantity.
    Cancelled,
}

/// What a task accomplished by the time it terminated.
#[derive(Debug, Clone)]
pub struct TaskReport {
    /// Vendor or customer.
    pub role: TaskRole,
    /// Index among tasks of the same role, starting at 0.
    pub index: usize,
    /// Pool operations completed before terminating.
    pub completed: u32,
    /// How the task terminated.
    pub state: TaskState,
}

/// A joinable handle to a running vendor or customer thread.
pub struct TaskHandle {
    pub(crate) role: TaskRole,
    pub(crate) index: usize,
    pub(crate) thread: JoinHandle<TaskReport>,
}

impl TaskHandle {
    /// Which side of the pool this task works.
    #[must_use]
    pub fn role(&self) -> TaskRole {
        self.role
    }

    /// Index among tasks of the same role.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the underlying thread has terminated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the task to terminate and return its report.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Internal`] if the task thread panicked.
    pub fn join(self) -> Result<TaskReport, PoolError> {
        self.thread
            .join()
            .map_err(|_| PoolError::Internal(format!("{}-{} panicked", self.role, self.index)))
    }
}

/// Sleep for one pacing interval, waking early on a stop signal.
///
/// Returns `true` if the task should keep running, `false` if cancellation
/// was requested during the interval. A zero interval still polls the stop
/// channel once so cancellation is observed between back-to-back operations.
pub(crate) fn pace(stop: &StopSignal, interval: Duration) -> bool {
    if interval.is_zero() {
        return matches!(stop.try_recv(), Err(TryRecvError::Empty));
    }
    matches!(stop.recv_timeout(interval), Err(RecvTimeoutError::Timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn pace_continues_until_sender_dropped() {
        let (stop_tx, stop_rx) = bounded::<()>(0);
        assert!(pace(&stop_rx, Duration::ZERO));
        assert!(pace(&stop_rx, Duration::from_millis(1)));
        drop(stop_tx);
        assert!(!pace(&stop_rx, Duration::ZERO));
        assert!(!pace(&stop_rx, Duration::from_millis(1)));
    }

    #[test]
    fn pace_waits_roughly_one_interval() {
        let (_stop_tx, stop_rx) = bounded::<()>(0);
        let started = std::time::Instant::now();
        assert!(pace(&stop_rx, Duration::from_millis(30)));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
