//! Bounded blocking pool implementation.
//!
//! A [`BoundedPool`] is a capacity-limited FIFO buffer shared by any number
//! of concurrently running producer and consumer threads. The entire
//! synchronization discipline lives here: one mutex guards the queue and its
//! count, and two condition variables (`not_full`, `not_empty`) park callers
//! that cannot make progress. Waiters always re-evaluate their guard
//! condition in a loop after waking, so spurious wakeups and multiple
//! waiters racing for a single freed slot are handled by construction.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::core::error::PoolError;
use crate::core::events::{build_pool_event, EventSink, PoolAction};

/// Queue state guarded by the pool mutex.
struct PoolState<T> {
    queue: VecDeque<T>,
    closed: bool,
}

/// A bounded, blocking, closeable FIFO pool.
///
/// The pool is shared by reference (typically `Arc<BoundedPool<T>>`) across
/// all producer and consumer tasks; it is never copied. Capacity is fixed at
/// construction and the queued count satisfies `0 <= len <= capacity` at
/// every observable instant.
///
/// # Blocking and cancellation
///
/// [`put`](Self::put) blocks while the pool is full, [`take`](Self::take)
/// while it is empty. Waiting is unbounded; [`close`](Self::close) is the
/// only way to unblock a stuck waiter. After close, `put` fails with
/// [`PoolError::Closed`] and `take` drains any remaining tickets before
/// failing the same way, so nothing already released is lost.
pub struct BoundedPool<T> {
    capacity: usize,
    state: Mutex<PoolState<T>>,
    /// Signaled by every successful `take` and by `close`.
    not_full: Condvar,
    /// Signaled by every successful `put` and by `close`.
    not_empty: Condvar,
    sink: Option<Arc<Mutex<Box<dyn EventSink>>>>,
}

impl<T> BoundedPool<T> {
    /// Create a pool that holds at most `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::InvalidCapacity);
        }
        Ok(Self {
            capacity,
            state: Mutex::new(PoolState {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            sink: None,
        })
    }

    /// Attach an event sink for observational diagnostics.
    ///
    /// Events are recorded after the pool lock has been released; they are
    /// never required for correctness.
    #[must_use]
    pub fn with_events(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = Some(Arc::new(Mutex::new(sink)));
        self
    }

    /// Insert `item` at the tail of the queue, blocking while the pool is full.
    ///
    /// On success the queued count grows by exactly one and one waiter
    /// blocked in [`take`](Self::take), if any, is woken.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] if the pool is closed before the item
    /// could be inserted; the item is dropped, never partially inserted.
    pub fn put(&self, item: T) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        // Guard re-checked after every wake: another producer may have
        // claimed the freed slot first.
        while !state.closed && state.queue.len() == self.capacity {
            self.not_full.wait(&mut state);
        }
        if state.closed {
            return Err(PoolError::Closed);
        }
        state.queue.push_back(item);
        let queued = state.queue.len();
        drop(state);

        self.not_empty.notify_one();
        tracing::debug!(queued, "ticket released into the pool");
        self.record(PoolAction::Released, queued);
        Ok(())
    }

    /// Remove and return the item at the head of the queue, blocking while
    /// the pool is empty.
    ///
    /// Items come out in the order they went in, across all producers
    /// combined. On success the queued count shrinks by exactly one and one
    /// waiter blocked in [`put`](Self::put), if any, is woken.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] once the pool is closed *and* drained.
    /// Tickets still queued at close time are handed out normally first.
    pub fn take(&self) -> Result<T, PoolError> {
        let mut state = self.state.lock();
        while !state.closed && state.queue.is_empty() {
            self.not_empty.wait(&mut state);
        }
        let Some(item) = state.queue.pop_front() else {
            // Closed and fully drained.
            return Err(PoolError::Closed);
        };
        let queued = state.queue.len();
        drop(state);

        self.not_full.notify_one();
        tracing::debug!(queued, "ticket retrieved from the pool");
        self.record(PoolAction::Retrieved, queued);
        Ok(item)
    }

    /// Insert without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Full`] if the pool is at capacity, or
    /// [`PoolError::Closed`] if it has been closed.
    pub fn try_put(&self, item: T) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(PoolError::Closed);
        }
        if state.queue.len() == self.capacity {
            return Err(PoolError::Full);
        }
        state.queue.push_back(item);
        let queued = state.queue.len();
        drop(state);

        self.not_empty.notify_one();
        self.record(PoolAction::Released, queued);
        Ok(())
    }

    /// Remove without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Empty`] if nothing is queued on an open pool, or
    /// [`PoolError::Closed`] if the pool is closed and drained.
    pub fn try_take(&self) -> Result<T, PoolError> {
        let mut state = self.state.lock();
        let Some(item) = state.queue.pop_front() else {
            return Err(if state.closed {
                PoolError::Closed
            } else {
                PoolError::Empty
            });
        };
        let queued = state.queue.len();
        drop(state);

        self.not_full.notify_one();
        self.record(PoolAction::Retrieved, queued);
        Ok(item)
    }

    /// Close the pool and wake every blocked waiter on both conditions.
    ///
    /// Closing is idempotent. It never corrupts the queue or the count:
    /// blocked producers give up cleanly and already-queued tickets remain
    /// retrievable.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);

        self.not_full.notify_all();
        self.not_empty.notify_all();
        tracing::info!("pool closed, waking all waiters");
    }

    /// Number of tickets currently queued.
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Whether the pool is currently empty.
    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Maximum number of tickets the pool can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record an observational event (pool lock must already be released).
    fn record(&self, action: PoolAction, queued: usize) {
        if let Some(sink) = &self.sink {
            sink.lock().record(build_pool_event(action, queued));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn rejects_zero_capacity() {
        assert!(matches!(
            BoundedPool::<u32>::new(0),
            Err(PoolError::InvalidCapacity)
        ));
    }

    #[test]
    fn fifo_order_without_contention() {
        let pool = BoundedPool::new(3).unwrap();
        pool.put(1).unwrap();
        pool.put(2).unwrap();
        pool.put(3).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.take().unwrap(), 1);
        assert_eq!(pool.take().unwrap(), 2);
        assert_eq!(pool.take().unwrap(), 3);
        assert!(pool.is_empty());
    }

    #[test]
    fn try_variants_report_full_and_empty() {
        let pool = BoundedPool::new(1).unwrap();
        assert!(matches!(pool.try_take(), Err(PoolError::Empty)));
        pool.try_put(7).unwrap();
        assert!(matches!(pool.try_put(8), Err(PoolError::Full)));
        assert_eq!(pool.try_take().unwrap(), 7);
    }

    #[test]
    fn put_unblocks_a_waiting_take() {
        let pool = Arc::new(BoundedPool::new(2).unwrap());
        let pool2 = Arc::clone(&pool);

        let consumer = thread::spawn(move || pool2.take().unwrap());

        thread::sleep(Duration::from_millis(20));
        pool.put(99u32).unwrap();
        assert_eq!(consumer.join().unwrap(), 99);
    }

    #[test]
    fn take_unblocks_a_waiting_put() {
        let pool = Arc::new(BoundedPool::new(1).unwrap());
        pool.put(1u32).unwrap();

        let pool2 = Arc::clone(&pool);
        let producer = thread::spawn(move || pool2.put(2).unwrap());

        thread::sleep(Duration::from_millis(20));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.take().unwrap(), 1);
        producer.join().unwrap();
        assert_eq!(pool.take().unwrap(), 2);
    }

    #[test]
    fn close_unblocks_a_stuck_producer() {
        let pool = Arc::new(BoundedPool::new(1).unwrap());
        pool.put(1u32).unwrap();

        let pool2 = Arc::clone(&pool);
        let producer = thread::spawn(move || pool2.put(2));

        thread::sleep(Duration::from_millis(20));
        pool.close();
        assert!(matches!(producer.join().unwrap(), Err(PoolError::Closed)));
        // The queued ticket survives the cancelled put intact.
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn take_drains_remaining_items_after_close() {
        let pool = BoundedPool::new(2).unwrap();
        pool.put(1u32).unwrap();
        pool.put(2).unwrap();
        pool.close();
        assert_eq!(pool.take().unwrap(), 1);
        assert_eq!(pool.take().unwrap(), 2);
        assert!(matches!(pool.take(), Err(PoolError::Closed)));
    }

    #[test]
    fn put_on_closed_pool_fails_immediately() {
        let pool = BoundedPool::new(4).unwrap();
        pool.close();
        assert!(matches!(pool.put(1u32), Err(PoolError::Closed)));
        assert!(pool.is_closed());
        assert!(pool.is_empty());
    }

    #[test]
    fn close_is_idempotent() {
        let pool = BoundedPool::<u32>::new(1).unwrap();
        pool.close();
        pool.close();
        assert!(pool.is_closed());
    }
}
