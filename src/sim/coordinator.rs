//! Coordinator wiring one pool to a configured set of tasks.

use std::sync::Arc;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{error, info};

use crate::config::SimulationConfig;
use crate::core::{BoundedPool, PoolError, Ticket, TicketSequence};
use crate::sim::customer::{spawn_customer, CustomerParams};
use crate::sim::task::{TaskHandle, TaskReport, TaskRole, TaskState};
use crate::sim::vendor::{spawn_vendor, VendorParams};

/// Everything the run accomplished, assembled after all tasks terminated.
#[derive(Debug)]
pub struct SimulationSummary {
    /// One report per launched task, vendors first.
    pub reports: Vec<TaskReport>,
    /// Every ticket customers retrieved, in delivery order.
    pub retrieved: Vec<Ticket>,
}

impl SimulationSummary {
    /// Total tickets released by all vendors.
    #[must_use]
    pub fn released_total(&self) -> u32 {
        self.role_total(TaskRole::Vendor)
    }

    /// Total tickets retrieved by all customers.
    #[must_use]
    pub fn retrieved_total(&self) -> u32 {
        self.role_total(TaskRole::Customer)
    }

    /// Whether every task ran to its full quantity.
    #[must_use]
    pub fn all_finished(&self) -> bool {
        self.reports.iter().all(|r| r.state == TaskState::Finished)
    }

    fn role_total(&self, role: TaskRole) -> u32 {
        self.reports
            .iter()
            .filter(|r| r.role == role)
            .map(|r| r.completed)
            .sum()
    }
}

/// Supervises one simulation run: a shared [`BoundedPool`] plus the vendor
/// and customer threads bound to it.
///
/// The coordinator performs no business logic itself. It owns the stop
/// channel used for pacing cancellation and the delivery channel customers
/// forward retrieved tickets to.
pub struct Coordinator {
    pool: Arc<BoundedPool<Ticket>>,
    handles: Vec<TaskHandle>,
    stop_tx: Mutex<Option<Sender<()>>>,
    delivery_rx: Receiver<Ticket>,
}

impl Coordinator {
    /// Validate `config`, build the shared pool, and launch every task.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the configuration fails
    /// validation, or [`PoolError::Internal`] if a task thread cannot be
    /// spawned.
    pub fn start(config: SimulationConfig) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidConfig)?;
        let pool = Arc::new(BoundedPool::new(config.max_capacity)?);
        Self::start_with_pool(config, pool)
    }

    /// Launch every task against a caller-supplied pool.
    ///
    /// Useful when the caller wants to attach an event sink or share the
    /// pool with tasks of its own before the run begins.
    ///
    /// # Errors
    ///
    /// Same conditions as [`start`](Self::start).
    pub fn start_with_pool(
        config: SimulationConfig,
        pool: Arc<BoundedPool<Ticket>>,
    ) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidConfig)?;

        let (stop_tx, stop_rx) = bounded::<()>(0);
        let (delivery_tx, delivery_rx) = unbounded::<Ticket>();
        let sequence = Arc::new(TicketSequence::new());

        let launch = || -> Result<Vec<TaskHandle>, PoolError> {
            let mut spawned = Vec::with_capacity(config.vendor_count + config.customer_count);
            for index in 0..config.vendor_count {
                spawned.push(spawn_vendor(
                    Arc::clone(&pool),
                    VendorParams {
                        index,
                        quantity: config.tickets_per_vendor,
                        release_interval: config.release_interval(),
                        template: config.ticket.clone(),
                        sequence: Arc::clone(&sequence),
                    },
                    stop_rx.clone(),
                )?);
            }
            for index in 0..config.customer_count {
                spawned.push(spawn_customer(
                    Arc::clone(&pool),
                    CustomerParams {
                        index,
                        quantity: config.tickets_per_customer,
                        retrieval_interval: config.retrieval_interval(),
                        delivery: Some(delivery_tx.clone()),
                    },
                    stop_rx.clone(),
                )?);
            }
            Ok(spawned)
        };

        let handles = match launch() {
            Ok(spawned) => spawned,
            Err(e) => {
                // Unwind anything already running before reporting failure.
                drop(stop_tx);
                pool.close();
                return Err(e);
            }
        };

        info!(
            capacity = config.max_capacity,
            vendors = config.vendor_count,
            customers = config.customer_count,
            "simulation started"
        );

        Ok(Self {
            pool,
            handles,
            stop_tx: Mutex::new(Some(stop_tx)),
            delivery_rx,
        })
    }

    /// The shared pool all tasks are bound to.
    #[must_use]
    pub fn pool(&self) -> &Arc<BoundedPool<Ticket>> {
        &self.pool
    }

    /// Handles of the launched tasks.
    #[must_use]
    pub fn handles(&self) -> &[TaskHandle] {
        &self.handles
    }

    /// Request cooperative cancellation of every task.
    ///
    /// Dropping the stop sender wakes every task sleeping through a pacing
    /// interval; closing the pool wakes every task blocked in `put`/`take`.
    /// Idempotent. Tasks still transition to their terminal state on their
    /// own; use [`join_all`](Self::join_all) to wait for them.
    pub fn cancel(&self) {
        let stop_tx = self.stop_tx.lock().take();
        if stop_tx.is_some() {
            info!("cancellation requested, stopping all tasks");
        }
        drop(stop_tx);
        self.pool.close();
    }

    /// Wait for every task to terminate and assemble the run summary.
    ///
    /// A task thread that panicked is logged and omitted from the reports;
    /// panics indicate a defect, not an expected outcome.
    #[must_use]
    pub fn join_all(self) -> SimulationSummary {
        let mut reports = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            match handle.join() {
                Ok(report) => reports.push(report),
                Err(e) => error!(%e, "task thread panicked"),
            }
        }

        let retrieved: Vec<Ticket> = self.delivery_rx.try_iter().collect();
        info!(
            tasks = reports.len(),
            retrieved = retrieved.len(),
            queued = self.pool.len(),
            "simulation complete"
        );
        SimulationSummary { reports, retrieved }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_config() {
        let config = SimulationConfig::new().with_max_capacity(0);
        assert!(matches!(
            Coordinator::start(config),
            Err(PoolError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_task_counts_run_to_an_empty_summary() {
        let config = SimulationConfig::new()
            .with_vendors(0, 1)
            .with_customers(0, 1);
        let coordinator = Coordinator::start(config).unwrap();
        let summary = coordinator.join_all();
        assert!(summary.reports.is_empty());
        assert!(summary.retrieved.is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let config = SimulationConfig::new()
            .with_vendors(1, 1)
            .with_customers(1, 1);
        let coordinator = Coordinator::start(config).unwrap();
        coordinator.cancel();
        coordinator.cancel();
        let _ = coordinator.join_all();
    }
}
