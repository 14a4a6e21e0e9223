//! Customer (consumer) task.
//!
//! A customer repeatedly retrieves a ticket from the shared pool, pacing
//! itself between retrievals, until it has retrieved its configured quantity
//! or is cancelled. A customer's target is its own: it may finish, or keep
//! blocking in `take`, while vendors are still active.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::{debug, info};

use crate::core::{BoundedPool, PoolError, Ticket};
use crate::sim::task::{pace, StopSignal, TaskHandle, TaskReport, TaskRole, TaskState};

/// Parameters for one customer task.
#[derive(Debug, Clone)]
pub struct CustomerParams {
    /// Index among customers, starting at 0.
    pub index: usize,
    /// Number of tickets to retrieve before finishing.
    pub quantity: u32,
    /// Pacing delay between successive retrievals.
    pub retrieval_interval: Duration,
    /// Optional channel every retrieved ticket is forwarded to, for
    /// observation. Delivery failures are ignored; retrieval already
    /// happened and the ticket is simply dropped.
    pub delivery: Option<Sender<Ticket>>,
}

/// Spawn a customer on a dedicated named OS thread.
///
/// The returned handle is joinable; cancellation is cooperative via the
/// `stop` receiver (for a sleeping customer) and pool closure (for a
/// customer blocked in `take`).
///
/// # Errors
///
/// Returns [`PoolError::InvalidConfig`] for a zero quantity, or
/// [`PoolError::Internal`] if the OS refuses to spawn the thread.
pub fn spawn_customer(
    pool: Arc<BoundedPool<Ticket>>,
    params: CustomerParams,
    stop: StopSignal,
) -> Result<TaskHandle, PoolError> {
    if params.quantity == 0 {
        return Err(PoolError::InvalidConfig(
            "customer quantity must be greater than 0".into(),
        ));
    }

    let index = params.index;
    let thread = thread::Builder::new()
        .name(format!("customer-{index}"))
        .spawn(move || run(&pool, &params, &stop))
        .map_err(|e| PoolError::Internal(format!("failed to spawn customer thread: {e}")))?;

    Ok(TaskHandle {
        role: TaskRole::Customer,
        index,
        thread,
    })
}

fn run(pool: &BoundedPool<Ticket>, params: &CustomerParams, stop: &StopSignal) -> TaskReport {
    info!(
        customer = params.index,
        quantity = params.quantity,
        "customer started"
    );

    let mut retrieved = 0u32;
    while retrieved < params.quantity {
        let ticket = match pool.take() {
            Ok(ticket) => ticket,
            Err(err) => {
                debug!(customer = params.index, retrieved, %err, "customer cancelled in take");
                return report(params.index, retrieved, TaskState::Cancelled);
            }
        };
        retrieved += 1;
        debug!(customer = params.index, ticket = ticket.id, "ticket retrieved");

        if let Some(delivery) = &params.delivery {
            let _ = delivery.send(ticket);
        }

        if retrieved < params.quantity && !pace(stop, params.retrieval_interval) {
            debug!(customer = params.index, retrieved, "customer cancelled while pacing");
            return report(params.index, retrieved, TaskState::Cancelled);
        }
    }

    info!(customer = params.index, retrieved, "customer finished");
    report(params.index, retrieved, TaskState::Finished)
}

fn report(index: usize, completed: u32, state: TaskState) -> TaskReport {
    TaskReport {
        role: TaskRole::Customer,
        index,
        completed,
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketTemplate;
    use crossbeam_channel::{bounded, unbounded};

    fn params(quantity: u32, delivery: Option<Sender<Ticket>>) -> CustomerParams {
        CustomerParams {
            index: 0,
            quantity,
            retrieval_interval: Duration::ZERO,
            delivery,
        }
    }

    #[test]
    fn rejects_zero_quantity() {
        let pool = Arc::new(BoundedPool::new(1).unwrap());
        let (_stop_tx, stop_rx) = bounded::<()>(0);
        assert!(matches!(
            spawn_customer(pool, params(0, None), stop_rx),
            Err(PoolError::InvalidConfig(_))
        ));
    }

    #[test]
    fn retrieves_exact_quantity_in_fifo_order() {
        let pool = Arc::new(BoundedPool::new(5).unwrap());
        let template = TicketTemplate::default();
        for id in 1..=3 {
            pool.put(template.issue(id)).unwrap();
        }

        let (_stop_tx, stop_rx) = bounded::<()>(0);
        let (delivery_tx, delivery_rx) = unbounded();
        let handle =
            spawn_customer(Arc::clone(&pool), params(3, Some(delivery_tx)), stop_rx).unwrap();
        let report = handle.join().unwrap();

        assert_eq!(report.state, TaskState::Finished);
        assert_eq!(report.completed, 3);
        let ids: Vec<u64> = delivery_rx.try_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(pool.is_empty());
    }

    #[test]
    fn pool_closure_cancels_a_blocked_customer() {
        let pool = Arc::new(BoundedPool::new(2).unwrap());
        let (_stop_tx, stop_rx) = bounded::<()>(0);

        let handle = spawn_customer(Arc::clone(&pool), params(1, None), stop_rx).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        assert!(!handle.is_finished());

        pool.close();
        let report = handle.join().unwrap();
        assert_eq!(report.state, TaskState::Cancelled);
        assert_eq!(report.completed, 0);
    }
}
