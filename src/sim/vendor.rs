//! Vendor (producer) task.
//!
//! A vendor repeatedly stamps a ticket from its template and releases it
//! into the shared pool, pacing itself between releases, until it has
//! released its configured quantity or is cancelled.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::core::{BoundedPool, PoolError, Ticket, TicketSequence, TicketTemplate};
use crate::sim::task::{pace, StopSignal, TaskHandle, TaskReport, TaskRole, TaskState};

/// Parameters for one vendor task.
#[derive(Debug, Clone)]
pub struct VendorParams {
    /// Index among vendors, starting at 0.
    pub index: usize,
    /// Number of tickets to release before finishing.
    pub quantity: u32,
    /// Pacing delay between successive releases.
    pub release_interval: Duration,
    /// Shape of the tickets this vendor releases.
    pub template: TicketTemplate,
    /// Shared id source, so ids stay unique across all vendors.
    pub sequence: Arc<TicketSequence>,
}

/// Spawn a vendor on a dedicated named OS thread.
///
/// The returned handle is joinable; cancellation is cooperative via the
/// `stop` receiver (for a sleeping vendor) and pool closure (for a vendor
/// blocked in `put`).
///
/// # Errors
///
/// Returns [`PoolError::InvalidConfig`] for a zero quantity, or
/// [`PoolError::Internal`] if the OS refuses to spawn the thread.
pub fn spawn_vendor(
    pool: Arc<BoundedPool<Ticket>>,
    params: VendorParams,
    stop: StopSignal,
) -> Result<TaskHandle, PoolError> {
    if params.quantity == 0 {
        return Err(PoolError::InvalidConfig(
            "vendor quantity must be greater than 0".into(),
        ));
    }

    let index = params.index;
    let thread = thread::Builder::new()
        .name(format!("vendor-{index}"))
        .spawn(move || run(&pool, &params, &stop))
        .map_err(|e| PoolError::Internal(format!("failed to spawn vendor thread: {e}")))?;

    Ok(TaskHandle {
        role: TaskRole::Vendor,
        index,
        thread,
    })
}

fn run(pool: &BoundedPool<Ticket>, params: &VendorParams, stop: &StopSignal) -> TaskReport {
    info!(
        vendor = params.index,
        quantity = params.quantity,
        "vendor started"
    );

    let mut released = 0u32;
    while released < params.quantity {
        let ticket = params.template.issue(params.sequence.next_id());
        if let Err(err) = pool.put(ticket) {
            debug!(vendor = params.index, released, %err, "vendor cancelled in put");
            return report(params.index, released, TaskState::Cancelled);
        }
        released += 1;

        // No point pacing after the final release.
        if released < params.quantity && !pace(stop, params.release_interval) {
            debug!(vendor = params.index, released, "vendor cancelled while pacing");
            return report(params.index, released, TaskState::Cancelled);
        }
    }

    info!(vendor = params.index, released, "vendor finished");
    report(params.index, released, TaskState::Finished)
}

fn report(index: usize, completed: u32, state: TaskState) -> TaskReport {
    TaskReport {
        role: TaskRole::Vendor,
        index,
        completed,
        state,
    }
}
