//! End-to-end simulation runs through the coordinator.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ticketflow::config::SimulationConfig;
use ticketflow::core::{BoundedPool, InMemoryEventSink, PoolError};
use ticketflow::sim::{Coordinator, TaskRole, TaskState};

#[test]
fn balanced_run_finishes_with_matching_totals() {
    ticketflow::util::init_tracing();
    let config = SimulationConfig::new()
        .with_max_capacity(5)
        .with_vendors(2, 10)
        .with_customers(4, 5);

    let coordinator = Coordinator::start(config).unwrap();
    let summary = coordinator.join_all();

    assert!(summary.all_finished());
    assert_eq!(summary.released_total(), 20);
    assert_eq!(summary.retrieved_total(), 20);
    assert_eq!(summary.retrieved.len(), 20);

    // Every released ticket was retrieved exactly once.
    let ids: HashSet<u64> = summary.retrieved.iter().map(|t| t.id).collect();
    assert_eq!(ids, (1..=20).collect::<HashSet<_>>());
}

#[test]
fn paced_run_still_reaches_completion() {
    let config = SimulationConfig::new()
        .with_max_capacity(2)
        .with_vendors(3, 4)
        .with_customers(2, 6)
        .with_release_interval(Duration::from_millis(2))
        .with_retrieval_interval(Duration::from_millis(1));

    let coordinator = Coordinator::start(config).unwrap();
    let pool = Arc::clone(coordinator.pool());
    let summary = coordinator.join_all();

    assert!(summary.all_finished());
    assert_eq!(summary.released_total(), 12);
    assert_eq!(summary.retrieved_total(), 12);
    assert!(pool.is_empty());
}

#[test]
fn capacity_invariant_holds_for_a_whole_run() {
    let sink = InMemoryEventSink::new(4096);
    let pool = Arc::new(
        BoundedPool::new(3)
            .unwrap()
            .with_events(Box::new(sink.clone())),
    );
    let config = SimulationConfig::new()
        .with_max_capacity(3)
        .with_vendors(4, 25)
        .with_customers(4, 25);

    let coordinator = Coordinator::start_with_pool(config, pool).unwrap();
    let summary = coordinator.join_all();
    assert!(summary.all_finished());

    let events = sink.events();
    assert_eq!(events.len(), 200);
    for event in events {
        assert!(event.queued <= 3, "capacity exceeded: {}", event.queued);
    }
}

#[test]
fn cancellation_mid_run_terminates_every_task() {
    let config = SimulationConfig::new()
        .with_max_capacity(4)
        .with_vendors(2, 1000)
        .with_customers(2, 1000)
        .with_release_interval(Duration::from_millis(5))
        .with_retrieval_interval(Duration::from_millis(5));

    let coordinator = Coordinator::start(config).unwrap();
    thread::sleep(Duration::from_millis(40));
    coordinator.cancel();
    let summary = coordinator.join_all();

    assert_eq!(summary.reports.len(), 4);
    for report in &summary.reports {
        assert_eq!(report.state, TaskState::Cancelled);
        assert!(report.completed < 1000);
    }
    // Cancellation never fabricates tickets: customers cannot have retrieved
    // more than vendors released.
    assert!(summary.retrieved_total() <= summary.released_total());
}

#[test]
fn surplus_vendor_parks_until_cancelled() {
    // One vendor wants 10 but customers only ever take 2 and the pool holds
    // 3, so the vendor must park after its 5th successful release.
    let config = SimulationConfig::new()
        .with_max_capacity(3)
        .with_vendors(1, 10)
        .with_customers(1, 2);

    let coordinator = Coordinator::start(config).unwrap();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(coordinator.pool().len(), 3);

    coordinator.cancel();
    let summary = coordinator.join_all();

    let vendor = summary
        .reports
        .iter()
        .find(|r| r.role == TaskRole::Vendor)
        .unwrap();
    assert_eq!(vendor.state, TaskState::Cancelled);
    assert_eq!(vendor.completed, 5);

    let customer = summary
        .reports
        .iter()
        .find(|r| r.role == TaskRole::Customer)
        .unwrap();
    assert_eq!(customer.state, TaskState::Finished);
    assert_eq!(customer.completed, 2);
}

#[test]
fn invalid_quantity_is_rejected_at_launch() {
    let config = SimulationConfig::new().with_vendors(1, 0);
    assert!(matches!(
        Coordinator::start(config),
        Err(PoolError::InvalidConfig(_))
    ));
}
