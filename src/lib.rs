//! # Ticketflow
//!
//! A bounded, blocking ticket pool and the vendor/customer simulation built on it.
//!
//! This library models a resource exchange between many producers ("vendors")
//! and many consumers ("customers") through one shared pool with a fixed
//! maximum capacity. The pool is the only point of contention and the only
//! part of the system with real concurrency hazards; everything else is
//! orchestration around it.
//!
//! ## Core Guarantees
//!
//! - **Capacity invariant**: the number of queued tickets never exceeds the
//!   configured capacity, and never goes negative, at any observable instant.
//! - **Blocking semantics**: `put` suspends the caller while the pool is
//!   full, `take` while it is empty; both re-check their guard condition
//!   after every wake, so spurious wakeups and racing waiters are harmless.
//! - **Global FIFO**: tickets are retrieved in the order they were released,
//!   across all vendors combined.
//! - **Cooperative cancellation**: `close()` wakes every blocked waiter;
//!   a blocked `put` returns [`core::PoolError::Closed`], a blocked `take`
//!   first drains whatever is still queued.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ticketflow::core::BoundedPool;
//!
//! let pool = Arc::new(BoundedPool::new(2).unwrap());
//!
//! let producer = {
//!     let pool = Arc::clone(&pool);
//!     std::thread::spawn(move || {
//!         for i in 0..3u64 {
//!             pool.put(i).unwrap();
//!         }
//!     })
//! };
//!
//! let mut seen = Vec::new();
//! for _ in 0..3 {
//!     seen.push(pool.take().unwrap());
//! }
//! producer.join().unwrap();
//! assert_eq!(seen, vec![0, 1, 2]);
//! assert!(pool.is_empty());
//! ```
//!
//! ## Running a Simulation
//!
//! ```
//! use ticketflow::config::SimulationConfig;
//! use ticketflow::sim::Coordinator;
//!
//! let config = SimulationConfig::new()
//!     .with_max_capacity(5)
//!     .with_vendors(2, 10)
//!     .with_customers(4, 5);
//!
//! let coordinator = Coordinator::start(config).unwrap();
//! let summary = coordinator.join_all();
//! assert_eq!(summary.retrieved.len(), 20);
//! ```
//!
//! For complete scenarios, see `tests/bounded_pool_test.rs` and
//! `tests/simulation_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

/// The bounded pool, ticket data model, diagnostics events, and errors.
pub mod core;
/// Configuration model for simulation runs.
pub mod config;
/// Vendor/customer tasks and the coordinator that supervises them.
pub mod sim;
/// Shared utilities.
pub mod util;
