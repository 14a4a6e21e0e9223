//! Vendor/customer tasks and the coordinator that supervises them.

pub mod coordinator;
pub mod customer;
pub mod task;
pub mod vendor;

pub use coordinator::{Coordinator, SimulationSummary};
pub use customer::{spawn_customer, CustomerParams};
pub use task::{StopSignal, TaskHandle, TaskReport, TaskRole, TaskState};
pub use vendor::{spawn_vendor, VendorParams};
