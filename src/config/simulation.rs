//! Simulation configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::TicketTemplate;

/// Upper bound on per-task quantities accepted by validation.
const MAX_QUANTITY: u32 = 10_000;
/// Upper bound on vendor/customer counts accepted by validation.
const MAX_TASK_COUNT: usize = 1_000;

/// Configuration for one simulation run.
///
/// This is an immutable value handed to the coordinator at construction;
/// nothing in the system mutates shared configuration at run time. Producer
/// and consumer quantities are independent knobs: `vendor_count` vendors
/// each release `tickets_per_vendor` tickets, and `customer_count` customers
/// each retrieve `tickets_per_customer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Maximum number of tickets the shared pool may hold.
    pub max_capacity: usize,
    /// Number of vendor tasks to launch.
    pub vendor_count: usize,
    /// Tickets each vendor releases before finishing.
    pub tickets_per_vendor: u32,
    /// Pacing delay between successive releases, in milliseconds.
    pub release_interval_ms: u64,
    /// Number of customer tasks to launch.
    pub customer_count: usize,
    /// Tickets each customer retrieves before finishing.
    pub tickets_per_customer: u32,
    /// Pacing delay between successive retrievals, in milliseconds.
    pub retrieval_interval_ms: u64,
    /// Shape of the tickets vendors release.
    #[serde(default)]
    pub ticket: TicketTemplate,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10,
            vendor_count: 1,
            tickets_per_vendor: 10,
            release_interval_ms: 0,
            customer_count: 1,
            tickets_per_customer: 10,
            retrieval_interval_ms: 0,
            ticket: TicketTemplate::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pool capacity.
    #[must_use]
    pub fn with_max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = capacity;
        self
    }

    /// Set the vendor count and per-vendor release quantity.
    #[must_use]
    pub fn with_vendors(mut self, count: usize, tickets_each: u32) -> Self {
        self.vendor_count = count;
        self.tickets_per_vendor = tickets_each;
        self
    }

    /// Set the customer count and per-customer retrieval quantity.
    #[must_use]
    pub fn with_customers(mut self, count: usize, tickets_each: u32) -> Self {
        self.customer_count = count;
        self.tickets_per_customer = tickets_each;
        self
    }

    /// Set the vendor pacing interval.
    #[must_use]
    pub fn with_release_interval(mut self, interval: Duration) -> Self {
        self.release_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the customer pacing interval.
    #[must_use]
    pub fn with_retrieval_interval(mut self, interval: Duration) -> Self {
        self.retrieval_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the ticket template vendors stamp from.
    #[must_use]
    pub fn with_ticket(mut self, ticket: TicketTemplate) -> Self {
        self.ticket = ticket;
        self
    }

    /// Vendor pacing interval as a [`Duration`].
    #[must_use]
    pub fn release_interval(&self) -> Duration {
        Duration::from_millis(self.release_interval_ms)
    }

    /// Customer pacing interval as a [`Duration`].
    #[must_use]
    pub fn retrieval_interval(&self) -> Duration {
        Duration::from_millis(self.retrieval_interval_ms)
    }

    /// Validate configuration values.
    ///
    /// A count of zero vendors or zero customers is legal (a run may
    /// exercise only one side of the pool); per-task quantities must be
    /// positive.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_capacity == 0 {
            return Err("max_capacity must be greater than 0".into());
        }
        if self.tickets_per_vendor == 0 || self.tickets_per_vendor > MAX_QUANTITY {
            return Err(format!(
                "tickets_per_vendor must be between 1 and {MAX_QUANTITY}"
            ));
        }
        if self.tickets_per_customer == 0 || self.tickets_per_customer > MAX_QUANTITY {
            return Err(format!(
                "tickets_per_customer must be between 1 and {MAX_QUANTITY}"
            ));
        }
        if self.vendor_count > MAX_TASK_COUNT {
            return Err(format!("vendor_count must be at most {MAX_TASK_COUNT}"));
        }
        if self.customer_count > MAX_TASK_COUNT {
            return Err(format!("customer_count must be at most {MAX_TASK_COUNT}"));
        }
        Ok(())
    }

    /// Parse a configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a message if the input fails to parse or validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: SimulationConfig =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
