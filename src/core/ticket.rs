//! Ticket data model.
//!
//! A [`Ticket`] is the unit of inventory exchanged between vendors and
//! customers. It is a plain value record: immutable once constructed, owned
//! by whichever task currently holds it, and dropped when the retrieving
//! customer is done with it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// An event ticket flowing through the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier within a simulation run.
    pub id: u64,
    /// Name of the event.
    pub event_name: String,
    /// Location of the event.
    pub location: String,
    /// Ticket price in whole currency units.
    pub price: u32,
    /// Date of the event.
    pub date: String,
    /// Free-form event description.
    pub description: String,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket #{} [{} @ {}, {}, price {}]",
            self.id, self.event_name, self.location, self.date, self.price
        )
    }
}

/// The fixed shape a vendor stamps onto every ticket it releases.
///
/// Only the id varies between tickets from the same template; ids are drawn
/// from a [`TicketSequence`] shared by all vendors in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketTemplate {
    /// Name of the event.
    pub event_name: String,
    /// Location of the event.
    pub location: String,
    /// Ticket price in whole currency units.
    pub price: u32,
    /// Date of the event.
    pub date: String,
    /// Free-form event description.
    pub description: String,
}

impl Default for TicketTemplate {
    fn default() -> Self {
        Self {
            event_name: "Show".into(),
            location: "Colombo".into(),
            price: 1000,
            date: "25th of December".into(),
            description: "Musical".into(),
        }
    }
}

impl TicketTemplate {
    /// Stamp a ticket with the given id.
    pub fn issue(&self, id: u64) -> Ticket {
        Ticket {
            id,
            event_name: self.event_name.clone(),
            location: self.location.clone(),
            price: self.price,
            date: self.date.clone(),
            description: self.description.clone(),
        }
    }
}

/// Monotonically increasing ticket id source, shared by all vendors.
#[derive(Debug)]
pub struct TicketSequence {
    next: AtomicU64,
}

impl Default for TicketSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketSequence {
    /// Create a sequence starting at id 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Reserve and return the next id.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
