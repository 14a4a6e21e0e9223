//! The bounded pool, ticket data model, diagnostics events, and errors.

pub mod error;
pub mod events;
pub mod pool;
pub mod ticket;

pub use error::{AppResult, PoolError};
pub use events::{build_pool_event, EventSink, InMemoryEventSink, PoolAction, PoolEvent};
pub use pool::BoundedPool;
pub use ticket::{Ticket, TicketSequence, TicketTemplate};
