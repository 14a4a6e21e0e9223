//! Observational pool diagnostics.
//!
//! Every successful `put`/`take` emits a [`PoolEvent`] carrying the queued
//! count at that instant. Events are diagnostics only: correctness never
//! depends on them, but a sink that records every event lets a test assert
//! the capacity invariant held at each observable step.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::util::clock::now_ms;

/// The pool operation an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolAction {
    /// A ticket was added to the pool.
    Released,
    /// A ticket was removed from the pool.
    Retrieved,
}

/// A single observed pool state change.
#[derive(Debug, Clone)]
pub struct PoolEvent {
    /// Operation that produced the event.
    pub action: PoolAction,
    /// Number of queued tickets immediately after the operation.
    pub queued: usize,
    /// Timestamp in milliseconds since epoch.
    pub at_ms: u128,
}

/// Event sink abstraction.
pub trait EventSink: Send {
    /// Record a pool event.
    fn record(&mut self, event: PoolEvent);
}

/// In-memory event sink for testing and dev.
///
/// Holds a bounded ring buffer behind a shared handle: clone the sink before
/// attaching it to a pool and the clone can snapshot recorded events later.
#[derive(Clone)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<VecDeque<PoolEvent>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: PoolEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build a pool event from context.
pub fn build_pool_event(action: PoolAction, queued: usize) -> PoolEvent {
    PoolEvent {
        action,
        queued,
        at_ms: now_ms(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_is_bounded() {
        let sink = InMemoryEventSink::new(3);
        let mut writer = sink.clone();
        for queued in 0..5 {
            writer.record(build_pool_event(PoolAction::Released, queued));
        }
        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].queued, 2);
        assert_eq!(events[2].queued, 4);
    }

    #[test]
    fn clones_share_one_buffer() {
        let sink = InMemoryEventSink::new(16);
        let mut writer = sink.clone();
        writer.record(build_pool_event(PoolAction::Retrieved, 1));
        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.events()[0].action, PoolAction::Retrieved);
    }
}
