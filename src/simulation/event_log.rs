//! Event logging system for displaying recent lifecycle events.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A logged event for display by a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Simulation time (reference seconds) when the event occurred
    pub time: f32,
    /// Human-readable description of the event
    pub description: String,
    /// Category of the event
    pub kind: EventKind,
}

/// Categories of logged events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// An agent ate and reproduced
    Feed,
    /// The weakest agent was culled by the death timer
    Starvation,
    /// An agent wandered out of the arena
    OutOfBounds,
}

/// Event log that tracks recent simulation events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    /// Recent events, newest first
    events: VecDeque<LoggedEvent>,
    /// Maximum number of events to keep
    max_events: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(20)
    }
}

impl EventLog {
    /// Creates a new event log with specified capacity
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Adds a new event to the log
    pub fn log(&mut self, time: f32, description: String, kind: EventKind) {
        self.events.push_front(LoggedEvent {
            time,
            description,
            kind,
        });

        while self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// Returns all events, newest first
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.events
    }

    /// Clears all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_newest_events() {
        let mut log = EventLog::new(2);
        log.log(1.0, "first".to_string(), EventKind::Feed);
        log.log(2.0, "second".to_string(), EventKind::Starvation);
        log.log(3.0, "third".to_string(), EventKind::OutOfBounds);
        let times: Vec<f32> = log.events().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![3.0, 2.0]);
        log.clear();
        assert!(log.events().is_empty());
    }
}
