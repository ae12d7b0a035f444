//! Event system for ordered simulation state updates.
//!
//! Entities never mutate the environment's collections directly. They report
//! what happened as events, which the environment applies serially in the
//! order they were raised.

use super::environment::Environment;

/// Events that modify the agent or food collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEvent {
    /// An agent touched a food item and will reproduce.
    FoodEaten {
        /// ID of the agent that ate.
        agent_id: usize,
        /// ID of the eaten food item.
        food_id: usize,
    },
    /// An agent left the arena and is replaced by a fresh one.
    OutOfBounds {
        /// ID of the agent that left.
        agent_id: usize,
    },
    /// Nobody died for too long; the weakest agent is replaced.
    Starved {
        /// ID of the weakest agent.
        agent_id: usize,
    },
}

/// Queue for collecting simulation events before they are applied.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Drains all events from the queue, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.drain(..)
    }
}

impl Extend<SimulationEvent> for EventQueue {
    fn extend<T: IntoIterator<Item = SimulationEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

/// Applies all queued events to the environment in queue order.
///
/// An event whose agent or food item has already left the environment is
/// dropped; earlier events in the same queue may have removed it.
pub fn apply_events(state: &mut Environment, mut queue: EventQueue) {
    for event in queue.drain() {
        let result = match event {
            SimulationEvent::FoodEaten { agent_id, food_id } => state.feed(agent_id, food_id),
            SimulationEvent::OutOfBounds { agent_id } | SimulationEvent::Starved { agent_id } => state
                .eliminate(agent_id, true)
                .map(|()| state.record_death(event)),
        };
        if let Err(e) = result {
            log::debug!("dropping stale {:?}: {}", event, e);
        }
    }
}
