//! # Botevo - Neuroevolution of Food-Seeking Agents
//!
//! A population of agents that each see a single cue (is there food in my
//! field of vision?) and choose one of four actions with a tiny feedforward
//! network. Networks are never trained: agents that eat reproduce, possibly
//! with mutations, while the weakest agents are culled.
//!
//! ## Features
//!
//! - Feedforward networks with sigmoid/softmax layers and one-hot output
//! - Angular field-of-vision sensing
//! - Feeding-driven selection with mutation or cloning of the eater
//! - Starvation timer that culls the weakest agent
//! - Deterministic runs from a seeded random source
//! - Save/load simulation state as JSON
//!
//! ## Core Modules
//!
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::agent`] - Agent sensing, decisions and movement
//! - [`simulation::food`] - Food placement and collisions
//! - [`simulation::environment`] - Tick phases and the evolutionary controller
//! - [`simulation::events`] - Event system for ordered state updates

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agent behavior, state, and perception.
    pub mod agent;
    /// Neural network implementation for agent brains.
    pub mod brain;
    /// Environment simulation and evolutionary controller.
    pub mod environment;
    /// Error types.
    pub mod error;
    /// Bounded log of recent lifecycle events.
    pub mod event_log;
    /// Event system for ordered state updates.
    pub mod events;
    /// Food items that agents seek.
    pub mod food;
    /// Geometric utility functions for angles and distances.
    pub mod geometric_utils;
    /// Trait for entities with a position and a hitbox.
    ///
    /// The [`locatable::Locatable`] trait is implemented by [`agent::Agent`]
    /// and [`food::Food`].
    pub mod locatable;
    /// Simulation parameters.
    pub mod params;
    /// Reproduction statistics tracking.
    pub mod reproduction;
}

pub use simulation::environment::{Environment, advance};
pub use simulation::error::{ConfigurationError, DimensionError, SimulationError, StateError};
pub use simulation::params::Params;
