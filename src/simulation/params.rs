use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConfigurationError, SimulationError};

/// Simulation parameters that control environment behavior.
///
/// Distances are in arena units (pixels), speeds per reference second and
/// angles in radians. One reference second is `fps` units of `dt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Target number of agents.
    pub population_size: usize,
    /// Probability of mutating an offspring, and of mutating each of its weights.
    pub mutation_rate: f32,
    /// Simulation speed-up applied to every time step.
    pub time_multiplier: f32,
    /// Reference frame rate that `dt` is measured against.
    pub fps: u32,
    /// Arena width.
    pub arena_width: u32,
    /// Arena height.
    pub arena_height: u32,
    /// Seed for the random source; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Agent collision radius.
    pub agent_hitbox_radius: f32,
    /// Agent forward speed per reference second.
    pub agent_speed: f32,
    /// Agent turn rate in radians per reference second.
    pub agent_turn_rate: f32,
    /// Half-angle of the vision cone, centered on the heading.
    pub field_of_vision: f32,
    /// Food collision radius.
    pub food_hitbox_radius: f32,
    /// Extra gap between the agent spawn disc and the food bands.
    pub food_margin: f32,
    /// Score lost per reference second.
    pub score_decay_rate: f32,
    /// Time units without any death before the weakest agent is culled.
    pub death_interval: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            population_size: 30,
            mutation_rate: 0.05,
            time_multiplier: 1.0,
            fps: 60,
            arena_width: 800,
            arena_height: 600,
            seed: None,
            agent_hitbox_radius: 6.0,
            agent_speed: 350.0,
            agent_turn_rate: std::f32::consts::TAU,
            field_of_vision: 22.5_f32.to_radians(),
            food_hitbox_radius: 5.0,
            food_margin: 5.0,
            score_decay_rate: 0.1,
            death_interval: 5.0,
        }
    }
}

impl Params {
    /// Default parameters with the given population size and mutation rate.
    pub fn with_population(population_size: usize, mutation_rate: f32) -> Self {
        Self {
            population_size,
            mutation_rate,
            ..Self::default()
        }
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.population_size < 5 {
            return Err(ConfigurationError::PopulationTooSmall(self.population_size));
        }
        if !(self.mutation_rate > 0.0 && self.mutation_rate < 1.0) {
            return Err(ConfigurationError::MutationRateOutOfRange(self.mutation_rate));
        }
        if !(self.time_multiplier >= 1.0) {
            return Err(ConfigurationError::TimeMultiplierTooSmall(self.time_multiplier));
        }
        if self.fps < 1 {
            return Err(ConfigurationError::FrameRateTooSmall(self.fps));
        }
        if self.arena_width < 50 {
            return Err(ConfigurationError::ArenaTooSmall {
                side: "width",
                value: self.arena_width,
            });
        }
        if self.arena_height < 50 {
            return Err(ConfigurationError::ArenaTooSmall {
                side: "height",
                value: self.arena_height,
            });
        }
        for (name, value) in [
            ("agent_hitbox_radius", self.agent_hitbox_radius),
            ("agent_speed", self.agent_speed),
            ("agent_turn_rate", self.agent_turn_rate),
            ("field_of_vision", self.field_of_vision),
            ("food_hitbox_radius", self.food_hitbox_radius),
            ("score_decay_rate", self.score_decay_rate),
            ("death_interval", self.death_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }
        if !(self.food_margin.is_finite() && self.food_margin >= 0.0) {
            return Err(ConfigurationError::NonPositive {
                name: "food_margin",
                value: self.food_margin,
            });
        }
        Ok(())
    }

    /// Loads parameters from a JSON file; missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path)?;
        let params: Params = serde_json::from_str(&contents)?;
        params.validate()?;
        Ok(params)
    }

    /// Radius of the disc around the arena center where agents spawn.
    pub fn spawn_radius(&self) -> f32 {
        (self.arena_width.min(self.arena_height) / 20) as f32
    }

    /// Arena center.
    pub fn center(&self) -> (f32, f32) {
        (self.arena_width as f32 / 2.0, self.arena_height as f32 / 2.0)
    }

    /// Converts a frame-based `dt` into reference seconds, multiplier included.
    pub fn scaled_time(&self, dt: f32) -> f32 {
        dt / self.fps as f32 * self.time_multiplier
    }
}
