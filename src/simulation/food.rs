//! Food items that agents seek out.
//!
//! Food spawns in bands away from the central disc where agents are born, so
//! an agent has to steer towards it to eat.

use ndarray::{Array1, array};
use ndarray_rand::rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::locatable::Locatable;
use super::params::Params;

/// A food item. Eating it triggers reproduction of the eater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Stable identifier within the owning environment.
    pub id: usize,
    /// Position in 2D space.
    pub pos: Array1<f32>,
}

impl Food {
    /// Creates a food item at a fixed position.
    pub fn at(id: usize, x: f32, y: f32) -> Self {
        Self {
            id,
            pos: array![x, y],
        }
    }

    /// Creates a food item outside the agent spawn region.
    ///
    /// Each coordinate is drawn independently from either the band below or
    /// the band above the exclusion zone around the arena center, both bands
    /// being equally likely.
    pub fn new_random<R: Rng + ?Sized>(id: usize, params: &Params, rng: &mut R) -> Self {
        let exclusion = params.spawn_radius() + params.agent_hitbox_radius + params.food_margin;
        let x = sample_outside(rng, (params.arena_width / 2) as f32, exclusion, params.arena_width as f32);
        let y = sample_outside(rng, (params.arena_height / 2) as f32, exclusion, params.arena_height as f32);
        Self::at(id, x, y)
    }

    /// Index of the first agent, in collection order, touching this food item.
    pub fn first_collision(&self, agents: &[Agent], params: &Params) -> Option<usize> {
        agents.iter().position(|agent| self.touches(agent, params))
    }
}

impl Locatable for Food {
    fn pos(&self) -> &Array1<f32> {
        &self.pos
    }

    fn pos_mut(&mut self) -> &mut Array1<f32> {
        &mut self.pos
    }

    fn hitbox_radius(&self, params: &Params) -> f32 {
        params.food_hitbox_radius
    }
}

/// Uniform draw from `[0, mid - exclusion)` or `[mid + exclusion, extent)`.
fn sample_outside<R: Rng + ?Sized>(rng: &mut R, mid: f32, exclusion: f32, extent: f32) -> f32 {
    let (low, high) = if rng.gen_bool(0.5) {
        (0.0, mid - exclusion)
    } else {
        (mid + exclusion, extent)
    };
    if high > low {
        rng.gen_range(low..high)
    } else {
        low.clamp(0.0, extent)
    }
}
