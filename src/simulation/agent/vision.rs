//! Vision sense - tells an agent whether any food lies inside its view cone.

use ndarray::{Array1, array};

use super::super::food::Food;
use super::super::geometric_utils::{angle_is_between, find_angle};
use super::super::params::Params;
use super::Agent;
use super::sense::Sense;

/// Single-cue vision: 1.0 when the bearing to some food item falls within
/// the cone `heading ± field_of_vision`, 0.0 otherwise.
///
/// Only the direction matters; food is visible at any distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vision;

impl Vision {
    /// Creates a new vision sense.
    pub fn new() -> Self {
        Self
    }

    /// Whether any food item is inside the agent's view cone.
    pub fn sees_food(agent: &Agent, food: &[Food], params: &Params) -> bool {
        let (min, max) = agent.vision_cone(params);
        food.iter().any(|item| {
            let bearing = find_angle(agent.pos[0], agent.pos[1], item.pos[0], item.pos[1]);
            angle_is_between(bearing, min, max)
        })
    }
}

impl Sense for Vision {
    fn sense(&self, agent: &Agent, food: &[Food], params: &Params) -> Array1<f32> {
        if Self::sees_food(agent, food, params) {
            array![1.0]
        } else {
            array![0.0]
        }
    }

    fn input_size(&self) -> usize {
        1
    }
}
