//! Abstract sense trait for agent perception.
//!
//! A sense turns the state of the environment into inputs for the agent's
//! network.

use ndarray::Array1;

use super::super::food::Food;
use super::super::params::Params;
use super::Agent;

/// Trait for sensory modalities an agent can perceive its environment with.
pub trait Sense: Sync {
    /// Process sensory information and return neural network inputs.
    ///
    /// # Arguments
    ///
    /// * `agent` - The agent doing the sensing
    /// * `food` - Live food items
    /// * `params` - Simulation parameters
    fn sense(&self, agent: &Agent, food: &[Food], params: &Params) -> Array1<f32>;

    /// Returns the number of neural network inputs this sense produces.
    fn input_size(&self) -> usize;
}
