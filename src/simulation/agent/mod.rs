//! Agents: sense food, decide with their network, act on the decision.

mod sense;
mod vision;

use ndarray::{Array1, array};
use ndarray_rand::rand::Rng;
use serde::{Deserialize, Serialize};

pub use sense::Sense;
pub use vision::Vision;

use super::brain::{Activation, NeuralNetwork};
use super::error::{ConfigurationError, DimensionError};
use super::events::SimulationEvent;
use super::food::Food;
use super::geometric_utils::normalize_angle;
use super::locatable::Locatable;
use super::params::Params;

/// Layer sizes of every agent's network: one input, two hidden, four actions.
pub const LAYER_SIZES: [usize; 3] = [1, 2, 4];

/// Activations of the hidden and output layers.
pub const ACTIVATIONS: [Activation; 2] = [Activation::Sigmoid, Activation::Softmax];

/// Lowest value of a color channel, so agents stay visible on a dark arena.
pub const MIN_COLOR: u8 = 30;

/// How far past the arena edge an agent may wander, in hitbox radii.
const OUT_OF_BOUNDS_RADII: f32 = 6.0;

/// The four mutually exclusive actions an agent can take in a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Advance along the heading.
    MoveForward,
    /// Rotate counter-clockwise.
    TurnLeft,
    /// Rotate clockwise.
    TurnRight,
    /// Do nothing.
    Idle,
}

impl Action {
    /// Maps a one-hot network output onto an action.
    ///
    /// `[1,0,0,0]`, `[0,1,0,0]` and `[0,0,1,0]` select a movement; anything
    /// else is [`Action::Idle`].
    pub fn from_output(output: &Array1<f32>) -> Self {
        const MOVES: [(Action, [f32; 4]); 3] = [
            (Action::MoveForward, [1.0, 0.0, 0.0, 0.0]),
            (Action::TurnLeft, [0.0, 1.0, 0.0, 0.0]),
            (Action::TurnRight, [0.0, 0.0, 1.0, 0.0]),
        ];
        MOVES
            .iter()
            .find(|(_, pattern)| output.iter().eq(pattern.iter()))
            .map(|(action, _)| *action)
            .unwrap_or(Action::Idle)
    }
}

/// A simulated agent with a neural network brain.
///
/// The score is the agent's energy: it decays every tick, is reset to 1 when
/// the agent eats, and the lowest score marks the agent culled first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable identifier within the owning environment.
    pub id: usize,
    /// Network that controls behavior. Owned, never shared.
    pub brain: NeuralNetwork,
    /// Position in 2D space.
    pub pos: Array1<f32>,
    /// Heading in radians, in `[0, 2π)`.
    pub rot: f32,
    /// RGB identity, inherited by offspring.
    pub color: [u8; 3],
    /// Energy score in `[-1, 1]`.
    pub score: f32,
}

impl Agent {
    /// Creates an agent with a fresh random network and color.
    pub fn new_random<R: Rng + ?Sized>(id: usize, params: &Params, rng: &mut R) -> Self {
        let color = random_color(rng);
        let brain = random_brain(rng);
        Self::spawn(id, brain, color, params, rng)
    }

    /// Creates an agent with the given network and color, a random heading and a
    /// random position within the spawn disc around the arena center.
    pub fn spawn<R: Rng + ?Sized>(
        id: usize,
        brain: NeuralNetwork,
        color: [u8; 3],
        params: &Params,
        rng: &mut R,
    ) -> Self {
        let rot = rng.gen_range(0.0..1.0_f32) * std::f32::consts::TAU;
        let (cx, cy) = params.center();
        let radius = params.spawn_radius();
        let x = cx + radius * rng.gen_range(0.0..1.0_f32) * rot.cos();
        let y = cy + radius * rng.gen_range(0.0..1.0_f32) * rot.sin();
        Self {
            id,
            brain,
            pos: array![x, y],
            rot,
            color,
            score: 0.0,
        }
    }

    /// Edges of the vision cone as `(min, max)` headings in radians.
    pub fn vision_cone(&self, params: &Params) -> (f32, f32) {
        (
            self.rot - params.field_of_vision,
            self.rot + params.field_of_vision,
        )
    }

    /// Lowers the score for elapsed time, never below -1.
    pub fn decay_score(&mut self, dt: f32, params: &Params) {
        self.score = (self.score - params.score_decay_rate * params.scaled_time(dt)).max(-1.0);
    }

    /// Runs the sensory input through the network and picks an action.
    pub fn decide(&mut self, sensory_input: &Array1<f32>) -> Result<Action, DimensionError> {
        self.brain.feed_forward(sensory_input, true)?;
        Ok(Action::from_output(self.brain.output()))
    }

    /// Applies `action` for a step of `dt` frames.
    ///
    /// Returns [`SimulationEvent::OutOfBounds`] when a forward move leaves the
    /// arena by more than six hitbox radii.
    pub fn act(&mut self, action: Action, dt: f32, params: &Params) -> Option<SimulationEvent> {
        let step = params.scaled_time(dt);
        match action {
            Action::MoveForward => {
                let distance = params.agent_speed * step;
                self.pos[0] += distance * self.rot.cos();
                // screen coordinates: y grows downwards
                self.pos[1] -= distance * self.rot.sin();
                if self.is_out_of_bounds(params) {
                    return Some(SimulationEvent::OutOfBounds { agent_id: self.id });
                }
            }
            Action::TurnLeft => {
                self.rot = normalize_angle(self.rot + params.agent_turn_rate * step);
            }
            Action::TurnRight => {
                self.rot = normalize_angle(self.rot - params.agent_turn_rate * step);
            }
            Action::Idle => {}
        }
        None
    }

    /// One full update: decay, sense, decide, act.
    pub fn tick(&mut self, food: &[Food], dt: f32, params: &Params) -> Option<SimulationEvent> {
        self.decay_score(dt, params);
        let sensory_input = Vision.sense(self, food, params);
        let action = self
            .decide(&sensory_input)
            .unwrap_or_else(|e| panic!("agent {} brain rejected its senses: {e}", self.id));
        self.act(action, dt, params)
    }

    /// Checks that the network fits the agent's senses and the position is a
    /// 2D point. Agents built by this module always pass.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.brain.validate()?;
        let expected = Vision.input_size();
        if self.brain.input_size() != expected {
            return Err(ConfigurationError::InputSizeMismatch {
                expected,
                actual: self.brain.input_size(),
            });
        }
        if self.pos.len() != 2 {
            return Err(ConfigurationError::PositionDimension(self.pos.len()));
        }
        Ok(())
    }

    /// Whether the agent has wandered too far outside the arena.
    pub fn is_out_of_bounds(&self, params: &Params) -> bool {
        let margin = params.agent_hitbox_radius * OUT_OF_BOUNDS_RADII;
        let (x, y) = (self.pos[0], self.pos[1]);
        x < -margin
            || x > params.arena_width as f32 + margin
            || y < -margin
            || y > params.arena_height as f32 + margin
    }
}

impl Locatable for Agent {
    fn pos(&self) -> &Array1<f32> {
        &self.pos
    }

    fn pos_mut(&mut self) -> &mut Array1<f32> {
        &mut self.pos
    }

    fn hitbox_radius(&self, params: &Params) -> f32 {
        params.agent_hitbox_radius
    }
}

/// Random RGB color with every channel at least [`MIN_COLOR`].
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> [u8; 3] {
    [
        rng.gen_range(MIN_COLOR..=u8::MAX),
        rng.gen_range(MIN_COLOR..=u8::MAX),
        rng.gen_range(MIN_COLOR..=u8::MAX),
    ]
}

/// Fresh standard-normal network with the agent topology.
pub fn random_brain<R: Rng + ?Sized>(rng: &mut R) -> NeuralNetwork {
    NeuralNetwork::new(&LAYER_SIZES, &ACTIVATIONS, false, rng)
        .unwrap_or_else(|e| panic!("agent topology is invalid: {e}"))
}
