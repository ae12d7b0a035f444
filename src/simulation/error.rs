//! Error taxonomy for the simulation core.

use thiserror::Error;

/// Invalid construction parameters. Raised once, before any state exists.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Population must hold at least five agents.
    #[error("population size must be at least 5, got {0}")]
    PopulationTooSmall(usize),
    /// Mutation rate must lie strictly between 0 and 1.
    #[error("mutation rate must be in (0, 1), got {0}")]
    MutationRateOutOfRange(f32),
    /// Time multiplier must be at least 1.
    #[error("time multiplier must be at least 1, got {0}")]
    TimeMultiplierTooSmall(f32),
    /// Reference frame rate must be at least 1.
    #[error("frame rate must be at least 1, got {0}")]
    FrameRateTooSmall(u32),
    /// Arena sides must be at least 50 units.
    #[error("arena {side} must be at least 50, got {value}")]
    ArenaTooSmall {
        /// Which side was rejected ("width" or "height").
        side: &'static str,
        /// The rejected value.
        value: u32,
    },
    /// A network needs an input and an output layer.
    #[error("network needs at least 2 layers, got {0}")]
    TooFewLayers(usize),
    /// Every layer needs at least one neuron.
    #[error("layer {index} has no neurons")]
    EmptyLayer {
        /// Index of the offending layer.
        index: usize,
    },
    /// One activation per non-input layer.
    #[error("expected {expected} activation functions, got {actual}")]
    ActivationCountMismatch {
        /// Number of non-input layers.
        expected: usize,
        /// Number of activations supplied.
        actual: usize,
    },
    /// A tuning constant is not a positive finite number.
    #[error("parameter {name} must be positive, got {value}")]
    NonPositive {
        /// Field name.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A network needs exactly one connection between each pair of layers.
    #[error("expected {expected} connections, got {actual}")]
    ConnectionCountMismatch {
        /// Number of layers minus one.
        expected: usize,
        /// Number of connections present.
        actual: usize,
    },
    /// A weight matrix does not join the layers on either side of it.
    #[error("connection {index} has shape {actual:?}, expected {expected:?}")]
    ConnectionShape {
        /// Index of the offending connection.
        index: usize,
        /// Sending width (bias included) by receiving size.
        expected: (usize, usize),
        /// Shape of the stored matrix.
        actual: (usize, usize),
    },
    /// A network's input layer does not match the agent's senses.
    #[error("network takes {actual} inputs but the senses produce {expected}")]
    InputSizeMismatch {
        /// Values produced by the senses.
        expected: usize,
        /// Input neurons of the network.
        actual: usize,
    },
    /// A position is not a 2D point.
    #[error("position has {0} coordinates, expected 2")]
    PositionDimension(usize),
    /// An environment must hold at least one food item.
    #[error("environment has no food")]
    NoFood,
    /// The agent count differs from the configured population size.
    #[error("population size is {expected} but {actual} agents are present")]
    PopulationMismatch {
        /// Configured population size.
        expected: usize,
        /// Agents present.
        actual: usize,
    },
}

/// Input vector length does not match the input layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("input has {actual} values but the input layer expects {expected}")]
pub struct DimensionError {
    /// Neuron count of the input layer (bias excluded).
    pub expected: usize,
    /// Length of the offending input.
    pub actual: usize,
}

/// An operation referenced an agent or food item that is no longer live.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// No live agent carries this id.
    #[error("agent {0} is not part of the environment")]
    UnknownAgent(usize),
    /// No live food item carries this id.
    #[error("food item {0} is not part of the environment")]
    UnknownFood(usize),
}

/// Any failure surfaced by the crate.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// See [`ConfigurationError`].
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// See [`DimensionError`].
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    /// See [`StateError`].
    #[error(transparent)]
    State(#[from] StateError),
    /// Reading or writing a snapshot failed.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// A snapshot could not be encoded or decoded.
    #[error("snapshot encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
