//! Feedforward neural network used as an agent's brain.
//!
//! The network is never trained: it only evaluates inputs, and all adaptation
//! happens by mutating the weights of offspring (see [`NeuralNetwork::mutate`]).

use ndarray::Array1;
use ndarray_rand::rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{ConfigurationError, DimensionError};

pub mod layer;

pub use layer::{Activation, Connection, Layer};

/// Feedforward network made of ordered layers and the weight matrices joining them.
///
/// `connections[i]` joins `layers[i]` to `layers[i + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralNetwork {
    layers: Vec<Layer>,
    connections: Vec<Connection>,
}

impl NeuralNetwork {
    /// Creates a network with standard-normal random weights.
    ///
    /// `activations` holds one function per non-input layer. When `bias_neuron`
    /// is set, the input and hidden layers carry a trailing neuron fixed at 1;
    /// the output layer never does.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        bias_neuron: bool,
        rng: &mut R,
    ) -> Result<Self, ConfigurationError> {
        if layer_sizes.len() < 2 {
            return Err(ConfigurationError::TooFewLayers(layer_sizes.len()));
        }
        if let Some(index) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(ConfigurationError::EmptyLayer { index });
        }
        if activations.len() != layer_sizes.len() - 1 {
            return Err(ConfigurationError::ActivationCountMismatch {
                expected: layer_sizes.len() - 1,
                actual: activations.len(),
            });
        }

        let last = layer_sizes.len() - 1;
        let layers: Vec<Layer> = layer_sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let activation = if i == 0 { None } else { Some(activations[i - 1]) };
                Layer::new(size, activation, bias_neuron && i < last)
            })
            .collect();

        let connections = layers
            .windows(2)
            .map(|pair| Connection::new_random(&pair[0], &pair[1], rng))
            .collect();

        Ok(Self {
            layers,
            connections,
        })
    }

    /// Runs `input` through the network and stores the result in the output layer.
    ///
    /// The bias slot, if any, is appended automatically, so `input` holds only
    /// the real input neurons. With `one_hot` set the output is reduced to a
    /// single 1 at the first maximum.
    pub fn feed_forward(&mut self, input: &Array1<f32>, one_hot: bool) -> Result<(), DimensionError> {
        let expected = self.layers[0].size;
        if input.len() != expected {
            return Err(DimensionError {
                expected,
                actual: input.len(),
            });
        }
        self.layers[0].set_values(input.clone());

        for (i, connection) in self.connections.iter().enumerate() {
            let signal = self.layers[i].signal();
            let next = &mut self.layers[i + 1];
            next.set_values(signal.dot(&connection.weights));
            next.activate();
        }

        if one_hot {
            if let Some(output) = self.layers.last_mut() {
                output.encode_one_hot();
            }
        }
        Ok(())
    }

    /// Activations of the output layer from the last evaluation.
    pub fn output(&self) -> &Array1<f32> {
        self.layers[self.layers.len() - 1].values()
    }

    /// Ordered layers, input first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Ordered weight matrices.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Mutable access to the weight matrices, for hand-wiring a network.
    pub fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    /// Number of input neurons, bias excluded.
    pub fn input_size(&self) -> usize {
        self.layers[0].size
    }

    /// Total number of weights across all connections.
    pub fn weight_count(&self) -> usize {
        self.connections.iter().map(|c| c.weights.len()).sum()
    }

    /// Runs one mutation sweep over every weight and returns how many changed.
    ///
    /// Each weight independently mutates with probability `rate`.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, rng: &mut R) -> usize {
        self.connections
            .iter_mut()
            .map(|connection| connection.mutate(rate, rng))
            .sum()
    }

    /// Repeats [`NeuralNetwork::mutate`] until at least one weight changed.
    /// Returns the number of sweeps run.
    ///
    /// There is no upper bound on the sweeps; at rate `r` over `n` weights
    /// a sweep changes nothing with probability `(1 - r)^n`.
    pub fn mutate_until_changed<R: Rng + ?Sized>(&mut self, rate: f32, rng: &mut R) -> u64 {
        let mut sweeps = 1;
        while self.mutate(rate, rng) == 0 {
            sweeps += 1;
        }
        sweeps
    }

    /// Checks that the layers and weight matrices fit together, as they do
    /// for any network built by [`NeuralNetwork::new`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.layers.len() < 2 {
            return Err(ConfigurationError::TooFewLayers(self.layers.len()));
        }
        if let Some(index) = self.layers.iter().position(|layer| layer.size == 0) {
            return Err(ConfigurationError::EmptyLayer { index });
        }
        if self.connections.len() != self.layers.len() - 1 {
            return Err(ConfigurationError::ConnectionCountMismatch {
                expected: self.layers.len() - 1,
                actual: self.connections.len(),
            });
        }
        for (index, (pair, connection)) in self.layers.windows(2).zip(&self.connections).enumerate() {
            let expected = (pair[0].width(), pair[1].size);
            let actual = connection.weights.dim();
            if actual != expected {
                return Err(ConfigurationError::ConnectionShape {
                    index,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Flattens all weights into a single vector, connection by connection.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        self.connections
            .iter()
            .flat_map(|c| c.weights.iter().copied())
            .collect()
    }
}

/// Replaces `values` with a one-hot vector marking its first maximum.
///
/// Later entries equal to the maximum are cleared.
pub fn one_hot(values: &mut Array1<f32>) {
    if values.is_empty() {
        return;
    }
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    values.fill(0.0);
    values[best] = 1.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_rejects_bad_layer_specs() {
        let mut rng = rng();
        assert_eq!(
            NeuralNetwork::new(&[3], &[], false, &mut rng),
            Err(ConfigurationError::TooFewLayers(1))
        );
        assert_eq!(
            NeuralNetwork::new(&[1, 0, 4], &[Activation::Sigmoid, Activation::Softmax], false, &mut rng),
            Err(ConfigurationError::EmptyLayer { index: 1 })
        );
        assert_eq!(
            NeuralNetwork::new(&[1, 2, 4], &[Activation::Sigmoid], false, &mut rng),
            Err(ConfigurationError::ActivationCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_weight_shapes() {
        let mut rng = rng();
        let net = NeuralNetwork::new(
            &[1, 2, 4],
            &[Activation::Sigmoid, Activation::Softmax],
            false,
            &mut rng,
        )
        .unwrap();
        assert_eq!(net.connections().len(), 2);
        assert_eq!(net.connections()[0].weights.dim(), (1, 2));
        assert_eq!(net.connections()[1].weights.dim(), (2, 4));
        assert_eq!(net.weight_count(), 10);

        let biased = NeuralNetwork::new(
            &[1, 2, 4],
            &[Activation::Sigmoid, Activation::Softmax],
            true,
            &mut rng,
        )
        .unwrap();
        assert_eq!(biased.connections()[0].weights.dim(), (2, 2));
        assert_eq!(biased.connections()[1].weights.dim(), (3, 4));
        assert!(!biased.layers()[2].bias);
    }

    #[test]
    fn test_dimension_error() {
        let mut rng = rng();
        let mut net = NeuralNetwork::new(&[2, 3], &[Activation::Sigmoid], true, &mut rng).unwrap();
        assert_eq!(
            net.feed_forward(&array![1.0], true),
            Err(DimensionError {
                expected: 2,
                actual: 1
            })
        );
        assert!(net.feed_forward(&array![1.0, 0.0], true).is_ok());
    }

    #[test]
    fn test_softmax_output_sums_to_one() {
        let mut rng = rng();
        let mut net = NeuralNetwork::new(
            &[1, 2, 4],
            &[Activation::Sigmoid, Activation::Softmax],
            false,
            &mut rng,
        )
        .unwrap();
        net.feed_forward(&array![1.0], false).unwrap();
        let sum: f32 = net.output().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(net.output().iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_feed_forward_matches_hand_computation() {
        let mut rng = rng();
        let mut net = NeuralNetwork::new(&[1, 2], &[Activation::Sigmoid], true, &mut rng).unwrap();
        // rows: input neuron, bias neuron
        net.connections_mut()[0].weights = Array2::from_shape_vec((2, 2), vec![2.0, -1.0, 0.5, 0.0]).unwrap();
        net.feed_forward(&array![1.0], false).unwrap();
        let expected_0 = 1.0 / (1.0 + (-2.5_f32).exp());
        let expected_1 = 1.0 / (1.0 + 1.0_f32.exp());
        assert!((net.output()[0] - expected_0).abs() < 1e-6);
        assert!((net.output()[1] - expected_1).abs() < 1e-6);
    }

    #[test]
    fn test_one_hot_picks_maximum() {
        let mut values = array![0.2, 0.9, 0.05, 0.05];
        one_hot(&mut values);
        assert_eq!(values, array![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_one_hot_tie_goes_to_first() {
        let mut values = array![0.5, 0.5, 0.0, 0.0];
        one_hot(&mut values);
        assert_eq!(values, array![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = rng();
        let net = NeuralNetwork::new(
            &[1, 2, 4],
            &[Activation::Sigmoid, Activation::Softmax],
            false,
            &mut rng,
        )
        .unwrap();
        let mut copy = net.clone();
        copy.connections_mut()[0].weights[[0, 0]] += 1.0;
        assert_ne!(copy.to_flat_vector(), net.to_flat_vector());
    }

    #[test]
    fn test_mutation_with_certain_rate_changes_weights() {
        let mut rng = rng();
        let mut net = NeuralNetwork::new(
            &[1, 2, 4],
            &[Activation::Sigmoid, Activation::Softmax],
            false,
            &mut rng,
        )
        .unwrap();
        let before = net.to_flat_vector();
        let changed = net.mutate(0.999_999, &mut rng);
        assert!(changed > 0);
        let differing = before
            .iter()
            .zip(net.to_flat_vector())
            .filter(|(a, b)| **a != *b)
            .count();
        assert_eq!(differing, changed);
    }

    #[test]
    fn test_low_rate_sweeps_until_changed() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut net = NeuralNetwork::new(
            &[1, 2, 4],
            &[Activation::Sigmoid, Activation::Softmax],
            false,
            &mut rng,
        )
        .unwrap();

        let mut total_sweeps = 0;
        for _ in 0..20 {
            let before = net.to_flat_vector();
            total_sweeps += net.mutate_until_changed(0.01, &mut rng);
            assert_ne!(net.to_flat_vector(), before);
        }
        // a sweep over 10 weights at 1% comes up empty about 90% of the time
        assert!(total_sweeps > 20);
    }

    #[test]
    fn test_validate_accepts_constructed_networks() {
        let mut rng = rng();
        for bias in [false, true] {
            let net = NeuralNetwork::new(
                &[1, 2, 4],
                &[Activation::Sigmoid, Activation::Softmax],
                bias,
                &mut rng,
            )
            .unwrap();
            assert_eq!(net.validate(), Ok(()));
        }
    }

    #[test]
    fn test_validate_rejects_misshapen_weights() {
        let mut rng = rng();
        let mut net = NeuralNetwork::new(
            &[1, 2, 4],
            &[Activation::Sigmoid, Activation::Softmax],
            false,
            &mut rng,
        )
        .unwrap();
        net.connections_mut()[1].weights = Array2::zeros((3, 4));
        assert_eq!(
            net.validate(),
            Err(ConfigurationError::ConnectionShape {
                index: 1,
                expected: (2, 4),
                actual: (3, 4),
            })
        );
    }
}
