//! Layers, activation functions and the weight matrices between layers.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Activation applied in place to a layer after its raw values are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Elementwise `1 / (1 + e^-x)`.
    Sigmoid,
    /// `e^x / Σe^x` over the whole layer.
    Softmax,
}

impl Activation {
    /// Applies the function to `values` in place.
    pub fn apply(self, values: &mut Array1<f32>) {
        match self {
            Activation::Sigmoid => values.mapv_inplace(|x| 1.0 / (1.0 + (-x).exp())),
            Activation::Softmax => {
                // shifting by the maximum keeps exp finite without changing the result
                let max = values.fold(f32::NEG_INFINITY, |acc, &x| acc.max(x));
                values.mapv_inplace(|x| (x - max).exp());
                let sum = values.sum();
                if sum > 0.0 {
                    *values /= sum;
                }
            }
        }
    }
}

/// One layer of neurons and its current activations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Neuron count, bias excluded.
    pub size: usize,
    /// Whether a trailing neuron fixed at 1 feeds the next layer.
    pub bias: bool,
    /// Activation function; `None` for the input layer.
    pub activation: Option<Activation>,
    values: Array1<f32>,
}

impl Layer {
    /// Creates a layer with all activations at zero.
    pub fn new(size: usize, activation: Option<Activation>, bias: bool) -> Self {
        Self {
            size,
            bias,
            activation,
            values: Array1::zeros(size),
        }
    }

    /// Current activations, bias excluded.
    pub fn values(&self) -> &Array1<f32> {
        &self.values
    }

    /// Number of values this layer sends forward, bias included.
    pub fn width(&self) -> usize {
        self.size + usize::from(self.bias)
    }

    pub(crate) fn set_values(&mut self, values: Array1<f32>) {
        self.values = values;
    }

    /// Activations as seen by the next connection, with the bias slot appended.
    pub(crate) fn signal(&self) -> Array1<f32> {
        if self.bias {
            let mut signal = Array1::ones(self.size + 1);
            signal
                .slice_mut(ndarray::s![..self.size])
                .assign(&self.values);
            signal
        } else {
            self.values.clone()
        }
    }

    pub(crate) fn activate(&mut self) {
        if let Some(activation) = self.activation {
            activation.apply(&mut self.values);
        }
    }

    pub(crate) fn encode_one_hot(&mut self) {
        super::one_hot(&mut self.values);
    }
}

/// Dense weights joining two consecutive layers.
///
/// Rows index the sending layer (bias slot last), columns the receiving layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Weight matrix (`from.width()` × `to.size`).
    pub weights: Array2<f32>,
}

impl Connection {
    /// Creates a connection with independent standard-normal weights.
    pub fn new_random<R: Rng + ?Sized>(from: &Layer, to: &Layer, rng: &mut R) -> Self {
        Self {
            weights: Array2::random_using((from.width(), to.size), StandardNormal, rng),
        }
    }

    /// Gives every weight an independent chance `rate` to become
    /// `w * N(1, 0.5) + N(0, 1)`. Returns how many weights changed value.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, rng: &mut R) -> usize {
        let mut changed = 0;
        for w in self.weights.iter_mut() {
            if rng.gen_range(0.0..1.0_f32) <= rate {
                let scale: f32 = StandardNormal.sample(rng);
                let shift: f32 = StandardNormal.sample(rng);
                let mutated = *w * (1.0 + 0.5 * scale) + shift;
                if mutated != *w {
                    changed += 1;
                }
                *w = mutated;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand::rngs::StdRng;

    #[test]
    fn test_sigmoid() {
        let mut values = array![0.0, 100.0, -100.0];
        Activation::Sigmoid.apply(&mut values);
        assert!((values[0] - 0.5).abs() < 1e-6);
        assert!((values[1] - 1.0).abs() < 1e-6);
        assert!(values[2].abs() < 1e-6);
    }

    #[test]
    fn test_softmax_is_shift_invariant() {
        let mut a = array![1.0, 2.0, 3.0];
        let mut b = array![101.0, 102.0, 103.0];
        Activation::Softmax.apply(&mut a);
        Activation::Softmax.apply(&mut b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
        let e = 1.0_f32.exp();
        let expected = 1.0 / (1.0 + e + e * e);
        assert!((a[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_signal_appends_bias() {
        let mut layer = Layer::new(2, None, true);
        layer.set_values(array![0.25, 0.75]);
        assert_eq!(layer.signal(), array![0.25, 0.75, 1.0]);
        assert_eq!(layer.width(), 3);
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let mut rng = StdRng::seed_from_u64(3);
        let from = Layer::new(3, None, false);
        let to = Layer::new(4, Some(Activation::Sigmoid), false);
        let mut connection = Connection::new_random(&from, &to, &mut rng);
        let before = connection.clone();
        assert_eq!(connection.mutate(0.0, &mut rng), 0);
        assert_eq!(connection, before);
    }
}
