//! # `neural` – Feed-forward network substrate
//!
//! A single-hidden-layer perceptron used by the neural condition. Weights
//! include bias columns; the output neuron is logistic so the result can be
//! thresholded at 0.5. Evolution happens by Gaussian weight perturbation,
//! never by gradient descent.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};
use rand_distr::{Distribution, Normal};

use crate::params::{Activation, XcsfParams};
use crate::random::RandomGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNet {
    /// `(num_hidden, num_inputs + 1)`; the last column is the bias.
    hidden_weights: Array2<f64>,
    /// `(num_hidden + 1)`; the last entry is the bias.
    output_weights: Array1<f64>,
    activation: Activation,
}

impl NeuralNet {
    /// Random network with weights uniform in `[-1, 1]`.
    pub fn random(
        num_inputs: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        let hidden = params.num_hidden_neurons;
        let hidden_weights =
            Array2::from_shape_fn((hidden, num_inputs + 1), |_| rng.gen_range_f64(-1.0, 1.0));
        let output_weights =
            Array1::from_shape_fn(hidden + 1, |_| rng.gen_range_f64(-1.0, 1.0));
        Self {
            hidden_weights,
            output_weights,
            activation: params.hidden_neuron_activation,
        }
    }

    /// Logistic output in `(0, 1)`.
    pub fn forward(&self, x: ArrayView1<f64>) -> f64 {
        let mut aug = Array1::ones(x.len() + 1);
        aug.slice_mut(ndarray::s![..x.len()]).assign(&x);

        let hidden = self
            .hidden_weights
            .dot(&aug)
            .mapv(|v| self.activation.apply(v));

        let mut hidden_aug = Array1::ones(hidden.len() + 1);
        hidden_aug
            .slice_mut(ndarray::s![..hidden.len()])
            .assign(&hidden);

        let out = self.output_weights.dot(&hidden_aug);
        1.0 / (1.0 + (-out).exp())
    }

    /// Perturbs each weight with probability `rate` by a Gaussian step of
    /// standard deviation `sigma`.
    pub fn mutate(&mut self, rate: f64, sigma: f64, rng: &mut impl RandomGenerator) -> bool {
        let normal = Normal::new(0.0, sigma.max(f64::MIN_POSITIVE))
            .expect("standard deviation must be positive");
        let mut changed = false;
        for w in self
            .hidden_weights
            .iter_mut()
            .chain(self.output_weights.iter_mut())
        {
            if rng.gen_probability() < rate {
                *w += normal.sample(rng.rng());
                changed = true;
            }
        }
        changed
    }
}

impl fmt::Display for NeuralNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "neural[{}x{}] out[{}]",
            self.hidden_weights.nrows(),
            self.hidden_weights.ncols(),
            self.output_weights.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XcsfParamsBuilder;
    use crate::random::XcsfRandomGenerator;
    use ndarray::array;

    #[test]
    fn test_forward_is_bounded() {
        let params = XcsfParamsBuilder::default()
            .num_hidden_neurons(5)
            .build()
            .unwrap();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(21));
        for _ in 0..20 {
            let net = NeuralNet::random(3, &params, &mut rng);
            let out = net.forward(array![0.5, -2.0, 7.0].view());
            assert!(out > 0.0 && out < 1.0);
        }
    }

    #[test]
    fn test_mutation_rate_zero_is_identity() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(22));
        let mut net = NeuralNet::random(2, &params, &mut rng);
        let before = net.clone();
        assert!(!net.mutate(0.0, 0.1, &mut rng));
        assert_eq!(net, before);
    }

    #[test]
    fn test_mutation_changes_weights() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(23));
        let mut net = NeuralNet::random(2, &params, &mut rng);
        let before = net.clone();
        assert!(net.mutate(1.0, 0.1, &mut rng));
        assert_ne!(net, before);
    }
}
