//! Neural conditions: a feed-forward network whose logistic output is
//! thresholded at 0.5 to decide the match. Weights evolve by Gaussian
//! perturbation; crossover is not defined for this variant.

use std::fmt;

use ndarray::ArrayView1;

use crate::condition::Condition;
use crate::neural::NeuralNet;
use crate::params::XcsfParams;
use crate::random::RandomGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct NeuralCondition {
    net: NeuralNet,
    matched: bool,
}

impl NeuralCondition {
    pub fn random(
        num_x_vars: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        Self {
            net: NeuralNet::random(num_x_vars, params, rng),
            matched: false,
        }
    }

    /// Regenerates random networks until one matches `x`.
    pub fn cover(x: ArrayView1<f64>, params: &XcsfParams, rng: &mut impl RandomGenerator) -> Self {
        loop {
            let mut cond = Self::random(x.len(), params, rng);
            if cond.matches(x) {
                return cond;
            }
        }
    }
}

impl Condition for NeuralCondition {
    fn matches(&mut self, x: ArrayView1<f64>) -> bool {
        self.matched = self.net.forward(x) > 0.5;
        self.matched
    }

    fn match_state(&self) -> bool {
        self.matched
    }

    fn mutate(
        &mut self,
        p_mutation: f64,
        s_mutation: f64,
        _params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        self.net.mutate(p_mutation, s_mutation, rng)
    }

    fn crossover(
        &mut self,
        _other: &mut Self,
        _params: &XcsfParams,
        _rng: &mut impl RandomGenerator,
    ) -> bool {
        false
    }

    fn is_more_general(&self, _other: &Self) -> bool {
        false
    }
}

impl fmt::Display for NeuralCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}
