//! The always-matching condition. Useful as a baseline: the whole
//! population collapses onto a single global approximator.

use std::fmt;

use ndarray::ArrayView1;

use crate::condition::Condition;
use crate::params::XcsfParams;
use crate::random::RandomGenerator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlwaysMatch {
    matched: bool,
}

impl AlwaysMatch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Condition for AlwaysMatch {
    fn matches(&mut self, _x: ArrayView1<f64>) -> bool {
        self.matched = true;
        true
    }

    fn match_state(&self) -> bool {
        self.matched
    }

    fn mutate(
        &mut self,
        _p_mutation: f64,
        _s_mutation: f64,
        _params: &XcsfParams,
        _rng: &mut impl RandomGenerator,
    ) -> bool {
        false
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
        true
    }
}

impl fmt::Display for AlwaysMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "always-match")
    }
}
