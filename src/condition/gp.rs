//! GP-tree conditions: the classifier matches when its expression tree
//! evaluates above 0.5 for the input.

use std::fmt;

use ndarray::ArrayView1;

use crate::condition::Condition;
use crate::gp::GpTree;
use crate::params::XcsfParams;
use crate::random::RandomGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct GpTreeCondition {
    tree: GpTree,
    num_x_vars: usize,
    matched: bool,
}

impl GpTreeCondition {
    pub fn random(
        num_x_vars: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        Self {
            tree: GpTree::random(num_x_vars, params, rng),
            num_x_vars,
            matched: false,
        }
    }

    /// Regenerates random trees until one matches `x`.
    pub fn cover(x: ArrayView1<f64>, params: &XcsfParams, rng: &mut impl RandomGenerator) -> Self {
        loop {
            let mut cond = Self::random(x.len(), params, rng);
            if cond.matches(x) {
                return cond;
            }
        }
    }
}

impl Condition for GpTreeCondition {
    fn matches(&mut self, x: ArrayView1<f64>) -> bool {
        self.matched = self.tree.eval(x) > 0.5;
        self.matched
    }

    fn match_state(&self) -> bool {
        self.matched
    }

    fn mutate(
        &mut self,
        p_mutation: f64,
        _s_mutation: f64,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        if rng.gen_probability() < p_mutation {
            self.tree
                .point_mutate(p_mutation, self.num_x_vars, params, rng);
            true
        } else {
            false
        }
    }

    fn crossover(
        &mut self,
        other: &mut Self,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        if rng.gen_probability() < params.p_crossover {
            self.tree.subtree_crossover(&mut other.tree, rng);
            true
        } else {
            false
        }
    }

    fn is_more_general(&self, _other: &Self) -> bool {
        false
    }
}

impl fmt::Display for GpTreeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree: {}", self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XcsfParamsBuilder;
    use crate::random::XcsfRandomGenerator;
    use ndarray::array;

    #[test]
    fn test_cover_matches() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(61));
        let x = array![0.3, 0.8];
        let mut cond = GpTreeCondition::cover(x.view(), &params, &mut rng);
        assert!(cond.matches(x.view()));
    }

    #[test]
    fn test_no_subsumption_for_trees() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(62));
        let a = GpTreeCondition::random(2, &params, &mut rng);
        let b = GpTreeCondition::random(2, &params, &mut rng);
        assert!(!a.is_more_general(&b));
        assert!(!a.is_more_general(&a.clone()));
    }
}
