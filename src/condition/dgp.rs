//! DGP-graph conditions: node 0 of the graph is the match output; the
//! classifier matches when its state exceeds 0.5 after the synchronous
//! update cycles. The remaining node states stay readable for the
//! graph-output predictor.

use std::fmt;

use ndarray::ArrayView1;

use crate::condition::Condition;
use crate::dgp::DgpGraph;
use crate::params::XcsfParams;
use crate::random::RandomGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct DgpGraphCondition {
    graph: DgpGraph,
    matched: bool,
}

impl DgpGraphCondition {
    pub fn random(
        num_x_vars: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        Self {
            graph: DgpGraph::random(num_x_vars, params, rng),
            matched: false,
        }
    }

    /// Regenerates random graphs until one matches `x`.
    pub fn cover(x: ArrayView1<f64>, params: &XcsfParams, rng: &mut impl RandomGenerator) -> Self {
        loop {
            let mut cond = Self::random(x.len(), params, rng);
            if cond.matches(x) {
                return cond;
            }
        }
    }

    pub fn graph(&self) -> &DgpGraph {
        &self.graph
    }
}

impl Condition for DgpGraphCondition {
    fn matches(&mut self, x: ArrayView1<f64>) -> bool {
        self.graph.evaluate(x);
        self.matched = self.graph.state(0) > 0.5;
        self.matched
    }

    fn match_state(&self) -> bool {
        self.matched
    }

    fn mutate(
        &mut self,
        p_mutation: f64,
        _s_mutation: f64,
        _params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        self.graph.mutate(p_mutation, rng)
    }

    fn crossover(
        &mut self,
        other: &mut Self,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        if rng.gen_probability() < params.p_crossover {
            self.graph.uniform_crossover(&mut other.graph, rng)
        } else {
            false
        }
    }

    fn is_more_general(&self, _other: &Self) -> bool {
        false
    }
}

impl fmt::Display for DgpGraphCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dgp: {}", self.graph)
    }
}
