//! # `dgp` – Dynamic GP graph substrate
//!
//! A small recurrent graph of real-valued gates. Each node reads two
//! sources (an input variable or another node's state) and applies a fuzzy
//! gate. Evaluation clamps the inputs to `[0, 1]`, resets node states to
//! 0.5, and runs a fixed number of synchronous update cycles; gate outputs
//! stay in `[0, 1]` by construction.

use std::fmt;

use ndarray::ArrayView1;

use crate::params::XcsfParams;
use crate::random::RandomGenerator;

/// Synchronous update cycles per evaluation.
const UPDATE_CYCLES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// min(a, b)
    FuzzyAnd,
    /// max(a, b)
    FuzzyOr,
    /// 1 - a
    FuzzyNot,
    /// a * b; breaks the all-0.5 fixpoint the other gates share
    Product,
    /// a
    Identity,
}

impl Gate {
    fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            Gate::FuzzyAnd => a.min(b),
            Gate::FuzzyOr => a.max(b),
            Gate::FuzzyNot => 1.0 - a,
            Gate::Product => a * b,
            Gate::Identity => a,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Gate::FuzzyAnd => "AND",
            Gate::FuzzyOr => "OR",
            Gate::FuzzyNot => "NOT",
            Gate::Product => "MUL",
            Gate::Identity => "ID",
        }
    }
}

fn random_gate(rng: &mut impl RandomGenerator) -> Gate {
    match rng.gen_range_usize(0, 5) {
        0 => Gate::FuzzyAnd,
        1 => Gate::FuzzyOr,
        2 => Gate::FuzzyNot,
        3 => Gate::Product,
        _ => Gate::Identity,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DgpNode {
    gate: Gate,
    /// Source indices: `0..num_inputs` select an input variable,
    /// `num_inputs..` select a node state.
    sources: [usize; 2],
    state: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DgpGraph {
    nodes: Vec<DgpNode>,
    num_inputs: usize,
}

impl DgpGraph {
    pub fn random(
        num_inputs: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        let num_nodes = params.dgp_num_nodes;
        let nodes = (0..num_nodes)
            .map(|_| DgpNode {
                gate: random_gate(rng),
                sources: [
                    rng.gen_range_usize(0, num_inputs + num_nodes),
                    rng.gen_range_usize(0, num_inputs + num_nodes),
                ],
                state: 0.5,
            })
            .collect();
        Self { nodes, num_inputs }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Runs the synchronous update cycles for input `x` and leaves the
    /// node states readable through [`Self::state`].
    pub fn evaluate(&mut self, x: ArrayView1<f64>) {
        for node in &mut self.nodes {
            node.state = 0.5;
        }
        let mut next = vec![0.0; self.nodes.len()];
        for _ in 0..UPDATE_CYCLES {
            for (i, node) in self.nodes.iter().enumerate() {
                let a = self.source_value(node.sources[0], x);
                let b = self.source_value(node.sources[1], x);
                next[i] = node.gate.apply(a, b);
            }
            for (node, &value) in self.nodes.iter_mut().zip(next.iter()) {
                node.state = value;
            }
        }
    }

    fn source_value(&self, source: usize, x: ArrayView1<f64>) -> f64 {
        if source < self.num_inputs {
            x[source].clamp(0.0, 1.0)
        } else {
            self.nodes[source - self.num_inputs].state
        }
    }

    /// State of node `k` after the last [`Self::evaluate`].
    pub fn state(&self, k: usize) -> f64 {
        self.nodes[k].state
    }

    /// Per-node mutation with probability `rate`: the gate and each source
    /// connection are independently redrawn.
    pub fn mutate(&mut self, rate: f64, rng: &mut impl RandomGenerator) -> bool {
        let span = self.num_inputs + self.nodes.len();
        let mut changed = false;
        for i in 0..self.nodes.len() {
            if rng.gen_probability() < rate {
                self.nodes[i].gate = random_gate(rng);
                changed = true;
            }
            for s in 0..2 {
                if rng.gen_probability() < rate {
                    self.nodes[i].sources[s] = rng.gen_range_usize(0, span);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Uniform node swap between two graphs of the same size.
    pub fn uniform_crossover(&mut self, other: &mut Self, rng: &mut impl RandomGenerator) -> bool {
        debug_assert_eq!(self.nodes.len(), other.nodes.len());
        let mut changed = false;
        for (a, b) in self.nodes.iter_mut().zip(other.nodes.iter_mut()) {
            if rng.gen_bool(0.5) {
                std::mem::swap(a, b);
                changed = true;
            }
        }
        changed
    }
}

impl fmt::Display for DgpGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            write!(
                f,
                "{}{}:{}({},{})",
                if i > 0 { " " } else { "" },
                i,
                node.gate.symbol(),
                node.sources[0],
                node.sources[1],
            )?;
        }
        Ok(())
    }
}
