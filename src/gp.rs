//! # `gp` – Expression-tree substrate
//!
//! Symbolic trees over `{+, -, *, /}` with variable and ephemeral-constant
//! terminals. Division is protected: a zero divisor yields the numerator.
//! Trees are grown randomly to a depth bound and evolved by per-node point
//! mutation and subtree crossover.

use std::fmt;

use ndarray::ArrayView1;

use crate::params::XcsfParams;
use crate::random::RandomGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Func(Op, Box<Node>, Box<Node>),
    Var(usize),
    Const(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpTree {
    root: Node,
}

fn random_op(rng: &mut impl RandomGenerator) -> Op {
    match rng.gen_range_usize(0, 4) {
        0 => Op::Add,
        1 => Op::Sub,
        2 => Op::Mul,
        _ => Op::Div,
    }
}

/// A terminal is a variable or an ephemeral constant; `GP_NUM_CONS` sets
/// the constant-vs-variable odds.
fn random_terminal(
    num_x_vars: usize,
    params: &XcsfParams,
    rng: &mut impl RandomGenerator,
) -> Node {
    let span = (num_x_vars + params.gp_num_cons).max(1);
    let choice = rng.gen_range_usize(0, span);
    if choice < num_x_vars {
        Node::Var(choice)
    } else {
        Node::Const(rng.gen_range_f64(params.min_con, params.max_con))
    }
}

fn grow(
    depth: usize,
    num_x_vars: usize,
    params: &XcsfParams,
    rng: &mut impl RandomGenerator,
) -> Node {
    if depth == 0 || (depth < params.gp_init_depth && rng.gen_bool(0.5)) {
        random_terminal(num_x_vars, params, rng)
    } else {
        let a = grow(depth - 1, num_x_vars, params, rng);
        let b = grow(depth - 1, num_x_vars, params, rng);
        Node::Func(random_op(rng), Box::new(a), Box::new(b))
    }
}

impl GpTree {
    /// Grows a random tree bounded by `GP_INIT_DEPTH`. The root is always
    /// a function node.
    pub fn random(
        num_x_vars: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        let depth = params.gp_init_depth.max(1);
        let a = grow(depth - 1, num_x_vars, params, rng);
        let b = grow(depth - 1, num_x_vars, params, rng);
        Self {
            root: Node::Func(random_op(rng), Box::new(a), Box::new(b)),
        }
    }

    pub fn eval(&self, x: ArrayView1<f64>) -> f64 {
        eval_node(&self.root, x)
    }

    pub fn len(&self) -> usize {
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Per-node point mutation with probability `rate`: function nodes
    /// swap operator, terminals are redrawn. Returns whether anything
    /// changed.
    pub fn point_mutate(
        &mut self,
        rate: f64,
        num_x_vars: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        mutate_node(&mut self.root, rate, num_x_vars, params, rng)
    }

    /// Swaps a random subtree of `self` with a random subtree of `other`.
    pub fn subtree_crossover(&mut self, other: &mut Self, rng: &mut impl RandomGenerator) {
        let here = rng.gen_range_usize(0, self.len());
        let there = rng.gen_range_usize(0, other.len());
        let a = node_at_mut(&mut self.root, &mut 0, here).expect("index within node count");
        let b = node_at_mut(&mut other.root, &mut 0, there).expect("index within node count");
        std::mem::swap(a, b);
    }
}

fn eval_node(node: &Node, x: ArrayView1<f64>) -> f64 {
    match node {
        Node::Var(i) => x[*i],
        Node::Const(c) => *c,
        Node::Func(op, a, b) => {
            let a = eval_node(a, x);
            let b = eval_node(b, x);
            match op {
                Op::Add => a + b,
                Op::Sub => a - b,
                Op::Mul => a * b,
                // protected division
                Op::Div => {
                    if b == 0.0 {
                        a
                    } else {
                        a / b
                    }
                }
            }
        }
    }
}

fn count(node: &Node) -> usize {
    match node {
        Node::Func(_, a, b) => 1 + count(a) + count(b),
        _ => 1,
    }
}

/// Pre-order node lookup; `idx` tracks the running position.
fn node_at_mut<'a>(node: &'a mut Node, idx: &mut usize, target: usize) -> Option<&'a mut Node> {
    if *idx == target {
        return Some(node);
    }
    *idx += 1;
    match node {
        Node::Func(_, a, b) => {
            node_at_mut(a, idx, target).or_else(|| node_at_mut(b, idx, target))
        }
        _ => None,
    }
}

fn mutate_node(
    node: &mut Node,
    rate: f64,
    num_x_vars: usize,
    params: &XcsfParams,
    rng: &mut impl RandomGenerator,
) -> bool {
    let mut changed = false;
    if rng.gen_probability() < rate {
        changed = true;
        match node {
            Node::Func(op, _, _) => *op = random_op(rng),
            _ => *node = random_terminal(num_x_vars, params, rng),
        }
    }
    if let Node::Func(_, a, b) = node {
        changed |= mutate_node(a, rate, num_x_vars, params, rng);
        changed |= mutate_node(b, rate, num_x_vars, params, rng);
    }
    changed
}

impl fmt::Display for GpTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_node(&self.root, f)
    }
}

fn fmt_node(node: &Node, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match node {
        Node::Var(i) => write!(f, "x{i}"),
        Node::Const(c) => write!(f, "{c:.5}"),
        Node::Func(op, a, b) => {
            let sym = match op {
                Op::Add => "+",
                Op::Sub => "-",
                Op::Mul => "*",
                Op::Div => "/",
            };
            write!(f, "(")?;
            fmt_node(a, f)?;
            write!(f, " {sym} ")?;
            fmt_node(b, f)?;
            write!(f, ")")
        }
    }
}
