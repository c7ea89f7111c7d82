//! # `condition` – Polymorphic classifier conditions
//!
//! A condition decides which input vectors a classifier applies to. The
//! engine manipulates conditions only through the [`Condition`] capability
//! trait; [`ConditionKind`] is the closed sum over the concrete variants
//! and dispatches by pattern match. The variant in use is fixed for the
//! whole population by `COND_TYPE`, so crossover and generality tests only
//! ever see matching pairs.

use std::fmt;

use ndarray::ArrayView1;

use crate::params::{ConditionType, XcsfParams};
use crate::random::RandomGenerator;

mod dgp;
mod dummy;
mod ellipsoid;
mod gp;
mod neural;
mod rectangle;

pub use dgp::DgpGraphCondition;
pub use dummy::AlwaysMatch;
pub use ellipsoid::HyperEllipsoid;
pub use gp::GpTreeCondition;
pub use neural::NeuralCondition;
pub use rectangle::HyperRectangle;

/// Capability set every condition variant exposes to the engine.
pub trait Condition: fmt::Display {
    /// Evaluates the condition for `x` and caches the outcome.
    fn matches(&mut self, x: ArrayView1<f64>) -> bool;

    /// Outcome of the last [`Condition::matches`] call.
    fn match_state(&self) -> bool;

    /// Mutates in place with per-allele probability `p_mutation` and step
    /// size `s_mutation`. Returns whether anything changed.
    fn mutate(
        &mut self,
        p_mutation: f64,
        s_mutation: f64,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool;

    /// Crossover with another condition of the same variant, gated
    /// internally on `P_CROSSOVER`. Returns whether anything changed.
    fn crossover(
        &mut self,
        other: &mut Self,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool
    where
        Self: Sized;

    /// Whether `self` covers at least the region `other` covers. Variants
    /// without a meaningful generality relation return `false`, which
    /// disables subsumption for them.
    fn is_more_general(&self, other: &Self) -> bool
    where
        Self: Sized;
}

/// The closed set of condition variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    Rectangle(HyperRectangle),
    Ellipsoid(HyperEllipsoid),
    Neural(NeuralCondition),
    GpTree(GpTreeCondition),
    DgpGraph(DgpGraphCondition),
    AlwaysMatch(AlwaysMatch),
}

impl ConditionKind {
    /// A random condition of the configured variant.
    pub fn random(
        num_x_vars: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        match params.cond_type {
            ConditionType::Rectangle => {
                Self::Rectangle(HyperRectangle::random(num_x_vars, params, rng))
            }
            ConditionType::Ellipsoid => {
                Self::Ellipsoid(HyperEllipsoid::random(num_x_vars, params, rng))
            }
            ConditionType::Neural => Self::Neural(NeuralCondition::random(num_x_vars, params, rng)),
            ConditionType::GpTree => Self::GpTree(GpTreeCondition::random(num_x_vars, params, rng)),
            ConditionType::DgpGraph => {
                Self::DgpGraph(DgpGraphCondition::random(num_x_vars, params, rng))
            }
            ConditionType::AlwaysMatch => Self::AlwaysMatch(AlwaysMatch::new()),
        }
    }

    /// A condition of the configured variant guaranteed to match `x`.
    pub fn cover(x: ArrayView1<f64>, params: &XcsfParams, rng: &mut impl RandomGenerator) -> Self {
        let mut cond = match params.cond_type {
            ConditionType::Rectangle => Self::Rectangle(HyperRectangle::cover(x, params, rng)),
            ConditionType::Ellipsoid => Self::Ellipsoid(HyperEllipsoid::cover(x, params, rng)),
            ConditionType::Neural => Self::Neural(NeuralCondition::cover(x, params, rng)),
            ConditionType::GpTree => Self::GpTree(GpTreeCondition::cover(x, params, rng)),
            ConditionType::DgpGraph => Self::DgpGraph(DgpGraphCondition::cover(x, params, rng)),
            ConditionType::AlwaysMatch => Self::AlwaysMatch(AlwaysMatch::new()),
        };
        let matched = cond.matches(x);
        debug_assert!(matched, "covering must produce a matching condition");
        cond
    }

    pub fn matches(&mut self, x: ArrayView1<f64>) -> bool {
        match self {
            Self::Rectangle(c) => c.matches(x),
            Self::Ellipsoid(c) => c.matches(x),
            Self::Neural(c) => c.matches(x),
            Self::GpTree(c) => c.matches(x),
            Self::DgpGraph(c) => c.matches(x),
            Self::AlwaysMatch(c) => c.matches(x),
        }
    }

    pub fn match_state(&self) -> bool {
        match self {
            Self::Rectangle(c) => c.match_state(),
            Self::Ellipsoid(c) => c.match_state(),
            Self::Neural(c) => c.match_state(),
            Self::GpTree(c) => c.match_state(),
            Self::DgpGraph(c) => c.match_state(),
            Self::AlwaysMatch(c) => c.match_state(),
        }
    }

    pub fn mutate(
        &mut self,
        p_mutation: f64,
        s_mutation: f64,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        match self {
            Self::Rectangle(c) => c.mutate(p_mutation, s_mutation, params, rng),
            Self::Ellipsoid(c) => c.mutate(p_mutation, s_mutation, params, rng),
            Self::Neural(c) => c.mutate(p_mutation, s_mutation, params, rng),
            Self::GpTree(c) => c.mutate(p_mutation, s_mutation, params, rng),
            Self::DgpGraph(c) => c.mutate(p_mutation, s_mutation, params, rng),
            Self::AlwaysMatch(c) => c.mutate(p_mutation, s_mutation, params, rng),
        }
    }

    pub fn crossover(
        &mut self,
        other: &mut Self,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        match (self, other) {
            (Self::Rectangle(a), Self::Rectangle(b)) => a.crossover(b, params, rng),
            (Self::Ellipsoid(a), Self::Ellipsoid(b)) => a.crossover(b, params, rng),
            (Self::Neural(a), Self::Neural(b)) => a.crossover(b, params, rng),
            (Self::GpTree(a), Self::GpTree(b)) => a.crossover(b, params, rng),
            (Self::DgpGraph(a), Self::DgpGraph(b)) => a.crossover(b, params, rng),
            (Self::AlwaysMatch(a), Self::AlwaysMatch(b)) => a.crossover(b, params, rng),
            _ => {
                debug_assert!(false, "crossover between different condition variants");
                false
            }
        }
    }

    pub fn is_more_general(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rectangle(a), Self::Rectangle(b)) => a.is_more_general(b),
            (Self::Ellipsoid(a), Self::Ellipsoid(b)) => a.is_more_general(b),
            (Self::Neural(a), Self::Neural(b)) => a.is_more_general(b),
            (Self::GpTree(a), Self::GpTree(b)) => a.is_more_general(b),
            (Self::DgpGraph(a), Self::DgpGraph(b)) => a.is_more_general(b),
            (Self::AlwaysMatch(a), Self::AlwaysMatch(b)) => a.is_more_general(b),
            _ => false,
        }
    }

    /// The underlying DGP graph, when this is a graph condition. Used by
    /// the graph-output predictor.
    pub fn dgp_graph(&self) -> Option<&crate::dgp::DgpGraph> {
        match self {
            Self::DgpGraph(c) => Some(c.graph()),
            _ => None,
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rectangle(c) => c.fmt(f),
            Self::Ellipsoid(c) => c.fmt(f),
            Self::Neural(c) => c.fmt(f),
            Self::GpTree(c) => c.fmt(f),
            Self::DgpGraph(c) => c.fmt(f),
            Self::AlwaysMatch(c) => c.fmt(f),
        }
    }
}
