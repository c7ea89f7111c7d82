//! # `prediction` – Polymorphic computed predictions
//!
//! A prediction maps inputs to an output vector and fits itself online
//! from `(x, y)` reinforcement. [`PredictorKind`] is the closed sum over
//! the concrete algorithms, dispatching by pattern match like the
//! condition side.
//!
//! Methods receive the owning classifier's condition because the
//! graph-output variant reads its values from the condition's last graph
//! evaluation; the other variants ignore it.
//!
//! `compute` caches the prediction vector consumed by `update`, so callers
//! must compute before updating for the same input.

use std::fmt;

use ndarray::{Array1, ArrayView1};

use crate::condition::ConditionKind;
use crate::params::{PredictorType, XcsfParams};

mod constant;
mod graph;
mod nlms;
mod rls;

pub use constant::ConstantPredictor;
pub use graph::GraphPredictor;
pub use nlms::NlmsPredictor;
pub use rls::RlsPredictor;

/// A prediction update went numerically bad (non-finite target or
/// collapsing gain divisor). The classifier keeps its pre-update state and
/// the engine raises its deletion pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericFault;

/// Capability set every prediction variant exposes to the engine.
pub trait Prediction: fmt::Display {
    /// Computes and caches the prediction vector for `x`.
    fn compute(&mut self, x: ArrayView1<f64>, cond: &ConditionKind);

    /// The cached prediction vector from the last [`Prediction::compute`].
    fn pre(&self) -> ArrayView1<'_, f64>;

    /// Online fit toward `y`. Consumes the cached prediction for the
    /// error term.
    fn update(
        &mut self,
        y: ArrayView1<f64>,
        x: ArrayView1<f64>,
        cond: &ConditionKind,
    ) -> Result<(), NumericFault>;
}

/// Polynomial feature expansion shared by NLMS and RLS: `[X0, x]` for the
/// linear model, `[X0, x, x_i * x_j (j >= i)]` for the quadratic one.
pub(crate) fn polynomial_features(x: ArrayView1<f64>, x0: f64, quadratic: bool) -> Array1<f64> {
    let d = x.len();
    let mut phi = Array1::zeros(feature_len(d, quadratic));
    phi[0] = x0;
    for i in 0..d {
        phi[1 + i] = x[i];
    }
    if quadratic {
        let mut idx = 1 + d;
        for i in 0..d {
            for j in i..d {
                phi[idx] = x[i] * x[j];
                idx += 1;
            }
        }
    }
    phi
}

pub(crate) fn feature_len(d: usize, quadratic: bool) -> usize {
    if quadratic {
        1 + 2 * d + d * (d - 1) / 2
    } else {
        1 + d
    }
}

/// The closed set of prediction variants.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictorKind {
    Constant(ConstantPredictor),
    Nlms(NlmsPredictor),
    Rls(RlsPredictor),
    Graph(GraphPredictor),
}

impl PredictorKind {
    pub fn new(num_x_vars: usize, num_y_vars: usize, params: &XcsfParams) -> Self {
        match params.pred_type {
            PredictorType::Constant => Self::Constant(ConstantPredictor::new(num_y_vars, params)),
            PredictorType::NlmsLinear | PredictorType::NlmsQuadratic => {
                Self::Nlms(NlmsPredictor::new(num_x_vars, num_y_vars, params))
            }
            PredictorType::RlsLinear | PredictorType::RlsQuadratic => {
                Self::Rls(RlsPredictor::new(num_x_vars, num_y_vars, params))
            }
            PredictorType::GraphOutput => Self::Graph(GraphPredictor::new(num_y_vars)),
        }
    }

    pub fn compute(&mut self, x: ArrayView1<f64>, cond: &ConditionKind) {
        match self {
            Self::Constant(p) => p.compute(x, cond),
            Self::Nlms(p) => p.compute(x, cond),
            Self::Rls(p) => p.compute(x, cond),
            Self::Graph(p) => p.compute(x, cond),
        }
    }

    pub fn pre(&self) -> ArrayView1<'_, f64> {
        match self {
            Self::Constant(p) => p.pre(),
            Self::Nlms(p) => p.pre(),
            Self::Rls(p) => p.pre(),
            Self::Graph(p) => p.pre(),
        }
    }

    pub fn update(
        &mut self,
        y: ArrayView1<f64>,
        x: ArrayView1<f64>,
        cond: &ConditionKind,
    ) -> Result<(), NumericFault> {
        match self {
            Self::Constant(p) => p.update(y, x, cond),
            Self::Nlms(p) => p.update(y, x, cond),
            Self::Rls(p) => p.update(y, x, cond),
            Self::Graph(p) => p.update(y, x, cond),
        }
    }
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(p) => p.fmt(f),
            Self::Nlms(p) => p.fmt(f),
            Self::Rls(p) => p.fmt(f),
            Self::Graph(p) => p.fmt(f),
        }
    }
}
