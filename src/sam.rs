//! # `sam` – Self-adaptive mutation rates
//!
//! Each classifier may carry a small vector of mutation rates that are
//! themselves subject to evolution: on reproduction every rate is perturbed
//! log-normally and clamped. The first rate overrides the global mutation
//! probability, the second (when present) the mutation step size.

use ndarray::Array1;
use rand_distr::{Distribution, StandardNormal};

use crate::params::XcsfParams;
use crate::random::RandomGenerator;

/// Initial rate vector, uniform in `[0, 1)`.
pub fn init(params: &XcsfParams, rng: &mut impl RandomGenerator) -> Option<Array1<f64>> {
    if params.num_sam == 0 {
        return None;
    }
    Some(Array1::from_shape_fn(params.num_sam, |_| {
        rng.gen_probability()
    }))
}

/// Log-normal perturbation of every rate: `mu <- mu * exp(N(0,1))`,
/// clamped to `[muEPS_0, 1]`.
pub fn adapt(mu: &mut Array1<f64>, params: &XcsfParams, rng: &mut impl RandomGenerator) {
    for rate in mu.iter_mut() {
        let step: f64 = StandardNormal.sample(rng.rng());
        *rate = (*rate * step.exp()).clamp(params.mu_eps_0, 1.0);
    }
}

/// Effective `(P_MUTATION, S_MUTATION)` for a classifier, taking overrides
/// from its rate vector when self-adaptation is enabled.
pub fn rates(mu: Option<&Array1<f64>>, params: &XcsfParams) -> (f64, f64) {
    match mu {
        Some(mu) if !mu.is_empty() => {
            let p = mu[0];
            let s = if mu.len() > 1 { mu[1] } else { params.s_mutation };
            (p, s)
        }
        _ => (params.p_mutation, params.s_mutation),
    }
}
