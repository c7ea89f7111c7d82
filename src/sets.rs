//! # `sets` – Match-set assembly and reinforcement
//!
//! Per trial: the population is filtered into a match set for the current
//! input, covering tops it up to the required diversity, the members'
//! predictions are aggregated into the system prediction, and the
//! reinforcement pass updates prediction parameters, error, set-size, and
//! fitness estimates. Set subsumption optionally lets the most general
//! accurate member absorb the rest.

use ndarray::{Array1, ArrayView1};

use crate::classifier::Classifier;
use crate::condition::ConditionKind;
use crate::params::XcsfParams;
use crate::population::{ClassifierId, Population};
use crate::prediction::PredictorKind;
use crate::random::RandomGenerator;

/// Ids of the population members matching the current input. Built fresh
/// each trial and never persisted.
#[derive(Debug)]
pub struct MatchSet {
    pub ids: Vec<ClassifierId>,
}

impl MatchSet {
    /// Sum of member numerosities.
    pub fn micro_count(&self, pop: &Population) -> usize {
        self.ids.iter().map(|&id| pop.get(id).num as usize).sum()
    }

    /// Drops members that died under deletion pressure.
    pub fn validate(&mut self, pop: &Population) {
        self.ids.retain(|&id| pop.is_live(id));
    }
}

/// Builds the match set for `x`, covering until it holds at least
/// `THETA_MNA` macroclassifiers. Covering inserts into the population and
/// enforces the size bound, which can in turn delete matched members; the
/// set is revalidated after every insertion.
pub fn build_match_set(
    pop: &mut Population,
    x: ArrayView1<f64>,
    time: u64,
    params: &XcsfParams,
    rng: &mut impl RandomGenerator,
) -> MatchSet {
    let mut mset = MatchSet {
        ids: pop.match_ids(x),
    };
    while mset.ids.len() < params.theta_mna {
        let cond = ConditionKind::cover(x, params, rng);
        let pred = PredictorKind::new(pop.num_x_vars(), pop.num_y_vars(), params);
        let id = pop.insert(Classifier::new(cond, pred, time, params, rng));
        mset.ids.push(id);
        pop.enforce_limit(params, rng);
        mset.validate(pop);
    }
    debug_assert!(mset.ids.len() >= params.theta_mna);
    mset
}

/// Fitness-weighted mean of the member predictions; every member's cached
/// prediction is refreshed first. Falls back to the plain mean when the
/// fitness mass is not usable as a weight.
pub fn system_prediction(
    pop: &mut Population,
    mset: &MatchSet,
    x: ArrayView1<f64>,
) -> Array1<f64> {
    let num_y_vars = pop.num_y_vars();
    let mut weighted = Array1::zeros(num_y_vars);
    let mut fit_sum = 0.0;
    for &id in &mset.ids {
        let c = pop.get_mut(id);
        c.compute(x);
        let fit = c.fit;
        weighted.scaled_add(fit, &c.prediction());
        fit_sum += fit;
    }
    if fit_sum > 0.0 && fit_sum.is_finite() {
        weighted / fit_sum
    } else {
        let mut mean = Array1::zeros(num_y_vars);
        for &id in &mset.ids {
            mean += &pop.get(id).prediction();
        }
        mean / mset.ids.len() as f64
    }
}

/// The reinforcement pass over the match set. Callers must have refreshed
/// the cached predictions (via [`system_prediction`]) for the same `x`.
pub fn update(
    pop: &mut Population,
    mset: &mut MatchSet,
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    params: &XcsfParams,
) {
    let set_size = mset.micro_count(pop) as f64;

    for &id in &mset.ids {
        let c = pop.get_mut(id);
        c.exp += 1;
        // a numerically bad update leaves the predictor untouched and
        // raises deletion pressure instead of aborting the trial
        if c.update_prediction(y, x).is_err() {
            c.faults += 1;
        }
        let e = c.absolute_error(y);
        c.update_error(e, params.beta);
        c.update_set_size(set_size, params.beta);
    }

    // relative accuracy within the set, then the fitness update
    let mut acc_sum = 0.0;
    let accuracies: Vec<f64> = mset
        .ids
        .iter()
        .map(|&id| {
            let c = pop.get(id);
            let kappa = c.accuracy(params);
            acc_sum += kappa * c.num as f64;
            kappa
        })
        .collect();
    for (&id, kappa) in mset.ids.iter().zip(accuracies) {
        let c = pop.get_mut(id);
        let kappa_rel = kappa * c.num as f64 / acc_sum;
        c.update_fitness(kappa_rel, params.beta);
    }

    if params.set_subsumption {
        subsume_in_set(pop, mset, params);
    }
}

/// The most general eligible member absorbs every member it subsumes.
fn subsume_in_set(pop: &mut Population, mset: &mut MatchSet, params: &XcsfParams) {
    let mut candidate: Option<ClassifierId> = None;
    for &id in &mset.ids {
        let c = pop.get(id);
        if !c.could_subsume(params) {
            continue;
        }
        candidate = match candidate {
            None => Some(id),
            Some(cur) if c.cond.is_more_general(&pop.get(cur).cond) => Some(id),
            keep => keep,
        };
    }
    let Some(winner) = candidate else {
        return;
    };
    let losers: Vec<ClassifierId> = mset
        .ids
        .iter()
        .copied()
        .filter(|&id| id != winner && pop.get(winner).cond.is_more_general(&pop.get(id).cond))
        .collect();
    for loser in losers {
        pop.absorb(winner, loser);
    }
    mset.validate(pop);
}
