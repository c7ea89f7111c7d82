//! # `ga` – Steady-state genetic algorithm
//!
//! Runs on the match set when its mean GA timestamp is old enough. Two
//! parents are drawn by fitness-proportional roulette; offspring are
//! cloned, crossed over, mutated (with self-adapted rates when enabled),
//! and either absorbed by a subsuming parent or inserted under deletion
//! pressure.

use crate::classifier::Classifier;
use crate::params::XcsfParams;
use crate::population::{ClassifierId, Population};
use crate::random::RandomGenerator;
use crate::sam;
use crate::sets::MatchSet;

/// Runs one GA invocation if the trigger fires.
pub fn run(
    pop: &mut Population,
    mset: &mut MatchSet,
    time: u64,
    params: &XcsfParams,
    rng: &mut impl RandomGenerator,
) {
    if mset.ids.is_empty() {
        return;
    }
    // numerosity-weighted mean timestamp over the set
    let mut time_sum = 0.0;
    let mut num_sum = 0.0;
    for &id in &mset.ids {
        let c = pop.get(id);
        time_sum += c.time as f64 * c.num as f64;
        num_sum += c.num as f64;
    }
    if time as f64 - time_sum / num_sum <= params.theta_ga {
        return;
    }
    for &id in &mset.ids {
        pop.get_mut(id).time = time;
    }

    let parent_a = roulette_by_fitness(pop, mset, rng);
    let parent_b = roulette_by_fitness(pop, mset, rng);

    let mut remaining = params.theta_offspring;
    while remaining > 0 {
        // insertion pressure between rounds may have deleted a parent
        if !pop.is_live(parent_a) || !pop.is_live(parent_b) {
            break;
        }
        let mut child_a = offspring_of(pop.get(parent_a), time);
        let mut child_b = offspring_of(pop.get(parent_b), time);

        // self-adaptive rates mutate before they are used
        if let Some(mu) = child_a.mu.as_mut() {
            sam::adapt(mu, params, rng);
        }
        if let Some(mu) = child_b.mu.as_mut() {
            sam::adapt(mu, params, rng);
        }

        let crossed = child_a.cond.crossover(&mut child_b.cond, params, rng);
        if crossed {
            let err = (pop.get(parent_a).err + pop.get(parent_b).err) / 2.0;
            let fit = (pop.get(parent_a).fit + pop.get(parent_b).fit) / 2.0;
            child_a.err = err;
            child_b.err = err;
            child_a.fit = fit;
            child_b.fit = fit;
        }
        for child in [&mut child_a, &mut child_b] {
            child.err *= params.err_reduc;
            child.fit *= params.fit_reduc;
            let (p_mutation, s_mutation) = sam::rates(child.mu.as_ref(), params);
            child.cond.mutate(p_mutation, s_mutation, params, rng);
        }

        for child in [child_a, child_b] {
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            insert_offspring(pop, child, [parent_a, parent_b], params, rng);
        }
    }
    mset.validate(pop);
}

/// GA subsumption, then insertion under the population bound.
fn insert_offspring(
    pop: &mut Population,
    child: Classifier,
    parents: [ClassifierId; 2],
    params: &XcsfParams,
    rng: &mut impl RandomGenerator,
) {
    if params.ga_subsumption {
        for pid in parents {
            if pop.is_live(pid) && pop.get(pid).subsumes(&child, params) {
                pop.reinforce_subsumer(pid);
                pop.enforce_limit(params, rng);
                return;
            }
        }
    }
    pop.insert(child);
    pop.enforce_limit(params, rng);
}

/// A fresh copy of the parent with reset bookkeeping. Error and fitness
/// are inherited here; the caller applies averaging and reductions.
fn offspring_of(parent: &Classifier, time: u64) -> Classifier {
    Classifier {
        cond: parent.cond.clone(),
        pred: parent.pred.clone(),
        err: parent.err,
        fit: parent.fit,
        num: 1,
        exp: 0,
        size: parent.size,
        time,
        mu: parent.mu.clone(),
        faults: 0,
    }
}

/// Fitness-proportional roulette over the match set.
fn roulette_by_fitness(
    pop: &Population,
    mset: &MatchSet,
    rng: &mut impl RandomGenerator,
) -> ClassifierId {
    let total: f64 = mset.ids.iter().map(|&id| pop.get(id).fit).sum();
    if total > 0.0 && total.is_finite() {
        let spin = rng.gen_range_f64(0.0, total);
        let mut acc = 0.0;
        for &id in &mset.ids {
            acc += pop.get(id).fit;
            if spin < acc {
                return id;
            }
        }
    }
    mset.ids[rng.gen_range_usize(0, mset.ids.len())]
}
