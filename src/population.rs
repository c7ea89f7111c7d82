//! # `population` – Classifier arena
//!
//! The population owns every classifier and hands out stable indices, so
//! match sets carry plain `ClassifierId`s and deletion cannot dangle. A
//! classifier whose numerosity reaches zero is only marked dead (it joins
//! the kill list); its slot is reclaimed at the end of the trial, keeping
//! every id handed out during the trial valid.

use rayon::prelude::*;

use crate::classifier::Classifier;
use crate::condition::ConditionKind;
use crate::params::XcsfParams;
use crate::prediction::PredictorKind;
use crate::random::RandomGenerator;
use ndarray::ArrayView1;

pub type ClassifierId = usize;

#[derive(Debug)]
pub struct Population {
    slots: Vec<Option<Classifier>>,
    free: Vec<ClassifierId>,
    /// Sum of numerosities (`pop_num`).
    num_micro: usize,
    /// Cumulative numerosity ever inserted (`pop_num_sum`).
    num_sum: u64,
    /// Dead this trial; slots reclaimed by [`Self::collect_kills`].
    kill: Vec<ClassifierId>,
    num_x_vars: usize,
    num_y_vars: usize,
}

impl Population {
    pub fn new(num_x_vars: usize, num_y_vars: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            num_micro: 0,
            num_sum: 0,
            kill: Vec::new(),
            num_x_vars,
            num_y_vars,
        }
    }

    pub fn num_x_vars(&self) -> usize {
        self.num_x_vars
    }

    pub fn num_y_vars(&self) -> usize {
        self.num_y_vars
    }

    /// Sum of numerosities.
    pub fn num_micro(&self) -> usize {
        self.num_micro
    }

    /// Cumulative numerosity ever inserted.
    pub fn num_sum(&self) -> u64 {
        self.num_sum
    }

    /// Number of live macroclassifier records.
    pub fn num_macro(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.as_ref().is_some_and(|c| c.num > 0))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        use num_traits::Zero;
        self.num_micro.is_zero()
    }

    pub fn is_live(&self, id: ClassifierId) -> bool {
        self.slots
            .get(id)
            .is_some_and(|slot| slot.as_ref().is_some_and(|c| c.num > 0))
    }

    pub fn get(&self, id: ClassifierId) -> &Classifier {
        self.slots[id].as_ref().expect("stale classifier id")
    }

    pub fn get_mut(&mut self, id: ClassifierId) -> &mut Classifier {
        self.slots[id].as_mut().expect("stale classifier id")
    }

    /// Live classifier ids in slot order.
    pub fn ids(&self) -> Vec<ClassifierId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().filter(|c| c.num > 0).map(|_| id))
            .collect()
    }

    pub fn insert(&mut self, classifier: Classifier) -> ClassifierId {
        debug_assert!(classifier.num >= 1);
        self.num_micro += classifier.num as usize;
        self.num_sum += classifier.num as u64;
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(classifier);
                id
            }
            None => {
                self.slots.push(Some(classifier));
                self.slots.len() - 1
            }
        }
    }

    /// Seeds the population with random classifiers up to `POP_SIZE`.
    pub fn init_random(&mut self, time: u64, params: &XcsfParams, rng: &mut impl RandomGenerator) {
        while self.num_micro < params.pop_size {
            let cond = ConditionKind::random(self.num_x_vars, params, rng);
            let pred = PredictorKind::new(self.num_x_vars, self.num_y_vars, params);
            self.insert(Classifier::new(cond, pred, time, params, rng));
        }
    }

    /// Mean fitness per microclassifier.
    pub fn mean_fitness(&self) -> f64 {
        if self.num_micro == 0 {
            return 0.0;
        }
        let fit_sum: f64 = self
            .slots
            .iter()
            .flatten()
            .filter(|c| c.num > 0)
            .map(|c| c.fit)
            .sum();
        fit_sum / self.num_micro as f64
    }

    /// Roulette-deletes one microclassifier by deletion vote. Returns the
    /// id of the record if its numerosity dropped to zero.
    pub fn delete_one(
        &mut self,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Option<ClassifierId> {
        let ids = self.ids();
        if ids.is_empty() {
            return None;
        }
        let mean_fit = self.mean_fitness();
        let votes: Vec<f64> = ids
            .iter()
            .map(|&id| self.get(id).deletion_vote(mean_fit, params))
            .collect();
        let total: f64 = votes.iter().sum();

        let chosen = if total > 0.0 && total.is_finite() {
            let spin = rng.gen_range_f64(0.0, total);
            let mut acc = 0.0;
            let mut chosen = *ids.last().expect("non-empty");
            for (&id, &vote) in ids.iter().zip(votes.iter()) {
                acc += vote;
                if spin < acc {
                    chosen = id;
                    break;
                }
            }
            chosen
        } else {
            ids[rng.gen_range_usize(0, ids.len())]
        };

        let classifier = self.get_mut(chosen);
        classifier.num -= 1;
        self.num_micro -= 1;
        if self.get(chosen).num == 0 {
            self.kill.push(chosen);
            Some(chosen)
        } else {
            None
        }
    }

    /// Deletes until the numerosity sum fits the population bound again.
    pub fn enforce_limit(&mut self, params: &XcsfParams, rng: &mut impl RandomGenerator) {
        while self.num_micro > params.pop_size {
            self.delete_one(params, rng);
        }
        assert!(self.num_micro <= params.pop_size);
    }

    /// Subsumption absorption: the winner takes over the loser's whole
    /// numerosity and the loser dies.
    pub fn absorb(&mut self, winner: ClassifierId, loser: ClassifierId) {
        debug_assert_ne!(winner, loser);
        let loser_num = {
            let l = self.get_mut(loser);
            let n = l.num;
            l.num = 0;
            n
        };
        self.get_mut(winner).num += loser_num;
        self.kill.push(loser);
    }

    /// GA subsumption: a parent absorbs an offspring that was never
    /// inserted, gaining one copy.
    pub fn reinforce_subsumer(&mut self, id: ClassifierId) {
        self.get_mut(id).num += 1;
        self.num_micro += 1;
        self.num_sum += 1;
    }

    /// Evaluates the match predicate for every live classifier and
    /// returns the matching ids in slot order. The per-classifier match
    /// pass is data-parallel; collection stays serial so iteration order
    /// is deterministic.
    pub fn match_ids(&mut self, x: ArrayView1<f64>) -> Vec<ClassifierId> {
        self.slots
            .par_iter_mut()
            .enumerate()
            .filter_map(|(id, slot)| {
                let c = slot.as_mut()?;
                if c.num > 0 && c.matches(x) { Some(id) } else { None }
            })
            .collect::<Vec<_>>()
    }

    /// Reclaims the slots of classifiers killed this trial.
    pub fn collect_kills(&mut self) {
        for id in std::mem::take(&mut self.kill) {
            if let Some(c) = self.slots[id].take() {
                debug_assert_eq!(c.num, 0);
                self.free.push(id);
            }
        }
    }
}
