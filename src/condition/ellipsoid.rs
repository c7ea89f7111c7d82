//! Hyperellipsoid conditions: a centre and per-axis spread, matching when
//! the rescaled squared distance from the centre is at most one.

use std::fmt;

use ndarray::{Array1, ArrayView1};

use crate::condition::Condition;
use crate::params::XcsfParams;
use crate::random::RandomGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct HyperEllipsoid {
    centre: Array1<f64>,
    spread: Array1<f64>,
    matched: bool,
}

/// A zero spread would poison the match sum with NaN.
fn repair_spread(spread: &mut f64, params: &XcsfParams) {
    let max_spread = params.max_con - params.min_con;
    *spread = spread.abs().clamp(f64::EPSILON, max_spread);
}

impl HyperEllipsoid {
    pub fn random(
        num_x_vars: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        let half = (params.max_con - params.min_con) * 0.5;
        let mut centre = Array1::zeros(num_x_vars);
        let mut spread = Array1::zeros(num_x_vars);
        for i in 0..num_x_vars {
            centre[i] = rng.gen_range_f64(params.min_con, params.max_con);
            spread[i] = rng.gen_probability() * half;
            repair_spread(&mut spread[i], params);
        }
        Self {
            centre,
            spread,
            matched: false,
        }
    }

    /// Centred on `x`, so the covered classifier matches regardless of the
    /// drawn spread.
    pub fn cover(x: ArrayView1<f64>, params: &XcsfParams, rng: &mut impl RandomGenerator) -> Self {
        let half = (params.max_con - params.min_con) * 0.5;
        let centre = x.to_owned();
        let mut spread = Array1::zeros(x.len());
        for i in 0..x.len() {
            spread[i] = rng.gen_probability() * half;
            repair_spread(&mut spread[i], params);
        }
        Self {
            centre,
            spread,
            matched: false,
        }
    }
}

impl Condition for HyperEllipsoid {
    fn matches(&mut self, x: ArrayView1<f64>) -> bool {
        let dist: f64 = self
            .centre
            .iter()
            .zip(self.spread.iter())
            .zip(x.iter())
            .map(|((&c, &s), &v)| {
                let d = (v - c) / s;
                d * d
            })
            .sum();
        self.matched = dist <= 1.0;
        self.matched
    }

    fn match_state(&self) -> bool {
        self.matched
    }

    fn mutate(
        &mut self,
        p_mutation: f64,
        s_mutation: f64,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        let mut changed = false;
        for i in 0..self.centre.len() {
            if rng.gen_probability() < p_mutation {
                self.centre[i] += (rng.gen_probability() * 2.0 - 1.0) * s_mutation;
                self.centre[i] = self.centre[i].clamp(params.min_con, params.max_con);
                changed = true;
            }
            if rng.gen_probability() < p_mutation {
                self.spread[i] += (rng.gen_probability() * 2.0 - 1.0) * s_mutation;
                repair_spread(&mut self.spread[i], params);
                changed = true;
            }
        }
        changed
    }

    fn crossover(
        &mut self,
        other: &mut Self,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> bool {
        let mut changed = false;
        if rng.gen_probability() < params.p_crossover {
            for i in 0..self.centre.len() {
                if rng.gen_bool(0.5) {
                    std::mem::swap(&mut self.centre[i], &mut other.centre[i]);
                    changed = true;
                }
                if rng.gen_bool(0.5) {
                    std::mem::swap(&mut self.spread[i], &mut other.spread[i]);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Componentwise interval inclusion of `[c - s, c + s]`.
    fn is_more_general(&self, other: &Self) -> bool {
        self.centre
            .iter()
            .zip(self.spread.iter())
            .zip(other.centre.iter().zip(other.spread.iter()))
            .all(|((&ac, &asp), (&bc, &bsp))| ac - asp <= bc - bsp && ac + asp >= bc + bsp)
    }
}

impl fmt::Display for HyperEllipsoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ellipsoid:")?;
        for (c, s) in self.centre.iter().zip(self.spread.iter()) {
            write!(f, " ({c:.5}, {s:.5})")?;
        }
        Ok(())
    }
}
