//! Axis-aligned hyperrectangle conditions: one `[lower, upper]` interval
//! per input dimension, matching when every component of the input falls
//! inside its interval.

use std::fmt;

use ndarray::{Array1, ArrayView1};

use crate::condition::Condition;
use crate::params::XcsfParams;
use crate::random::RandomGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct HyperRectangle {
    pub(crate) lower: Array1<f64>,
    pub(crate) upper: Array1<f64>,
    matched: bool,
}

/// Clamps one interval into `[MIN_CON, MAX_CON]` and swaps inverted
/// bounds.
fn repair_interval(lower: &mut f64, upper: &mut f64, params: &XcsfParams) {
    *lower = lower.clamp(params.min_con, params.max_con);
    *upper = upper.clamp(params.min_con, params.max_con);
    if *lower > *upper {
        std::mem::swap(lower, upper);
    }
}

impl HyperRectangle {
    pub fn random(
        num_x_vars: usize,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        let mut lower = Array1::zeros(num_x_vars);
        let mut upper = Array1::zeros(num_x_vars);
        for i in 0..num_x_vars {
            lower[i] = rng.gen_range_f64(params.min_con, params.max_con);
            upper[i] = rng.gen_range_f64(params.min_con, params.max_con);
            repair_interval(&mut lower[i], &mut upper[i], params);
        }
        Self {
            lower,
            upper,
            matched: false,
        }
    }

    /// An interval around each component of `x`, spread by up to half the
    /// condition domain on either side.
    pub fn cover(x: ArrayView1<f64>, params: &XcsfParams, rng: &mut impl RandomGenerator) -> Self {
        let half = (params.max_con - params.min_con) * 0.5;
        let mut lower = Array1::zeros(x.len());
        let mut upper = Array1::zeros(x.len());
        for i in 0..x.len() {
            lower[i] = x[i] - rng.gen_probability() * half;
            upper[i] = x[i] + rng.gen_probability() * half;
            repair_interval(&mut lower[i], &mut upper[i], params);
        }
        Self {
            lower,
            upper,
            matched: false,
        }
    }
}

impl Condition for HyperRectangle {
    fn matches(&mut self, x: ArrayView1<f64>) -> bool {
        self.matched = self
            .lower
            .iter()
            .zip(self.upper.iter())
            .zip(x.iter())
            .all(|((&l, &u), &v)| l <= v && v <= u);
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
        for i in 0..self.lower.len() {
            if rng.gen_probability() < p_mutation {
                self.lower[i] += (rng.gen_probability() * 2.0 - 1.0) * s_mutation;
                changed = true;
            }
            if rng.gen_probability() < p_mutation {
                self.upper[i] += (rng.gen_probability() * 2.0 - 1.0) * s_mutation;
                changed = true;
            }
            repair_interval(&mut self.lower[i], &mut self.upper[i], params);
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
        // uniform crossover over interval bounds
        if rng.gen_probability() < params.p_crossover {
            for i in 0..self.lower.len() {
                if rng.gen_bool(0.5) {
                    std::mem::swap(&mut self.lower[i], &mut other.lower[i]);
                    changed = true;
                }
                if rng.gen_bool(0.5) {
                    std::mem::swap(&mut self.upper[i], &mut other.upper[i]);
                    changed = true;
                }
                repair_interval(&mut self.lower[i], &mut self.upper[i], params);
                repair_interval(&mut other.lower[i], &mut other.upper[i], params);
            }
        }
        changed
    }

    fn is_more_general(&self, other: &Self) -> bool {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .zip(other.lower.iter().zip(other.upper.iter()))
            .all(|((&al, &au), (&bl, &bu))| al <= bl && au >= bu)
    }
}

impl fmt::Display for HyperRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rectangle:")?;
        for (l, u) in self.lower.iter().zip(self.upper.iter()) {
            write!(f, " ({l:.5}, {u:.5})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XcsfParamsBuilder;
    use crate::random::XcsfRandomGenerator;
    use ndarray::array;
    use rstest::rstest;

    fn unit_params() -> XcsfParams {
        XcsfParamsBuilder::default()
            .min_con(0.0)
            .max_con(1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_cover_brackets_the_input() {
        let params = unit_params();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(41));
        for _ in 0..100 {
            let x = array![0.5];
            let mut cond = HyperRectangle::cover(x.view(), &params, &mut rng);
            assert!(cond.lower[0] >= 0.0 && cond.lower[0] <= 0.5);
            assert!(cond.upper[0] >= 0.5 && cond.upper[0] <= 1.0);
            assert!(cond.matches(x.view()));
        }
    }

    #[rstest]
    #[case(array![0.0, 0.0], array![1.0, 1.0], array![0.25, 0.25], array![0.75, 0.75], true)]
    #[case(array![0.25, 0.25], array![0.75, 0.75], array![0.0, 0.0], array![1.0, 1.0], false)]
    #[case(array![0.0, 0.3], array![1.0, 0.6], array![0.1, 0.2], array![0.9, 0.7], false)]
    fn test_generality(
        #[case] al: Array1<f64>,
        #[case] au: Array1<f64>,
        #[case] bl: Array1<f64>,
        #[case] bu: Array1<f64>,
        #[case] expected: bool,
    ) {
        let a = HyperRectangle {
            lower: al,
            upper: au,
            matched: false,
        };
        let b = HyperRectangle {
            lower: bl,
            upper: bu,
            matched: false,
        };
        assert_eq!(a.is_more_general(&b), expected);
    }

    #[test]
    fn test_generality_implies_match_containment() {
        let params = unit_params();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(42));
        for _ in 0..50 {
            let mut a = HyperRectangle::random(2, &params, &mut rng);
            let mut b = HyperRectangle::random(2, &params, &mut rng);
            if !a.is_more_general(&b) {
                continue;
            }
            for _ in 0..50 {
                let x = array![rng.gen_probability(), rng.gen_probability()];
                if b.matches(x.view()) {
                    assert!(a.matches(x.view()), "general condition failed to match");
                }
            }
        }
    }

    #[test]
    fn test_mutation_respects_bounds_law() {
        let params = unit_params();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(43));
        let x = array![0.4, 0.9];
        let mut cond = HyperRectangle::cover(x.view(), &params, &mut rng);
        for _ in 0..500 {
            cond.mutate(0.5, 0.2, &params, &mut rng);
            for i in 0..2 {
                assert!(0.0 <= cond.lower[i]);
                assert!(cond.lower[i] <= cond.upper[i]);
                assert!(cond.upper[i] <= 1.0);
            }
        }
    }

    #[test]
    fn test_crossover_respects_bounds_law() {
        let params = unit_params();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(44));
        let mut a = HyperRectangle::random(3, &params, &mut rng);
        let mut b = HyperRectangle::random(3, &params, &mut rng);
        for _ in 0..100 {
            a.crossover(&mut b, &params, &mut rng);
            for cond in [&a, &b] {
                for i in 0..3 {
                    assert!(cond.lower[i] >= 0.0);
                    assert!(cond.lower[i] <= cond.upper[i]);
                    assert!(cond.upper[i] <= 1.0);
                }
            }
        }
    }
}
