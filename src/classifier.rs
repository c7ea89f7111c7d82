//! # `classifier` – The unit of evolution
//!
//! A classifier binds one condition, one computed prediction, and the
//! bookkeeping scalars the reinforcement and genetic components read:
//! smoothed error, fitness, numerosity, experience, set-size estimate, and
//! the GA timestamp. Both polymorphic parts are fixed at birth.

use ndarray::{Array1, ArrayView1};

use crate::condition::ConditionKind;
use crate::params::XcsfParams;
use crate::prediction::{NumericFault, PredictorKind};
use crate::random::RandomGenerator;
use crate::sam;

#[derive(Debug, Clone)]
pub struct Classifier {
    pub cond: ConditionKind,
    pub pred: PredictorKind,
    /// Exponentially smoothed prediction error, >= 0.
    pub err: f64,
    /// Fitness, >= 0.
    pub fit: f64,
    /// Numerosity: this record stands for `num` copies.
    pub num: u32,
    /// Reinforcement updates received.
    pub exp: u64,
    /// Smoothed numerosity of the match sets this classifier joined.
    pub size: f64,
    /// Trial counter at the last GA visit.
    pub time: u64,
    /// Self-adaptive mutation rates, when enabled.
    pub mu: Option<Array1<f64>>,
    /// Numeric-fault count; raises the deletion vote.
    pub faults: u32,
}

impl Classifier {
    pub fn new(
        cond: ConditionKind,
        pred: PredictorKind,
        time: u64,
        params: &XcsfParams,
        rng: &mut impl RandomGenerator,
    ) -> Self {
        Self {
            cond,
            pred,
            err: params.init_error,
            fit: params.init_fitness,
            num: 1,
            exp: 0,
            size: 1.0,
            time,
            mu: sam::init(params, rng),
            faults: 0,
        }
    }

    pub fn matches(&mut self, x: ArrayView1<f64>) -> bool {
        self.cond.matches(x)
    }

    /// Refreshes the cached prediction vector for `x`.
    pub fn compute(&mut self, x: ArrayView1<f64>) {
        self.pred.compute(x, &self.cond);
    }

    pub fn prediction(&self) -> ArrayView1<'_, f64> {
        self.pred.pre()
    }

    pub fn update_prediction(
        &mut self,
        y: ArrayView1<f64>,
        x: ArrayView1<f64>,
    ) -> Result<(), NumericFault> {
        self.pred.update(y, x, &self.cond)
    }

    /// Mean absolute error of the cached prediction against `y`.
    pub fn absolute_error(&self, y: ArrayView1<f64>) -> f64 {
        let pre = self.pred.pre();
        y.iter()
            .zip(pre.iter())
            .map(|(&target, &p)| (target - p).abs())
            .sum::<f64>()
            / y.len() as f64
    }

    /// Widrow-Hoff error update with a running-mean warmup while
    /// `exp < 1/BETA`. `exp` must already count this update.
    pub fn update_error(&mut self, e: f64, beta: f64) {
        debug_assert!(self.exp > 0);
        if (self.exp as f64) < 1.0 / beta {
            self.err += (e - self.err) / self.exp as f64;
        } else {
            self.err += beta * (e - self.err);
        }
    }

    /// Same moving scheme as the error, toward the current match-set
    /// numerosity.
    pub fn update_set_size(&mut self, set_size: f64, beta: f64) {
        debug_assert!(self.exp > 0);
        if (self.exp as f64) < 1.0 / beta {
            self.size += (set_size - self.size) / self.exp as f64;
        } else {
            self.size += beta * (set_size - self.size);
        }
    }

    /// Accuracy `kappa`: 1 inside the error target, a power-law fall-off
    /// outside it.
    pub fn accuracy(&self, params: &XcsfParams) -> f64 {
        if self.err < params.eps_0 {
            1.0
        } else {
            params.alpha * (self.err / params.eps_0).powf(-params.nu)
        }
    }

    /// Moves fitness toward the relative accuracy within the match set.
    pub fn update_fitness(&mut self, kappa_rel: f64, beta: f64) {
        self.fit += beta * (kappa_rel - self.fit);
        debug_assert!(self.fit >= 0.0);
    }

    /// Deletion vote: proportional to the occupied set size and
    /// numerosity, amplified for experienced low-fitness classifiers and
    /// for classifiers whose updates went numerically bad.
    pub fn deletion_vote(&self, mean_fit: f64, params: &XcsfParams) -> f64 {
        let mut vote = self.size * self.num as f64;
        let fit_per_copy = (self.fit / self.num as f64).max(f64::MIN_POSITIVE);
        if self.exp > params.theta_del as u64 && fit_per_copy < params.delta * mean_fit {
            vote *= mean_fit / fit_per_copy;
        }
        vote * (1 + self.faults) as f64
    }

    /// Experienced and accurate enough to absorb others.
    pub fn could_subsume(&self, params: &XcsfParams) -> bool {
        self.exp > params.theta_sub as u64 && self.err < params.eps_0
    }

    pub fn subsumes(&self, other: &Self, params: &XcsfParams) -> bool {
        self.could_subsume(params) && self.cond.is_more_general(&other.cond)
    }

    /// One-line description, optionally including the condition and
    /// prediction forms.
    pub fn describe(&self, print_cond: bool, print_pred: bool) -> String {
        let mut out = format!(
            "err: {:.5} fit: {:.5} num: {} exp: {} size: {:.2} time: {}",
            self.err, self.fit, self.num, self.exp, self.size, self.time
        );
        if print_cond {
            out.push_str(&format!("\n  {}", self.cond));
        }
        if print_pred {
            out.push_str(&format!("\n  {}", self.pred));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XcsfParamsBuilder;
    use crate::random::XcsfRandomGenerator;
    use ndarray::array;

    fn make_classifier(params: &XcsfParams) -> Classifier {
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(111));
        let cond = ConditionKind::random(1, params, &mut rng);
        let pred = PredictorKind::new(1, 1, params);
        Classifier::new(cond, pred, 0, params, &mut rng)
    }

    #[test]
    fn test_new_classifier_invariants() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let c = make_classifier(&params);
        assert_eq!(c.num, 1);
        assert_eq!(c.exp, 0);
        assert_eq!(c.err, params.init_error);
        assert_eq!(c.fit, params.init_fitness);
        assert!(c.mu.is_none());
    }

    #[test]
    fn test_error_warmup_is_running_mean() {
        let params = XcsfParamsBuilder::default().beta(0.1).build().unwrap();
        let mut c = make_classifier(&params);
        // two updates within the warmup window average exactly
        c.exp = 1;
        c.update_error(0.4, params.beta);
        c.exp = 2;
        c.update_error(0.8, params.beta);
        assert!((c.err - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_power_law() {
        let params = XcsfParamsBuilder::default()
            .eps_0(0.01)
            .alpha(0.1)
            .nu(5.0)
            .build()
            .unwrap();
        let mut c = make_classifier(&params);
        c.err = 0.001;
        assert_eq!(c.accuracy(&params), 1.0);
        c.err = 0.02;
        let expected = 0.1 * (0.02f64 / 0.01).powf(-5.0);
        assert!((c.accuracy(&params) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_deletion_vote_penalises_weak_experienced() {
        let params = XcsfParamsBuilder::default()
            .theta_del(20)
            .delta(0.1)
            .build()
            .unwrap();
        let mut c = make_classifier(&params);
        c.size = 10.0;
        c.fit = 0.001;
        let mean_fit = 1.0;

        c.exp = 5; // inexperienced: plain vote
        assert!((c.deletion_vote(mean_fit, &params) - 10.0).abs() < 1e-12);

        c.exp = 50; // experienced and weak: amplified
        let amplified = c.deletion_vote(mean_fit, &params);
        assert!(amplified > 10.0);
        assert!((amplified - 10.0 * (1.0 / 0.001)).abs() < 1e-6);
    }

    #[test]
    fn test_faults_raise_the_vote() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let mut c = make_classifier(&params);
        c.size = 2.0;
        let base = c.deletion_vote(1.0, &params);
        c.faults = 3;
        assert!((c.deletion_vote(1.0, &params) - base * 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_absolute_error_is_mean_over_outputs() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(112));
        let cond = ConditionKind::random(1, &params, &mut rng);
        let pred = PredictorKind::new(1, 2, &params);
        let mut c = Classifier::new(cond, pred, 0, &params, &mut rng);
        c.compute(array![0.0].view());
        let pre = c.prediction().to_owned();
        let y = array![pre[0] + 0.2, pre[1] - 0.4];
        assert!((c.absolute_error(y.view()) - 0.3).abs() < 1e-12);
    }
}
