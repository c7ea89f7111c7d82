//! Normalised least-mean-squares predictions (the modified delta rule, or
//! Widrow-Hoff update) over the polynomial feature expansion.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};

use crate::condition::ConditionKind;
use crate::params::XcsfParams;
use crate::prediction::{NumericFault, Prediction, feature_len, polynomial_features};

#[derive(Debug, Clone, PartialEq)]
pub struct NlmsPredictor {
    /// `(num_y_vars, L)` weight matrix.
    weights: Array2<f64>,
    pre: Array1<f64>,
    quadratic: bool,
    x0: f64,
    eta: f64,
}

impl NlmsPredictor {
    pub fn new(num_x_vars: usize, num_y_vars: usize, params: &XcsfParams) -> Self {
        let quadratic = params.pred_type.quadratic();
        let mut weights = Array2::zeros((num_y_vars, feature_len(num_x_vars, quadratic)));
        weights.column_mut(0).fill(params.x0);
        Self {
            weights,
            pre: Array1::zeros(num_y_vars),
            quadratic,
            x0: params.x0,
            eta: params.eta,
        }
    }

    #[cfg(test)]
    pub(crate) fn weights(&self) -> &Array2<f64> {
        &self.weights
    }
}

impl Prediction for NlmsPredictor {
    fn compute(&mut self, x: ArrayView1<f64>, _cond: &ConditionKind) {
        let phi = polynomial_features(x, self.x0, self.quadratic);
        self.pre = self.weights.dot(&phi);
    }

    fn pre(&self) -> ArrayView1<'_, f64> {
        self.pre.view()
    }

    fn update(
        &mut self,
        y: ArrayView1<f64>,
        x: ArrayView1<f64>,
        _cond: &ConditionKind,
    ) -> Result<(), NumericFault> {
        // norm >= X0^2 > 0 by construction, so no divisor guard is needed
        let norm = self.x0 * self.x0 + x.dot(&x);
        let phi = polynomial_features(x, self.x0, self.quadratic);

        let corrections: Vec<f64> = y
            .iter()
            .zip(self.pre.iter())
            .map(|(&target, &pre)| self.eta * (target - pre) / norm)
            .collect();
        if corrections.iter().any(|c| !c.is_finite()) {
            return Err(NumericFault);
        }
        for (mut row, correction) in self.weights.rows_mut().into_iter().zip(corrections) {
            row.scaled_add(correction, &phi);
        }
        Ok(())
    }
}

impl fmt::Display for NlmsPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weights:")?;
        for row in self.weights.rows() {
            for w in row.iter() {
                write!(f, " {w:.5}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::AlwaysMatch;
    use crate::params::{PredictorType, XcsfParamsBuilder};
    use crate::random::{RandomGenerator, XcsfRandomGenerator};
    use ndarray::array;

    fn dummy_cond() -> ConditionKind {
        ConditionKind::AlwaysMatch(AlwaysMatch::new())
    }

    #[test]
    fn test_compute_is_linear_in_weights() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let mut pred = NlmsPredictor::new(2, 1, &params);
        let cond = dummy_cond();
        // fresh predictor: only the offset weight X0 is set
        pred.compute(array![0.3, 0.7].view(), &cond);
        assert!((pred.pre()[0] - params.x0 * params.x0).abs() < 1e-12);
    }

    #[test]
    fn test_converges_on_noiseless_linear_target() {
        let params = XcsfParamsBuilder::default().eta(0.5).build().unwrap();
        let mut pred = NlmsPredictor::new(1, 1, &params);
        let cond = dummy_cond();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(91));

        // y = 2x + 1
        for _ in 0..2000 {
            let x = array![rng.gen_probability()];
            let y = array![2.0 * x[0] + 1.0];
            pred.compute(x.view(), &cond);
            pred.update(y.view(), x.view(), &cond).unwrap();
        }
        // with X0 = 1 the fitted weights are [1, 2]
        assert!((pred.weights()[[0, 0]] - 1.0).abs() < 1e-2);
        assert!((pred.weights()[[0, 1]] - 2.0).abs() < 1e-2);

        for x in [0.0, 0.25, 0.5, 1.0] {
            let input = array![x];
            pred.compute(input.view(), &cond);
            assert!((pred.pre()[0] - (2.0 * x + 1.0)).abs() < 1e-2);
        }
    }

    #[test]
    fn test_quadratic_fits_cross_term() {
        let params = XcsfParamsBuilder::default()
            .pred_type(PredictorType::NlmsQuadratic)
            .eta(0.5)
            .build()
            .unwrap();
        let mut pred = NlmsPredictor::new(2, 1, &params);
        let cond = dummy_cond();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(92));

        // y = x1 * x2, representable exactly by the quadratic expansion
        for _ in 0..20000 {
            let x = array![rng.gen_probability(), rng.gen_probability()];
            let y = array![x[0] * x[1]];
            pred.compute(x.view(), &cond);
            pred.update(y.view(), x.view(), &cond).unwrap();
        }
        for (a, b) in [(0.2, 0.9), (0.5, 0.5), (0.8, 0.1)] {
            let input = array![a, b];
            pred.compute(input.view(), &cond);
            assert!(
                (pred.pre()[0] - a * b).abs() < 0.02,
                "prediction {} far from {}",
                pred.pre()[0],
                a * b
            );
        }
    }

    #[test]
    fn test_multi_output_updates_independently() {
        let params = XcsfParamsBuilder::default().eta(0.5).build().unwrap();
        let mut pred = NlmsPredictor::new(1, 2, &params);
        let cond = dummy_cond();
        let mut rng = XcsfRandomGenerator::new_from_seed(Some(93));

        for _ in 0..2000 {
            let x = array![rng.gen_probability()];
            let y = array![3.0 * x[0], -x[0] + 0.5];
            pred.compute(x.view(), &cond);
            pred.update(y.view(), x.view(), &cond).unwrap();
        }
        let input = array![0.5];
        pred.compute(input.view(), &cond);
        assert!((pred.pre()[0] - 1.5).abs() < 1e-2);
        assert!((pred.pre()[1] - 0.0).abs() < 1e-2);
    }
}
