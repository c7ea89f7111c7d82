//! Recursive least-squares predictions. Each classifier carries its own
//! `L x L` gain matrix sized by the feature length, shared across output
//! variables (the gain depends only on the inputs).

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};

use crate::condition::ConditionKind;
use crate::params::XcsfParams;
use crate::prediction::{NumericFault, Prediction, feature_len, polynomial_features};

#[derive(Debug, Clone, PartialEq)]
pub struct RlsPredictor {
    /// `(num_y_vars, L)` weight matrix.
    weights: Array2<f64>,
    /// `L x L` gain matrix, kept symmetric positive-definite.
    gain: Array2<f64>,
    pre: Array1<f64>,
    quadratic: bool,
    x0: f64,
    lambda: f64,
}

impl RlsPredictor {
    pub fn new(num_x_vars: usize, num_y_vars: usize, params: &XcsfParams) -> Self {
        let quadratic = params.pred_type.quadratic();
        let len = feature_len(num_x_vars, quadratic);
        let mut weights = Array2::zeros((num_y_vars, len));
        weights.column_mut(0).fill(params.x0);
        Self {
            weights,
            gain: Array2::eye(len) * params.rls_scale_factor,
            pre: Array1::zeros(num_y_vars),
            quadratic,
            x0: params.x0,
            lambda: params.rls_lambda,
        }
    }

    #[cfg(test)]
    pub(crate) fn weights(&self) -> &Array2<f64> {
        &self.weights
    }
}

impl Prediction for RlsPredictor {
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
        let phi = polynomial_features(x, self.x0, self.quadratic);

        // gain vector k = P * phi / (lambda + phi' * P * phi)
        let mut k = self.gain.dot(&phi);
        let divisor = self.lambda + phi.dot(&k);
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(NumericFault);
        }
        k /= divisor;

        let errors: Vec<f64> = y
            .iter()
            .zip(self.pre.iter())
            .map(|(&target, &pre)| target - pre)
            .collect();
        if errors.iter().any(|e| !e.is_finite()) || k.iter().any(|v| !v.is_finite()) {
            return Err(NumericFault);
        }

        // w += (y - pre) * k, per output
        for (mut row, error) in self.weights.rows_mut().into_iter().zip(errors) {
            row.scaled_add(error, &k);
        }

        // P <- (I - k * phi') * P / lambda, i.e. P - k * (phi' P)
        let phi_t_p = phi.dot(&self.gain);
        for i in 0..k.len() {
            for j in 0..k.len() {
                self.gain[[i, j]] = (self.gain[[i, j]] - k[i] * phi_t_p[j]) / self.lambda;
            }
        }
        // resymmetrise against floating-point drift
        let sym = (&self.gain + &self.gain.t()) * 0.5;
        self.gain = sym;
        Ok(())
    }
}

impl fmt::Display for RlsPredictor {
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
    use ndarray::array;

    fn dummy_cond() -> ConditionKind {
        ConditionKind::AlwaysMatch(AlwaysMatch::new())
    }

    #[test]
    fn test_one_shot_fit_on_independent_inputs() {
        let params = XcsfParamsBuilder::default()
            .pred_type(PredictorType::RlsLinear)
            .rls_scale_factor(1e6)
            .build()
            .unwrap();
        let mut pred = RlsPredictor::new(2, 1, &params);
        let cond = dummy_cond();

        // three linearly independent feature vectors for L = 3,
        // exact targets from y = 1 + 2*x1 + 3*x2
        let points = [
            (array![0.0, 0.0], 1.0),
            (array![1.0, 0.0], 3.0),
            (array![0.0, 1.0], 4.0),
        ];
        for (x, y) in &points {
            pred.compute(x.view(), &cond);
            pred.update(array![*y].view(), x.view(), &cond).unwrap();
        }
        for (x, y) in &points {
            pred.compute(x.view(), &cond);
            assert!(
                (pred.pre()[0] - y).abs() < 1e-3,
                "prediction {} far from {}",
                pred.pre()[0],
                y
            );
        }
        // the normal equations are satisfied: weights recover the model
        assert!((pred.weights()[[0, 0]] - 1.0).abs() < 1e-3);
        assert!((pred.weights()[[0, 1]] - 2.0).abs() < 1e-3);
        assert!((pred.weights()[[0, 2]] - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_gain_matrix_stays_symmetric() {
        let params = XcsfParamsBuilder::default()
            .pred_type(PredictorType::RlsLinear)
            .build()
            .unwrap();
        let mut pred = RlsPredictor::new(2, 1, &params);
        let cond = dummy_cond();

        for i in 0..50 {
            let t = i as f64 / 50.0;
            let x = array![t, 1.0 - t];
            pred.compute(x.view(), &cond);
            pred.update(array![t].view(), x.view(), &cond).unwrap();
        }
        for i in 0..pred.gain.nrows() {
            for j in 0..pred.gain.ncols() {
                assert!((pred.gain[[i, j]] - pred.gain[[j, i]]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_non_finite_target_is_a_fault() {
        let params = XcsfParamsBuilder::default()
            .pred_type(PredictorType::RlsLinear)
            .build()
            .unwrap();
        let mut pred = RlsPredictor::new(1, 1, &params);
        let cond = dummy_cond();
        let x = array![0.5];
        pred.compute(x.view(), &cond);
        let before = pred.weights().clone();
        assert_eq!(
            pred.update(array![f64::INFINITY].view(), x.view(), &cond),
            Err(NumericFault)
        );
        assert_eq!(*pred.weights(), before, "faulted update must not mutate");
    }

    #[test]
    fn test_quadratic_one_shot_fit() {
        let params = XcsfParamsBuilder::default()
            .pred_type(PredictorType::RlsQuadratic)
            .rls_scale_factor(1e6)
            .build()
            .unwrap();
        let mut pred = RlsPredictor::new(1, 1, &params);
        let cond = dummy_cond();

        // y = x^2, L = 3 for d = 1
        let points = [0.2, 0.5, 0.9];
        for _ in 0..2 {
            for &x in &points {
                let input = array![x];
                pred.compute(input.view(), &cond);
                pred.update(array![x * x].view(), input.view(), &cond)
                    .unwrap();
            }
        }
        for &x in &[0.3, 0.6] {
            let input = array![x];
            pred.compute(input.view(), &cond);
            assert!((pred.pre()[0] - x * x).abs() < 1e-2);
        }
    }
}
