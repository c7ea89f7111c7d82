//! Constant predictions: one scalar per output, blended toward the target
//! with a running mean while young and rate `BETA` afterwards.

use std::fmt;

use ndarray::{Array1, ArrayView1};

use crate::condition::ConditionKind;
use crate::params::XcsfParams;
use crate::prediction::{NumericFault, Prediction};

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPredictor {
    pre: Array1<f64>,
    beta: f64,
    updates: f64,
}

impl ConstantPredictor {
    pub fn new(num_y_vars: usize, params: &XcsfParams) -> Self {
        Self {
            pre: Array1::zeros(num_y_vars),
            beta: params.beta,
            updates: 0.0,
        }
    }
}

impl Prediction for ConstantPredictor {
    fn compute(&mut self, _x: ArrayView1<f64>, _cond: &ConditionKind) {
        // the prediction is independent of the input
    }

    fn pre(&self) -> ArrayView1<'_, f64> {
        self.pre.view()
    }

    fn update(
        &mut self,
        y: ArrayView1<f64>,
        _x: ArrayView1<f64>,
        _cond: &ConditionKind,
    ) -> Result<(), NumericFault> {
        if y.iter().any(|v| !v.is_finite()) {
            return Err(NumericFault);
        }
        self.updates += 1.0;
        for (pre, &target) in self.pre.iter_mut().zip(y.iter()) {
            if self.updates < 1.0 / self.beta {
                *pre += (target - *pre) / self.updates;
            } else {
                *pre += self.beta * (target - *pre);
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConstantPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constant:")?;
        for v in self.pre.iter() {
            write!(f, " {v:.5}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XcsfParamsBuilder;
    use ndarray::array;

    fn dummy_cond() -> ConditionKind {
        ConditionKind::AlwaysMatch(crate::condition::AlwaysMatch::new())
    }

    #[test]
    fn test_young_predictor_averages() {
        let params = XcsfParamsBuilder::default().beta(0.1).build().unwrap();
        let mut pred = ConstantPredictor::new(1, &params);
        let x = array![0.0];
        let cond = dummy_cond();

        pred.update(array![4.0].view(), x.view(), &cond).unwrap();
        pred.update(array![8.0].view(), x.view(), &cond).unwrap();
        // running mean of the first two targets
        assert!((pred.pre()[0] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_mature_predictor_blends() {
        let params = XcsfParamsBuilder::default().beta(0.5).build().unwrap();
        let mut pred = ConstantPredictor::new(1, &params);
        let x = array![0.0];
        let cond = dummy_cond();

        // 1/beta = 2, so the third update uses the beta blend
        for _ in 0..3 {
            pred.update(array![1.0].view(), x.view(), &cond).unwrap();
        }
        let before = pred.pre()[0];
        pred.update(array![2.0].view(), x.view(), &cond).unwrap();
        assert!((pred.pre()[0] - (before + 0.5 * (2.0 - before))).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_target_is_a_fault() {
        let params = XcsfParamsBuilder::default().build().unwrap();
        let mut pred = ConstantPredictor::new(1, &params);
        let x = array![0.0];
        let cond = dummy_cond();
        assert_eq!(
            pred.update(array![f64::NAN].view(), x.view(), &cond),
            Err(NumericFault)
        );
        assert_eq!(pred.pre()[0], 0.0);
    }
}
