//! # `engine` – The XCSF learning engine
//!
//! [`Xcsf`] owns the population, the RNG, and the trial counter, and
//! exposes the host-facing surface: `fit`, `predict`, `score`, and the
//! printing helpers. A training trial is strictly sequential: match set
//! (with covering), system prediction, reinforcement, GA, kill
//! collection. Prediction-only trials omit reinforcement and the GA.

use ndarray::{Array2, ArrayView1, ArrayView2};
use ordered_float::OrderedFloat;

use crate::error::XcsfError;
use crate::params::{PredictorType, XcsfParams};
use crate::perf::{PerfWindow, print_progress};
use crate::population::Population;
use crate::random::{RandomGenerator, XcsfRandomGenerator};
use crate::{ga, sets};

#[derive(Debug)]
pub struct Xcsf {
    params: XcsfParams,
    pop: Population,
    rng: XcsfRandomGenerator,
    time: u64,
    num_x_vars: usize,
    num_y_vars: usize,
}

impl Xcsf {
    /// Validates the parameters and builds an engine for the given input
    /// and output dimensionality.
    pub fn new(
        num_x_vars: usize,
        num_y_vars: usize,
        params: XcsfParams,
    ) -> Result<Self, XcsfError> {
        if num_x_vars == 0 || num_y_vars == 0 {
            return Err(XcsfError::InvalidParameter(
                "num_x_vars and num_y_vars must be positive".into(),
            ));
        }
        params.validate()?;
        if params.pred_type == PredictorType::GraphOutput
            && params.dgp_num_nodes < 1 + num_y_vars
        {
            return Err(XcsfError::InvalidParameter(format!(
                "graph-output prediction needs at least {} DGP nodes",
                1 + num_y_vars
            )));
        }

        let mut rng = XcsfRandomGenerator::new_from_seed(params.seed);
        let mut pop = Population::new(num_x_vars, num_y_vars);
        if params.pop_init {
            pop.init_random(0, &params, &mut rng);
        }
        Ok(Self {
            params,
            pop,
            rng,
            time: 0,
            num_x_vars,
            num_y_vars,
        })
    }

    pub fn params(&self) -> &XcsfParams {
        &self.params
    }

    /// Trial counter.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Sum of numerosities in the population.
    pub fn pop_num(&self) -> usize {
        self.pop.num_micro()
    }

    /// Cumulative numerosity ever inserted.
    pub fn pop_num_sum(&self) -> u64 {
        self.pop.num_sum()
    }

    /// Number of macroclassifier records.
    pub fn pop_macro(&self) -> usize {
        self.pop.num_macro()
    }

    /// One learning trial; returns the system MSE for this sample.
    pub fn learn_trial(&mut self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let mut mset =
            sets::build_match_set(&mut self.pop, x, self.time, &self.params, &mut self.rng);
        let prediction = sets::system_prediction(&mut self.pop, &mset, x);
        sets::update(&mut self.pop, &mut mset, x, y, &self.params);
        ga::run(
            &mut self.pop,
            &mut mset,
            self.time,
            &self.params,
            &mut self.rng,
        );
        self.time += 1;
        self.pop.collect_kills();
        debug_assert!(self.pop.num_micro() <= self.params.pop_size);
        mse(prediction.view(), y)
    }

    /// One prediction-only trial; returns the system MSE for this sample.
    pub fn test_trial(&mut self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let mset =
            sets::build_match_set(&mut self.pop, x, self.time, &self.params, &mut self.rng);
        let prediction = sets::system_prediction(&mut self.pop, &mset, x);
        self.pop.collect_kills();
        mse(prediction.view(), y)
    }

    /// Runs `MAX_TRIALS` learning trials over the training rows, sampled
    /// uniformly when `shuffle` is on and cyclically otherwise.
    pub fn fit(
        &mut self,
        x_train: &Array2<f64>,
        y_train: &Array2<f64>,
        shuffle: bool,
    ) -> Result<(), XcsfError> {
        self.check_shapes(&x_train.view(), &y_train.view())?;
        let rows = x_train.nrows();
        let mut window = PerfWindow::new(self.params.perf_avg_trials);

        for cnt in 0..self.params.max_trials {
            let row = if shuffle {
                self.rng.gen_range_usize(0, rows)
            } else {
                cnt % rows
            };
            let err = self.learn_trial(x_train.row(row), y_train.row(row));
            window.push(err);
            if self.params.verbose && window.at_boundary() {
                print_progress(cnt + 1, window.mean(), None, self.pop.num_micro());
            }
        }
        Ok(())
    }

    /// Like [`Self::fit`], but also scores one test row per trial and
    /// reports both moving averages.
    pub fn fit_with_test(
        &mut self,
        x_train: &Array2<f64>,
        y_train: &Array2<f64>,
        x_test: &Array2<f64>,
        y_test: &Array2<f64>,
        shuffle: bool,
    ) -> Result<(), XcsfError> {
        self.check_shapes(&x_train.view(), &y_train.view())?;
        self.check_shapes(&x_test.view(), &y_test.view())?;
        let train_rows = x_train.nrows();
        let test_rows = x_test.nrows();
        let mut train_window = PerfWindow::new(self.params.perf_avg_trials);
        let mut test_window = PerfWindow::new(self.params.perf_avg_trials);

        for cnt in 0..self.params.max_trials {
            let row = if shuffle {
                self.rng.gen_range_usize(0, train_rows)
            } else {
                cnt % train_rows
            };
            let err = self.learn_trial(x_train.row(row), y_train.row(row));
            train_window.push(err);

            // exactly one draw per shuffled test selection
            let row = if shuffle {
                self.rng.gen_range_usize(0, test_rows)
            } else {
                cnt % test_rows
            };
            let terr = self.test_trial(x_test.row(row), y_test.row(row));
            test_window.push(terr);

            if self.params.verbose && train_window.at_boundary() {
                print_progress(
                    cnt + 1,
                    train_window.mean(),
                    Some(test_window.mean()),
                    self.pop.num_micro(),
                );
            }
        }
        Ok(())
    }

    /// System predictions for each input row, `rows x num_y_vars`.
    /// Covering may still grow the population, but nothing is reinforced.
    pub fn predict(&mut self, x: &Array2<f64>) -> Result<Array2<f64>, XcsfError> {
        if x.ncols() != self.num_x_vars {
            return Err(XcsfError::Shape(format!(
                "X has {} columns, engine expects {}",
                x.ncols(),
                self.num_x_vars
            )));
        }
        let mut output = Array2::zeros((x.nrows(), self.num_y_vars));
        for (row, mut out) in x.rows().into_iter().zip(output.rows_mut()) {
            let mset =
                sets::build_match_set(&mut self.pop, row, self.time, &self.params, &mut self.rng);
            let prediction = sets::system_prediction(&mut self.pop, &mset, row);
            out.assign(&prediction);
            self.pop.collect_kills();
        }
        Ok(output)
    }

    /// Mean MSE over all rows, without reinforcement.
    pub fn score(&mut self, x: &Array2<f64>, y: &Array2<f64>) -> Result<f64, XcsfError> {
        self.check_shapes(&x.view(), &y.view())?;
        let total: f64 = x
            .rows()
            .into_iter()
            .zip(y.rows())
            .map(|(xr, yr)| self.test_trial(xr, yr))
            .sum();
        Ok(total / x.nrows() as f64)
    }

    /// Prints every live classifier, highest fitness first.
    pub fn print_population(&self, print_cond: bool, print_pred: bool) {
        let mut ids = self.pop.ids();
        ids.sort_by_key(|&id| std::cmp::Reverse(OrderedFloat(self.pop.get(id).fit)));
        for id in ids {
            println!("{}", self.pop.get(id).describe(print_cond, print_pred));
        }
    }

    /// Builds and prints the match set for `x`.
    pub fn print_match_set(
        &mut self,
        x: ArrayView1<f64>,
        print_cond: bool,
        print_pred: bool,
    ) -> Result<(), XcsfError> {
        if x.len() != self.num_x_vars {
            return Err(XcsfError::Shape(format!(
                "input has {} variables, engine expects {}",
                x.len(),
                self.num_x_vars
            )));
        }
        let mset = sets::build_match_set(&mut self.pop, x, self.time, &self.params, &mut self.rng);
        for &id in &mset.ids {
            println!("{}", self.pop.get(id).describe(print_cond, print_pred));
        }
        self.pop.collect_kills();
        Ok(())
    }

    fn check_shapes(&self, x: &ArrayView2<f64>, y: &ArrayView2<f64>) -> Result<(), XcsfError> {
        if x.ncols() != self.num_x_vars {
            return Err(XcsfError::Shape(format!(
                "X has {} columns, engine expects {}",
                x.ncols(),
                self.num_x_vars
            )));
        }
        if y.ncols() != self.num_y_vars {
            return Err(XcsfError::Shape(format!(
                "Y has {} columns, engine expects {}",
                y.ncols(),
                self.num_y_vars
            )));
        }
        if x.nrows() != y.nrows() {
            return Err(XcsfError::Shape(format!(
                "X has {} rows but Y has {}",
                x.nrows(),
                y.nrows()
            )));
        }
        if x.nrows() == 0 {
            return Err(XcsfError::Shape("no training rows".into()));
        }
        Ok(())
    }
}

fn mse(prediction: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    prediction
        .iter()
        .zip(y.iter())
        .map(|(&p, &t)| (t - p) * (t - p))
        .sum::<f64>()
        / y.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XcsfParamsBuilder;
    use ndarray::array;

    fn small_params(seed: u64) -> XcsfParams {
        XcsfParamsBuilder::default()
            .pop_size(50)
            .max_trials(200)
            .perf_avg_trials(50)
            .seed(Some(seed))
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_rejects_zero_dims() {
        assert!(Xcsf::new(0, 1, small_params(1)).is_err());
        assert!(Xcsf::new(1, 0, small_params(1)).is_err());
    }

    #[test]
    fn test_fit_rejects_shape_mismatch() {
        let mut xcsf = Xcsf::new(2, 1, small_params(2)).unwrap();
        let x = array![[0.1], [0.2]]; // one column instead of two
        let y = array![[1.0], [2.0]];
        assert!(matches!(xcsf.fit(&x, &y, true), Err(XcsfError::Shape(_))));
        // nothing was mutated
        assert_eq!(xcsf.time(), 0);
        assert_eq!(xcsf.pop_num(), 0);
    }

    #[test]
    fn test_predict_shape() {
        let mut xcsf = Xcsf::new(1, 1, small_params(3)).unwrap();
        let x = array![[0.1], [0.5], [0.9]];
        let out = xcsf.predict(&x).unwrap();
        assert_eq!(out.dim(), (3, 1));
    }

    #[test]
    fn test_learning_keeps_population_bound() {
        let mut xcsf = Xcsf::new(1, 1, small_params(4)).unwrap();
        let x = array![[0.0], [0.25], [0.5], [0.75], [1.0]];
        let y = x.mapv(|v| 2.0 * v + 1.0);
        xcsf.fit(&x, &y, true).unwrap();
        assert!(xcsf.pop_num() <= xcsf.params().pop_size);
        assert_eq!(xcsf.time(), 200);
    }

    #[test]
    fn test_pop_init_seeds_population() {
        let params = XcsfParamsBuilder::default()
            .pop_size(30)
            .pop_init(true)
            .seed(Some(5))
            .build()
            .unwrap();
        let xcsf = Xcsf::new(1, 1, params).unwrap();
        assert_eq!(xcsf.pop_num(), 30);
    }
}
