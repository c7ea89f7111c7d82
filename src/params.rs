//! # `params` – Global parameter record
//!
//! [`XcsfParams`] gathers every tunable of the system. It is built once,
//! validated, then read-only for the lifetime of the engine: structural
//! parameters (weight lengths, node counts) shape per-classifier storage,
//! so mutating them mid-run would corrupt the population.
//!
//! Construction goes through the derive_builder-generated
//! [`XcsfParamsBuilder`] or through [`XcsfParams::from_ini`], which parses
//! the same `key = value` configuration files the classic implementations
//! use.

use std::fs;
use std::path::Path;

use derive_builder::Builder;

use crate::error::XcsfError;

/// The condition representation used by every classifier in the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionType {
    /// Axis-aligned hyperrectangle intervals.
    Rectangle,
    /// Hyperellipsoid with centre and per-axis spread.
    Ellipsoid,
    /// Feed-forward neural network, matching on its output neuron.
    Neural,
    /// Genetic-programming expression tree.
    GpTree,
    /// Dynamic GP graph of recurrent real-valued gates.
    DgpGraph,
    /// Matches every input.
    AlwaysMatch,
}

impl ConditionType {
    /// Integer encoding used in configuration files.
    pub fn from_code(code: i64) -> Result<Self, XcsfError> {
        match code {
            0 => Ok(Self::Rectangle),
            1 => Ok(Self::Ellipsoid),
            2 => Ok(Self::Neural),
            3 => Ok(Self::GpTree),
            4 => Ok(Self::DgpGraph),
            5 => Ok(Self::AlwaysMatch),
            _ => Err(XcsfError::Config(format!("unknown COND_TYPE: {code}"))),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Rectangle => 0,
            Self::Ellipsoid => 1,
            Self::Neural => 2,
            Self::GpTree => 3,
            Self::DgpGraph => 4,
            Self::AlwaysMatch => 5,
        }
    }
}

/// The computed-prediction algorithm used by every classifier.
///
/// Codes 0 and 1 keep their classic meaning (linear and quadratic NLMS);
/// 2..=5 extend the encoding to the remaining algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorType {
    NlmsLinear,
    NlmsQuadratic,
    RlsLinear,
    RlsQuadratic,
    Constant,
    /// Prediction read from designated nodes of a DGP graph condition.
    GraphOutput,
}

impl PredictorType {
    pub fn from_code(code: i64) -> Result<Self, XcsfError> {
        match code {
            0 => Ok(Self::NlmsLinear),
            1 => Ok(Self::NlmsQuadratic),
            2 => Ok(Self::RlsLinear),
            3 => Ok(Self::RlsQuadratic),
            4 => Ok(Self::Constant),
            5 => Ok(Self::GraphOutput),
            _ => Err(XcsfError::Config(format!("unknown PRED_TYPE: {code}"))),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::NlmsLinear => 0,
            Self::NlmsQuadratic => 1,
            Self::RlsLinear => 2,
            Self::RlsQuadratic => 3,
            Self::Constant => 4,
            Self::GraphOutput => 5,
        }
    }

    /// Whether the polynomial feature expansion includes quadratic terms.
    pub fn quadratic(&self) -> bool {
        matches!(self, Self::NlmsQuadratic | Self::RlsQuadratic)
    }
}

/// Hidden-neuron activation for the neural condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Logistic,
    Tanh,
    Relu,
}

impl Activation {
    pub fn from_code(code: i64) -> Result<Self, XcsfError> {
        match code {
            0 => Ok(Self::Logistic),
            1 => Ok(Self::Tanh),
            2 => Ok(Self::Relu),
            _ => Err(XcsfError::Config(format!(
                "unknown HIDDEN_NEURON_ACTIVATION: {code}"
            ))),
        }
    }

    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Self::Logistic => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
            Self::Relu => x.max(0.0),
        }
    }
}

/// Global parameters, read-only during a trial.
#[derive(Debug, Clone, Builder)]
#[builder(pattern = "owned")]
pub struct XcsfParams {
    /// Seed the population with random classifiers instead of starting
    /// empty and growing via covering.
    #[builder(default = "false")]
    pub pop_init: bool,
    /// Maximum population size as a sum of numerosities.
    #[builder(default = "500")]
    pub pop_size: usize,
    /// Number of learning trials performed by `fit`.
    #[builder(default = "100_000")]
    pub max_trials: usize,
    /// Moving-average window for performance reporting.
    #[builder(default = "1000")]
    pub perf_avg_trials: usize,
    /// Minimum number of macroclassifiers in a match set before covering
    /// stops.
    #[builder(default = "1")]
    pub theta_mna: usize,
    /// Accuracy fall-off coefficient.
    #[builder(default = "0.1")]
    pub alpha: f64,
    /// Learning rate for error, fitness, and set-size estimates.
    #[builder(default = "0.2")]
    pub beta: f64,
    /// Fraction of mean fitness below which deletion is accelerated.
    #[builder(default = "0.1")]
    pub delta: f64,
    /// Target error below which a classifier is considered accurate.
    #[builder(default = "0.01")]
    pub eps_0: f64,
    /// Accuracy fall-off exponent.
    #[builder(default = "5.0")]
    pub nu: f64,
    /// Offspring error reduction factor.
    #[builder(default = "1.0")]
    pub err_reduc: f64,
    /// Offspring fitness reduction factor.
    #[builder(default = "0.1")]
    pub fit_reduc: f64,
    /// Initial error of covered and seeded classifiers.
    #[builder(default = "0.0")]
    pub init_error: f64,
    /// Initial fitness of covered and seeded classifiers.
    #[builder(default = "0.01")]
    pub init_fitness: f64,
    /// Experience threshold above which deletion may be accelerated.
    #[builder(default = "20")]
    pub theta_del: usize,
    #[builder(default = "ConditionType::Rectangle")]
    pub cond_type: ConditionType,
    #[builder(default = "PredictorType::NlmsLinear")]
    pub pred_type: PredictorType,
    /// Probability of applying crossover to an offspring pair.
    #[builder(default = "0.8")]
    pub p_crossover: f64,
    /// Per-allele mutation probability.
    #[builder(default = "0.04")]
    pub p_mutation: f64,
    /// Mean match-set age (in trials) that triggers the GA.
    #[builder(default = "25.0")]
    pub theta_ga: f64,
    /// Number of offspring per GA invocation.
    #[builder(default = "2")]
    pub theta_offspring: usize,
    /// Lower clamp for self-adaptive mutation rates.
    #[builder(default = "0.0005")]
    pub mu_eps_0: f64,
    /// Number of self-adaptive mutation rates per classifier (0 disables
    /// self-adaptation).
    #[builder(default = "0")]
    pub num_sam: usize,
    /// Upper bound of the input domain for conditions.
    #[builder(default = "1.0")]
    pub max_con: f64,
    /// Lower bound of the input domain for conditions.
    #[builder(default = "0.0")]
    pub min_con: f64,
    /// Mutation step size for interval conditions.
    #[builder(default = "0.1")]
    pub s_mutation: f64,
    #[builder(default = "10")]
    pub num_hidden_neurons: usize,
    #[builder(default = "Activation::Logistic")]
    pub hidden_neuron_activation: Activation,
    #[builder(default = "20")]
    pub dgp_num_nodes: usize,
    /// Number of ephemeral constants available as GP terminals, relative
    /// to the input variables.
    #[builder(default = "100")]
    pub gp_num_cons: usize,
    /// Depth bound for randomly grown GP trees.
    #[builder(default = "5")]
    pub gp_init_depth: usize,
    /// NLMS learning rate.
    #[builder(default = "0.1")]
    pub eta: f64,
    /// Constant first feature of the polynomial expansion.
    #[builder(default = "1.0")]
    pub x0: f64,
    /// Initial diagonal of the RLS gain matrix.
    #[builder(default = "1000.0")]
    pub rls_scale_factor: f64,
    /// RLS forgetting factor.
    #[builder(default = "1.0")]
    pub rls_lambda: f64,
    /// Experience threshold for a subsumer.
    #[builder(default = "20")]
    pub theta_sub: usize,
    #[builder(default = "false")]
    pub ga_subsumption: bool,
    #[builder(default = "false")]
    pub set_subsumption: bool,
    /// Print moving-average error tables while fitting.
    #[builder(default = "false")]
    pub verbose: bool,
    /// RNG seed; entropy-seeded when `None`.
    #[builder(default = "None")]
    pub seed: Option<u64>,
}

impl Default for XcsfParams {
    fn default() -> Self {
        XcsfParamsBuilder::default()
            .build()
            .expect("default parameters are complete")
    }
}

fn validate_probability(value: f64, name: &str) -> Result<(), XcsfError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(XcsfError::InvalidParameter(format!(
            "{name} must be between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

fn validate_positive(value: usize, name: &str) -> Result<(), XcsfError> {
    if value == 0 {
        return Err(XcsfError::InvalidParameter(format!(
            "{name} must be greater than 0"
        )));
    }
    Ok(())
}

fn validate_positive_f64(value: f64, name: &str) -> Result<(), XcsfError> {
    if !(value > 0.0) {
        return Err(XcsfError::InvalidParameter(format!(
            "{name} must be greater than 0, got {value}"
        )));
    }
    Ok(())
}

impl XcsfParams {
    /// Checks the parameter record as a whole. Called by the engine
    /// constructor before any classifier storage is allocated.
    pub fn validate(&self) -> Result<(), XcsfError> {
        validate_probability(self.p_crossover, "P_CROSSOVER")?;
        validate_probability(self.p_mutation, "P_MUTATION")?;
        validate_probability(self.alpha, "ALPHA")?;
        validate_probability(self.beta, "BETA")?;
        validate_probability(self.delta, "DELTA")?;

        validate_positive(self.pop_size, "POP_SIZE")?;
        validate_positive(self.theta_mna, "THETA_MNA")?;
        validate_positive(self.theta_offspring, "THETA_OFFSPRING")?;
        validate_positive(self.perf_avg_trials, "PERF_AVG_TRIALS")?;
        validate_positive(self.gp_init_depth, "GP_INIT_DEPTH")?;
        validate_positive(self.dgp_num_nodes, "DGP_NUM_NODES")?;
        validate_positive(self.num_hidden_neurons, "NUM_HIDDEN_NEURONS")?;

        validate_positive_f64(self.eps_0, "EPS_0")?;
        validate_positive_f64(self.nu, "NU")?;
        validate_positive_f64(self.eta, "XCSF_ETA")?;
        validate_positive_f64(self.rls_scale_factor, "RLS_SCALE_FACTOR")?;
        validate_positive_f64(self.rls_lambda, "RLS_LAMBDA")?;

        if self.min_con >= self.max_con {
            return Err(XcsfError::InvalidParameter(format!(
                "MIN_CON ({}) must be less than MAX_CON ({})",
                self.min_con, self.max_con
            )));
        }
        if self.x0 == 0.0 {
            return Err(XcsfError::InvalidParameter(
                "XCSF_X0 must be non-zero".into(),
            ));
        }
        if self.theta_mna > self.pop_size {
            return Err(XcsfError::InvalidParameter(format!(
                "THETA_MNA ({}) cannot exceed POP_SIZE ({})",
                self.theta_mna, self.pop_size
            )));
        }
        if self.pred_type == PredictorType::GraphOutput
            && self.cond_type != ConditionType::DgpGraph
        {
            return Err(XcsfError::InvalidParameter(
                "graph-output prediction requires a DGP graph condition".into(),
            ));
        }
        Ok(())
    }

    /// Parses an INI-style `key = value` configuration file. Section
    /// headers and `#`/`;` comments are ignored; unknown keys and
    /// malformed values are configuration errors.
    pub fn from_ini<P: AsRef<Path>>(path: P) -> Result<Self, XcsfError> {
        let text = fs::read_to_string(path)?;
        let mut params = Self::default();

        for (lineno, raw) in text.lines().enumerate() {
            let line = match raw.find(['#', ';']) {
                Some(pos) => &raw[..pos],
                None => raw,
            }
            .trim();
            if line.is_empty() || (line.starts_with('[') && line.ends_with(']')) {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                XcsfError::Config(format!("line {}: expected `key = value`", lineno + 1))
            })?;
            params.apply(key.trim(), value.trim(), lineno + 1)?;
        }
        Ok(params)
    }

    fn apply(&mut self, key: &str, value: &str, lineno: usize) -> Result<(), XcsfError> {
        fn int(value: &str, key: &str, lineno: usize) -> Result<i64, XcsfError> {
            value.parse().map_err(|_| {
                XcsfError::Config(format!("line {lineno}: {key} expects an integer, got {value}"))
            })
        }
        fn float(value: &str, key: &str, lineno: usize) -> Result<f64, XcsfError> {
            value.parse().map_err(|_| {
                XcsfError::Config(format!("line {lineno}: {key} expects a number, got {value}"))
            })
        }
        fn boolean(value: &str, key: &str, lineno: usize) -> Result<bool, XcsfError> {
            match value {
                "1" | "true" | "True" => Ok(true),
                "0" | "false" | "False" => Ok(false),
                _ => Err(XcsfError::Config(format!(
                    "line {lineno}: {key} expects a boolean, got {value}"
                ))),
            }
        }
        fn count(value: &str, key: &str, lineno: usize) -> Result<usize, XcsfError> {
            let v = int(value, key, lineno)?;
            usize::try_from(v).map_err(|_| {
                XcsfError::Config(format!("line {lineno}: {key} must be non-negative"))
            })
        }

        match key {
            "POP_INIT" => self.pop_init = boolean(value, key, lineno)?,
            "POP_SIZE" => self.pop_size = count(value, key, lineno)?,
            "MAX_TRIALS" => self.max_trials = count(value, key, lineno)?,
            "PERF_AVG_TRIALS" => self.perf_avg_trials = count(value, key, lineno)?,
            "THETA_MNA" => self.theta_mna = count(value, key, lineno)?,
            "ALPHA" => self.alpha = float(value, key, lineno)?,
            "BETA" => self.beta = float(value, key, lineno)?,
            "DELTA" => self.delta = float(value, key, lineno)?,
            "EPS_0" => self.eps_0 = float(value, key, lineno)?,
            "NU" => self.nu = float(value, key, lineno)?,
            "ERR_REDUC" => self.err_reduc = float(value, key, lineno)?,
            "FIT_REDUC" => self.fit_reduc = float(value, key, lineno)?,
            "INIT_ERROR" => self.init_error = float(value, key, lineno)?,
            "INIT_FITNESS" => self.init_fitness = float(value, key, lineno)?,
            "THETA_DEL" => self.theta_del = count(value, key, lineno)?,
            "COND_TYPE" => self.cond_type = ConditionType::from_code(int(value, key, lineno)?)?,
            "PRED_TYPE" => self.pred_type = PredictorType::from_code(int(value, key, lineno)?)?,
            "P_CROSSOVER" => self.p_crossover = float(value, key, lineno)?,
            "P_MUTATION" => self.p_mutation = float(value, key, lineno)?,
            "THETA_GA" => self.theta_ga = float(value, key, lineno)?,
            "THETA_OFFSPRING" => self.theta_offspring = count(value, key, lineno)?,
            "muEPS_0" => self.mu_eps_0 = float(value, key, lineno)?,
            "NUM_SAM" => self.num_sam = count(value, key, lineno)?,
            "MAX_CON" => self.max_con = float(value, key, lineno)?,
            "MIN_CON" => self.min_con = float(value, key, lineno)?,
            "S_MUTATION" => self.s_mutation = float(value, key, lineno)?,
            "NUM_HIDDEN_NEURONS" => self.num_hidden_neurons = count(value, key, lineno)?,
            "HIDDEN_NEURON_ACTIVATION" => {
                self.hidden_neuron_activation = Activation::from_code(int(value, key, lineno)?)?
            }
            "DGP_NUM_NODES" => self.dgp_num_nodes = count(value, key, lineno)?,
            "GP_NUM_CONS" => self.gp_num_cons = count(value, key, lineno)?,
            "GP_INIT_DEPTH" => self.gp_init_depth = count(value, key, lineno)?,
            "XCSF_ETA" => self.eta = float(value, key, lineno)?,
            "XCSF_X0" => self.x0 = float(value, key, lineno)?,
            "RLS_SCALE_FACTOR" => self.rls_scale_factor = float(value, key, lineno)?,
            "RLS_LAMBDA" => self.rls_lambda = float(value, key, lineno)?,
            "THETA_SUB" => self.theta_sub = count(value, key, lineno)?,
            "GA_SUBSUMPTION" => self.ga_subsumption = boolean(value, key, lineno)?,
            "SET_SUBSUMPTION" => self.set_subsumption = boolean(value, key, lineno)?,
            "VERBOSE" => self.verbose = boolean(value, key, lineno)?,
            "SEED" => self.seed = Some(count(value, key, lineno)? as u64),
            _ => {
                return Err(XcsfError::Config(format!(
                    "line {lineno}: unknown parameter {key}"
                )));
            }
        }
        Ok(())
    }
}
