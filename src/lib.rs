//! # XCSF – accuracy-based learning classifier system
//!
//! An evolving population of classifiers approximates a real-valued
//! function: each classifier pairs a *condition* (the input region it
//! applies to) with a *computed prediction* (a locally fitted model). Per
//! trial, the matching classifiers vote a system prediction by fitness,
//! reinforcement tunes their predictions and bookkeeping, and a
//! steady-state genetic algorithm breeds new classifiers inside the match
//! set. The population self-organises into a covering of the input space
//! with a locally tuned predictor per region.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use ndarray::Array2;
//! use xcsf::{Xcsf, XcsfParamsBuilder};
//!
//! fn main() -> Result<(), xcsf::XcsfError> {
//!     let params = XcsfParamsBuilder::default()
//!         .pop_size(200)
//!         .max_trials(20_000)
//!         .seed(Some(42))
//!         .build()
//!         .expect("complete defaults");
//!
//!     // y = 2x + 1 on [0, 1]
//!     let x = Array2::from_shape_fn((100, 1), |(i, _)| i as f64 / 100.0);
//!     let y = x.mapv(|v| 2.0 * v + 1.0);
//!
//!     let mut xcsf = Xcsf::new(1, 1, params)?;
//!     xcsf.fit(&x, &y, true)?;
//!     let predictions = xcsf.predict(&x)?;
//!     println!("first prediction: {}", predictions[[0, 0]]);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`condition`] | Polymorphic match/cover/mutate/crossover per variant |
//! | [`prediction`] | Polymorphic compute/update per variant |
//! | [`classifier`] | One condition + one prediction + bookkeeping |
//! | [`sets`] | Match-set assembly, system prediction, reinforcement |
//! | [`population`] | Arena, roulette deletion, covering inserts |
//! | [`ga`] | Steady-state GA with subsumption |
//! | [`engine`] | Trial sequencing and the host-facing API |

pub mod classifier;
pub mod condition;
pub mod data;
pub mod dgp;
pub mod engine;
pub mod error;
pub mod ga;
pub mod gp;
pub mod neural;
pub mod params;
mod perf;
pub mod population;
pub mod prediction;
pub mod random;
pub mod sam;
pub mod sets;

pub use data::Dataset;
pub use engine::Xcsf;
pub use error::XcsfError;
pub use params::{Activation, ConditionType, PredictorType, XcsfParams, XcsfParamsBuilder};
pub use random::{RandomGenerator, XcsfRandomGenerator};
