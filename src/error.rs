use thiserror::Error;

/// Errors surfaced at the host boundary.
///
/// Numeric faults inside a prediction update are deliberately *not* here:
/// they are handled by skipping the offending classifier's update for the
/// trial and raising its deletion pressure.
#[derive(Debug, Error)]
pub enum XcsfError {
    /// Missing or malformed configuration entry.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input/output array dimensions inconsistent with the declared
    /// `num_x_vars`/`num_y_vars`. Reported before any state is mutated.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// A parameter value outside its legal range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
