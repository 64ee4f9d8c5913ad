//! Construction-time validation errors.
//!
//! Numeric degeneracy (zero impedance, resonant A-parameter, zero mean gain)
//! is never reported here. It flows through as `inf`/`NaN` and is priced by
//! the objective instead.

use thiserror::Error;

/// Result type for ladder-match operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid-argument conditions raised when building loads, networks,
/// component tables, objectives, or annealing runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Angular frequency below zero (or NaN).
    #[error("angular frequency must be >= 0, got {0}")]
    NegativeFrequency(f64),

    /// Element value below zero (or NaN) where a non-negative value is required.
    #[error("{what} must be >= 0, got {value}")]
    NegativeValue { what: &'static str, value: f64 },

    /// Preferred-value bounds that do not satisfy `0 < min <= max`.
    #[error("invalid value range: need 0 < min <= max, got min={min}, max={max}")]
    InvalidRange { min: f64, max: f64 },

    /// No preferred value (and no 0/inf endpoint) lies in `[min, max]`.
    #[error("no E24 value in [{min}, {max}]")]
    EmptyValueTable { min: f64, max: f64 },

    /// Transformer turns ratio that is not strictly positive.
    #[error("transformer ratio must be > 0, got {0}")]
    InvalidTransformerRatio(f64),

    /// ABCD matrix index outside 0..2.
    #[error("ABCD index ({row}, {col}) out of range")]
    MatrixIndex { row: usize, col: usize },

    /// Annealing schedule outside its domain.
    #[error("invalid annealing schedule: {0}")]
    InvalidAnnealing(String),

    /// Objective sampling parameters outside their domain.
    #[error("invalid objective: {0}")]
    InvalidObjective(String),
}

/// Reject NaN and negative angular frequencies.
pub(crate) fn check_frequency(omega: f64) -> Result<()> {
    if omega >= 0.0 {
        Ok(())
    } else {
        Err(Error::NegativeFrequency(omega))
    }
}

/// Reject NaN and negative element values. `+inf` is allowed.
pub(crate) fn check_non_negative(what: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::NegativeValue { what, value })
    }
}
