//! Error types for reference data, user input and sessions.
//!
//! Gain resolution and the emissions formula never fail, so nothing here is
//! produced by them. Errors only come from the boundaries: loading or
//! replacing reference data, and validating raw user input.

use thiserror::Error;

/// Errors raised while reading or validating reference data.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The reference file could not be read.
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    /// The document is not valid JSON.
    #[error("JSON syntax error: {0}")]
    Syntax(String),

    /// The document is valid JSON but does not have the expected shape.
    #[error("malformed reference data at {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// An emission factor is negative or not finite.
    #[error("invalid emission factor '{name}': {value}")]
    InvalidFactor { name: &'static str, value: f64 },
}

impl From<serde_json::Error> for ReferenceError {
    fn from(err: serde_json::Error) -> Self {
        ReferenceError::Syntax(err.to_string())
    }
}

/// Errors raised when raw user input is rejected before calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Annual consumption is below the accepted minimum (kWh).
    #[error("annual consumption {value} kWh is below the minimum of {minimum} kWh")]
    ConsumptionBelowMinimum { value: f64, minimum: f64 },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// A percentage is outside [0, 100].
    #[error("{field} must be within 0-100 %, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    /// A selection field is empty.
    #[error("{field} must not be empty")]
    EmptySelection { field: &'static str },
}

/// Errors returned by [`crate::session::Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// A rejected reference-data edit is pending correction.
    #[error("calculation blocked until reference data is corrected: {0}")]
    Blocked(String),
}
