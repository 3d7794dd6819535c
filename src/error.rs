//! Error taxonomy for optimizer and adapter entry points.
//!
//! Only misconfiguration is reported to callers. Numerical trouble that
//! shows up while a search is running (NaN fitness, zero-length tours) is
//! absorbed by the runners and never aborts a run.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OptimizeError>;

/// Errors raised when a run is requested with unusable input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    /// The search bounds are malformed.
    #[error("invalid bounds at dimension {dimension}: {reason}")]
    InvalidBounds {
        /// Offending dimension (0 for whole-vector problems such as a length mismatch).
        dimension: usize,
        /// Human-readable description.
        reason: String,
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration for `{parameter}`: {reason}")]
    Configuration {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable description.
        reason: String,
    },

    /// Not enough input data to run the requested optimization.
    #[error("insufficient {what}: need at least {required}, got {actual}")]
    InsufficientData {
        /// What was missing (e.g. "locations").
        what: &'static str,
        /// Minimum accepted count.
        required: usize,
        /// Count actually supplied.
        actual: usize,
    },
}

impl OptimizeError {
    pub(crate) fn config(parameter: &'static str, reason: impl Into<String>) -> Self {
        OptimizeError::Configuration {
            parameter,
            reason: reason.into(),
        }
    }

    pub(crate) fn bounds(dimension: usize, reason: impl Into<String>) -> Self {
        OptimizeError::InvalidBounds {
            dimension,
            reason: reason.into(),
        }
    }
}
