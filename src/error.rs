//! Error types for field construction, sensor configuration and measurement.

use thiserror::Error;

/// Errors surfaced by the simulation kernel.
///
/// Every variant is a caller/configuration error; nothing here is retried.
#[derive(Debug, Error)]
pub enum SimError {
    /// One or more run settings were left unset.
    #[error("SimulationSettings is missing values for: {}", .fields.join(", "))]
    MissingSettings {
        /// Names of the unset fields, in declaration order
        fields: Vec<&'static str>,
    },

    /// A parameter is out of its valid range.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A sensor array needs at least one sensor.
    #[error("Sensor count must be at least 1")]
    NoSensors,

    /// `measure` was called without evaluation times.
    #[error("Evaluation times must not be empty")]
    EmptyEvaluationTimes,

    /// Evaluation times must be strictly increasing.
    #[error("Evaluation times not strictly increasing at index {index}: {previous} -> {current}")]
    NonIncreasingTimes {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// An evaluation time is NaN or infinite.
    #[error("Evaluation time at index {index} is not finite")]
    NonFiniteTime { index: usize },

    /// The read-noise distribution could not be built.
    #[error("Noise distribution error: {0}")]
    NoiseDistribution(#[from] rand_distr::NormalError),
}

impl SimError {
    /// Create an InvalidParameter error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

/// Require `value` to be finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(SimError::invalid(name, format!("must be finite, got {}", value)));
    }
    if value <= 0.0 {
        return Err(SimError::invalid(name, format!("must be > 0, got {}", value)));
    }
    Ok(value)
}

/// Require `value` to be finite and not negative.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(SimError::invalid(name, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(SimError::invalid(name, format!("must be >= 0, got {}", value)));
    }
    Ok(value)
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::invalid(name, format!("must be finite, got {}", value)))
    }
}
