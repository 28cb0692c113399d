//! Error types for the gaze tracking library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Calibration was attempted with too few samples to fit the model
    #[error("Insufficient calibration samples: {provided} provided, {required} required")]
    InsufficientSamples {
        /// Minimum number of samples the fit needs
        required: usize,
        /// Number of samples actually supplied
        provided: usize,
    },

    /// Normal equations could not be solved
    #[error("Singular regression system: {0}")]
    SingularRegression(String),

    /// Landmarks too degenerate to measure
    #[error("Degenerate landmark geometry: {0}")]
    DegenerateLandmark(String),

    /// Prediction requested before any successful calibration
    #[error("Gaze prediction requested without a calibrated model")]
    UncalibratedPrediction,

    /// No face was available for this frame
    #[error("No landmarks available for this frame")]
    InputUnavailable,

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether the tracker keeps running unchanged after this error.
    ///
    /// Every error raised by the per-frame core is recoverable; only I/O and
    /// configuration problems at startup are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Yaml(_) | Self::ConfigError(_))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_samples_message() {
        let err = Error::InsufficientSamples { required: 10, provided: 9 };
        let msg = err.to_string();
        assert!(msg.contains("9 provided"));
        assert!(msg.contains("10 required"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::UncalibratedPrediction.is_recoverable());
        assert!(Error::SingularRegression("pivot".into()).is_recoverable());
        assert!(Error::InputUnavailable.is_recoverable());
        assert!(!Error::ConfigError("bad".into()).is_recoverable());
    }
}
