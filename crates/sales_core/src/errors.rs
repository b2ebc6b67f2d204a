//! Error types for the prediction core

use thiserror::Error;

/// Errors raised by the categorical encoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Value is not part of the feature's fixed vocabulary
    #[error("Unknown value {value:?} for feature {feature}")]
    UnknownValue { feature: String, value: String },

    /// Feature name is not one of the categorical features
    #[error("Unknown categorical feature: {0}")]
    UnknownFeature(String),
}

/// Errors that can occur while serving a prediction
#[derive(Error, Debug)]
pub enum PredictError {
    /// User-correctable input problems, all of them
    #[error("Validation Error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Model artifact missing or corrupt
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Model invocation failed
    #[error("Prediction failed: {0}")]
    Prediction(String),
}

impl PredictError {
    /// Validation details when this is a validation failure
    pub fn details(&self) -> Option<&[String]> {
        match self {
            PredictError::Validation(details) => Some(details),
            _ => None,
        }
    }
}

impl From<EncodeError> for PredictError {
    fn from(err: EncodeError) -> Self {
        PredictError::Validation(vec![err.to_string()])
    }
}

/// Result type for prediction operations
pub type Result<T> = std::result::Result<T, PredictError>;
