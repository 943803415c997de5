//! Request validation errors.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Reasons an external request or declared task cannot become a job.
///
/// A `ValidationError` is always client-caused: it is produced before any
/// worker is contacted and is never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The task type is not one of the recognized literals.
    #[error("invalid task_type '{0}': expected 'classification' or 'regression'")]
    InvalidTaskType(String),

    /// A required string field is missing or empty.
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    /// Predict request without any feature values.
    #[error("features must not be empty")]
    EmptyFeatures,

    /// A feature value cannot be represented as a 32-bit float.
    #[error("feature at index {index} is not representable as a 32-bit float: {value}")]
    FeatureOutOfRange { index: usize, value: f64 },

    /// Estimator count that does not fit the 32-bit wire field.
    #[error("n_estimators must fit in a 32-bit integer, got {value}")]
    InvalidEstimators { value: i64 },

    /// A declared hyperparameter the worker cannot take as an integer.
    #[error("hyperparameter '{name}' must be an integer, got {value}")]
    InvalidHyperparameter { name: String, value: String },

    /// The request body could not be decoded.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
