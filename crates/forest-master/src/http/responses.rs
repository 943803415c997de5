//! HTTP request and response types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Job request types
// ============================================================================

/// Request body for `POST /train`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainRequest {
    /// Dataset location handed to the worker.
    pub dataset_url: String,

    /// "classification" or "regression".
    pub task_type: String,

    /// Label column.
    pub target_column: String,

    /// Estimator count; falls back to `hyperparameters.n_estimators`.
    #[serde(default)]
    pub n_estimators: Option<i64>,

    #[serde(default)]
    pub hyperparameters: BTreeMap<String, i64>,

    /// Id to store the model under; generated when absent.
    #[serde(default)]
    pub model_id: Option<String>,
}

/// Request body for `POST /predict/:model_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

// ============================================================================
// Job response types
// ============================================================================

/// Response body for a completed training.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainResponse {
    pub model_id: String,
    pub status: String,
    pub message: String,
}

/// Response body for a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictResponse {
    pub model_id: String,
    pub prediction: String,
}

/// Response body for a successful worker health probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResponse {
    pub healthy: bool,
}

// ============================================================================
// Error types
// ============================================================================

/// Error response.
///
/// `error` is the cause exactly as produced by the validator, the transport
/// or the worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

// ============================================================================
// Health types
// ============================================================================

/// Master liveness response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub workers: usize,
}

/// Health of one pool member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerHealthResponse {
    pub endpoint: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
