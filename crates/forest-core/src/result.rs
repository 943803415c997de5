//! Payloads carried by successful job outcomes.

use serde::{Deserialize, Serialize};

use crate::ModelId;

/// Reply to a Health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
}

/// Raw Train reply as the worker sent it, before the gateway inspects `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainReply {
    pub success: bool,
    pub message: String,
}

/// A model the worker reports as trained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainResult {
    pub model_id: ModelId,
    pub message: String,
}

/// A prediction produced by a trained model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResult {
    pub model_id: ModelId,
    pub prediction: String,
}

/// Success payload of any job kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobResult {
    Health(HealthStatus),
    Trained(TrainResult),
    Predicted(PredictResult),
}
