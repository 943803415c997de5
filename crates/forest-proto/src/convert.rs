//! Converters between proto types and domain types.

use crate::pb;
use forest_core::{HealthStatus, ModelId, PredictSpec, TaskType, TrainReply, TrainSpec};

// ============================================================================
// TaskType conversions
// ============================================================================

impl From<TaskType> for pb::TaskType {
    fn from(task_type: TaskType) -> Self {
        match task_type {
            TaskType::Classification => pb::TaskType::ClassificationTask,
            TaskType::Regression => pb::TaskType::RegressionTask,
        }
    }
}

// ============================================================================
// Request builders
// ============================================================================

/// Build the wire request for a Train job.
pub fn train_request(model_id: &ModelId, spec: &TrainSpec) -> pb::TrainRequest {
    pb::TrainRequest {
        model_id: model_id.as_str().to_string(),
        dataset_url: spec.dataset_reference().to_string(),
        task_type: pb::TaskType::from(spec.task_type()) as i32,
        n_estimators: spec.n_estimators(),
        target_column: spec.target_column().to_string(),
        hyperparameters: spec
            .hyperparameters()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect(),
    }
}

/// Build the wire request for a Predict job.
pub fn predict_request(model_id: &ModelId, spec: &PredictSpec) -> pb::PredictRequest {
    pb::PredictRequest {
        model_id: model_id.as_str().to_string(),
        features: spec.features().to_vec(),
    }
}

// ============================================================================
// Reply conversions
// ============================================================================

impl From<pb::HealthResponse> for HealthStatus {
    fn from(proto: pb::HealthResponse) -> Self {
        HealthStatus {
            healthy: proto.healthy,
        }
    }
}

impl From<pb::TrainResponse> for TrainReply {
    fn from(proto: pb::TrainResponse) -> Self {
        TrainReply {
            success: proto.success,
            message: proto.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_train_request_carries_every_field() {
        let mut hyper = BTreeMap::new();
        hyper.insert("max_depth".to_string(), 8);
        hyper.insert("n_estimators".to_string(), 40);
        let spec = TrainSpec::new("s3://b/house.csv", TaskType::Regression, "price", None, hyper)
            .unwrap();

        let req = train_request(&ModelId::new("model-house"), &spec);

        assert_eq!(req.model_id, "model-house");
        assert_eq!(req.dataset_url, "s3://b/house.csv");
        assert_eq!(req.task_type(), pb::TaskType::RegressionTask);
        assert_eq!(req.n_estimators, 40);
        assert_eq!(req.target_column, "price");
        assert_eq!(req.hyperparameters.get("max_depth"), Some(&8));
        assert_eq!(req.hyperparameters.len(), 2);
    }

    #[test]
    fn test_predict_request_keeps_feature_order() {
        let spec = PredictSpec::from_values(&[3.0, 1.0, 2.0]).unwrap();
        let req = predict_request(&ModelId::new("m"), &spec);
        assert_eq!(req.features, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_train_reply_conversion() {
        let reply: TrainReply = pb::TrainResponse {
            success: false,
            message: "insufficient data".to_string(),
        }
        .into();
        assert!(!reply.success);
        assert_eq!(reply.message, "insufficient data");
    }
}
