//! Request translation between the external surface and job descriptors.
//!
//! Inbound, every request is validated before a [`JobDescriptor`] exists.
//! Outbound, a [`JobOutcome`] becomes a status code and JSON body; failure
//! causes are passed through verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use forest_core::{
    JobDescriptor, JobOutcome, JobResult, ModelId, PredictSpec, TaskSpec, TaskType, TrainSpec,
    TransportFailureKind, ValidationError,
};

use crate::http::responses::{
    ErrorResponse, PredictRequest, PredictResponse, ProbeResponse, TrainRequest, TrainResponse,
};

/// A request as received from a caller.
#[derive(Debug, Clone)]
pub enum ExternalRequest {
    Train(TrainRequest),
    Predict {
        model_id: String,
        body: PredictRequest,
    },
    HealthCheck,
}

/// Validate an external request and turn it into a job.
///
/// Train requests get a fresh model id unless the caller supplied one.
/// Predict requests always use the caller's model id; whether that model
/// exists is for the worker to decide.
pub fn to_job_descriptor(request: ExternalRequest) -> Result<JobDescriptor, ValidationError> {
    match request {
        ExternalRequest::Train(req) => {
            let task_type: TaskType = req.task_type.parse()?;
            let spec = TrainSpec::new(
                req.dataset_url,
                task_type,
                req.target_column,
                req.n_estimators,
                req.hyperparameters,
            )?;
            let job_id = match req.model_id {
                Some(id) if id.trim().is_empty() => {
                    return Err(ValidationError::MissingField("model_id"))
                }
                Some(id) => ModelId::new(id),
                None => ModelId::generate(),
            };
            Ok(JobDescriptor::train(job_id, spec))
        }
        ExternalRequest::Predict { model_id, body } => {
            if model_id.trim().is_empty() {
                return Err(ValidationError::MissingField("model_id"));
            }
            let spec = PredictSpec::from_values(&body.features)?;
            Ok(JobDescriptor::predict(ModelId::new(model_id), spec))
        }
        ExternalRequest::HealthCheck => Ok(JobDescriptor::health_check()),
    }
}

/// Train job for a declared task. The model id is `model-<name>`.
pub fn task_train_descriptor(task: &TaskSpec) -> Result<JobDescriptor, ValidationError> {
    if task.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    let task_type: TaskType = task.task_type.parse()?;
    let spec = TrainSpec::new(
        task.dataset_path.clone(),
        task_type,
        task.target_column.clone(),
        None,
        task.integer_hyperparameters()?,
    )?;
    Ok(JobDescriptor::train(ModelId::for_task(&task.name), spec))
}

/// Predict job over a declared task's test features, against the model its
/// Train job produced.
pub fn task_predict_descriptor(task: &TaskSpec) -> Result<JobDescriptor, ValidationError> {
    let spec = PredictSpec::from_values(&task.test_features)?;
    Ok(JobDescriptor::predict(ModelId::for_task(&task.name), spec))
}

/// JSON body of an external response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Train(TrainResponse),
    Predict(PredictResponse),
    Probe(ProbeResponse),
    Error(ErrorResponse),
}

/// Status code plus body, ready to be written by the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl ExternalResponse {
    /// Serialized body bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.body)
    }
}

impl IntoResponse for ExternalResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Map an outcome to the caller-facing response.
///
/// `job_id` is echoed in error bodies when the job got far enough to have one.
pub fn to_external_result(
    outcome: &JobOutcome<JobResult>,
    job_id: Option<&ModelId>,
) -> ExternalResponse {
    match outcome {
        JobOutcome::Success { payload } => ExternalResponse {
            status: StatusCode::OK,
            body: match payload {
                JobResult::Trained(trained) => ResponseBody::Train(TrainResponse {
                    model_id: trained.model_id.to_string(),
                    status: "completed".to_string(),
                    message: trained.message.clone(),
                }),
                JobResult::Predicted(predicted) => ResponseBody::Predict(PredictResponse {
                    model_id: predicted.model_id.to_string(),
                    prediction: predicted.prediction.clone(),
                }),
                JobResult::Health(health) => ResponseBody::Probe(ProbeResponse {
                    healthy: health.healthy,
                }),
            },
        },
        JobOutcome::WorkerRejected { message } => {
            // The worker ran and refused; callers see a server error.
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "worker_rejected", message, job_id)
        }
        JobOutcome::TransportFailure { kind, cause } => {
            let status = match kind {
                TransportFailureKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                TransportFailureKind::Unreachable | TransportFailureKind::ProtocolError => {
                    StatusCode::BAD_GATEWAY
                }
                TransportFailureKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            };
            error_response(status, kind.as_str(), cause, job_id)
        }
        JobOutcome::ValidationFailure { cause } => error_response(
            StatusCode::BAD_REQUEST,
            "validation_failure",
            &cause.to_string(),
            job_id,
        ),
    }
}

fn error_response(
    status: StatusCode,
    kind: &str,
    cause: &str,
    job_id: Option<&ModelId>,
) -> ExternalResponse {
    ExternalResponse {
        status,
        body: ResponseBody::Error(ErrorResponse {
            error: cause.to_string(),
            kind: kind.to_string(),
            status: "failed".to_string(),
            model_id: job_id.map(ModelId::to_string),
        }),
    }
}
