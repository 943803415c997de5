//! Job descriptors: the canonical unit of work sent to a worker.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ModelId, ValidationError};

/// Estimator count used when neither the request nor its hyperparameters name one.
pub const DEFAULT_N_ESTIMATORS: i32 = 100;

/// Below this magnitude every integer is exactly representable as `f32`.
const F32_EXACT_INTEGER_LIMIT: f64 = 16_777_216.0;

/// Kind of remote operation a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Train,
    Predict,
    HealthCheck,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Predict => "predict",
            Self::HealthCheck => "health_check",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learning problem a Train job solves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Classification,
    Regression,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classification => "classification",
            Self::Regression => "regression",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing is case-sensitive; anything but the two literals is rejected.
impl FromStr for TaskType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classification" => Ok(Self::Classification),
            "regression" => Ok(Self::Regression),
            other => Err(ValidationError::InvalidTaskType(other.to_string())),
        }
    }
}

/// Validated parameters of a Train job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainSpec {
    dataset_reference: String,
    task_type: TaskType,
    target_column: String,
    n_estimators: i32,
    hyperparameters: BTreeMap<String, i64>,
}

impl TrainSpec {
    /// Build a Train spec, rejecting empty dataset references and target columns.
    ///
    /// `n_estimators` resolves in order: the explicit value, the
    /// `n_estimators` hyperparameter, [`DEFAULT_N_ESTIMATORS`]. The
    /// hyperparameter map itself is kept as-is for the worker.
    pub fn new(
        dataset_reference: impl Into<String>,
        task_type: TaskType,
        target_column: impl Into<String>,
        n_estimators: Option<i64>,
        hyperparameters: BTreeMap<String, i64>,
    ) -> Result<Self, ValidationError> {
        let dataset_reference = dataset_reference.into();
        if dataset_reference.trim().is_empty() {
            return Err(ValidationError::MissingField("dataset_url"));
        }

        let target_column = target_column.into();
        if target_column.trim().is_empty() {
            return Err(ValidationError::MissingField("target_column"));
        }

        let requested = n_estimators
            .or_else(|| hyperparameters.get("n_estimators").copied())
            .unwrap_or(i64::from(DEFAULT_N_ESTIMATORS));
        // Range checks belong to the worker; only the wire width is enforced.
        let n_estimators = i32::try_from(requested)
            .map_err(|_| ValidationError::InvalidEstimators { value: requested })?;

        Ok(Self {
            dataset_reference,
            task_type,
            target_column,
            n_estimators,
            hyperparameters,
        })
    }

    pub fn dataset_reference(&self) -> &str {
        &self.dataset_reference
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    pub fn n_estimators(&self) -> i32 {
        self.n_estimators
    }

    pub fn hyperparameters(&self) -> &BTreeMap<String, i64> {
        &self.hyperparameters
    }
}

/// Validated parameters of a Predict job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictSpec {
    features: Vec<f32>,
}

impl PredictSpec {
    /// Convert caller-supplied values into a feature vector.
    ///
    /// The wire carries `f32`. Fractional digits beyond `f32` precision are
    /// rounded to the nearest representable value. Values at or above 2^24 in
    /// magnitude, where `f32` can no longer hold every integer, must survive
    /// the narrowing exactly; anything else, and any non-finite result, is
    /// rejected.
    pub fn from_values(values: &[f64]) -> Result<Self, ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::EmptyFeatures);
        }

        let features = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let narrowed = value as f32;
                let exact = value.abs() < F32_EXACT_INTEGER_LIMIT || f64::from(narrowed) == value;
                if narrowed.is_finite() && exact {
                    Ok(narrowed)
                } else {
                    Err(ValidationError::FeatureOutOfRange { index, value })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { features })
    }

    pub fn features(&self) -> &[f32] {
        &self.features
    }
}

/// Kind-specific part of a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobPayload {
    Train(TrainSpec),
    Predict(PredictSpec),
    HealthCheck,
}

/// One unit of work for a worker.
///
/// Only constructible from already-validated specs, so a malformed request
/// never reaches the gateway's dispatch stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDescriptor {
    job_id: ModelId,
    payload: JobPayload,
}

impl JobDescriptor {
    /// A Train job; `job_id` is the id the trained model will be stored under.
    pub fn train(job_id: ModelId, spec: TrainSpec) -> Self {
        Self {
            job_id,
            payload: JobPayload::Train(spec),
        }
    }

    /// A Predict job against an existing model.
    pub fn predict(model_id: ModelId, spec: PredictSpec) -> Self {
        Self {
            job_id: model_id,
            payload: JobPayload::Predict(spec),
        }
    }

    /// A liveness probe.
    pub fn health_check() -> Self {
        Self {
            job_id: ModelId::generate(),
            payload: JobPayload::HealthCheck,
        }
    }

    pub fn job_id(&self) -> &ModelId {
        &self.job_id
    }

    pub fn payload(&self) -> &JobPayload {
        &self.payload
    }

    pub fn kind(&self) -> JobKind {
        match self.payload {
            JobPayload::Train(_) => JobKind::Train,
            JobPayload::Predict(_) => JobKind::Predict,
            JobPayload::HealthCheck => JobKind::HealthCheck,
        }
    }
}
