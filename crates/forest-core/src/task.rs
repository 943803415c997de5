//! Tasks declared in the batch configuration.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// A hyperparameter value as written in configuration.
///
/// Any scalar is accepted at load time; only integers can be sent to a
/// worker, which is checked per task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperparameterValue {
    Integer(i64),
    Float(f64),
    Flag(bool),
    Text(String),
}

impl HyperparameterValue {
    /// The value as an integer, if it is one. `50.0` counts as `50`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 => {
                Some(*v as i64)
            }
            _ => None,
        }
    }
}

impl fmt::Display for HyperparameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Flag(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "'{}'", v),
        }
    }
}

/// One declared training task, as read from configuration.
///
/// Fields are kept raw (notably `task_type`) and default to empty when
/// missing, so that an invalid entry surfaces as a per-task validation
/// failure instead of failing the whole configuration load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task name; the model id is derived from it.
    #[serde(default)]
    pub name: String,

    /// Either "classification" or "regression".
    #[serde(rename = "type", default)]
    pub task_type: String,

    /// Dataset location handed to the worker untouched.
    #[serde(default)]
    pub dataset_path: String,

    /// Label column.
    #[serde(default)]
    pub target_column: String,

    #[serde(default)]
    pub hyperparameters: BTreeMap<String, HyperparameterValue>,

    /// Feature vector to predict once training succeeds.
    #[serde(default)]
    pub test_features: Vec<f64>,
}

impl TaskSpec {
    /// Create a task with no hyperparameters and no test features.
    pub fn new(
        name: impl Into<String>,
        task_type: impl Into<String>,
        dataset_path: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            task_type: task_type.into(),
            dataset_path: dataset_path.into(),
            target_column: target_column.into(),
            hyperparameters: BTreeMap::new(),
            test_features: Vec::new(),
        }
    }

    /// Builder method to add a hyperparameter.
    pub fn with_hyperparameter(mut self, key: impl Into<String>, value: i64) -> Self {
        self.hyperparameters
            .insert(key.into(), HyperparameterValue::Integer(value));
        self
    }

    /// Builder method to set the test features.
    pub fn with_test_features(mut self, features: Vec<f64>) -> Self {
        self.test_features = features;
        self
    }

    /// Whether a Predict job should follow a successful Train.
    pub fn wants_prediction(&self) -> bool {
        !self.test_features.is_empty()
    }

    /// Hyperparameters in the integer form the worker accepts.
    pub fn integer_hyperparameters(&self) -> Result<BTreeMap<String, i64>, ValidationError> {
        self.hyperparameters
            .iter()
            .map(|(name, value)| {
                value
                    .as_integer()
                    .map(|v| (name.clone(), v))
                    .ok_or_else(|| ValidationError::InvalidHyperparameter {
                        name: name.clone(),
                        value: value.to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let task: TaskSpec = serde_json::from_str(r#"{"name": "untyped"}"#).unwrap();
        assert_eq!(task.task_type, "");
        assert_eq!(task.dataset_path, "");
        assert!(task.hyperparameters.is_empty());
    }

    #[test]
    fn test_integer_hyperparameters() {
        let task: TaskSpec = serde_json::from_str(
            r#"{"name": "t", "hyperparameters": {"n_estimators": 50, "max_depth": 8.0}}"#,
        )
        .unwrap();
        let hyper = task.integer_hyperparameters().unwrap();
        assert_eq!(hyper.get("n_estimators"), Some(&50));
        assert_eq!(hyper.get("max_depth"), Some(&8));
    }

    #[test]
    fn test_non_integer_hyperparameters_are_rejected() {
        let mut task = TaskSpec::new("t", "regression", "d.csv", "y");
        task.hyperparameters
            .insert("max_features".to_string(), HyperparameterValue::Float(0.5));
        assert_eq!(
            task.integer_hyperparameters(),
            Err(ValidationError::InvalidHyperparameter {
                name: "max_features".to_string(),
                value: "0.5".to_string(),
            })
        );

        let mut task = TaskSpec::new("t", "regression", "d.csv", "y");
        task.hyperparameters
            .insert("criterion".to_string(), HyperparameterValue::Text("gini".to_string()));
        assert!(task.integer_hyperparameters().is_err());
    }
}
