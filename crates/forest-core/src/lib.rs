//! Forest Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/gRPC
//! - HTTP
//! - Runtime specifics
//!
//! Everything the job gateway passes between its stages lives here: job
//! descriptors, outcomes, declared batch tasks and run reports.

pub mod error;
pub mod ids;
pub mod job;
pub mod outcome;
pub mod report;
pub mod result;
pub mod task;

// Re-export commonly used types
pub use error::ValidationError;
pub use ids::ModelId;
pub use job::{JobDescriptor, JobKind, JobPayload, PredictSpec, TaskType, TrainSpec};
pub use outcome::{JobOutcome, TransportFailureKind};
pub use report::{ReportEntry, RunReport};
pub use result::{HealthStatus, JobResult, PredictResult, TrainReply, TrainResult};
pub use task::{HyperparameterValue, TaskSpec};
