//! Remote worker handles.
//!
//! A [`WorkerHandle`] issues exactly one remote invocation per call against a
//! single worker endpoint, bounded by the caller's deadline. It never retries
//! and holds no business state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use forest_core::{
    HealthStatus, JobOutcome, ModelId, PredictResult, PredictSpec, TrainReply, TrainSpec,
};

mod grpc;
#[cfg(test)]
pub(crate) mod testing;

pub use grpc::GrpcWorker;

/// Shared, type-erased worker handle as owned by the pool.
pub type SharedWorker = Arc<dyn WorkerHandle>;

/// Capability set of one worker endpoint.
///
/// On deadline expiry the in-flight call is dropped (cancelling it) and
/// `TransportFailure{Timeout}` is returned.
#[async_trait]
pub trait WorkerHandle: Send + Sync {
    /// Address this handle talks to.
    fn endpoint(&self) -> &str;

    async fn health(&self, deadline: Duration) -> JobOutcome<HealthStatus>;

    /// Returns the worker's raw reply; its `success` flag is left to the caller.
    async fn train(
        &self,
        model_id: &ModelId,
        spec: &TrainSpec,
        deadline: Duration,
    ) -> JobOutcome<TrainReply>;

    async fn predict(
        &self,
        model_id: &ModelId,
        spec: &PredictSpec,
        deadline: Duration,
    ) -> JobOutcome<PredictResult>;
}
