//! Job gateway - validates, dispatches and classifies single jobs.
//!
//! Each job moves through `Received -> Validated -> Dispatched ->
//! {Completed | Failed}`. A job is dispatched at most once; retrying is left
//! to the caller so Train never runs twice on a worker by accident.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use forest_core::{
    JobDescriptor, JobOutcome, JobPayload, JobResult, ModelId, TrainResult, TransportFailureKind,
    ValidationError,
};

use crate::pool::WorkerSelector;
use crate::translate::{self, ExternalRequest, ExternalResponse};
use crate::worker::WorkerHandle;

/// Per-kind deadlines for remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    pub train: Duration,
    pub predict: Duration,
    pub health: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            train: Duration::from_secs(10),
            predict: Duration::from_secs(5),
            health: Duration::from_secs(2),
        }
    }
}

/// Lifecycle phase of a job, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Received,
    Validated,
    Dispatched,
    Completed,
    Failed,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Dispatched => "dispatched",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Synchronous entry point for single jobs.
pub struct JobGateway {
    selector: Arc<dyn WorkerSelector>,
    deadlines: Deadlines,
}

impl JobGateway {
    /// Create a new JobGateway.
    pub fn new(selector: Arc<dyn WorkerSelector>, deadlines: Deadlines) -> Self {
        Self {
            selector,
            deadlines,
        }
    }

    pub fn selector(&self) -> &Arc<dyn WorkerSelector> {
        &self.selector
    }

    pub fn deadlines(&self) -> Deadlines {
        self.deadlines
    }

    /// Full request path: validate, run, and translate back.
    pub async fn handle(&self, request: ExternalRequest) -> ExternalResponse {
        let (job_id, outcome) = self.submit(request).await;
        translate::to_external_result(&outcome, job_id.as_ref())
    }

    /// Validate an external request and run it.
    ///
    /// Returns the job id when validation got far enough to assign one.
    pub async fn submit(&self, request: ExternalRequest) -> (Option<ModelId>, JobOutcome<JobResult>) {
        debug!(phase = %JobPhase::Received, "Job received");
        match translate::to_job_descriptor(request) {
            Ok(descriptor) => {
                let outcome = self.run(&descriptor).await;
                (Some(descriptor.job_id().clone()), outcome)
            }
            Err(cause) => (None, Self::reject(cause)),
        }
    }

    /// Record a request that never became a job.
    pub fn reject(cause: ValidationError) -> JobOutcome<JobResult> {
        warn!(phase = %JobPhase::Failed, error = %cause, "Job rejected before dispatch");
        JobOutcome::invalid(cause)
    }

    /// Run a validated job on the next selected worker.
    pub async fn run(&self, descriptor: &JobDescriptor) -> JobOutcome<JobResult> {
        let worker = self.selector.select();
        self.run_on(worker.as_ref(), descriptor).await
    }

    /// Run a validated job on a specific worker, bypassing selection.
    pub async fn run_on(
        &self,
        worker: &dyn WorkerHandle,
        descriptor: &JobDescriptor,
    ) -> JobOutcome<JobResult> {
        let job_id = descriptor.job_id();
        let kind = descriptor.kind();
        debug!(job_id = %job_id, kind = %kind, phase = %JobPhase::Validated, "Job validated");

        let started = Instant::now();
        debug!(
            job_id = %job_id,
            kind = %kind,
            worker = worker.endpoint(),
            phase = %JobPhase::Dispatched,
            "Dispatching job"
        );
        let outcome = self.dispatch(worker, descriptor).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            JobOutcome::Success { .. } => info!(
                job_id = %job_id,
                kind = %kind,
                worker = worker.endpoint(),
                elapsed_ms,
                phase = %JobPhase::Completed,
                "Job completed"
            ),
            failure => warn!(
                job_id = %job_id,
                kind = %kind,
                worker = worker.endpoint(),
                elapsed_ms,
                phase = %JobPhase::Failed,
                outcome = failure.label(),
                error = %failure.cause().unwrap_or_default(),
                "Job failed"
            ),
        }

        outcome
    }

    /// Run a job unless `cancel` fires first.
    ///
    /// A job cancelled in flight has its remote call dropped and is reported
    /// as `TransportFailure{Cancelled}`.
    pub async fn run_cancellable(
        &self,
        descriptor: &JobDescriptor,
        cancel: &CancellationToken,
    ) -> JobOutcome<JobResult> {
        if cancel.is_cancelled() {
            return cancelled(descriptor.job_id());
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(job_id = %descriptor.job_id(), phase = %JobPhase::Failed, "Job cancelled in flight");
                cancelled(descriptor.job_id())
            }
            outcome = self.run(descriptor) => outcome,
        }
    }

    /// Issue the single remote call matching the job kind.
    async fn dispatch(
        &self,
        worker: &dyn WorkerHandle,
        descriptor: &JobDescriptor,
    ) -> JobOutcome<JobResult> {
        let job_id = descriptor.job_id();
        match descriptor.payload() {
            JobPayload::Train(spec) => {
                let deadline = self.deadlines.train;
                bounded(deadline, worker.train(job_id, spec, deadline))
                    .await
                    .and_then(|reply| {
                        // Transport success can still carry a logical failure.
                        if reply.success {
                            JobOutcome::success(JobResult::Trained(TrainResult {
                                model_id: job_id.clone(),
                                message: reply.message,
                            }))
                        } else {
                            JobOutcome::rejected(reply.message)
                        }
                    })
            }
            JobPayload::Predict(spec) => {
                let deadline = self.deadlines.predict;
                bounded(deadline, worker.predict(job_id, spec, deadline))
                    .await
                    .map(JobResult::Predicted)
            }
            JobPayload::HealthCheck => {
                let deadline = self.deadlines.health;
                bounded(deadline, worker.health(deadline))
                    .await
                    .and_then(|status| {
                        if status.healthy {
                            JobOutcome::success(JobResult::Health(status))
                        } else {
                            JobOutcome::rejected("worker reported unhealthy")
                        }
                    })
            }
        }
    }
}

/// Enforce `deadline` regardless of how the worker handle behaves.
async fn bounded<T>(deadline: Duration, call: impl Future<Output = JobOutcome<T>>) -> JobOutcome<T> {
    match tokio::time::timeout(deadline, call).await {
        Ok(outcome) => outcome,
        Err(_) => JobOutcome::transport(
            TransportFailureKind::Timeout,
            format!("worker did not reply within {}ms", deadline.as_millis()),
        ),
    }
}

fn cancelled(job_id: &ModelId) -> JobOutcome<JobResult> {
    JobOutcome::transport(
        TransportFailureKind::Cancelled,
        format!("job {} cancelled before the worker replied", job_id),
    )
}
