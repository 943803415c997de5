//! Batch orchestrator - runs declared tasks through the gateway.
//!
//! Each task issues a Train job and, when it has test features and training
//! succeeded, a Predict job against the model it just produced. Tasks run
//! with bounded concurrency; the report always follows declaration order.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use forest_core::{
    JobDescriptor, JobKind, ModelId, ReportEntry, RunReport, TaskSpec, ValidationError,
};

use crate::gateway::JobGateway;
use crate::translate;

/// Runs a task list and records one entry per issued job.
pub struct BatchOrchestrator {
    gateway: Arc<JobGateway>,
    max_concurrency: usize,
}

impl BatchOrchestrator {
    /// Create an orchestrator running up to one task per pool member at once.
    pub fn new(gateway: Arc<JobGateway>) -> Self {
        let max_concurrency = gateway.selector().size().max(1);
        Self {
            gateway,
            max_concurrency,
        }
    }

    /// Override the number of tasks in flight. Zero is treated as one.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Run every task to completion.
    pub async fn run(&self, tasks: &[TaskSpec]) -> RunReport {
        self.run_until_cancelled(tasks, &CancellationToken::new()).await
    }

    /// Run tasks until done or until `cancel` fires.
    ///
    /// On cancellation, jobs in flight are recorded as cancelled and tasks
    /// that had not started are left out of the report.
    pub async fn run_until_cancelled(
        &self,
        tasks: &[TaskSpec],
        cancel: &CancellationToken,
    ) -> RunReport {
        info!(
            tasks = tasks.len(),
            max_concurrency = self.max_concurrency,
            "Starting batch run"
        );

        let mut report = RunReport::new();
        let mut results = stream::iter(tasks.iter().map(|task| self.run_task(task, cancel)))
            .buffered(self.max_concurrency);

        while let Some(entries) = results.next().await {
            for entry in entries {
                report.push(entry);
            }
        }

        report.finish(cancel.is_cancelled());
        if report.cancelled {
            warn!(
                recorded = report.len(),
                succeeded = report.succeeded(),
                "Batch run cancelled"
            );
        } else {
            info!(
                recorded = report.len(),
                succeeded = report.succeeded(),
                failed = report.failed(),
                "Batch run finished"
            );
        }
        report
    }

    async fn run_task(&self, task: &TaskSpec, cancel: &CancellationToken) -> Vec<ReportEntry> {
        if cancel.is_cancelled() {
            debug!(task = %task.name, "Skipping task, batch cancelled");
            return Vec::new();
        }

        let mut entries = Vec::with_capacity(2);

        let train = self
            .execute(task, JobKind::Train, translate::task_train_descriptor(task), cancel)
            .await;
        let trained = train.outcome.is_success();
        entries.push(train);

        if trained && task.wants_prediction() && !cancel.is_cancelled() {
            let predict = self
                .execute(task, JobKind::Predict, translate::task_predict_descriptor(task), cancel)
                .await;
            entries.push(predict);
        }

        entries
    }

    async fn execute(
        &self,
        task: &TaskSpec,
        kind: JobKind,
        descriptor: Result<JobDescriptor, ValidationError>,
        cancel: &CancellationToken,
    ) -> ReportEntry {
        let started = Instant::now();
        let (model_id, outcome) = match descriptor {
            Ok(descriptor) => {
                let outcome = self.gateway.run_cancellable(&descriptor, cancel).await;
                (descriptor.job_id().clone(), outcome)
            }
            Err(cause) => {
                warn!(task = %task.name, kind = %kind, error = %cause, "Task failed validation");
                (ModelId::for_task(&task.name), JobGateway::reject(cause))
            }
        };

        ReportEntry {
            task_name: task.name.clone(),
            model_id,
            kind,
            outcome,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}
