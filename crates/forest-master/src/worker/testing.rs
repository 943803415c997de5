//! In-process worker with scripted replies, for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use forest_core::{
    HealthStatus, JobOutcome, ModelId, PredictResult, PredictSpec, TrainReply, TrainSpec,
};

use super::{SharedWorker, WorkerHandle};

type TrainScript = Box<dyn Fn(&ModelId) -> JobOutcome<TrainReply> + Send + Sync>;
type PredictScript = Box<dyn Fn(&ModelId, &[f32]) -> JobOutcome<PredictResult> + Send + Sync>;
type DelayScript = Box<dyn Fn(&ModelId) -> Duration + Send + Sync>;

/// Worker double that replies from closures and counts calls.
pub(crate) struct ScriptedWorker {
    endpoint: String,
    health: JobOutcome<HealthStatus>,
    train: TrainScript,
    predict: PredictScript,
    delay: DelayScript,
    health_calls: AtomicUsize,
    train_calls: AtomicUsize,
    predict_calls: AtomicUsize,
    /// Model ids in the order calls reached this worker.
    seen: Mutex<Vec<String>>,
}

impl ScriptedWorker {
    /// A healthy worker whose Train succeeds and whose Predict answers "setosa".
    pub(crate) fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            health: JobOutcome::success(HealthStatus { healthy: true }),
            train: Box::new(|id| {
                JobOutcome::success(TrainReply {
                    success: true,
                    message: format!("Training completed. Saved to s3://models/{}.joblib", id),
                })
            }),
            predict: Box::new(|id, _| {
                JobOutcome::success(PredictResult {
                    model_id: id.clone(),
                    prediction: "setosa".to_string(),
                })
            }),
            delay: Box::new(|_| Duration::ZERO),
            health_calls: AtomicUsize::new(0),
            train_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_health(mut self, outcome: JobOutcome<HealthStatus>) -> Self {
        self.health = outcome;
        self
    }

    pub(crate) fn with_train(
        mut self,
        script: impl Fn(&ModelId) -> JobOutcome<TrainReply> + Send + Sync + 'static,
    ) -> Self {
        self.train = Box::new(script);
        self
    }

    /// Every Train call gets the same reply.
    pub(crate) fn with_train_reply(self, success: bool, message: &str) -> Self {
        let message = message.to_string();
        self.with_train(move |_| {
            JobOutcome::success(TrainReply {
                success,
                message: message.clone(),
            })
        })
    }

    pub(crate) fn with_predict(
        mut self,
        script: impl Fn(&ModelId, &[f32]) -> JobOutcome<PredictResult> + Send + Sync + 'static,
    ) -> Self {
        self.predict = Box::new(script);
        self
    }

    pub(crate) fn with_delay(self, delay: Duration) -> Self {
        self.with_delay_for(move |_| delay)
    }

    pub(crate) fn with_delay_for(
        mut self,
        script: impl Fn(&ModelId) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.delay = Box::new(script);
        self
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn train_calls(&self) -> usize {
        self.train_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> usize {
        self.health_calls() + self.train_calls() + self.predict_calls()
    }

    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    async fn pause(&self, model_id: &ModelId) {
        self.seen.lock().unwrap().push(model_id.as_str().to_string());
        let delay = (self.delay)(model_id);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Erase a scripted worker for pool construction.
pub(crate) fn erase(worker: &Arc<ScriptedWorker>) -> SharedWorker {
    worker.clone()
}

#[async_trait]
impl WorkerHandle for ScriptedWorker {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn health(&self, _deadline: Duration) -> JobOutcome<HealthStatus> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.health.clone()
    }

    async fn train(
        &self,
        model_id: &ModelId,
        _spec: &TrainSpec,
        _deadline: Duration,
    ) -> JobOutcome<TrainReply> {
        self.train_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(model_id).await;
        (self.train)(model_id)
    }

    async fn predict(
        &self,
        model_id: &ModelId,
        spec: &PredictSpec,
        _deadline: Duration,
    ) -> JobOutcome<PredictResult> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(model_id).await;
        (self.predict)(model_id, spec.features())
    }
}
