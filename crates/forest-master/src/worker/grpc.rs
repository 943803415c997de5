//! gRPC implementation of [`WorkerHandle`].

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Request, Response, Status, TimeoutExpired};
use tracing::{debug, warn};

use forest_core::{
    HealthStatus, JobOutcome, ModelId, PredictResult, PredictSpec, TrainReply, TrainSpec,
    TransportFailureKind,
};
use forest_proto::convert::{predict_request, train_request};
use forest_proto::pb::HealthRequest;
use forest_proto::WorkerClient;

use super::WorkerHandle;

/// Prefix tonic's generated clients put on errors from a channel that never
/// became ready, i.e. a connection that could not be (re)established.
const NOT_READY_PREFIX: &str = "Service was not ready";

/// Handle to one worker reached over gRPC.
///
/// The channel is established on first use and reused afterwards; tonic
/// reconnects it transparently if the worker restarts. Dropping the handle
/// closes the connection.
pub struct GrpcWorker {
    address: String,
    endpoint: Endpoint,
    channel: OnceCell<Channel>,
}

impl GrpcWorker {
    /// Build a handle without connecting.
    pub fn new(address: &str, connect_timeout: Duration) -> Result<Self, tonic::transport::Error> {
        let endpoint = Endpoint::from_shared(address.to_string())?.connect_timeout(connect_timeout);

        Ok(Self {
            address: address.to_string(),
            endpoint,
            channel: OnceCell::new(),
        })
    }

    async fn client(&self) -> Result<WorkerClient<Channel>, tonic::transport::Error> {
        let channel = self
            .channel
            .get_or_try_init(|| async {
                debug!(worker = %self.address, "Connecting to worker");
                self.endpoint.connect().await
            })
            .await?;
        Ok(WorkerClient::new(channel.clone()))
    }

    /// Run one unary call under `deadline`, classifying every failure.
    async fn call<T, F, Fut>(&self, rpc: &'static str, deadline: Duration, f: F) -> JobOutcome<T>
    where
        F: FnOnce(WorkerClient<Channel>) -> Fut,
        Fut: Future<Output = Result<Response<T>, Status>>,
    {
        let attempt = async {
            let client = match self.client().await {
                Ok(client) => client,
                Err(e) => {
                    warn!(worker = %self.address, rpc, error = %error_chain(&e), "Worker unreachable");
                    return JobOutcome::transport(
                        TransportFailureKind::Unreachable,
                        format!("failed to connect to worker {}: {}", self.address, error_chain(&e)),
                    );
                }
            };

            match f(client).await {
                Ok(response) => JobOutcome::success(response.into_inner()),
                Err(status) if is_local_timeout(&status) => {
                    self.deadline_exceeded(rpc, deadline)
                }
                Err(status) => {
                    debug!(worker = %self.address, rpc, code = ?status.code(), "Worker call failed");
                    classify_status(&status)
                }
            }
        };

        // Dropping `attempt` on expiry cancels the HTTP/2 stream.
        match tokio::time::timeout(deadline, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => self.deadline_exceeded(rpc, deadline),
        }
    }

    fn deadline_exceeded<T>(&self, rpc: &str, deadline: Duration) -> JobOutcome<T> {
        JobOutcome::transport(
            TransportFailureKind::Timeout,
            format!(
                "{} call to worker {} exceeded deadline of {}ms",
                rpc,
                self.address,
                deadline.as_millis()
            ),
        )
    }
}

/// True for the status tonic's channel returns when the request's own
/// `grpc-timeout` elapses before a reply. It races the outer deadline and
/// carries no source, only the `TimeoutExpired` text under `CANCELLED`.
fn is_local_timeout(status: &Status) -> bool {
    status.code() == Code::Cancelled && status.message() == TimeoutExpired(()).to_string()
}

/// Wrap a message with the deadline advertised to the worker.
fn with_deadline<T>(message: T, deadline: Duration) -> Request<T> {
    let mut request = Request::new(message);
    request.set_timeout(deadline);
    request
}

#[async_trait]
impl WorkerHandle for GrpcWorker {
    fn endpoint(&self) -> &str {
        &self.address
    }

    async fn health(&self, deadline: Duration) -> JobOutcome<HealthStatus> {
        self.call("Health", deadline, |mut client| async move {
            client.health(with_deadline(HealthRequest {}, deadline)).await
        })
        .await
        .map(HealthStatus::from)
    }

    async fn train(
        &self,
        model_id: &ModelId,
        spec: &TrainSpec,
        deadline: Duration,
    ) -> JobOutcome<TrainReply> {
        let request = with_deadline(train_request(model_id, spec), deadline);
        self.call("Train", deadline, |mut client| async move { client.train(request).await })
            .await
            .map(TrainReply::from)
    }

    async fn predict(
        &self,
        model_id: &ModelId,
        spec: &PredictSpec,
        deadline: Duration,
    ) -> JobOutcome<PredictResult> {
        let request = with_deadline(predict_request(model_id, spec), deadline);
        self.call("Predict", deadline, |mut client| async move {
            client.predict(request).await
        })
        .await
        .map(|reply| PredictResult {
            model_id: model_id.clone(),
            prediction: reply.prediction,
        })
    }
}

/// Map a gRPC status onto the outcome taxonomy.
///
/// Workers report logical failures (unknown model, bad dataset) through
/// application status codes; those become `WorkerRejected` with the worker's
/// own message.
fn classify_status<T>(status: &Status) -> JobOutcome<T> {
    let message = if status.message().is_empty() {
        status.code().description().to_string()
    } else {
        status.message().to_string()
    };

    match status.code() {
        Code::Unavailable => JobOutcome::transport(TransportFailureKind::Unreachable, message),
        Code::Unknown if message.starts_with(NOT_READY_PREFIX) => {
            JobOutcome::transport(TransportFailureKind::Unreachable, message)
        }
        Code::DeadlineExceeded => JobOutcome::transport(TransportFailureKind::Timeout, message),
        Code::Cancelled if is_local_timeout(status) => {
            JobOutcome::transport(TransportFailureKind::Timeout, message)
        }
        Code::Internal
        | Code::InvalidArgument
        | Code::NotFound
        | Code::FailedPrecondition
        | Code::Aborted
        | Code::OutOfRange => JobOutcome::rejected(message),
        _ => JobOutcome::transport(TransportFailureKind::ProtocolError, message),
    }
}

/// Render an error with its full source chain.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
