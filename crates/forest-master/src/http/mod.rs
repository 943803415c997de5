//! HTTP surface of the master.
//!
//! Provides endpoints for:
//! - Training (`POST /train`)
//! - Prediction (`POST /predict/:model_id`)
//! - Master liveness (`/health`)
//! - Worker health fan-out (`/v1/workers/health`)

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod handlers;
pub mod responses;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Job routes
        .route("/train", post(handlers::train))
        .route("/predict/:model_id", post(handlers::predict))
        // Observability routes
        .route("/health", get(handlers::health_check))
        .route("/v1/workers/health", get(handlers::workers_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use forest_core::{HealthStatus, JobOutcome, TransportFailureKind};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::gateway::{Deadlines, JobGateway};
    use crate::pool::WorkerPool;
    use crate::worker::testing::{erase, ScriptedWorker};

    fn router(workers: &[&Arc<ScriptedWorker>]) -> Router {
        let pool = WorkerPool::new(workers.iter().map(|w| erase(w)).collect()).unwrap();
        let gateway = JobGateway::new(Arc::new(pool), Deadlines::default());
        create_router(AppState::new(Arc::new(gateway)))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_train_returns_generated_model_id() {
        let worker = ScriptedWorker::new("w1").shared();
        let body = r#"{"dataset_url":"s3://datasets/iris.csv","task_type":"classification","target_column":"species","n_estimators":10}"#;

        let (status, json) = send(router(&[&worker]), post_json("/train", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "completed");
        let model_id = json["model_id"].as_str().unwrap();
        assert_eq!(model_id.len(), 36);
        assert_eq!(
            json["message"],
            format!("Training completed. Saved to s3://models/{}.joblib", model_id)
        );
        assert_eq!(worker.seen(), vec![model_id.to_string()]);
    }

    #[tokio::test]
    async fn test_train_rejection_is_a_server_error() {
        let worker = ScriptedWorker::new("w1")
            .with_train_reply(false, "insufficient data")
            .shared();
        let body = r#"{"dataset_url":"s3://d.csv","task_type":"regression","target_column":"y","model_id":"m-1"}"#;

        let (status, json) = send(router(&[&worker]), post_json("/train", body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            json!({
                "error": "insufficient data",
                "kind": "worker_rejected",
                "status": "failed",
                "model_id": "m-1",
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_task_type_is_bad_request() {
        let worker = ScriptedWorker::new("w1").shared();
        let body = r#"{"dataset_url":"s3://d.csv","task_type":"Classification","target_column":"y"}"#;

        let (status, json) = send(router(&[&worker]), post_json("/train", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "validation_failure");
        assert_eq!(
            json["error"],
            "invalid task_type 'Classification': expected 'classification' or 'regression'"
        );
        assert!(json.get("model_id").is_none());
        assert_eq!(worker.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let worker = ScriptedWorker::new("w1").shared();

        let (status, json) = send(router(&[&worker]), post_json("/train", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "validation_failure");
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("malformed request body: "));

        let request = Request::builder()
            .method("POST")
            .uri("/predict/model-1")
            .body(Body::from(r#"{"features":[1.0]}"#))
            .unwrap();
        let (status, _) = send(router(&[&worker]), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(worker.calls(), 0);
    }

    #[tokio::test]
    async fn test_predict_echoes_model_id() {
        let worker = ScriptedWorker::new("w1").shared();

        let (status, json) = send(
            router(&[&worker]),
            post_json("/predict/model-iris", r#"{"features":[5.1,3.5,1.4,0.2]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"model_id": "model-iris", "prediction": "setosa"}));
    }

    #[tokio::test]
    async fn test_predict_with_empty_features_is_bad_request() {
        let worker = ScriptedWorker::new("w1").shared();

        let (status, json) = send(
            router(&[&worker]),
            post_json("/predict/model-iris", r#"{"features":[]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "features must not be empty");
        assert_eq!(worker.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_predict_timeout_is_gateway_timeout() {
        let worker = ScriptedWorker::new("w1")
            .with_delay(Duration::from_secs(30))
            .shared();

        let (status, json) = send(
            router(&[&worker]),
            post_json("/predict/model-iris", r#"{"features":[1.0]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["model_id"], "model-iris");
    }

    #[tokio::test]
    async fn test_unreachable_worker_is_bad_gateway() {
        let worker = ScriptedWorker::new("w1")
            .with_train(|_| {
                JobOutcome::transport(TransportFailureKind::Unreachable, "connection refused")
            })
            .shared();
        let body = r#"{"dataset_url":"s3://d.csv","task_type":"regression","target_column":"y"}"#;

        let (status, json) = send(router(&[&worker]), post_json("/train", body)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "connection refused");
        assert_eq!(json["kind"], "unreachable");
    }

    #[tokio::test]
    async fn test_health_does_not_contact_workers() {
        let a = ScriptedWorker::new("a").shared();
        let b = ScriptedWorker::new("b").shared();
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let (status, json) = send(router(&[&a, &b]), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"status": "ok", "workers": 2}));
        assert_eq!(a.calls() + b.calls(), 0);
    }

    #[tokio::test]
    async fn test_workers_health_probes_every_worker() {
        let a = ScriptedWorker::new("a").shared();
        let b = ScriptedWorker::new("b")
            .with_health(JobOutcome::success(HealthStatus { healthy: false }))
            .shared();
        let app = router(&[&a, &b]);

        let request = Request::get("/v1/workers/health").body(Body::empty()).unwrap();
        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json,
            json!([
                {"endpoint": "a", "healthy": true},
                {"endpoint": "b", "healthy": false, "error": "worker reported unhealthy"},
            ])
        );
        assert_eq!(a.health_calls(), 1);
        assert_eq!(b.health_calls(), 1);
    }
}
