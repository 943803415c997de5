//! Health handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use futures_util::future::join_all;

use forest_core::JobDescriptor;

use crate::http::responses::{HealthResponse, WorkerHealthResponse};
use crate::state::AppState;

/// Master liveness. Does not contact any worker.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        workers: state.worker_count(),
    })
}

/// Probe every worker concurrently; 503 unless all of them are healthy.
pub async fn workers_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let probes = state.workers().iter().map(|worker| {
        let gateway = state.gateway.clone();
        async move {
            let outcome = gateway
                .run_on(worker.as_ref(), &JobDescriptor::health_check())
                .await;
            WorkerHealthResponse {
                endpoint: worker.endpoint().to_string(),
                healthy: outcome.is_success(),
                error: outcome.cause(),
            }
        }
    });
    let response: Vec<WorkerHealthResponse> = join_all(probes).await;

    let status = if response.iter().all(|w| w.healthy) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
