//! Train and predict handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use forest_core::ValidationError;

use crate::gateway::JobGateway;
use crate::http::responses::{PredictRequest, TrainRequest};
use crate::state::AppState;
use crate::translate::{self, ExternalRequest, ExternalResponse};

/// Train a model on one worker.
pub async fn train(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TrainRequest>, JsonRejection>,
) -> ExternalResponse {
    match body {
        Ok(Json(request)) => state.gateway.handle(ExternalRequest::Train(request)).await,
        Err(rejection) => malformed(rejection),
    }
}

/// Predict with a previously trained model.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Path(model_id): Path<String>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> ExternalResponse {
    match body {
        Ok(Json(body)) => {
            state
                .gateway
                .handle(ExternalRequest::Predict { model_id, body })
                .await
        }
        Err(rejection) => malformed(rejection),
    }
}

/// Undecodable bodies are validation failures like any other bad input.
fn malformed(rejection: JsonRejection) -> ExternalResponse {
    let outcome = JobGateway::reject(ValidationError::MalformedBody(rejection.body_text()));
    translate::to_external_result(&outcome, None)
}
