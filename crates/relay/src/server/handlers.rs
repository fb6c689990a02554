//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{score_message, ErrorResponse, HealthResponse, UpdateRequest},
    Score, ServiceError, UpdateEnvelope,
};
use tracing::{debug, info, warn};

use super::state::AppState;
use crate::scoring::ScoreError;

/// `POST /api/updates` — score a telemetry update and publish it to the broker.
///
/// The body is read as raw text regardless of `Content-Type` and must be a JSON
/// object with an `update` field. Responds `200 OK` with `Your score: <score>`
/// only after the broker has acknowledged the envelope.
pub async fn ingest_update(State(state): State<AppState>, body: String) -> Response {
    info!("update received");

    match relay_update(&state, &body).await {
        Ok(score) => (StatusCode::OK, score_message(score)).into_response(),
        Err(e) => {
            warn!(error = %e, "update rejected");
            error_response(&e)
        }
    }
}

/// Parse, score, wrap, and publish one update. Returns the published score.
async fn relay_update(state: &AppState, body: &str) -> Result<Score, ServiceError> {
    let request: UpdateRequest =
        serde_json::from_str(body).map_err(|e| ServiceError::BadRequest(e.to_string()))?;
    debug!(update = %request.update, "update parsed");

    let score = state.scorer.score(&request.update)?;
    if !score.is_finite() {
        return Err(ScoreError::NotFinite.into());
    }
    let envelope = UpdateEnvelope::build(request.update, score);

    let producer = state.producers.get().await?;

    let payload = serde_json::to_vec(&envelope)
        .map_err(|e| ServiceError::Internal(format!("failed to serialise envelope: {e}")))?;
    let key = state.keys.next();
    producer.publish(key, &payload).await?;

    info!(id = %envelope.id, key, score, "envelope published");
    Ok(envelope.score)
}

/// `GET /health` — liveness check.
///
/// Always `200 OK`; `producer_ready` reports whether the broker producer has
/// been created yet (it is built lazily on the first update).
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        producer_ready: state.producers.is_ready(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Render a [`ServiceError`] as its status code and an [`ErrorResponse`] body.
fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.code(), err.to_string()))).into_response()
}
