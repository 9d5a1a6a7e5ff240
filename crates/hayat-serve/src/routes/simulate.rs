use crate::{build_hayat, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use hayat_core::types::DispatchOutcome;
use serde::Deserialize;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SimulateMessage {
    pub from: String,
    pub body: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/simulate", post(simulate))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/simulate",
    request_body = SimulateMessage,
    responses(
        (status = 200, description = "Dispatch outcome", body = DispatchOutcome),
        (status = 500, description = "Store unavailable")
    )
)]
pub(crate) async fn simulate(
    State(state): State<AppState>,
    Json(message): Json<SimulateMessage>,
) -> Response {
    let lock = state.locks.lock_for(&message.from).await;
    let _guard = lock.lock().await;

    let hayat = match build_hayat(&state) {
        Ok(hayat) => hayat,
        Err(err) => {
            error!(error = %err, "could not open store for simulate");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let outcome = hayat.handle_message(&message.from, &message.body).await;
    Json(outcome).into_response()
}
