pub mod health;
pub mod simulate;
pub mod webhook;

use crate::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(webhook::router(state.clone()))
        .merge(simulate::router(state.clone()))
        .merge(health::router())
        .merge(crate::openapi::router())
        .layer(TraceLayer::new_for_http())
}
