use utoipa::OpenApi;

use crate::routes::health::Health;
use crate::routes::simulate::SimulateMessage;
use crate::routes::webhook::InboundSms;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use hayat_core::types::enums::{
    Availability, CommandKind, DialoguePhase, DialogueStatus, Language, RequestCategory,
    RequestStatus, RiskLevel, SkillType, TranscriptRole,
};
use hayat_core::types::{DispatchOutcome, Eligibility};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::webhook::inbound_sms,
        crate::routes::simulate::simulate,
        crate::routes::health::health
    ),
    components(schemas(
        InboundSms,
        SimulateMessage,
        DispatchOutcome,
        Health,
        Eligibility,
        Language,
        RiskLevel,
        SkillType,
        Availability,
        RequestCategory,
        RequestStatus,
        DialoguePhase,
        DialogueStatus,
        CommandKind,
        TranscriptRole
    ))
)]
struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
