use crate::{build_hayat, AppState};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Router};
use hayat_core::phone;
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;

/// Twilio-style inbound form fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InboundSms {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "To", default)]
    pub to: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/sms", post(inbound_sms))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/webhook/sms",
    request_body(content = InboundSms, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "TwiML reply", content_type = "application/xml"))
)]
pub(crate) async fn inbound_sms(
    State(state): State<AppState>,
    Form(inbound): Form<InboundSms>,
) -> Response {
    let lock = state.locks.lock_for(&inbound.from).await;
    let _guard = lock.lock().await;

    let hayat = match build_hayat(&state) {
        Ok(hayat) => hayat,
        Err(err) => {
            error!(error = %err, "could not open store for webhook");
            return twiml("Service temporarily unavailable.");
        }
    };
    let outcome = hayat.handle_message(&inbound.from, &inbound.body).await;
    info!(
        from = %phone::mask(&inbound.from),
        command = ?outcome.command,
        success = outcome.success,
        "webhook handled"
    );
    twiml(&outcome.reply)
}

fn twiml(reply: &str) -> Response {
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(reply)
    );
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a<b&c>d"), "a&lt;b&amp;c&gt;d");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
