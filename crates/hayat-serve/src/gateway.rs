//! Outbound SMS transport implementations. Delivery is fire-and-forget:
//! a failed POST is logged and dropped, never retried here.

use async_trait::async_trait;
use hayat_core::phone;
use hayat_core::sms::SmsGateway;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Serialize)]
struct OutboundSms<'a> {
    to: &'a str,
    body: &'a str,
}

/// POSTs each message as JSON to a configured relay endpoint.
pub struct HttpGateway {
    url: String,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SmsGateway for HttpGateway {
    async fn send(&self, to: &str, body: &str) {
        let payload = OutboundSms { to, body };
        match self.http.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!(to = %phone::mask(to), "sms handed to gateway");
            }
            Ok(response) => {
                warn!(to = %phone::mask(to), status = %response.status(), "sms gateway rejected message");
            }
            Err(err) => {
                warn!(to = %phone::mask(to), error = %err, "sms gateway unreachable");
            }
        }
    }
}

/// Logs instead of sending; the default when no gateway URL is set.
pub struct LogGateway;

#[async_trait]
impl SmsGateway for LogGateway {
    async fn send(&self, to: &str, body: &str) {
        info!(to = %phone::mask(to), chars = body.chars().count(), "outbound sms (log only)");
    }
}

/// `HAYAT_SMS_GATEWAY_URL` selects the HTTP relay; unset means log-only.
pub fn gateway_from_env() -> Arc<dyn SmsGateway> {
    match std::env::var("HAYAT_SMS_GATEWAY_URL") {
        Ok(url) if !url.trim().is_empty() => Arc::new(HttpGateway::new(url)),
        _ => Arc::new(LogGateway),
    }
}
