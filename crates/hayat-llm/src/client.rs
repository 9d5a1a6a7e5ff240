//! OpenAI-compatible chat client for the conversational fallback. Any
//! endpoint speaking `/chat/completions` works (Groq, Ollama, vLLM).
//! Every failure mode degrades to the fixed unavailable reply; a turn
//! never errors because the model did.

use std::time::Duration;

use async_trait::async_trait;
use hayat_core::collaborator::{parse_reply, Collaborator, CollaboratorReply};
use hayat_core::replies;
use hayat_core::types::{Language, TranscriptEntry, TranscriptRole};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Reads `HAYAT_LLM_BASE_URL`, `HAYAT_LLM_API_KEY` and
    /// `HAYAT_LLM_MODEL`. `None` when no base URL is configured.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("HAYAT_LLM_BASE_URL").ok()?;
        Some(Self {
            base_url,
            api_key: std::env::var("HAYAT_LLM_API_KEY").ok(),
            model: std::env::var("HAYAT_LLM_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, http }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, reqwest::Error> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?.error_for_status()?;
        let parsed: ChatResponse = response.json().await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

/// The fixed reply used whenever the model cannot be reached. Both
/// locales in one message since the caller's language is not known to
/// this layer.
pub fn unavailable_reply() -> String {
    format!(
        "{}\n{}",
        replies::collaborator_unavailable(Language::English),
        replies::collaborator_unavailable(Language::Arabic)
    )
}

#[async_trait]
impl Collaborator for LlmClient {
    async fn converse(
        &self,
        system_prompt: &str,
        transcript: &[TranscriptEntry],
    ) -> CollaboratorReply {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: system_prompt.to_string(),
        }];
        for entry in transcript {
            messages.push(ChatMessage {
                role: match entry.role {
                    TranscriptRole::User => "user",
                    TranscriptRole::Assistant => "assistant",
                },
                content: entry.content.clone(),
            });
        }
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: 0.3,
        };

        match self.complete(&request).await {
            Ok(raw) => {
                debug!(bytes = raw.len(), "collaborator replied");
                parse_reply(&raw)
            }
            Err(err) => {
                warn!(error = %err, "collaborator call failed, degrading");
                CollaboratorReply::degraded(unavailable_reply())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reply_is_bilingual() {
        let reply = unavailable_reply();
        assert!(reply.contains("EMERGENCY"));
        assert!(reply.contains("طوارئ"));
    }
}
