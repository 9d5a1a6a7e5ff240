//! The language-model collaborator boundary. The engine only ever sees
//! this narrow contract; prompt construction and HTTP live behind the
//! trait. Parsing is deliberately two-stage: strict JSON first, then a
//! balanced-brace salvage, then a raw-text degrade so a sloppy model
//! reply never fails the turn.

use crate::types::TranscriptEntry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Finalize action the collaborator may request once it judges the
/// collected data sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueAction {
    #[serde(rename = "REGISTER_MOTHER")]
    RegisterMother,
    #[serde(rename = "REGISTER_VOLUNTEER")]
    RegisterVolunteer,
    #[serde(rename = "CREATE_HELP_REQUEST")]
    CreateHelpRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorReply {
    pub reply: String,
    #[serde(default)]
    pub extracted_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub action: Option<DialogueAction>,
}

impl CollaboratorReply {
    pub fn degraded(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            extracted_data: None,
            is_complete: false,
            action: None,
        }
    }
}

#[async_trait]
pub trait Collaborator: Send + Sync {
    /// One delegation turn: system prompt plus the prior transcript.
    /// Implementations must degrade to `CollaboratorReply::degraded`
    /// rather than error when the backing service is unreachable.
    async fn converse(
        &self,
        system_prompt: &str,
        transcript: &[TranscriptEntry],
    ) -> CollaboratorReply;
}

#[async_trait]
impl<T: Collaborator + ?Sized> Collaborator for std::sync::Arc<T> {
    async fn converse(
        &self,
        system_prompt: &str,
        transcript: &[TranscriptEntry],
    ) -> CollaboratorReply {
        (**self).converse(system_prompt, transcript).await
    }
}

/// Used when no language model is configured; every delegation returns
/// the fixed unavailable-service reply.
pub struct NullCollaborator {
    pub unavailable_reply: String,
}

#[async_trait]
impl Collaborator for NullCollaborator {
    async fn converse(&self, _system_prompt: &str, _transcript: &[TranscriptEntry]) -> CollaboratorReply {
        CollaboratorReply::degraded(self.unavailable_reply.clone())
    }
}

/// Strict parse, then first balanced `{...}` substring, then the whole
/// raw text as a degraded reply.
pub fn parse_reply(raw: &str) -> CollaboratorReply {
    if let Ok(reply) = serde_json::from_str::<CollaboratorReply>(raw) {
        return reply;
    }
    if let Some(candidate) = first_balanced_object(raw) {
        if let Ok(reply) = serde_json::from_str::<CollaboratorReply>(candidate) {
            return reply;
        }
    }
    CollaboratorReply::degraded(raw.trim())
}

/// First `{...}` substring with balanced braces, brace-counting over
/// chars and skipping braces inside JSON strings.
fn first_balanced_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
