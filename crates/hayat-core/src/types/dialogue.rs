use crate::types::enums::{DialoguePhase, DialogueStatus, Language, TranscriptRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranscriptEntry {
    pub role: TranscriptRole,
    pub content: String,
}

/// Persisted multi-turn exchange for one phone number. At most one
/// `Active` record may exist per phone at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dialogue {
    pub id: i64,
    pub phone: String,
    pub phase: DialoguePhase,
    /// Structured fields the collaborator has extracted so far.
    #[schema(value_type = Object)]
    pub collected: Map<String, Value>,
    pub transcript: Vec<TranscriptEntry>,
    pub turns: u32,
    pub language: Language,
    pub status: DialogueStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dialogue {
    pub fn push_turn(&mut self, user: &str, assistant: &str) {
        self.transcript.push(TranscriptEntry {
            role: TranscriptRole::User,
            content: user.to_string(),
        });
        self.transcript.push(TranscriptEntry {
            role: TranscriptRole::Assistant,
            content: assistant.to_string(),
        });
        self.turns += 2;
    }

    /// Merge newly extracted fields; new keys overwrite same-named old ones.
    pub fn merge_collected(&mut self, extracted: Map<String, Value>) {
        for (key, value) in extracted {
            self.collected.insert(key, value);
        }
    }
}
