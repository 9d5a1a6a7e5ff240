use crate::error::DialogueError;
use crate::types::{Dialogue, DialoguePhase, DialogueStatus, Language};
use chrono::{DateTime, Utc};

pub trait DialogueRepository {
    /// The single ACTIVE record for this phone, if any.
    fn get_active(&self, phone: &str) -> Result<Option<Dialogue>, DialogueError>;
    fn create(
        &self,
        phone: &str,
        phase: DialoguePhase,
        language: Language,
        at: DateTime<Utc>,
    ) -> Result<Dialogue, DialogueError>;
    /// Persists phase, collected data, transcript, turn count and
    /// updated-at for an existing record.
    fn save(&self, dialogue: &Dialogue) -> Result<(), DialogueError>;
    fn set_status(&self, id: i64, status: DialogueStatus) -> Result<(), DialogueError>;
    /// Marks every ACTIVE record idle since before `cutoff` as EXPIRED.
    /// Returns how many were expired.
    fn expire_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, DialogueError>;
}
