use crate::util::{
    decode_enum, decode_json, encode_enum, encode_json, from_rfc3339, lock, to_rfc3339,
};
use chrono::{DateTime, Utc};
use hayat_core::dialogues::DialogueRepository;
use hayat_core::error::DialogueError;
use hayat_core::types::{Dialogue, DialoguePhase, DialogueStatus, Language};
use rusqlite::{Connection, Row};
use std::sync::Mutex;

pub struct DialogueRepo<'a> {
    pub conn: &'a Mutex<Connection>,
}

impl<'a> DialogueRepo<'a> {
    pub fn new(conn: &'a Mutex<Connection>) -> Self {
        Self { conn }
    }
}

fn db_err(err: impl std::fmt::Display) -> DialogueError {
    DialogueError::InvalidInput {
        message: err.to_string(),
    }
}

const COLUMNS: &str = "id, phone, phase, collected, transcript, turns, language, status, created_at, updated_at";

fn map_row(row: &Row<'_>) -> Result<Dialogue, DialogueError> {
    let phase: String = row.get(2).map_err(db_err)?;
    let collected: String = row.get(3).map_err(db_err)?;
    let transcript: String = row.get(4).map_err(db_err)?;
    let language: String = row.get(6).map_err(db_err)?;
    let status: String = row.get(7).map_err(db_err)?;
    let created: String = row.get(8).map_err(db_err)?;
    let updated: String = row.get(9).map_err(db_err)?;
    Ok(Dialogue {
        id: row.get(0).map_err(db_err)?,
        phone: row.get(1).map_err(db_err)?,
        phase: decode_enum(&phase).map_err(db_err)?,
        collected: decode_json(&collected).map_err(db_err)?,
        transcript: decode_json(&transcript).map_err(db_err)?,
        turns: row.get(5).map_err(db_err)?,
        language: decode_enum(&language).map_err(db_err)?,
        status: decode_enum(&status).map_err(db_err)?,
        created_at: from_rfc3339(&created).map_err(db_err)?,
        updated_at: from_rfc3339(&updated).map_err(db_err)?,
    })
}

impl<'a> DialogueRepository for DialogueRepo<'a> {
    fn get_active(&self, phone: &str) -> Result<Option<Dialogue>, DialogueError> {
        let conn = lock(self.conn);
        let sql = format!("SELECT {COLUMNS} FROM dialogues WHERE phone = ?1 AND status = 'Active'");
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([phone]).map_err(db_err)?;
        let Some(row) = rows.next().map_err(db_err)? else {
            return Ok(None);
        };
        map_row(row).map(Some)
    }

    fn create(
        &self,
        phone: &str,
        phase: DialoguePhase,
        language: Language,
        at: DateTime<Utc>,
    ) -> Result<Dialogue, DialogueError> {
        let dialogue = Dialogue {
            id: 0,
            phone: phone.to_string(),
            phase,
            collected: serde_json::Map::new(),
            transcript: Vec::new(),
            turns: 0,
            language,
            status: DialogueStatus::Active,
            created_at: at,
            updated_at: at,
        };
        let conn = lock(self.conn);
        conn.execute(
                "INSERT INTO dialogues (phone, phase, collected, transcript, turns, language, status, created_at, updated_at) \
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
                (
                    phone,
                    encode_enum(&dialogue.phase).map_err(db_err)?,
                    encode_json(&dialogue.collected).map_err(db_err)?,
                    encode_json(&dialogue.transcript).map_err(db_err)?,
                    dialogue.turns,
                    encode_enum(&dialogue.language).map_err(db_err)?,
                    encode_enum(&dialogue.status).map_err(db_err)?,
                    to_rfc3339(&dialogue.created_at),
                    to_rfc3339(&dialogue.updated_at),
                ),
            )
            .map_err(db_err)?;
        let id = conn.last_insert_rowid();
        Ok(Dialogue { id, ..dialogue })
    }

    fn save(&self, dialogue: &Dialogue) -> Result<(), DialogueError> {
        let changed = lock(self.conn)
            .execute(
                "UPDATE dialogues SET phase = ?2, collected = ?3, transcript = ?4, turns = ?5, \
                 language = ?6, updated_at = ?7 WHERE id = ?1",
                (
                    dialogue.id,
                    encode_enum(&dialogue.phase).map_err(db_err)?,
                    encode_json(&dialogue.collected).map_err(db_err)?,
                    encode_json(&dialogue.transcript).map_err(db_err)?,
                    dialogue.turns,
                    encode_enum(&dialogue.language).map_err(db_err)?,
                    to_rfc3339(&dialogue.updated_at),
                ),
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(DialogueError::NotFound);
        }
        Ok(())
    }

    fn set_status(&self, id: i64, status: DialogueStatus) -> Result<(), DialogueError> {
        let changed = lock(self.conn)
            .execute(
                "UPDATE dialogues SET status = ?2 WHERE id = ?1",
                (id, encode_enum(&status).map_err(db_err)?),
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(DialogueError::NotFound);
        }
        Ok(())
    }

    fn expire_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, DialogueError> {
        let changed = lock(self.conn)
            .execute(
                "UPDATE dialogues SET status = 'Expired' \
                 WHERE status = 'Active' AND updated_at < ?1",
                [to_rfc3339(&cutoff)],
            )
            .map_err(db_err)?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn active_record_is_unique_per_phone() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = DialogueRepo::new(&conn);
        repo.create("+8801700000001", DialoguePhase::RoleDetection, Language::English, Utc::now())
            .unwrap();
        // The partial unique index rejects a second ACTIVE record.
        assert!(repo
            .create("+8801700000001", DialoguePhase::RoleDetection, Language::English, Utc::now())
            .is_err());
    }

    #[test]
    fn save_roundtrips_collected_and_transcript() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = DialogueRepo::new(&conn);
        let mut dialogue = repo
            .create("+8801700000001", DialoguePhase::RoleDetection, Language::Arabic, Utc::now())
            .unwrap();
        dialogue.phase = DialoguePhase::MotherRegistration;
        dialogue.collected.insert("camp".to_string(), json!("A"));
        dialogue.push_turn("انا حامل", "What camp are you in?");
        repo.save(&dialogue).unwrap();

        let loaded = repo.get_active("+8801700000001").unwrap().unwrap();
        assert_eq!(loaded.phase, DialoguePhase::MotherRegistration);
        assert_eq!(loaded.collected.get("camp"), Some(&json!("A")));
        assert_eq!(loaded.turns, 2);
        assert_eq!(loaded.transcript.len(), 2);
    }

    #[test]
    fn completed_dialogue_is_invisible_to_get_active() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = DialogueRepo::new(&conn);
        let dialogue = repo
            .create("+8801700000001", DialoguePhase::General, Language::English, Utc::now())
            .unwrap();
        repo.set_status(dialogue.id, DialogueStatus::Completed).unwrap();
        assert!(repo.get_active("+8801700000001").unwrap().is_none());
        // A new ACTIVE record can now be created for the same phone.
        assert!(repo
            .create("+8801700000001", DialoguePhase::RoleDetection, Language::English, Utc::now())
            .is_ok());
    }

    #[test]
    fn expiry_sweep_only_touches_idle_active_rows() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = DialogueRepo::new(&conn);
        let old = Utc::now() - Duration::minutes(90);
        repo.create("+8801700000001", DialoguePhase::General, Language::English, old)
            .unwrap();
        repo.create("+8801700000002", DialoguePhase::General, Language::English, Utc::now())
            .unwrap();

        let expired = repo.expire_idle(Utc::now() - Duration::minutes(30)).unwrap();
        assert_eq!(expired, 1);
        assert!(repo.get_active("+8801700000001").unwrap().is_none());
        assert!(repo.get_active("+8801700000002").unwrap().is_some());
        // Idempotent: a second sweep finds nothing.
        assert_eq!(repo.expire_idle(Utc::now() - Duration::minutes(30)).unwrap(), 0);
    }
}
