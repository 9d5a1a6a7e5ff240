use crate::util::{
    decode_enum, encode_enum, from_iso_date, from_rfc3339, lock, to_iso_date, to_rfc3339,
};
use crate::sequence;
use chrono::{DateTime, Utc};
use hayat_core::error::MotherError;
use hayat_core::mothers::MotherRepository;
use hayat_core::types::{Mother, RegisterMotherInput};
use rusqlite::{Connection, Row};
use std::sync::Mutex;

pub struct MotherRepo<'a> {
    pub conn: &'a Mutex<Connection>,
}

impl<'a> MotherRepo<'a> {
    pub fn new(conn: &'a Mutex<Connection>) -> Self {
        Self { conn }
    }
}

fn db_err(err: impl std::fmt::Display) -> MotherError {
    MotherError::InvalidInput {
        message: err.to_string(),
    }
}

const COLUMNS: &str = "phone, seq, name, age, camp, zone, due_date, prev_complications, risk, language, registered_at, last_contact_at";

fn map_row(row: &Row<'_>) -> Result<Mother, MotherError> {
    let due: Option<String> = row.get(6).map_err(db_err)?;
    let last_contact: Option<String> = row.get(11).map_err(db_err)?;
    let registered: String = row.get(10).map_err(db_err)?;
    let risk: String = row.get(8).map_err(db_err)?;
    let language: String = row.get(9).map_err(db_err)?;
    Ok(Mother {
        phone: row.get(0).map_err(db_err)?,
        seq: row.get(1).map_err(db_err)?,
        name: row.get(2).map_err(db_err)?,
        age: row.get(3).map_err(db_err)?,
        camp: row.get(4).map_err(db_err)?,
        zone: row.get(5).map_err(db_err)?,
        due_date: due.as_deref().map(from_iso_date).transpose().map_err(db_err)?,
        prev_complications: row.get::<_, i64>(7).map_err(db_err)? != 0,
        risk: decode_enum(&risk).map_err(db_err)?,
        language: decode_enum(&language).map_err(db_err)?,
        registered_at: from_rfc3339(&registered).map_err(db_err)?,
        last_contact_at: last_contact
            .as_deref()
            .map(from_rfc3339)
            .transpose()
            .map_err(db_err)?,
    })
}

impl<'a> MotherRepository for MotherRepo<'a> {
    fn upsert(&self, input: RegisterMotherInput) -> Result<Mother, MotherError> {
        let now = Utc::now();
        let existing = self.get(&input.phone)?;
        let conn = lock(self.conn);
        let (seq, registered_at) = match &existing {
            Some(mother) => (mother.seq, mother.registered_at),
            None => (sequence::next(&conn, "mother").map_err(db_err)?, now),
        };
        let mother = Mother {
            phone: input.phone,
            seq,
            name: input.name.or(existing.as_ref().and_then(|m| m.name.clone())),
            age: input.age.or(existing.as_ref().and_then(|m| m.age)),
            camp: input.camp,
            zone: input.zone,
            due_date: input.due_date.or(existing.as_ref().and_then(|m| m.due_date)),
            prev_complications: input.prev_complications,
            risk: input.risk,
            language: input.language,
            registered_at,
            last_contact_at: Some(now),
        };
        let sql = format!(
            "INSERT INTO mothers ({COLUMNS}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12) \
             ON CONFLICT(phone) DO UPDATE SET name=?3, age=?4, camp=?5, zone=?6, due_date=?7, \
             prev_complications=?8, risk=?9, language=?10, last_contact_at=?12"
        );
        conn.execute(
                &sql,
                (
                    &mother.phone,
                    mother.seq,
                    &mother.name,
                    mother.age,
                    &mother.camp,
                    &mother.zone,
                    mother.due_date.as_ref().map(to_iso_date),
                    mother.prev_complications as i64,
                    encode_enum(&mother.risk).map_err(db_err)?,
                    encode_enum(&mother.language).map_err(db_err)?,
                    to_rfc3339(&mother.registered_at),
                    mother.last_contact_at.as_ref().map(to_rfc3339),
                ),
            )
            .map_err(db_err)?;
        Ok(mother)
    }

    fn get(&self, phone: &str) -> Result<Option<Mother>, MotherError> {
        let conn = lock(self.conn);
        let sql = format!("SELECT {COLUMNS} FROM mothers WHERE phone = ?1");
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([phone]).map_err(db_err)?;
        let Some(row) = rows.next().map_err(db_err)? else {
            return Ok(None);
        };
        map_row(row).map(Some)
    }

    fn touch_last_contact(&self, phone: &str, at: DateTime<Utc>) -> Result<(), MotherError> {
        lock(self.conn)
            .execute(
                "UPDATE mothers SET last_contact_at = ?2 WHERE phone = ?1",
                (phone, to_rfc3339(&at)),
            )
            .map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use hayat_core::types::{Language, RiskLevel};

    fn input(phone: &str) -> RegisterMotherInput {
        RegisterMotherInput {
            phone: phone.to_string(),
            name: None,
            age: None,
            camp: "A".to_string(),
            zone: "3".to_string(),
            due_date: None,
            prev_complications: false,
            risk: RiskLevel::Low,
            language: Language::English,
        }
    }

    #[test]
    fn insert_allocates_public_sequence() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = MotherRepo::new(&conn);
        let first = repo.upsert(input("+8801700000001")).unwrap();
        let second = repo.upsert(input("+8801700000002")).unwrap();
        assert_eq!(first.public_id(), "M-0001");
        assert_eq!(second.public_id(), "M-0002");
    }

    #[test]
    fn reregistration_keeps_sequence_and_updates_profile() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = MotherRepo::new(&conn);
        let first = repo.upsert(input("+8801700000001")).unwrap();
        let mut update = input("+8801700000001");
        update.zone = "7".to_string();
        update.risk = RiskLevel::High;
        let second = repo.upsert(update).unwrap();
        assert_eq!(second.seq, first.seq);
        assert_eq!(second.zone, "7");
        assert_eq!(second.risk, RiskLevel::High);
        let loaded = repo.get("+8801700000001").unwrap().unwrap();
        assert_eq!(loaded.zone, "7");
    }
}
