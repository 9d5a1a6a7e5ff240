use crate::sequence;
use crate::util::{
    decode_enum, encode_enum, from_iso_date, from_rfc3339, lock, to_iso_date, to_rfc3339,
};
use chrono::{DateTime, Utc};
use hayat_core::casecode;
use hayat_core::error::RequestError;
use hayat_core::requests::RequestRepository;
use hayat_core::types::{HelpRequest, Mother, RequestCategory, RequestStatus};
use rusqlite::{Connection, Row};
use std::sync::Mutex;

pub struct RequestRepo<'a> {
    pub conn: &'a Mutex<Connection>,
}

impl<'a> RequestRepo<'a> {
    pub fn new(conn: &'a Mutex<Connection>) -> Self {
        Self { conn }
    }
}

fn db_err(err: impl std::fmt::Display) -> RequestError {
    RequestError::InvalidInput {
        message: err.to_string(),
    }
}

const COLUMNS: &str = "code, mother_phone, category, status, zone, risk, due_date, accepted_by, notes, alerts_sent, created_at, accepted_at, in_progress_at, closed_at";

fn map_row(row: &Row<'_>) -> Result<HelpRequest, RequestError> {
    let category: String = row.get(2).map_err(db_err)?;
    let status: String = row.get(3).map_err(db_err)?;
    let risk: String = row.get(5).map_err(db_err)?;
    let due: Option<String> = row.get(6).map_err(db_err)?;
    let created: String = row.get(10).map_err(db_err)?;
    let accepted: Option<String> = row.get(11).map_err(db_err)?;
    let in_progress: Option<String> = row.get(12).map_err(db_err)?;
    let closed: Option<String> = row.get(13).map_err(db_err)?;
    Ok(HelpRequest {
        code: row.get(0).map_err(db_err)?,
        mother_phone: row.get(1).map_err(db_err)?,
        category: decode_enum(&category).map_err(db_err)?,
        status: decode_enum(&status).map_err(db_err)?,
        zone: row.get(4).map_err(db_err)?,
        risk: decode_enum(&risk).map_err(db_err)?,
        due_date: due.as_deref().map(from_iso_date).transpose().map_err(db_err)?,
        accepted_by: row.get(7).map_err(db_err)?,
        notes: row.get(8).map_err(db_err)?,
        alerts_sent: row.get(9).map_err(db_err)?,
        created_at: from_rfc3339(&created).map_err(db_err)?,
        accepted_at: accepted.as_deref().map(from_rfc3339).transpose().map_err(db_err)?,
        in_progress_at: in_progress
            .as_deref()
            .map(from_rfc3339)
            .transpose()
            .map_err(db_err)?,
        closed_at: closed.as_deref().map(from_rfc3339).transpose().map_err(db_err)?,
    })
}

impl<'a> RequestRepository for RequestRepo<'a> {
    fn create(
        &self,
        mother: &Mother,
        category: RequestCategory,
        notes: Option<String>,
    ) -> Result<HelpRequest, RequestError> {
        let conn = lock(self.conn);
        let seq = sequence::next(&conn, "case").map_err(db_err)?;
        let request = HelpRequest {
            code: casecode::format_code(seq),
            mother_phone: mother.phone.clone(),
            category,
            status: RequestStatus::Pending,
            zone: mother.zone.clone(),
            risk: mother.risk,
            due_date: mother.due_date,
            accepted_by: None,
            notes,
            alerts_sent: 0,
            created_at: Utc::now(),
            accepted_at: None,
            in_progress_at: None,
            closed_at: None,
        };
        let sql = format!(
            "INSERT INTO requests ({COLUMNS}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)"
        );
        conn.execute(
                &sql,
                (
                    &request.code,
                    &request.mother_phone,
                    encode_enum(&request.category).map_err(db_err)?,
                    encode_enum(&request.status).map_err(db_err)?,
                    &request.zone,
                    encode_enum(&request.risk).map_err(db_err)?,
                    request.due_date.as_ref().map(to_iso_date),
                    &request.accepted_by,
                    &request.notes,
                    request.alerts_sent,
                    to_rfc3339(&request.created_at),
                    None::<String>,
                    None::<String>,
                    None::<String>,
                ),
            )
            .map_err(db_err)?;
        Ok(request)
    }

    fn get(&self, code: &str) -> Result<Option<HelpRequest>, RequestError> {
        let conn = lock(self.conn);
        let sql = format!("SELECT {COLUMNS} FROM requests WHERE code = ?1");
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([code]).map_err(db_err)?;
        let Some(row) = rows.next().map_err(db_err)? else {
            return Ok(None);
        };
        map_row(row).map(Some)
    }

    fn set_status(
        &self,
        code: &str,
        status: RequestStatus,
        accepted_by: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<HelpRequest, RequestError> {
        let timestamp_column = match status {
            RequestStatus::Accepted => Some("accepted_at"),
            RequestStatus::InProgress => Some("in_progress_at"),
            RequestStatus::Completed | RequestStatus::Cancelled => Some("closed_at"),
            RequestStatus::Pending | RequestStatus::Escalated => None,
        };
        let sql = match timestamp_column {
            Some(column) => format!(
                "UPDATE requests SET status = ?2, {column} = ?3, \
                 accepted_by = COALESCE(?4, accepted_by) WHERE code = ?1"
            ),
            None => "UPDATE requests SET status = ?2, accepted_by = COALESCE(?4, accepted_by) \
                     WHERE code = ?1"
                .to_string(),
        };
        let changed = lock(self.conn)
            .execute(
                &sql,
                (
                    code,
                    encode_enum(&status).map_err(db_err)?,
                    to_rfc3339(&at),
                    accepted_by,
                ),
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(RequestError::NotFound);
        }
        self.get(code)?.ok_or(RequestError::NotFound)
    }

    fn find_active_by_mother(&self, phone: &str) -> Result<Option<HelpRequest>, RequestError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM requests WHERE mother_phone = ?1 \
             AND status IN ('Pending','Accepted','InProgress') \
             ORDER BY created_at DESC LIMIT 1"
        );
        let conn = lock(self.conn);
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([phone]).map_err(db_err)?;
        let Some(row) = rows.next().map_err(db_err)? else {
            return Ok(None);
        };
        map_row(row).map(Some)
    }

    fn latest_pending(&self) -> Result<Option<HelpRequest>, RequestError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM requests WHERE status = 'Pending' \
             ORDER BY created_at DESC LIMIT 1"
        );
        let conn = lock(self.conn);
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;
        let Some(row) = rows.next().map_err(db_err)? else {
            return Ok(None);
        };
        map_row(row).map(Some)
    }

    fn increment_alerts(&self, code: &str) -> Result<(), RequestError> {
        let changed = lock(self.conn)
            .execute(
                "UPDATE requests SET alerts_sent = alerts_sent + 1 WHERE code = ?1",
                [code],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(RequestError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mother_repo::MotherRepo;
    use crate::schema::with_test_db;
    use hayat_core::mothers::MotherRepository;
    use hayat_core::types::{Language, RegisterMotherInput, RiskLevel};

    fn seed_mother(conn: &Mutex<Connection>, phone: &str) -> Mother {
        MotherRepo::new(conn)
            .upsert(RegisterMotherInput {
                phone: phone.to_string(),
                name: None,
                age: None,
                camp: "A".to_string(),
                zone: "3".to_string(),
                due_date: None,
                prev_complications: false,
                risk: RiskLevel::High,
                language: Language::English,
            })
            .unwrap()
    }

    #[test]
    fn codes_are_sequential_from_one() {
        let conn = Mutex::new(with_test_db().unwrap());
        let mother = seed_mother(&conn, "+8801700000001");
        let repo = RequestRepo::new(&conn);
        let first = repo.create(&mother, RequestCategory::Emergency, None).unwrap();
        let second = repo.create(&mother, RequestCategory::Support, None).unwrap();
        assert_eq!(first.code, "HR-0001");
        assert_eq!(second.code, "HR-0002");
    }

    #[test]
    fn creation_snapshots_mother_profile() {
        let conn = Mutex::new(with_test_db().unwrap());
        let mother = seed_mother(&conn, "+8801700000001");
        let repo = RequestRepo::new(&conn);
        let request = repo.create(&mother, RequestCategory::Labor, None).unwrap();
        assert_eq!(request.zone, "3");
        assert_eq!(request.risk, RiskLevel::High);

        // Later profile edits must not rewrite the snapshot.
        let mut update = RegisterMotherInput {
            phone: mother.phone.clone(),
            name: None,
            age: None,
            camp: "A".to_string(),
            zone: "9".to_string(),
            due_date: None,
            prev_complications: false,
            risk: RiskLevel::Low,
            language: Language::English,
        };
        update.zone = "9".to_string();
        MotherRepo::new(&conn).upsert(update).unwrap();
        let loaded = repo.get(&request.code).unwrap().unwrap();
        assert_eq!(loaded.zone, "3");
    }

    #[test]
    fn set_status_stamps_lifecycle_timestamps() {
        let conn = Mutex::new(with_test_db().unwrap());
        let mother = seed_mother(&conn, "+8801700000001");
        let repo = RequestRepo::new(&conn);
        let request = repo.create(&mother, RequestCategory::Emergency, None).unwrap();

        let accepted = repo
            .set_status(&request.code, RequestStatus::Accepted, Some("+8801000000001"), Utc::now())
            .unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);
        assert_eq!(accepted.accepted_by.as_deref(), Some("+8801000000001"));
        assert!(accepted.accepted_at.is_some());
        assert!(accepted.is_active());

        let completed = repo
            .set_status(&request.code, RequestStatus::Completed, None, Utc::now())
            .unwrap();
        assert_eq!(completed.status, RequestStatus::Completed);
        assert!(completed.closed_at.is_some());
        assert!(!completed.is_active());
        // COALESCE keeps the accepting volunteer on close.
        assert_eq!(completed.accepted_by.as_deref(), Some("+8801000000001"));
    }

    #[test]
    fn unknown_case_is_not_found() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = RequestRepo::new(&conn);
        assert!(matches!(
            repo.set_status("HR-9999", RequestStatus::Accepted, None, Utc::now()),
            Err(RequestError::NotFound)
        ));
        assert!(repo.get("HR-9999").unwrap().is_none());
    }
}
