use crate::util::{from_rfc3339, lock, to_rfc3339};
use chrono::Utc;
use hayat_core::error::RequestError;
use hayat_core::responses::ResponseRepository;
use hayat_core::types::VolunteerResponse;
use rusqlite::Connection;
use std::sync::Mutex;

pub struct ResponseRepo<'a> {
    pub conn: &'a Mutex<Connection>,
}

impl<'a> ResponseRepo<'a> {
    pub fn new(conn: &'a Mutex<Connection>) -> Self {
        Self { conn }
    }
}

fn db_err(err: impl std::fmt::Display) -> RequestError {
    RequestError::InvalidInput {
        message: err.to_string(),
    }
}

impl<'a> ResponseRepository for ResponseRepo<'a> {
    fn record(
        &self,
        case_code: &str,
        volunteer_phone: &str,
        eta_minutes: u32,
    ) -> Result<VolunteerResponse, RequestError> {
        let response = VolunteerResponse {
            case_code: case_code.to_string(),
            volunteer_phone: volunteer_phone.to_string(),
            eta_minutes,
            selected: false,
            created_at: Utc::now(),
        };
        lock(self.conn)
            .execute(
                "INSERT INTO volunteer_responses (case_code, volunteer_phone, eta_minutes, selected, created_at) \
                 VALUES (?1,?2,?3,0,?4)",
                (
                    &response.case_code,
                    &response.volunteer_phone,
                    response.eta_minutes,
                    to_rfc3339(&response.created_at),
                ),
            )
            .map_err(db_err)?;
        Ok(response)
    }

    fn list_by_case(&self, case_code: &str) -> Result<Vec<VolunteerResponse>, RequestError> {
        let conn = lock(self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT case_code, volunteer_phone, eta_minutes, selected, created_at \
                 FROM volunteer_responses WHERE case_code = ?1 ORDER BY eta_minutes ASC",
            )
            .map_err(db_err)?;
        let mut rows = stmt.query([case_code]).map_err(db_err)?;
        let mut responses = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            let created: String = row.get(4).map_err(db_err)?;
            responses.push(VolunteerResponse {
                case_code: row.get(0).map_err(db_err)?,
                volunteer_phone: row.get(1).map_err(db_err)?,
                eta_minutes: row.get(2).map_err(db_err)?,
                selected: row.get::<_, i64>(3).map_err(db_err)? != 0,
                created_at: from_rfc3339(&created).map_err(db_err)?,
            });
        }
        Ok(responses)
    }
}
