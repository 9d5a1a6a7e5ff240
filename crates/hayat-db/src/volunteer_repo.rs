use crate::util::{
    decode_enum, decode_json, encode_enum, encode_json, from_rfc3339, lock, to_rfc3339,
};
use chrono::Utc;
use hayat_core::error::VolunteerError;
use hayat_core::types::{Availability, RegisterVolunteerInput, Volunteer};
use hayat_core::volunteers::VolunteerRepository;
use rusqlite::{Connection, Row};
use std::sync::Mutex;

pub struct VolunteerRepo<'a> {
    pub conn: &'a Mutex<Connection>,
}

impl<'a> VolunteerRepo<'a> {
    pub fn new(conn: &'a Mutex<Connection>) -> Self {
        Self { conn }
    }
}

fn db_err(err: impl std::fmt::Display) -> VolunteerError {
    VolunteerError::InvalidInput {
        message: err.to_string(),
    }
}

const COLUMNS: &str = "phone, name, camp, eligibility, availability, current_case, completed_cases, language, registered_at";

fn map_row(row: &Row<'_>) -> Result<Volunteer, VolunteerError> {
    let eligibility: String = row.get(3).map_err(db_err)?;
    let availability: String = row.get(4).map_err(db_err)?;
    let language: String = row.get(7).map_err(db_err)?;
    let registered: String = row.get(8).map_err(db_err)?;
    Ok(Volunteer {
        phone: row.get(0).map_err(db_err)?,
        name: row.get(1).map_err(db_err)?,
        camp: row.get(2).map_err(db_err)?,
        eligibility: decode_json(&eligibility).map_err(db_err)?,
        availability: decode_enum(&availability).map_err(db_err)?,
        current_case: row.get(5).map_err(db_err)?,
        completed_cases: row.get(6).map_err(db_err)?,
        language: decode_enum(&language).map_err(db_err)?,
        registered_at: from_rfc3339(&registered).map_err(db_err)?,
    })
}

impl<'a> VolunteerRepository for VolunteerRepo<'a> {
    fn upsert(&self, input: RegisterVolunteerInput) -> Result<Volunteer, VolunteerError> {
        let now = Utc::now();
        let existing = self.get(&input.phone)?;
        let volunteer = Volunteer {
            phone: input.phone,
            name: input.name.or(existing.as_ref().and_then(|v| v.name.clone())),
            camp: input.camp.or(existing.as_ref().and_then(|v| v.camp.clone())),
            eligibility: input.eligibility,
            availability: existing
                .as_ref()
                .map(|v| v.availability)
                .unwrap_or(Availability::Available),
            current_case: existing.as_ref().and_then(|v| v.current_case.clone()),
            completed_cases: existing.as_ref().map(|v| v.completed_cases).unwrap_or(0),
            language: input.language,
            registered_at: existing.as_ref().map(|v| v.registered_at).unwrap_or(now),
        };
        let sql = format!(
            "INSERT INTO volunteers ({COLUMNS}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9) \
             ON CONFLICT(phone) DO UPDATE SET name=?2, camp=?3, eligibility=?4, language=?8"
        );
        lock(self.conn)
            .execute(
                &sql,
                (
                    &volunteer.phone,
                    &volunteer.name,
                    &volunteer.camp,
                    encode_json(&volunteer.eligibility).map_err(db_err)?,
                    encode_enum(&volunteer.availability).map_err(db_err)?,
                    &volunteer.current_case,
                    volunteer.completed_cases,
                    encode_enum(&volunteer.language).map_err(db_err)?,
                    to_rfc3339(&volunteer.registered_at),
                ),
            )
            .map_err(db_err)?;
        Ok(volunteer)
    }

    fn get(&self, phone: &str) -> Result<Option<Volunteer>, VolunteerError> {
        let conn = lock(self.conn);
        let sql = format!("SELECT {COLUMNS} FROM volunteers WHERE phone = ?1");
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([phone]).map_err(db_err)?;
        let Some(row) = rows.next().map_err(db_err)? else {
            return Ok(None);
        };
        map_row(row).map(Some)
    }

    fn set_availability(
        &self,
        phone: &str,
        availability: Availability,
    ) -> Result<Volunteer, VolunteerError> {
        let changed = lock(self.conn)
            .execute(
                "UPDATE volunteers SET availability = ?2 WHERE phone = ?1",
                (phone, encode_enum(&availability).map_err(db_err)?),
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(VolunteerError::NotRegistered);
        }
        self.get(phone)?.ok_or(VolunteerError::NotRegistered)
    }

    fn assign_case(&self, phone: &str, case_code: &str) -> Result<(), VolunteerError> {
        let changed = lock(self.conn)
            .execute(
                "UPDATE volunteers SET current_case = ?2, availability = ?3 WHERE phone = ?1",
                (
                    phone,
                    case_code,
                    encode_enum(&Availability::Busy).map_err(db_err)?,
                ),
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(VolunteerError::NotRegistered);
        }
        Ok(())
    }

    fn release_case(&self, phone: &str, completed: bool) -> Result<Volunteer, VolunteerError> {
        let bump = if completed { 1 } else { 0 };
        let changed = lock(self.conn)
            .execute(
                "UPDATE volunteers SET current_case = NULL, availability = ?2, \
                 completed_cases = completed_cases + ?3 WHERE phone = ?1",
                (
                    phone,
                    encode_enum(&Availability::Available).map_err(db_err)?,
                    bump,
                ),
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(VolunteerError::NotRegistered);
        }
        self.get(phone)?.ok_or(VolunteerError::NotRegistered)
    }

    fn list_available(&self) -> Result<Vec<Volunteer>, VolunteerError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM volunteers WHERE availability = 'Available' ORDER BY registered_at DESC"
        );
        let conn = lock(self.conn);
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;
        let mut volunteers = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            volunteers.push(map_row(row)?);
        }
        Ok(volunteers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use hayat_core::types::{Eligibility, Language, SkillType};

    fn input(phone: &str) -> RegisterVolunteerInput {
        RegisterVolunteerInput {
            phone: phone.to_string(),
            name: Some("Amina".to_string()),
            camp: Some("B".to_string()),
            eligibility: Eligibility::ZoneSkill {
                skill: SkillType::Midwife,
                zones: vec!["3".to_string()],
            },
            language: Language::English,
        }
    }

    #[test]
    fn upsert_roundtrips_eligibility_variant() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = VolunteerRepo::new(&conn);
        repo.upsert(input("+8801000000001")).unwrap();
        let loaded = repo.get("+8801000000001").unwrap().unwrap();
        match loaded.eligibility {
            Eligibility::ZoneSkill { skill, zones } => {
                assert_eq!(skill, SkillType::Midwife);
                assert_eq!(zones, vec!["3"]);
            }
            Eligibility::CapabilityFlags { .. } => panic!("expected zone/skill model"),
        }
        assert_eq!(loaded.availability, Availability::Available);
    }

    #[test]
    fn assign_and_release_track_case_and_counter() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = VolunteerRepo::new(&conn);
        repo.upsert(input("+8801000000001")).unwrap();
        repo.assign_case("+8801000000001", "HR-0001").unwrap();
        let busy = repo.get("+8801000000001").unwrap().unwrap();
        assert_eq!(busy.availability, Availability::Busy);
        assert_eq!(busy.current_case.as_deref(), Some("HR-0001"));

        let released = repo.release_case("+8801000000001", true).unwrap();
        assert_eq!(released.availability, Availability::Available);
        assert_eq!(released.current_case, None);
        assert_eq!(released.completed_cases, 1);
    }

    #[test]
    fn list_available_excludes_busy_and_offline() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = VolunteerRepo::new(&conn);
        repo.upsert(input("+8801000000001")).unwrap();
        repo.upsert(input("+8801000000002")).unwrap();
        repo.set_availability("+8801000000002", Availability::Offline)
            .unwrap();
        let available = repo.list_available().unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].phone, "+8801000000001");
    }

    #[test]
    fn availability_change_for_unknown_volunteer_fails() {
        let conn = Mutex::new(with_test_db().unwrap());
        let repo = VolunteerRepo::new(&conn);
        assert!(matches!(
            repo.set_availability("+8801000000009", Availability::Busy),
            Err(VolunteerError::NotRegistered)
        ));
    }
}
