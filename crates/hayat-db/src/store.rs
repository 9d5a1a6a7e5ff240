use hayat_core::error::HayatError;
use hayat_core::store::Store;
use rusqlite::Connection;
use std::sync::Mutex;

use crate::dialogue_repo::DialogueRepo;
use crate::mother_repo::MotherRepo;
use crate::request_repo::RequestRepo;
use crate::response_repo::ResponseRepo;
use crate::util::lock;
use crate::volunteer_repo::VolunteerRepo;

pub struct DbStore {
    conn: Mutex<Connection>,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl Store for DbStore {
    type Mothers<'a>
        = MotherRepo<'a>
    where
        Self: 'a;
    type Volunteers<'a>
        = VolunteerRepo<'a>
    where
        Self: 'a;
    type Requests<'a>
        = RequestRepo<'a>
    where
        Self: 'a;
    type Dialogues<'a>
        = DialogueRepo<'a>
    where
        Self: 'a;
    type Responses<'a>
        = ResponseRepo<'a>
    where
        Self: 'a;

    fn mothers(&self) -> Self::Mothers<'_> {
        MotherRepo::new(&self.conn)
    }

    fn volunteers(&self) -> Self::Volunteers<'_> {
        VolunteerRepo::new(&self.conn)
    }

    fn requests(&self) -> Self::Requests<'_> {
        RequestRepo::new(&self.conn)
    }

    fn dialogues(&self) -> Self::Dialogues<'_> {
        DialogueRepo::new(&self.conn)
    }

    fn responses(&self) -> Self::Responses<'_> {
        ResponseRepo::new(&self.conn)
    }

    fn with_tx<F, T>(&self, f: F) -> Result<T, HayatError>
    where
        F: FnOnce(&Self) -> Result<T, HayatError>,
    {
        lock(&self.conn)
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(|err| HayatError::Internal {
                message: err.to_string(),
            })?;
        let result = f(self);
        match result {
            Ok(value) => {
                lock(&self.conn)
                    .execute_batch("COMMIT")
                    .map_err(|err| HayatError::Internal {
                        message: err.to_string(),
                    })?;
                Ok(value)
            }
            Err(err) => {
                lock(&self.conn)
                    .execute_batch("ROLLBACK")
                    .map_err(|rollback_err| HayatError::Internal {
                        message: rollback_err.to_string(),
                    })?;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use hayat_core::mothers::MotherRepository;
    use hayat_core::requests::RequestRepository;
    use hayat_core::types::{Language, RegisterMotherInput, RequestCategory, RiskLevel};

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DbStore>();
    }

    #[test]
    fn failed_transaction_rolls_back_case_allocation() {
        let store = DbStore::new(with_test_db().unwrap());
        let mother = store
            .mothers()
            .upsert(RegisterMotherInput {
                phone: "+8801700000001".to_string(),
                name: None,
                age: None,
                camp: "A".to_string(),
                zone: "3".to_string(),
                due_date: None,
                prev_complications: false,
                risk: RiskLevel::Low,
                language: Language::English,
            })
            .unwrap();

        let failed: Result<(), HayatError> = store.with_tx(|s| {
            s.requests()
                .create(&mother, RequestCategory::Emergency, None)?;
            Err(HayatError::Internal {
                message: "forced".to_string(),
            })
        });
        assert!(failed.is_err());

        // The rolled-back sequence value is reused by the next creation.
        let request = store
            .with_tx(|s| Ok(s.requests().create(&mother, RequestCategory::Emergency, None)?))
            .unwrap();
        assert_eq!(request.code, "HR-0001");
    }
}
