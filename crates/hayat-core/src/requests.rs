use crate::error::RequestError;
use crate::types::{HelpRequest, Mother, RequestCategory, RequestStatus};
use chrono::{DateTime, Utc};

pub trait RequestRepository {
    /// Reserves the next case sequence and inserts in one step; the
    /// zone/risk/due-date snapshot is taken from `mother` here.
    fn create(
        &self,
        mother: &Mother,
        category: RequestCategory,
        notes: Option<String>,
    ) -> Result<HelpRequest, RequestError>;
    fn get(&self, code: &str) -> Result<Option<HelpRequest>, RequestError>;
    fn set_status(
        &self,
        code: &str,
        status: RequestStatus,
        accepted_by: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<HelpRequest, RequestError>;
    fn find_active_by_mother(&self, phone: &str) -> Result<Option<HelpRequest>, RequestError>;
    /// Most recent PENDING case, used to attach a bare-number ETA reply.
    fn latest_pending(&self) -> Result<Option<HelpRequest>, RequestError>;
    fn increment_alerts(&self, code: &str) -> Result<(), RequestError>;
}
