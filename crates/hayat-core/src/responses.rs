use crate::error::RequestError;
use crate::types::VolunteerResponse;

pub trait ResponseRepository {
    fn record(
        &self,
        case_code: &str,
        volunteer_phone: &str,
        eta_minutes: u32,
    ) -> Result<VolunteerResponse, RequestError>;
    /// Ordered by ETA ascending, the order a future selector would use.
    fn list_by_case(&self, case_code: &str) -> Result<Vec<VolunteerResponse>, RequestError>;
}
