use crate::error::VolunteerError;
use crate::types::{Availability, RegisterVolunteerInput, Volunteer};

pub trait VolunteerRepository {
    fn upsert(&self, input: RegisterVolunteerInput) -> Result<Volunteer, VolunteerError>;
    fn get(&self, phone: &str) -> Result<Option<Volunteer>, VolunteerError>;
    fn set_availability(
        &self,
        phone: &str,
        availability: Availability,
    ) -> Result<Volunteer, VolunteerError>;
    /// Marks the volunteer busy on `case_code`.
    fn assign_case(&self, phone: &str, case_code: &str) -> Result<(), VolunteerError>;
    /// Clears the current case; `completed` additionally bumps the
    /// completed-case counter. Returns the updated record.
    fn release_case(&self, phone: &str, completed: bool) -> Result<Volunteer, VolunteerError>;
    fn list_available(&self) -> Result<Vec<Volunteer>, VolunteerError>;
}
