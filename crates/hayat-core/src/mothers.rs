use crate::error::MotherError;
use crate::types::{Mother, RegisterMotherInput};
use chrono::{DateTime, Utc};

pub trait MotherRepository {
    /// Insert or update by phone; a fresh insert allocates the next
    /// `M-%04d` sequence, an update keeps the existing one.
    fn upsert(&self, input: RegisterMotherInput) -> Result<Mother, MotherError>;
    fn get(&self, phone: &str) -> Result<Option<Mother>, MotherError>;
    fn touch_last_contact(&self, phone: &str, at: DateTime<Utc>) -> Result<(), MotherError>;
}
