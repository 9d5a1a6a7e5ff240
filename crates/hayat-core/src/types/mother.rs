use crate::types::enums::{Language, RiskLevel};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Mother {
    /// E.164-like phone number, the identity key.
    pub phone: String,
    /// Sequence behind the public `M-%04d` id.
    pub seq: u32,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub camp: String,
    pub zone: String,
    pub due_date: Option<NaiveDate>,
    pub prev_complications: bool,
    pub risk: RiskLevel,
    pub language: Language,
    pub registered_at: DateTime<Utc>,
    pub last_contact_at: Option<DateTime<Utc>>,
}

impl Mother {
    pub fn public_id(&self) -> String {
        format!("M-{:04}", self.seq)
    }
}
