use crate::types::enums::{RequestCategory, RequestStatus, RiskLevel};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HelpRequest {
    /// Case code, `HR-` + zero-padded sequence.
    pub code: String,
    pub mother_phone: String,
    pub category: RequestCategory,
    pub status: RequestStatus,
    /// Zone/risk/due-date are snapshots of the mother's profile at
    /// creation time; later profile edits do not rewrite them.
    pub zone: String,
    pub risk: RiskLevel,
    pub due_date: Option<NaiveDate>,
    pub accepted_by: Option<String>,
    pub notes: Option<String>,
    pub alerts_sent: u32,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub in_progress_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl HelpRequest {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// One volunteer's offered ETA for a pending case. Recorded for future
/// ETA-based selection; nothing assigns from these rows today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VolunteerResponse {
    pub case_code: String,
    pub volunteer_phone: String,
    pub eta_minutes: u32,
    pub selected: bool,
    pub created_at: DateTime<Utc>,
}
