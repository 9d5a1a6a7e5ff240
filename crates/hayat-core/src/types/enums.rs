use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Language {
    English,
    Arabic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum SkillType {
    Midwife,
    Nurse,
    TrainedAttendant,
    CommunityHealthWorker,
    CommunityVolunteer,
}

impl SkillType {
    /// Lower number = higher dispatch priority.
    pub fn priority(self) -> u8 {
        match self {
            SkillType::Midwife => 1,
            SkillType::Nurse => 2,
            SkillType::TrainedAttendant => 3,
            SkillType::CommunityHealthWorker => 4,
            SkillType::CommunityVolunteer => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Availability {
    Available,
    Busy,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum RequestCategory {
    Labor,
    Bleeding,
    PainFever,
    BabyMovement,
    Advice,
    Other,
    /// Deprecated catch-all kept for messages sent by the plain
    /// EMERGENCY command; matches like `Other` under the flag model.
    Emergency,
    /// Deprecated catch-all for the plain SUPPORT command.
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
    /// Reserved for future aging logic; nothing transitions here yet.
    Escalated,
}

impl RequestStatus {
    pub fn is_active(self) -> bool {
        matches!(
            self,
            RequestStatus::Pending | RequestStatus::Accepted | RequestStatus::InProgress
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum DialoguePhase {
    RoleDetection,
    MotherRegistration,
    VolunteerRegistration,
    HelpRequest,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum DialogueStatus {
    Active,
    Completed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum CommandKind {
    RegisterMother,
    RegisterVolunteer,
    Emergency,
    Support,
    Accept,
    Complete,
    Cancel,
    Available,
    Busy,
    Offline,
    Status,
    Help,
    EtaReply,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptRole {
    User,
    Assistant,
}
