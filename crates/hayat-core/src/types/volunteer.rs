use crate::types::enums::{Availability, Language, RequestCategory, SkillType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which rule set decides what this volunteer can be matched to.
///
/// Legacy registrations carry a ranked skill plus covered zones; newer
/// ones carry per-category capability flags and no zone list. Exactly
/// one model applies per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "model", rename_all = "PascalCase")]
pub enum Eligibility {
    ZoneSkill {
        skill: SkillType,
        zones: Vec<String>,
    },
    CapabilityFlags {
        labor: bool,
        bleeding: bool,
        pain_fever: bool,
        baby_movement: bool,
        advice: bool,
    },
}

impl Eligibility {
    pub fn any_capability(&self) -> bool {
        match self {
            Eligibility::ZoneSkill { .. } => true,
            Eligibility::CapabilityFlags {
                labor,
                bleeding,
                pain_fever,
                baby_movement,
                advice,
            } => *labor || *bleeding || *pain_fever || *baby_movement || *advice,
        }
    }

    pub fn covers_category(&self, category: RequestCategory) -> bool {
        match self {
            Eligibility::ZoneSkill { .. } => true,
            Eligibility::CapabilityFlags {
                labor,
                bleeding,
                pain_fever,
                baby_movement,
                advice,
            } => match category {
                RequestCategory::Labor => *labor,
                RequestCategory::Bleeding => *bleeding,
                RequestCategory::PainFever => *pain_fever,
                RequestCategory::BabyMovement => *baby_movement,
                RequestCategory::Advice => *advice,
                RequestCategory::Other | RequestCategory::Emergency | RequestCategory::Support => {
                    self.any_capability()
                }
            },
        }
    }

    pub fn covers_zone(&self, zone: &str) -> bool {
        match self {
            Eligibility::ZoneSkill { zones, .. } => zones.iter().any(|z| z == zone),
            Eligibility::CapabilityFlags { .. } => true,
        }
    }

    /// Dispatch rank; flag-model volunteers rank as community volunteers.
    pub fn priority(&self) -> u8 {
        match self {
            Eligibility::ZoneSkill { skill, .. } => skill.priority(),
            Eligibility::CapabilityFlags { .. } => SkillType::CommunityVolunteer.priority(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Volunteer {
    pub phone: String,
    pub name: Option<String>,
    pub camp: Option<String>,
    pub eligibility: Eligibility,
    pub availability: Availability,
    /// Case code of the request this volunteer is currently working.
    pub current_case: Option<String>,
    pub completed_cases: u32,
    pub language: Language,
    pub registered_at: DateTime<Utc>,
}
