//! Conversational fallback support: the four phase prompt templates and
//! the interpretation of the collected data bag when a dialogue
//! finalizes. Turn orchestration itself lives in the facade.

use crate::collaborator::DialogueAction;
use crate::error::DialogueError;
use crate::types::{
    DialoguePhase, Eligibility, Language, RegisterMotherInput, RegisterVolunteerInput,
    RequestCategory, RiskLevel,
};
use serde_json::{Map, Value};

const BASE_PROMPT: &str = "You are Hayat, an SMS assistant for maternal health in refugee camps. \
Messages are plain SMS from basic phones; keep replies under 300 characters, warm and simple. \
The sender may write in English or Arabic; answer in the sender's language. \
Always respond with a single JSON object: \
{\"reply\": string, \"extracted_data\": object or null, \"is_complete\": boolean, \"action\": string or null}. \
Valid actions: REGISTER_MOTHER, REGISTER_VOLUNTEER, CREATE_HELP_REQUEST.";

/// System prompt for one delegation turn: base instructions plus the
/// phase template, interpolated with what is already known.
pub fn system_prompt(phase: DialoguePhase, collected: &Map<String, Value>) -> String {
    let known = if collected.is_empty() {
        "nothing yet".to_string()
    } else {
        serde_json::to_string(collected).unwrap_or_else(|_| "nothing yet".to_string())
    };
    let phase_part = match phase {
        DialoguePhase::RoleDetection => {
            "Find out whether the sender is an expectant mother needing help or someone offering \
to volunteer. Put {\"role\": \"mother\"} or {\"role\": \"volunteer\"} in extracted_data as soon \
as you know. If they describe an urgent medical problem, treat them as a mother."
        }
        DialoguePhase::MotherRegistration => {
            "You are registering an expectant mother. Collect: camp, zone, due date (day-month), \
risk factors or prior complications, and optionally her name and age. Put each as a key in \
extracted_data (camp, zone, due, risk, name, age). When camp and zone are known, set \
is_complete=true and action=REGISTER_MOTHER."
        }
        DialoguePhase::VolunteerRegistration => {
            "You are registering a volunteer responder. Collect: name, camp, the zones she can \
cover, and her skill (midwife, nurse, trained attendant, community health worker, or community \
volunteer). Keys: name, camp, zones, skill. When camp and zones are known, set is_complete=true \
and action=REGISTER_VOLUNTEER."
        }
        DialoguePhase::HelpRequest => {
            "The sender needs help. Classify the problem into exactly one category: labor, \
bleeding, pain_fever, baby_movement, advice, or other. Put {\"category\": ...} plus a short \
{\"notes\": ...} summary in extracted_data. For anything urgent set is_complete=true and \
action=CREATE_HELP_REQUEST immediately instead of asking more questions."
        }
        DialoguePhase::General => {
            "Answer briefly and helpfully. If the sender turns out to need medical help, put \
{\"category\": ...} in extracted_data and set action=CREATE_HELP_REQUEST."
        }
    };
    format!("{BASE_PROMPT}\n\n{phase_part}\n\nKnown so far: {known}")
}

/// A role hint from the role-detection phase moves the dialogue
/// straight into the matching registration phase.
pub fn phase_from_role_hint(extracted: &Map<String, Value>) -> Option<DialoguePhase> {
    match extracted.get("role").and_then(Value::as_str) {
        Some("mother") => Some(DialoguePhase::MotherRegistration),
        Some("volunteer") => Some(DialoguePhase::VolunteerRegistration),
        _ => None,
    }
}

pub fn phase_for_action(action: DialogueAction) -> DialoguePhase {
    match action {
        DialogueAction::RegisterMother => DialoguePhase::MotherRegistration,
        DialogueAction::RegisterVolunteer => DialoguePhase::VolunteerRegistration,
        DialogueAction::CreateHelpRequest => DialoguePhase::HelpRequest,
    }
}

fn bag_str(bag: &Map<String, Value>, key: &str) -> Option<String> {
    match bag.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn mother_input_from_bag(
    phone: &str,
    language: Language,
    bag: &Map<String, Value>,
) -> Result<RegisterMotherInput, DialogueError> {
    let camp = bag_str(bag, "camp").ok_or(DialogueError::InvalidInput {
        message: "camp missing from collected data".to_string(),
    })?;
    let zone = bag_str(bag, "zone").ok_or(DialogueError::InvalidInput {
        message: "zone missing from collected data".to_string(),
    })?;
    let due_date = bag_str(bag, "due")
        .and_then(|v| crate::command::parse_due_date(&v, crate::command::current_year()));
    let risk = bag_str(bag, "risk")
        .and_then(|v| crate::command::parse_risk(&v))
        .unwrap_or(RiskLevel::Low);
    let age = bag.get("age").and_then(Value::as_u64).map(|a| a as u32);
    Ok(RegisterMotherInput {
        phone: phone.to_string(),
        name: bag_str(bag, "name"),
        age,
        camp,
        zone,
        due_date,
        prev_complications: matches!(risk, RiskLevel::High | RiskLevel::Medium),
        risk,
        language,
    })
}

pub fn volunteer_input_from_bag(
    phone: &str,
    language: Language,
    bag: &Map<String, Value>,
) -> Result<RegisterVolunteerInput, DialogueError> {
    let camp = bag_str(bag, "camp");
    let zones_raw = bag_str(bag, "zones").ok_or(DialogueError::InvalidInput {
        message: "zones missing from collected data".to_string(),
    })?;
    let zones: Vec<String> = zones_raw
        .split(',')
        .map(|z| z.trim().to_string())
        .filter(|z| !z.is_empty())
        .collect();
    if zones.is_empty() {
        return Err(DialogueError::InvalidInput {
            message: "zones missing from collected data".to_string(),
        });
    }
    let skill = bag_str(bag, "skill")
        .and_then(|v| crate::command::parse_skill(&v))
        .unwrap_or(crate::types::SkillType::CommunityVolunteer);
    Ok(RegisterVolunteerInput {
        phone: phone.to_string(),
        name: bag_str(bag, "name"),
        camp,
        eligibility: Eligibility::ZoneSkill { skill, zones },
        language,
    })
}

pub fn category_from_bag(bag: &Map<String, Value>) -> RequestCategory {
    match bag_str(bag, "category").as_deref() {
        Some("labor") => RequestCategory::Labor,
        Some("bleeding") => RequestCategory::Bleeding,
        Some("pain_fever") => RequestCategory::PainFever,
        Some("baby_movement") => RequestCategory::BabyMovement,
        Some("advice") => RequestCategory::Advice,
        _ => RequestCategory::Other,
    }
}
