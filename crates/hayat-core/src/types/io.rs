use crate::types::enums::{CommandKind, Language, RiskLevel};
use crate::types::volunteer::Eligibility;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterMotherInput {
    pub phone: String,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub camp: String,
    pub zone: String,
    pub due_date: Option<NaiveDate>,
    pub prev_complications: bool,
    pub risk: RiskLevel,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterVolunteerInput {
    pub phone: String,
    pub name: Option<String>,
    pub camp: Option<String>,
    pub eligibility: Eligibility,
    pub language: Language,
}

/// What one inbound message produced, echoed back by the simulation
/// endpoint and rendered as transport markup by the webhook.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DispatchOutcome {
    pub command: CommandKind,
    pub language: Language,
    pub reply: String,
    pub success: bool,
    pub params: BTreeMap<String, String>,
}

impl DispatchOutcome {
    pub fn new(command: CommandKind, language: Language, reply: String, success: bool) -> Self {
        Self {
            command,
            language,
            reply,
            success,
            params: BTreeMap::new(),
        }
    }

    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }
}
