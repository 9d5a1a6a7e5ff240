//! The dispatch facade. One inbound SMS becomes one synchronous
//! request-response cycle: expire idle dialogues, normalize, match the
//! command grammar, and either run the matching domain operation or
//! hand the turn to the conversational fallback. Every path ends in a
//! bilingual reply; nothing propagates past this boundary.

use crate::collaborator::{Collaborator, DialogueAction};
use crate::command::{self, ParsedCommand};
use crate::dialogue;
use crate::dialogues::DialogueRepository;
use crate::error::{HayatError, RequestError};
use crate::matching;
use crate::mothers::MotherRepository;
use crate::normalize;
use crate::phone;
use crate::replies;
use crate::requests::RequestRepository;
use crate::responses::ResponseRepository;
use crate::sms::SmsGateway;
use crate::store::Store;
use crate::types::{
    Availability, CommandKind, Dialogue, DialoguePhase, DialogueStatus, DispatchOutcome,
    HelpRequest, Language, Mother, RegisterMotherInput, RegisterVolunteerInput, RequestCategory,
    RequestStatus, RiskLevel, Volunteer,
};
use crate::volunteers::VolunteerRepository;
use chrono::{Duration, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub struct Hayat<S: Store, C: Collaborator, G: SmsGateway> {
    store: S,
    collaborator: C,
    gateway: G,
    dialogue_timeout: Duration,
}

impl<S: Store, C: Collaborator, G: SmsGateway> Hayat<S, C, G> {
    pub fn new(store: S, collaborator: C, gateway: G, dialogue_timeout: Duration) -> Self {
        Self {
            store,
            collaborator,
            gateway,
            dialogue_timeout,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn handle_message(&self, from: &str, body: &str) -> DispatchOutcome {
        let sender = phone::canonicalize(from);
        let language = normalize::detect_language(body);
        if !phone::is_valid(&sender) {
            warn!(from = %phone::mask(&sender), "rejected message with invalid sender number");
            return DispatchOutcome::new(
                CommandKind::Unknown,
                language,
                replies::invalid_phone(language),
                false,
            );
        }

        self.expire_idle_dialogues();

        let canonical = normalize::normalize(body);
        let parsed = command::match_command(&canonical);
        debug!(
            from = %phone::mask(&sender),
            kind = ?parsed.kind,
            lang = ?language,
            "inbound message parsed"
        );

        // A mother's preferred language wins over per-message detection
        // once she is registered.
        let language = self.stored_language(&sender).unwrap_or(language);

        let outcome = match parsed.kind {
            CommandKind::RegisterMother => self.register_mother(&sender, language, &parsed),
            CommandKind::RegisterVolunteer => self.register_volunteer(&sender, language, &parsed),
            CommandKind::Emergency => {
                self.create_request(&sender, language, RequestCategory::Emergency, None)
                    .await
            }
            CommandKind::Support => {
                self.create_request(&sender, language, RequestCategory::Support, None)
                    .await
            }
            CommandKind::Accept => self.accept_case(&sender, language, &parsed).await,
            CommandKind::Complete => self.complete_case(&sender, language, &parsed),
            CommandKind::Cancel => self.cancel_case(&sender, language, &parsed),
            CommandKind::Available => self.set_availability(&sender, language, Availability::Available),
            CommandKind::Busy => self.set_availability(&sender, language, Availability::Busy),
            CommandKind::Offline => self.set_availability(&sender, language, Availability::Offline),
            CommandKind::Status => self.status(&sender, language),
            CommandKind::Help => Ok(DispatchOutcome::new(
                CommandKind::Help,
                language,
                replies::help_text(language),
                true,
            )),
            CommandKind::EtaReply => self.record_eta(&sender, language, &parsed, body).await,
            CommandKind::Unknown => self.dialogue_turn(&sender, language, body).await,
        };

        self.touch_mother(&sender);

        match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(from = %phone::mask(&sender), error = %err, "dispatch failed");
                DispatchOutcome::new(
                    parsed.kind,
                    language,
                    replies::internal_error(language),
                    false,
                )
            }
        }
    }

    fn expire_idle_dialogues(&self) {
        let cutoff = Utc::now() - self.dialogue_timeout;
        match self.store.dialogues().expire_idle(cutoff) {
            Ok(0) => {}
            Ok(count) => info!(count, "expired idle dialogues"),
            Err(err) => warn!(error = %err, "dialogue expiry sweep failed"),
        }
    }

    fn stored_language(&self, sender: &str) -> Option<Language> {
        if let Ok(Some(mother)) = self.store.mothers().get(sender) {
            return Some(mother.language);
        }
        if let Ok(Some(volunteer)) = self.store.volunteers().get(sender) {
            return Some(volunteer.language);
        }
        None
    }

    fn touch_mother(&self, sender: &str) {
        if let Err(err) = self.store.mothers().touch_last_contact(sender, Utc::now()) {
            debug!(error = %err, "could not update last contact");
        }
    }

    fn register_mother(
        &self,
        sender: &str,
        language: Language,
        parsed: &ParsedCommand,
    ) -> Result<DispatchOutcome, HayatError> {
        let Some(camp) = parsed.field("camp") else {
            return Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::missing_field(language, "CAMP"),
                false,
            ));
        };
        let Some(zone) = parsed.field("zone") else {
            return Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::missing_field(language, "ZONE"),
                false,
            ));
        };
        let due_date = parsed
            .field("due")
            .and_then(|v| command::parse_due_date(v, command::current_year()));
        let risk = match parsed.field("risk") {
            None => RiskLevel::Low,
            Some(value) => command::parse_risk(value).unwrap_or_else(|| {
                info!(value, "unrecognized risk level, falling back to LOW");
                RiskLevel::Low
            }),
        };
        let input = RegisterMotherInput {
            phone: sender.to_string(),
            name: parsed.field("name").map(str::to_string),
            age: None,
            camp: camp.to_string(),
            zone: zone.to_string(),
            due_date,
            prev_complications: matches!(risk, RiskLevel::High | RiskLevel::Medium),
            risk,
            language,
        };
        let mother = self
            .store
            .with_tx(|store| Ok(store.mothers().upsert(input.clone())?))?;
        info!(id = %mother.public_id(), "mother registered");
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), mother.public_id());
        params.insert("camp".to_string(), mother.camp.clone());
        params.insert("zone".to_string(), mother.zone.clone());
        Ok(DispatchOutcome::new(
            parsed.kind,
            language,
            replies::mother_registered(language, &mother.public_id(), &mother.camp, &mother.zone),
            true,
        )
        .with_params(params))
    }

    fn register_volunteer(
        &self,
        sender: &str,
        language: Language,
        parsed: &ParsedCommand,
    ) -> Result<DispatchOutcome, HayatError> {
        let Some(camp) = parsed.field("camp") else {
            return Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::missing_field(language, "CAMP"),
                false,
            ));
        };
        let Some(zones_raw) = parsed.field("zones") else {
            return Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::missing_field(language, "ZONE"),
                false,
            ));
        };
        let zones: Vec<String> = zones_raw
            .split(',')
            .map(|z| z.trim().to_string())
            .filter(|z| !z.is_empty())
            .collect();
        let skill = match parsed.field("skill") {
            None => crate::types::SkillType::CommunityVolunteer,
            Some(value) => command::parse_skill(value).unwrap_or_else(|| {
                info!(value, "unrecognized skill, falling back to community volunteer");
                crate::types::SkillType::CommunityVolunteer
            }),
        };
        let input = RegisterVolunteerInput {
            phone: sender.to_string(),
            name: parsed.field("name").map(str::to_string),
            camp: Some(camp.to_string()),
            eligibility: crate::types::Eligibility::ZoneSkill { skill, zones },
            language,
        };
        let volunteer = self
            .store
            .with_tx(|store| Ok(store.volunteers().upsert(input.clone())?))?;
        info!(from = %phone::mask(sender), "volunteer registered");
        let display = volunteer.name.clone().unwrap_or_else(|| "volunteer".to_string());
        Ok(DispatchOutcome::new(
            parsed.kind,
            language,
            replies::volunteer_registered(language, &display),
            true,
        ))
    }

    async fn create_request(
        &self,
        sender: &str,
        language: Language,
        category: RequestCategory,
        notes: Option<String>,
    ) -> Result<DispatchOutcome, HayatError> {
        let kind = match category {
            RequestCategory::Support => CommandKind::Support,
            _ => CommandKind::Emergency,
        };
        let Some(mother) = self.store.mothers().get(sender)? else {
            return Ok(DispatchOutcome::new(
                kind,
                language,
                replies::not_registered(language),
                false,
            ));
        };
        let request = self
            .store
            .with_tx(|store| Ok(store.requests().create(&mother, category, notes.clone())?))?;
        let notified = self.notify_volunteers(&request).await?;
        info!(
            code = %request.code,
            category = ?category,
            notified,
            "help request created"
        );
        let mut params = BTreeMap::new();
        params.insert("case".to_string(), request.code.clone());
        params.insert("notified".to_string(), notified.to_string());
        Ok(DispatchOutcome::new(
            kind,
            language,
            replies::request_created(language, &request.code, notified),
            true,
        )
        .with_params(params))
    }

    /// Ranks the available pool and fires one alert per selected
    /// volunteer. Send attempts count; delivery is not confirmed here.
    async fn notify_volunteers(&self, request: &HelpRequest) -> Result<usize, HayatError> {
        let pool = self.store.volunteers().list_available()?;
        let ranked = matching::rank_eligible(pool, request);
        for volunteer in &ranked {
            let alert = replies::volunteer_alert(
                volunteer.language,
                &request.code,
                request.category,
                &request.zone,
                request.risk,
            );
            self.gateway.send(&volunteer.phone, &alert).await;
            self.store.requests().increment_alerts(&request.code)?;
            debug!(
                code = %request.code,
                to = %phone::mask(&volunteer.phone),
                "volunteer alerted"
            );
        }
        Ok(ranked.len())
    }

    async fn accept_case(
        &self,
        sender: &str,
        language: Language,
        parsed: &ParsedCommand,
    ) -> Result<DispatchOutcome, HayatError> {
        let Some(volunteer) = self.store.volunteers().get(sender)? else {
            return Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::not_registered(language),
                false,
            ));
        };
        let Some(code) = parsed.field("case") else {
            return Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::missing_field(language, "CASE"),
                false,
            ));
        };

        let accepted = self.store.with_tx(|store| {
            let Some(request) = store.requests().get(code)? else {
                return Ok(None);
            };
            if request.status != RequestStatus::Pending {
                return Err(RequestError::InvalidTransition {
                    from: request.status,
                    to: RequestStatus::Accepted,
                }
                .into());
            }
            let updated = store.requests().set_status(
                code,
                RequestStatus::Accepted,
                Some(&volunteer.phone),
                Utc::now(),
            )?;
            store.volunteers().assign_case(&volunteer.phone, code)?;
            Ok(Some(updated))
        });

        match accepted {
            Ok(Some(request)) => {
                if let Some(mother) = self.store.mothers().get(&request.mother_phone)? {
                    let display = volunteer.name.clone().unwrap_or_else(|| "volunteer".to_string());
                    let note = replies::mother_case_accepted(mother.language, code, &display);
                    self.gateway.send(&mother.phone, &note).await;
                }
                info!(code, by = %phone::mask(sender), "case accepted");
                Ok(DispatchOutcome::new(
                    parsed.kind,
                    language,
                    replies::case_accepted(language, code),
                    true,
                ))
            }
            Ok(None) => Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::case_not_found(language, code),
                false,
            )),
            Err(HayatError::Request(RequestError::InvalidTransition { .. })) => {
                Ok(DispatchOutcome::new(
                    parsed.kind,
                    language,
                    replies::wrong_state(language, code),
                    false,
                ))
            }
            Err(err) => Err(err),
        }
    }

    fn complete_case(
        &self,
        sender: &str,
        language: Language,
        parsed: &ParsedCommand,
    ) -> Result<DispatchOutcome, HayatError> {
        let Some(code) = parsed.field("case") else {
            return Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::missing_field(language, "CASE"),
                false,
            ));
        };

        let result = self.store.with_tx(|store| {
            let Some(request) = store.requests().get(code)? else {
                return Ok(None);
            };
            // Strict identity match: only the assigned volunteer closes.
            if request.accepted_by.as_deref() != Some(sender) {
                return Err(RequestError::Unauthorized.into());
            }
            if !matches!(
                request.status,
                RequestStatus::Accepted | RequestStatus::InProgress
            ) {
                return Err(RequestError::InvalidTransition {
                    from: request.status,
                    to: RequestStatus::Completed,
                }
                .into());
            }
            store
                .requests()
                .set_status(code, RequestStatus::Completed, None, Utc::now())?;
            let volunteer = store.volunteers().release_case(sender, true)?;
            Ok(Some(volunteer))
        });

        self.case_mutation_outcome(result, parsed.kind, language, code, |volunteer| {
            replies::case_completed(language, code, volunteer.completed_cases)
        })
    }

    fn cancel_case(
        &self,
        sender: &str,
        language: Language,
        parsed: &ParsedCommand,
    ) -> Result<DispatchOutcome, HayatError> {
        let Some(code) = parsed.field("case") else {
            return Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::missing_field(language, "CASE"),
                false,
            ));
        };

        let result = self.store.with_tx(|store| {
            let Some(request) = store.requests().get(code)? else {
                return Ok(None);
            };
            let is_mother = request.mother_phone == sender;
            let is_assigned = request.accepted_by.as_deref() == Some(sender);
            if !is_mother && !is_assigned {
                return Err(RequestError::Unauthorized.into());
            }
            if !request.is_active() {
                return Err(RequestError::InvalidTransition {
                    from: request.status,
                    to: RequestStatus::Cancelled,
                }
                .into());
            }
            store
                .requests()
                .set_status(code, RequestStatus::Cancelled, None, Utc::now())?;
            if let Some(assigned) = request.accepted_by.as_deref() {
                store.volunteers().release_case(assigned, false)?;
            }
            Ok(Some(()))
        });

        match result {
            Ok(Some(())) => {
                info!(code, by = %phone::mask(sender), "case cancelled");
                Ok(DispatchOutcome::new(
                    parsed.kind,
                    language,
                    replies::case_cancelled(language, code),
                    true,
                ))
            }
            Ok(None) => Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::case_not_found(language, code),
                false,
            )),
            Err(HayatError::Request(RequestError::Unauthorized)) => Ok(DispatchOutcome::new(
                parsed.kind,
                language,
                replies::unauthorized(language, code),
                false,
            )),
            Err(HayatError::Request(RequestError::InvalidTransition { .. })) => {
                Ok(DispatchOutcome::new(
                    parsed.kind,
                    language,
                    replies::wrong_state(language, code),
                    false,
                ))
            }
            Err(err) => Err(err),
        }
    }

    fn case_mutation_outcome(
        &self,
        result: Result<Option<Volunteer>, HayatError>,
        kind: CommandKind,
        language: Language,
        code: &str,
        success_reply: impl FnOnce(&Volunteer) -> String,
    ) -> Result<DispatchOutcome, HayatError> {
        match result {
            Ok(Some(volunteer)) => {
                info!(code, "case closed");
                Ok(DispatchOutcome::new(kind, language, success_reply(&volunteer), true))
            }
            Ok(None) => Ok(DispatchOutcome::new(
                kind,
                language,
                replies::case_not_found(language, code),
                false,
            )),
            Err(HayatError::Request(RequestError::Unauthorized)) => Ok(DispatchOutcome::new(
                kind,
                language,
                replies::unauthorized(language, code),
                false,
            )),
            Err(HayatError::Request(RequestError::InvalidTransition { .. })) => {
                Ok(DispatchOutcome::new(
                    kind,
                    language,
                    replies::wrong_state(language, code),
                    false,
                ))
            }
            Err(err) => Err(err),
        }
    }

    fn set_availability(
        &self,
        sender: &str,
        language: Language,
        availability: Availability,
    ) -> Result<DispatchOutcome, HayatError> {
        let kind = match availability {
            Availability::Available => CommandKind::Available,
            Availability::Busy => CommandKind::Busy,
            Availability::Offline => CommandKind::Offline,
        };
        if self.store.volunteers().get(sender)?.is_none() {
            return Ok(DispatchOutcome::new(
                kind,
                language,
                replies::not_registered(language),
                false,
            ));
        }
        let updated = self
            .store
            .with_tx(|store| Ok(store.volunteers().set_availability(sender, availability)?))?;
        Ok(DispatchOutcome::new(
            kind,
            language,
            replies::availability_set(language, updated.availability),
            true,
        ))
    }

    fn status(&self, sender: &str, language: Language) -> Result<DispatchOutcome, HayatError> {
        if let Some(mother) = self.store.mothers().get(sender)? {
            let active = self.store.requests().find_active_by_mother(sender)?;
            return Ok(DispatchOutcome::new(
                CommandKind::Status,
                language,
                replies::mother_status(
                    language,
                    &mother.public_id(),
                    &mother.zone,
                    active.as_ref().map(|r| r.code.as_str()),
                ),
                true,
            ));
        }
        if let Some(volunteer) = self.store.volunteers().get(sender)? {
            return Ok(DispatchOutcome::new(
                CommandKind::Status,
                language,
                replies::volunteer_status(
                    language,
                    volunteer.availability,
                    volunteer.current_case.as_deref(),
                    volunteer.completed_cases,
                ),
                true,
            ));
        }
        Ok(DispatchOutcome::new(
            CommandKind::Status,
            language,
            replies::not_registered(language),
            false,
        ))
    }

    /// A bare number from a known, unassigned volunteer is an ETA offer
    /// against the most recent pending case. Anyone else's bare number
    /// falls through to the dialogue engine.
    async fn record_eta(
        &self,
        sender: &str,
        language: Language,
        parsed: &ParsedCommand,
        body: &str,
    ) -> Result<DispatchOutcome, HayatError> {
        let volunteer = self.store.volunteers().get(sender)?;
        let minutes: Option<u32> = parsed.field("eta").and_then(|v| v.parse().ok());
        if let (Some(volunteer), Some(minutes)) = (&volunteer, minutes) {
            if volunteer.current_case.is_none() {
                if let Some(request) = self.store.requests().latest_pending()? {
                    self.store
                        .responses()
                        .record(&request.code, &volunteer.phone, minutes)?;
                    info!(
                        code = %request.code,
                        minutes,
                        from = %phone::mask(sender),
                        "volunteer ETA recorded"
                    );
                    return Ok(DispatchOutcome::new(
                        CommandKind::EtaReply,
                        language,
                        replies::eta_recorded(language, &request.code, minutes),
                        true,
                    ));
                }
            }
        }
        self.dialogue_turn(sender, language, body).await
    }

    /// One conversational fallback turn. Creates the ACTIVE record on
    /// first contact, delegates to the collaborator, merges extracted
    /// fields, and runs the finalize action when the collaborator
    /// signals completion.
    async fn dialogue_turn(
        &self,
        sender: &str,
        language: Language,
        body: &str,
    ) -> Result<DispatchOutcome, HayatError> {
        let now = Utc::now();
        let mut dialogue = match self.store.dialogues().get_active(sender)? {
            Some(existing) => existing,
            None => self.store.with_tx(|store| {
                Ok(store
                    .dialogues()
                    .create(sender, DialoguePhase::RoleDetection, language, now)?)
            })?,
        };

        let prompt = dialogue::system_prompt(dialogue.phase, &dialogue.collected);
        let mut call_transcript = dialogue.transcript.clone();
        call_transcript.push(crate::types::TranscriptEntry {
            role: crate::types::TranscriptRole::User,
            content: body.to_string(),
        });
        let reply = self.collaborator.converse(&prompt, &call_transcript).await;

        if let Some(extracted) = reply.extracted_data.clone() {
            if dialogue.phase == DialoguePhase::RoleDetection {
                if let Some(next) = dialogue::phase_from_role_hint(&extracted) {
                    debug!(phase = ?next, "role detected, advancing dialogue phase");
                    dialogue.phase = next;
                }
            }
            dialogue.merge_collected(extracted);
        }
        if let (Some(action), DialoguePhase::RoleDetection) = (reply.action, dialogue.phase) {
            dialogue.phase = dialogue::phase_for_action(action);
        }

        let mut user_reply = reply.reply.clone();
        let mut finalized = false;
        if reply.is_complete {
            match self.finalize_dialogue(&dialogue, reply.action, language).await {
                Ok(Some(confirmation)) => {
                    user_reply = confirmation;
                    finalized = true;
                }
                Ok(None) => finalized = true,
                Err(err) => {
                    // Not enough data after all; keep the dialogue open.
                    warn!(error = %err, "dialogue finalize failed, keeping dialogue active");
                }
            }
        }

        dialogue.push_turn(body, &user_reply);
        dialogue.updated_at = now;
        let dialogue_id = dialogue.id;
        self.store.with_tx(|store| {
            store.dialogues().save(&dialogue)?;
            if finalized {
                store.dialogues().set_status(dialogue_id, DialogueStatus::Completed)?;
            }
            Ok(())
        })?;

        Ok(DispatchOutcome::new(
            CommandKind::Unknown,
            language,
            user_reply,
            true,
        ))
    }

    /// Runs the phase's finalize action. Returns a templated
    /// confirmation to send instead of the collaborator's reply when
    /// the action produced something worth reporting (an id, a case
    /// code and alert count).
    async fn finalize_dialogue(
        &self,
        dialogue: &Dialogue,
        action: Option<DialogueAction>,
        language: Language,
    ) -> Result<Option<String>, HayatError> {
        let action = action.or(match dialogue.phase {
            DialoguePhase::MotherRegistration => Some(DialogueAction::RegisterMother),
            DialoguePhase::VolunteerRegistration => Some(DialogueAction::RegisterVolunteer),
            DialoguePhase::HelpRequest => Some(DialogueAction::CreateHelpRequest),
            DialoguePhase::RoleDetection | DialoguePhase::General => None,
        });
        let Some(action) = action else {
            return Ok(None);
        };

        match action {
            DialogueAction::RegisterMother => {
                let input =
                    dialogue::mother_input_from_bag(&dialogue.phone, language, &dialogue.collected)?;
                let mother = self
                    .store
                    .with_tx(|store| Ok(store.mothers().upsert(input.clone())?))?;
                info!(id = %mother.public_id(), "mother registered via dialogue");
                Ok(Some(replies::mother_registered(
                    language,
                    &mother.public_id(),
                    &mother.camp,
                    &mother.zone,
                )))
            }
            DialogueAction::RegisterVolunteer => {
                let input = dialogue::volunteer_input_from_bag(
                    &dialogue.phone,
                    language,
                    &dialogue.collected,
                )?;
                let volunteer = self
                    .store
                    .with_tx(|store| Ok(store.volunteers().upsert(input.clone())?))?;
                info!(from = %phone::mask(&dialogue.phone), "volunteer registered via dialogue");
                let display = volunteer.name.clone().unwrap_or_else(|| "volunteer".to_string());
                Ok(Some(replies::volunteer_registered(language, &display)))
            }
            DialogueAction::CreateHelpRequest => {
                let category = dialogue::category_from_bag(&dialogue.collected);
                let notes = dialogue
                    .collected
                    .get("notes")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);
                let Some(mother) = self.store.mothers().get(&dialogue.phone)? else {
                    // An unknown sender asking for help gets registered
                    // first when the bag carries enough profile data.
                    let input = dialogue::mother_input_from_bag(
                        &dialogue.phone,
                        language,
                        &dialogue.collected,
                    )?;
                    let mother = self
                        .store
                        .with_tx(|store| Ok(store.mothers().upsert(input.clone())?))?;
                    let outcome = self
                        .create_request_for(&mother, category, notes)
                        .await?;
                    return Ok(Some(outcome));
                };
                let outcome = self.create_request_for(&mother, category, notes).await?;
                Ok(Some(outcome))
            }
        }
    }

    async fn create_request_for(
        &self,
        mother: &Mother,
        category: RequestCategory,
        notes: Option<String>,
    ) -> Result<String, HayatError> {
        let request = self
            .store
            .with_tx(|store| Ok(store.requests().create(mother, category, notes.clone())?))?;
        let notified = self.notify_volunteers(&request).await?;
        info!(code = %request.code, ?category, notified, "help request created via dialogue");
        Ok(replies::request_created(mother.language, &request.code, notified))
    }
}
