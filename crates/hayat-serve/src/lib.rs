pub mod gateway;
pub mod openapi;
pub mod routes;

use axum::Router;
use chrono::Duration;
use hayat_core::collaborator::{Collaborator, NullCollaborator};
use hayat_core::hayat::Hayat;
use hayat_core::sms::SmsGateway;
use hayat_core::HayatError;
use hayat_db::schema;
use hayat_db::store::DbStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Serializes dialogue turns per sender phone so two overlapping
/// messages from one number cannot race the conversation state.
#[derive(Clone)]
pub struct PhoneLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl PhoneLocks {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn lock_for(&self, phone: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().await;
        map.entry(phone.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for PhoneLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_path: String,
    pub collaborator: Arc<dyn Collaborator>,
    pub gateway: Arc<dyn SmsGateway>,
    pub dialogue_timeout_mins: i64,
    pub locks: PhoneLocks,
}

impl AppState {
    pub fn new(
        db_path: String,
        collaborator: Arc<dyn Collaborator>,
        gateway: Arc<dyn SmsGateway>,
        dialogue_timeout_mins: i64,
    ) -> Self {
        Self {
            db_path,
            collaborator,
            gateway,
            dialogue_timeout_mins,
            locks: PhoneLocks::new(),
        }
    }
}

/// Builds the collaborator from the environment: the configured LLM
/// endpoint, or the fixed-reply null collaborator when none is set.
pub fn collaborator_from_env() -> Arc<dyn Collaborator> {
    match hayat_llm::LlmConfig::from_env() {
        Some(config) => Arc::new(hayat_llm::LlmClient::new(config)),
        None => Arc::new(NullCollaborator {
            unavailable_reply: hayat_llm::unavailable_reply(),
        }),
    }
}

pub fn build_hayat(
    state: &AppState,
) -> Result<Hayat<DbStore, Arc<dyn Collaborator>, Arc<dyn SmsGateway>>, HayatError> {
    let conn = schema::open_and_migrate(&state.db_path).map_err(|err| HayatError::Internal {
        message: err.to_string(),
    })?;
    Ok(Hayat::new(
        DbStore::new(conn),
        state.collaborator.clone(),
        state.gateway.clone(),
        Duration::minutes(state.dialogue_timeout_mins),
    ))
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hayat_core::collaborator::{CollaboratorReply, DialogueAction};
    use hayat_core::dialogues::DialogueRepository;
    use hayat_core::mothers::MotherRepository;
    use hayat_core::requests::RequestRepository;
    use hayat_core::responses::ResponseRepository;
    use hayat_core::store::Store;
    use hayat_core::types::{
        CommandKind, DialoguePhase, DialogueStatus, RequestCategory, RequestStatus, RiskLevel,
        TranscriptEntry,
    };
    use hayat_db::schema::with_test_db;
    use hayat_db::store::DbStore;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back a fixed script of collaborator replies, one per turn.
    struct ScriptedCollaborator {
        replies: Mutex<VecDeque<CollaboratorReply>>,
    }

    impl ScriptedCollaborator {
        fn new(replies: Vec<CollaboratorReply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }
    }

    #[async_trait]
    impl Collaborator for ScriptedCollaborator {
        async fn converse(
            &self,
            _system_prompt: &str,
            _transcript: &[TranscriptEntry],
        ) -> CollaboratorReply {
            self.replies
                .lock()
                .expect("script lock")
                .pop_front()
                .unwrap_or_else(|| CollaboratorReply::degraded("no scripted reply left"))
        }
    }

    /// Records every outbound message instead of sending it.
    #[derive(Default)]
    struct RecordingGateway {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingGateway {
        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().expect("gateway lock").clone()
        }
    }

    #[async_trait]
    impl SmsGateway for RecordingGateway {
        async fn send(&self, to: &str, body: &str) {
            self.sent
                .lock()
                .expect("gateway lock")
                .push((to.to_string(), body.to_string()));
        }
    }

    type TestEngine =
        hayat_core::hayat::Hayat<DbStore, Arc<dyn Collaborator>, Arc<RecordingGateway>>;

    fn engine(collaborator: Arc<dyn Collaborator>) -> (TestEngine, Arc<RecordingGateway>) {
        let conn = with_test_db().expect("in-memory db");
        let gateway = Arc::new(RecordingGateway::default());
        let engine = hayat_core::hayat::Hayat::new(
            DbStore::new(conn),
            collaborator,
            gateway.clone(),
            Duration::minutes(30),
        );
        (engine, gateway)
    }

    fn null_engine() -> (TestEngine, Arc<RecordingGateway>) {
        engine(Arc::new(NullCollaborator {
            unavailable_reply: "service unavailable".to_string(),
        }))
    }

    const MOTHER: &str = "+8801712000001";
    const MIDWIFE: &str = "+8801712000002";
    const SECOND_VOLUNTEER: &str = "+8801712000003";

    #[test]
    fn handle_message_future_is_send() {
        fn require_send<F: std::future::Future + Send>(_f: &F) {}
        let (engine, _) = null_engine();
        let future = engine.handle_message(MOTHER, "EMERGENCY");
        require_send(&future);
        drop(future);
    }

    #[tokio::test]
    async fn registration_message_creates_mother_with_generated_id() {
        let (engine, _) = null_engine();
        let outcome = engine
            .handle_message(MOTHER, "REG MOTHER CAMP A ZONE 3 DUE 15-02 RISK HIGH")
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.command, CommandKind::RegisterMother);
        assert!(outcome.reply.contains("M-0001"), "reply: {}", outcome.reply);

        let mother = engine
            .store()
            .mothers()
            .get(MOTHER)
            .expect("lookup")
            .expect("registered");
        assert_eq!(mother.camp, "A");
        assert_eq!(mother.zone, "3");
        assert_eq!(mother.risk, RiskLevel::High);
        assert!(mother.due_date.is_some());
    }

    #[tokio::test]
    async fn emergency_with_no_volunteers_records_pending_request() {
        let (engine, gateway) = null_engine();
        engine
            .handle_message(MOTHER, "REG MOTHER CAMP A ZONE 3 RISK HIGH")
            .await;

        let outcome = engine.handle_message(MOTHER, "EMERGENCY").await;
        assert!(outcome.success);
        assert_eq!(outcome.params.get("notified").map(String::as_str), Some("0"));

        let request = engine
            .store()
            .requests()
            .get("HR-0001")
            .expect("lookup")
            .expect("created");
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.category, RequestCategory::Emergency);
        assert_eq!(request.alerts_sent, 0);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn emergency_alerts_the_covering_midwife() {
        let (engine, gateway) = null_engine();
        engine
            .handle_message(MOTHER, "REG MOTHER CAMP A ZONE 3 RISK HIGH")
            .await;
        engine
            .handle_message(MIDWIFE, "REG VOLUNTEER NAME FATIMA CAMP A ZONE 3 SKILL MIDWIFE")
            .await;

        let outcome = engine.handle_message(MOTHER, "EMERGENCY").await;
        assert!(outcome.success);
        assert_eq!(outcome.params.get("notified").map(String::as_str), Some("1"));
        assert!(outcome.reply.contains("1 volunteer"), "reply: {}", outcome.reply);

        let request = engine
            .store()
            .requests()
            .get("HR-0001")
            .expect("lookup")
            .expect("created");
        assert_eq!(request.alerts_sent, 1);

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, MIDWIFE);
        assert!(sent[0].1.contains("HR-0001"));
    }

    #[tokio::test]
    async fn second_accept_of_the_same_case_is_rejected() {
        let (engine, gateway) = null_engine();
        engine
            .handle_message(MOTHER, "REG MOTHER CAMP A ZONE 3 RISK HIGH")
            .await;
        engine
            .handle_message(MIDWIFE, "REG VOLUNTEER NAME FATIMA CAMP A ZONE 3 SKILL MIDWIFE")
            .await;
        engine
            .handle_message(SECOND_VOLUNTEER, "REG VOLUNTEER NAME AYESHA CAMP A ZONE 3")
            .await;
        engine.handle_message(MOTHER, "EMERGENCY").await;

        let first = engine.handle_message(MIDWIFE, "ACCEPT HR-0001").await;
        assert!(first.success);

        let request = engine
            .store()
            .requests()
            .get("HR-0001")
            .expect("lookup")
            .expect("exists");
        assert_eq!(request.status, RequestStatus::Accepted);
        assert_eq!(request.accepted_by.as_deref(), Some(MIDWIFE));
        assert!(request.accepted_at.is_some());
        // The mother hears about the acceptance.
        assert!(gateway.sent().iter().any(|(to, _)| to == MOTHER));

        let second = engine.handle_message(SECOND_VOLUNTEER, "ACCEPT HR-0001").await;
        assert!(!second.success);
        let unchanged = engine
            .store()
            .requests()
            .get("HR-0001")
            .expect("lookup")
            .expect("exists");
        assert_eq!(unchanged.accepted_by.as_deref(), Some(MIDWIFE));
    }

    #[tokio::test]
    async fn support_request_from_unknown_sender_keeps_its_command_kind() {
        let (engine, gateway) = null_engine();
        let outcome = engine.handle_message(MOTHER, "SUPPORT").await;

        assert!(!outcome.success);
        assert_eq!(outcome.command, CommandKind::Support);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn bare_number_from_alerted_volunteer_records_an_eta() {
        let (engine, _) = null_engine();
        engine
            .handle_message(MOTHER, "REG MOTHER CAMP A ZONE 3 RISK HIGH")
            .await;
        engine
            .handle_message(MIDWIFE, "REG VOLUNTEER NAME FATIMA CAMP A ZONE 3 SKILL MIDWIFE")
            .await;
        engine.handle_message(MOTHER, "EMERGENCY").await;

        let outcome = engine.handle_message(MIDWIFE, "25").await;
        assert!(outcome.success);
        assert_eq!(outcome.command, CommandKind::EtaReply);
        assert!(outcome.reply.contains("HR-0001"), "reply: {}", outcome.reply);
        assert!(outcome.reply.contains("25"), "reply: {}", outcome.reply);

        let responses = engine
            .store()
            .responses()
            .list_by_case("HR-0001")
            .expect("lookup");
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].volunteer_phone, MIDWIFE);
        assert_eq!(responses[0].eta_minutes, 25);
        assert!(!responses[0].selected);
    }

    #[tokio::test]
    async fn bare_number_without_a_pending_case_falls_to_dialogue() {
        let collaborator = Arc::new(ScriptedCollaborator::new(vec![CollaboratorReply {
            reply: "Could you tell me what you need?".to_string(),
            extracted_data: None,
            is_complete: false,
            action: None,
        }]));
        let (engine, _) = engine(collaborator);
        engine
            .handle_message(MIDWIFE, "REG VOLUNTEER NAME FATIMA CAMP A ZONE 3 SKILL MIDWIFE")
            .await;

        let outcome = engine.handle_message(MIDWIFE, "25").await;
        assert_eq!(outcome.command, CommandKind::Unknown);
        assert!(outcome.reply.contains("what you need"), "reply: {}", outcome.reply);
        assert!(
            engine
                .store()
                .responses()
                .list_by_case("HR-0001")
                .expect("lookup")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn free_text_opens_a_dialogue_and_continues_it() {
        let collaborator = Arc::new(ScriptedCollaborator::new(vec![
            CollaboratorReply {
                reply: "Hello! Are you a mother needing help, or a volunteer?".to_string(),
                extracted_data: None,
                is_complete: false,
                action: None,
            },
            CollaboratorReply {
                reply: "Which camp do you live in?".to_string(),
                extracted_data: None,
                is_complete: false,
                action: None,
            },
        ]));
        let (engine, _) = engine(collaborator);

        let first = engine.handle_message(MOTHER, "hello i need some advice").await;
        assert_eq!(first.command, CommandKind::Unknown);
        assert!(first.reply.contains("mother needing help"));

        let dialogue = engine
            .store()
            .dialogues()
            .get_active(MOTHER)
            .expect("lookup")
            .expect("open dialogue");
        assert_eq!(dialogue.phase, DialoguePhase::RoleDetection);
        assert_eq!(dialogue.status, DialogueStatus::Active);
        assert_eq!(dialogue.turns, 2);

        let second = engine.handle_message(MOTHER, "i am pregnant").await;
        assert!(second.reply.contains("Which camp"));
        let continued = engine
            .store()
            .dialogues()
            .get_active(MOTHER)
            .expect("lookup")
            .expect("still open");
        assert_eq!(continued.id, dialogue.id);
        assert_eq!(continued.turns, 4);
    }

    #[tokio::test]
    async fn completed_dialogue_registers_the_mother() {
        let mut data = serde_json::Map::new();
        data.insert("role".to_string(), serde_json::Value::String("mother".to_string()));
        data.insert("camp".to_string(), serde_json::Value::String("B".to_string()));
        data.insert("zone".to_string(), serde_json::Value::String("7".to_string()));
        let collaborator = Arc::new(ScriptedCollaborator::new(vec![CollaboratorReply {
            reply: "Registering you now.".to_string(),
            extracted_data: Some(data),
            is_complete: true,
            action: Some(DialogueAction::RegisterMother),
        }]));
        let (engine, _) = engine(collaborator);

        let outcome = engine
            .handle_message(MOTHER, "hi i am a pregnant woman in camp B zone 7")
            .await;
        assert!(outcome.reply.contains("M-0001"), "reply: {}", outcome.reply);

        let mother = engine
            .store()
            .mothers()
            .get(MOTHER)
            .expect("lookup")
            .expect("registered via dialogue");
        assert_eq!(mother.camp, "B");
        assert_eq!(mother.zone, "7");
        assert!(
            engine
                .store()
                .dialogues()
                .get_active(MOTHER)
                .expect("lookup")
                .is_none(),
            "dialogue should be completed"
        );
    }

    #[tokio::test]
    async fn emergency_cuts_through_an_open_dialogue() {
        let collaborator = Arc::new(ScriptedCollaborator::new(vec![CollaboratorReply {
            reply: "Tell me more?".to_string(),
            extracted_data: None,
            is_complete: false,
            action: None,
        }]));
        let (engine, _) = engine(collaborator);
        engine
            .handle_message(MOTHER, "REG MOTHER CAMP A ZONE 3 RISK LOW")
            .await;
        engine.handle_message(MOTHER, "something is strange").await;
        assert!(engine.store().dialogues().get_active(MOTHER).expect("lookup").is_some());

        let outcome = engine.handle_message(MOTHER, "EMERGENCY").await;
        assert_eq!(outcome.command, CommandKind::Emergency);
        assert!(outcome.success);
    }
}
