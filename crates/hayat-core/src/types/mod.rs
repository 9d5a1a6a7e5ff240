pub mod dialogue;
pub mod enums;
pub mod io;
pub mod mother;
pub mod request;
pub mod volunteer;

pub use dialogue::{Dialogue, TranscriptEntry};
pub use enums::{
    Availability, CommandKind, DialoguePhase, DialogueStatus, Language, RequestCategory,
    RequestStatus, RiskLevel, SkillType, TranscriptRole,
};
pub use io::{DispatchOutcome, RegisterMotherInput, RegisterVolunteerInput};
pub use mother::Mother;
pub use request::{HelpRequest, VolunteerResponse};
pub use volunteer::{Eligibility, Volunteer};
