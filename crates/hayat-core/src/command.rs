//! Command grammar over canonical (normalized, keyword-English) text.
//! An ordered rule list is evaluated first-match-wins; anything that
//! matches nothing becomes `Unknown` and falls through to the dialogue
//! engine.

use crate::casecode;
use crate::types::enums::{CommandKind, RiskLevel, SkillType};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    pub fields: BTreeMap<String, String>,
}

impl ParsedCommand {
    fn bare(kind: CommandKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Field keywords that terminate a free-text field value. Extraction
/// stops at the next keyword (or end of string) so a value never
/// swallows the following field.
const FIELD_BOUNDARY: &str = "CAMP|ZONE|DUE|RISK|NAME|SKILL";

fn field_re(keyword: &str) -> Regex {
    // Value runs lazily up to the next field keyword or end-of-string.
    Regex::new(&format!(
        r"\b{keyword}\s+(.+?)(?:\s+(?:{FIELD_BOUNDARY})\b|$)"
    ))
    .unwrap_or_else(|err| panic!("invalid field pattern for {keyword}: {err}"))
}

struct Grammar {
    reg_mother: Regex,
    reg_volunteer: Regex,
    emergency: Regex,
    support: Regex,
    accept: Regex,
    complete: Regex,
    cancel: Regex,
    available: Regex,
    busy: Regex,
    offline: Regex,
    status: Regex,
    help: Regex,
    bare_number: Regex,
    camp: Regex,
    zone: Regex,
    due: Regex,
    risk: Regex,
    name: Regex,
    skill: Regex,
}

fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar {
        reg_mother: Regex::new(r"^REG\s+MOTHER\b").expect("reg mother pattern"),
        reg_volunteer: Regex::new(r"^REG\s+VOLUNTEER\b").expect("reg volunteer pattern"),
        emergency: Regex::new(r"^(EMERGENCY|SOS|URGENT)\b").expect("emergency pattern"),
        support: Regex::new(r"^SUPPORT\b").expect("support pattern"),
        accept: Regex::new(r"^ACCEPT\s+(?:HR-)?(\d+)\s*$").expect("accept pattern"),
        complete: Regex::new(r"^COMPLETE\s+(?:HR-)?(\d+)\s*$").expect("complete pattern"),
        cancel: Regex::new(r"^CANCEL\s+(?:HR-)?(\d+)\s*$").expect("cancel pattern"),
        available: Regex::new(r"^AVAILABLE\s*$").expect("available pattern"),
        busy: Regex::new(r"^BUSY\s*$").expect("busy pattern"),
        offline: Regex::new(r"^OFFLINE\s*$").expect("offline pattern"),
        status: Regex::new(r"^STATUS\s*$").expect("status pattern"),
        help: Regex::new(r"^HELP\s*$").expect("help pattern"),
        bare_number: Regex::new(r"^(\d{1,3})\s*$").expect("bare number pattern"),
        camp: field_re("CAMP"),
        zone: field_re("ZONE"),
        due: field_re("DUE"),
        risk: field_re("RISK"),
        name: field_re("NAME"),
        skill: field_re("SKILL"),
    })
}

pub fn match_command(canonical: &str) -> ParsedCommand {
    let text = canonical.trim().to_ascii_uppercase();
    let g = grammar();

    if g.reg_mother.is_match(&text) {
        return ParsedCommand {
            kind: CommandKind::RegisterMother,
            fields: extract_fields(&text, &[("camp", &g.camp), ("zone", &g.zone), ("due", &g.due), ("risk", &g.risk), ("name", &g.name)]),
        };
    }
    if g.reg_volunteer.is_match(&text) {
        return ParsedCommand {
            kind: CommandKind::RegisterVolunteer,
            fields: extract_fields(&text, &[("name", &g.name), ("camp", &g.camp), ("zones", &g.zone), ("skill", &g.skill)]),
        };
    }
    if g.emergency.is_match(&text) {
        return ParsedCommand::bare(CommandKind::Emergency);
    }
    if g.support.is_match(&text) {
        return ParsedCommand::bare(CommandKind::Support);
    }
    if let Some(caps) = g.accept.captures(&text) {
        return case_command(CommandKind::Accept, &caps[1]);
    }
    if let Some(caps) = g.complete.captures(&text) {
        return case_command(CommandKind::Complete, &caps[1]);
    }
    if let Some(caps) = g.cancel.captures(&text) {
        return case_command(CommandKind::Cancel, &caps[1]);
    }
    if g.available.is_match(&text) {
        return ParsedCommand::bare(CommandKind::Available);
    }
    if g.busy.is_match(&text) {
        return ParsedCommand::bare(CommandKind::Busy);
    }
    if g.offline.is_match(&text) {
        return ParsedCommand::bare(CommandKind::Offline);
    }
    if g.status.is_match(&text) {
        return ParsedCommand::bare(CommandKind::Status);
    }
    if g.help.is_match(&text) {
        return ParsedCommand::bare(CommandKind::Help);
    }
    if let Some(caps) = g.bare_number.captures(&text) {
        let mut fields = BTreeMap::new();
        fields.insert("eta".to_string(), caps[1].to_string());
        return ParsedCommand {
            kind: CommandKind::EtaReply,
            fields,
        };
    }
    ParsedCommand::bare(CommandKind::Unknown)
}

fn case_command(kind: CommandKind, digits: &str) -> ParsedCommand {
    let mut fields = BTreeMap::new();
    if let Some(code) = casecode::normalize_code(digits) {
        fields.insert("case".to_string(), code);
    }
    ParsedCommand { kind, fields }
}

fn extract_fields(text: &str, specs: &[(&str, &Regex)]) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for (name, re) in specs {
        if let Some(caps) = re.captures(text) {
            let value = caps[1].trim().to_string();
            if !value.is_empty() {
                fields.insert((*name).to_string(), value);
            }
        }
    }
    fields
}

/// Day-month with optional 2- or 4-digit year. A missing year defaults
/// to the current year; a 2-digit year is expanded by prefixing `20`.
pub fn parse_due_date(value: &str, current_year: i32) -> Option<NaiveDate> {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let re = DATE_RE
        .get_or_init(|| Regex::new(r"^(\d{1,2})-(\d{1,2})(?:-(\d{2}|\d{4}))?$").expect("date pattern"));
    let caps = re.captures(value.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = match caps.get(3) {
        None => current_year,
        Some(m) if m.as_str().len() == 2 => format!("20{}", m.as_str()).parse().ok()?,
        Some(m) => m.as_str().parse().ok()?,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Free-text risk onto the fixed enum; `None` means the caller should
/// fall back to `Low` and log the fallback.
pub fn parse_risk(value: &str) -> Option<RiskLevel> {
    match value.trim().to_ascii_uppercase().as_str() {
        "HIGH" => Some(RiskLevel::High),
        "MEDIUM" | "MED" => Some(RiskLevel::Medium),
        "LOW" => Some(RiskLevel::Low),
        _ => None,
    }
}

/// Free-text skill onto the ranked enum; `None` means fall back to the
/// lowest-priority skill and log the fallback.
pub fn parse_skill(value: &str) -> Option<SkillType> {
    match value.trim().to_ascii_uppercase().as_str() {
        "MIDWIFE" => Some(SkillType::Midwife),
        "NURSE" => Some(SkillType::Nurse),
        "TRAINED" | "TRAINED ATTENDANT" => Some(SkillType::TrainedAttendant),
        "CHW" => Some(SkillType::CommunityHealthWorker),
        "COMMUNITY" | "COMMUNITY VOLUNTEER" => Some(SkillType::CommunityVolunteer),
        _ => None,
    }
}
