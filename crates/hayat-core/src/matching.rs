//! Volunteer selection for a newly created request. Pure: the facade
//! feeds in the AVAILABLE set and sends the alerts; this module only
//! decides who and in what order.

use crate::types::{HelpRequest, Volunteer};

/// Eligible volunteers in notification order: skill priority ascending
/// (midwife first), ties broken by registration recency (newest first)
/// and finally phone, so the order is a deterministic total order.
pub fn rank_eligible(volunteers: Vec<Volunteer>, request: &HelpRequest) -> Vec<Volunteer> {
    let mut eligible: Vec<Volunteer> = volunteers
        .into_iter()
        .filter(|v| is_eligible(v, request))
        .collect();
    eligible.sort_by(|a, b| {
        a.eligibility
            .priority()
            .cmp(&b.eligibility.priority())
            .then(b.registered_at.cmp(&a.registered_at))
            .then(a.phone.cmp(&b.phone))
    });
    eligible
}

fn is_eligible(volunteer: &Volunteer, request: &HelpRequest) -> bool {
    volunteer.eligibility.any_capability()
        && volunteer.eligibility.covers_zone(&request.zone)
        && volunteer.eligibility.covers_category(request.category)
}
