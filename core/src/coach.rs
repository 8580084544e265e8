//! Coach enrichment for resolved roster entries.

use crate::{
    membership::{Membership, Staff},
    resolver::{self, AsOfRule},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRosterEntry {
    pub membership: Membership,
    pub coach_name: Option<String>,
    pub programming_coach_name: Option<String>,
    pub handoff_coach_name: Option<String>,
}

fn coach_name(id: Option<&str>, staff: &HashMap<&str, &Staff>) -> Option<String> {
    id.and_then(|id| staff.get(id)).map(|s| s.coach_name.clone())
}

/// Attach the three optional coach names. Unknown ids resolve to `None`.
pub fn enrich(membership: &Membership, staff: &HashMap<&str, &Staff>) -> ResolvedRosterEntry {
    ResolvedRosterEntry {
        coach_name: coach_name(membership.coach_id.as_deref(), staff),
        programming_coach_name: coach_name(membership.programming_coach_id.as_deref(), staff),
        handoff_coach_name: coach_name(membership.handoff_coach_id.as_deref(), staff),
        membership: membership.clone(),
    }
}

/// Resolve and enrich in one step.
pub fn build_roster(
    records: &[Membership],
    staff: &HashMap<&str, &Staff>,
    as_of: NaiveDate,
    rule: AsOfRule,
) -> Vec<ResolvedRosterEntry> {
    resolver::resolve(records, as_of, rule)
        .into_iter()
        .map(|m| enrich(m, staff))
        .collect()
}
