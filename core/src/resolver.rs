//! Active-membership resolution.
//!
//! Given an as-of date, keep the memberships that count as active and
//! reduce them to exactly one per member name (the latest start date).
//!
//! NULL handling mirrors the SQL this replaces:
//!   - NULL end_date never satisfies `end_date > D`.
//!   - NULL start_date never satisfies `start_date <= D`.
//!   - NULL journey_stage / status pass the exclusion filters.
//!
//! Open questions, decided here:
//!   - Ties on the latest start date go to the lowest membership id.
//!   - When picking the latest start (only reachable under the current
//!     rule), a NULL start_date ranks below every real date. PostgreSQL's
//!     `ORDER BY start_date DESC` would rank it first.

use crate::membership::{JourneyStage, Membership, STATUS_FRIENDS_AND_FAMILY};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Which date bounds apply when deciding whether a membership is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsOfRule {
    /// Current roster: only `end_date > as_of` is checked. Memberships
    /// starting in the future are still on the roster.
    Current,
    /// Historical snapshot: `start_date <= as_of < end_date`.
    Historical,
}

pub fn is_active(m: &Membership, as_of: NaiveDate, rule: AsOfRule) -> bool {
    let ends_after = matches!(m.end_date, Some(end) if end > as_of);
    let started = match rule {
        AsOfRule::Current => true,
        AsOfRule::Historical => matches!(m.start_date, Some(start) if start <= as_of),
    };
    let sold = m.journey_stage.as_ref() != Some(&JourneyStage::NoSale);
    let paying = m.status.as_deref() != Some(STATUS_FRIENDS_AND_FAMILY);

    ends_after && started && sold && paying
}

/// Latest start date wins; ties go to the lowest id so output is stable.
fn preferred(candidate: &Membership, current: &Membership) -> bool {
    match candidate.start_date.cmp(&current.start_date) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => candidate.id < current.id,
    }
}

/// Resolve the roster for `as_of`: one membership per distinct member name,
/// sorted by member name ascending.
pub fn resolve(records: &[Membership], as_of: NaiveDate, rule: AsOfRule) -> Vec<&Membership> {
    let mut latest: HashMap<&str, &Membership> = HashMap::new();

    for m in records.iter().filter(|m| is_active(m, as_of, rule)) {
        latest
            .entry(m.member_name.as_str())
            .and_modify(|current| {
                if preferred(m, *current) {
                    *current = m;
                }
            })
            .or_insert(m);
    }

    let mut roster: Vec<&Membership> = latest.into_values().collect();
    roster.sort_by(|a, b| a.member_name.cmp(&b.member_name));
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn membership(id: &str, name: &str, start: NaiveDate, end: NaiveDate) -> Membership {
        let mut m = Membership::new(id, name);
        m.start_date = Some(start);
        m.end_date = Some(end);
        m
    }

    #[test]
    fn empty_input_resolves_to_empty_roster() {
        assert!(resolve(&[], date(2024, 1, 1), AsOfRule::Historical).is_empty());
    }

    #[test]
    fn end_date_is_exclusive() {
        let m = membership("a", "Ava", date(2024, 1, 1), date(2024, 3, 1));
        assert!(is_active(&m, date(2024, 2, 29), AsOfRule::Historical));
        assert!(!is_active(&m, date(2024, 3, 1), AsOfRule::Historical));
    }

    #[test]
    fn start_date_is_inclusive_for_historical() {
        let m = membership("a", "Ava", date(2024, 1, 1), date(2024, 3, 1));
        assert!(is_active(&m, date(2024, 1, 1), AsOfRule::Historical));
        assert!(!is_active(&m, date(2023, 12, 31), AsOfRule::Historical));
    }

    #[test]
    fn current_rule_ignores_start_date() {
        let future = membership("a", "Ava", date(2025, 1, 1), date(2025, 6, 1));
        assert!(is_active(&future, date(2024, 6, 1), AsOfRule::Current));
        assert!(!is_active(&future, date(2024, 6, 1), AsOfRule::Historical));

        let mut undated = future.clone();
        undated.start_date = None;
        assert!(is_active(&undated, date(2024, 6, 1), AsOfRule::Current));
        assert!(!is_active(&undated, date(2024, 6, 1), AsOfRule::Historical));
    }

    #[test]
    fn null_end_date_is_never_active() {
        let mut m = membership("a", "Ava", date(2024, 1, 1), date(2024, 3, 1));
        m.end_date = None;
        assert!(!is_active(&m, date(2024, 2, 1), AsOfRule::Current));
        assert!(!is_active(&m, date(2024, 2, 1), AsOfRule::Historical));
    }

    #[test]
    fn ties_on_start_date_pick_lowest_id() {
        let records = vec![
            membership("m-9", "Ava", date(2024, 1, 1), date(2025, 1, 1)),
            membership("m-2", "Ava", date(2024, 1, 1), date(2025, 1, 1)),
            membership("m-5", "Ava", date(2024, 1, 1), date(2025, 1, 1)),
        ];
        let roster = resolve(&records, date(2024, 6, 1), AsOfRule::Historical);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, "m-2");
    }

    #[test]
    fn dated_start_beats_null_start_under_current_rule() {
        let mut undated = membership("a", "Ava", date(2024, 1, 1), date(2025, 1, 1));
        undated.start_date = None;
        let dated = membership("b", "Ava", date(2023, 1, 1), date(2025, 1, 1));

        let records = vec![undated, dated];
        let roster = resolve(&records, date(2024, 6, 1), AsOfRule::Current);
        assert_eq!(roster[0].id, "b");
    }

    #[test]
    fn roster_is_sorted_by_member_name() {
        let records = vec![
            membership("1", "Zoe", date(2024, 1, 1), date(2025, 1, 1)),
            membership("2", "Ava", date(2024, 1, 1), date(2025, 1, 1)),
            membership("3", "Mia", date(2024, 1, 1), date(2025, 1, 1)),
        ];
        let names: Vec<_> = resolve(&records, date(2024, 6, 1), AsOfRule::Current)
            .iter()
            .map(|m| m.member_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ava", "Mia", "Zoe"]);
    }
}
