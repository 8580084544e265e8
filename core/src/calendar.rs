//! Month-end date arithmetic.

use crate::error::{ReportError, ReportResult};
use chrono::{Datelike, Duration, NaiveDate};

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> ReportResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ReportError::InvalidDate(format!("'{s}': {e}")))
}

/// First day of the month after `date`'s month.
fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    first_of_next_month(date)
        .map(|next| next - Duration::days(1))
        .unwrap_or(NaiveDate::MAX)
}

/// Every month end from `earliest`'s month through `latest`'s month,
/// inclusive and ascending. Empty when `earliest > latest`.
pub fn month_ends_between(earliest: NaiveDate, latest: NaiveDate) -> Vec<NaiveDate> {
    let last = month_end(latest);
    let mut current = month_end(earliest);
    let mut ends = Vec::new();

    while current <= last {
        ends.push(current);
        match current.succ_opt() {
            Some(next) => current = month_end(next),
            None => break,
        }
    }
    ends
}
