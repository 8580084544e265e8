//! The report engine: binds a record source to the report configuration.
//!
//! RULES:
//!   - Every report performs exactly one `fetch()` on the source.
//!   - No report reads the wall clock. "Today" is always a parameter.
//!   - Nothing here writes to the source.

use crate::{
    coach::{self, ResolvedRosterEntry},
    config::ReportConfig,
    cost::{self, CostBreakdown},
    error::ReportResult,
    monthly::{self, MonthlySnapshot},
    resolver::AsOfRule,
    source::RecordSource,
};
use chrono::NaiveDate;

pub struct ReportEngine<S: RecordSource> {
    pub config: ReportConfig,
    source: S,
}

impl<S: RecordSource> ReportEngine<S> {
    pub fn new(source: S, config: ReportConfig) -> Self {
        Self { config, source }
    }

    /// Active clients right now: `end_date > today`, start date unchecked.
    pub fn current_roster(&self, today: NaiveDate) -> ReportResult<Vec<ResolvedRosterEntry>> {
        self.roster(today, AsOfRule::Current)
    }

    /// Active clients on a past date: `start_date <= as_of < end_date`.
    pub fn roster_as_of(&self, as_of: NaiveDate) -> ReportResult<Vec<ResolvedRosterEntry>> {
        self.roster(as_of, AsOfRule::Historical)
    }

    fn roster(&self, as_of: NaiveDate, rule: AsOfRule) -> ReportResult<Vec<ResolvedRosterEntry>> {
        let records = self.source.fetch()?;
        let staff = records.staff_index();
        let roster = coach::build_roster(&records.memberships, &staff, as_of, rule);
        log::info!(
            "roster as of {as_of} ({rule:?}): {} active of {} memberships",
            roster.len(),
            records.memberships.len()
        );
        Ok(roster)
    }

    /// Month-end history from the earliest membership start through `now`.
    /// An empty store (or one without start dates) yields an empty series.
    pub fn monthly_series(&self, now: NaiveDate) -> ReportResult<Vec<MonthlySnapshot>> {
        let records = self.source.fetch()?;
        let Some(earliest) = records.earliest_start() else {
            log::info!("monthly series: no dated memberships, nothing to report");
            return Ok(Vec::new());
        };
        if earliest > now {
            log::warn!("monthly series: earliest start {earliest} is after {now}");
            return Ok(Vec::new());
        }

        let staff = records.staff_index();
        let series = monthly::generate_series_parallel(
            &records.memberships,
            &staff,
            earliest,
            now,
            &self.config.known_gyms,
            self.config.worker_threads,
        )?;
        log::info!(
            "monthly series: {} months from {earliest} to {now}",
            series.len()
        );
        Ok(series)
    }

    /// One breakdown per membership record, children included.
    pub fn cost_breakdowns(&self) -> ReportResult<Vec<CostBreakdown>> {
        let records = self.source.fetch()?;
        let rows = cost::compute_all(&records, &self.config);

        for row in rows.iter().filter(|r| r.row_cost().is_none()) {
            log::debug!(
                "membership {}: cost inputs incomplete, excluded from group {} total",
                row.membership_id,
                row.sale_group_id
            );
        }
        log::info!("cost breakdowns: {} memberships", rows.len());
        Ok(rows)
    }
}
