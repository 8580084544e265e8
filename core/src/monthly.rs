//! Monthly snapshot generator.
//!
//! One historical roster per month end, reduced to counts. Months are
//! independent of each other, so the parallel generator fans them out to
//! a worker pool and re-sorts by date. Output is identical either way.

use crate::{
    calendar,
    coach::{self, ResolvedRosterEntry},
    error::{ReportError, ReportResult},
    membership::{Membership, Staff},
    resolver::AsOfRule,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    pub month_end_date: NaiveDate,
    pub active_client_count: usize,
    /// Distinct non-NULL gym labels on the roster.
    pub gym_count: usize,
    /// Distinct non-NULL primary coach names on the roster.
    pub unique_coaches: usize,
    /// One entry per configured gym, zero when nobody trains there.
    pub gym_counts: BTreeMap<String, usize>,
}

/// Reduce a resolved roster to its count summary.
pub fn summarize(
    month_end_date: NaiveDate,
    roster: &[ResolvedRosterEntry],
    known_gyms: &[String],
) -> MonthlySnapshot {
    let gyms: BTreeSet<&str> = roster
        .iter()
        .filter_map(|e| e.membership.gym.as_deref())
        .collect();
    let coaches: BTreeSet<&str> = roster
        .iter()
        .filter_map(|e| e.coach_name.as_deref())
        .collect();

    let gym_counts = known_gyms
        .iter()
        .map(|label| {
            let count = roster
                .iter()
                .filter(|e| e.membership.gym.as_deref() == Some(label.as_str()))
                .count();
            (label.clone(), count)
        })
        .collect();

    MonthlySnapshot {
        month_end_date,
        active_client_count: roster.len(),
        gym_count: gyms.len(),
        unique_coaches: coaches.len(),
        gym_counts,
    }
}

fn snapshot_for(
    month_end_date: NaiveDate,
    records: &[Membership],
    staff: &HashMap<&str, &Staff>,
    known_gyms: &[String],
) -> MonthlySnapshot {
    let roster = coach::build_roster(records, staff, month_end_date, AsOfRule::Historical);
    summarize(month_end_date, &roster, known_gyms)
}

fn check_range(earliest: NaiveDate, latest: NaiveDate) -> ReportResult<()> {
    if earliest > latest {
        return Err(ReportError::InvalidDateRange { earliest, latest });
    }
    Ok(())
}

/// Sequential series from `earliest`'s month through `latest`'s month.
pub fn generate_series(
    records: &[Membership],
    staff: &HashMap<&str, &Staff>,
    earliest: NaiveDate,
    latest: NaiveDate,
    known_gyms: &[String],
) -> ReportResult<Vec<MonthlySnapshot>> {
    check_range(earliest, latest)?;

    Ok(calendar::month_ends_between(earliest, latest)
        .into_iter()
        .map(|d| snapshot_for(d, records, staff, known_gyms))
        .collect())
}

/// Same series, computed by `workers` scoped threads pulling month ends
/// from a shared channel.
pub fn generate_series_parallel(
    records: &[Membership],
    staff: &HashMap<&str, &Staff>,
    earliest: NaiveDate,
    latest: NaiveDate,
    known_gyms: &[String],
    workers: usize,
) -> ReportResult<Vec<MonthlySnapshot>> {
    if workers <= 1 {
        return generate_series(records, staff, earliest, latest, known_gyms);
    }
    check_range(earliest, latest)?;

    let dates = calendar::month_ends_between(earliest, latest);
    let (job_tx, job_rx) = crossbeam::channel::unbounded::<NaiveDate>();
    let (out_tx, out_rx) = crossbeam::channel::unbounded::<MonthlySnapshot>();
    for d in &dates {
        // Receiver is alive until the scope below ends.
        let _ = job_tx.send(*d);
    }
    drop(job_tx);

    crossbeam::thread::scope(|scope| {
        for _ in 0..workers.min(dates.len().max(1)) {
            let job_rx = job_rx.clone();
            let out_tx = out_tx.clone();
            scope.spawn(move |_| {
                for d in job_rx.iter() {
                    if out_tx.send(snapshot_for(d, records, staff, known_gyms)).is_err() {
                        break;
                    }
                }
            });
        }
    })
    .map_err(|_| anyhow::anyhow!("monthly snapshot worker panicked"))?;
    drop(out_tx);

    let mut series: Vec<MonthlySnapshot> = out_rx.iter().collect();
    series.sort_by_key(|s| s.month_end_date);
    log::debug!(
        "monthly series: {} months computed on {} workers",
        series.len(),
        workers
    );
    Ok(series)
}
