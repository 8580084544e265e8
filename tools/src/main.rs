//! report-runner: headless report generator for the membership store.
//!
//! Usage:
//!   report-runner --db gym.db --report roster --as-of 2024-06-30
//!   report-runner --seed-demo 200 --seed 42 --report monthly
//!   report-runner --db gym.db --report costs --json

use anyhow::Result;
use chrono::NaiveDate;
use membership_core::{
    calendar::parse_date,
    coach::ResolvedRosterEntry,
    config::ReportConfig,
    cost::CostBreakdown,
    demo,
    monthly::MonthlySnapshot,
    report::ReportEngine,
    store::ReportStore,
};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportKind {
    Roster,
    Monthly,
    Costs,
}

impl ReportKind {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "roster" => Ok(Self::Roster),
            "monthly" => Ok(Self::Monthly),
            "costs" => Ok(Self::Costs),
            other => anyhow::bail!("unknown report '{other}' (expected roster|monthly|costs)"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let report = ReportKind::parse(flag_value(&args, "--report").unwrap_or("roster"))?;
    let seed = parse_arg(&args, "--seed", 42u64);
    let demo_members = parse_arg(&args, "--seed-demo", 0usize);
    let json = args.iter().any(|a| a == "--json");

    // The only place the wall clock is read.
    let as_of: NaiveDate = match flag_value(&args, "--as-of") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };

    let config = ReportConfig::load_or_default(data_dir)?;

    let store = ReportStore::open(db)?;
    store.migrate()?;
    if demo_members > 0 {
        let summary = demo::seed_demo(&store, seed, demo_members, as_of, &config.known_gyms)?;
        if summary.members > 0 && !json {
            println!(
                "seeded {} members / {} memberships (seed {seed})",
                summary.members, summary.memberships
            );
            println!();
        }
    }

    let engine = ReportEngine::new(store, config);
    match report {
        ReportKind::Roster => {
            let roster = engine.current_roster(as_of)?;
            if json {
                print_json_lines(&roster)?;
            } else {
                print_roster(&roster, as_of);
            }
        }
        ReportKind::Monthly => {
            let series = engine.monthly_series(as_of)?;
            if json {
                print_json_lines(&series)?;
            } else {
                print_monthly(&series, &engine.config.known_gyms);
            }
        }
        ReportKind::Costs => {
            let rows = engine.cost_breakdowns()?;
            if json {
                print_json_lines(&rows)?;
            } else {
                print_costs(&rows);
            }
        }
    }
    Ok(())
}

fn print_json_lines<T: serde::Serialize>(rows: &[T]) -> Result<()> {
    for row in rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}

fn print_roster(roster: &[ResolvedRosterEntry], as_of: NaiveDate) {
    println!("=== ACTIVE CLIENTS as of {as_of} ({}) ===", roster.len());
    for e in roster {
        let m = &e.membership;
        println!(
            "  {:<24} {:<12} {:<12} ends {}  coach: {}",
            m.member_name,
            m.gym.as_deref().unwrap_or("-"),
            m.status.as_deref().unwrap_or("-"),
            m.end_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            e.coach_name.as_deref().unwrap_or("-"),
        );
    }
}

fn print_monthly(series: &[MonthlySnapshot], gyms: &[String]) {
    println!("=== MONTHLY ACTIVE CLIENTS ===");
    if series.is_empty() {
        println!("  (no memberships)");
        return;
    }
    for s in series {
        let per_gym: Vec<String> = gyms
            .iter()
            .map(|g| format!("{g}: {}", s.gym_counts.get(g).copied().unwrap_or(0)))
            .collect();
        println!(
            "  {} | clients: {:>4} | gyms: {} | coaches: {:>2} | {}",
            s.month_end_date,
            s.active_client_count,
            s.gym_count,
            s.unique_coaches,
            per_gym.join(", ")
        );
    }
}

fn print_costs(rows: &[CostBreakdown]) {
    fn money(v: Option<f64>) -> String {
        v.map(|v| format!("${v:.2}")).unwrap_or_else(|| "-".into())
    }

    println!("=== MEMBERSHIP COSTS ({}) ===", rows.len());
    for r in rows {
        println!(
            "  {:<24} {:<15} {} | value ex GST: {} | group cost: {} | margin: {} ({})",
            r.member_name,
            format!("{:?}", r.class),
            if r.is_child { "child  " } else { "primary" },
            money(r.membership_value_ex_gst),
            money(r.total_overall_cost),
            money(r.margin),
            r.margin_percent
                .map(|p| format!("{:.1}%", p * 100.0))
                .unwrap_or_else(|| "-".into()),
        );
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
