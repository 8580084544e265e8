//! Cost & margin calculator tests.

use membership_core::{
    config::ReportConfig,
    cost::{self, CostBreakdown, MembershipClass},
    membership::{CostRates, Membership, MembershipType, RecordSet, SaleMetadata},
    report::ReportEngine,
};

const EPS: f64 = 1e-6;

fn approx(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("expected a value, got None");
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn types() -> Vec<MembershipType> {
    vec![
        MembershipType { id: "t-std".into(), name: "Foundations Small Group".into() },
        MembershipType { id: "t-pack".into(), name: "10 Session Pack".into() },
        MembershipType { id: "t-vo2".into(), name: "VO2 Max Block".into() },
        MembershipType { id: "t-online".into(), name: "Online Coaching".into() },
    ]
}

fn metadata(id: &str, value: f64, sessions: Option<f64>, frequency: Option<f64>) -> SaleMetadata {
    SaleMetadata {
        id: id.into(),
        value: Some(value),
        total_sessions: sessions,
        session_frequency_per_week: frequency,
    }
}

fn membership(id: &str, type_id: &str, duration: &str, sale: &str) -> Membership {
    let mut m = Membership::new(id, "Ava Chen");
    m.membership_type_id = Some(type_id.into());
    m.test_duration = Some(duration.into());
    m.new_sale_metadata_id = Some(sale.into());
    m
}

fn row<'a>(rows: &'a [CostBreakdown], id: &str) -> &'a CostBreakdown {
    rows.iter().find(|r| r.membership_id == id).expect("row present")
}

#[test]
fn standard_membership_costs_sessions_times_weeks() {
    let records = RecordSet {
        memberships: vec![membership("m-1", "t-std", "6 months", "n-1")],
        membership_types: types(),
        new_sale_metadata: vec![metadata("n-1", 2200.0, None, Some(2.0))],
        cost_rates: CostRates { perform: Some(10.0), vo2: Some(30.0), rm: Some(5.0) },
        ..RecordSet::default()
    };

    let rows = cost::compute_all(&records, &ReportConfig::default_test());
    let r = row(&rows, "m-1");
    assert_eq!(r.class, MembershipClass::Standard);
    assert_eq!(r.membership_weeks, 26);
    approx(r.adjusted_sessions, 52.0);
    approx(r.perform_cost, 520.0);
    approx(r.vo2_cost, 0.0);
    approx(r.rm_cost, 130.0);
    approx(r.membership_value_ex_gst, 2000.0);
    approx(r.total_overall_cost, 650.0);
    approx(r.margin, 1350.0);
    approx(r.margin_percent, 1.0 - 650.0 / 2000.0);
}

#[test]
fn sale_group_total_is_shared_by_primary_and_child() {
    let mut child = membership("m-2", "t-pack", "12 months", "n-2");
    child.primary_membership_id = Some("m-1".into());

    let records = RecordSet {
        memberships: vec![
            // No sessions per week: PERFORM is zero, only RM remains.
            membership("m-1", "t-std", "12 months", "n-1"),
            child,
        ],
        membership_types: types(),
        new_sale_metadata: vec![
            metadata("n-1", 3300.0, None, Some(0.0)),
            metadata("n-2", 550.0, Some(10.0), None),
        ],
        cost_rates: CostRates { perform: Some(10.0), vo2: Some(30.0), rm: Some(16.585) },
        ..RecordSet::default()
    };

    let rows = cost::compute_all(&records, &ReportConfig::default_test());
    let primary = row(&rows, "m-1");
    let addon = row(&rows, "m-2");

    approx(primary.rm_cost, 862.42);
    approx(addon.perform_cost, 100.0);
    approx(addon.rm_cost, 0.0);
    assert!(addon.is_child);
    assert_eq!(addon.sale_group_id, "m-1");

    approx(primary.total_overall_cost, 962.42);
    approx(addon.total_overall_cost, 962.42);
}

#[test]
fn online_coaching_never_has_a_margin() {
    let records = RecordSet {
        memberships: vec![membership("m-1", "t-online", "3 months", "n-1")],
        membership_types: types(),
        new_sale_metadata: vec![metadata("n-1", 1100.0, Some(12.0), Some(3.0))],
        cost_rates: CostRates { perform: Some(10.0), vo2: Some(30.0), rm: Some(5.0) },
        ..RecordSet::default()
    };

    let rows = cost::compute_all(&records, &ReportConfig::default_test());
    let r = row(&rows, "m-1");
    assert_eq!(r.class, MembershipClass::OnlineCoaching);
    assert_eq!(r.adjusted_sessions, None);
    approx(r.perform_cost, 0.0);
    approx(r.rm_cost, 0.0);
    approx(r.membership_value_ex_gst, 1000.0);
    assert_eq!(r.margin, None);
    assert_eq!(r.margin_percent, None);
}

#[test]
fn vo2_membership_uses_vo2_rate() {
    let records = RecordSet {
        memberships: vec![membership("m-1", "t-vo2", "3 months", "n-1")],
        membership_types: types(),
        new_sale_metadata: vec![metadata("n-1", 1100.0, None, Some(1.0))],
        cost_rates: CostRates { perform: Some(10.0), vo2: Some(30.0), rm: Some(5.0) },
        ..RecordSet::default()
    };

    let rows = cost::compute_all(&records, &ReportConfig::default_test());
    let r = row(&rows, "m-1");
    assert_eq!(r.class, MembershipClass::Vo2);
    approx(r.adjusted_sessions, 12.0);
    approx(r.perform_cost, 0.0);
    approx(r.vo2_cost, 360.0);
    approx(r.rm_cost, 60.0);
}

#[test]
fn renewal_value_is_used_when_no_new_sale() {
    let mut m = membership("m-1", "t-pack", "6 months", "n-missing");
    m.renewal_metadata_id = Some("r-1".into());

    let records = RecordSet {
        memberships: vec![m],
        membership_types: types(),
        renewal_metadata: vec![metadata("r-1", 770.0, Some(20.0), None)],
        cost_rates: CostRates { perform: Some(10.0), vo2: None, rm: None },
        ..RecordSet::default()
    };

    let rows = cost::compute_all(&records, &ReportConfig::default_test());
    let r = row(&rows, "m-1");
    approx(r.membership_value, 770.0);
    approx(r.perform_cost, 200.0);
    approx(r.total_overall_cost, 200.0);
    approx(r.margin, 500.0);
}

#[test]
fn every_membership_gets_a_row_in_id_order() {
    let mut child = membership("m-a", "t-vo2", "3 months", "n-2");
    child.primary_membership_id = Some("m-b".into());
    let records = RecordSet {
        memberships: vec![
            membership("m-c", "t-std", "3 months", "n-1"),
            child,
            membership("m-b", "t-std", "3 months", "n-1"),
        ],
        membership_types: types(),
        ..RecordSet::default()
    };

    let rows = cost::compute_all(&records, &ReportConfig::default_test());
    let ids: Vec<_> = rows.iter().map(|r| r.membership_id.as_str()).collect();
    assert_eq!(ids, vec!["m-a", "m-b", "m-c"]);
    // No metadata and no rates: costs are absent, not zero.
    assert_eq!(rows[1].total_overall_cost, None);
    assert_eq!(rows[1].margin, None);
}

#[test]
fn breakdowns_are_idempotent() {
    let records = RecordSet {
        memberships: vec![membership("m-1", "t-std", "12 months", "n-1")],
        membership_types: types(),
        new_sale_metadata: vec![metadata("n-1", 5000.0, None, Some(3.0))],
        cost_rates: CostRates { perform: Some(18.5), vo2: Some(35.0), rm: Some(16.585) },
        ..RecordSet::default()
    };
    let engine = ReportEngine::new(records, ReportConfig::default_test());

    assert_eq!(engine.cost_breakdowns().unwrap(), engine.cost_breakdowns().unwrap());
}
