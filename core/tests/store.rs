//! SQLite record store tests.

use chrono::NaiveDate;
use membership_core::{
    config::ReportConfig,
    error::ReportError,
    membership::{CostPattern, JourneyStage, Membership, MembershipType, SaleMetadata, Staff},
    report::ReportEngine,
    source::RecordSource,
    store::ReportStore,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store() -> ReportStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = ReportStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn membership_round_trips_with_nulls() {
    let store = store();

    let mut full = Membership::new("m-1", "Ava Chen");
    full.member_id = Some("c-1".into());
    full.start_date = Some(date(2024, 1, 1));
    full.end_date = Some(date(2024, 7, 1));
    full.gym = Some("Albion".into());
    full.status = Some("active".into());
    full.journey_stage = Some(JourneyStage::RenewedMember);
    full.coach_id = Some("s-1".into());
    full.test_duration = Some("6 months".into());
    full.new_sale_metadata_id = Some("n-1".into());

    let mut sparse = Membership::new("m-2", "Liam Ryan");
    sparse.primary_membership_id = Some("m-1".into());
    sparse.journey_stage = Some(JourneyStage::Other("trial".into()));

    store.insert_membership(&full).unwrap();
    store.insert_membership(&sparse).unwrap();

    let loaded = store.load_memberships().unwrap();
    assert_eq!(loaded, vec![full, sparse]);
    assert_eq!(store.membership_count().unwrap(), 2);
}

#[test]
fn cost_rates_upsert_and_load() {
    let store = store();
    store.upsert_cost_rate(CostPattern::Perform, 10.0).unwrap();
    store.upsert_cost_rate(CostPattern::Perform, 12.5).unwrap();
    store.upsert_cost_rate(CostPattern::Rm, 16.585).unwrap();

    let rates = store.load_cost_rates().unwrap();
    assert_eq!(rates.perform, Some(12.5));
    assert_eq!(rates.rm, Some(16.585));
    assert_eq!(rates.vo2, None);
}

#[test]
fn fetch_returns_every_table() {
    let store = store();
    store
        .insert_staff(&Staff { id: "s-1".into(), coach_name: "Kai W.".into() })
        .unwrap();
    store
        .insert_membership_type(&MembershipType { id: "t-1".into(), name: "VO2 Max Block".into() })
        .unwrap();
    let sale = SaleMetadata {
        id: "n-1".into(),
        value: Some(1100.0),
        total_sessions: None,
        session_frequency_per_week: Some(2.0),
    };
    store.insert_new_sale_metadata(&sale).unwrap();
    store
        .insert_renewal_metadata(&SaleMetadata { id: "r-1".into(), ..sale.clone() })
        .unwrap();
    store.insert_membership(&Membership::new("m-1", "Ava Chen")).unwrap();

    let records = store.fetch().unwrap();
    assert_eq!(records.memberships.len(), 1);
    assert_eq!(records.staff.len(), 1);
    assert_eq!(records.membership_types.len(), 1);
    assert_eq!(records.new_sale_metadata, vec![sale]);
    assert_eq!(records.renewal_metadata.len(), 1);
}

#[test]
fn unmigrated_store_is_unavailable() {
    let store = ReportStore::in_memory().unwrap();
    let err = store.fetch().unwrap_err();
    assert!(matches!(err, ReportError::StoreUnavailable { .. }), "{err}");
}

#[test]
fn engine_over_store_resolves_roster() {
    let store = store();
    store
        .insert_staff(&Staff { id: "s-1".into(), coach_name: "Kai W.".into() })
        .unwrap();
    for (id, start) in [("m-1", date(2024, 1, 1)), ("m-2", date(2024, 6, 1))] {
        let mut m = Membership::new(id, "Ava Chen");
        m.start_date = Some(start);
        m.end_date = Some(date(2025, 1, 1));
        m.coach_id = Some("s-1".into());
        store.insert_membership(&m).unwrap();
    }

    let engine = ReportEngine::new(store, ReportConfig::default_test());
    let roster = engine.current_roster(date(2024, 7, 1)).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].membership.id, "m-2");
    assert_eq!(roster[0].coach_name.as_deref(), Some("Kai W."));
}

#[test]
fn malformed_stored_date_names_the_membership() {
    // Shared-cache memory database so a raw connection can write text the
    // typed insert would never produce.
    let uri = "file:malformed_stored_date?mode=memory&cache=shared";
    let store = ReportStore::open(uri).expect("shared store");
    store.migrate().expect("migration");

    let mut good = Membership::new("m-1", "Ava Chen");
    good.start_date = Some(date(2024, 1, 1));
    good.end_date = Some(date(2025, 1, 1));
    store.insert_membership(&good).unwrap();

    let raw = rusqlite::Connection::open_with_flags(
        uri,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_URI,
    )
    .expect("second connection");
    raw.execute(
        "INSERT INTO membership (id, member_name, start_date, end_date)
         VALUES ('m-2', 'Liam Ryan', '2024/01/05', '2025-01-01')",
        [],
    )
    .unwrap();

    let engine = ReportEngine::new(store, ReportConfig::default_test());
    let err = engine.current_roster(date(2024, 6, 1)).unwrap_err();
    match err {
        ReportError::InvalidDate(msg) => {
            assert!(msg.contains("m-2"), "{msg}");
            assert!(msg.contains("start_date"), "{msg}");
        }
        other => panic!("expected InvalidDate, got {other}"),
    }
}
