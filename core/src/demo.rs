//! Deterministic demo dataset.
//!
//! Populates a store with coaches, membership types, cost config and a
//! member history (renewals, child add-ons, holds, friends-and-family,
//! no-sale leads) so every report has something to show.
//! Same seed = identical store contents.

use crate::{
    error::ReportResult,
    membership::{CostPattern, JourneyStage, Membership, MembershipType, SaleMetadata, Staff},
    name_generator::NameGenerator,
    rng::{DemoStream, SeededRng},
    store::ReportStore,
};
use chrono::{Duration, NaiveDate};
use uuid::Builder;

const COACH_COUNT: usize = 6;
const HISTORY_DAYS: u64 = 3 * 365;

/// (type name, weekly price). The price drives the sale value.
const MEMBERSHIP_TYPES: [(&str, f64); 4] = [
    ("Foundations Small Group", 65.0),
    ("10 Session Pack", 55.0),
    ("VO2 Max Block", 80.0),
    ("Online Coaching", 45.0),
];

const DURATIONS: [(&str, i64); 3] = [("3 months", 12), ("6 months", 26), ("12 months", 52)];

const BASE_COSTS: [(CostPattern, f64); 3] = [
    (CostPattern::Perform, 18.5),
    (CostPattern::Vo2, 35.0),
    (CostPattern::Rm, 16.585),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoSummary {
    pub staff: usize,
    pub members: usize,
    pub memberships: usize,
    pub child_memberships: usize,
}

struct Seeder<'a> {
    store: &'a ReportStore,
    ids: SeededRng,
    rng: SeededRng,
    summary: DemoSummary,
}

impl Seeder<'_> {
    fn next_id(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.ids.fill_bytes(&mut bytes);
        Builder::from_random_bytes(bytes).into_uuid().to_string()
    }

    fn insert_sale(&mut self, renewal: bool, weekly_price: f64, weeks: i64) -> ReportResult<String> {
        let id = self.next_id();
        let frequency = 1 + self.rng.next_u64_below(3);
        let metadata = SaleMetadata {
            id: id.clone(),
            value: Some((weekly_price * weeks as f64 * 100.0).round() / 100.0),
            total_sessions: Some(10.0 + 10.0 * self.rng.next_u64_below(2) as f64),
            session_frequency_per_week: Some(frequency as f64),
        };
        if renewal {
            self.store.insert_renewal_metadata(&metadata)?;
        } else {
            self.store.insert_new_sale_metadata(&metadata)?;
        }
        Ok(id)
    }
}

/// Seed `members` demo members whose history ends around `today`.
/// Ids are derived from the seed, so only an empty store is seeded; a store
/// that already holds memberships is left alone and an empty summary returned.
pub fn seed_demo(
    store: &ReportStore,
    seed: u64,
    members: usize,
    today: NaiveDate,
    gyms: &[String],
) -> ReportResult<DemoSummary> {
    let existing = store.membership_count()?;
    if existing > 0 {
        log::warn!("store already holds {existing} memberships; demo seeding skipped");
        return Ok(DemoSummary::default());
    }

    let mut seeder = Seeder {
        store,
        ids: SeededRng::new(seed, DemoStream::Ids),
        rng: SeededRng::new(seed, DemoStream::Memberships),
        summary: DemoSummary::default(),
    };

    let mut staff_rng = SeededRng::new(seed, DemoStream::Staff);
    let mut coach_ids = Vec::with_capacity(COACH_COUNT);
    for _ in 0..COACH_COUNT {
        let staff = Staff {
            id: seeder.next_id(),
            coach_name: NameGenerator::generate_coach_name(&mut staff_rng),
        };
        store.insert_staff(&staff)?;
        coach_ids.push(staff.id);
    }
    seeder.summary.staff = coach_ids.len();

    let mut type_ids = Vec::with_capacity(MEMBERSHIP_TYPES.len());
    for (name, _) in MEMBERSHIP_TYPES {
        let t = MembershipType {
            id: seeder.next_id(),
            name: name.to_string(),
        };
        store.insert_membership_type(&t)?;
        type_ids.push(t.id);
    }

    for (pattern, cost) in BASE_COSTS {
        store.upsert_cost_rate(pattern, cost)?;
    }

    let mut member_rng = SeededRng::new(seed, DemoStream::Members);
    for _ in 0..members {
        let member_name = NameGenerator::generate_full_name(&mut member_rng);
        let member_id = seeder.next_id();
        let gym = if gyms.is_empty() || member_rng.chance(0.05) {
            None
        } else {
            Some(member_rng.pick(gyms).clone())
        };
        let coach = member_rng.pick(&coach_ids).clone();

        let mut start = today - Duration::days(member_rng.next_u64_below(HISTORY_DAYS) as i64);
        let renewals = member_rng.next_u64_below(3);

        for term in 0..=renewals {
            let (duration, weeks) = *seeder.rng.pick(&DURATIONS);
            let type_index = if seeder.rng.chance(0.7) {
                0
            } else {
                seeder.rng.next_u64_below(MEMBERSHIP_TYPES.len() as u64) as usize
            };
            let (_, weekly_price) = MEMBERSHIP_TYPES[type_index];
            let end = start + Duration::weeks(weeks);

            let journey_stage = if seeder.rng.chance(0.05) {
                JourneyStage::NoSale
            } else if end <= today {
                JourneyStage::Expired
            } else if term == 0 {
                JourneyStage::NewMember
            } else {
                JourneyStage::RenewedMember
            };
            let status = if seeder.rng.chance(0.04) {
                "f&f"
            } else if seeder.rng.chance(0.05) {
                "indefinite_hold"
            } else {
                "active"
            };

            let sale_id = seeder.insert_sale(term > 0, weekly_price, weeks)?;
            let mut m = Membership::new(seeder.next_id(), member_name.clone());
            m.member_id = Some(member_id.clone());
            m.start_date = Some(start);
            m.end_date = Some(end);
            m.gym = gym.clone();
            m.status = Some(status.to_string());
            m.journey_stage = Some(journey_stage);
            m.coach_id = Some(coach.clone());
            if seeder.rng.chance(0.3) {
                m.programming_coach_id = Some(seeder.rng.pick(&coach_ids).clone());
            }
            if seeder.rng.chance(0.1) {
                m.handoff_coach_id = Some(seeder.rng.pick(&coach_ids).clone());
            }
            m.membership_type_id = Some(type_ids[type_index].clone());
            m.test_duration = Some(duration.to_string());
            if term > 0 {
                m.renewal_metadata_id = Some(sale_id);
            } else {
                m.new_sale_metadata_id = Some(sale_id);
            }
            store.insert_membership(&m)?;
            seeder.summary.memberships += 1;

            // Add-on block sold alongside the primary membership.
            if seeder.rng.chance(0.2) {
                let addon_type = if seeder.rng.chance(0.5) { 1 } else { 2 };
                let (_, addon_price) = MEMBERSHIP_TYPES[addon_type];
                let addon_sale = seeder.insert_sale(false, addon_price, weeks)?;
                let mut child = m.clone();
                child.id = seeder.next_id();
                child.primary_membership_id = Some(m.id.clone());
                child.membership_type_id = Some(type_ids[addon_type].clone());
                child.new_sale_metadata_id = Some(addon_sale);
                child.renewal_metadata_id = None;
                child.programming_coach_id = None;
                child.handoff_coach_id = None;
                store.insert_membership(&child)?;
                seeder.summary.memberships += 1;
                seeder.summary.child_memberships += 1;
            }

            start = end;
        }
        seeder.summary.members += 1;
    }

    log::info!(
        "seeded demo data (seed {seed}): {} members, {} memberships ({} add-ons), {} coaches",
        seeder.summary.members,
        seeder.summary.memberships,
        seeder.summary.child_memberships,
        seeder.summary.staff
    );
    Ok(seeder.summary)
}
