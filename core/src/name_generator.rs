//! Deterministic person names for demo members and coaches.
//!
//! Same RNG stream = same names.

use crate::rng::SeededRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn generate_full_name(rng: &mut SeededRng) -> String {
        let first = rng.pick(Self::first_names());
        let last = rng.pick(Self::last_names());
        format!("{first} {last}")
    }

    /// Coaches go by first name plus initial on the roster.
    pub fn generate_coach_name(rng: &mut SeededRng) -> String {
        let first = rng.pick(Self::first_names());
        let last = rng.pick(Self::last_names());
        format!("{first} {}.", &last[..1])
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Liam", "Olivia", "Noah", "Charlotte", "Jack", "Amelia", "Oliver", "Isla",
            "William", "Mia", "Leo", "Ava", "Henry", "Grace", "Lucas", "Chloe",
            "Thomas", "Zoe", "Harrison", "Ruby", "Archie", "Matilda", "Hudson", "Harper",
            "Cooper", "Ella", "Mason", "Sienna", "Hunter", "Evie", "Flynn", "Willow",
            "Kai", "Lily", "Riley", "Sophie", "Ethan", "Ivy", "Xavier", "Aria",
            "Samuel", "Georgia", "Angus", "Layla", "Max", "Hannah", "Toby", "Emily",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Jones", "Williams", "Brown", "Wilson", "Taylor", "Nguyen", "Johnson",
            "Martin", "White", "Anderson", "Walker", "Thompson", "Thomas", "Lee", "Ryan",
            "Harris", "Kelly", "Robinson", "King", "Campbell", "Clarke", "Young", "Mitchell",
            "Murphy", "O'Brien", "Scott", "Stewart", "Tran", "Wright", "Baker", "Edwards",
            "Hughes", "Chen", "Patel", "Singh", "Morris", "Wood", "Bell", "Kennedy",
        ]
    }
}
