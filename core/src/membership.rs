//! Membership data model.
//!
//! These are read-only views of records owned by the upstream sales/CRM
//! process. Nothing in this crate mutates them after they are loaded.

use crate::types::{GymLabel, MembershipId, MembershipTypeId, MetadataId, StaffId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Status label that marks friends-and-family memberships.
pub const STATUS_FRIENDS_AND_FAMILY: &str = "f&f";

/// Lifecycle label of a membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JourneyStage {
    NoSale,
    Expired,
    NewMember,
    RenewedMember,
    Other(String),
}

impl JourneyStage {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSale => "no_sale",
            Self::Expired => "expired",
            Self::NewMember => "new_member",
            Self::RenewedMember => "renewed_member",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for JourneyStage {
    fn from(label: String) -> Self {
        match label.as_str() {
            "no_sale" => Self::NoSale,
            "expired" => Self::Expired,
            "new_member" => Self::NewMember,
            "renewed_member" => Self::RenewedMember,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for JourneyStage {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<JourneyStage> for String {
    fn from(stage: JourneyStage) -> Self {
        stage.as_str().to_string()
    }
}

impl fmt::Display for JourneyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub member_id: Option<String>,
    pub member_name: String,
    pub start_date: Option<NaiveDate>,
    /// A NULL end date is not "indefinite": it never counts as active.
    pub end_date: Option<NaiveDate>,
    pub gym: Option<GymLabel>,
    pub status: Option<String>,
    pub journey_stage: Option<JourneyStage>,
    pub coach_id: Option<StaffId>,
    pub programming_coach_id: Option<StaffId>,
    pub handoff_coach_id: Option<StaffId>,
    pub membership_type_id: Option<MembershipTypeId>,
    pub primary_membership_id: Option<MembershipId>,
    pub test_duration: Option<String>,
    pub new_sale_metadata_id: Option<MetadataId>,
    pub renewal_metadata_id: Option<MetadataId>,
}

impl Membership {
    /// Minimal record for fixtures and seeding; every optional field is NULL.
    pub fn new(id: impl Into<MembershipId>, member_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            member_id: None,
            member_name: member_name.into(),
            start_date: None,
            end_date: None,
            gym: None,
            status: None,
            journey_stage: None,
            coach_id: None,
            programming_coach_id: None,
            handoff_coach_id: None,
            membership_type_id: None,
            primary_membership_id: None,
            test_duration: None,
            new_sale_metadata_id: None,
            renewal_metadata_id: None,
        }
    }

    /// Sale group key: the primary membership's id, or our own.
    pub fn sale_group_id(&self) -> &str {
        self.primary_membership_id.as_deref().unwrap_or(&self.id)
    }

    pub fn is_child(&self) -> bool {
        self.primary_membership_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub coach_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipType {
    pub id: MembershipTypeId,
    pub name: String,
}

/// New-sale or renewal metadata. Values are GST-inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleMetadata {
    pub id: MetadataId,
    pub value: Option<f64>,
    pub total_sessions: Option<f64>,
    pub session_frequency_per_week: Option<f64>,
}

/// Which base cost a `system_config` row prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CostPattern {
    Perform,
    Vo2,
    Rm,
}

impl CostPattern {
    pub const ALL: [CostPattern; 3] = [Self::Perform, Self::Vo2, Self::Rm];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Perform => "PERFORM",
            Self::Vo2 => "VO2",
            Self::Rm => "RM",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

/// Base costs per unit, resolved from the keyed config table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    pub perform: Option<f64>,
    pub vo2: Option<f64>,
    pub rm: Option<f64>,
}

impl CostRates {
    pub fn get(&self, pattern: CostPattern) -> Option<f64> {
        match pattern {
            CostPattern::Perform => self.perform,
            CostPattern::Vo2 => self.vo2,
            CostPattern::Rm => self.rm,
        }
    }

    pub fn set(&mut self, pattern: CostPattern, cost: f64) {
        match pattern {
            CostPattern::Perform => self.perform = Some(cost),
            CostPattern::Vo2 => self.vo2 = Some(cost),
            CostPattern::Rm => self.rm = Some(cost),
        }
    }
}

/// A bulk extract of everything the reports read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub memberships: Vec<Membership>,
    pub staff: Vec<Staff>,
    pub membership_types: Vec<MembershipType>,
    pub new_sale_metadata: Vec<SaleMetadata>,
    pub renewal_metadata: Vec<SaleMetadata>,
    pub cost_rates: CostRates,
}

impl RecordSet {
    pub fn staff_index(&self) -> HashMap<&str, &Staff> {
        self.staff.iter().map(|s| (s.id.as_str(), s)).collect()
    }

    pub fn type_index(&self) -> HashMap<&str, &MembershipType> {
        self.membership_types
            .iter()
            .map(|t| (t.id.as_str(), t))
            .collect()
    }

    pub fn new_sale_index(&self) -> HashMap<&str, &SaleMetadata> {
        self.new_sale_metadata
            .iter()
            .map(|m| (m.id.as_str(), m))
            .collect()
    }

    pub fn renewal_index(&self) -> HashMap<&str, &SaleMetadata> {
        self.renewal_metadata
            .iter()
            .map(|m| (m.id.as_str(), m))
            .collect()
    }

    /// Earliest known start date, used as the first month of the series.
    pub fn earliest_start(&self) -> Option<NaiveDate> {
        self.memberships.iter().filter_map(|m| m.start_date).min()
    }
}
