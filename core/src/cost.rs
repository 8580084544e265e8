//! Cost & margin calculator.
//!
//! Per membership: session-based PERFORM / VO2 costs plus the ongoing RM
//! (results manager) cost. Costs are then summed across the sale group
//! (primary membership + children) and set against the ex-GST value.
//!
//! This calculator is NOT deduplicated by member: every membership record,
//! child memberships included, gets one breakdown.
//!
//! Missing inputs follow SQL NULL arithmetic: a component that needs a
//! missing input is `None`, a row cost is `None` if any component is,
//! and the group total only sums rows that have a cost.

use crate::{
    config::ReportConfig,
    membership::{CostPattern, CostRates, Membership, MembershipType, RecordSet, SaleMetadata},
    types::MembershipId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipClass {
    Standard,
    Pack,
    Vo2,
    OnlineCoaching,
}

impl MembershipClass {
    /// Case-insensitive substring classification of a membership type name.
    /// Online coaching is checked first, then the pack family, then VO2.
    pub fn classify(type_name: Option<&str>) -> Self {
        let Some(name) = type_name else {
            return Self::Standard;
        };
        let name = name.to_lowercase();
        if name.contains("online coaching") {
            Self::OnlineCoaching
        } else if name.contains("pack") || name.contains("flexible") {
            Self::Pack
        } else if name.contains("vo2") {
            Self::Vo2
        } else {
            Self::Standard
        }
    }
}

/// Weeks a membership runs, read from its free-text duration.
///
/// "12" must be tested before "3" and "6".
pub fn membership_weeks(test_duration: Option<&str>, default_weeks: u32) -> u32 {
    match test_duration {
        Some(d) if d.contains("12") => 52,
        Some(d) if d.contains('3') => 12,
        Some(d) if d.contains('6') => 26,
        _ => default_weeks,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub membership_id: MembershipId,
    pub member_name: String,
    pub sale_group_id: MembershipId,
    pub is_child: bool,
    pub class: MembershipClass,
    pub membership_weeks: u32,
    pub adjusted_sessions: Option<f64>,
    pub perform_cost: Option<f64>,
    pub vo2_cost: Option<f64>,
    pub rm_cost: Option<f64>,
    pub membership_value: Option<f64>,
    pub membership_value_ex_gst: Option<f64>,
    /// Sum of row costs over the whole sale group.
    pub total_overall_cost: Option<f64>,
    pub margin: Option<f64>,
    pub margin_percent: Option<f64>,
}

impl CostBreakdown {
    /// PERFORM + VO2 + RM for this row alone.
    pub fn row_cost(&self) -> Option<f64> {
        Some(self.perform_cost? + self.vo2_cost? + self.rm_cost?)
    }

    fn apply_group_total(&mut self, total: Option<f64>) {
        self.total_overall_cost = total;
        if self.class == MembershipClass::OnlineCoaching {
            self.margin = None;
            self.margin_percent = None;
            return;
        }
        self.margin = match (self.membership_value_ex_gst, total) {
            (Some(value), Some(cost)) => Some(value - cost),
            _ => None,
        };
        self.margin_percent = match (self.membership_value_ex_gst, total) {
            (Some(value), Some(cost)) if value != 0.0 => Some(1.0 - cost / value),
            _ => None,
        };
    }
}

/// Metadata fields taken from the new sale first, then the renewal.
fn coalesce<T>(
    new_sale: Option<&SaleMetadata>,
    renewal: Option<&SaleMetadata>,
    field: impl Fn(&SaleMetadata) -> Option<T>,
) -> Option<T> {
    new_sale.and_then(&field).or_else(|| renewal.and_then(&field))
}

/// Per-membership figures. `total_overall_cost` and the margins are filled
/// in once the sale group is known (see `compute_all`).
pub fn compute_costs(
    membership: &Membership,
    new_sale: Option<&SaleMetadata>,
    renewal: Option<&SaleMetadata>,
    membership_type: Option<&MembershipType>,
    rates: &CostRates,
    config: &ReportConfig,
) -> CostBreakdown {
    let weeks = membership_weeks(
        membership.test_duration.as_deref(),
        config.default_membership_weeks,
    );
    let class = MembershipClass::classify(membership_type.map(|t| t.name.as_str()));

    let total_sessions = coalesce(new_sale, renewal, |m| m.total_sessions);
    let frequency = coalesce(new_sale, renewal, |m| m.session_frequency_per_week);

    let adjusted_sessions = match class {
        MembershipClass::OnlineCoaching => None,
        MembershipClass::Pack => total_sessions,
        MembershipClass::Standard | MembershipClass::Vo2 => frequency.map(|f| f * weeks as f64),
    };

    let priced = |pattern: CostPattern| -> Option<f64> {
        Some(adjusted_sessions? * rates.get(pattern)?)
    };

    let perform_cost = match class {
        MembershipClass::OnlineCoaching | MembershipClass::Vo2 => Some(0.0),
        MembershipClass::Pack | MembershipClass::Standard => priced(CostPattern::Perform),
    };
    let vo2_cost = match class {
        MembershipClass::Vo2 => priced(CostPattern::Vo2),
        _ => Some(0.0),
    };
    let rm_cost = match class {
        MembershipClass::OnlineCoaching | MembershipClass::Pack => Some(0.0),
        _ if membership.is_child() => Some(0.0),
        _ => rates.rm.map(|rm| rm * weeks as f64),
    };

    let membership_value = coalesce(new_sale, renewal, |m| m.value);

    CostBreakdown {
        membership_id: membership.id.clone(),
        member_name: membership.member_name.clone(),
        sale_group_id: membership.sale_group_id().to_string(),
        is_child: membership.is_child(),
        class,
        membership_weeks: weeks,
        adjusted_sessions,
        perform_cost,
        vo2_cost,
        rm_cost,
        membership_value,
        membership_value_ex_gst: membership_value.map(|v| v / config.gst_divisor),
        total_overall_cost: None,
        margin: None,
        margin_percent: None,
    }
}

/// Breakdowns for every membership, ordered by membership id.
///
/// Two passes: build every row and index it by sale group, then sum the
/// group totals and write them back.
pub fn compute_all(records: &RecordSet, config: &ReportConfig) -> Vec<CostBreakdown> {
    let types = records.type_index();
    let new_sales = records.new_sale_index();
    let renewals = records.renewal_index();

    let mut rows: Vec<CostBreakdown> = records
        .memberships
        .iter()
        .map(|m| {
            compute_costs(
                m,
                m.new_sale_metadata_id
                    .as_deref()
                    .and_then(|id| new_sales.get(id).copied()),
                m.renewal_metadata_id
                    .as_deref()
                    .and_then(|id| renewals.get(id).copied()),
                m.membership_type_id
                    .as_deref()
                    .and_then(|id| types.get(id).copied()),
                &records.cost_rates,
                config,
            )
        })
        .collect();

    let mut group_totals: HashMap<MembershipId, Option<f64>> = HashMap::new();
    for row in &rows {
        let total = group_totals.entry(row.sale_group_id.clone()).or_insert(None);
        if let Some(cost) = row.row_cost() {
            *total = Some(total.unwrap_or(0.0) + cost);
        }
    }

    for row in &mut rows {
        let total = group_totals.get(&row.sale_group_id).copied().flatten();
        row.apply_group_total(total);
    }

    rows.sort_by(|a, b| a.membership_id.cmp(&b.membership_id));
    rows
}
