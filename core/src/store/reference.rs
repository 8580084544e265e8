//! Reference tables: staff, membership types, sale metadata, cost config.

use super::ReportStore;
use crate::{
    error::ReportResult,
    membership::{CostPattern, CostRates, MembershipType, SaleMetadata, Staff},
};
use rusqlite::params;

/// The two metadata tables share a shape.
#[derive(Debug, Clone, Copy)]
enum MetadataTable {
    NewSale,
    Renewal,
}

impl MetadataTable {
    fn name(self) -> &'static str {
        match self {
            Self::NewSale => "new_sale_metadata",
            Self::Renewal => "renewal_metadata",
        }
    }
}

impl ReportStore {
    // ── Staff ─────────────────────────────────────────────────

    pub fn insert_staff(&self, staff: &Staff) -> ReportResult<()> {
        self.conn.execute(
            "INSERT INTO staff (id, coach_name) VALUES (?1, ?2)",
            params![&staff.id, &staff.coach_name],
        )?;
        Ok(())
    }

    pub fn load_staff(&self) -> ReportResult<Vec<Staff>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, coach_name FROM staff ORDER BY id ASC")?;
        let staff = stmt
            .query_map([], |row| {
                Ok(Staff {
                    id: row.get(0)?,
                    coach_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(staff)
    }

    // ── Membership type ───────────────────────────────────────

    pub fn insert_membership_type(&self, t: &MembershipType) -> ReportResult<()> {
        self.conn.execute(
            "INSERT INTO membership_type (id, name) VALUES (?1, ?2)",
            params![&t.id, &t.name],
        )?;
        Ok(())
    }

    pub fn load_membership_types(&self) -> ReportResult<Vec<MembershipType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM membership_type ORDER BY id ASC")?;
        let types = stmt
            .query_map([], |row| {
                Ok(MembershipType {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(types)
    }

    // ── Sale metadata ─────────────────────────────────────────

    fn insert_metadata(&self, table: MetadataTable, m: &SaleMetadata) -> ReportResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (id, value, total_sessions, session_frequency_per_week)
                 VALUES (?1, ?2, ?3, ?4)",
                table.name()
            ),
            params![
                &m.id,
                m.value,
                m.total_sessions,
                m.session_frequency_per_week
            ],
        )?;
        Ok(())
    }

    fn load_metadata(&self, table: MetadataTable) -> ReportResult<Vec<SaleMetadata>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, value, total_sessions, session_frequency_per_week
             FROM {} ORDER BY id ASC",
            table.name()
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SaleMetadata {
                    id: row.get(0)?,
                    value: row.get(1)?,
                    total_sessions: row.get(2)?,
                    session_frequency_per_week: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert_new_sale_metadata(&self, m: &SaleMetadata) -> ReportResult<()> {
        self.insert_metadata(MetadataTable::NewSale, m)
    }

    pub fn insert_renewal_metadata(&self, m: &SaleMetadata) -> ReportResult<()> {
        self.insert_metadata(MetadataTable::Renewal, m)
    }

    pub fn load_new_sale_metadata(&self) -> ReportResult<Vec<SaleMetadata>> {
        self.load_metadata(MetadataTable::NewSale)
    }

    pub fn load_renewal_metadata(&self) -> ReportResult<Vec<SaleMetadata>> {
        self.load_metadata(MetadataTable::Renewal)
    }

    // ── System config ─────────────────────────────────────────

    pub fn upsert_cost_rate(&self, pattern: CostPattern, base_cost: f64) -> ReportResult<()> {
        self.conn.execute(
            "INSERT INTO system_config (pattern, base_cost) VALUES (?1, ?2)
             ON CONFLICT(pattern) DO UPDATE SET base_cost = excluded.base_cost",
            params![pattern.label(), base_cost],
        )?;
        Ok(())
    }

    /// Unknown patterns in the table are ignored; missing ones stay `None`.
    pub fn load_cost_rates(&self) -> ReportResult<CostRates> {
        let mut stmt = self
            .conn
            .prepare("SELECT pattern, base_cost FROM system_config")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rates = CostRates::default();
        for (label, cost) in rows {
            match CostPattern::from_label(&label) {
                Some(pattern) => rates.set(pattern, cost),
                None => log::warn!("ignoring unknown cost pattern '{label}'"),
            }
        }
        Ok(rates)
    }
}
