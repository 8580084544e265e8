//! SQLite record store.
//!
//! RULE: Only the store talks to the database.
//! Reports read through `RecordSource::fetch`: one bulk read per call,
//! never a per-row query. The write methods exist for seeding and tests.

use crate::{
    error::{ReportError, ReportResult},
    membership::RecordSet,
    source::RecordSource,
};
use rusqlite::Connection;

mod membership;
mod reference;

pub struct ReportStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl ReportStore {
    pub fn open(path: &str) -> ReportResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| ReportError::StoreUnavailable {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        log::debug!("opened record store at {path}");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ReportResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ReportResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_memberships.sql"))?;
        Ok(())
    }

    /// Everything the reports need, in one pass over each table.
    pub fn load_all(&self) -> ReportResult<RecordSet> {
        Ok(RecordSet {
            memberships: self.load_memberships()?,
            staff: self.load_staff()?,
            membership_types: self.load_membership_types()?,
            new_sale_metadata: self.load_new_sale_metadata()?,
            renewal_metadata: self.load_renewal_metadata()?,
            cost_rates: self.load_cost_rates()?,
        })
    }
}

impl RecordSource for ReportStore {
    fn fetch(&self) -> ReportResult<RecordSet> {
        let records = self.load_all().map_err(|e| match e {
            ReportError::Database(db) => ReportError::StoreUnavailable {
                path: self.path.clone().unwrap_or_else(|| ":memory:".into()),
                reason: db.to_string(),
            },
            other => other,
        })?;
        log::debug!(
            "fetched {} memberships, {} staff, {} membership types",
            records.memberships.len(),
            records.staff.len(),
            records.membership_types.len()
        );
        Ok(records)
    }
}
