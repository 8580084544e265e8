use super::ReportStore;
use crate::{
    calendar::parse_date,
    error::{ReportError, ReportResult},
    membership::{JourneyStage, Membership},
};
use chrono::NaiveDate;
use rusqlite::{params, Row};

const MEMBERSHIP_COLUMNS: &str = "id, member_id, member_name, start_date, end_date, gym, status,
     journey_stage, coach_id, programming_coach_id, handoff_coach_id,
     membership_type_id, primary_membership_id, test_duration,
     new_sale_metadata_id, renewal_metadata_id";

/// Dates come back as text and are parsed after the query, so a bad value
/// is reported against its membership instead of failing the whole read.
struct MembershipRow {
    membership: Membership,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl MembershipRow {
    fn into_membership(self) -> ReportResult<Membership> {
        let mut m = self.membership;
        m.start_date = stored_date(&m.id, "start_date", self.start_date)?;
        m.end_date = stored_date(&m.id, "end_date", self.end_date)?;
        Ok(m)
    }
}

fn stored_date(id: &str, column: &str, raw: Option<String>) -> ReportResult<Option<NaiveDate>> {
    raw.map(|s| {
        parse_date(&s)
            .map_err(|_| ReportError::InvalidDate(format!("membership {id}: {column} '{s}'")))
    })
    .transpose()
}

fn membership_from_row(row: &Row<'_>) -> rusqlite::Result<MembershipRow> {
    let membership = Membership {
        id: row.get(0)?,
        member_id: row.get(1)?,
        member_name: row.get(2)?,
        start_date: None,
        end_date: None,
        gym: row.get(5)?,
        status: row.get(6)?,
        journey_stage: row.get::<_, Option<String>>(7)?.map(JourneyStage::from),
        coach_id: row.get(8)?,
        programming_coach_id: row.get(9)?,
        handoff_coach_id: row.get(10)?,
        membership_type_id: row.get(11)?,
        primary_membership_id: row.get(12)?,
        test_duration: row.get(13)?,
        new_sale_metadata_id: row.get(14)?,
        renewal_metadata_id: row.get(15)?,
    };
    Ok(MembershipRow {
        membership,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
    })
}

impl ReportStore {
    // ── Membership ────────────────────────────────────────────

    pub fn insert_membership(&self, m: &Membership) -> ReportResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO membership ({MEMBERSHIP_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
            ),
            params![
                &m.id,
                &m.member_id,
                &m.member_name,
                &m.start_date,
                &m.end_date,
                &m.gym,
                &m.status,
                m.journey_stage.as_ref().map(|s| s.as_str()),
                &m.coach_id,
                &m.programming_coach_id,
                &m.handoff_coach_id,
                &m.membership_type_id,
                &m.primary_membership_id,
                &m.test_duration,
                &m.new_sale_metadata_id,
                &m.renewal_metadata_id,
            ],
        )?;
        Ok(())
    }

    pub fn load_memberships(&self) -> ReportResult<Vec<Membership>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM membership ORDER BY id ASC"
        ))?;
        let rows = stmt
            .query_map([], membership_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(MembershipRow::into_membership).collect()
    }

    pub fn membership_count(&self) -> ReportResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM membership", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
