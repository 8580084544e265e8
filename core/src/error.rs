use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Record store unavailable at '{path}': {reason}")]
    StoreUnavailable { path: String, reason: String },

    #[error("Invalid date range: {earliest} is after {latest}")]
    InvalidDateRange { earliest: NaiveDate, latest: NaiveDate },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
