//! Record source seam.
//!
//! RULE: Reports read their inputs through one `fetch()` per call.
//! No per-row round trips, no writes.

use crate::{error::ReportResult, membership::RecordSet};

pub trait RecordSource {
    /// Bulk-read every record a report needs.
    fn fetch(&self) -> ReportResult<RecordSet>;
}

/// An in-memory extract serves itself.
impl RecordSource for RecordSet {
    fn fetch(&self) -> ReportResult<RecordSet> {
        Ok(self.clone())
    }
}
