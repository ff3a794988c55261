//! Audit trail of a pipeline run.

use serde::{Deserialize, Serialize};

/// Row counts around the inner join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub qualifying_rows: usize,
    pub race_rows: usize,
    pub merged_rows: usize,
    /// Qualifying rows with no race counterpart.
    pub unmatched_qualifying: usize,
    /// Race rows with no qualifying counterpart.
    pub unmatched_race: usize,
}

impl JoinStats {
    pub fn dropped(&self) -> usize {
        self.unmatched_qualifying + self.unmatched_race
    }
}

/// A record excluded because one of its values could not be cleansed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    pub season: i64,
    pub event: String,
    pub driver: String,
    /// Column holding the offending value.
    pub field: String,
    pub raw: String,
    pub message: String,
}

/// Summary of a run, written next to the feature table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub join: JoinStats,
    pub excluded_records: usize,
    pub parse_issues: Vec<ParseIssue>,
    pub output_rows: usize,
    pub output_columns: usize,
}

impl RunReport {
    pub fn has_issues(&self) -> bool {
        !self.parse_issues.is_empty()
    }
}
