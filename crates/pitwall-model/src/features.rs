//! Cleansed entries and final feature rows.

use serde::{Deserialize, Serialize};

/// Cleansed qualifying session of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualifyingResult {
    /// Qualifying position in `1..=26`.
    pub position: u32,
    /// Q1, Q2, Q3 in seconds, backfilled and with sentinels substituted.
    pub segment_seconds: [f64; 3],
}

impl QualifyingResult {
    /// Fastest of the three qualifying segments.
    pub fn fastest_segment(&self) -> f64 {
        self.segment_seconds
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }
}

/// A joined entry after status and lap-time cleansing.
///
/// Race fields feed the season totals and rolling form of every entry, so
/// they are always present. `qualifying` is `None` when a qualifying cell
/// could not be read; such an entry still counts towards the running totals
/// but gets no feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanEntry {
    pub season: i64,
    pub event: String,
    pub event_ordinal: u32,
    pub driver: String,
    pub team: String,
    /// Race position in `1..=26`.
    pub race_position: u32,
    pub points: f64,
    pub win: bool,
    pub dnf: bool,
    pub qualifying: Option<QualifyingResult>,
}

/// One model input row, derived from one joined entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub season: i64,
    pub event: String,
    pub event_ordinal: u32,
    pub driver: String,
    /// Team name after canonicalization.
    pub team: String,
    pub quali_position: u32,
    pub race_position: u32,
    pub win: bool,
    pub dnf: bool,
    /// Team DNFs earlier in the same season.
    pub team_season_dnf: u32,
    /// Driver points earlier in the same season.
    pub season_points: f64,
    /// Mean race position over the driver's most recent prior events.
    pub rolling_form: f64,
    pub fastest_time: f64,
    pub event_fastest_time: f64,
    /// Gap to pole, in seconds, before normalization.
    pub quali_gap: f64,
    /// Gap to pole after batch z-score normalization.
    pub quali_delta: f64,
}
