//! Source records produced by the collector and the joined entry.
//!
//! All session fields are kept as the collector wrote them. Cleansing into
//! numbers happens in the transform crate, after the join.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two raw relations consumed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Qualifying,
    Race,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Qualifying => "qualifying",
            Relation::Race => "race",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns both relations are joined on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey {
    pub season: i64,
    pub event: String,
    pub driver: String,
    pub car_number: String,
    pub team: String,
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, #{}, {})",
            self.season, self.event, self.driver, self.car_number, self.team
        )
    }
}

/// One driver's qualifying result at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingRecord {
    pub season: i64,
    pub event: String,
    pub position: String,
    pub car_number: String,
    pub driver: String,
    pub team: String,
    /// Q1, Q2 and Q3 times in session order. Empty when the driver set no time.
    pub segment_times: [String; 3],
    pub laps: String,
}

impl QualifyingRecord {
    pub fn key(&self) -> JoinKey {
        JoinKey {
            season: self.season,
            event: self.event.clone(),
            driver: self.driver.clone(),
            car_number: self.car_number.clone(),
            team: self.team.clone(),
        }
    }
}

/// One driver's race result at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceRecord {
    pub season: i64,
    pub event: String,
    pub position: String,
    pub car_number: String,
    pub driver: String,
    pub team: String,
    pub laps: String,
    /// Winner's elapsed time, a gap to the winner, or a status code (`DNF`, `DNS`).
    pub time_or_status: String,
    pub points: String,
}

impl RaceRecord {
    pub fn key(&self) -> JoinKey {
        JoinKey {
            season: self.season,
            event: self.event.clone(),
            driver: self.driver.clone(),
            car_number: self.car_number.clone(),
            team: self.team.clone(),
        }
    }
}

/// A qualifying record joined with the race record sharing its key.
///
/// The car number is dropped after the join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedEntry {
    pub season: i64,
    pub event: String,
    /// 1-based first-occurrence index of `(season, event)` in the joined relation.
    pub event_ordinal: u32,
    pub driver: String,
    pub team: String,
    pub quali_position: String,
    pub segment_times: [String; 3],
    pub quali_laps: String,
    pub race_position: String,
    pub race_laps: String,
    pub time_or_status: String,
    pub points: String,
}
