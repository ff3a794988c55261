//! Final feature assembly and encoding.
//!
//! Computes the qualifying gap to the event's fastest time, z-scores it over
//! the whole batch, and one-hot encodes driver, team and event against a
//! [`CategoryVocabulary`].

use std::collections::{BTreeSet, HashMap, HashSet};

use pitwall_model::{CleanEntry, FeatureOptions, FeatureRow, QualifyingResult};
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};

use crate::aggregate::SeasonAggregates;
use crate::error::Result;

/// Numeric columns emitted before the one-hot columns, in output order.
pub const BASE_COLUMNS: [&str; 10] = [
    "season",
    "event_ordinal",
    "position_quali",
    "position_race",
    "win",
    "dnf",
    "team_season_dnf",
    "season_points",
    "rolling_form",
    "quali_delta",
];

/// Features computed by earlier stages, aligned with the cleansed entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedColumns {
    pub aggregates: SeasonAggregates,
    pub rolling_form: Vec<f64>,
    pub canonical_teams: Vec<String>,
}

/// Pole time of every `(season, event_ordinal)`, over entries with a
/// qualifying result.
pub fn event_pole_times(entries: &[CleanEntry]) -> HashMap<(i64, u32), f64> {
    let mut poles: HashMap<(i64, u32), f64> = HashMap::new();
    for entry in entries {
        let Some(qualifying) = &entry.qualifying else {
            continue;
        };
        let time = qualifying.fastest_segment();
        poles
            .entry((entry.season, entry.event_ordinal))
            .and_modify(|best| *best = best.min(time))
            .or_insert(time);
    }
    poles
}

/// Population z-scores. All zeros when the batch has no spread.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return vec![0.0; values.len()];
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    if std == 0.0 || !std.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std).collect()
}

/// Assembles one [`FeatureRow`] per cleansed entry with a qualifying result.
///
/// `derived` is aligned with `entries`, including the entries that get no row.
pub fn finalize(
    entries: &[CleanEntry],
    derived: &DerivedColumns,
    options: &FeatureOptions,
) -> FeatureTable {
    let poles = event_pole_times(entries);
    let kept: Vec<(usize, &CleanEntry, QualifyingResult, f64)> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let qualifying = entry.qualifying?;
            let pole = poles
                .get(&(entry.season, entry.event_ordinal))
                .copied()
                .unwrap_or_else(|| qualifying.fastest_segment());
            Some((idx, entry, qualifying, pole))
        })
        .collect();
    let gaps: Vec<f64> = kept
        .iter()
        .map(|(_, _, qualifying, pole)| qualifying.fastest_segment() - pole)
        .collect();
    let deltas = if options.normalize_delta {
        z_scores(&gaps)
    } else {
        gaps.clone()
    };

    let rows = kept
        .iter()
        .zip(gaps.iter().zip(&deltas))
        .map(|(&(idx, entry, qualifying, pole), (&gap, &delta))| FeatureRow {
            season: entry.season,
            event: entry.event.clone(),
            event_ordinal: entry.event_ordinal,
            driver: entry.driver.clone(),
            team: derived
                .canonical_teams
                .get(idx)
                .cloned()
                .unwrap_or_else(|| entry.team.clone()),
            quali_position: qualifying.position,
            race_position: entry.race_position,
            win: entry.win,
            dnf: entry.dnf,
            team_season_dnf: derived
                .aggregates
                .team_season_dnf
                .get(idx)
                .copied()
                .unwrap_or_default(),
            season_points: derived
                .aggregates
                .season_points
                .get(idx)
                .copied()
                .unwrap_or_default(),
            rolling_form: derived.rolling_form.get(idx).copied().unwrap_or_default(),
            fastest_time: qualifying.fastest_segment(),
            event_fastest_time: pole,
            quali_gap: gap,
            quali_delta: delta,
        })
        .collect();
    FeatureTable::new(rows)
}

/// Categories used for one-hot encoding.
///
/// Each list is sorted. The first value of each list is the reference
/// category and gets no column. Pin a vocabulary to keep the output column set
/// stable across runs; values it does not know encode as all zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub drivers: Vec<String>,
    pub teams: Vec<String>,
    pub events: Vec<String>,
}

impl CategoryVocabulary {
    pub fn new(
        drivers: impl IntoIterator<Item = String>,
        teams: impl IntoIterator<Item = String>,
        events: impl IntoIterator<Item = String>,
    ) -> Self {
        fn sorted(values: impl IntoIterator<Item = String>) -> Vec<String> {
            values
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }
        Self {
            drivers: sorted(drivers),
            teams: sorted(teams),
            events: sorted(events),
        }
    }

    pub fn from_rows(rows: &[FeatureRow]) -> Self {
        Self::new(
            rows.iter().map(|row| row.driver.clone()),
            rows.iter().map(|row| row.team.clone()),
            rows.iter().map(|row| row.event.clone()),
        )
    }

    fn groups(&self) -> [(&'static str, &[String]); 3] {
        [
            ("driver", self.drivers.as_slice()),
            ("team", self.teams.as_slice()),
            ("event", self.events.as_slice()),
        ]
    }

    /// One-hot column names in output order.
    ///
    /// A name already taken by a base column or an earlier one-hot column
    /// gets the first free numeric suffix (`event_ordinal_2`).
    pub fn column_names(&self) -> Vec<String> {
        let mut taken: HashSet<String> =
            BASE_COLUMNS.iter().map(|name| (*name).to_string()).collect();
        let mut names = Vec::with_capacity(self.width());
        for (prefix, values) in self.groups() {
            for value in values.iter().skip(1) {
                let base = format!("{prefix}_{value}");
                let mut name = base.clone();
                let mut suffix = 2;
                while taken.contains(&name) {
                    name = format!("{base}_{suffix}");
                    suffix += 1;
                }
                taken.insert(name.clone());
                names.push(name);
            }
        }
        names
    }

    /// Number of one-hot columns.
    pub fn width(&self) -> usize {
        self.groups()
            .into_iter()
            .map(|(_, values)| values.len().saturating_sub(1))
            .sum()
    }
}

fn one_hot(values: &[String], categories: &[String]) -> Vec<Vec<i32>> {
    categories
        .iter()
        .skip(1)
        .map(|category| values.iter().map(|v| i32::from(v == category)).collect())
        .collect()
}

/// The finished feature rows of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(rows: Vec<FeatureRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Vocabulary observed in this table.
    pub fn vocabulary(&self) -> CategoryVocabulary {
        CategoryVocabulary::from_rows(&self.rows)
    }

    /// Renders the model input frame: [`BASE_COLUMNS`] then the one-hot
    /// columns of `vocabulary`.
    pub fn to_dataframe(&self, vocabulary: &CategoryVocabulary) -> Result<DataFrame> {
        let rows = &self.rows;
        let mut columns = vec![
            Column::new(
                "season".into(),
                rows.iter().map(|r| r.season).collect::<Vec<i64>>(),
            ),
            Column::new(
                "event_ordinal".into(),
                rows.iter().map(|r| i64::from(r.event_ordinal)).collect::<Vec<_>>(),
            ),
            Column::new(
                "position_quali".into(),
                rows.iter().map(|r| i64::from(r.quali_position)).collect::<Vec<_>>(),
            ),
            Column::new(
                "position_race".into(),
                rows.iter().map(|r| i64::from(r.race_position)).collect::<Vec<_>>(),
            ),
            Column::new("win".into(), rows.iter().map(|r| i32::from(r.win)).collect::<Vec<_>>()),
            Column::new("dnf".into(), rows.iter().map(|r| i32::from(r.dnf)).collect::<Vec<_>>()),
            Column::new(
                "team_season_dnf".into(),
                rows.iter().map(|r| i64::from(r.team_season_dnf)).collect::<Vec<_>>(),
            ),
            Column::new(
                "season_points".into(),
                rows.iter().map(|r| r.season_points).collect::<Vec<f64>>(),
            ),
            Column::new(
                "rolling_form".into(),
                rows.iter().map(|r| r.rolling_form).collect::<Vec<f64>>(),
            ),
            Column::new(
                "quali_delta".into(),
                rows.iter().map(|r| r.quali_delta).collect::<Vec<f64>>(),
            ),
        ];

        let drivers: Vec<String> = rows.iter().map(|r| r.driver.clone()).collect();
        let teams: Vec<String> = rows.iter().map(|r| r.team.clone()).collect();
        let events: Vec<String> = rows.iter().map(|r| r.event.clone()).collect();
        let encoded = one_hot(&drivers, &vocabulary.drivers)
            .into_iter()
            .chain(one_hot(&teams, &vocabulary.teams))
            .chain(one_hot(&events, &vocabulary.events));
        for (name, values) in vocabulary.column_names().into_iter().zip(encoded) {
            columns.push(Column::new(name.as_str().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}
