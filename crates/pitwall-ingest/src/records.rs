//! Projection of loaded tables into typed source records.

use std::collections::BTreeMap;
use std::path::Path;

use pitwall_common::{column_strings, parse_i64};
use pitwall_model::{QualifyingRecord, RaceRecord, Relation, SchemaError};
use polars::prelude::DataFrame;
use tracing::info;

use crate::csv::{QUALIFYING_COLUMNS, RACE_COLUMNS, read_csv_file, resolve_columns};
use crate::error::Result;

/// Column values of one relation, keyed by canonical column name.
struct RelationColumns {
    relation: Relation,
    values: BTreeMap<&'static str, Vec<String>>,
    height: usize,
}

impl RelationColumns {
    fn extract(
        df: &DataFrame,
        relation: Relation,
        specs: &[crate::csv::ColumnSpec],
    ) -> Result<Self> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let resolved = resolve_columns(&headers, relation, specs)?;
        let mut values = BTreeMap::new();
        for (canonical, actual) in resolved {
            let column = column_strings(df, &actual).ok_or_else(|| SchemaError::MissingColumn {
                relation,
                column: canonical.to_string(),
            })?;
            values.insert(canonical, column);
        }
        Ok(Self {
            relation,
            values,
            height: df.height(),
        })
    }

    fn get(&self, column: &str, idx: usize) -> String {
        self.values
            .get(column)
            .and_then(|values| values.get(idx))
            .cloned()
            .unwrap_or_default()
    }

    fn season(&self, idx: usize) -> std::result::Result<i64, SchemaError> {
        let raw = self.get("season", idx);
        parse_i64(&raw).ok_or(SchemaError::InvalidSeason {
            relation: self.relation,
            row: idx + 1,
            value: raw,
        })
    }
}

/// Projects a qualifying table onto [`QualifyingRecord`]s.
pub fn qualifying_records(df: &DataFrame) -> Result<Vec<QualifyingRecord>> {
    let columns = RelationColumns::extract(df, Relation::Qualifying, &QUALIFYING_COLUMNS)?;
    let mut records = Vec::with_capacity(columns.height);
    for idx in 0..columns.height {
        records.push(QualifyingRecord {
            season: columns.season(idx)?,
            event: columns.get("event", idx),
            position: columns.get("position", idx),
            car_number: columns.get("car_number", idx),
            driver: columns.get("driver", idx),
            team: columns.get("team", idx),
            segment_times: [
                columns.get("seg1_time", idx),
                columns.get("seg2_time", idx),
                columns.get("seg3_time", idx),
            ],
            laps: columns.get("laps", idx),
        });
    }
    Ok(records)
}

/// Projects a race table onto [`RaceRecord`]s.
pub fn race_records(df: &DataFrame) -> Result<Vec<RaceRecord>> {
    let columns = RelationColumns::extract(df, Relation::Race, &RACE_COLUMNS)?;
    let mut records = Vec::with_capacity(columns.height);
    for idx in 0..columns.height {
        records.push(RaceRecord {
            season: columns.season(idx)?,
            event: columns.get("event", idx),
            position: columns.get("position", idx),
            car_number: columns.get("car_number", idx),
            driver: columns.get("driver", idx),
            team: columns.get("team", idx),
            laps: columns.get("laps", idx),
            time_or_status: columns.get("elapsed_time_or_status", idx),
            points: columns.get("points", idx),
        });
    }
    Ok(records)
}

/// Loads the qualifying relation from a CSV file.
pub fn load_qualifying(path: &Path) -> Result<Vec<QualifyingRecord>> {
    let df = read_csv_file(path)?;
    let records = qualifying_records(&df)?;
    info!(path = %path.display(), rows = records.len(), "loaded qualifying results");
    Ok(records)
}

/// Loads the race relation from a CSV file.
pub fn load_race(path: &Path) -> Result<Vec<RaceRecord>> {
    let df = read_csv_file(path)?;
    let records = race_records(&df)?;
    info!(path = %path.display(), rows = records.len(), "loaded race results");
    Ok(records)
}
