//! Header normalization and alias resolution.

use std::collections::BTreeMap;

use pitwall_model::{Relation, SchemaError};

/// A required column and the header spellings accepted for it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

const fn column_spec(name: &'static str, aliases: &'static [&'static str]) -> ColumnSpec {
    ColumnSpec { name, aliases }
}

const EVENT: ColumnSpec = column_spec("event", &["race", "grand_prix", "gp"]);
const SEASON: ColumnSpec = column_spec("season", &["year"]);
const POSITION: ColumnSpec = column_spec("position", &["pos"]);
const CAR_NUMBER: ColumnSpec = column_spec("car_number", &["car_no", "no", "number"]);
const DRIVER: ColumnSpec = column_spec("driver", &[]);
const TEAM: ColumnSpec = column_spec("team", &["constructor"]);
const LAPS: ColumnSpec = column_spec("laps", &[]);

/// Columns of the qualifying relation, in collector order.
pub const QUALIFYING_COLUMNS: [ColumnSpec; 10] = [
    EVENT,
    SEASON,
    POSITION,
    CAR_NUMBER,
    DRIVER,
    TEAM,
    column_spec("seg1_time", &["q1"]),
    column_spec("seg2_time", &["q2"]),
    column_spec("seg3_time", &["q3"]),
    LAPS,
];

/// Columns of the race relation, in collector order.
pub const RACE_COLUMNS: [ColumnSpec; 9] = [
    EVENT,
    SEASON,
    POSITION,
    CAR_NUMBER,
    DRIVER,
    TEAM,
    LAPS,
    column_spec(
        "elapsed_time_or_status",
        &["time", "time/retired", "time_or_status", "status"],
    ),
    column_spec("points", &["pts"]),
];

/// Normalizes a raw header: BOM and surrounding whitespace removed,
/// lowercased, internal whitespace collapsed to `_`.
///
/// # Examples
///
/// ```
/// use pitwall_ingest::normalize_header;
///
/// assert_eq!(normalize_header("\u{feff}Car  Number "), "car_number");
/// assert_eq!(normalize_header("Q1"), "q1");
/// ```
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Maps each required column to the actual header that carries it.
///
/// The canonical name wins over an alias when both are present.
pub fn resolve_columns(
    headers: &[String],
    relation: Relation,
    specs: &[ColumnSpec],
) -> Result<BTreeMap<&'static str, String>, SchemaError> {
    let normalized: Vec<(String, &String)> = headers
        .iter()
        .map(|header| (normalize_header(header), header))
        .collect();
    let find = |wanted: &str| {
        normalized
            .iter()
            .find(|(name, _)| name == wanted)
            .map(|(_, original)| (*original).clone())
    };

    let mut resolved = BTreeMap::new();
    for column in specs {
        let actual = find(column.name)
            .or_else(|| column.aliases.iter().find_map(|alias| find(*alias)))
            .ok_or_else(|| SchemaError::MissingColumn {
                relation,
                column: column.name.to_string(),
            })?;
        resolved.insert(column.name, actual);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn resolves_collector_headers() {
        let headers = headers(&[
            "Race", "Year", "Position", "Car Number", "Driver", "Team", "Q1", "Q2", "Q3", "Laps",
        ]);
        let resolved =
            resolve_columns(&headers, Relation::Qualifying, &QUALIFYING_COLUMNS).unwrap();
        assert_eq!(resolved["event"], "Race");
        assert_eq!(resolved["season"], "Year");
        assert_eq!(resolved["car_number"], "Car Number");
        assert_eq!(resolved["seg3_time"], "Q3");
    }

    #[test]
    fn canonical_name_beats_alias() {
        let headers = headers(&[
            "race", "event", "season", "position", "car_number", "driver", "team", "laps",
            "time", "points",
        ]);
        let resolved = resolve_columns(&headers, Relation::Race, &RACE_COLUMNS).unwrap();
        assert_eq!(resolved["event"], "event");
        assert_eq!(resolved["elapsed_time_or_status"], "time");
    }

    #[test]
    fn missing_column_names_relation() {
        let headers = headers(&["Race", "Year", "Position", "Car Number", "Driver", "Team"]);
        let err = resolve_columns(&headers, Relation::Race, &RACE_COLUMNS).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumn {
                relation: Relation::Race,
                column: "laps".to_string(),
            }
        );
    }
}
