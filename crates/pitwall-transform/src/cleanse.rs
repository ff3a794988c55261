//! Status and lap-time cleansing.
//!
//! Raw cells are classified into an [`Outcome`] first and projected onto
//! numbers second. Position codes become [`UNCLASSIFIED_POSITION`]; missing
//! and voided lap times become [`NO_TIME_SECONDS`].
//!
//! A value that cannot be classified excludes its record from the output. The
//! problem is logged and returned as a [`ParseIssue`] so the run can continue.

use pitwall_model::{
    CleanEntry, MAX_CLASSIFIED_POSITION, MergedEntry, NO_TIME_SECONDS, Outcome, ParseError,
    ParseIssue, QualifyingResult, UNCLASSIFIED_POSITION,
};
use tracing::warn;

/// Parses `minutes:seconds.millis` or `seconds.millis` into seconds.
///
/// Milliseconds are read as an integer and divided by 1000.
///
/// # Errors
///
/// [`ParseError::MalformedTime`] for anything else, including empty input,
/// signs, exponents and more than one `:`.
pub fn parse_lap_time(raw: &str) -> Result<f64, ParseError> {
    let malformed = || ParseError::MalformedTime {
        raw: raw.to_string(),
    };
    let tokens: Vec<&str> = raw.trim().split(':').collect();
    let (minutes, rest) = match tokens.as_slice() {
        [rest] => (0, *rest),
        [minutes, rest] => (digits(minutes).ok_or_else(malformed)?, *rest),
        _ => return Err(malformed()),
    };
    let (seconds, millis) = rest.split_once('.').ok_or_else(malformed)?;
    let seconds = digits(seconds).ok_or_else(malformed)?;
    let millis = digits(millis).ok_or_else(malformed)?;
    Ok(minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

fn digits(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Classifies a qualifying or race position cell.
pub fn classify_position(raw: &str) -> Result<Outcome<u32>, ParseError> {
    let value = raw.trim();
    let outcome = match value.to_ascii_uppercase().as_str() {
        "NC" => Outcome::NotClassified,
        "DQ" => Outcome::Disqualified,
        "RT" => Outcome::Retired,
        "EX" => Outcome::Excluded,
        _ => {
            let position: i64 = value.parse().map_err(|_| ParseError::InvalidPosition {
                raw: raw.to_string(),
            })?;
            if !(1..=i64::from(MAX_CLASSIFIED_POSITION)).contains(&position) {
                return Err(ParseError::PositionOutOfRange {
                    value: position,
                    max: MAX_CLASSIFIED_POSITION,
                });
            }
            Outcome::Finished(position as u32)
        }
    };
    Ok(outcome)
}

/// Classifies a qualifying segment cell.
pub fn classify_lap_time(raw: &str) -> Result<Outcome<f64>, ParseError> {
    let value = raw.trim();
    let outcome = match value.to_ascii_uppercase().as_str() {
        "" => Outcome::Missing,
        "DNF" => Outcome::Retired,
        "DNS" => Outcome::NotStarted,
        "DEL" => Outcome::Deleted,
        _ => Outcome::Finished(parse_lap_time(value)?),
    };
    Ok(outcome)
}

/// Classifies the race elapsed-time-or-status cell.
///
/// Anything other than a status code is the winner's time or a gap and is
/// kept verbatim.
pub fn classify_race_status(raw: &str) -> Outcome<String> {
    let value = raw.trim();
    match value.to_ascii_uppercase().as_str() {
        "" => Outcome::Missing,
        "DNF" => Outcome::Retired,
        "DNS" => Outcome::NotStarted,
        _ => Outcome::Finished(value.to_string()),
    }
}

pub fn position_value(outcome: Outcome<u32>) -> u32 {
    outcome.value_or(UNCLASSIFIED_POSITION)
}

pub fn duration_value(outcome: Outcome<f64>) -> f64 {
    outcome.value_or(NO_TIME_SECONDS)
}

/// Fills an empty segment from the one before it: Q2 from Q1, then Q3 from Q2.
pub fn backfill_segments(raw: &[String; 3]) -> [String; 3] {
    let mut filled = raw.clone();
    for idx in 1..filled.len() {
        if filled[idx].trim().is_empty() {
            filled[idx] = filled[idx - 1].clone();
        }
    }
    filled
}

/// Parses a points cell. Empty counts as zero.
pub fn parse_points(raw: &str) -> Result<f64, ParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|points| points.is_finite())
        .ok_or_else(|| ParseError::InvalidPoints {
            raw: raw.to_string(),
        })
}

/// The cell that stopped an entry from being cleansed.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub raw: String,
    pub error: ParseError,
}

fn field<T>(
    name: &'static str,
    raw: &str,
    result: Result<T, ParseError>,
) -> Result<T, FieldError> {
    result.map_err(|error| FieldError {
        field: name,
        raw: raw.to_string(),
        error,
    })
}

const SEGMENT_FIELDS: [&str; 3] = ["seg1_time", "seg2_time", "seg3_time"];

/// Cleanses the race cells of one joined entry. `qualifying` is left empty.
pub fn cleanse_race(entry: &MergedEntry) -> Result<CleanEntry, FieldError> {
    let race_position = position_value(field(
        "position_race",
        &entry.race_position,
        classify_position(&entry.race_position),
    )?);
    let points = field("points", &entry.points, parse_points(&entry.points))?;

    Ok(CleanEntry {
        season: entry.season,
        event: entry.event.clone(),
        event_ordinal: entry.event_ordinal,
        driver: entry.driver.clone(),
        team: entry.team.clone(),
        race_position,
        points,
        win: race_position == 1,
        dnf: classify_race_status(&entry.time_or_status).is_dnf(),
        qualifying: None,
    })
}

/// Cleanses the qualifying position and the three segment times.
pub fn cleanse_qualifying(entry: &MergedEntry) -> Result<QualifyingResult, FieldError> {
    let position = position_value(field(
        "position_quali",
        &entry.quali_position,
        classify_position(&entry.quali_position),
    )?);

    let segments = backfill_segments(&entry.segment_times);
    let mut segment_seconds = [NO_TIME_SECONDS; 3];
    for (idx, raw) in segments.iter().enumerate() {
        segment_seconds[idx] =
            duration_value(field(SEGMENT_FIELDS[idx], raw, classify_lap_time(raw))?);
    }

    Ok(QualifyingResult {
        position,
        segment_seconds,
    })
}

/// Cleanses one joined entry.
///
/// # Errors
///
/// Only race cells fail the entry. An unreadable qualifying cell leaves
/// [`CleanEntry::qualifying`] empty.
pub fn cleanse_entry(entry: &MergedEntry) -> Result<CleanEntry, FieldError> {
    let mut clean = cleanse_race(entry)?;
    clean.qualifying = cleanse_qualifying(entry).ok();
    Ok(clean)
}

/// Cleansed entries plus the records excluded on the way.
///
/// `entries` holds every entry whose race cells were readable, including
/// those without a qualifying result. Each excluded record has one issue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanseOutput {
    pub entries: Vec<CleanEntry>,
    pub issues: Vec<ParseIssue>,
}

impl CleanseOutput {
    /// Entries that will get a feature row.
    pub fn output_rows(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.qualifying.is_some())
            .count()
    }
}

fn parse_issue(entry: &MergedEntry, err: FieldError) -> ParseIssue {
    ParseIssue {
        season: entry.season,
        event: entry.event.clone(),
        driver: entry.driver.clone(),
        field: err.field.to_string(),
        raw: err.raw,
        message: err.error.to_string(),
    }
}

/// Cleanses every joined entry.
///
/// An unreadable race cell removes the entry from every later stage. An
/// unreadable qualifying cell only removes its feature row; the entry's DNF,
/// points and race position still count for the running totals of others.
pub fn cleanse_entries(entries: &[MergedEntry]) -> CleanseOutput {
    let mut output = CleanseOutput {
        entries: Vec::with_capacity(entries.len()),
        issues: Vec::new(),
    };
    for entry in entries {
        let mut clean = match cleanse_race(entry) {
            Ok(clean) => clean,
            Err(err) => {
                warn!(
                    season = entry.season,
                    event = %entry.event,
                    driver = %entry.driver,
                    field = err.field,
                    raw = %err.raw,
                    error = %err.error,
                    "excluding record with unparseable race value"
                );
                output.issues.push(parse_issue(entry, err));
                continue;
            }
        };
        match cleanse_qualifying(entry) {
            Ok(qualifying) => clean.qualifying = Some(qualifying),
            Err(err) => {
                warn!(
                    season = entry.season,
                    event = %entry.event,
                    driver = %entry.driver,
                    field = err.field,
                    raw = %err.raw,
                    error = %err.error,
                    "excluding feature row with unparseable qualifying value"
                );
                output.issues.push(parse_issue(entry, err));
            }
        }
        output.entries.push(clean);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    fn merged(quali_position: &str, race_position: &str, segments: [&str; 3]) -> MergedEntry {
        MergedEntry {
            season: 2022,
            event: "Monaco".to_string(),
            event_ordinal: 7,
            driver: "Sergio Perez".to_string(),
            team: "Red Bull Racing RBPT".to_string(),
            quali_position: quali_position.to_string(),
            segment_times: segments.map(str::to_string),
            quali_laps: "18".to_string(),
            race_position: race_position.to_string(),
            race_laps: "64".to_string(),
            time_or_status: "1:56:30.265".to_string(),
            points: "25".to_string(),
        }
    }

    #[test]
    fn parses_both_time_forms() {
        assert!(close(parse_lap_time("1:23.456").unwrap(), 83.456));
        assert!(close(parse_lap_time("45.678").unwrap(), 45.678));
        assert!(close(parse_lap_time("0:59.001").unwrap(), 59.001));
    }

    #[test]
    fn sentinel_string_parses_to_sentinel() {
        assert_eq!(parse_lap_time("99999:99.999").unwrap(), NO_TIME_SECONDS);
    }

    #[test]
    fn rejects_malformed_times() {
        let cases = [
            "", "1:2:3.4", "abc", "1:23", "1:23.4x", "-1:23.456", "1e2.0", ":12.3", "12.",
        ];
        for raw in cases {
            assert!(
                matches!(parse_lap_time(raw), Err(ParseError::MalformedTime { .. })),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn position_codes_become_unclassified() {
        for code in ["NC", "DQ", "RT", "EX"] {
            let outcome = classify_position(code).unwrap();
            assert!(!outcome.is_finished());
            assert_eq!(position_value(outcome), UNCLASSIFIED_POSITION);
        }
        assert_eq!(classify_position(" 7 ").unwrap(), Outcome::Finished(7));
    }

    #[test]
    fn position_range_is_enforced() {
        assert_eq!(
            classify_position("26"),
            Err(ParseError::PositionOutOfRange { value: 26, max: 25 })
        );
        assert_eq!(
            classify_position("0"),
            Err(ParseError::PositionOutOfRange { value: 0, max: 25 })
        );
        assert!(matches!(
            classify_position("P3"),
            Err(ParseError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn lap_time_codes_become_no_time() {
        for code in ["DNF", "DNS", "DEL", ""] {
            assert_eq!(duration_value(classify_lap_time(code).unwrap()), NO_TIME_SECONDS);
        }
    }

    #[test]
    fn race_status_codes() {
        assert!(classify_race_status("DNF").is_dnf());
        assert!(classify_race_status("DNS").is_dnf());
        assert!(!classify_race_status("+5.123s").is_dnf());
        assert!(!classify_race_status("").is_dnf());
    }

    #[test]
    fn backfill_runs_before_sentinels() {
        let filled = backfill_segments(&[
            "1:30.000".to_string(),
            String::new(),
            String::new(),
        ]);
        assert_eq!(filled, ["1:30.000", "1:30.000", "1:30.000"].map(str::to_string));

        let filled = backfill_segments(&["DNS".to_string(), String::new(), String::new()]);
        assert_eq!(filled, ["DNS", "DNS", "DNS"].map(str::to_string));
    }

    #[test]
    fn points_accept_halves_and_empty() {
        assert_eq!(parse_points("12.5").unwrap(), 12.5);
        assert_eq!(parse_points("").unwrap(), 0.0);
        assert!(matches!(parse_points("NaN"), Err(ParseError::InvalidPoints { .. })));
        assert!(matches!(parse_points("ten"), Err(ParseError::InvalidPoints { .. })));
    }

    #[test]
    fn entry_derives_flags() {
        let clean = cleanse_entry(&merged("1", "1", ["1:12.001", "1:11.629", ""])).unwrap();
        assert!(clean.win);
        assert!(!clean.dnf);
        let qualifying = clean.qualifying.unwrap();
        assert_eq!(qualifying.position, 1);
        assert!(close(qualifying.segment_seconds[2], 71.629));
        assert_eq!(clean.points, 25.0);
    }

    #[test]
    fn not_classified_is_not_a_dnf() {
        let mut entry = merged("5", "NC", ["1:12.001", "", ""]);
        entry.time_or_status = "+3 Laps".to_string();
        let clean = cleanse_entry(&entry).unwrap();
        assert_eq!(clean.race_position, 26);
        assert!(!clean.dnf);
        assert!(!clean.win);
    }

    #[test]
    fn malformed_lap_time_keeps_race_fields() {
        let entries = vec![
            merged("1", "1", ["1:12.001", "", ""]),
            merged("2", "2", ["1:1x.2", "", ""]),
        ];
        let output = cleanse_entries(&entries);
        assert_eq!(output.entries.len(), 2);
        assert_eq!(output.output_rows(), 1);
        assert!(output.entries[1].qualifying.is_none());
        assert_eq!(output.entries[1].race_position, 2);
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.issues[0].field, "seg1_time");
        assert_eq!(output.issues[0].raw, "1:1x.2");
        assert_eq!(output.issues[0].message, "malformed lap time '1:1x.2'");
    }

    #[test]
    fn malformed_race_cell_drops_entry() {
        let mut bad_points = merged("3", "3", ["1:12.001", "", ""]);
        bad_points.points = "ten".to_string();
        let output = cleanse_entries(&[merged("1", "P1", ["1:12.001", "", ""]), bad_points]);
        assert!(output.entries.is_empty());
        let fields: Vec<&str> = output.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["position_race", "points"]);
    }

    #[test]
    fn milliseconds_are_an_integer_over_one_thousand() {
        assert!(close(parse_lap_time("45.6").unwrap(), 45.006));
        assert!(close(parse_lap_time("1:05.060").unwrap(), 65.06));
    }
}
