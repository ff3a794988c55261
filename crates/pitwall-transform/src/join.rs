//! Inner join of the qualifying and race relations.

use std::collections::{HashMap, HashSet};

use pitwall_model::{
    JoinKey, JoinStats, MergedEntry, QualifyingRecord, RaceRecord, Relation, SchemaError,
};
use tracing::debug;

/// Joined entries together with the row accounting of the join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutput {
    pub entries: Vec<MergedEntry>,
    pub stats: JoinStats,
}

/// Assigns 1-based event ordinals by first occurrence of `(season, event)`.
#[derive(Debug, Default)]
pub struct EventOrdinals {
    assigned: HashMap<(i64, String), u32>,
}

impl EventOrdinals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ordinal of the event, assigning the next one on first sight.
    pub fn ordinal(&mut self, season: i64, event: &str) -> u32 {
        let next = self.assigned.len() as u32 + 1;
        *self
            .assigned
            .entry((season, event.to_string()))
            .or_insert(next)
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

fn index_by_key<'a, T>(
    rows: &'a [T],
    relation: Relation,
    key: impl Fn(&T) -> JoinKey,
) -> Result<HashMap<JoinKey, &'a T>, SchemaError> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let row_key = key(row);
        if index.contains_key(&row_key) {
            return Err(SchemaError::DuplicateKey {
                relation,
                key: row_key.to_string(),
            });
        }
        index.insert(row_key, row);
    }
    Ok(index)
}

/// Inner-joins qualifying and race records on the full [`JoinKey`].
///
/// Output follows qualifying row order. Rows without a counterpart in the
/// other relation are dropped and only counted in [`JoinStats`].
///
/// # Errors
///
/// - [`SchemaError::DuplicateKey`] when either relation repeats a join key
/// - [`SchemaError::DuplicateEntry`] when a driver is joined twice at one
///   event (same driver under two car numbers or teams)
pub fn join_results(
    qualifying: &[QualifyingRecord],
    race: &[RaceRecord],
) -> Result<JoinOutput, SchemaError> {
    // Qualifying keys are checked even where no race row matches.
    index_by_key(qualifying, Relation::Qualifying, QualifyingRecord::key)?;
    let race_index = index_by_key(race, Relation::Race, RaceRecord::key)?;

    let mut ordinals = EventOrdinals::new();
    let mut seen_drivers: HashSet<(i64, &str, &str)> = HashSet::new();
    let mut entries = Vec::with_capacity(qualifying.len().min(race.len()));

    for quali in qualifying {
        let Some(result) = race_index.get(&quali.key()) else {
            continue;
        };
        if !seen_drivers.insert((quali.season, quali.event.as_str(), quali.driver.as_str())) {
            return Err(SchemaError::DuplicateEntry {
                season: quali.season,
                event: quali.event.clone(),
                driver: quali.driver.clone(),
            });
        }
        entries.push(MergedEntry {
            season: quali.season,
            event: quali.event.clone(),
            event_ordinal: ordinals.ordinal(quali.season, &quali.event),
            driver: quali.driver.clone(),
            team: quali.team.clone(),
            quali_position: quali.position.clone(),
            segment_times: quali.segment_times.clone(),
            quali_laps: quali.laps.clone(),
            race_position: result.position.clone(),
            race_laps: result.laps.clone(),
            time_or_status: result.time_or_status.clone(),
            points: result.points.clone(),
        });
    }

    let merged = entries.len();
    let stats = JoinStats {
        qualifying_rows: qualifying.len(),
        race_rows: race.len(),
        merged_rows: merged,
        unmatched_qualifying: qualifying.len() - merged,
        unmatched_race: race.len() - merged,
    };
    debug!(
        merged = stats.merged_rows,
        events = ordinals.len(),
        unmatched_qualifying = stats.unmatched_qualifying,
        unmatched_race = stats.unmatched_race,
        "joined result relations"
    );
    Ok(JoinOutput { entries, stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quali(season: i64, event: &str, driver: &str, car: &str, team: &str) -> QualifyingRecord {
        QualifyingRecord {
            season,
            event: event.to_string(),
            position: "1".to_string(),
            car_number: car.to_string(),
            driver: driver.to_string(),
            team: team.to_string(),
            segment_times: ["1:30.000".to_string(), String::new(), String::new()],
            laps: "6".to_string(),
        }
    }

    fn race(season: i64, event: &str, driver: &str, car: &str, team: &str) -> RaceRecord {
        RaceRecord {
            season,
            event: event.to_string(),
            position: "1".to_string(),
            car_number: car.to_string(),
            driver: driver.to_string(),
            team: team.to_string(),
            laps: "57".to_string(),
            time_or_status: "1:31:44.742".to_string(),
            points: "25".to_string(),
        }
    }

    #[test]
    fn unmatched_rows_are_dropped_and_counted() {
        let qualifying = vec![
            quali(2024, "Bahrain", "Max Verstappen", "1", "Red Bull Racing"),
            quali(2024, "Bahrain", "Oliver Bearman", "38", "Ferrari"),
        ];
        let results = vec![
            race(2024, "Bahrain", "Max Verstappen", "1", "Red Bull Racing"),
            race(2024, "Bahrain", "Carlos Sainz", "55", "Ferrari"),
            race(2024, "Saudi Arabia", "Oliver Bearman", "38", "Ferrari"),
        ];

        let output = join_results(&qualifying, &results).unwrap();

        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].driver, "Max Verstappen");
        assert_eq!(output.stats.unmatched_qualifying, 1);
        assert_eq!(output.stats.unmatched_race, 2);
        assert_eq!(output.stats.dropped(), 3);
    }

    #[test]
    fn team_mismatch_does_not_join() {
        let qualifying = vec![quali(2024, "Monaco", "Yuki Tsunoda", "22", "RB Honda RBPT")];
        let results = vec![race(2024, "Monaco", "Yuki Tsunoda", "22", "RB")];
        let output = join_results(&qualifying, &results).unwrap();
        assert!(output.entries.is_empty());
    }

    #[test]
    fn ordinals_follow_first_occurrence() {
        let qualifying = vec![
            quali(2023, "Bahrain", "A", "1", "T"),
            quali(2023, "Bahrain", "B", "2", "T"),
            quali(2023, "Jeddah", "A", "1", "T"),
            quali(2024, "Bahrain", "A", "1", "T"),
        ];
        let results = vec![
            race(2024, "Bahrain", "A", "1", "T"),
            race(2023, "Jeddah", "A", "1", "T"),
            race(2023, "Bahrain", "B", "2", "T"),
            race(2023, "Bahrain", "A", "1", "T"),
        ];
        let output = join_results(&qualifying, &results).unwrap();
        let ordinals: Vec<u32> = output.entries.iter().map(|e| e.event_ordinal).collect();
        assert_eq!(ordinals, vec![1, 1, 2, 3]);
    }

    #[test]
    fn duplicate_key_is_fatal() {
        let qualifying = vec![quali(2024, "Imola", "A", "1", "T")];
        let results = vec![
            race(2024, "Imola", "A", "1", "T"),
            race(2024, "Imola", "A", "1", "T"),
        ];
        let err = join_results(&qualifying, &results).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateKey {
                relation: Relation::Race,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_qualifying_key_is_reported_before_race() {
        let qualifying = vec![
            quali(2024, "Imola", "A", "1", "T"),
            quali(2024, "Imola", "A", "1", "T"),
        ];
        let results = vec![
            race(2024, "Imola", "A", "1", "T"),
            race(2024, "Imola", "A", "1", "T"),
        ];
        let err = join_results(&qualifying, &results).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateKey {
                relation: Relation::Qualifying,
                ..
            }
        ));
        assert!(err.to_string().starts_with("qualifying relation"));
    }

    #[test]
    fn driver_joined_twice_at_one_event_is_fatal() {
        let qualifying = vec![
            quali(2024, "Imola", "A", "1", "T"),
            quali(2024, "Imola", "A", "11", "T"),
        ];
        let results = vec![
            race(2024, "Imola", "A", "1", "T"),
            race(2024, "Imola", "A", "11", "T"),
        ];
        let err = join_results(&qualifying, &results).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateEntry {
                season: 2024,
                event: "Imola".to_string(),
                driver: "A".to_string(),
            }
        );
    }
}
