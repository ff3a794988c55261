//! Season running totals, exclusive of the current event.
//!
//! Both aggregates are folds over entries in `(season, event_ordinal)` order.
//! Each event's own contribution is summed first, then the fold reads the
//! season total accumulated so far before adding that contribution. Entries
//! of the same group at the same event therefore all see the same prior
//! total.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::AddAssign;

use pitwall_model::CleanEntry;

/// Row indices in chronological order. Ties keep input order.
pub(crate) fn chronological_order(entries: &[CleanEntry]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by_key(|&idx| (entries[idx].season, entries[idx].event_ordinal));
    order
}

/// Running totals per `(season, group)` key.
#[derive(Debug, Clone)]
pub struct SeasonAccumulator<K, V> {
    totals: HashMap<(i64, K), V>,
}

impl<K, V> Default for SeasonAccumulator<K, V> {
    fn default() -> Self {
        Self {
            totals: HashMap::new(),
        }
    }
}

impl<K, V> SeasonAccumulator<K, V>
where
    K: Eq + Hash + Clone,
    V: Copy + Default + AddAssign,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Total so far for `group` in `season`, zero when nothing was added.
    pub fn total(&self, season: i64, group: &K) -> V {
        self.totals
            .get(&(season, group.clone()))
            .copied()
            .unwrap_or_default()
    }

    pub fn add(&mut self, season: i64, group: K, amount: V) {
        *self.totals.entry((season, group)).or_default() += amount;
    }
}

/// Season total of `amount` per group, as it stood before each entry's event.
///
/// The returned vector is aligned with `entries`.
pub fn totals_before_event<K, V>(
    entries: &[CleanEntry],
    group: impl Fn(&CleanEntry) -> K,
    amount: impl Fn(&CleanEntry) -> V,
) -> Vec<V>
where
    K: Eq + Hash + Clone,
    V: Copy + Default + AddAssign,
{
    let order = chronological_order(entries);

    let mut event_totals: HashMap<(i64, u32, K), V> = HashMap::new();
    for &idx in &order {
        let entry = &entries[idx];
        let key = (entry.season, entry.event_ordinal, group(entry));
        *event_totals.entry(key).or_default() += amount(entry);
    }

    let mut season = SeasonAccumulator::new();
    let mut prior: HashMap<(i64, u32, K), V> = HashMap::new();
    let mut result = vec![V::default(); entries.len()];
    for &idx in &order {
        let entry = &entries[idx];
        let key = (entry.season, entry.event_ordinal, group(entry));
        let value = match prior.get(&key) {
            Some(value) => *value,
            None => {
                let before = season.total(entry.season, &key.2);
                let contribution = event_totals.get(&key).copied().unwrap_or_default();
                season.add(entry.season, key.2.clone(), contribution);
                prior.insert(key, before);
                before
            }
        };
        result[idx] = value;
    }
    result
}

/// Prior-event season aggregates, aligned with the input entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonAggregates {
    /// DNFs recorded by the entry's team earlier in the season.
    pub team_season_dnf: Vec<u32>,
    /// Points scored by the entry's driver earlier in the season.
    pub season_points: Vec<f64>,
}

/// Team DNF count per `(season, team)` before each entry's event.
///
/// Teams are grouped by the name as recorded in the source.
pub fn team_season_dnfs(entries: &[CleanEntry]) -> Vec<u32> {
    totals_before_event(entries, |entry| entry.team.clone(), |entry| u32::from(entry.dnf))
}

/// Driver points per `(season, driver)` before each entry's event.
pub fn driver_season_points(entries: &[CleanEntry]) -> Vec<f64> {
    totals_before_event(entries, |entry| entry.driver.clone(), |entry| entry.points)
}

pub fn season_aggregates(entries: &[CleanEntry]) -> SeasonAggregates {
    SeasonAggregates {
        team_season_dnf: team_season_dnfs(entries),
        season_points: driver_season_points(entries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        season: i64,
        ordinal: u32,
        driver: &str,
        team: &str,
        points: f64,
        dnf: bool,
    ) -> CleanEntry {
        CleanEntry {
            season,
            event: format!("Event {ordinal}"),
            event_ordinal: ordinal,
            driver: driver.to_string(),
            team: team.to_string(),
            race_position: if dnf { 26 } else { 10 },
            points,
            win: false,
            dnf,
            qualifying: None,
        }
    }

    #[test]
    fn team_dnf_excludes_current_event() {
        let entries = vec![
            entry(2024, 1, "A", "Team X", 0.0, true),
            entry(2024, 2, "A", "Team X", 0.0, false),
        ];
        assert_eq!(team_season_dnfs(&entries), vec![0, 1]);
    }

    #[test]
    fn teammates_share_prior_total() {
        let entries = vec![
            entry(2024, 1, "A", "Team X", 0.0, true),
            entry(2024, 1, "B", "Team X", 0.0, true),
            entry(2024, 2, "A", "Team X", 0.0, false),
            entry(2024, 2, "B", "Team X", 0.0, true),
            entry(2024, 3, "B", "Team X", 0.0, false),
        ];
        assert_eq!(team_season_dnfs(&entries), vec![0, 0, 2, 2, 3]);
    }

    #[test]
    fn totals_reset_each_season() {
        let entries = vec![
            entry(2023, 1, "A", "T", 25.0, false),
            entry(2023, 2, "A", "T", 18.0, true),
            entry(2024, 3, "A", "T", 12.5, false),
            entry(2024, 4, "A", "T", 1.0, false),
        ];
        let aggregates = season_aggregates(&entries);
        assert_eq!(aggregates.season_points, vec![0.0, 25.0, 0.0, 12.5]);
        assert_eq!(aggregates.team_season_dnf, vec![0, 0, 0, 0]);
    }

    #[test]
    fn result_follows_input_order() {
        let entries = vec![
            entry(2024, 3, "A", "T", 10.0, false),
            entry(2024, 1, "A", "T", 25.0, false),
            entry(2024, 2, "A", "T", 18.0, false),
        ];
        assert_eq!(driver_season_points(&entries), vec![43.0, 0.0, 25.0]);
    }

    #[test]
    fn accumulator_defaults_to_zero() {
        let mut acc: SeasonAccumulator<String, u32> = SeasonAccumulator::new();
        assert_eq!(acc.total(2024, &"T".to_string()), 0);
        acc.add(2024, "T".to_string(), 2);
        assert_eq!(acc.total(2024, &"T".to_string()), 2);
        assert_eq!(acc.total(2023, &"T".to_string()), 0);
    }
}
