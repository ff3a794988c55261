//! Trailing mean of race finishing positions per driver.

use std::collections::{HashMap, VecDeque};

use pitwall_model::CleanEntry;

use crate::aggregate::chronological_order;

/// Mean race position over each driver's `window` most recent prior events.
///
/// The window spans season boundaries. A driver with no prior event gets 0.
/// The returned vector is aligned with `entries`.
pub fn rolling_form(entries: &[CleanEntry], window: usize) -> Vec<f64> {
    let mut recent: HashMap<&str, VecDeque<u32>> = HashMap::new();
    let mut form = vec![0.0; entries.len()];
    for idx in chronological_order(entries) {
        let entry = &entries[idx];
        let history = recent.entry(entry.driver.as_str()).or_default();
        if !history.is_empty() {
            let sum: u32 = history.iter().sum();
            form[idx] = f64::from(sum) / history.len() as f64;
        }
        history.push_back(entry.race_position);
        while history.len() > window {
            history.pop_front();
        }
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(season: i64, ordinal: u32, driver: &str, position: u32) -> CleanEntry {
        CleanEntry {
            season,
            event: format!("Event {ordinal}"),
            event_ordinal: ordinal,
            driver: driver.to_string(),
            team: "Team".to_string(),
            race_position: position,
            points: 0.0,
            win: position == 1,
            dnf: false,
            qualifying: None,
        }
    }

    #[test]
    fn first_event_is_zero() {
        let form = rolling_form(&[race(2024, 1, "A", 4)], 5);
        assert_eq!(form, vec![0.0]);
    }

    #[test]
    fn window_excludes_current_event() {
        let entries = vec![
            race(2024, 1, "D", 3),
            race(2024, 2, "D", 1),
            race(2024, 3, "D", 26),
        ];
        assert_eq!(rolling_form(&entries, 5), vec![0.0, 3.0, 2.0]);
    }

    #[test]
    fn window_keeps_five_most_recent() {
        let entries: Vec<CleanEntry> = (1..=7).map(|n| race(2024, n, "A", n)).collect();
        let form = rolling_form(&entries, 5);
        assert_eq!(form[5], 3.0);
        assert_eq!(form[6], 4.0);
    }

    #[test]
    fn window_continues_across_seasons() {
        let entries = vec![race(2023, 1, "A", 2), race(2024, 2, "A", 8)];
        assert_eq!(rolling_form(&entries, 5), vec![0.0, 2.0]);
    }

    #[test]
    fn drivers_are_independent() {
        let entries = vec![
            race(2024, 1, "A", 1),
            race(2024, 1, "B", 20),
            race(2024, 2, "B", 10),
            race(2024, 2, "A", 3),
        ];
        assert_eq!(rolling_form(&entries, 5), vec![0.0, 0.0, 20.0, 1.0]);
    }
}
