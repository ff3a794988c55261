//! Tagged classification of raw position, lap-time and status cells.
//!
//! Every raw cell is first classified into an [`Outcome`], then projected to
//! the numeric value used by the aggregates. Keeping the two steps apart means
//! a status code is recognised exactly once, whatever column it appears in.

use serde::{Deserialize, Serialize};

/// Worst real finishing position.
pub const MAX_CLASSIFIED_POSITION: u32 = 25;

/// Position assigned to every unclassified outcome. Worse than any real position.
pub const UNCLASSIFIED_POSITION: u32 = 26;

/// Duration assigned to every missing or voided lap time, in seconds.
///
/// Equal to the parse of `"99999:99.999"`.
pub const NO_TIME_SECONDS: f64 = 99_999.0 * 60.0 + 99.0 + 0.999;

/// Result of classifying a raw cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// A usable value.
    Finished(T),
    /// `RT` in a position column, `DNF` in a time column.
    Retired,
    /// `DNS`.
    NotStarted,
    /// `DQ`.
    Disqualified,
    /// `NC`.
    NotClassified,
    /// `EX`.
    Excluded,
    /// `DEL`: lap time deleted by the stewards.
    Deleted,
    /// Empty cell.
    Missing,
}

impl<T> Outcome<T> {
    pub fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished(_))
    }

    /// Did-not-finish as recorded in the race status column.
    pub fn is_dnf(&self) -> bool {
        matches!(self, Outcome::Retired | Outcome::NotStarted)
    }

    /// Projects the outcome onto a number, substituting `sentinel` for every
    /// non-finished variant.
    pub fn value_or(self, sentinel: T) -> T {
        match self {
            Outcome::Finished(value) => value,
            _ => sentinel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_slower_than_any_plausible_lap() {
        assert!(NO_TIME_SECONDS > 6_000_000.0);
        assert!((NO_TIME_SECONDS - 6_000_039.999).abs() < 1e-6);
    }

    #[test]
    fn value_or_substitutes_sentinel() {
        assert_eq!(Outcome::Finished(3).value_or(UNCLASSIFIED_POSITION), 3);
        assert_eq!(
            Outcome::<u32>::NotClassified.value_or(UNCLASSIFIED_POSITION),
            26
        );
        assert_eq!(Outcome::<u32>::Missing.value_or(0), 0);
    }

    #[test]
    fn dnf_covers_retired_and_not_started_only() {
        assert!(Outcome::<String>::Retired.is_dnf());
        assert!(Outcome::<String>::NotStarted.is_dnf());
        assert!(!Outcome::<String>::NotClassified.is_dnf());
        assert!(!Outcome::<String>::Disqualified.is_dnf());
        assert!(!Outcome::Finished("1:32:10.221".to_string()).is_dnf());
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_string(&Outcome::Finished(83.456)).unwrap();
        assert_eq!(json, r#"{"kind":"finished","value":83.456}"#);
        let json = serde_json::to_string(&Outcome::<f64>::Deleted).unwrap();
        assert_eq!(json, r#"{"kind":"deleted"}"#);
    }
}
