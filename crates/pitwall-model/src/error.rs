//! Error taxonomy shared by the pipeline crates.
//!
//! - [`SchemaError`]: malformed relations. Fatal, the run is aborted.
//! - [`ParseError`]: a single unreadable value. The owning record is excluded
//!   and reported; the run continues.
//! - [`ConfigError`]: unusable options or team alias tables.
//!
//! Lookup misses (unknown team names) and join misses are not errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::records::Relation;

/// Structural problems with an input relation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A required column is absent from the relation header.
    #[error("{relation} relation is missing required column '{column}'")]
    MissingColumn { relation: Relation, column: String },

    /// The season cell could not be read as an integer year.
    #[error("{relation} relation row {row}: season '{value}' is not an integer")]
    InvalidSeason {
        relation: Relation,
        row: usize,
        value: String,
    },

    /// Two rows of one relation share the same join key.
    #[error("{relation} relation has duplicate join key {key}")]
    DuplicateKey { relation: Relation, key: String },

    /// The joined relation holds two entries for one driver at one event.
    #[error("driver '{driver}' appears more than once at {season} {event}")]
    DuplicateEntry {
        season: i64,
        event: String,
        driver: String,
    },
}

/// A single value that could not be cleansed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Neither `minutes:seconds.millis` nor `seconds.millis`.
    #[error("malformed lap time '{raw}'")]
    MalformedTime { raw: String },

    /// Not a status code and not an integer.
    #[error("invalid finishing position '{raw}'")]
    InvalidPosition { raw: String },

    /// An integer position outside the classified range.
    #[error("finishing position {value} outside 1..={max}")]
    PositionOutOfRange { value: i64, max: u32 },

    /// Championship points that are not a finite number.
    #[error("invalid points value '{raw}'")]
    InvalidPoints { raw: String },
}

/// Invalid configuration or alias table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("rolling window must be at least 1 event")]
    InvalidWindow,

    /// Canonicalization would not be idempotent: `alias` maps to `canonical`,
    /// which itself maps to a different `target`.
    #[error("team alias '{alias}' maps to '{canonical}', which is itself aliased to '{target}'")]
    NonIdempotentAlias {
        alias: String,
        canonical: String,
        target: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::MissingColumn {
            relation: Relation::Race,
            column: "points".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "race relation is missing required column 'points'"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::PositionOutOfRange { value: 30, max: 25 };
        assert_eq!(err.to_string(), "finishing position 30 outside 1..=25");
    }
}
