//! Error types for result table ingestion.

use std::path::PathBuf;

use pitwall_model::SchemaError;
use thiserror::Error;

/// Errors that can occur while loading a result table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {origin}: {message}")]
    CsvParse { origin: String, message: String },

    /// CSV input has no header row.
    #[error("CSV input is empty: {origin}")]
    EmptyCsv { origin: String },

    // === Schema Errors ===
    /// The table does not have the shape the collector contract requires.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pitwall_model::Relation;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/qualiResults.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /data/qualiResults.csv");
    }

    #[test]
    fn test_schema_error_is_transparent() {
        let err: IngestError = SchemaError::MissingColumn {
            relation: Relation::Qualifying,
            column: "seg1_time".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "qualifying relation is missing required column 'seg1_time'"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("season".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
