//! Result table ingestion.
//!
//! Loads the collector's qualifying and race tables into typed records:
//!
//! - **Encoding**: UTF-8 input is used as-is, anything else is decoded as
//!   Windows-1252 so legacy driver names survive
//! - **CSV Loading**: Polars reader with every column kept as text
//! - **Schema**: header aliases resolved to canonical column names, required
//!   columns checked, seasons parsed
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pitwall_ingest::{load_qualifying, load_race};
//!
//! let qualifying = load_qualifying(Path::new("data/qualiResults.csv"))?;
//! let race = load_race(Path::new("data/raceResults.csv"))?;
//! ```

mod csv;
mod error;
mod records;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    ColumnSpec, QUALIFYING_COLUMNS, RACE_COLUMNS, TextEncoding, decode_text, normalize_header,
    read_csv_bytes, read_csv_file, resolve_columns,
};

// === Records ===
pub use records::{load_qualifying, load_race, qualifying_records, race_records};
