//! Shared utilities for pitwall crates.
//!
//! Currently the Polars column helpers used when projecting loaded tables
//! into records.

pub mod polars;

pub use polars::{column_strings, parse_i64};
