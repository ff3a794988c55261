//! CSV reading utilities.

mod header;
mod reader;

pub use header::{
    ColumnSpec, QUALIFYING_COLUMNS, RACE_COLUMNS, normalize_header, resolve_columns,
};
pub use reader::{TextEncoding, decode_text, read_csv_bytes, read_csv_file};
