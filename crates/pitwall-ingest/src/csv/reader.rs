//! Encoding-tolerant CSV reading into Polars.

use std::borrow::Cow;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

/// Text encoding detected for an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Legacy single-byte Western-European text.
    Windows1252,
}

/// Decodes raw table bytes.
///
/// Valid UTF-8 (with or without BOM) is used as-is; anything else is read as
/// Windows-1252, which maps every byte, so decoding never fails.
pub fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, TextEncoding) {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), TextEncoding::Utf8),
        Err(_) => {
            let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text, TextEncoding::Windows1252)
        }
    }
}

/// Parses CSV bytes into a DataFrame with every column typed as a string.
///
/// `origin` names the input in errors and logs.
pub fn read_csv_bytes(bytes: &[u8], origin: &str) -> Result<DataFrame> {
    let (text, encoding) = decode_text(bytes);
    if text.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            origin: origin.to_string(),
        });
    }
    if encoding == TextEncoding::Windows1252 {
        tracing::debug!(origin, "input is not UTF-8, decoded as Windows-1252");
    }

    // Schema inference is disabled so status codes and times stay text.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;

    Ok(df)
}

/// Reads a CSV file into a DataFrame with every column typed as a string.
pub fn read_csv_file(path: &Path) -> Result<DataFrame> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    read_csv_bytes(&bytes, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;

    #[test]
    fn test_decode_utf8_with_bom() {
        let (text, encoding) = decode_text(b"\xEF\xBB\xBFdriver\nKimi R\xC3\xA4ikk\xC3\xB6nen\n");
        assert_eq!(encoding, TextEncoding::Utf8);
        assert_eq!(text, "driver\nKimi Räikkönen\n");
    }

    #[test]
    fn test_decode_windows_1252() {
        let (text, encoding) = decode_text(b"driver\nKimi R\xE4ikk\xF6nen\nSergio P\xE9rez\n");
        assert_eq!(encoding, TextEncoding::Windows1252);
        assert_eq!(text, "driver\nKimi Räikkönen\nSergio Pérez\n");
    }

    #[test]
    fn test_read_keeps_every_column_as_text() {
        let df = read_csv_bytes(
            b"Position,Driver,Points\n1,Max Verstappen,25\nNC,Logan Sargeant,0\n",
            "inline",
        )
        .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        for column in df.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
    }

    #[test]
    fn test_read_empty_input() {
        let result = read_csv_bytes(b"  \n", "inline");
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_csv_file(Path::new("/nonexistent/pitwall/race.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
