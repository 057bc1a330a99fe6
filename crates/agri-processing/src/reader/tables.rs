//! Delimited-table loading into polars DataFrames.

use super::encoding::decode;
use crate::config::TextEncoding;
use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Parsing options for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub encoding: TextEncoding,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: TextEncoding::Utf8,
        }
    }
}

/// Load a comma-separated UTF-8 file.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    read_with_options(path.as_ref(), CsvOptions::default())
}

/// Load a UTF-8 file with a custom delimiter.
pub fn read_csv_with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> Result<DataFrame> {
    read_with_options(
        path.as_ref(),
        CsvOptions {
            delimiter,
            ..CsvOptions::default()
        },
    )
}

/// Load a comma-separated file in the given text encoding.
pub fn read_csv_with_encoding(path: impl AsRef<Path>, encoding: TextEncoding) -> Result<DataFrame> {
    read_with_options(
        path.as_ref(),
        CsvOptions {
            encoding,
            ..CsvOptions::default()
        },
    )
}

/// Read, decode and parse a file.
///
/// Missing or unreadable files are [`PipelineError::FileAccess`]; anything
/// polars rejects (ragged rows, empty input) is [`PipelineError::Parse`].
/// Types are inferred from the whole file so a late non-numeric token keeps
/// its column textual instead of failing the parse.
pub fn read_with_options(path: &Path, options: CsvOptions) -> Result<DataFrame> {
    let bytes = std::fs::read(path).map_err(|e| PipelineError::FileAccess {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let text = decode(bytes, options.encoding, path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(options.delimiter)
                .with_quote_char(Some(b'"')),
        )
        .into_reader_with_file_handle(Cursor::new(text))
        .finish()
        .map_err(|e| PipelineError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    debug!(
        "Loaded {} ({} rows x {} columns)",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_semicolon_file() {
        let file = write_temp(b"Country;Year;Item;Value\nKenya;2000;Maize;12.5\nKenya;2001;Maize;13\n");
        let df = read_csv_with_delimiter(file.path(), b';').unwrap();
        assert_eq!(df.shape(), (2, 4));
        assert_eq!(df.column("Year").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let err = read_csv("/definitely/not/here.csv").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ACCESS");
    }

    #[test]
    fn test_wrong_delimiter_yields_single_column() {
        let file = write_temp(b"Country;Year\nKenya;2000\n");
        let df = read_csv(file.path()).unwrap();
        assert_eq!(df.width(), 1);
    }

    #[test]
    fn test_latin1_header_decoded() {
        let file = write_temp(b"Country,Year,avg_temp (\xB0C)\nChad,2000,27.1\n");
        let df = read_csv_with_encoding(file.path(), TextEncoding::Latin1).unwrap();
        assert!(df.column("avg_temp (°C)").is_ok());
    }

    #[test]
    fn test_latin1_bytes_as_utf8_is_parse_error() {
        let file = write_temp(b"Country,Year\nC\xF4te,2000\n");
        let err = read_csv(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_placeholder_keeps_column_textual() {
        let file = write_temp(b"Country,Year,rain\nA,2000,100\nB,2000,..\n");
        let df = read_csv(file.path()).unwrap();
        assert_eq!(df.column("rain").unwrap().dtype(), &DataType::String);
    }
}
