//! Source file readers.
//!
//! All four sources are delimited text with a header row. They differ only in
//! parsing options: the pesticide and yield files use `;`, the temperature
//! file is in a legacy encoding, and the rainfall file must first be
//! reshaped by [`normalize_rain_file`] before it can be loaded at all.

mod encoding;
mod rain;
mod tables;

pub use encoding::decode;
pub use rain::{NormalizeStats, normalize_rain_file};
pub use tables::{
    CsvOptions, read_csv, read_csv_with_delimiter, read_csv_with_encoding, read_with_options,
};
