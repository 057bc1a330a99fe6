//! Reshaping of the raw rainfall file.
//!
//! Country names in the raw file contain unquoted commas
//! (`Bolivia, Plurinational State of,1990,1146`), so a record has a variable
//! number of fields of which only the last two are reliable. Every record with
//! at least three fields is rewritten as exactly three: the leading fragments
//! joined by single spaces, then year and rainfall. Shorter records are
//! dropped. The header is treated like any other record.

use crate::error::{PipelineError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Record counts from a normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Records read, header included.
    pub records_read: usize,
    pub records_written: usize,
    /// Records with fewer than three fields.
    pub records_dropped: usize,
    /// Records whose country name had to be rejoined.
    pub records_rejoined: usize,
}

/// Rewrite `input` into a strict three-column file at `output`.
///
/// The output is fully written and flushed before this returns.
pub fn normalize_rain_file(input: &Path, output: &Path) -> Result<NormalizeStats> {
    let file = File::open(input).map_err(|e| PipelineError::FileAccess {
        path: input.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut writer = WriterBuilder::new().from_path(output)?;
    let mut stats = NormalizeStats::default();

    for result in reader.records() {
        let record = result.map_err(|e| PipelineError::Parse {
            path: input.to_path_buf(),
            reason: e.to_string(),
        })?;
        stats.records_read += 1;

        let Some(fields) = reshape(&record) else {
            stats.records_dropped += 1;
            continue;
        };
        if record.len() > 3 {
            stats.records_rejoined += 1;
        }
        writer.write_record(&fields)?;
        stats.records_written += 1;
    }
    writer.flush()?;

    if stats.records_dropped > 0 {
        warn!(
            "Dropped {} rainfall record(s) with fewer than 3 fields",
            stats.records_dropped
        );
    }
    debug!(
        "Normalized {} -> {} ({} written, {} rejoined)",
        input.display(),
        output.display(),
        stats.records_written,
        stats.records_rejoined
    );
    Ok(stats)
}

/// `[country, year, rainfall]` for a record, or `None` if it is too short.
fn reshape(record: &StringRecord) -> Option<[String; 3]> {
    let n = record.len();
    if n < 3 {
        return None;
    }
    let country = record
        .iter()
        .take(n - 2)
        .collect::<Vec<_>>()
        .join(" ");
    Some([country, record[n - 2].to_string(), record[n - 1].to_string()])
}
