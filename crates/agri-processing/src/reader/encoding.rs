//! Byte-to-text decoding for source files.

use crate::config::TextEncoding;
use crate::error::{PipelineError, Result};
use std::path::Path;

/// Decode raw file bytes; `path` is only used for error messages.
///
/// Latin-1 never fails. A UTF-8 source with a byte order mark has it removed.
pub fn decode(bytes: Vec<u8>, encoding: TextEncoding, path: &Path) -> Result<String> {
    match encoding {
        TextEncoding::Utf8 => {
            let mut text = String::from_utf8(bytes).map_err(|e| PipelineError::Parse {
                path: path.to_path_buf(),
                reason: format!(
                    "invalid UTF-8 at byte {} (try a different encoding)",
                    e.utf8_error().valid_up_to()
                ),
            })?;
            if text.starts_with('\u{feff}') {
                text.drain(..'\u{feff}'.len_utf8());
            }
            Ok(text)
        }
        TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
    }
}
