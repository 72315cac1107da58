//! Zip wrapping for rendered workbooks.
//!
//! A zip-wrapped save produces a plain `.zip` archive with a single
//! deflated `.xlsx` entry. The workbook bytes are written verbatim; the
//! inner package is already complete.

use std::io::{Seek, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::RenderError;

/// Derive the archive entry name from a document name.
///
/// Characters that are unsafe in file names are replaced; an empty document
/// name falls back to `workbook.xlsx`.
pub fn entry_name(document_name: &str) -> String {
    let cleaned: String = document_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "workbook.xlsx".to_string()
    } else {
        format!("{trimmed}.xlsx")
    }
}

/// Write `payload` into `writer` as a one-entry deflated zip archive.
pub fn wrap_in_zip<W: Write + Seek>(
    writer: W,
    entry_name: &str,
    payload: &[u8],
) -> Result<(), RenderError> {
    let mut archive = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    archive
        .start_file(entry_name, options)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    archive.write_all(payload)?;
    archive
        .finish()
        .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
