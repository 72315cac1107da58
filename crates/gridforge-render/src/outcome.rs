//! Save outcome reporting.
//!
//! The public save functions never propagate errors: renderer and I/O
//! failures are folded into a [`SaveOutcome`] carrying a success flag and
//! the collected error messages. Callers check `outcome.success`.

use std::fmt;
use std::path::{Path, PathBuf};

use gridforge_core::Document;
use tracing::{error, info};

use crate::archive;
use crate::excel::XlsxRenderer;

/// Aggregate result of one save operation.
#[derive(Debug, Default, Clone)]
pub struct SaveOutcome {
    /// Whether the output was fully written.
    pub success: bool,
    /// Destination path, when the save targeted a file.
    pub path: Option<PathBuf>,
    /// Number of bytes written.
    pub bytes_written: u64,
    /// Non-fatal notes collected while saving.
    pub warnings: Vec<String>,
    /// Failures; non-empty exactly when `success` is false.
    pub errors: Vec<String>,
}

impl SaveOutcome {
    /// A successful outcome for `path` with `bytes_written` bytes on disk.
    pub fn succeeded(path: &Path, bytes_written: u64) -> Self {
        Self {
            success: true,
            path: Some(path.to_path_buf()),
            bytes_written,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A failed outcome carrying one error message.
    pub fn failed(path: &Path, error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: Some(path.to_path_buf()),
            bytes_written: 0,
            warnings: Vec::new(),
            errors: vec![error.into()],
        }
    }

    /// Number of collected errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} success={} bytes={} errors={} warnings={}",
            self.success,
            self.bytes_written,
            self.error_count(),
            self.warning_count()
        )
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SAVE]"))
    }
}

/// Render `document` and write it to `path` as an `.xlsx` file.
pub fn save_xlsx(renderer: &XlsxRenderer, document: &Document, path: &Path) -> SaveOutcome {
    let bytes = match renderer.render_to_bytes(document) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "render failed");
            return SaveOutcome::failed(path, format!("render failed: {e}"));
        }
    };
    match std::fs::write(path, &bytes) {
        Ok(()) => {
            info!(path = %path.display(), bytes = bytes.len(), "saved xlsx");
            SaveOutcome::succeeded(path, bytes.len() as u64)
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "write failed");
            SaveOutcome::failed(path, format!("write failed: {e}"))
        }
    }
}

/// Render `document` and write it to `path` as a zip archive wrapping the
/// `.xlsx` payload.
pub fn save_zip(renderer: &XlsxRenderer, document: &Document, path: &Path) -> SaveOutcome {
    let bytes = match renderer.render_to_bytes(document) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "render failed");
            return SaveOutcome::failed(path, format!("render failed: {e}"));
        }
    };

    let entry_name = archive::entry_name(&document.name);
    let file = match std::fs::File::create(path) {
        Ok(file) => file,
        Err(e) => {
            error!(error = %e, path = %path.display(), "create failed");
            return SaveOutcome::failed(path, format!("create failed: {e}"));
        }
    };
    if let Err(e) = archive::wrap_in_zip(file, &entry_name, &bytes) {
        error!(error = %e, path = %path.display(), "zip failed");
        return SaveOutcome::failed(path, format!("zip failed: {e}"));
    }

    let written = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    info!(path = %path.display(), entry = %entry_name, "saved zip-wrapped xlsx");
    SaveOutcome::succeeded(path, written)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_summary_counts_errors_and_warnings() {
        let mut outcome = SaveOutcome::succeeded(Path::new("out.xlsx"), 1024);
        outcome.warnings.push("slow disk".to_string());

        assert_eq!(outcome.error_count(), 0);
        assert_eq!(outcome.warning_count(), 1);
        assert_eq!(
            outcome.to_string(),
            "[SAVE] success=true bytes=1024 errors=0 warnings=1"
        );
    }

    #[test]
    fn failed_outcome_carries_the_error() {
        let outcome = SaveOutcome::failed(Path::new("out.xlsx"), "disk full");
        assert!(!outcome.success);
        assert_eq!(outcome.errors, vec!["disk full".to_string()]);
        assert_eq!(outcome.bytes_written, 0);
    }
}
