//! # gridforge-render
//!
//! Writer backend for gridforge documents.
//!
//! This crate applies a [`gridforge_core::Document`] to an OpenXML
//! spreadsheet package via `rust_xlsxwriter` and produces output bytes,
//! files, or zip-wrapped files. The XLSX binary/XML layout itself is
//! entirely delegated to the wrapped library.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gridforge_core::Document;
//! use gridforge_render::{save_xlsx, XlsxRenderer};
//!
//! let document = Document::from_json(&std::fs::read_to_string("report.json")?)?;
//! let renderer = XlsxRenderer::new();
//!
//! let outcome = save_xlsx(&renderer, &document, "report.xlsx".as_ref());
//! if !outcome.success {
//!     eprintln!("save failed: {:?}", outcome.errors);
//! }
//! ```

use thiserror::Error;

pub mod archive;
pub mod excel;
pub mod outcome;
pub mod session;

pub use archive::wrap_in_zip;
pub use excel::XlsxRenderer;
pub use outcome::{save_xlsx, save_zip, SaveOutcome};
pub use session::{PendingOp, SessionRegistry};

/// Rendering error.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
