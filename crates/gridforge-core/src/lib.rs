//! # gridforge-core
//!
//! Core document model for the gridforge spreadsheet reporting engine.
//!
//! This crate provides:
//! - Domain types: `Document`, `Sheet`, `Column`, `CellStyle`, `Chart`
//! - Cross-cutting traits: `Combine` (fallback merge), `ApplyOptions`
//!   (sparse overlay), `Keyed` + `KeyedCollection` (keyed reconciliation)
//! - Totals-row formula resolution and JSON/XML round-tripping
//!
//! ## Example
//!
//! ```rust
//! use gridforge_core::{Column, Document, Row, Sheet, TotalsFunction};
//!
//! let mut document = Document::new("Quarterly Report");
//! document.sheets.push(
//!     Sheet::new("Summary")
//!         .column(Column::new("Item").width(30.0))
//!         .column(Column::new("Amount").totals(TotalsFunction::Sum))
//!         .row(Row::new().text("Widget").number(10.0))
//!         .auto_filter(),
//! );
//!
//! assert!(document.sheet("summary").is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod chart;
pub mod formula;
pub mod merge;
pub mod settings;
pub mod sheet;
pub mod style;

pub use chart::{Chart, ChartKind, Legend, LegendPosition, Plot, Series};
pub use formula::{totals_formula, TotalsFunction};
pub use merge::{ApplyOptions, Combine, Keyed, KeyedCollection};
pub use settings::{Margins, PageOrientation, PageSetup, PageSetupOptions, PaperKind};
pub use sheet::{
    CellValue, Column, ColumnOptions, HeaderFooter, HfPosition, HfSection, Row, Sheet,
    SheetOptions, DEFAULT_COLUMN_WIDTH,
};
pub use style::{
    Alignment, AlignmentOptions, Border, BorderLine, BorderOptions, BorderPosition, CellStyle,
    Color, Fill, FillOptions, FillPattern, Font, FontOptions, HorizontalAlign, VerticalAlign,
};

// ============================================================================
// Document
// ============================================================================

/// Workbook metadata written into the output package.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentProperties {
    pub title: String,
    pub author: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl Combine for DocumentProperties {
    fn combine(&mut self, reference: &Self) {
        if self.title.is_empty() {
            self.title = reference.title.clone();
        }
        if self.author.is_empty() {
            self.author = reference.author.clone();
        }
        if self.company.is_empty() {
            self.company = reference.company.clone();
        }
        if self.created.is_none() {
            self.created = reference.created;
        }
        if self.modified.is_none() {
            self.modified = reference.modified;
        }
    }
}

/// The root of the model tree: a styled workbook definition.
///
/// A document owns its sheets exclusively; navigation runs root-down
/// through [`Document::sheet`] and the per-model lookup helpers rather
/// than through child-to-parent pointers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub properties: DocumentProperties,
    /// Workbook-wide base cell style; sheets and columns inherit from it
    /// through `Combine`.
    #[serde(default)]
    pub style: CellStyle,
    /// Workbook-wide page setup defaults.
    #[serde(default)]
    pub settings: PageSetup,
    #[serde(default)]
    pub sheets: KeyedCollection<Sheet>,
}

impl Document {
    /// Create an empty document with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: DocumentProperties::default(),
            style: CellStyle::default(),
            settings: PageSetup::default(),
            sheets: KeyedCollection::new(),
        }
    }

    /// Add a sheet (builder pattern)
    pub fn sheet_with(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Look up a sheet by name (case-insensitive)
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Mutable sheet lookup
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.get_mut(name)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to XML with a `<Document>` root element.
    pub fn to_xml(&self) -> Result<String, ModelError> {
        quick_xml::se::to_string(self).map_err(|e| ModelError::Xml(e.to_string()))
    }

    /// Deserialize from XML.
    pub fn from_xml(xml: &str) -> Result<Self, ModelError> {
        quick_xml::de::from_str(xml).map_err(|e| ModelError::Xml(e.to_string()))
    }
}

impl Combine for Document {
    fn combine(&mut self, reference: &Self) {
        if self.name.is_empty() {
            self.name = reference.name.clone();
        }
        self.properties.combine(&reference.properties);
        self.style.combine(&reference.style);
        self.settings.combine(&reference.settings);
        self.sheets.combine(&reference.sheets);
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Model construction and serialization error.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid {type_name} value: {value}")]
    InvalidEnum {
        type_name: &'static str,
        value: String,
    },

    #[error("{field} out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid color literal: {0}")]
    InvalidColor(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),
}

// ============================================================================
// Tests
// ============================================================================
