//! Page setup and print settings.
//!
//! The same [`PageSetup`] model is carried at two levels of the tree: the
//! document holds the workbook-wide defaults and every sheet holds its own
//! overrides. The writer resolves the effective setup for a sheet by
//! combining the sheet's setup with the document's (sheet-local values win,
//! unset fields fall back).

use serde::{Deserialize, Serialize};

use crate::merge::{ApplyOptions, Combine};
use crate::ModelError;

/// Page orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

/// Paper size selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaperKind {
    /// Printer default.
    #[default]
    Default,
    Letter,
    Legal,
    A3,
    A4,
    A5,
}

impl PaperKind {
    /// The OpenXML paper size code.
    pub fn code(self) -> u8 {
        match self {
            PaperKind::Default => 0,
            PaperKind::Letter => 1,
            PaperKind::Legal => 5,
            PaperKind::A3 => 8,
            PaperKind::A4 => 9,
            PaperKind::A5 => 11,
        }
    }
}

/// Print margins in inches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub header: f64,
    pub footer: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 0.7,
            right: 0.7,
            top: 0.75,
            bottom: 0.75,
            header: 0.3,
            footer: 0.3,
        }
    }
}

impl Combine for Margins {
    fn combine(&mut self, reference: &Self) {
        let unset = Self::default();
        if self.left == unset.left {
            self.left = reference.left;
        }
        if self.right == unset.right {
            self.right = reference.right;
        }
        if self.top == unset.top {
            self.top = reference.top;
        }
        if self.bottom == unset.bottom {
            self.bottom = reference.bottom;
        }
        if self.header == unset.header {
            self.header = reference.header;
        }
        if self.footer == unset.footer {
            self.footer = reference.footer;
        }
    }
}

/// Page setup for printing and on-screen presentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSetup {
    pub orientation: PageOrientation,
    pub paper: PaperKind,
    pub margins: Margins,
    /// Pages wide to fit the printout to; 0 disables fitting.
    pub fit_to_width: u16,
    /// Pages tall to fit the printout to; 0 disables fitting.
    pub fit_to_height: u16,
    /// Print gridlines.
    pub gridlines: bool,
    /// View zoom percentage, 10..=400.
    pub zoom: u16,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            orientation: PageOrientation::Portrait,
            paper: PaperKind::Default,
            margins: Margins::default(),
            fit_to_width: 0,
            fit_to_height: 0,
            gridlines: false,
            zoom: 100,
        }
    }
}

impl PageSetup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zoom percentage, failing fast on out-of-range values.
    pub fn set_zoom(&mut self, zoom: u16) -> Result<(), ModelError> {
        if !(10..=400).contains(&zoom) {
            return Err(ModelError::OutOfRange {
                field: "zoom",
                value: f64::from(zoom),
                min: 10.0,
                max: 400.0,
            });
        }
        self.zoom = zoom;
        Ok(())
    }
}

impl Combine for PageSetup {
    fn combine(&mut self, reference: &Self) {
        let unset = Self::default();
        if self.orientation == unset.orientation {
            self.orientation = reference.orientation;
        }
        if self.paper == unset.paper {
            self.paper = reference.paper;
        }
        self.margins.combine(&reference.margins);
        if self.fit_to_width == unset.fit_to_width {
            self.fit_to_width = reference.fit_to_width;
        }
        if self.fit_to_height == unset.fit_to_height {
            self.fit_to_height = reference.fit_to_height;
        }
        if self.gridlines == unset.gridlines {
            self.gridlines = reference.gridlines;
        }
        if self.zoom == unset.zoom {
            self.zoom = reference.zoom;
        }
    }
}

/// Sparse overrides for [`PageSetup`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSetupOptions {
    pub orientation: Option<PageOrientation>,
    pub paper: Option<PaperKind>,
    pub fit_to_width: Option<u16>,
    pub fit_to_height: Option<u16>,
    pub gridlines: Option<bool>,
    pub zoom: Option<u16>,
}

impl PageSetupOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl ApplyOptions for PageSetup {
    type Options = PageSetupOptions;

    fn apply_options(&mut self, options: &PageSetupOptions) {
        if options.is_default() {
            return;
        }
        if let Some(orientation) = options.orientation {
            self.orientation = orientation;
        }
        if let Some(paper) = options.paper {
            self.paper = paper;
        }
        if let Some(fit_to_width) = options.fit_to_width {
            self.fit_to_width = fit_to_width;
        }
        if let Some(fit_to_height) = options.fit_to_height {
            self.fit_to_height = fit_to_height;
        }
        if let Some(gridlines) = options.gridlines {
            self.gridlines = gridlines;
        }
        if let Some(zoom) = options.zoom {
            self.zoom = zoom;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sheet_setup_falls_back_to_document_setup() {
        let mut sheet = PageSetup::new();
        sheet.orientation = PageOrientation::Landscape;

        let mut document = PageSetup::new();
        document.paper = PaperKind::A4;
        document.gridlines = true;
        document.orientation = PageOrientation::Portrait;

        sheet.combine(&document);

        assert_eq!(sheet.orientation, PageOrientation::Landscape);
        assert_eq!(sheet.paper, PaperKind::A4);
        assert!(sheet.gridlines);
    }

    #[test]
    fn margins_fall_back_per_field() {
        let mut sheet = PageSetup::new();
        sheet.margins.left = 1.5;

        let mut document = PageSetup::new();
        document.margins.top = 1.0;

        sheet.combine(&document);

        assert_eq!(sheet.margins.left, 1.5);
        assert_eq!(sheet.margins.top, 1.0);
        assert_eq!(sheet.margins.right, 0.7);
    }

    #[test]
    fn zoom_is_range_checked() {
        let mut setup = PageSetup::new();
        assert!(setup.set_zoom(150).is_ok());
        assert!(setup.set_zoom(5).is_err());
        assert!(setup.set_zoom(401).is_err());
        assert_eq!(setup.zoom, 150);
    }

    #[test]
    fn paper_codes_match_openxml() {
        assert_eq!(PaperKind::Default.code(), 0);
        assert_eq!(PaperKind::Letter.code(), 1);
        assert_eq!(PaperKind::A4.code(), 9);
    }

    #[test]
    fn options_overlay_page_setup() {
        let mut setup = PageSetup::new();
        let options = PageSetupOptions {
            orientation: Some(PageOrientation::Landscape),
            zoom: Some(80),
            ..Default::default()
        };

        setup.apply_options(&options);

        assert_eq!(setup.orientation, PageOrientation::Landscape);
        assert_eq!(setup.zoom, 80);
        assert_eq!(setup.paper, PaperKind::Default);
    }
}
