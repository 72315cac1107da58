//! Chart models: charts, plots, and data series.
//!
//! A chart owns an ordered collection of plots; each plot owns its series.
//! Series ranges are plain A1-style range strings (`Sheet1!$B$2:$B$9`)
//! resolved by the spreadsheet application, not by this crate.

use serde::{Deserialize, Serialize};

use crate::merge::{Combine, Keyed, KeyedCollection};
use crate::style::{Color, Fill};

/// Chart family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    #[default]
    Column,
    Bar,
    Line,
    Pie,
    Area,
    Scatter,
}

/// Legend placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendPosition {
    #[default]
    Right,
    Left,
    Top,
    Bottom,
}

/// Chart legend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Legend {
    pub visible: bool,
    pub position: LegendPosition,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            visible: true,
            position: LegendPosition::Right,
        }
    }
}

impl Combine for Legend {
    fn combine(&mut self, reference: &Self) {
        let unset = Self::default();
        if self.visible == unset.visible {
            self.visible = reference.visible;
        }
        if self.position == unset.position {
            self.position = reference.position;
        }
    }
}

// ============================================================================
// Series
// ============================================================================

/// One data series inside a plot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Identity key; also the series name shown in the legend.
    pub name: String,
    /// Category labels range, e.g. `Data!$A$2:$A$9`. Empty for implicit.
    #[serde(default)]
    pub categories_range: String,
    /// Values range, e.g. `Data!$B$2:$B$9`.
    #[serde(default)]
    pub values_range: String,
    #[serde(default)]
    pub fill: Fill,
    #[serde(default)]
    pub line_color: Color,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories_range: String::new(),
            values_range: String::new(),
            fill: Fill::default(),
            line_color: Color::auto(),
        }
    }

    /// Set the values range
    pub fn values(mut self, range: impl Into<String>) -> Self {
        self.values_range = range.into();
        self
    }

    /// Set the categories range
    pub fn categories(mut self, range: impl Into<String>) -> Self {
        self.categories_range = range.into();
        self
    }

    /// Set the series fill
    pub fn fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }
}

impl Keyed for Series {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }

    fn key_matches(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
    }
}

impl Combine for Series {
    fn combine(&mut self, reference: &Self) {
        if self.categories_range.is_empty() {
            self.categories_range = reference.categories_range.clone();
        }
        if self.values_range.is_empty() {
            self.values_range = reference.values_range.clone();
        }
        self.fill.combine(&reference.fill);
        if self.line_color == Color::auto() {
            self.line_color = reference.line_color;
        }
    }
}

// ============================================================================
// Plot
// ============================================================================

/// A group of series rendered together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    /// Identity key.
    pub name: String,
    #[serde(default)]
    pub series: KeyedCollection<Series>,
}

impl Plot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            series: KeyedCollection::new(),
        }
    }

    /// Add a series (builder pattern)
    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }
}

impl Keyed for Plot {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }

    fn key_matches(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
    }
}

impl Combine for Plot {
    fn combine(&mut self, reference: &Self) {
        self.series.combine(&reference.series);
    }
}

// ============================================================================
// Chart
// ============================================================================

/// Default chart width in pixels.
pub const DEFAULT_CHART_WIDTH: u32 = 480;

/// Default chart height in pixels.
pub const DEFAULT_CHART_HEIGHT: u32 = 288;

/// An embedded chart anchored to a worksheet cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    /// Identity key.
    pub name: String,
    #[serde(default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub legend: Legend,
    /// Top-left anchor, A1-style, e.g. `E2`.
    #[serde(default = "default_anchor")]
    pub anchor_cell: String,
    #[serde(default = "default_chart_width")]
    pub width_px: u32,
    #[serde(default = "default_chart_height")]
    pub height_px: u32,
    #[serde(default)]
    pub plots: KeyedCollection<Plot>,
}

fn default_anchor() -> String {
    "A1".to_string()
}

fn default_chart_width() -> u32 {
    DEFAULT_CHART_WIDTH
}

fn default_chart_height() -> u32 {
    DEFAULT_CHART_HEIGHT
}

impl Chart {
    /// Create a new chart with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ChartKind::Column,
            title: String::new(),
            legend: Legend::default(),
            anchor_cell: default_anchor(),
            width_px: DEFAULT_CHART_WIDTH,
            height_px: DEFAULT_CHART_HEIGHT,
            plots: KeyedCollection::new(),
        }
    }

    /// Set the chart kind
    pub fn kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the anchor cell
    pub fn anchor(mut self, cell: impl Into<String>) -> Self {
        self.anchor_cell = cell.into();
        self
    }

    /// Add a plot (builder pattern)
    pub fn plot(mut self, plot: Plot) -> Self {
        self.plots.push(plot);
        self
    }
}

impl Keyed for Chart {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }

    fn key_matches(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
    }
}

impl Combine for Chart {
    fn combine(&mut self, reference: &Self) {
        let unset = Self::new("");
        if self.kind == unset.kind {
            self.kind = reference.kind;
        }
        if self.title.is_empty() {
            self.title = reference.title.clone();
        }
        self.legend.combine(&reference.legend);
        if self.anchor_cell == unset.anchor_cell {
            self.anchor_cell = reference.anchor_cell.clone();
        }
        if self.width_px == unset.width_px {
            self.width_px = reference.width_px;
        }
        if self.height_px == unset.height_px {
            self.height_px = reference.height_px;
        }
        self.plots.combine(&reference.plots);
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
    fn chart_combine_unions_plots_and_series() {
        let mut local = Chart::new("sales").plot(
            Plot::new("main").series(Series::new("2025").values("Data!$B$2:$B$9")),
        );
        let reference = Chart::new("sales")
            .title("Sales by Quarter")
            .plot(
                Plot::new("main")
                    .series(Series::new("2025").categories("Data!$A$2:$A$9"))
                    .series(Series::new("2024").values("Data!$C$2:$C$9")),
            );

        local.combine(&reference);

        assert_eq!(local.title, "Sales by Quarter");
        let plot = local.plots.get("main").unwrap();
        assert_eq!(plot.series.len(), 2);

        // The shared series kept its local values range and inherited the
        // categories range.
        let merged = plot.series.get("2025").unwrap();
        assert_eq!(merged.values_range, "Data!$B$2:$B$9");
        assert_eq!(merged.categories_range, "Data!$A$2:$A$9");

        let cloned = plot.series.get("2024").unwrap();
        assert_eq!(cloned, reference.plots.get("main").unwrap().series.get("2024").unwrap());
    }

    #[test]
    fn chart_keeps_customized_geometry() {
        let mut local = Chart::new("sales").anchor("H4");
        local.width_px = 640;

        let mut reference = Chart::new("sales").anchor("B2");
        reference.height_px = 400;

        local.combine(&reference);

        assert_eq!(local.anchor_cell, "H4");
        assert_eq!(local.width_px, 640);
        assert_eq!(local.height_px, 400);
    }

    #[test]
    fn legend_falls_back_by_field() {
        let mut local = Legend::default();
        let reference = Legend {
            visible: false,
            position: LegendPosition::Bottom,
        };

        local.combine(&reference);

        assert!(!local.visible);
        assert_eq!(local.position, LegendPosition::Bottom);
    }
}
