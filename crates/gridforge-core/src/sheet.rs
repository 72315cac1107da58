//! Worksheet models: columns, row content, header/footer sections.

use serde::{Deserialize, Serialize};

use crate::chart::Chart;
use crate::formula::TotalsFunction;
use crate::merge::{ApplyOptions, Combine, Keyed, KeyedCollection};
use crate::settings::PageSetup;
use crate::style::{CellStyle, Color, Font};
use crate::ModelError;

/// Default column width in character units.
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

// ============================================================================
// Header / footer
// ============================================================================

/// Which slot of the page header or footer a section fills.
///
/// Doubles as the identity key of a section inside its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HfPosition {
    Left,
    Center,
    Right,
}

/// One positioned slice of a header or footer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HfSection {
    pub position: HfPosition,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub font: Font,
}

impl HfSection {
    pub fn new(position: HfPosition, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            font: Font::default(),
        }
    }
}

impl Keyed for HfSection {
    type Key = HfPosition;

    fn key(&self) -> &HfPosition {
        &self.position
    }

    fn key_matches(&self, key: &HfPosition) -> bool {
        self.position == *key
    }
}

impl Combine for HfSection {
    fn combine(&mut self, reference: &Self) {
        if self.text.is_empty() {
            self.text = reference.text.clone();
        }
        self.font.combine(&reference.font);
    }
}

/// A page header or footer, split into left/center/right sections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderFooter {
    pub sections: KeyedCollection<HfSection>,
}

impl HeaderFooter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the section in the given slot.
    pub fn section(&self, position: HfPosition) -> Option<&HfSection> {
        self.sections.get(&position)
    }

    /// Set or replace the section in the given slot.
    pub fn set_section(&mut self, section: HfSection) {
        match self.sections.get_mut(&section.position) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    /// Whether any section carries text.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.text.is_empty())
    }
}

impl Combine for HeaderFooter {
    fn combine(&mut self, reference: &Self) {
        self.sections.combine(&reference.sections);
    }
}

// ============================================================================
// Cell content
// ============================================================================

/// A single cell value.
///
/// Serialized through a one-field record (`{"text": "Widget"}`,
/// `<cells><number>10</number></cells>`) so the same shape works for both
/// JSON and XML authoring.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CellRecord", into = "CellRecord")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A formula string without the leading `=`.
    Formula(String),
}

/// Serialization proxy for [`CellValue`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CellRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<f64>,
    #[serde(rename = "bool", skip_serializing_if = "Option::is_none")]
    boolean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formula: Option<String>,
}

impl From<CellRecord> for CellValue {
    fn from(record: CellRecord) -> Self {
        if let Some(text) = record.text {
            CellValue::Text(text)
        } else if let Some(number) = record.number {
            CellValue::Number(number)
        } else if let Some(boolean) = record.boolean {
            CellValue::Bool(boolean)
        } else if let Some(formula) = record.formula {
            CellValue::Formula(formula)
        } else {
            CellValue::Empty
        }
    }
}

impl From<CellValue> for CellRecord {
    fn from(value: CellValue) -> Self {
        let mut record = CellRecord::default();
        match value {
            CellValue::Empty => {}
            CellValue::Text(text) => record.text = Some(text),
            CellValue::Number(number) => record.number = Some(number),
            CellValue::Bool(boolean) => record.boolean = Some(boolean),
            CellValue::Formula(formula) => record.formula = Some(formula),
        }
        record
    }
}

/// One row of cell values, aligned with the sheet's column order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Row {
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text cell
    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.cells.push(CellValue::Text(value.into()));
        self
    }

    /// Append a numeric cell
    pub fn number(mut self, value: f64) -> Self {
        self.cells.push(CellValue::Number(value));
        self
    }

    /// Append a boolean cell
    pub fn boolean(mut self, value: bool) -> Self {
        self.cells.push(CellValue::Bool(value));
        self
    }

    /// Append a formula cell (no leading `=`)
    pub fn formula(mut self, value: impl Into<String>) -> Self {
        self.cells.push(CellValue::Formula(value.into()));
        self
    }

    /// Append an empty cell
    pub fn empty(mut self) -> Self {
        self.cells.push(CellValue::Empty);
        self
    }
}

// ============================================================================
// Column
// ============================================================================

/// A data column: identity, presentation, and totals behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Identity key; also written as the column header label.
    pub name: String,
    /// Width in character units.
    #[serde(default = "default_column_width")]
    pub width: f64,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub style: CellStyle,
    /// Aggregate for the totals row; `None` writes no totals cell.
    #[serde(default)]
    pub totals: TotalsFunction,
    /// Label used when `totals` is [`TotalsFunction::Text`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals_label: Option<String>,
}

fn default_column_width() -> f64 {
    DEFAULT_COLUMN_WIDTH
}

impl Default for Column {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: DEFAULT_COLUMN_WIDTH,
            hidden: false,
            style: CellStyle::default(),
            totals: TotalsFunction::None,
            totals_label: None,
        }
    }
}

impl Column {
    /// Create a new column with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the width in character units, failing fast on out-of-range values.
    pub fn set_width(&mut self, width: f64) -> Result<(), ModelError> {
        if !(0.0..=255.0).contains(&width) {
            return Err(ModelError::OutOfRange {
                field: "width",
                value: width,
                min: 0.0,
                max: 255.0,
            });
        }
        self.width = width;
        Ok(())
    }

    /// Set the width (builder pattern)
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Hide the column
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the cell style
    pub fn style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the totals-row aggregate
    pub fn totals(mut self, totals: TotalsFunction) -> Self {
        self.totals = totals;
        self
    }

    /// Set the totals-row text label (implies [`TotalsFunction::Text`])
    pub fn totals_label(mut self, label: impl Into<String>) -> Self {
        self.totals = TotalsFunction::Text;
        self.totals_label = Some(label.into());
        self
    }
}

impl Keyed for Column {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }

    fn key_matches(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
    }
}

impl Combine for Column {
    fn combine(&mut self, reference: &Self) {
        let unset = Self::default();
        if self.width == unset.width {
            self.width = reference.width;
        }
        if self.hidden == unset.hidden {
            self.hidden = reference.hidden;
        }
        self.style.combine(&reference.style);
        if self.totals == unset.totals {
            self.totals = reference.totals;
        }
        if self.totals_label.is_none() {
            self.totals_label = reference.totals_label.clone();
        }
    }
}

/// Sparse overrides for [`Column`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnOptions {
    pub width: Option<f64>,
    pub hidden: Option<bool>,
    pub totals: Option<TotalsFunction>,
    pub totals_label: Option<String>,
}

impl ColumnOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl ApplyOptions for Column {
    type Options = ColumnOptions;

    fn apply_options(&mut self, options: &ColumnOptions) {
        if options.is_default() {
            return;
        }
        if let Some(width) = options.width {
            self.width = width;
        }
        if let Some(hidden) = options.hidden {
            self.hidden = hidden;
        }
        if let Some(totals) = options.totals {
            self.totals = totals;
        }
        if let Some(label) = &options.totals_label {
            self.totals_label = Some(label.clone());
        }
    }
}

// ============================================================================
// Sheet
// ============================================================================

/// A worksheet: columns, row content, page furniture, and charts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    /// Identity key; also the worksheet tab name.
    pub name: String,
    #[serde(default)]
    pub settings: PageSetup,
    #[serde(default)]
    pub columns: KeyedCollection<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub header: HeaderFooter,
    #[serde(default)]
    pub footer: HeaderFooter,
    #[serde(default)]
    pub charts: KeyedCollection<Chart>,
    /// Apply an autofilter across the data range.
    #[serde(default)]
    pub auto_filter: bool,
    /// Freeze the header row.
    #[serde(default)]
    pub freeze_top_row: bool,
    #[serde(default)]
    pub tab_color: Color,
}

impl Sheet {
    /// Create a new sheet with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: PageSetup::default(),
            columns: KeyedCollection::new(),
            rows: Vec::new(),
            header: HeaderFooter::new(),
            footer: HeaderFooter::new(),
            charts: KeyedCollection::new(),
            auto_filter: false,
            freeze_top_row: false,
            tab_color: Color::auto(),
        }
    }

    /// Add a column (builder pattern)
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a content row (builder pattern)
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Add a chart (builder pattern)
    pub fn chart(mut self, chart: Chart) -> Self {
        self.charts.push(chart);
        self
    }

    /// Enable the autofilter
    pub fn auto_filter(mut self) -> Self {
        self.auto_filter = true;
        self
    }

    /// Freeze the header row
    pub fn freeze_top_row(mut self) -> Self {
        self.freeze_top_row = true;
        self
    }

    /// Look up a column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Mutable column lookup
    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.get_mut(name)
    }

    /// Whether any column requests a totals-row cell.
    pub fn has_totals_row(&self) -> bool {
        self.columns.iter().any(|c| c.totals != TotalsFunction::None)
    }
}

impl Keyed for Sheet {
    type Key = str;

    fn key(&self) -> &str {
        &self.name
    }

    fn key_matches(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
    }
}

impl Combine for Sheet {
    fn combine(&mut self, reference: &Self) {
        self.settings.combine(&reference.settings);
        self.columns.combine(&reference.columns);
        self.header.combine(&reference.header);
        self.footer.combine(&reference.footer);
        self.charts.combine(&reference.charts);
        let unset = Self::new("");
        if self.auto_filter == unset.auto_filter {
            self.auto_filter = reference.auto_filter;
        }
        if self.freeze_top_row == unset.freeze_top_row {
            self.freeze_top_row = reference.freeze_top_row;
        }
        if self.tab_color == unset.tab_color {
            self.tab_color = reference.tab_color;
        }
        // Content is inherited wholesale, never spliced row by row.
        if self.rows.is_empty() {
            self.rows = reference.rows.clone();
        }
    }
}

/// Sparse overrides for [`Sheet`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetOptions {
    pub auto_filter: Option<bool>,
    pub freeze_top_row: Option<bool>,
    pub tab_color: Option<Color>,
}

impl SheetOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl ApplyOptions for Sheet {
    type Options = SheetOptions;

    fn apply_options(&mut self, options: &SheetOptions) {
        if options.is_default() {
            return;
        }
        if let Some(auto_filter) = options.auto_filter {
            self.auto_filter = auto_filter;
        }
        if let Some(freeze_top_row) = options.freeze_top_row {
            self.freeze_top_row = freeze_top_row;
        }
        if let Some(tab_color) = options.tab_color {
            self.tab_color = tab_color;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BorderLine;
    use pretty_assertions::assert_eq;

    fn totals_sheet() -> Sheet {
        Sheet::new("Report")
            .column(Column::new("Item").width(30.0))
            .column(Column::new("Amount").totals(TotalsFunction::Sum))
            .row(Row::new().text("Widget").number(10.0))
            .row(Row::new().text("Gadget").number(5.5))
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let sheet = totals_sheet();
        assert!(sheet.get_column("amount").is_some());
        assert!(sheet.get_column("AMOUNT").is_some());
        assert!(sheet.get_column("missing").is_none());
    }

    #[test]
    fn sheet_combine_merges_columns_by_key_union() {
        let mut local = totals_sheet();
        let reference = Sheet::new("Report")
            .column(Column::new("amount").width(12.0).hidden())
            .column(Column::new("Status").width(14.0));

        local.combine(&reference);

        let names: Vec<&str> = local.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Item", "Amount", "Status"]);

        // "Amount" was at default width and inherited the reference width.
        let amount = local.get_column("Amount").unwrap();
        assert_eq!(amount.width, 12.0);
        assert!(amount.hidden);
        assert_eq!(amount.totals, TotalsFunction::Sum);
    }

    #[test]
    fn sheet_combine_inherits_rows_only_when_empty() {
        let mut local = Sheet::new("Report").column(Column::new("Item"));
        let reference = totals_sheet();

        local.combine(&reference);
        assert_eq!(local.rows.len(), 2);

        // A sheet with its own content keeps it.
        let mut filled = totals_sheet();
        filled.rows.truncate(1);
        filled.combine(&reference);
        assert_eq!(filled.rows.len(), 1);
    }

    #[test]
    fn header_sections_merge_by_position() {
        let mut local = HeaderFooter::new();
        local.set_section(HfSection::new(HfPosition::Left, "Quarterly Report"));

        let mut reference = HeaderFooter::new();
        reference.set_section(HfSection::new(HfPosition::Left, "Fallback"));
        reference.set_section(HfSection::new(HfPosition::Right, "Page &P"));

        local.combine(&reference);

        assert_eq!(
            local.section(HfPosition::Left).unwrap().text,
            "Quarterly Report"
        );
        assert_eq!(local.section(HfPosition::Right).unwrap().text, "Page &P");
    }

    #[test]
    fn column_width_is_range_checked() {
        let mut column = Column::new("Item");
        assert!(column.set_width(20.0).is_ok());
        assert!(column.set_width(-1.0).is_err());
        assert!(column.set_width(300.0).is_err());
        assert_eq!(column.width, 20.0);
    }

    #[test]
    fn column_options_change_exactly_the_present_fields() {
        let mut column = Column::new("Amount").width(12.0);
        let options = ColumnOptions {
            totals: Some(TotalsFunction::Average),
            ..Default::default()
        };

        column.apply_options(&options);

        assert_eq!(column.totals, TotalsFunction::Average);
        assert_eq!(column.width, 12.0);
        assert!(!column.hidden);
    }

    #[test]
    fn totals_label_builder_implies_text_function() {
        let column = Column::new("Item").totals_label("Total");
        assert_eq!(column.totals, TotalsFunction::Text);
        assert_eq!(column.totals_label.as_deref(), Some("Total"));
    }

    #[test]
    fn sheet_clone_is_structurally_independent() {
        let original = totals_sheet();
        let mut copy = original.clone();

        copy.get_column_mut("Item").unwrap().style.outline(
            BorderLine::Thin,
            Color::auto(),
        );
        copy.rows.push(Row::new().text("Extra"));

        assert!(original
            .get_column("Item")
            .unwrap()
            .style
            .borders
            .is_empty());
        assert_eq!(original.rows.len(), 2);
        assert_eq!(copy.rows.len(), 3);
    }

    #[test]
    fn has_totals_row_reflects_column_requests() {
        assert!(totals_sheet().has_totals_row());
        assert!(!Sheet::new("Plain").column(Column::new("A")).has_totals_row());
    }
}
