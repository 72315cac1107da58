//! Cell styling models: colors, fonts, fills, borders, alignment.
//!
//! All styling models follow the same contract: `Default` yields the
//! "unset" state, [`Combine`](crate::Combine) fills unset fields from a
//! reference style, and the `*Options` structs overlay explicit overrides.

use serde::{Deserialize, Serialize};

use crate::merge::{ApplyOptions, Combine, Keyed, KeyedCollection};
use crate::ModelError;

// ============================================================================
// Color
// ============================================================================

/// An RGB color, or "automatic" when unset.
///
/// Automatic is the default value for every color field in the tree; a
/// writer backend leaves automatic colors to the spreadsheet application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    rgb: Option<u32>,
}

impl Color {
    /// The automatic (unset) color.
    pub const fn auto() -> Self {
        Self { rgb: None }
    }

    /// Construct from a packed `0xRRGGBB` value.
    pub fn from_rgb(value: u32) -> Result<Self, ModelError> {
        if value > 0xFF_FF_FF {
            return Err(ModelError::InvalidColor(format!("{value:#x}")));
        }
        Ok(Self { rgb: Some(value) })
    }

    /// Parse a `#RRGGBB` literal.
    pub fn from_hex(literal: &str) -> Result<Self, ModelError> {
        let digits = literal
            .strip_prefix('#')
            .ok_or_else(|| ModelError::InvalidColor(literal.to_string()))?;
        if digits.len() != 6 {
            return Err(ModelError::InvalidColor(literal.to_string()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ModelError::InvalidColor(literal.to_string()))?;
        Ok(Self { rgb: Some(value) })
    }

    /// Whether this color is automatic.
    pub fn is_auto(&self) -> bool {
        self.rgb.is_none()
    }

    /// The packed RGB value, if set.
    pub fn rgb(&self) -> Option<u32> {
        self.rgb
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        match color.rgb {
            Some(value) => format!("#{value:06X}"),
            None => "auto".to_string(),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ModelError;

    fn try_from(literal: String) -> Result<Self, Self::Error> {
        if literal.eq_ignore_ascii_case("auto") {
            return Ok(Self::auto());
        }
        Self::from_hex(&literal)
    }
}

// ============================================================================
// Font
// ============================================================================

/// Default font family for new documents.
pub const DEFAULT_FONT_NAME: &str = "Calibri";

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Character formatting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Font {
    pub name: String,
    /// Size in points.
    pub size_pt: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub color: Color,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: DEFAULT_FONT_NAME.to_string(),
            size_pt: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            color: Color::auto(),
        }
    }
}

impl Font {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font family name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the size in points
    pub fn size(mut self, size_pt: f64) -> Self {
        self.size_pt = size_pt;
        self
    }

    /// Set bold
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set italic
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the text color
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Combine for Font {
    fn combine(&mut self, reference: &Self) {
        let unset = Self::default();
        if self.name == unset.name {
            self.name = reference.name.clone();
        }
        if self.size_pt == unset.size_pt {
            self.size_pt = reference.size_pt;
        }
        if self.bold == unset.bold {
            self.bold = reference.bold;
        }
        if self.italic == unset.italic {
            self.italic = reference.italic;
        }
        if self.underline == unset.underline {
            self.underline = reference.underline;
        }
        if self.strikeout == unset.strikeout {
            self.strikeout = reference.strikeout;
        }
        if self.color == unset.color {
            self.color = reference.color;
        }
    }
}

/// Sparse overrides for [`Font`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontOptions {
    pub name: Option<String>,
    pub size_pt: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikeout: Option<bool>,
    pub color: Option<Color>,
}

impl FontOptions {
    /// Whether no override is present (all-`None` fast path).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl ApplyOptions for Font {
    type Options = FontOptions;

    fn apply_options(&mut self, options: &FontOptions) {
        if options.is_default() {
            return;
        }
        if let Some(name) = &options.name {
            self.name = name.clone();
        }
        if let Some(size_pt) = options.size_pt {
            self.size_pt = size_pt;
        }
        if let Some(bold) = options.bold {
            self.bold = bold;
        }
        if let Some(italic) = options.italic {
            self.italic = italic;
        }
        if let Some(underline) = options.underline {
            self.underline = underline;
        }
        if let Some(strikeout) = options.strikeout {
            self.strikeout = strikeout;
        }
        if let Some(color) = options.color {
            self.color = color;
        }
    }
}

// ============================================================================
// Fill
// ============================================================================

/// Cell background pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FillPattern {
    #[default]
    None,
    Solid,
    Gray125,
    LightGray,
    MediumGray,
    DarkGray,
}

/// Cell background fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fill {
    pub pattern: FillPattern,
    pub foreground: Color,
    pub background: Color,
}

impl Fill {
    /// A solid fill of the given color.
    pub fn solid(color: Color) -> Self {
        Self {
            pattern: FillPattern::Solid,
            foreground: color,
            background: Color::auto(),
        }
    }
}

impl Combine for Fill {
    fn combine(&mut self, reference: &Self) {
        let unset = Self::default();
        if self.pattern == unset.pattern {
            self.pattern = reference.pattern;
        }
        if self.foreground == unset.foreground {
            self.foreground = reference.foreground;
        }
        if self.background == unset.background {
            self.background = reference.background;
        }
    }
}

/// Sparse overrides for [`Fill`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FillOptions {
    pub pattern: Option<FillPattern>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl FillOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl ApplyOptions for Fill {
    type Options = FillOptions;

    fn apply_options(&mut self, options: &FillOptions) {
        if options.is_default() {
            return;
        }
        if let Some(pattern) = options.pattern {
            self.pattern = pattern;
        }
        if let Some(foreground) = options.foreground {
            self.foreground = foreground;
        }
        if let Some(background) = options.background {
            self.background = background;
        }
    }
}

// ============================================================================
// Border
// ============================================================================

/// Which edge of the cell a border belongs to.
///
/// Doubles as the identity key of a border inside its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderPosition {
    Left,
    Right,
    Top,
    Bottom,
}

/// Border line style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderLine {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
}

/// One edge border of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub position: BorderPosition,
    #[serde(default)]
    pub line: BorderLine,
    #[serde(default)]
    pub color: Color,
}

impl Border {
    pub fn new(position: BorderPosition) -> Self {
        Self {
            position,
            line: BorderLine::None,
            color: Color::auto(),
        }
    }

    /// Set the line style
    pub fn line(mut self, line: BorderLine) -> Self {
        self.line = line;
        self
    }

    /// Set the line color
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Keyed for Border {
    type Key = BorderPosition;

    fn key(&self) -> &BorderPosition {
        &self.position
    }

    fn key_matches(&self, key: &BorderPosition) -> bool {
        self.position == *key
    }
}

impl Combine for Border {
    fn combine(&mut self, reference: &Self) {
        if self.line == BorderLine::None {
            self.line = reference.line;
        }
        if self.color == Color::auto() {
            self.color = reference.color;
        }
    }
}

/// Sparse overrides for [`Border`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderOptions {
    pub line: Option<BorderLine>,
    pub color: Option<Color>,
}

impl BorderOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl ApplyOptions for Border {
    type Options = BorderOptions;

    fn apply_options(&mut self, options: &BorderOptions) {
        if options.is_default() {
            return;
        }
        if let Some(line) = options.line {
            self.line = line;
        }
        if let Some(color) = options.color {
            self.color = color;
        }
    }
}

// ============================================================================
// Alignment
// ============================================================================

/// Horizontal cell alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical cell alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    #[default]
    Bottom,
    Center,
    Top,
}

/// Text placement within a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    pub wrap_text: bool,
    /// Rotation in degrees, -90..=90.
    pub rotation: i16,
    pub indent: u8,
}

impl Alignment {
    /// Set the rotation, failing fast on out-of-range values.
    pub fn set_rotation(&mut self, degrees: i16) -> Result<(), ModelError> {
        if !(-90..=90).contains(&degrees) {
            return Err(ModelError::OutOfRange {
                field: "rotation",
                value: f64::from(degrees),
                min: -90.0,
                max: 90.0,
            });
        }
        self.rotation = degrees;
        Ok(())
    }
}

impl Combine for Alignment {
    fn combine(&mut self, reference: &Self) {
        let unset = Self::default();
        if self.horizontal == unset.horizontal {
            self.horizontal = reference.horizontal;
        }
        if self.vertical == unset.vertical {
            self.vertical = reference.vertical;
        }
        if self.wrap_text == unset.wrap_text {
            self.wrap_text = reference.wrap_text;
        }
        if self.rotation == unset.rotation {
            self.rotation = reference.rotation;
        }
        if self.indent == unset.indent {
            self.indent = reference.indent;
        }
    }
}

/// Sparse overrides for [`Alignment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlignmentOptions {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap_text: Option<bool>,
    pub rotation: Option<i16>,
    pub indent: Option<u8>,
}

impl AlignmentOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl ApplyOptions for Alignment {
    type Options = AlignmentOptions;

    fn apply_options(&mut self, options: &AlignmentOptions) {
        if options.is_default() {
            return;
        }
        if let Some(horizontal) = options.horizontal {
            self.horizontal = horizontal;
        }
        if let Some(vertical) = options.vertical {
            self.vertical = vertical;
        }
        if let Some(wrap_text) = options.wrap_text {
            self.wrap_text = wrap_text;
        }
        if let Some(rotation) = options.rotation {
            self.rotation = rotation;
        }
        if let Some(indent) = options.indent {
            self.indent = indent;
        }
    }
}

// ============================================================================
// CellStyle
// ============================================================================

/// A complete cell format: font, fill, edge borders, alignment, and a
/// number format string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyle {
    pub font: Font,
    pub fill: Fill,
    pub borders: KeyedCollection<Border>,
    pub alignment: Alignment,
    /// Excel number format string, e.g. `"#,##0.00"`. Empty means General.
    pub number_format: String,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the border on the given edge.
    pub fn border(&self, position: BorderPosition) -> Option<&Border> {
        self.borders.get(&position)
    }

    /// Set or replace the border on the given edge.
    pub fn set_border(&mut self, border: Border) {
        match self.borders.get_mut(&border.position) {
            Some(existing) => *existing = border,
            None => self.borders.push(border),
        }
    }

    /// Apply the same line style and color to all four edges.
    pub fn outline(&mut self, line: BorderLine, color: Color) {
        for position in [
            BorderPosition::Left,
            BorderPosition::Right,
            BorderPosition::Top,
            BorderPosition::Bottom,
        ] {
            self.set_border(Border::new(position).line(line).color(color));
        }
    }
}

impl Combine for CellStyle {
    fn combine(&mut self, reference: &Self) {
        // Nested models recurse; they track their own per-field defaults.
        self.font.combine(&reference.font);
        self.fill.combine(&reference.fill);
        self.borders.combine(&reference.borders);
        self.alignment.combine(&reference.alignment);
        if self.number_format.is_empty() {
            self.number_format = reference.number_format.clone();
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
    fn color_literals_round_trip() {
        let red = Color::from_hex("#FF0000").unwrap();
        assert_eq!(String::from(red), "#FF0000");
        assert_eq!(String::from(Color::auto()), "auto");
        assert_eq!(Color::try_from("AUTO".to_string()).unwrap(), Color::auto());
    }

    #[test]
    fn color_rejects_malformed_literals() {
        assert!(Color::from_hex("FF0000").is_err());
        assert!(Color::from_hex("#F00").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_rgb(0x1_000_000).is_err());
    }

    #[test]
    fn font_combine_fills_only_defaults() {
        let mut local = Font::new().size(14.0);
        let reference = Font::new().name("Georgia").size(9.0).bold();

        local.combine(&reference);

        assert_eq!(local.name, "Georgia"); // default, pulled from reference
        assert_eq!(local.size_pt, 14.0); // customized, untouched
        assert!(local.bold);
    }

    #[test]
    fn font_combine_is_idempotent() {
        let mut font = Font::new().name("Georgia").bold();
        let snapshot = font.clone();
        font.combine(&snapshot);
        assert_eq!(font, snapshot);
    }

    #[test]
    fn font_options_apply_single_field() {
        let mut font = Font::new().name("Georgia").size(14.0);
        let options = FontOptions {
            italic: Some(true),
            ..Default::default()
        };

        font.apply_options(&options);

        assert!(font.italic);
        assert_eq!(font.name, "Georgia");
        assert_eq!(font.size_pt, 14.0);
    }

    #[test]
    fn all_none_options_are_a_noop() {
        let mut font = Font::new().name("Georgia").bold();
        let snapshot = font.clone();

        assert!(FontOptions::default().is_default());
        font.apply_options(&FontOptions::default());

        assert_eq!(font, snapshot);
    }

    #[test]
    fn borders_merge_by_position() {
        let mut style = CellStyle::new();
        style.set_border(
            Border::new(BorderPosition::Top).line(BorderLine::Thick),
        );

        let mut reference = CellStyle::new();
        reference.outline(BorderLine::Thin, Color::from_hex("#333333").unwrap());

        style.combine(&reference);

        assert_eq!(style.borders.len(), 4);
        // The customized top edge keeps its line but inherits the color.
        let top = style.border(BorderPosition::Top).unwrap();
        assert_eq!(top.line, BorderLine::Thick);
        assert_eq!(top.color, Color::from_hex("#333333").unwrap());
        // The other three edges were cloned in whole.
        let left = style.border(BorderPosition::Left).unwrap();
        assert_eq!(left.line, BorderLine::Thin);
    }

    #[test]
    fn cell_style_combine_recurses_into_nested_models() {
        let mut local = CellStyle::new();
        local.font.bold = true;

        let mut reference = CellStyle::new();
        reference.font.name = "Georgia".to_string();
        reference.fill = Fill::solid(Color::from_hex("#DDEBF7").unwrap());
        reference.number_format = "#,##0.00".to_string();

        local.combine(&reference);

        assert!(local.font.bold);
        assert_eq!(local.font.name, "Georgia");
        assert_eq!(local.fill.pattern, FillPattern::Solid);
        assert_eq!(local.number_format, "#,##0.00");
    }

    #[test]
    fn rotation_is_range_checked() {
        let mut alignment = Alignment::default();
        assert!(alignment.set_rotation(45).is_ok());
        assert_eq!(alignment.rotation, 45);

        let err = alignment.set_rotation(120).unwrap_err();
        assert!(matches!(err, ModelError::OutOfRange { field: "rotation", .. }));
        assert_eq!(alignment.rotation, 45);
    }

    #[test]
    fn clone_independence_for_borders() {
        let mut original = CellStyle::new();
        original.outline(BorderLine::Thin, Color::auto());

        let mut copy = original.clone();
        copy.set_border(
            Border::new(BorderPosition::Top).line(BorderLine::Double),
        );

        assert_eq!(
            original.border(BorderPosition::Top).unwrap().line,
            BorderLine::Thin
        );
        assert_eq!(
            copy.border(BorderPosition::Top).unwrap().line,
            BorderLine::Double
        );
    }
}
