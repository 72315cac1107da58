//! XLSX writer: applies a document model to an OpenXML package.
//!
//! Every styling decision lives in the model; this module only translates
//! the resolved model into `rust_xlsxwriter` calls. Inheritance is resolved
//! here with the model's own `Combine` chain: column styles pull from the
//! document base style, sheet page setup pulls from the document defaults.

use gridforge_core::{
    totals_formula, BorderLine, BorderPosition, CellStyle, CellValue, ChartKind, Document,
    FillPattern, HfPosition, HorizontalAlign, LegendPosition, PageOrientation, Sheet,
    TotalsFunction, VerticalAlign,
};
use rust_xlsxwriter::{
    Chart as XlsxChart, ChartLegendPosition, ChartSolidFill, ChartType, DocProperties,
    Format, FormatAlign, FormatBorder, FormatPattern, FormatUnderline, Workbook,
    Worksheet,
};
use tracing::debug;

use crate::RenderError;

/// Excel worksheet name length limit.
pub const SHEET_NAME_MAX_LEN: usize = 31;

/// Characters not allowed in worksheet names.
pub const SHEET_NAME_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];

/// Document-to-XLSX renderer.
///
/// Configuration covers writer behavior only; everything about the output's
/// appearance comes from the document model itself.
#[derive(Clone, Debug)]
pub struct XlsxRenderer {
    /// Write the column-name header row.
    pub write_header_row: bool,
    /// Copy document properties (title, author, company) into the package.
    pub include_properties: bool,
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        Self {
            write_header_row: true,
            include_properties: true,
        }
    }
}

impl XlsxRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the column-name header row
    pub fn no_header_row(mut self) -> Self {
        self.write_header_row = false;
        self
    }

    /// Skip document properties
    pub fn no_properties(mut self) -> Self {
        self.include_properties = false;
        self
    }

    /// Render the document to XLSX bytes.
    pub fn render_to_bytes(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();

        if self.include_properties {
            let properties = DocProperties::new()
                .set_title(document.properties.title.as_str())
                .set_author(document.properties.author.as_str())
                .set_company(document.properties.company.as_str());
            workbook.set_properties(&properties);
        }

        for sheet in &document.sheets {
            validate_sheet_name(&sheet.name)?;
            debug!(sheet = %sheet.name, "rendering sheet");
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(sheet.name.as_str())
                .map_err(|e| RenderError::Format(e.to_string()))?;
            self.add_sheet(worksheet, document, sheet)?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create XLSX: {e}")))?;

        debug!(bytes = buffer.len(), "workbook rendered");
        Ok(buffer)
    }

    fn add_sheet(
        &self,
        worksheet: &mut Worksheet,
        document: &Document,
        sheet: &Sheet,
    ) -> Result<(), RenderError> {
        use gridforge_core::Combine;

        let data_rows = sheet.rows.len() as u32;
        let last_col = sheet.columns.len().saturating_sub(1) as u16;

        // Header row format: the document base style, emboldened.
        let mut header_style = document.style.clone();
        header_style.font.bold = true;
        let header_format = format_from_style(&header_style);

        // Column setup and per-column formats resolved against the document
        // base style.
        let mut column_formats: Vec<Format> = Vec::with_capacity(sheet.columns.len());
        for (index, column) in sheet.columns.iter().enumerate() {
            let col = index as u16;
            let mut style = column.style.clone();
            style.combine(&document.style);
            column_formats.push(format_from_style(&style));

            worksheet.set_column_width(col, column.width).ok();
            if column.hidden {
                worksheet.set_column_hidden(col).ok();
            }
            if self.write_header_row {
                worksheet
                    .write_string_with_format(0, col, column.name.as_str(), &header_format)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }

        // Content rows. Cells beyond the column list fall back to the
        // document base style.
        let base_format = format_from_style(&document.style);
        let first_data_row: u32 = if self.write_header_row { 1 } else { 0 };
        for (r, row) in sheet.rows.iter().enumerate() {
            let row_index = first_data_row + r as u32;
            for (c, cell) in row.cells.iter().enumerate() {
                let col = c as u16;
                let format = column_formats.get(c).unwrap_or(&base_format);
                write_cell(worksheet, row_index, col, cell, format)?;
            }
        }

        if sheet.auto_filter && !sheet.columns.is_empty() {
            worksheet
                .autofilter(0, 0, data_rows, last_col)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        if sheet.has_totals_row() && data_rows > 0 {
            let totals_row = first_data_row + data_rows;
            for (index, column) in sheet.columns.iter().enumerate() {
                if column.totals == TotalsFunction::None {
                    continue;
                }
                let col = index as u16;
                let letter = column_letter(col);
                let range = format!(
                    "{letter}{first}:{letter}{last}",
                    first = first_data_row + 1,
                    last = first_data_row + data_rows
                );
                let label = column.totals_label.as_deref().unwrap_or(&column.name);
                let formula =
                    totals_formula(column.totals, &range, sheet.auto_filter, label);
                if formula.is_empty() {
                    continue;
                }
                let format = column_formats.get(index).unwrap_or(&base_format);
                worksheet
                    .write_formula_with_format(totals_row, col, formula.as_str(), format)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }

        if sheet.freeze_top_row {
            worksheet
                .set_freeze_panes(1, 0)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        if let Some(rgb) = sheet.tab_color.rgb() {
            worksheet.set_tab_color(rgb);
        }

        let header_script = header_footer_script(&sheet.header);
        if !header_script.is_empty() {
            worksheet.set_header(header_script.as_str());
        }
        let footer_script = header_footer_script(&sheet.footer);
        if !footer_script.is_empty() {
            worksheet.set_footer(footer_script.as_str());
        }

        // Effective page setup: sheet-local values win, unset fields fall
        // back to the document defaults.
        let mut setup = sheet.settings.clone();
        setup.combine(&document.settings);
        if setup.orientation == PageOrientation::Landscape {
            worksheet.set_landscape();
        }
        if setup.paper.code() != 0 {
            worksheet.set_paper_size(setup.paper.code());
        }
        worksheet.set_margins(
            setup.margins.left,
            setup.margins.right,
            setup.margins.top,
            setup.margins.bottom,
            setup.margins.header,
            setup.margins.footer,
        );
        if setup.fit_to_width > 0 || setup.fit_to_height > 0 {
            worksheet.set_print_fit_to_pages(setup.fit_to_width, setup.fit_to_height);
        }
        if setup.gridlines {
            worksheet.set_print_gridlines(true);
        }
        if setup.zoom != 100 {
            worksheet.set_zoom(setup.zoom);
        }

        for chart in &sheet.charts {
            insert_chart(worksheet, chart)?;
        }

        Ok(())
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    format: &Format,
) -> Result<(), RenderError> {
    let result = match cell {
        CellValue::Empty => return Ok(()),
        CellValue::Text(text) => worksheet.write_string_with_format(row, col, text.as_str(), format),
        CellValue::Number(value) => worksheet.write_number_with_format(row, col, *value, format),
        CellValue::Bool(value) => worksheet.write_boolean_with_format(row, col, *value, format),
        CellValue::Formula(formula) => {
            worksheet.write_formula_with_format(row, col, formula.as_str(), format)
        }
    };
    result.map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

fn insert_chart(worksheet: &mut Worksheet, model: &gridforge_core::Chart) -> Result<(), RenderError> {
    let mut chart = XlsxChart::new(chart_type(model.kind));

    for plot in &model.plots {
        for series in &plot.series {
            let chart_series = chart.add_series();
            chart_series.set_name(series.name.as_str());
            if !series.categories_range.is_empty() {
                chart_series.set_categories(series.categories_range.as_str());
            }
            if !series.values_range.is_empty() {
                chart_series.set_values(series.values_range.as_str());
            }
            if series.fill.pattern == FillPattern::Solid {
                if let Some(rgb) = series.fill.foreground.rgb() {
                    chart_series.set_format(ChartSolidFill::new().set_color(rgb));
                }
            }
        }
    }

    if !model.title.is_empty() {
        chart.title().set_name(model.title.as_str());
    }
    if model.legend.visible {
        chart
            .legend()
            .set_position(legend_position(model.legend.position));
    } else {
        chart.legend().set_hidden();
    }
    chart.set_width(model.width_px);
    chart.set_height(model.height_px);

    let (row, col) = parse_cell_ref(&model.anchor_cell)?;
    worksheet
        .insert_chart(row, col, &chart)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

/// Translate a resolved cell style into a `rust_xlsxwriter` format.
fn format_from_style(style: &CellStyle) -> Format {
    let mut format = Format::new()
        .set_font_name(style.font.name.as_str())
        .set_font_size(style.font.size_pt);

    if style.font.bold {
        format = format.set_bold();
    }
    if style.font.italic {
        format = format.set_italic();
    }
    if style.font.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if style.font.strikeout {
        format = format.set_font_strikethrough();
    }
    if let Some(rgb) = style.font.color.rgb() {
        format = format.set_font_color(rgb);
    }

    match style.fill.pattern {
        FillPattern::None => {}
        FillPattern::Solid => {
            if let Some(rgb) = style.fill.foreground.rgb() {
                format = format.set_background_color(rgb);
            }
        }
        pattern => {
            format = format.set_pattern(fill_pattern(pattern));
            if let Some(rgb) = style.fill.foreground.rgb() {
                format = format.set_foreground_color(rgb);
            }
            if let Some(rgb) = style.fill.background.rgb() {
                format = format.set_background_color(rgb);
            }
        }
    }

    for border in &style.borders {
        let line = border_line(border.line);
        format = match border.position {
            BorderPosition::Left => format.set_border_left(line),
            BorderPosition::Right => format.set_border_right(line),
            BorderPosition::Top => format.set_border_top(line),
            BorderPosition::Bottom => format.set_border_bottom(line),
        };
        if let Some(rgb) = border.color.rgb() {
            format = match border.position {
                BorderPosition::Left => format.set_border_left_color(rgb),
                BorderPosition::Right => format.set_border_right_color(rgb),
                BorderPosition::Top => format.set_border_top_color(rgb),
                BorderPosition::Bottom => format.set_border_bottom_color(rgb),
            };
        }
    }

    match style.alignment.horizontal {
        HorizontalAlign::General => {}
        HorizontalAlign::Left => format = format.set_align(FormatAlign::Left),
        HorizontalAlign::Center => format = format.set_align(FormatAlign::Center),
        HorizontalAlign::Right => format = format.set_align(FormatAlign::Right),
        HorizontalAlign::Justify => format = format.set_align(FormatAlign::Justify),
    }
    match style.alignment.vertical {
        VerticalAlign::Bottom => {}
        VerticalAlign::Center => format = format.set_align(FormatAlign::VerticalCenter),
        VerticalAlign::Top => format = format.set_align(FormatAlign::Top),
    }
    if style.alignment.wrap_text {
        format = format.set_text_wrap();
    }
    if style.alignment.rotation != 0 {
        format = format.set_rotation(style.alignment.rotation);
    }
    if style.alignment.indent > 0 {
        format = format.set_indent(style.alignment.indent);
    }

    if !style.number_format.is_empty() {
        format = format.set_num_format(style.number_format.as_str());
    }

    format
}

fn border_line(line: BorderLine) -> FormatBorder {
    match line {
        BorderLine::None => FormatBorder::None,
        BorderLine::Thin => FormatBorder::Thin,
        BorderLine::Medium => FormatBorder::Medium,
        BorderLine::Thick => FormatBorder::Thick,
        BorderLine::Dashed => FormatBorder::Dashed,
        BorderLine::Dotted => FormatBorder::Dotted,
        BorderLine::Double => FormatBorder::Double,
    }
}

fn fill_pattern(pattern: FillPattern) -> FormatPattern {
    match pattern {
        FillPattern::None => FormatPattern::None,
        FillPattern::Solid => FormatPattern::Solid,
        FillPattern::Gray125 => FormatPattern::Gray125,
        FillPattern::LightGray => FormatPattern::LightGray,
        FillPattern::MediumGray => FormatPattern::MediumGray,
        FillPattern::DarkGray => FormatPattern::DarkGray,
    }
}

fn chart_type(kind: ChartKind) -> ChartType {
    match kind {
        ChartKind::Column => ChartType::Column,
        ChartKind::Bar => ChartType::Bar,
        ChartKind::Line => ChartType::Line,
        ChartKind::Pie => ChartType::Pie,
        ChartKind::Area => ChartType::Area,
        ChartKind::Scatter => ChartType::Scatter,
    }
}

fn legend_position(position: LegendPosition) -> ChartLegendPosition {
    match position {
        LegendPosition::Right => ChartLegendPosition::Right,
        LegendPosition::Left => ChartLegendPosition::Left,
        LegendPosition::Top => ChartLegendPosition::Top,
        LegendPosition::Bottom => ChartLegendPosition::Bottom,
    }
}

/// Encode header/footer sections as an `&L`/`&C`/`&R` control script.
fn header_footer_script(hf: &gridforge_core::HeaderFooter) -> String {
    let mut script = String::new();
    for (position, code) in [
        (HfPosition::Left, "&L"),
        (HfPosition::Center, "&C"),
        (HfPosition::Right, "&R"),
    ] {
        if let Some(section) = hf.section(position) {
            if section.text.is_empty() {
                continue;
            }
            script.push_str(code);
            if section.font.bold {
                script.push_str("&B");
            }
            if section.font.italic {
                script.push_str("&I");
            }
            script.push_str(&section.text);
        }
    }
    script
}

fn validate_sheet_name(name: &str) -> Result<(), RenderError> {
    if name.is_empty() || name.chars().count() > SHEET_NAME_MAX_LEN {
        return Err(RenderError::InvalidSheetName(name.to_string()));
    }
    if name.contains(&SHEET_NAME_ILLEGAL[..]) {
        return Err(RenderError::InvalidSheetName(name.to_string()));
    }
    Ok(())
}

/// The A1-style letter for a zero-based column index.
fn column_letter(col: u16) -> String {
    let mut letters = Vec::new();
    let mut remainder = u32::from(col) + 1;
    while remainder > 0 {
        let digit = ((remainder - 1) % 26) as u8;
        letters.push(b'A' + digit);
        remainder = (remainder - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Parse an A1-style cell reference into a zero-based (row, col) pair.
fn parse_cell_ref(reference: &str) -> Result<(u32, u16), RenderError> {
    let letters: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let digits = &reference[letters.len()..];
    if letters.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(RenderError::InvalidData(format!(
            "invalid cell reference: {reference}"
        )));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    let row: u32 = digits
        .parse()
        .map_err(|_| RenderError::InvalidData(format!("invalid cell reference: {reference}")))?;
    if row == 0 || col == 0 || col > 16_384 {
        return Err(RenderError::InvalidData(format!(
            "invalid cell reference: {reference}"
        )));
    }
    Ok((row - 1, (col - 1) as u16))
}

// ============================================================================
// Tests
// ============================================================================
