//! Integration tests for XLSX rendering

use gridforge_core::{
    Border, BorderLine, BorderPosition, Chart, ChartKind, Color, Column, Document, Fill,
    HfPosition, HfSection, PageOrientation, Plot, Row, Series, Sheet, TotalsFunction,
};
use gridforge_render::{save_xlsx, save_zip, RenderError, XlsxRenderer};

/// Create a styled two-sheet report with totals, autofilter, and a chart
fn create_sales_report() -> Document {
    let mut document = Document::new("Sales Report");
    document.properties.title = "Quarterly Sales".to_string();
    document.properties.author = "Reporting Service".to_string();
    document.style.font.name = "Georgia".to_string();
    document.settings.orientation = PageOrientation::Landscape;

    let mut amount = Column::new("Amount").width(14.0).totals(TotalsFunction::Sum);
    amount.style.number_format = "#,##0.00".to_string();
    amount.style.set_border(
        Border::new(BorderPosition::Bottom).line(BorderLine::Thin),
    );

    let mut data = Sheet::new("Data")
        .column(Column::new("Region").width(22.0).totals_label("Total"))
        .column(amount)
        .column(Column::new("Confirmed"))
        .row(Row::new().text("North").number(1250.0).boolean(true))
        .row(Row::new().text("South").number(980.5).boolean(false))
        .row(Row::new().text("East").number(1433.25).boolean(true))
        .auto_filter()
        .freeze_top_row();
    data.tab_color = Color::from_hex("#4472C4").unwrap();
    data.header.set_section(HfSection::new(HfPosition::Center, "Sales by Region"));
    data.footer.set_section(HfSection::new(HfPosition::Right, "Page &P"));

    let summary = Sheet::new("Summary").chart(
        Chart::new("by-region")
            .kind(ChartKind::Column)
            .title("Sales by Region")
            .anchor("B2")
            .plot(
                Plot::new("main").series(
                    Series::new("Q3")
                        .categories("Data!$A$2:$A$4")
                        .values("Data!$B$2:$B$4")
                        .fill(Fill::solid(Color::from_hex("#4472C4").unwrap())),
                ),
            ),
    );

    document.sheets.push(data);
    document.sheets.push(summary);
    document
}

#[test]
fn render_sales_report_to_xlsx() {
    let document = create_sales_report();
    let renderer = XlsxRenderer::new();

    let xlsx = renderer.render_to_bytes(&document).unwrap();

    // Verify it's a valid XLSX file (starts with PK zip signature)
    assert!(xlsx.len() > 100);
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn render_without_header_row() {
    let document = create_sales_report();
    let renderer = XlsxRenderer::new().no_header_row().no_properties();

    let xlsx = renderer.render_to_bytes(&document).unwrap();
    assert!(xlsx.len() > 100);
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn render_rejects_illegal_sheet_names() {
    let mut document = Document::new("Bad");
    document.sheets.push(Sheet::new("bad[name]"));

    let err = XlsxRenderer::new().render_to_bytes(&document).unwrap_err();
    assert!(matches!(err, RenderError::InvalidSheetName(_)));
}

#[test]
fn save_xlsx_reports_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    let outcome = save_xlsx(&XlsxRenderer::new(), &create_sales_report(), &path);

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    assert!(outcome.bytes_written > 100);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn save_zip_wraps_the_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.zip");

    let outcome = save_zip(&XlsxRenderer::new(), &create_sales_report(), &path);

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..2], b"PK");

    // The archive holds exactly one sanitized .xlsx entry.
    let file = std::fs::File::open(&path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.file_names().next(), Some("Sales Report.xlsx"));
}

#[test]
fn save_into_missing_directory_fails_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-subdir").join("report.xlsx");

    let outcome = save_xlsx(&XlsxRenderer::new(), &create_sales_report(), &path);

    assert!(!outcome.success);
    assert_eq!(outcome.error_count(), 1);
    assert!(outcome.errors[0].contains("write failed"));
}

#[test]
fn merged_document_renders_after_combine() {
    use gridforge_core::Combine;

    let mut document = Document::new("Local")
        .sheet_with(Sheet::new("Data").column(Column::new("Region")));
    document.combine(&create_sales_report());

    // The local sheet inherited the reference columns and content.
    let data = document.sheet("Data").unwrap();
    assert_eq!(data.columns.len(), 3);
    assert_eq!(data.rows.len(), 3);

    let xlsx = XlsxRenderer::new().render_to_bytes(&document).unwrap();
    assert_eq!(&xlsx[0..2], b"PK");
}
