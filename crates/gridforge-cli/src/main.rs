//! gridforge CLI - Styled spreadsheet report generator
//!
//! Command-line interface for validating, merging, and rendering report
//! documents authored as JSON or XML.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gridforge_core::{Combine, Document};
use gridforge_render::{save_xlsx, save_zip, XlsxRenderer};

#[derive(Parser)]
#[command(name = "gridforge")]
#[command(author, version, about = "Styled spreadsheet report generator", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a document file
    Check {
        /// Input file path (.json or .xml)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Merge a document with a reference (fallback) document
    Merge {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reference document supplying fallback values
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a document to an XLSX or zip-wrapped XLSX file
    Render {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (xlsx, zip)
        #[arg(short, long, default_value = "xlsx")]
        format: String,

        /// Optional reference document merged in before rendering
        #[arg(short, long)]
        reference: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { file }) => check(&file),
        Some(Commands::Merge {
            file,
            reference,
            output,
        }) => merge(&file, &reference, output.as_deref()),
        Some(Commands::Render {
            file,
            output,
            format,
            reference,
        }) => render(&file, &output, &format, reference.as_deref()),
        None => {
            println!("gridforge - Styled spreadsheet report generator");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

/// Load a document, choosing the codec from the file extension.
fn load_document(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_xml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    let document = if is_xml {
        Document::from_xml(&text)
            .with_context(|| format!("Failed to parse XML document {}", path.display()))?
    } else {
        Document::from_json(&text)
            .with_context(|| format!("Failed to parse JSON document {}", path.display()))?
    };
    Ok(document)
}

fn check(file: &Path) -> Result<()> {
    let document = load_document(file)?;
    println!("Document: {}", document.name);
    println!("Sheets: {}", document.sheets.len());
    for sheet in &document.sheets {
        println!(
            "  {} ({} columns, {} rows, {} charts)",
            sheet.name,
            sheet.columns.len(),
            sheet.rows.len(),
            sheet.charts.len()
        );
    }
    println!("OK");
    Ok(())
}

fn merge(file: &Path, reference: &Path, output: Option<&Path>) -> Result<()> {
    let mut document = load_document(file)?;
    let fallback = load_document(reference)?;
    document.combine(&fallback);

    let json = document.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Merged document written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn render(file: &Path, output: &Path, format: &str, reference: Option<&Path>) -> Result<()> {
    let mut document = load_document(file)?;
    if let Some(reference) = reference {
        let fallback = load_document(reference)?;
        document.combine(&fallback);
    }

    let renderer = XlsxRenderer::new();
    let outcome = match format {
        "xlsx" => save_xlsx(&renderer, &document, output),
        "zip" => save_zip(&renderer, &document, output),
        other => bail!("Unknown output format: {other} (expected xlsx or zip)"),
    };

    if !outcome.success {
        bail!("Save failed: {}", outcome.errors.join("; "));
    }
    println!("{}", outcome.format(&format!("Rendered {}:", output.display())));
    Ok(())
}
