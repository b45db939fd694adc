//! Writes the charter report as a paginated A4 PDF.

use anyhow::Result;

use aml_charter_docs::cli::{init_logging, print_outline, GeneratorArgs};
use aml_charter_docs::{build_report_story, DEFAULT_PDF_PATH};
use charter_doc_creator::create_report_pdf;

fn main() -> Result<()> {
    init_logging();
    let args = GeneratorArgs::parse_for("Write the project charter as a paginated A4 PDF report");

    let story = build_report_story()?;
    if args.outline {
        return print_outline(&story);
    }

    let output = args.output_path(DEFAULT_PDF_PATH);
    create_report_pdf(&story, &output)?;

    println!("PDF document generated successfully: {}", output.display());
    Ok(())
}
