//! Writes the charter report as a Word document.

use anyhow::Result;

use aml_charter_docs::cli::{init_logging, print_outline, GeneratorArgs};
use aml_charter_docs::{build_docx_story, report_properties, DEFAULT_DOCX_PATH};
use charter_doc_creator::write_docx;

fn main() -> Result<()> {
    init_logging();
    let args = GeneratorArgs::parse_for("Write the project charter as a Word document");

    let story = build_docx_story()?;
    if args.outline {
        return print_outline(&story);
    }

    let output = args.output_path(DEFAULT_DOCX_PATH);
    write_docx(&story, &report_properties(), &output)?;

    println!("DOCX document generated successfully: {}", output.display());
    Ok(())
}
