//! Writes the charter slide deck (.pptx).

use anyhow::Result;
use log::info;

use aml_charter_docs::cli::{init_logging, print_outline, GeneratorArgs};
use aml_charter_docs::{build_deck, deck_properties, DEFAULT_DECK_PATH};
use charter_doc_creator::write_deck;

fn main() -> Result<()> {
    init_logging();
    let args = GeneratorArgs::parse_for("Write the project charter as a 16:9 PowerPoint deck");

    let deck = build_deck()?;
    if args.outline {
        return print_outline(&deck);
    }

    let output = args.output_path(DEFAULT_DECK_PATH);
    info!("Building {} slides", deck.len());
    write_deck(&deck, &deck_properties(), &output)?;

    println!("Presentation generated successfully: {}", output.display());
    Ok(())
}
