//! Charter document creator
//!
//! Builds paginated PDF reports, WordprocessingML reports and PresentationML
//! slide decks from in-memory content models. Report text is laid out with
//! fontdue metrics against a Chinese-capable TrueType font when one can be
//! loaded, and the PDF built-in Helvetica pair otherwise.

pub mod docx_writer;
pub mod error;
pub mod fallback;
pub mod fonts;
pub mod ooxml;
pub mod pdf_generator;
pub mod pptx_writer;
pub mod slides;
pub mod story;
pub mod styles;
pub mod typography;

// Re-export commonly used functions and types
pub use docx_writer::{story_to_docx, write_docx};
pub use error::LayoutError;
pub use fallback::{FallbackChain, Resolved};
pub use fonts::{FontCandidate, FontContext, FontFace};
pub use ooxml::DocProperties;
pub use pdf_generator::{create_report_pdf, render_report_pdf, PdfSummary, ReportPdfGenerator};
pub use pptx_writer::{deck_to_bytes, write_deck};
pub use slides::{Deck, DeckTheme, Palette, Slide, SlideKind};
pub use story::{Flowable, Paragraph, Span, Story, Table};
pub use styles::{
    Alignment, Color, ParagraphStyle, Shading, StyleSheet, TableStyle, TextStyle, VerticalAlign,
};
