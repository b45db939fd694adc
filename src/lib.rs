//! AML charter documents
//!
//! Content for the "Customer AML Risk Event Summary Model" project charter
//! and the glue that renders it: a slide deck, a PDF report and a DOCX
//! report, one binary each.

pub mod cli;
pub mod deck;
pub mod report;

pub use deck::{build_deck, deck_properties};
pub use report::{
    build_docx_story, build_report_story, build_story, docx_styles, report_properties,
    report_styles, ReportFormat,
};

/// Project title as it appears on the deck title slide and report title page.
pub const PROJECT_TITLE: &str = "客戶洗錢風險事件摘要模型";

pub const DEFAULT_DECK_PATH: &str = "/Users/ro9air/SDD_repo/specs/meta/00_meta.pptx";
pub const DEFAULT_PDF_PATH: &str = "/Users/ro9air/SDD_repo/specs/meta/00_meta.pdf";
pub const DEFAULT_DOCX_PATH: &str = "/Users/ro9air/SDD_repo/specs/meta/00_meta.docx";
