//! Integration tests for the PDF report generator.

use aml_charter_docs::{build_report_story, report_styles, PROJECT_TITLE};
use charter_doc_creator::{
    create_report_pdf, render_report_pdf, Color, FontCandidate, FontContext, Flowable,
    LayoutError, Shading, Story, Table, TableStyle, TextStyle,
};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};

/// Present on most Linux hosts; tests that need a real TrueType file skip
/// without it.
const SYSTEM_TTF: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

fn unavailable_fonts() -> FontContext {
    FontContext::from_candidates(&[
        FontCandidate::new("ArialUnicode", "/nonexistent/Supplemental/Arial Unicode.ttf"),
        FontCandidate::new("ArialUnicode", "/nonexistent/Library/Arial Unicode.ttf"),
    ])
}

#[test]
fn story_has_title_page_and_six_sections() {
    let story = build_report_story().unwrap();
    let sections = story.sections();
    assert_eq!(sections.len(), 7);

    let headings: Vec<String> = sections[1..]
        .iter()
        .map(|section| match &section[0] {
            Flowable::Paragraph(p) if p.style == TextStyle::Heading1 => p.text(),
            other => panic!("section starts with {:?}", other),
        })
        .collect();
    assert_eq!(
        headings,
        ["專案總覽", "專案背景", "專案範圍", "優先順序與依賴", "成功標準", "附錄"]
    );
}

#[test]
fn terminology_table_has_eight_terms() {
    let story = build_report_story().unwrap();
    let terms = story
        .tables()
        .find(|t| t.header().is_some_and(|h| h[0] == "名詞"))
        .unwrap();
    assert_eq!(terms.row_count(), 9);
    assert_eq!(terms.data_rows().len(), 8);
    assert_eq!(terms.data_rows()[0], ["AML", "Anti-Money Laundering", "反洗錢"]);
}

#[test]
fn report_carries_six_tables() {
    let story = build_report_story().unwrap();
    let header_tables = story.tables().filter(|t| t.has_header()).count();
    let key_value_tables = story.tables().filter(|t| !t.has_header()).count();
    assert_eq!(header_tables, 4);
    assert_eq!(key_value_tables, 2);
    for table in story.tables() {
        assert_eq!(table.style().fill, Color::hex(0xD5E8F0));
        assert_eq!(table.style().grid_color, Color::hex(0xCCCCCC));
        assert_eq!(table.style().grid_width, 0.5);
    }
}

#[test]
fn pdf_renders_without_unicode_font() {
    let story = build_report_story().unwrap();
    let (bytes, summary) = render_report_pdf(&story, unavailable_fonts()).unwrap();
    assert!(summary.builtin_font);

    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), summary.page_count);
    assert!(pages.len() >= 7);

    // Latin cell text survives the built-in encoding unchanged.
    let found = pages.values().any(|id| {
        doc.get_page_content(*id)
            .map(|content| {
                content
                    .windows(b"(RISK-AML-MDL-001)".len())
                    .any(|w| w == b"(RISK-AML-MDL-001)")
            })
            .unwrap_or(false)
    });
    assert!(found);
}

#[test]
fn pdf_output_is_byte_identical_across_runs() {
    let story = build_report_story().unwrap();
    let (first, _) = render_report_pdf(&story, unavailable_fonts()).unwrap();
    let (second, _) = render_report_pdf(&build_report_story().unwrap(), unavailable_fonts()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn outline_is_stable() {
    let a = serde_json::to_string(&build_report_story().unwrap()).unwrap();
    let b = serde_json::to_string(&build_report_story().unwrap()).unwrap();
    assert_eq!(a, b);
    assert!(a.contains(r##""fill":"#D5E8F0""##));
}

#[test]
fn writes_pdf_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("00_meta.pdf");
    let summary = create_report_pdf(&build_report_story().unwrap(), &path).unwrap();

    let doc = Document::load(&path).unwrap();
    assert_eq!(doc.get_pages().len(), summary.page_count);

    let missing = dir.path().join("missing").join("00_meta.pdf");
    assert!(create_report_pdf(&build_report_story().unwrap(), &missing).is_err());
}

#[test]
fn mismatched_row_surfaces_as_layout_error() {
    let style = TableStyle::new(Shading::HeaderRow, Color::WHITE, Color::BLACK);
    let result: anyhow::Result<Table> = Table::with_header(
        &["名詞", "全名", "說明"],
        &[&["AML", "Anti-Money Laundering"]],
        &[72.0, 180.0, 216.0],
        style,
    )
    .map_err(anyhow::Error::from);

    let err = result.unwrap_err();
    assert_eq!(
        err.downcast_ref::<LayoutError>(),
        Some(&LayoutError::RowShape {
            row: 1,
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn bullets_keep_supplied_order() {
    let mut story = Story::new(report_styles());
    story.bullets(["第三", "第一", "第三"]);
    let texts: Vec<String> = story.paragraphs().map(|p| p.text()).collect();
    assert_eq!(texts, ["第三", "第一", "第三"]);

    let (bytes, summary) = render_report_pdf(&story, unavailable_fonts()).unwrap();
    assert_eq!(summary.page_count, 1);
    assert!(Document::load_mem(&bytes).is_ok());
}

fn dict_with<'a>(doc: &'a Document, key: &[u8], value: &[u8]) -> Option<&'a Dictionary> {
    doc.objects
        .values()
        .filter_map(|o| o.as_dict().ok())
        .find(|d| d.get(key).and_then(|v| v.as_name()).ok() == Some(value))
}

#[test]
fn pdf_embeds_secondary_truetype_font() {
    if !std::path::Path::new(SYSTEM_TTF).exists() {
        return;
    }
    let fonts = FontContext::from_candidates(&[
        FontCandidate::new("ArialUnicode", "/nonexistent/Supplemental/Arial Unicode.ttf"),
        FontCandidate::new("DejaVuSans", SYSTEM_TTF),
    ]);
    let (bytes, summary) = render_report_pdf(&build_report_story().unwrap(), fonts).unwrap();
    assert!(!summary.builtin_font);
    assert_eq!(summary.font_name, "DejaVuSans");

    let doc = Document::load_mem(&bytes).unwrap();
    let type0 = dict_with(&doc, b"Subtype", b"Type0").unwrap();
    assert_eq!(type0.get(b"Encoding").unwrap().as_name().unwrap(), b"Identity-H");
    assert!(type0.get(b"ToUnicode").is_ok());
    assert!(dict_with(&doc, b"Subtype", b"Type1").is_none());

    let cid_font = dict_with(&doc, b"Subtype", b"CIDFontType2").unwrap();
    assert!(!cid_font.get(b"W").unwrap().as_array().unwrap().is_empty());

    // One big-endian glyph id per BMP code unit.
    let map_id = cid_font.get(b"CIDToGIDMap").unwrap().as_reference().unwrap();
    let map = doc.get_object(map_id).unwrap().as_stream().unwrap();
    let map = map.decompressed_content().unwrap_or_else(|_| map.content.clone());
    assert_eq!(map.len(), 0x10000 * 2);
    let offset = 'A' as usize * 2;
    assert_ne!(u16::from_be_bytes([map[offset], map[offset + 1]]), 0);

    let descriptor_id = cid_font.get(b"FontDescriptor").unwrap().as_reference().unwrap();
    let descriptor = doc.get_dictionary(descriptor_id).unwrap();
    assert!(descriptor.get(b"FontFile2").is_ok());

    // The title page draws the project title as UTF-16BE code units.
    let first_page = *doc.get_pages().values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(first_page).unwrap()).unwrap();
    let drawn: Vec<u8> = content
        .operations
        .iter()
        .filter(|op| op.operator == "TJ")
        .flat_map(|op| op.operands[0].as_array().unwrap().clone())
        .filter_map(|o| match o {
            Object::String(bytes, _) => Some(bytes),
            _ => None,
        })
        .flatten()
        .collect();
    let title: Vec<u8> = PROJECT_TITLE
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes())
        .collect();
    assert!(drawn.windows(title.len()).any(|w| w == title.as_slice()));
}
