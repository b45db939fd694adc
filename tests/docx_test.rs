//! Integration tests for the DOCX report writer.

use std::io::{Cursor, Read};

use aml_charter_docs::{build_docx_story, report_properties, PROJECT_TITLE};
use charter_doc_creator::{story_to_docx, write_docx, TextStyle};
use quick_xml::events::Event;
use quick_xml::Reader;

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

fn document_xml(bytes: &[u8]) -> String {
    read_part(bytes, "word/document.xml")
}

/// The `<w:style>` element with `id`.
fn style_block<'a>(styles: &'a str, id: &str) -> &'a str {
    let marker = format!(r#"w:styleId="{}""#, id);
    let start = styles.find(&marker).unwrap();
    let end = start + styles[start..].find("</w:style>").unwrap();
    &styles[start..end]
}

/// `(style id, text)` for every body paragraph outside tables.
fn body_paragraphs(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut table_depth = 0usize;
    let mut current: Option<(String, String)> = None;
    let mut in_text = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" if table_depth == 0 => current = Some(("Normal".into(), String::new())),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"w:pStyle" => {
                if let Some((style, _)) = current.as_mut() {
                    let value = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"w:val")
                        .unwrap();
                    *style = String::from_utf8(value.value.into_owned()).unwrap();
                }
            }
            Event::Text(t) if in_text => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&t.unescape().unwrap());
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth -= 1,
                b"w:p" if table_depth == 0 => paragraphs.extend(current.take()),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    paragraphs
}

fn docx_bytes() -> Vec<u8> {
    story_to_docx(&build_docx_story().unwrap(), &report_properties()).unwrap()
}

#[test]
fn page_breaks_and_tables_match_the_story() {
    let xml = document_xml(&docx_bytes());
    assert_eq!(xml.matches(r#"<w:br w:type="page"/>"#).count(), 6);
    assert_eq!(xml.matches("<w:tbl>").count(), 6);
    // Header rows repeat across pages; key/value tables have none.
    assert_eq!(xml.matches("<w:tblHeader/>").count(), 4);
}

#[test]
fn headings_follow_report_order() {
    let xml = document_xml(&docx_bytes());
    let paragraphs = body_paragraphs(&xml);

    assert_eq!(paragraphs[0], ("Title".to_string(), PROJECT_TITLE.to_string()));

    let headings: Vec<&str> = paragraphs
        .iter()
        .filter(|(style, _)| style == "Heading1")
        .map(|(_, text)| text.as_str())
        .collect();
    assert_eq!(
        headings,
        ["專案總覽", "專案背景", "專案範圍", "優先順序與依賴", "成功標準", "附錄"]
    );
}

#[test]
fn bullets_keep_story_order() {
    let story = build_docx_story().unwrap();
    let expected: Vec<String> = story
        .paragraphs()
        .filter(|p| p.style == TextStyle::Bullet)
        .map(|p| p.text())
        .collect();

    let xml = document_xml(&story_to_docx(&story, &report_properties()).unwrap());
    let bullets: Vec<String> = body_paragraphs(&xml)
        .into_iter()
        .filter(|(style, _)| style == "ListBullet")
        .map(|(_, text)| text)
        .collect();

    assert!(!bullets.is_empty());
    assert_eq!(bullets, expected);
    assert!(bullets.iter().all(|b| !b.starts_with('•')));
}

#[test]
fn docx_output_is_byte_identical_across_runs() {
    assert_eq!(docx_bytes(), docx_bytes());
}

#[test]
fn package_declares_core_parts() {
    let bytes = docx_bytes();
    let archive = zip::ZipArchive::new(Cursor::new(&bytes)).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/styles.xml",
        "word/numbering.xml",
        "word/_rels/document.xml.rels",
        "docProps/core.xml",
        "docProps/app.xml",
    ] {
        assert!(names.contains(&part), "missing {}", part);
    }
}

#[test]
fn writes_docx_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("00_meta.docx");
    let story = build_docx_story().unwrap();
    write_docx(&story, &report_properties(), &path).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, docx_bytes());

    let missing = dir.path().join("missing").join("00_meta.docx");
    assert!(write_docx(&story, &report_properties(), &missing).is_err());
}

#[test]
fn word_styles_use_body_size_and_black_title() {
    let styles = read_part(&docx_bytes(), "word/styles.xml");
    assert!(styles.contains(r#"<w:rFonts w:ascii="Arial""#));

    let normal = style_block(&styles, "Normal");
    assert!(normal.contains(r#"<w:sz w:val="24"/>"#));

    let title = style_block(&styles, "Title");
    assert!(title.contains(r#"<w:color w:val="000000"/><w:sz w:val="56"/>"#));
    assert!(title.contains(r#"<w:jc w:val="center"/>"#));

    let heading1 = style_block(&styles, "Heading1");
    assert!(heading1.contains(r#"<w:color w:val="2E5090"/><w:sz w:val="32"/>"#));
    assert!(heading1.contains(r#"w:before="240" w:after="120""#));
    let heading2 = style_block(&styles, "Heading2");
    assert!(heading2.contains(r#"w:before="180" w:after="100""#));
}

#[test]
fn bullets_indent_half_inch_with_quarter_hang() {
    let numbering = read_part(&docx_bytes(), "word/numbering.xml");
    assert!(numbering.contains(r#"<w:ind w:left="720" w:hanging="360"/>"#));
}

#[test]
fn tables_use_word_column_widths() {
    let xml = document_xml(&docx_bytes());
    let grid = |cols: &[u32]| {
        let mut out = String::from("<w:tblGrid>");
        for col in cols {
            out.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, col));
        }
        out + "</w:tblGrid>"
    };
    assert!(xml.contains(&grid(&[3120, 6240])));
    assert!(xml.contains(&grid(&[2340, 2340, 2340, 2340])));
    assert!(xml.contains(&grid(&[1560, 2340, 1560, 1560, 2340])));
    assert!(xml.contains(&grid(&[1872, 3120, 4368])));
    assert!(xml.contains(&grid(&[1560, 1872, 1872, 4056])));
    assert!(xml.contains(r#"<w:top w:w="100" w:type="dxa"/><w:left w:w="180" w:type="dxa"/>"#));
    assert!(xml.contains(r#"w:val="single" w:sz="1" w:space="0" w:color="CCCCCC""#));
}
