//! Integration tests for the slide deck generator.

use std::io::{Cursor, Read};

use aml_charter_docs::{build_deck, deck_properties, PROJECT_TITLE};
use charter_doc_creator::{deck_to_bytes, write_deck, LayoutError, SlideKind};
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

/// Every `<a:t>` text in document order.
fn drawing_texts(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"a:t" => inside = true,
            Event::End(e) if e.name().as_ref() == b"a:t" => inside = false,
            Event::Text(t) if inside => texts.push(t.unescape().unwrap().into_owned()),
            Event::Eof => break,
            _ => {}
        }
    }
    texts
}

fn count_elements(xml: &str, name: &[u8]) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut count = 0;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == name => count += 1,
            Event::Eof => break,
            _ => {}
        }
    }
    count
}

#[test]
fn deck_has_ten_slides_in_order() {
    let deck = build_deck().unwrap();
    assert_eq!(deck.len(), 10);

    let titles: Vec<&str> = deck.slides().iter().map(|s| s.title()).collect();
    assert_eq!(titles[0], PROJECT_TITLE);
    assert_eq!(titles[1], "專案總覽");
    assert_eq!(titles[2], "關鍵時程");
    assert_eq!(titles[9], "成功標準");
    assert_eq!(deck.slides()[0].kind(), SlideKind::Title);
}

#[test]
fn timeline_slide_is_three_by_five() {
    let deck = build_deck().unwrap();
    let table = deck.slides()[2].table().unwrap();
    assert_eq!(table.column_count(), 3);
    assert_eq!(table.row_count(), 5);

    let bytes = deck_to_bytes(&deck, &deck_properties()).unwrap();
    let xml = read_part(&bytes, "ppt/slides/slide3.xml");
    assert_eq!(count_elements(&xml, b"a:gridCol"), 3);
    assert_eq!(count_elements(&xml, b"a:tr"), 6);
    assert_eq!(count_elements(&xml, b"a:tc"), 18);
}

#[test]
fn package_round_trips_through_zip() {
    let deck = build_deck().unwrap();
    let bytes = deck_to_bytes(&deck, &deck_properties()).unwrap();

    let presentation = read_part(&bytes, "ppt/presentation.xml");
    assert_eq!(count_elements(&presentation, b"p:sldId"), 10);

    let title_slide = read_part(&bytes, "ppt/slides/slide1.xml");
    assert_eq!(drawing_texts(&title_slide)[0], PROJECT_TITLE);
}

#[test]
fn bullets_render_in_supplied_order() {
    let deck = build_deck().unwrap();
    let bytes = deck_to_bytes(&deck, &deck_properties()).unwrap();
    let xml = read_part(&bytes, "ppt/slides/slide8.xml");

    let texts = drawing_texts(&xml);
    let expected = deck.slides()[7].texts();
    assert_eq!(texts, expected);
    assert_eq!(texts[0], "範圍外 (Out of Scope)");
    assert_eq!(count_elements(&xml, b"a:buChar"), texts.len() - 1);
}

#[test]
fn rebuilding_gives_identical_bytes() {
    let first = deck_to_bytes(&build_deck().unwrap(), &deck_properties()).unwrap();
    let second = deck_to_bytes(&build_deck().unwrap(), &deck_properties()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn writes_to_existing_directory_only() {
    let dir = tempfile::tempdir().unwrap();
    let deck = build_deck().unwrap();

    let path = dir.path().join("00_meta.pptx");
    write_deck(&deck, &deck_properties(), &path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);

    let missing = dir.path().join("no-such-dir").join("00_meta.pptx");
    assert!(write_deck(&deck, &deck_properties(), &missing).is_err());
}

#[test]
fn ragged_table_rows_are_rejected() {
    let mut deck = build_deck().unwrap();
    let err = deck
        .add_table_slide("x", &["a", "b", "c"], &[vec!["1", "2"]])
        .unwrap_err();
    assert_eq!(
        err,
        LayoutError::RowShape {
            row: 1,
            expected: 3,
            found: 2
        }
    );
    assert_eq!(deck.len(), 10);
}
