//! PresentationML serialisation of a [`Deck`]
//!
//! Produces one slide master, one blank layout, one theme and one part per
//! slide. XML is assembled with `write!` into pre-sized strings.

use anyhow::{Context, Result};
use log::info;
use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::ooxml::{
    escape, ContentTypes, DocProperties, PackageWriter, Relationships, CT_THEME, NS_DRAWINGML,
    NS_RELATIONSHIPS, REL_OFFICE_DOCUMENT, REL_THEME, XML_DECLARATION,
};
use crate::slides::{
    Anchor, Deck, DeckTheme, FontSpec, Frame, Shape, Slide, TableShape, TextParagraph,
};
use crate::styles::{Alignment, Color};

const NS_PRESENTATIONML: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";

const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

// Slide ids start at 256; master/layout ids live above 2^31.
const FIRST_SLIDE_ID: usize = 256;
const MASTER_ID: u32 = 2_147_483_648;
const LAYOUT_ID: u32 = 2_147_483_649;

// 0.5pt grid lines.
const GRID_LINE_EMU: i64 = 6_350;

/// Serialise `deck` into PPTX bytes.
pub fn deck_to_bytes(deck: &Deck, properties: &DocProperties) -> Result<Vec<u8>> {
    let mut content_types = ContentTypes::new();
    content_types
        .add_override("/ppt/presentation.xml", CT_PRESENTATION)
        .add_override("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER)
        .add_override("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT)
        .add_override("/ppt/theme/theme1.xml", CT_THEME);
    for index in 1..=deck.len() {
        content_types.add_override(&format!("/ppt/slides/slide{}.xml", index), CT_SLIDE);
    }

    let mut root_rels = Relationships::new();
    root_rels.add(REL_OFFICE_DOCUMENT, "ppt/presentation.xml");
    properties.register(&mut content_types, &mut root_rels);

    let mut pres_rels = Relationships::new();
    let master_rel = pres_rels.add(REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    let slide_rels: Vec<String> = (1..=deck.len())
        .map(|index| pres_rels.add(REL_SLIDE, &format!("slides/slide{}.xml", index)))
        .collect();
    pres_rels.add(REL_THEME, "theme/theme1.xml");

    let mut master_rels = Relationships::new();
    master_rels.add(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
    master_rels.add(REL_THEME, "../theme/theme1.xml");

    let mut layout_rels = Relationships::new();
    layout_rels.add(REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml");

    let mut slide_part_rels = Relationships::new();
    slide_part_rels.add(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
    let slide_part_rels = slide_part_rels.to_xml();

    let mut package = PackageWriter::new();
    package.add_xml("[Content_Types].xml", &content_types.to_xml())?;
    package.add_xml("_rels/.rels", &root_rels.to_xml())?;
    package.add_xml("docProps/core.xml", &properties.core_xml())?;
    package.add_xml("docProps/app.xml", &properties.app_xml())?;
    package.add_xml(
        "ppt/presentation.xml",
        &presentation_xml(deck, &master_rel, &slide_rels),
    )?;
    package.add_xml("ppt/_rels/presentation.xml.rels", &pres_rels.to_xml())?;
    package.add_xml("ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
    package.add_xml(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &master_rels.to_xml(),
    )?;
    package.add_xml("ppt/slideLayouts/slideLayout1.xml", &blank_layout_xml())?;
    package.add_xml(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &layout_rels.to_xml(),
    )?;
    package.add_xml("ppt/theme/theme1.xml", &theme_xml(deck.theme()))?;
    for (index, slide) in deck.slides().iter().enumerate() {
        let number = index + 1;
        package.add_xml(
            &format!("ppt/slides/slide{}.xml", number),
            &slide_xml(slide, &deck.theme().font_family),
        )?;
        package.add_xml(
            &format!("ppt/slides/_rels/slide{}.xml.rels", number),
            &slide_part_rels,
        )?;
    }
    package.into_bytes()
}

/// Write `deck` to `output_path`. The parent directory must exist.
pub fn write_deck(deck: &Deck, properties: &DocProperties, output_path: &Path) -> Result<()> {
    let bytes = deck_to_bytes(deck, properties)?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("writing {}", output_path.display()))?;
    info!(
        "Wrote {} slides ({} bytes) to {}",
        deck.len(),
        bytes.len(),
        output_path.display()
    );
    Ok(())
}

fn presentation_xml(deck: &Deck, master_rel: &str, slide_rels: &[String]) -> String {
    let mut xml = String::with_capacity(1024 + 48 * slide_rels.len());
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_DRAWINGML, NS_RELATIONSHIPS, NS_PRESENTATIONML
    );
    let _ = write!(
        xml,
        r#"<p:sldMasterIdLst><p:sldMasterId id="{}" r:id="{}"/></p:sldMasterIdLst>"#,
        MASTER_ID, master_rel
    );
    if !slide_rels.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for (index, rel_id) in slide_rels.iter().enumerate() {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                FIRST_SLIDE_ID + index,
                rel_id
            );
        }
        xml.push_str("</p:sldIdLst>");
    }
    let _ = write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        deck.width(),
        deck.height()
    );
    xml.push_str("</p:presentation>");
    xml
}

// Group properties every spTree starts with.
const SP_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

fn slide_master_xml() -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_DRAWINGML, NS_RELATIONSHIPS, NS_PRESENTATIONML
    );
    xml.push_str("<p:cSld><p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg><p:spTree>");
    xml.push_str(SP_TREE_HEADER);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
        r#"hlink="hlink" folHlink="folHlink"/>"#
    ));
    let _ = write!(
        xml,
        r#"<p:sldLayoutIdLst><p:sldLayoutId id="{}" r:id="rId1"/></p:sldLayoutIdLst>"#,
        LAYOUT_ID
    );
    xml.push_str("<p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>");
    xml.push_str("</p:sldMaster>");
    xml
}

fn blank_layout_xml() -> String {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="blank" preserve="1">"#,
        NS_DRAWINGML, NS_RELATIONSHIPS, NS_PRESENTATIONML
    );
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    xml.push_str(SP_TREE_HEADER);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    xml
}

/// Theme whose accent colours are the deck palette.
fn theme_xml(theme: &DeckTheme) -> String {
    let palette = &theme.palette;
    let font = escape(&theme.font_family);
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<a:theme xmlns:a="{}" name="Charter">"#, NS_DRAWINGML);
    xml.push_str(r#"<a:themeElements><a:clrScheme name="Charter">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    let scheme = [
        ("dk2", palette.text),
        ("lt2", palette.light),
        ("accent1", palette.primary),
        ("accent2", palette.secondary),
        ("accent3", palette.accent),
        ("accent4", palette.light),
        ("accent5", palette.grid),
        ("accent6", palette.text),
        ("hlink", palette.secondary),
        ("folHlink", palette.accent),
    ];
    for (name, color) in scheme {
        let _ = write!(xml, r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, name, color.to_hex());
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Charter">"#);
    for kind in ["majorFont", "minorFont"] {
        let _ = write!(
            xml,
            r#"<a:{0}><a:latin typeface="{1}"/><a:ea typeface="{1}"/><a:cs typeface=""/></a:{0}>"#,
            kind, font
        );
    }
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Charter"><a:fillStyleLst>"#);
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        let _ = write!(
            xml,
            r#"<a:ln w="{}"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
            width
        );
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme>");
    xml.push_str("</a:themeElements></a:theme>");
    xml
}

fn slide_xml(slide: &Slide, font_family: &str) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_DRAWINGML, NS_RELATIONSHIPS, NS_PRESENTATIONML
    );
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(SP_TREE_HEADER);

    // IDs: 1 = group, shapes from 2.
    for (index, shape) in slide.shapes().iter().enumerate() {
        let shape_id = index + 2;
        match shape {
            Shape::TextBox {
                frame,
                paragraphs,
                anchor,
                wrap,
            } => write_text_box(&mut xml, shape_id, frame, paragraphs, *anchor, *wrap, font_family),
            Shape::Rectangle { frame, fill } => write_rectangle(&mut xml, shape_id, frame, *fill),
            Shape::Table(table) => write_table(&mut xml, shape_id, table, font_family),
        }
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

fn write_xfrm(xml: &mut String, frame: &Frame) {
    let _ = write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    );
}

fn write_text_box(
    xml: &mut String,
    shape_id: usize,
    frame: &Frame,
    paragraphs: &[TextParagraph],
    anchor: Anchor,
    wrap: bool,
    font_family: &str,
) {
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{0}" name="TextBox {0}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#,
        shape_id
    );
    write_xfrm(xml, frame);
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

    let _ = write!(
        xml,
        r#"<p:txBody><a:bodyPr wrap="{}" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
        if wrap { "square" } else { "none" },
        anchor_value(anchor)
    );
    if paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    for paragraph in paragraphs {
        xml.push_str("<a:p>");
        match paragraph.bullet {
            Some(glyph) => {
                let _ = write!(
                    xml,
                    r#"<a:pPr marL="342900" indent="-342900" algn="{}"><a:spcBef><a:spcPts val="600"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="{}"/></a:pPr>"#,
                    align_value(paragraph.alignment),
                    escape(glyph.encode_utf8(&mut [0; 4]))
                );
            }
            None => {
                let _ = write!(
                    xml,
                    r#"<a:pPr algn="{}"><a:buNone/></a:pPr>"#,
                    align_value(paragraph.alignment)
                );
            }
        }
        write_run(xml, &paragraph.text, &paragraph.font, font_family);
        xml.push_str("</a:p>");
    }
    xml.push_str("</p:txBody></p:sp>");
}

fn write_rectangle(xml: &mut String, shape_id: usize, frame: &Frame, fill: Color) {
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{0}" name="Rectangle {0}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>"#,
        shape_id
    );
    write_xfrm(xml, frame);
    let _ = write!(
        xml,
        r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:ln><a:noFill/></a:ln></p:spPr></p:sp>"#,
        fill.to_hex()
    );
}

fn write_table(xml: &mut String, shape_id: usize, table: &TableShape, font_family: &str) {
    let _ = write!(
        xml,
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{0}" name="Table {0}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr>"#,
        shape_id
    );
    let frame = &table.frame;
    let _ = write!(
        xml,
        r#"<p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    );
    xml.push_str(r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl>"#);
    xml.push_str(r#"<a:tblPr firstRow="1"/><a:tblGrid>"#);
    for width in &table.column_widths {
        let _ = write!(xml, r#"<a:gridCol w="{}"/>"#, width);
    }
    xml.push_str("</a:tblGrid>");

    write_table_row(xml, table, &table.headers, true, font_family);
    for row in &table.rows {
        write_table_row(xml, table, row, false, font_family);
    }
    xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
}

fn write_table_row(
    xml: &mut String,
    table: &TableShape,
    cells: &[String],
    header: bool,
    font_family: &str,
) {
    let (font, align) = if header {
        (&table.header_font, Alignment::Center)
    } else {
        (&table.body_font, Alignment::Left)
    };
    let grid = table.grid.to_hex();

    let _ = write!(xml, r#"<a:tr h="{}">"#, table.row_height);
    for cell in cells {
        xml.push_str("<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>");
        let _ = write!(xml, r#"<a:p><a:pPr algn="{}"/>"#, align_value(align));
        write_run(xml, cell, font, font_family);
        xml.push_str("</a:p></a:txBody>");
        xml.push_str(r#"<a:tcPr marL="91440" marR="91440" marT="45720" marB="45720" anchor="ctr">"#);
        for side in ["lnL", "lnR", "lnT", "lnB"] {
            let _ = write!(
                xml,
                r#"<a:{0} w="{1}"><a:solidFill><a:srgbClr val="{2}"/></a:solidFill></a:{0}>"#,
                side, GRID_LINE_EMU, grid
            );
        }
        if header {
            let _ = write!(
                xml,
                r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
                table.header_fill.to_hex()
            );
        } else {
            xml.push_str("<a:noFill/>");
        }
        xml.push_str("</a:tcPr></a:tc>");
    }
    xml.push_str("</a:tr>");
}

fn write_run(xml: &mut String, text: &str, font: &FontSpec, font_family: &str) {
    let family = escape(font_family);
    let _ = write!(
        xml,
        r#"<a:r><a:rPr lang="zh-TW" altLang="en-US" sz="{}" b="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{3}"/><a:ea typeface="{3}"/></a:rPr><a:t>{4}</a:t></a:r>"#,
        (font.size * 100.0).round() as i64,
        if font.bold { 1 } else { 0 },
        font.color.to_hex(),
        family,
        escape(text)
    );
}

fn anchor_value(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Top => "t",
        Anchor::Middle => "ctr",
    }
}

fn align_value(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "l",
        Alignment::Center => "ctr",
        Alignment::Right => "r",
        Alignment::Justify => "just",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn properties() -> DocProperties {
        DocProperties {
            title: "Deck".to_string(),
            creator: "tests".to_string(),
            application: "charter-doc-creator".to_string(),
        }
    }

    fn sample_deck() -> Deck {
        let mut deck = Deck::new(DeckTheme::default());
        deck.add_title_slide("客戶 & 風險", "subtitle");
        deck.add_content_slide("Scope", &["one", "two"]);
        deck.add_table_slide("Plan", &["a", "b"], &[vec!["1", "2"]])
            .unwrap();
        deck
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn package_lists_every_slide() {
        let bytes = deck_to_bytes(&sample_deck(), &properties()).unwrap();
        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 3);
        assert!(presentation.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide3.xml"));
    }

    #[test]
    fn slide_text_is_escaped_and_wrapped() {
        let bytes = deck_to_bytes(&sample_deck(), &properties()).unwrap();
        let title = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(title.contains("<a:t>客戶 &amp; 風險</a:t>"));
        assert!(title.contains(r#"wrap="square""#));
        assert!(title.contains(r#"algn="ctr""#));

        let content = read_part(&bytes, "ppt/slides/slide2.xml");
        assert_eq!(content.matches(r#"<a:buChar char="•"/>"#).count(), 2);
    }

    #[test]
    fn table_slide_has_grid_and_header_fill() {
        let bytes = deck_to_bytes(&sample_deck(), &properties()).unwrap();
        let xml = read_part(&bytes, "ppt/slides/slide3.xml");
        assert_eq!(xml.matches("<a:gridCol ").count(), 2);
        assert_eq!(xml.matches("<a:tr ").count(), 2);
        assert!(xml.contains(r#"<a:srgbClr val="D5E8F0"/>"#));
    }

    #[test]
    fn output_is_reproducible() {
        let a = deck_to_bytes(&sample_deck(), &properties()).unwrap();
        let b = deck_to_bytes(&sample_deck(), &properties()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("deck.pptx");
        assert!(write_deck(&sample_deck(), &properties(), &path).is_err());
    }
}
