//! WordprocessingML rendering of a report [`Story`]
//!
//! Paragraph styles come straight from the story's [`StyleSheet`]. Lengths
//! are written in twentieths of a point (DXA); font sizes in half points.

use anyhow::{Context, Result};
use log::info;
use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::fonts::{A4_HEIGHT, A4_WIDTH};
use crate::ooxml::{
    escape, ContentTypes, DocProperties, PackageWriter, Relationships, REL_OFFICE_DOCUMENT,
    REL_STYLES, XML_DECLARATION,
};
use crate::story::{Flowable, Paragraph, Story, Table};
use crate::styles::{Alignment, ParagraphStyle, StyleSheet, TextStyle, VerticalAlign};

const NS_WORDML: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
const REL_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";

const LATIN_FONT: &str = "Arial";
const EAST_ASIAN_FONT: &str = "Microsoft JhengHei";
/// Half points (12pt).
const DEFAULT_FONT_SIZE: u32 = 24;
const PAGE_MARGIN_POINTS: f32 = 72.0;

const BULLET_NUM_ID: u32 = 1;

fn dxa(points: f32) -> i64 {
    (points * 20.0).round() as i64
}

fn half_points(points: f32) -> i64 {
    (points * 2.0).round() as i64
}

fn style_id(style: TextStyle) -> &'static str {
    match style {
        TextStyle::Title => "Title",
        TextStyle::Heading1 => "Heading1",
        TextStyle::Heading2 => "Heading2",
        TextStyle::Heading3 => "Heading3",
        TextStyle::Body => "Normal",
        TextStyle::Bullet => "ListBullet",
    }
}

fn style_display_name(style: TextStyle) -> &'static str {
    match style {
        TextStyle::Title => "Title",
        TextStyle::Heading1 => "heading 1",
        TextStyle::Heading2 => "heading 2",
        TextStyle::Heading3 => "heading 3",
        TextStyle::Body => "Normal",
        TextStyle::Bullet => "List Bullet",
    }
}

fn jc_value(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    }
}

/// Serialise `story` into DOCX bytes.
pub fn story_to_docx(story: &Story, properties: &DocProperties) -> Result<Vec<u8>> {
    let mut content_types = ContentTypes::new();
    content_types
        .add_override("/word/document.xml", CT_DOCUMENT)
        .add_override("/word/styles.xml", CT_STYLES)
        .add_override("/word/numbering.xml", CT_NUMBERING);

    let mut root_rels = Relationships::new();
    root_rels.add(REL_OFFICE_DOCUMENT, "word/document.xml");
    properties.register(&mut content_types, &mut root_rels);

    let mut document_rels = Relationships::new();
    document_rels.add(REL_STYLES, "styles.xml");
    document_rels.add(REL_NUMBERING, "numbering.xml");

    let mut package = PackageWriter::new();
    package.add_xml("[Content_Types].xml", &content_types.to_xml())?;
    package.add_xml("_rels/.rels", &root_rels.to_xml())?;
    package.add_xml("docProps/core.xml", &properties.core_xml())?;
    package.add_xml("docProps/app.xml", &properties.app_xml())?;
    package.add_xml("word/document.xml", &document_xml(story))?;
    package.add_xml("word/_rels/document.xml.rels", &document_rels.to_xml())?;
    package.add_xml("word/styles.xml", &styles_xml(story.styles()))?;
    package.add_xml("word/numbering.xml", &numbering_xml(&story.styles().bullet))?;
    package.into_bytes()
}

/// Write `story` as DOCX to `output_path`. The parent directory must exist.
pub fn write_docx(story: &Story, properties: &DocProperties, output_path: &Path) -> Result<()> {
    let bytes = story_to_docx(story, properties)?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("writing {}", output_path.display()))?;
    info!(
        "Wrote {} flowables ({} bytes) to {}",
        story.len(),
        bytes.len(),
        output_path.display()
    );
    Ok(())
}

fn document_xml(story: &Story) -> String {
    let mut xml = String::with_capacity(64 * 1024);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<w:document xmlns:w="{}"><w:body>"#, NS_WORDML);

    let mut ends_with_table = false;
    for flowable in story.flowables() {
        ends_with_table = matches!(flowable, Flowable::Table(_));
        match flowable {
            Flowable::Paragraph(paragraph) => write_paragraph(&mut xml, paragraph),
            Flowable::Spacer { height } => {
                let _ = write!(
                    xml,
                    r#"<w:p><w:pPr><w:spacing w:before="{}" w:after="0"/></w:pPr></w:p>"#,
                    dxa(*height)
                );
            }
            Flowable::PageBreak => xml.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#),
            Flowable::Table(table) => write_table(&mut xml, table),
        }
    }
    // A table may not be the last block before the section properties.
    if ends_with_table {
        xml.push_str("<w:p/>");
    }

    let _ = write!(
        xml,
        r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#,
        dxa(A4_WIDTH),
        dxa(A4_HEIGHT),
        m = dxa(PAGE_MARGIN_POINTS)
    );
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    xml.push_str("<w:p>");
    if paragraph.style != TextStyle::Body {
        let _ = write!(
            xml,
            r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
            style_id(paragraph.style)
        );
    }
    for span in &paragraph.spans {
        write_run(xml, &span.text, span.bold, None);
    }
    xml.push_str("</w:p>");
}

/// One run; `\n` becomes a line break.
fn write_run(xml: &mut String, text: &str, bold: bool, size: Option<f32>) {
    xml.push_str("<w:r>");
    if bold || size.is_some() {
        xml.push_str("<w:rPr>");
        if bold {
            xml.push_str("<w:b/>");
        }
        if let Some(size) = size {
            let _ = write!(
                xml,
                r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
                half_points(size)
            );
        }
        xml.push_str("</w:rPr>");
    }
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            xml.push_str("<w:br/>");
        }
        let _ = write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, escape(line));
    }
    xml.push_str("</w:r>");
}

fn write_table(xml: &mut String, table: &Table) {
    let style = table.style();
    let widths: Vec<i64> = table.column_widths().iter().map(|w| dxa(*w)).collect();
    let border = format!(
        r#"w:val="single" w:sz="{}" w:space="0" w:color="{}""#,
        (style.grid_width * 8.0).round() as i64,
        style.grid_color.to_hex()
    );
    let valign = match style.valign {
        VerticalAlign::Top => "top",
        VerticalAlign::Middle => "center",
    };

    xml.push_str("<w:tbl><w:tblPr>");
    let _ = write!(
        xml,
        r#"<w:tblW w:w="{}" w:type="dxa"/><w:jc w:val="center"/><w:tblLayout w:type="fixed"/>"#,
        widths.iter().sum::<i64>()
    );
    let _ = write!(
        xml,
        r#"<w:tblCellMar><w:top w:w="{}" w:type="dxa"/><w:left w:w="{h}" w:type="dxa"/><w:bottom w:w="{}" w:type="dxa"/><w:right w:w="{h}" w:type="dxa"/></w:tblCellMar>"#,
        dxa(style.padding_top),
        dxa(style.padding_bottom),
        h = dxa(style.padding_horizontal)
    );
    xml.push_str("</w:tblPr><w:tblGrid>");
    for width in &widths {
        let _ = write!(xml, r#"<w:gridCol w:w="{}"/>"#, width);
    }
    xml.push_str("</w:tblGrid>");

    for (r, row) in table.rows().iter().enumerate() {
        xml.push_str("<w:tr>");
        if r == 0 && table.has_header() {
            xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
        }
        for (c, cell) in row.iter().enumerate() {
            let shaded = style.is_shaded(r, c);
            let _ = write!(
                xml,
                r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/><w:tcBorders><w:top {b}/><w:left {b}/><w:bottom {b}/><w:right {b}/></w:tcBorders>"#,
                widths[c],
                b = border
            );
            if shaded {
                let _ = write!(
                    xml,
                    r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
                    style.fill.to_hex()
                );
            }
            let _ = write!(xml, r#"<w:vAlign w:val="{}"/></w:tcPr>"#, valign);
            let _ = write!(
                xml,
                r#"<w:p><w:pPr><w:spacing w:before="0" w:after="0"/><w:jc w:val="{}"/></w:pPr>"#,
                jc_value(style.cell_alignment(r, c))
            );
            write_run(xml, cell, shaded, Some(style.font_size));
            xml.push_str("</w:p></w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
}

fn styles_xml(sheet: &StyleSheet) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<w:styles xmlns:w="{}">"#, NS_WORDML);
    let _ = write!(
        xml,
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{l}" w:hAnsi="{l}" w:eastAsia="{e}" w:cs="{l}"/><w:sz w:val="{s}"/><w:szCs w:val="{s}"/><w:lang w:val="en-US" w:eastAsia="zh-TW"/></w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>"#,
        l = LATIN_FONT,
        e = EAST_ASIAN_FONT,
        s = DEFAULT_FONT_SIZE
    );

    for category in [
        TextStyle::Body,
        TextStyle::Title,
        TextStyle::Heading1,
        TextStyle::Heading2,
        TextStyle::Heading3,
        TextStyle::Bullet,
    ] {
        write_style(&mut xml, category, sheet.get(category));
    }
    xml.push_str("</w:styles>");
    xml
}

fn write_style(xml: &mut String, category: TextStyle, style: &ParagraphStyle) {
    let is_default = category == TextStyle::Body;
    let _ = write!(
        xml,
        r#"<w:style w:type="paragraph"{} w:styleId="{}"><w:name w:val="{}"/>"#,
        if is_default { r#" w:default="1""# } else { "" },
        style_id(category),
        style_display_name(category)
    );
    if !is_default {
        xml.push_str(r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/>"#);
    }
    xml.push_str("<w:qFormat/><w:pPr>");
    if style.bullet.is_some() {
        let _ = write!(
            xml,
            r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="{}"/></w:numPr>"#,
            BULLET_NUM_ID
        );
    }
    let _ = write!(
        xml,
        r#"<w:spacing w:before="{}" w:after="{}" w:line="{}" w:lineRule="atLeast"/>"#,
        dxa(style.space_before),
        dxa(style.space_after),
        dxa(style.leading)
    );
    let _ = write!(xml, r#"<w:jc w:val="{}"/>"#, jc_value(style.alignment));
    if let Some(level) = style.outline_level {
        let _ = write!(xml, r#"<w:outlineLvl w:val="{}"/>"#, level);
    }
    xml.push_str("</w:pPr><w:rPr>");
    if style.bold {
        xml.push_str("<w:b/>");
    }
    let _ = write!(
        xml,
        r#"<w:color w:val="{c}"/><w:sz w:val="{s}"/><w:szCs w:val="{s}"/>"#,
        c = style.color.to_hex(),
        s = half_points(style.font_size)
    );
    xml.push_str("</w:rPr></w:style>");
}

/// A single-level bullet list whose indents mirror the bullet style.
fn numbering_xml(bullet_style: &ParagraphStyle) -> String {
    let (glyph, glyph_indent) = bullet_style
        .bullet
        .map(|b| (b.glyph, b.indent))
        .unwrap_or(('•', 0.0));
    let left = dxa(bullet_style.left_indent);
    let hanging = (left - dxa(glyph_indent)).max(0);

    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<w:numbering xmlns:w="{}">"#, NS_WORDML);
    let _ = write!(
        xml,
        r#"<w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="{}"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{}" w:hanging="{}"/></w:pPr></w:lvl></w:abstractNum>"#,
        escape(glyph.encode_utf8(&mut [0; 4])),
        left,
        hanging
    );
    let _ = write!(
        xml,
        r#"<w:num w:numId="{}"><w:abstractNumId w:val="0"/></w:num>"#,
        BULLET_NUM_ID
    );
    xml.push_str("</w:numbering>");
    xml
}
