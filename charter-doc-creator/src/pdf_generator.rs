//! Paginated PDF rendering of a report story
//!
//! Flowables are laid out top to bottom inside the page margins. Paragraphs
//! split across pages line by line, table rows move to the next page whole,
//! and a page break always closes the current page.

use anyhow::{anyhow, Context, Result};
use flate2::{write::ZlibEncoder, Compression};
use log::{debug, info};
use lopdf::{
    content::{Content, Operation},
    Dictionary, Document, Object, ObjectId, Stream, StringFormat,
};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use crate::fonts::{winansi_byte, FontContext, FontFace, TrueTypeFace};
use crate::story::{Flowable, Paragraph, Span, Story, Table};
use crate::styles::{Alignment, Color, ParagraphStyle, VerticalAlign};
use crate::typography::{FormattedLine, TextLayoutEngine};

const PRODUCER: &str = "charter-doc-creator";

/// What a finished render looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfSummary {
    pub page_count: usize,
    pub font_name: String,
    pub builtin_font: bool,
}

/// Report PDF generator
pub struct ReportPdfGenerator {
    layout_engine: TextLayoutEngine,
    document: Document,
    pages_id: ObjectId,
    // Resource name -> object id reserved up front, filled in by `write_fonts`.
    font_objects: Vec<(&'static str, ObjectId)>,
    used_chars: BTreeSet<char>,
    operations: Vec<Operation>,
    // Distance from the top of the content area.
    cursor: f32,
    page_has_content: bool,
    page_count: usize,
}

// Geometry of one line box.
struct LineBox {
    x: f32,
    width: f32,
    top: f32,
    leading: f32,
    font_size: f32,
    color: Color,
    alignment: Alignment,
}

impl ReportPdfGenerator {
    pub fn new(font_context: FontContext) -> Self {
        Self {
            layout_engine: TextLayoutEngine::new(font_context),
            document: Document::with_version("1.5"),
            font_objects: Vec::new(),
            used_chars: BTreeSet::new(),
            operations: Vec::new(),
            cursor: 0.0,
            page_has_content: false,
            page_count: 0,
            pages_id: (0, 0), // Will be set properly in initialize_document
        }
    }

    fn fonts(&self) -> &FontContext {
        self.layout_engine.font_context()
    }

    /// Lay out `story` into pages. Call once per generator.
    pub fn render(&mut self, story: &Story) -> Result<PdfSummary> {
        self.initialize_document(story)?;

        for flowable in story.flowables() {
            match flowable {
                Flowable::Paragraph(paragraph) => {
                    self.draw_paragraph(paragraph, story.styles().get(paragraph.style))?
                }
                Flowable::Spacer { height } => self.add_space(*height)?,
                // A page already closed by overflow is not closed again.
                Flowable::PageBreak if !self.page_has_content && self.page_count > 0 => {}
                Flowable::PageBreak => self.finish_page()?,
                Flowable::Table(table) => self.draw_table(table)?,
            }
        }
        if self.page_has_content || self.page_count == 0 {
            self.finish_page()?;
        }

        self.write_fonts()?;

        let face = &self.fonts().face;
        let summary = PdfSummary {
            page_count: self.get_page_count()?,
            font_name: face.name().to_string(),
            builtin_font: face.is_builtin(),
        };
        info!(
            "Laid out {} flowables on {} pages using {}",
            story.len(),
            summary.page_count,
            summary.font_name
        );
        Ok(summary)
    }

    /// Initialize PDF document with page tree, metadata and font slots
    fn initialize_document(&mut self, story: &Story) -> Result<()> {
        let resource_names: &[&'static str] = match self.fonts().face {
            FontFace::TrueType(_) => &["F1"],
            FontFace::BuiltinHelvetica => &["F1", "F2"],
        };
        for name in resource_names {
            let id = self.document.new_object_id();
            self.font_objects.push((*name, id));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Kids", Object::Array(vec![]));
        pages_dict.set("Count", Object::Integer(0));
        let pages_id = self.document.add_object(Object::Dictionary(pages_dict));

        let mut info_dict = Dictionary::new();
        info_dict.set("Producer", Object::string_literal(PRODUCER));
        if let Some(title) = story
            .paragraphs()
            .find(|p| p.style == crate::styles::TextStyle::Title)
        {
            info_dict.set("Title", pdf_text_string(&title.text()));
        }
        let info_id = self.document.add_object(Object::Dictionary(info_dict));

        let mut catalog_dict = Dictionary::new();
        catalog_dict.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog_dict.set("Pages", Object::Reference(pages_id));
        let catalog_id = self.document.add_object(Object::Dictionary(catalog_dict));

        self.document.trailer.set(b"Root".to_vec(), Object::Reference(catalog_id));
        self.document.trailer.set(b"Info".to_vec(), Object::Reference(info_id));

        self.pages_id = pages_id;
        Ok(())
    }

    fn content_height(&self) -> f32 {
        self.fonts().content_area().3
    }

    fn add_space(&mut self, height: f32) -> Result<()> {
        // Space at the top of a page is swallowed.
        if !self.page_has_content {
            return Ok(());
        }
        self.cursor += height;
        if self.cursor > self.content_height() {
            self.finish_page()?;
        }
        Ok(())
    }

    fn draw_paragraph(&mut self, paragraph: &Paragraph, style: &ParagraphStyle) -> Result<()> {
        let (left, _, width, height) = self.fonts().content_area();

        if self.page_has_content {
            self.cursor += style.space_before;
        }

        let spans: Vec<Span> = paragraph
            .spans
            .iter()
            .map(|s| Span {
                text: s.text.clone(),
                bold: s.bold || style.bold,
            })
            .collect();
        let text_width = width - style.left_indent;
        let lines = self
            .layout_engine
            .layout_spans(&spans, style.font_size, text_width);

        for (index, line) in lines.iter().enumerate() {
            if self.page_has_content && self.cursor + style.leading > height {
                self.finish_page()?;
            }
            let line_box = LineBox {
                x: left + style.left_indent,
                width: text_width,
                top: self.cursor,
                leading: style.leading,
                font_size: style.font_size,
                color: style.color,
                alignment: style.alignment,
            };
            if index == 0 {
                if let Some(bullet) = style.bullet {
                    let glyph = bullet.glyph.to_string();
                    let glyph_width =
                        self.layout_engine
                            .font_context_mut()
                            .text_width(&glyph, style.font_size, false);
                    let marker = FormattedLine {
                        runs: vec![crate::typography::TextRun {
                            text: glyph,
                            bold: false,
                            width: glyph_width,
                        }],
                        width: glyph_width,
                        last_in_paragraph: true,
                    };
                    let marker_box = LineBox {
                        x: left + bullet.indent,
                        width: glyph_width,
                        alignment: Alignment::Left,
                        ..line_box
                    };
                    self.draw_line(&marker, &marker_box);
                }
            }
            self.draw_line(line, &line_box);
            self.cursor += style.leading;
            self.page_has_content = true;
        }

        self.cursor += style.space_after;
        Ok(())
    }

    fn draw_table(&mut self, table: &Table) -> Result<()> {
        let style = table.style();
        let (left, _, width, height) = self.fonts().content_area();
        let widths = table.column_widths();
        let total: f32 = widths.iter().sum();
        let x0 = left + (width - total) / 2.0;
        let leading = style.leading();
        let inner_pad = 2.0 * style.padding_horizontal;

        let mut laid_rows = Vec::with_capacity(table.row_count());
        for (r, row) in table.rows().iter().enumerate() {
            let mut cells = Vec::with_capacity(row.len());
            let mut max_lines = 1;
            for (c, cell) in row.iter().enumerate() {
                let lines = self.layout_engine.layout_text(
                    cell,
                    style.font_size,
                    style.is_shaded(r, c),
                    (widths[c] - inner_pad).max(1.0),
                );
                max_lines = max_lines.max(lines.len());
                cells.push(lines);
            }
            let row_height = max_lines as f32 * leading + style.padding_top + style.padding_bottom;
            laid_rows.push((row_height, cells));
        }

        for (r, (row_height, cells)) in laid_rows.iter().enumerate() {
            if self.page_has_content && self.cursor + row_height > height {
                self.finish_page()?;
            }
            let top = self.cursor;
            let mut x = x0;
            for (c, lines) in cells.iter().enumerate() {
                let cell_width = widths[c];
                if style.is_shaded(r, c) {
                    self.fill_rect(x, top, cell_width, *row_height, style.fill);
                }

                let block = lines.len() as f32 * leading;
                let offset = match style.valign {
                    VerticalAlign::Top => style.padding_top,
                    VerticalAlign::Middle => {
                        style.padding_top
                            + (row_height - style.padding_top - style.padding_bottom - block) / 2.0
                    }
                };
                for (i, line) in lines.iter().enumerate() {
                    let line_box = LineBox {
                        x: x + style.padding_horizontal,
                        width: cell_width - inner_pad,
                        top: top + offset + i as f32 * leading,
                        leading,
                        font_size: style.font_size,
                        color: style.text_color,
                        alignment: style.cell_alignment(r, c),
                    };
                    self.draw_line(line, &line_box);
                }

                self.stroke_rect(x, top, cell_width, *row_height, style.grid_color, style.grid_width);
                x += cell_width;
            }
            self.cursor += row_height;
            self.page_has_content = true;
        }

        debug!(
            "table {}x{} ends at {:.1}pt on page {}",
            table.row_count(),
            table.column_count(),
            self.cursor,
            self.page_count + 1
        );
        Ok(())
    }

    // Convert a distance from the content top to a PDF y coordinate.
    fn pdf_y(&self, from_top: f32) -> f32 {
        let fonts = self.fonts();
        fonts.page_height - fonts.margin - from_top
    }

    fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Color) {
        let [r, g, b] = color.to_unit_rgb();
        let y = self.pdf_y(top + height);
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn stroke_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Color, line_width: f32) {
        let [r, g, b] = color.to_unit_rgb();
        let y = self.pdf_y(top + height);
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![line_width.into()]),
            Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn draw_line(&mut self, line: &FormattedLine, line_box: &LineBox) {
        if line.runs.is_empty() {
            return;
        }
        let size = line_box.font_size;
        let baseline = line_box.top + (line_box.leading - size) / 2.0 + size * 0.8;
        let y = self.pdf_y(baseline);

        let slack = (line_box.width - line.width).max(0.0);
        let chars = line.char_count();
        let (mut x, gap) = match line_box.alignment {
            Alignment::Left => (line_box.x, 0.0),
            Alignment::Center => (line_box.x + slack / 2.0, 0.0),
            Alignment::Right => (line_box.x + slack, 0.0),
            Alignment::Justify if !line.last_in_paragraph && chars > 1 => {
                (line_box.x, slack / (chars - 1) as f32)
            }
            Alignment::Justify => (line_box.x, 0.0),
        };

        let [r, g, b] = line_box.color.to_unit_rgb();
        self.operations.push(Operation::new("BT", vec![]));
        self.operations
            .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        for run in &line.runs {
            let resource = self.fonts().face.resource_name(run.bold);
            self.operations.push(Operation::new(
                "Tf",
                vec![Object::Name(resource.as_bytes().to_vec()), size.into()],
            ));
            self.operations.push(Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    x.into(),
                    y.into(),
                ],
            ));
            let tj = self.build_tj_array(&run.text, size, gap);
            self.operations
                .push(Operation::new("TJ", vec![Object::Array(tj)]));
            x += run.width + gap * run.text.chars().count() as f32;
        }
        self.operations.push(Operation::new("ET", vec![]));
    }

    /// Build a TJ array; `gap` is extra space in points after each glyph
    /// (used for justification).
    fn build_tj_array(&mut self, text: &str, size: f32, gap: f32) -> Vec<Object> {
        if gap == 0.0 {
            return vec![self.encode_text(text)];
        }
        // TJ offsets are in thousandths of text space; negative moves right.
        let adjust = -gap * 1000.0 / size;
        let chars: Vec<char> = text.chars().collect();
        let mut tj = Vec::with_capacity(chars.len() * 2);
        let mut buf = [0u8; 4];
        for (i, ch) in chars.iter().enumerate() {
            tj.push(self.encode_text(ch.encode_utf8(&mut buf)));
            if i + 1 < chars.len() {
                tj.push(Object::Real(adjust));
            }
        }
        tj
    }

    fn encode_text(&mut self, text: &str) -> Object {
        if self.fonts().face.is_builtin() {
            let bytes = text
                .chars()
                .map(|ch| winansi_byte(ch).unwrap_or(b'?'))
                .collect();
            return Object::String(bytes, StringFormat::Literal);
        }

        // CIDs are UTF-16 code units (Identity-H).
        let mut utf16be = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            self.used_chars.insert(ch);
            for unit in ch.encode_utf16(&mut [0; 2]).iter() {
                utf16be.extend_from_slice(&unit.to_be_bytes());
            }
        }
        Object::String(utf16be, StringFormat::Hexadecimal)
    }

    /// Close the current page and start a new one.
    fn finish_page(&mut self) -> Result<()> {
        let page_id = self.document.new_object_id();
        let content = Content {
            operations: std::mem::take(&mut self.operations),
        };

        let fonts = self.fonts();
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set("Resources", self.create_resources_dict());
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(fonts.page_width),
                Object::Real(fonts.page_height),
            ]),
        );

        let content_stream = Stream::new(Dictionary::new(), content.encode()?);
        let content_id = self.document.add_object(content_stream);
        page_dict.set("Contents", Object::Reference(content_id));

        self.document
            .objects
            .insert(page_id, Object::Dictionary(page_dict));
        self.add_page_to_tree(page_id)?;

        self.page_count += 1;
        self.cursor = 0.0;
        self.page_has_content = false;
        Ok(())
    }

    fn create_resources_dict(&self) -> Object {
        let mut font_dict = Dictionary::new();
        for (name, id) in &self.font_objects {
            font_dict.set(*name, Object::Reference(*id));
        }
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(font_dict));
        Object::Dictionary(resources)
    }

    /// Add page to pages tree
    fn add_page_to_tree(&mut self, page_id: ObjectId) -> Result<()> {
        let pages_obj = self.document.get_object_mut(self.pages_id)?;
        if let Object::Dictionary(ref mut pages_dict) = pages_obj {
            let kids = pages_dict.get_mut(b"Kids")?.as_array_mut()?;
            kids.push(Object::Reference(page_id));
            let count = kids.len() as i64;
            pages_dict.set("Count", Object::Integer(count));
            Ok(())
        } else {
            Err(anyhow!("Pages object is not a dictionary"))
        }
    }

    fn get_page_count(&self) -> Result<usize> {
        let pages_obj = self.document.get_object(self.pages_id)?;
        if let Object::Dictionary(ref pages_dict) = pages_obj {
            Ok(pages_dict.get(b"Kids")?.as_array()?.len())
        } else {
            Ok(0)
        }
    }

    /// Fill the reserved font slots. Runs after layout so the Unicode font
    /// only carries widths for characters that were actually drawn.
    fn write_fonts(&mut self) -> Result<()> {
        let objects = self.font_objects.clone();
        let truetype = match &self.fonts().face {
            FontFace::TrueType(face) => Some(face.as_ref().clone()),
            FontFace::BuiltinHelvetica => None,
        };

        match truetype {
            Some(face) => {
                let (_, id) = objects
                    .first()
                    .copied()
                    .ok_or_else(|| anyhow!("no font slot reserved"))?;
                let type0 = self.create_type0_font(&face)?;
                self.document.objects.insert(id, type0);
            }
            None => {
                for (name, id) in objects {
                    let base = if name == "F2" { "Helvetica-Bold" } else { "Helvetica" };
                    let mut font_dict = Dictionary::new();
                    font_dict.set("Type", Object::Name(b"Font".to_vec()));
                    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
                    font_dict.set("BaseFont", Object::Name(base.as_bytes().to_vec()));
                    font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
                    self.document
                        .objects
                        .insert(id, Object::Dictionary(font_dict));
                }
            }
        }
        Ok(())
    }

    /// Composite Type0 font with a CIDFontType2 descendant (Identity-H).
    fn create_type0_font(&mut self, face: &TrueTypeFace) -> Result<Object> {
        let base_font_name = sanitize_pdf_font_name(&face.name);
        let (ascent, descent) = face
            .font
            .horizontal_line_metrics(1000.0)
            .map(|m| (m.ascent.round() as i64, m.descent.round() as i64))
            .unwrap_or((880, -120));

        let mut font_descriptor = Dictionary::new();
        font_descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
        font_descriptor.set("FontName", Object::Name(base_font_name.clone().into_bytes()));
        font_descriptor.set("Flags", Object::Integer(4));
        font_descriptor.set(
            "FontBBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(descent),
                Object::Integer(1000),
                Object::Integer(ascent),
            ]),
        );
        font_descriptor.set("ItalicAngle", Object::Integer(0));
        font_descriptor.set("Ascent", Object::Integer(ascent));
        font_descriptor.set("Descent", Object::Integer(descent));
        font_descriptor.set("CapHeight", Object::Integer(700));
        font_descriptor.set("StemV", Object::Integer(80));

        let embedded = match create_embeddable_font_stream(face)? {
            Some(stream) => {
                let font_stream_id = self.document.add_object(stream);
                font_descriptor.set("FontFile2", Object::Reference(font_stream_id));
                true
            }
            None => false,
        };
        let font_descriptor_id = self.document.add_object(Object::Dictionary(font_descriptor));

        let mut cidfont = Dictionary::new();
        cidfont.set("Type", Object::Name(b"Font".to_vec()));
        cidfont.set("Subtype", Object::Name(b"CIDFontType2".to_vec()));
        cidfont.set("BaseFont", Object::Name(base_font_name.clone().into_bytes()));
        cidfont.set("CIDSystemInfo", {
            let mut d = Dictionary::new();
            d.set("Registry", Object::string_literal("Adobe"));
            d.set("Ordering", Object::string_literal("Identity"));
            d.set("Supplement", Object::Integer(0));
            Object::Dictionary(d)
        });
        cidfont.set("FontDescriptor", Object::Reference(font_descriptor_id));
        cidfont.set("DW", Object::Integer(1000));
        cidfont.set("W", Object::Array(self.glyph_widths()));
        if embedded {
            let map_id = self
                .document
                .add_object(create_cid_to_gid_map_stream(face));
            cidfont.set("CIDToGIDMap", Object::Reference(map_id));
        } else {
            // Not embedded (TTC/OTF): let the viewer resolve with identity mapping.
            cidfont.set("CIDToGIDMap", Object::Name(b"Identity".to_vec()));
        }
        let cidfont_id = self.document.add_object(Object::Dictionary(cidfont));

        let tounicode_id = self
            .document
            .add_object(create_identity_tounicode_cmap_stream());

        let mut type0 = Dictionary::new();
        type0.set("Type", Object::Name(b"Font".to_vec()));
        type0.set("Subtype", Object::Name(b"Type0".to_vec()));
        type0.set("BaseFont", Object::Name(base_font_name.into_bytes()));
        type0.set("Encoding", Object::Name(b"Identity-H".to_vec()));
        type0.set("DescendantFonts", Object::Array(vec![Object::Reference(cidfont_id)]));
        type0.set("ToUnicode", Object::Reference(tounicode_id));
        Ok(Object::Dictionary(type0))
    }

    // `W` entries: `cid [width]` for every BMP character drawn.
    fn glyph_widths(&mut self) -> Vec<Object> {
        let chars: Vec<char> = self.used_chars.iter().copied().collect();
        let fonts = self.layout_engine.font_context_mut();
        let mut widths = Vec::with_capacity(chars.len() * 2);
        for ch in chars {
            let cid = ch as u32;
            if cid > 0xFFFF {
                continue;
            }
            let width = (fonts.char_advance(ch, false) * 1000.0).round() as i64;
            widths.push(Object::Integer(cid as i64));
            widths.push(Object::Array(vec![Object::Integer(width)]));
        }
        widths
    }

    pub fn save(&mut self, output_path: &Path) -> Result<()> {
        self.document.compress();
        self.document
            .save(output_path)
            .with_context(|| format!("writing {}", output_path.display()))?;
        Ok(())
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.document.compress();
        let mut out = Vec::new();
        self.document.save_to(&mut out)?;
        Ok(out)
    }
}

fn sanitize_pdf_font_name(raw: &str) -> String {
    let out: String = raw
        .chars()
        .filter_map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                Some(ch)
            } else if ch.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect();
    if out.is_empty() {
        "CJKFont".to_string()
    } else {
        out
    }
}

/// Text string for the document info dictionary (UTF-16BE with BOM when
/// the text is not plain ASCII).
fn pdf_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn create_identity_tounicode_cmap_stream() -> Object {
    let cmap = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0000> <FFFF> <0000>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end"
    .to_vec();
    Object::Stream(Stream::new(Dictionary::new(), cmap))
}

fn create_cid_to_gid_map_stream(face: &TrueTypeFace) -> Object {
    // CID equals the UTF-16 BMP code unit used in content streams.
    let mut map = vec![0u8; 65536 * 2];
    for cid in 0u32..=0xFFFF {
        if let Some(ch) = char::from_u32(cid) {
            let gid = face.font.lookup_glyph_index(ch);
            let offset = (cid as usize) * 2;
            map[offset..offset + 2].copy_from_slice(&gid.to_be_bytes());
        }
    }
    Object::Stream(Stream::new(Dictionary::new(), map))
}

fn create_embeddable_font_stream(face: &TrueTypeFace) -> Result<Option<Object>> {
    let is_ttf = face
        .path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf"));
    // FontFile2 only takes plain TrueType; collections and CFF fonts are referenced.
    if !is_ttf || face.data.is_empty() {
        return Ok(None);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&face.data)?;
    let compressed = encoder.finish()?;

    let mut stream_dict = Dictionary::new();
    stream_dict.set("Length1", Object::Integer(face.data.len() as i64));
    stream_dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    Ok(Some(Object::Stream(Stream::new(stream_dict, compressed))))
}

/// Render `story` with `font_context` and return the PDF bytes.
pub fn render_report_pdf(story: &Story, font_context: FontContext) -> Result<(Vec<u8>, PdfSummary)> {
    let mut generator = ReportPdfGenerator::new(font_context);
    let summary = generator.render(story)?;
    Ok((generator.to_bytes()?, summary))
}

/// Resolve fonts, render `story` and write it to `output_path`.
pub fn create_report_pdf(story: &Story, output_path: &Path) -> Result<PdfSummary> {
    let font_context = FontContext::initialize_fonts();
    let mut generator = ReportPdfGenerator::new(font_context);
    let summary = generator.render(story)?;
    generator.save(output_path)?;
    Ok(summary)
}
