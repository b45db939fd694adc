//! Style definitions shared by every renderer
//!
//! A [`StyleSheet`] maps each [`TextStyle`] category to one immutable
//! [`ParagraphStyle`]; paragraphs only carry the category, so every block of
//! a category renders from the same definition. Table styles travel with
//! their table.

use serde::{Serialize, Serializer};

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// `0xRRGGBB`.
    pub const fn hex(value: u32) -> Self {
        Color::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Upper-case `RRGGBB`, as OOXML wants it.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Components in 0.0..=1.0, as PDF colour operators want them.
    pub fn to_unit_rgb(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("#{}", self.to_hex()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    Top,
    Middle,
}

/// Categories of text a paragraph can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Title,
    Heading1,
    Heading2,
    Heading3,
    Body,
    Bullet,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletStyle {
    pub glyph: char,
    /// Offset of the bullet glyph from the left margin, in points.
    pub indent: f32,
}

/// Visual attributes for one category of text. Sizes are in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphStyle {
    pub name: String,
    pub font_size: f32,
    pub leading: f32,
    pub bold: bool,
    pub color: Color,
    pub alignment: Alignment,
    pub space_before: f32,
    pub space_after: f32,
    pub left_indent: f32,
    pub bullet: Option<BulletStyle>,
    /// Heading outline level (0 = top), used for document navigation.
    pub outline_level: Option<u8>,
}

impl ParagraphStyle {
    pub fn new(name: impl Into<String>, font_size: f32, leading: f32) -> Self {
        Self {
            name: name.into(),
            font_size,
            leading,
            bold: false,
            color: Color::BLACK,
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
            bullet: None,
            outline_level: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub fn indent(mut self, left: f32) -> Self {
        self.left_indent = left;
        self
    }

    pub fn bullet(mut self, glyph: char, indent: f32) -> Self {
        self.bullet = Some(BulletStyle { glyph, indent });
        self
    }

    pub fn outline_level(mut self, level: u8) -> Self {
        self.outline_level = Some(level);
        self
    }
}

/// One style per [`TextStyle`] category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleSheet {
    pub title: ParagraphStyle,
    pub heading1: ParagraphStyle,
    pub heading2: ParagraphStyle,
    pub heading3: ParagraphStyle,
    pub body: ParagraphStyle,
    pub bullet: ParagraphStyle,
}

impl StyleSheet {
    pub fn get(&self, style: TextStyle) -> &ParagraphStyle {
        match style {
            TextStyle::Title => &self.title,
            TextStyle::Heading1 => &self.heading1,
            TextStyle::Heading2 => &self.heading2,
            TextStyle::Heading3 => &self.heading3,
            TextStyle::Body => &self.body,
            TextStyle::Bullet => &self.bullet,
        }
    }
}

/// Which cells of a table get the shaded background and bold text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// First row is a header.
    HeaderRow,
    /// First column holds keys of a key/value table.
    KeyColumn,
}

/// Region rules applied uniformly across one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStyle {
    pub shading: Shading,
    pub fill: Color,
    pub text_color: Color,
    pub grid_color: Color,
    pub grid_width: f32,
    pub font_size: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub padding_horizontal: f32,
    pub valign: VerticalAlign,
    /// Alignment of the shaded region.
    pub header_align: Alignment,
    /// Alignment of every other cell, unless overridden per column.
    pub body_align: Alignment,
    /// Body columns that are centred instead of `body_align`.
    pub centered_columns: Vec<usize>,
}

impl TableStyle {
    pub fn new(shading: Shading, fill: Color, grid_color: Color) -> Self {
        Self {
            shading,
            fill,
            text_color: Color::BLACK,
            grid_color,
            grid_width: 0.5,
            font_size: 10.0,
            padding_top: 6.0,
            padding_bottom: 6.0,
            padding_horizontal: 6.0,
            valign: VerticalAlign::Middle,
            header_align: Alignment::Left,
            body_align: Alignment::Left,
            centered_columns: Vec::new(),
        }
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn padding(mut self, vertical: f32) -> Self {
        self.padding_top = vertical;
        self.padding_bottom = vertical;
        self
    }

    pub fn horizontal_padding(mut self, padding: f32) -> Self {
        self.padding_horizontal = padding;
        self
    }

    /// Grid line width in points.
    pub fn grid_width(mut self, width: f32) -> Self {
        self.grid_width = width;
        self
    }

    pub fn valign(mut self, valign: VerticalAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn header_align(mut self, alignment: Alignment) -> Self {
        self.header_align = alignment;
        self
    }

    pub fn center_columns(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.centered_columns.extend(columns);
        self
    }

    /// Whether the cell at (`row`, `col`) is in the shaded region.
    pub fn is_shaded(&self, row: usize, col: usize) -> bool {
        match self.shading {
            Shading::HeaderRow => row == 0,
            Shading::KeyColumn => col == 0,
        }
    }

    pub fn cell_alignment(&self, row: usize, col: usize) -> Alignment {
        if self.is_shaded(row, col) {
            self.header_align
        } else if self.centered_columns.contains(&col) {
            Alignment::Center
        } else {
            self.body_align
        }
    }

    /// Leading inside cells.
    pub fn leading(&self) -> f32 {
        self.font_size * 1.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_components() {
        let c = Color::hex(0x2E5090);
        assert_eq!((c.r, c.g, c.b), (0x2E, 0x50, 0x90));
        assert_eq!(c.to_hex(), "2E5090");
        assert_eq!(Color::WHITE.to_unit_rgb(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn header_row_regions() {
        let style = TableStyle::new(Shading::HeaderRow, Color::WHITE, Color::BLACK)
            .header_align(Alignment::Center)
            .center_columns([2, 3]);
        assert!(style.is_shaded(0, 4));
        assert!(!style.is_shaded(1, 0));
        assert_eq!(style.cell_alignment(0, 0), Alignment::Center);
        assert_eq!(style.cell_alignment(1, 0), Alignment::Left);
        assert_eq!(style.cell_alignment(1, 2), Alignment::Center);
    }

    #[test]
    fn key_column_regions() {
        let style = TableStyle::new(Shading::KeyColumn, Color::WHITE, Color::BLACK);
        assert!(style.is_shaded(3, 0));
        assert!(!style.is_shaded(0, 1));
    }
}
