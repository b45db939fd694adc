//! The report story: an ordered list of flowables
//!
//! Flowables are appended in document order and never reordered or removed.
//! Renderers walk the list front to back.

use serde::Serialize;

use crate::error::LayoutError;
use crate::styles::{StyleSheet, TableStyle, TextStyle};

/// A run of text with uniform weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            bold: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub style: TextStyle,
    pub spans: Vec<Span>,
}

impl Paragraph {
    pub fn new(style: TextStyle, text: impl Into<String>) -> Self {
        Paragraph {
            style,
            spans: vec![Span::plain(text)],
        }
    }

    pub fn rich(style: TextStyle, spans: Vec<Span>) -> Self {
        Paragraph { style, spans }
    }

    /// Concatenated text of every span.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A fixed grid of string cells. Row 0 is the header for
/// [`Shading::HeaderRow`](crate::styles::Shading::HeaderRow) tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    rows: Vec<Vec<String>>,
    /// In points.
    column_widths: Vec<f32>,
    style: TableStyle,
}

impl Table {
    /// A table with a header row. Every row must have exactly
    /// `headers.len()` cells.
    pub fn with_header(
        headers: &[&str],
        rows: &[&[&str]],
        column_widths: &[f32],
        style: TableStyle,
    ) -> Result<Self, LayoutError> {
        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(headers);
        grid.extend_from_slice(rows);
        Self::from_grid(&grid, headers.len(), column_widths, style)
    }

    /// A two-column key/value table without a header row.
    pub fn key_value(
        rows: &[&[&str]],
        column_widths: &[f32],
        style: TableStyle,
    ) -> Result<Self, LayoutError> {
        Self::from_grid(rows, 2, column_widths, style)
    }

    fn from_grid(
        grid: &[&[&str]],
        columns: usize,
        column_widths: &[f32],
        style: TableStyle,
    ) -> Result<Self, LayoutError> {
        if columns == 0 {
            return Err(LayoutError::EmptyTable);
        }
        if column_widths.len() != columns {
            return Err(LayoutError::ColumnWidths {
                columns,
                widths: column_widths.len(),
            });
        }
        for (index, row) in grid.iter().enumerate() {
            if row.len() != columns {
                return Err(LayoutError::RowShape {
                    row: index,
                    expected: columns,
                    found: row.len(),
                });
            }
        }

        Ok(Table {
            rows: grid
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
            column_widths: column_widths.to_vec(),
            style,
        })
    }

    /// All rows, header included.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    pub fn has_header(&self) -> bool {
        self.style.shading == crate::styles::Shading::HeaderRow
    }

    pub fn header(&self) -> Option<&[String]> {
        if self.has_header() {
            self.rows.first().map(|r| r.as_slice())
        } else {
            None
        }
    }

    /// Rows below the header (every row for key/value tables).
    pub fn data_rows(&self) -> &[Vec<String>] {
        if self.has_header() {
            &self.rows[1..]
        } else {
            &self.rows
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Flowable {
    Paragraph(Paragraph),
    /// Vertical space in points.
    Spacer { height: f32 },
    PageBreak,
    Table(Table),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    styles: StyleSheet,
    flowables: Vec<Flowable>,
}

impl Story {
    pub fn new(styles: StyleSheet) -> Self {
        Story {
            styles,
            flowables: Vec::new(),
        }
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn flowables(&self) -> &[Flowable] {
        &self.flowables
    }

    pub fn len(&self) -> usize {
        self.flowables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowables.is_empty()
    }

    pub fn push(&mut self, flowable: Flowable) -> &mut Self {
        self.flowables.push(flowable);
        self
    }

    pub fn paragraph(&mut self, style: TextStyle, text: impl Into<String>) -> &mut Self {
        self.push(Flowable::Paragraph(Paragraph::new(style, text)))
    }

    pub fn rich(&mut self, style: TextStyle, spans: Vec<Span>) -> &mut Self {
        self.push(Flowable::Paragraph(Paragraph::rich(style, spans)))
    }

    /// One [`TextStyle::Bullet`] paragraph per item, in the order given.
    pub fn bullets<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            self.paragraph(TextStyle::Bullet, item);
        }
        self
    }

    pub fn spacer(&mut self, height: f32) -> &mut Self {
        self.push(Flowable::Spacer { height })
    }

    pub fn page_break(&mut self) -> &mut Self {
        self.push(Flowable::PageBreak)
    }

    pub fn table(&mut self, table: Table) -> &mut Self {
        self.push(Flowable::Table(table))
    }

    /// Runs of flowables between page breaks. A trailing break does not open
    /// an empty section.
    pub fn sections(&self) -> Vec<&[Flowable]> {
        let mut sections: Vec<&[Flowable]> = self
            .flowables
            .split(|f| matches!(f, Flowable::PageBreak))
            .collect();
        if sections.len() > 1 && sections.last().is_some_and(|s| s.is_empty()) {
            sections.pop();
        }
        sections
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.flowables.iter().filter_map(|f| match f {
            Flowable::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.flowables.iter().filter_map(|f| match f {
            Flowable::Paragraph(p) => Some(p),
            _ => None,
        })
    }
}
