//! Slide deck model
//!
//! A [`Deck`] is an ordered list of slides built by three helpers. Every
//! slide uses the blank layout; titles, bars, text and tables are placed as
//! shapes at fixed positions. Geometry is in EMU (914400 per inch).

use serde::Serialize;

use crate::error::LayoutError;
use crate::styles::{Alignment, Color};

pub const EMU_PER_INCH: i64 = 914_400;
pub const EMU_PER_POINT: i64 = 12_700;

/// 13.333 x 7.5 inches (16:9).
pub const SLIDE_WIDTH: i64 = 12_192_000;
pub const SLIDE_HEIGHT: i64 = 6_858_000;

// Hundredths of an inch to EMU.
const fn centi_inches(value: i64) -> i64 {
    value * EMU_PER_INCH / 100
}

const SIDE_MARGIN: i64 = centi_inches(60);
const TITLE_BAR_HEIGHT: i64 = centi_inches(110);
const BODY_TOP: i64 = centi_inches(150);
const TABLE_ROW_HEIGHT: i64 = centi_inches(50);

/// Fixed colour palette of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub light: Color,
    pub text: Color,
    pub grid: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            primary: Color::hex(0x2E5090),
            secondary: Color::hex(0x4472C4),
            accent: Color::hex(0x5B9BD5),
            light: Color::hex(0xD5E8F0),
            text: Color::hex(0x333333),
            grid: Color::hex(0xCCCCCC),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSpec {
    /// Points.
    pub size: f32,
    pub bold: bool,
    pub color: Color,
}

impl FontSpec {
    pub const fn new(size: f32, bold: bool, color: Color) -> Self {
        FontSpec { size, bold, color }
    }
}

/// Palette plus the text styles the slide helpers draw with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckTheme {
    pub palette: Palette,
    /// Used for both Latin and East Asian text.
    pub font_family: String,
    pub title: FontSpec,
    pub subtitle: FontSpec,
    pub slide_title: FontSpec,
    pub bullet: FontSpec,
    pub table_header: FontSpec,
    pub table_body: FontSpec,
}

impl Default for DeckTheme {
    fn default() -> Self {
        let palette = Palette::default();
        DeckTheme {
            palette,
            font_family: "Microsoft JhengHei".to_string(),
            title: FontSpec::new(40.0, true, palette.primary),
            subtitle: FontSpec::new(24.0, false, palette.secondary),
            slide_title: FontSpec::new(28.0, true, Color::WHITE),
            bullet: FontSpec::new(18.0, false, palette.text),
            table_header: FontSpec::new(14.0, true, palette.primary),
            table_body: FontSpec::new(12.0, false, palette.text),
        }
    }
}

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    pub const fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Frame { x, y, cx, cy }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Top,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextParagraph {
    pub text: String,
    pub font: FontSpec,
    pub alignment: Alignment,
    pub bullet: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableShape {
    pub frame: Frame,
    pub column_widths: Vec<i64>,
    pub row_height: i64,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub header_font: FontSpec,
    pub body_font: FontSpec,
    pub header_fill: Color,
    pub grid: Color,
}

impl TableShape {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Data rows, header excluded.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    TextBox {
        frame: Frame,
        paragraphs: Vec<TextParagraph>,
        anchor: Anchor,
        /// Emitted as `wrap="square"` when set.
        wrap: bool,
    },
    Rectangle {
        frame: Frame,
        fill: Color,
    },
    Table(TableShape),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    Title,
    Content,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    title: String,
    kind: SlideKind,
    shapes: Vec<Shape>,
}

impl Slide {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> SlideKind {
        self.kind
    }

    /// Shapes in z-order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn table(&self) -> Option<&TableShape> {
        self.shapes.iter().find_map(|s| match s {
            Shape::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Paragraph texts of every text box, in z-order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .filter_map(|s| match s {
                Shape::TextBox { paragraphs, .. } => Some(paragraphs),
                _ => None,
            })
            .flatten()
            .map(|p| p.text.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    theme: DeckTheme,
    width: i64,
    height: i64,
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new(theme: DeckTheme) -> Self {
        Deck {
            theme,
            width: SLIDE_WIDTH,
            height: SLIDE_HEIGHT,
            slides: Vec::new(),
        }
    }

    pub fn theme(&self) -> &DeckTheme {
        &self.theme
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Centred title and subtitle with an accent rule between them.
    pub fn add_title_slide(&mut self, title: &str, subtitle: &str) {
        let theme = &self.theme;
        let text_width = self.width - 2 * SIDE_MARGIN;
        let rule_width = centi_inches(400);

        let shapes = vec![
            Shape::TextBox {
                frame: Frame::new(SIDE_MARGIN, centi_inches(200), text_width, centi_inches(150)),
                paragraphs: vec![centred(title, theme.title)],
                anchor: Anchor::Middle,
                wrap: true,
            },
            Shape::Rectangle {
                frame: Frame::new((self.width - rule_width) / 2, centi_inches(360), rule_width, centi_inches(6)),
                fill: theme.palette.accent,
            },
            Shape::TextBox {
                frame: Frame::new(SIDE_MARGIN, centi_inches(380), text_width, centi_inches(100)),
                paragraphs: vec![centred(subtitle, theme.subtitle)],
                anchor: Anchor::Top,
                wrap: true,
            },
        ];
        self.slides.push(Slide {
            title: title.to_string(),
            kind: SlideKind::Title,
            shapes,
        });
    }

    /// Title bar plus one bullet paragraph per item, in the order given.
    pub fn add_content_slide<S: AsRef<str>>(&mut self, title: &str, bullets: &[S]) {
        let mut shapes = self.title_bar(title);
        let bullet_font = self.theme.bullet;
        shapes.push(Shape::TextBox {
            frame: Frame::new(
                SIDE_MARGIN,
                BODY_TOP,
                self.width - 2 * SIDE_MARGIN,
                self.height - BODY_TOP - centi_inches(40),
            ),
            paragraphs: bullets
                .iter()
                .map(|item| TextParagraph {
                    text: item.as_ref().to_string(),
                    font: bullet_font,
                    alignment: Alignment::Left,
                    bullet: Some('•'),
                })
                .collect(),
            anchor: Anchor::Top,
            wrap: true,
        });
        self.slides.push(Slide {
            title: title.to_string(),
            kind: SlideKind::Content,
            shapes,
        });
    }

    /// Title bar plus a `(rows.len() + 1) x headers.len()` grid. Rows with a
    /// different cell count are rejected and nothing is appended.
    pub fn add_table_slide<S: AsRef<str>>(
        &mut self,
        title: &str,
        headers: &[S],
        rows: &[Vec<S>],
    ) -> Result<(), LayoutError> {
        let columns = headers.len();
        if columns == 0 {
            return Err(LayoutError::EmptyTable);
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(LayoutError::RowShape {
                    row: index + 1,
                    expected: columns,
                    found: row.len(),
                });
            }
        }

        let table_width = self.width - 2 * SIDE_MARGIN;
        let column_width = table_width / columns as i64;
        let owned = |cells: &[S]| cells.iter().map(|c| c.as_ref().to_string()).collect::<Vec<_>>();
        let table = TableShape {
            frame: Frame::new(
                SIDE_MARGIN,
                BODY_TOP,
                column_width * columns as i64,
                TABLE_ROW_HEIGHT * (rows.len() as i64 + 1),
            ),
            column_widths: vec![column_width; columns],
            row_height: TABLE_ROW_HEIGHT,
            headers: owned(headers),
            rows: rows.iter().map(|r| owned(r.as_slice())).collect(),
            header_font: self.theme.table_header,
            body_font: self.theme.table_body,
            header_fill: self.theme.palette.light,
            grid: self.theme.palette.grid,
        };

        let mut shapes = self.title_bar(title);
        shapes.push(Shape::Table(table));
        self.slides.push(Slide {
            title: title.to_string(),
            kind: SlideKind::Table,
            shapes,
        });
        Ok(())
    }

    fn title_bar(&self, title: &str) -> Vec<Shape> {
        vec![
            Shape::Rectangle {
                frame: Frame::new(0, 0, self.width, TITLE_BAR_HEIGHT),
                fill: self.theme.palette.primary,
            },
            Shape::TextBox {
                frame: Frame::new(SIDE_MARGIN, 0, self.width - 2 * SIDE_MARGIN, TITLE_BAR_HEIGHT),
                paragraphs: vec![TextParagraph {
                    text: title.to_string(),
                    font: self.theme.slide_title,
                    alignment: Alignment::Left,
                    bullet: None,
                }],
                anchor: Anchor::Middle,
                wrap: true,
            },
        ]
    }
}

fn centred(text: &str, font: FontSpec) -> TextParagraph {
    TextParagraph {
        text: text.to_string(),
        font,
        alignment: Alignment::Center,
        bullet: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_slide_centres_both_lines() {
        let mut deck = Deck::new(DeckTheme::default());
        deck.add_title_slide("Charter", "Summary");
        let slide = &deck.slides()[0];
        assert_eq!(slide.kind(), SlideKind::Title);
        assert_eq!(slide.title(), "Charter");
        assert_eq!(slide.texts(), ["Charter", "Summary"]);
    }

    #[test]
    fn content_bullets_keep_input_order() {
        let mut deck = Deck::new(DeckTheme::default());
        deck.add_content_slide("Scope", &["b", "a", "b"]);
        let slide = &deck.slides()[0];
        // Title text first, then the bullets.
        assert_eq!(slide.texts(), ["Scope", "b", "a", "b"]);
        let wraps = slide
            .shapes()
            .iter()
            .all(|s| !matches!(s, Shape::TextBox { wrap: false, .. }));
        assert!(wraps);
    }

    #[test]
    fn table_slide_shape() {
        let mut deck = Deck::new(DeckTheme::default());
        let rows = vec![vec!["1", "2"], vec!["3", "4"], vec!["5", "6"]];
        deck.add_table_slide("T", &["a", "b"], &rows).unwrap();
        let table = deck.slides()[0].table().unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.frame.cy, TABLE_ROW_HEIGHT * 4);
    }

    #[test]
    fn mismatched_table_row_is_rejected() {
        let mut deck = Deck::new(DeckTheme::default());
        let rows = vec![vec!["1", "2", "3"], vec!["4", "5"]];
        let err = deck.add_table_slide("T", &["a", "b", "c"], &rows).unwrap_err();
        assert_eq!(
            err,
            LayoutError::RowShape {
                row: 2,
                expected: 3,
                found: 2
            }
        );
        assert!(deck.is_empty());
    }
}
