//! Text layout and line breaking
//!
//! Breaks mixed Chinese/Latin text into lines that fit a width. Latin words
//! stay whole and break at spaces; CJK text may break between any two
//! characters, except that closing punctuation never starts a line and
//! opening punctuation never ends one.

use unicode_script::{Script, UnicodeScript};
use unicode_segmentation::UnicodeSegmentation;

use crate::fonts::FontContext;
use crate::story::Span;

/// A run of text on one line with uniform weight.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    /// Width in points.
    pub width: f32,
}

/// Represents a laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedLine {
    pub runs: Vec<TextRun>,
    /// Width in points, trailing spaces excluded.
    pub width: f32,
    /// Whether the line ends its paragraph (or a hard line break).
    pub last_in_paragraph: bool,
}

impl FormattedLine {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn char_count(&self) -> usize {
        self.runs.iter().map(|r| r.text.chars().count()).sum()
    }
}

// A token from word segmentation, tagged with its span's weight.
#[derive(Debug, Clone)]
struct Piece {
    text: String,
    bold: bool,
    width: f32,
    is_space: bool,
}

/// Line breaking engine. Owns the font context so measurements share one
/// metrics cache.
pub struct TextLayoutEngine {
    font_context: FontContext,
}

impl TextLayoutEngine {
    pub fn new(font_context: FontContext) -> Self {
        Self { font_context }
    }

    pub fn font_context(&self) -> &FontContext {
        &self.font_context
    }

    pub fn font_context_mut(&mut self) -> &mut FontContext {
        &mut self.font_context
    }

    /// Break plain text. `\n` forces a line break.
    pub fn layout_text(
        &mut self,
        text: &str,
        font_size: f32,
        bold: bool,
        max_width: f32,
    ) -> Vec<FormattedLine> {
        let span = Span {
            text: text.to_string(),
            bold,
        };
        self.layout_spans(std::slice::from_ref(&span), font_size, max_width)
    }

    /// Break styled spans into lines no wider than `max_width` (a single
    /// unbreakable piece wider than that is split by character).
    pub fn layout_spans(
        &mut self,
        spans: &[Span],
        font_size: f32,
        max_width: f32,
    ) -> Vec<FormattedLine> {
        let mut lines = Vec::new();
        for hard_line in self.split_hard_lines(spans) {
            let pieces = self.tokenize(&hard_line, font_size);
            let chunks = group_unbreakable(pieces);
            self.fill_lines(chunks, font_size, max_width, &mut lines);
        }
        lines
    }

    // Split spans at '\n', keeping weights.
    fn split_hard_lines(&self, spans: &[Span]) -> Vec<Vec<Span>> {
        let mut out = vec![Vec::new()];
        for span in spans {
            for (i, part) in span.text.split('\n').enumerate() {
                if i > 0 {
                    out.push(Vec::new());
                }
                if !part.is_empty() {
                    if let Some(line) = out.last_mut() {
                        line.push(Span {
                            text: part.to_string(),
                            bold: span.bold,
                        });
                    }
                }
            }
        }
        out
    }

    fn tokenize(&mut self, spans: &[Span], font_size: f32) -> Vec<Piece> {
        let mut pieces = Vec::new();
        for span in spans {
            for token in span.text.split_word_bounds() {
                pieces.push(Piece {
                    text: token.to_string(),
                    bold: span.bold,
                    width: self.font_context.text_width(token, font_size, span.bold),
                    is_space: token.chars().all(char::is_whitespace),
                });
            }
        }
        pieces
    }

    fn fill_lines(
        &mut self,
        chunks: Vec<Vec<Piece>>,
        font_size: f32,
        max_width: f32,
        lines: &mut Vec<FormattedLine>,
    ) {
        let mut current: Vec<Piece> = Vec::new();
        let mut current_width = 0.0_f32;

        for mut chunk in chunks {
            if current.is_empty() {
                // Leading spaces are dropped at the start of a line.
                let lead = chunk.iter().take_while(|p| p.is_space).count();
                chunk.drain(..lead);
            }
            let ink = ink_width(&chunk);
            let full: f32 = chunk.iter().map(|p| p.width).sum();

            if !current.is_empty() && current_width + ink > max_width {
                lines.push(finish_line(std::mem::take(&mut current), false));
                current_width = 0.0;
            }

            if current.is_empty() && ink > max_width {
                // Too wide on its own: hard-split by character.
                for piece in self.split_by_char(&chunk, font_size, max_width) {
                    if !current.is_empty() && current_width + piece.width > max_width {
                        lines.push(finish_line(std::mem::take(&mut current), false));
                        current_width = 0.0;
                    }
                    current_width += piece.width;
                    current.push(piece);
                }
                let trailing = chunk.iter().rev().take_while(|p| p.is_space).count();
                for space in &chunk[chunk.len() - trailing..] {
                    current_width += space.width;
                    current.push(space.clone());
                }
                continue;
            }

            current_width += full;
            current.extend(chunk);
        }

        lines.push(finish_line(current, true));
    }

    fn split_by_char(&mut self, chunk: &[Piece], font_size: f32, max_width: f32) -> Vec<Piece> {
        let mut out = Vec::new();
        for piece in chunk.iter().filter(|p| !p.is_space) {
            let mut buf = String::new();
            let mut width = 0.0;
            for ch in piece.text.chars() {
                let w = self.font_context.char_advance(ch, piece.bold) * font_size;
                if !buf.is_empty() && width + w > max_width {
                    out.push(Piece {
                        text: std::mem::take(&mut buf),
                        bold: piece.bold,
                        width,
                        is_space: false,
                    });
                    width = 0.0;
                }
                buf.push(ch);
                width += w;
            }
            if !buf.is_empty() {
                out.push(Piece {
                    text: buf,
                    bold: piece.bold,
                    width,
                    is_space: false,
                });
            }
        }
        out
    }

    /// Whether a line can be broken between `before` and `after`.
    pub fn can_break_between(before: char, after: char) -> bool {
        if is_closing_punctuation(after) || is_opening_punctuation(before) {
            return false;
        }
        before.is_whitespace() || is_cjk(before) || is_cjk(after)
    }
}

// Group pieces into units that must stay on one line; each unit carries its
// trailing spaces.
fn group_unbreakable(pieces: Vec<Piece>) -> Vec<Vec<Piece>> {
    let mut chunks: Vec<Vec<Piece>> = Vec::new();
    let mut current: Vec<Piece> = Vec::new();

    for piece in pieces {
        let breakable = match (current.last(), piece.text.chars().next()) {
            (Some(prev), Some(first)) => {
                !piece.is_space
                    && prev
                        .text
                        .chars()
                        .last()
                        .is_some_and(|last| TextLayoutEngine::can_break_between(last, first))
            }
            _ => false,
        };
        if breakable {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(piece);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// Width without trailing spaces.
fn ink_width(pieces: &[Piece]) -> f32 {
    let trailing = pieces.iter().rev().take_while(|p| p.is_space).count();
    pieces[..pieces.len() - trailing].iter().map(|p| p.width).sum()
}

// Merge adjacent pieces of equal weight into runs and drop trailing spaces.
fn finish_line(mut pieces: Vec<Piece>, last_in_paragraph: bool) -> FormattedLine {
    while pieces.last().is_some_and(|p| p.is_space) {
        pieces.pop();
    }

    let mut runs: Vec<TextRun> = Vec::new();
    for piece in pieces {
        match runs.last_mut() {
            Some(run) if run.bold == piece.bold => {
                run.text.push_str(&piece.text);
                run.width += piece.width;
            }
            _ => runs.push(TextRun {
                text: piece.text,
                bold: piece.bold,
                width: piece.width,
            }),
        }
    }

    let width = runs.iter().map(|r| r.width).sum();
    FormattedLine {
        runs,
        width,
        last_in_paragraph,
    }
}

/// Han, kana, hangul and the CJK/full-width punctuation blocks.
pub fn is_cjk(ch: char) -> bool {
    matches!(
        ch.script(),
        Script::Han | Script::Hiragana | Script::Katakana | Script::Hangul | Script::Bopomofo
    ) || matches!(ch as u32, 0x3000..=0x303F | 0xFF00..=0xFFEF)
}

fn is_closing_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '，' | '。' | '、' | '；' | '：' | '！' | '？' | '）' | '」' | '』' | '》' | '〉' | '】' | '〕'
            | ')' | ',' | '.' | ';' | ':' | '!' | '?' | '%'
    )
}

fn is_opening_punctuation(ch: char) -> bool {
    matches!(ch, '（' | '「' | '『' | '《' | '〈' | '【' | '〔' | '(')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontFace;

    fn engine() -> TextLayoutEngine {
        TextLayoutEngine::new(FontContext::with_face(FontFace::BuiltinHelvetica))
    }

    #[test]
    fn short_text_is_one_line() {
        let lines = engine().layout_text("RISK-AML-MDL-001", 10.0, false, 400.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "RISK-AML-MDL-001");
        assert!(lines[0].last_in_paragraph);
    }

    #[test]
    fn latin_breaks_at_spaces_only() {
        let mut engine = engine();
        let width = engine.font_context_mut().text_width("Customer AML", 10.0, false) + 1.0;
        let lines = engine.layout_text("Customer AML Risk Event Summary Model", 10.0, false, width);
        let texts: Vec<_> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, ["Customer AML", "Risk Event", "Summary", "Model"]);
        assert!(lines.iter().all(|l| l.width <= width));
    }

    #[test]
    fn cjk_breaks_between_characters() {
        let mut engine = engine();
        // Built-in metrics measure every CJK char as '?', 5.56pt at 10pt.
        let lines = engine.layout_text("客戶洗錢風險事件", 10.0, false, 5.56 * 3.0 + 0.1);
        let texts: Vec<_> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, ["客戶洗", "錢風險", "事件"]);
    }

    #[test]
    fn closing_punctuation_never_starts_a_line() {
        let mut engine = engine();
        let lines = engine.layout_text("資料品質，建立", 10.0, false, 5.56 * 4.0 + 0.1);
        assert!(lines.iter().all(|l| !l.text().starts_with('，')));
        assert_eq!(lines[0].text(), "資料品");
        assert_eq!(lines[1].text(), "質，建立");
    }

    #[test]
    fn hard_breaks_and_bold_runs() {
        let spans = [Span::bold("建立日期:"), Span::plain(" 2025-11-14\n第二行")];
        let lines = engine().layout_spans(&spans, 10.0, 1000.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].runs.len(), 2);
        assert!(lines[0].runs[0].bold);
        assert!(!lines[0].runs[1].bold);
        assert!(lines[0].last_in_paragraph);
        assert_eq!(lines[1].text(), "第二行");
    }

    #[test]
    fn oversized_word_is_split() {
        let lines = engine().layout_text("ABCDEFGHIJ", 10.0, false, 20.0);
        assert!(lines.len() > 1);
        let joined: String = lines.iter().map(|l| l.text()).collect();
        assert_eq!(joined, "ABCDEFGHIJ");
    }

    #[test]
    fn break_rules() {
        assert!(TextLayoutEngine::can_break_between('客', '戶'));
        assert!(TextLayoutEngine::can_break_between(' ', 'A'));
        assert!(!TextLayoutEngine::can_break_between('6', '0'));
        assert!(!TextLayoutEngine::can_break_between('0', '%'));
        assert!(!TextLayoutEngine::can_break_between('料', '，'));
        assert!(!TextLayoutEngine::can_break_between('（', '如'));
        assert!(TextLayoutEngine::can_break_between('統', 'K'));
    }
}
