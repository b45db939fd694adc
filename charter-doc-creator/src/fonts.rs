//! Font management for report typography
//!
//! Resolves the Chinese-capable font through a [`FallbackChain`]: TrueType
//! files in priority order, then the PDF built-in Helvetica pair. Also
//! provides glyph metrics for line breaking and the page geometry the
//! renderer lays text into.

use anyhow::{anyhow, Context, Result};
use fontdue::{Font, FontSettings};
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::fallback::FallbackChain;

/// Primary Unicode font (supports Traditional Chinese).
pub const PRIMARY_UNICODE_FONT: &str = "/System/Library/Fonts/Supplemental/Arial Unicode.ttf";
/// Secondary location of the same font.
pub const SECONDARY_UNICODE_FONT: &str = "/Library/Fonts/Arial Unicode.ttf";

/// A4 in points.
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// One TrueType file the resolver may load.
#[derive(Debug, Clone)]
pub struct FontCandidate {
    pub name: String,
    pub path: PathBuf,
}

impl FontCandidate {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    fn load(&self) -> Result<TrueTypeFace> {
        let data = std::fs::read(&self.path)
            .with_context(|| format!("reading font {}", self.path.display()))?;
        let font = Font::from_bytes(data.as_slice(), FontSettings::default())
            .map_err(|e| anyhow!("Failed to load font from {}: {}", self.path.display(), e))?;
        Ok(TrueTypeFace {
            name: self.name.clone(),
            path: self.path.clone(),
            data,
            font,
        })
    }
}

/// The default candidate list, tried top to bottom before the built-in tier.
pub fn default_candidates() -> Vec<FontCandidate> {
    vec![
        FontCandidate::new("ArialUnicode", PRIMARY_UNICODE_FONT),
        FontCandidate::new("ArialUnicode", SECONDARY_UNICODE_FONT),
    ]
}

/// A loaded TrueType font that will be embedded as a CID font.
#[derive(Clone)]
pub struct TrueTypeFace {
    pub name: String,
    pub path: PathBuf,
    pub data: Vec<u8>,
    pub font: Font,
}

/// The font every Chinese-capable style renders with.
#[derive(Clone)]
pub enum FontFace {
    TrueType(Box<TrueTypeFace>),
    /// PDF standard 14 fonts; Latin only.
    BuiltinHelvetica,
}

impl FontFace {
    pub fn name(&self) -> &str {
        match self {
            FontFace::TrueType(face) => &face.name,
            FontFace::BuiltinHelvetica => "Helvetica",
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::BuiltinHelvetica)
    }

    /// Resource name used in page content streams.
    pub fn resource_name(&self, bold: bool) -> &'static str {
        match self {
            // The Unicode font has no separate bold cut; both weights share it.
            FontFace::TrueType(_) => "F1",
            FontFace::BuiltinHelvetica if bold => "F2",
            FontFace::BuiltinHelvetica => "F1",
        }
    }
}

/// Font context containing the resolved font, metrics cache and page geometry
#[derive(Clone)]
pub struct FontContext {
    pub face: FontFace,

    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,

    // Advance widths at 1pt, keyed by character.
    advance_cache: HashMap<char, f32>,
}

impl FontContext {
    /// Resolve fonts from [`default_candidates`].
    pub fn initialize_fonts() -> Self {
        Self::from_candidates(&default_candidates())
    }

    /// Resolve fonts from an explicit candidate list. Never fails: when no
    /// candidate loads, the built-in Helvetica tier is used and a warning is
    /// logged.
    pub fn from_candidates(candidates: &[FontCandidate]) -> Self {
        let chain = candidates.iter().fold(
            FallbackChain::new("Helvetica (built-in)", || FontFace::BuiltinHelvetica),
            |chain, candidate| {
                let label = format!("{} ({})", candidate.name, candidate.path.display());
                chain.then(label, move || {
                    candidate
                        .load()
                        .map(|face| FontFace::TrueType(Box::new(face)))
                })
            },
        );

        let resolved = chain.resolve();
        if resolved.used_last_resort() {
            warn!("Chinese fonts not available, falling back to Helvetica");
        } else {
            info!("Loaded report font: {}", resolved.source);
        }

        Self::with_face(resolved.value)
    }

    pub fn with_face(face: FontFace) -> Self {
        FontContext {
            face,
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: 72.0,
            advance_cache: HashMap::new(),
        }
    }

    /// Load one specific font file, bypassing the fallback chain.
    pub fn from_font_file(name: &str, path: &Path) -> Result<Self> {
        let face = FontCandidate::new(name, path).load()?;
        Ok(Self::with_face(FontFace::TrueType(Box::new(face))))
    }

    pub fn set_page(&mut self, page_width: f32, page_height: f32, margin: f32) {
        self.page_width = page_width;
        self.page_height = page_height;
        self.margin = margin;
    }

    /// Width of `text` in points.
    pub fn text_width(&mut self, text: &str, font_size: f32, bold: bool) -> f32 {
        let mut width = 0.0;
        for ch in text.chars() {
            width += self.char_advance(ch, bold);
        }
        width * font_size
    }

    /// Advance of one character at 1pt.
    pub fn char_advance(&mut self, ch: char, bold: bool) -> f32 {
        match &self.face {
            FontFace::TrueType(face) => {
                if let Some(advance) = self.advance_cache.get(&ch) {
                    return *advance;
                }
                let advance = face.font.metrics(ch, 1000.0).advance_width / 1000.0;
                self.advance_cache.insert(ch, advance);
                advance
            }
            FontFace::BuiltinHelvetica => {
                let units = helvetica_width(winansi_byte(ch).unwrap_or(b'?'));
                let units = if bold { units * 1.06 } else { units };
                units / 1000.0
            }
        }
    }

    /// Get content area (page minus margins) as (left, top, width, height).
    pub fn content_area(&self) -> (f32, f32, f32, f32) {
        (
            self.margin,
            self.margin,
            self.page_width - 2.0 * self.margin,
            self.page_height - 2.0 * self.margin,
        )
    }
}

/// Map a character onto WinAnsiEncoding, the encoding of the built-in fonts.
pub fn winansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match ch {
        ' '..='~' => Some(code as u8),
        '\u{A0}'..='\u{FF}' => Some(code as u8),
        '€' => Some(0x80),
        '…' => Some(0x85),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        _ => None,
    }
}

// Helvetica AFM widths for printable ASCII, in 1/1000 em.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // '{'..'~'
];

fn helvetica_width(byte: u8) -> f32 {
    match byte {
        0x20..=0x7E => HELVETICA_ASCII[(byte - 0x20) as usize] as f32,
        0x95 => 350.0,
        0x96 => 556.0,
        0x97 => 1000.0,
        0x85 => 1000.0,
        _ => 556.0,
    }
}
