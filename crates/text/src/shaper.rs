//! Glyph advances
//!
//! Advance width providers: a fixed-ratio estimate and a fontdue font.

use std::path::Path;

use fontdue::{Font, FontSettings};
use rustc_hash::FxHashMap;

use crate::error::{TextError, TextResult};

/// Trait for measuring glyph advances
pub trait TextShaper {
    /// Horizontal advance of a character at the given font size
    fn advance(&mut self, c: char, font_size: f32) -> f32;

    /// Measure the width of a string
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|c| self.advance(c, font_size)).sum()
    }
}

impl<S: TextShaper + ?Sized> TextShaper for Box<S> {
    fn advance(&mut self, c: char, font_size: f32) -> f32 {
        (**self).advance(c, font_size)
    }
}

/// Fixed-width estimation
///
/// Every character advances by `font_size * ratio`. Used when no font is
/// available and throughout the tests, where exact positions are needed.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceShaper {
    ratio: f32,
}

impl FixedAdvanceShaper {
    /// Average character width of a proportional font is ~0.6 * font size
    pub const DEFAULT_RATIO: f32 = 0.6;

    pub fn new() -> Self {
        Self::with_ratio(Self::DEFAULT_RATIO)
    }

    pub fn with_ratio(ratio: f32) -> Self {
        Self { ratio }
    }
}

impl Default for FixedAdvanceShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper for FixedAdvanceShaper {
    fn advance(&mut self, _c: char, font_size: f32) -> f32 {
        font_size * self.ratio
    }
}

/// Key for cached advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    character: char,
    /// Font size rounded to 0.1px; URL bar sizes never need finer steps
    font_size_tenths: u32,
}

impl GlyphKey {
    fn new(character: char, font_size: f32) -> Self {
        Self {
            character,
            font_size_tenths: (font_size * 10.0).round() as u32,
        }
    }
}

/// Advances from a real font, cached per character and size
pub struct FontShaper {
    font: Font,
    advance_cache: FxHashMap<GlyphKey, f32>,
}

impl FontShaper {
    /// Create a shaper from font data
    pub fn from_bytes(data: &[u8]) -> TextResult<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| TextError::FontParse(e.to_string()))?;

        Ok(Self {
            font,
            advance_cache: FxHashMap::default(),
        })
    }

    /// Load a TrueType/OpenType font file
    pub fn from_file(path: impl AsRef<Path>) -> TextResult<Self> {
        let data = std::fs::read(path.as_ref())?;
        log::debug!("Loaded {} bytes of font data from {}", data.len(), path.as_ref().display());
        Self::from_bytes(&data)
    }
}

impl TextShaper for FontShaper {
    fn advance(&mut self, c: char, font_size: f32) -> f32 {
        let key = GlyphKey::new(c, font_size);

        let font = &self.font;
        *self
            .advance_cache
            .entry(key)
            .or_insert_with(|| font.metrics(c, font_size).advance_width)
    }
}

impl std::fmt::Debug for FontShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontShaper")
            .field("cached_advances", &self.advance_cache.len())
            .finish()
    }
}
