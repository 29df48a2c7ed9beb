//! Single-line text layout
//!
//! Positions every character of a one-line paragraph, reordering
//! right-to-left runs visually, and answers caret position queries.

use std::ops::Range;

use smallvec::SmallVec;
use unicode_bidi::BidiInfo;

use crate::bidi::Direction;
use crate::shaper::TextShaper;

/// Layout queries needed to position a single line of text
///
/// All indices are character indices into the laid out text.
pub trait TextLayout {
    /// Number of characters in the layout
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Horizontal caret position for a character offset, in the
    /// paragraph's primary direction
    fn primary_horizontal(&self, offset: usize) -> f32;

    /// Sum of the advances of a character range
    fn measure_text(&self, range: Range<usize>) -> f32;

    /// Number of leading characters whose advances fit within `advance`
    fn offset_for_advance(&self, advance: f32) -> usize;

    /// Width of the whole text
    fn text_width(&self) -> f32 {
        self.measure_text(0..self.len())
    }
}

/// Parameters for laying out a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Font size in pixels
    pub font_size: f32,
    /// Paragraph direction
    pub direction: Direction,
    /// Minimum layout width (the viewport); RTL paragraphs align to its right edge
    pub width: f32,
}

/// Placement of one character
#[derive(Debug, Clone, Copy, Default)]
struct GlyphSlot {
    /// Left edge in layout coordinates
    left: f32,
    advance: f32,
    /// Whether the character sits in a right-to-left run
    rtl: bool,
}

/// A laid out line of text
#[derive(Debug, Clone)]
pub struct LineLayout {
    glyphs: Vec<GlyphSlot>,
    paragraph: Direction,
    /// X of the leftmost glyph
    origin_x: f32,
    text_width: f32,
    layout_width: f32,
}

impl LineLayout {
    /// Lay out `text` with advances from `shaper`
    pub fn new<S: TextShaper + ?Sized>(text: &str, shaper: &mut S, params: &LayoutParams) -> Self {
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let mut glyphs: Vec<GlyphSlot> = text
            .chars()
            .map(|c| GlyphSlot {
                advance: shaper.advance(c, params.font_size),
                ..GlyphSlot::default()
            })
            .collect();

        let text_width: f32 = glyphs.iter().map(|g| g.advance).sum();
        let layout_width = params.width.max(text_width);
        let origin_x = match params.direction {
            Direction::Ltr => 0.0,
            Direction::Rtl => layout_width - text_width,
        };

        let mut x = origin_x;
        for (run, rtl) in visual_runs(text, &offsets, params.direction) {
            let indices: Box<dyn Iterator<Item = usize>> = if rtl {
                Box::new(run.rev())
            } else {
                Box::new(run)
            };
            for i in indices {
                let glyph = &mut glyphs[i];
                glyph.left = x;
                glyph.rtl = rtl;
                x += glyph.advance;
            }
        }

        Self {
            glyphs,
            paragraph: params.direction,
            origin_x,
            text_width,
            layout_width,
        }
    }

    /// Paragraph direction the line was laid out with
    pub fn paragraph_direction(&self) -> Direction {
        self.paragraph
    }

    /// Total layout width (at least the requested width)
    pub fn layout_width(&self) -> f32 {
        self.layout_width
    }
}

/// Character ranges of each directional run, in visual (left to right) order
fn visual_runs(text: &str, offsets: &[usize], direction: Direction) -> SmallVec<[(Range<usize>, bool); 4]> {
    let mut runs = SmallVec::new();
    if text.is_empty() {
        return runs;
    }

    let char_index = |byte: usize| offsets.partition_point(|&b| b < byte);

    let info = BidiInfo::new(text, Some(direction.level()));
    for para in &info.paragraphs {
        let (levels, level_runs) = info.visual_runs(para, para.range.clone());
        for run in level_runs {
            if run.is_empty() {
                continue;
            }
            let rtl = levels[run.start].is_rtl();
            runs.push((char_index(run.start)..char_index(run.end), rtl));
        }
    }

    runs
}

impl TextLayout for LineLayout {
    fn len(&self) -> usize {
        self.glyphs.len()
    }

    fn primary_horizontal(&self, offset: usize) -> f32 {
        let offset = offset.min(self.glyphs.len());
        if offset == 0 {
            return match self.paragraph {
                Direction::Ltr => self.origin_x,
                Direction::Rtl => self.origin_x + self.text_width,
            };
        }

        // Caret sits after the previous character, in that character's direction.
        let prev = &self.glyphs[offset - 1];
        if prev.rtl {
            prev.left
        } else {
            prev.left + prev.advance
        }
    }

    fn measure_text(&self, range: Range<usize>) -> f32 {
        let end = range.end.min(self.glyphs.len());
        let start = range.start.min(end);
        self.glyphs[start..end].iter().map(|g| g.advance).sum()
    }

    fn offset_for_advance(&self, advance: f32) -> usize {
        let mut total = 0.0;
        for (i, glyph) in self.glyphs.iter().enumerate() {
            total += glyph.advance;
            if total > advance {
                return i;
            }
        }
        self.glyphs.len()
    }

    fn text_width(&self) -> f32 {
        self.text_width
    }
}
