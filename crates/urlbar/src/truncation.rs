//! Render-time truncation
//!
//! Cuts multi-kilobyte URLs down to roughly what could ever fit on screen
//! before they are laid out, so exact layout work stays bounded.

use omnibar_text::contains_rtl;

use crate::config::UrlBarConfig;
use crate::display::char_prefix;
use crate::scroll::ScrollType;

/// State of the field the text will be rendered into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSurface {
    /// The user is editing; the full text must stay available
    pub focused: bool,
    /// The field sizes itself to its text, so there is no fixed width
    pub auto_width: bool,
}

/// Estimates how many characters can possibly be visible
#[derive(Debug, Clone, Copy)]
pub struct TruncationEstimator {
    min_length: usize,
    /// Characters that fit across the largest screen dimension
    char_budget: usize,
}

impl TruncationEstimator {
    pub fn new(config: &UrlBarConfig) -> Self {
        let dp = config.display.max_dimension_dp();
        Self {
            min_length: config.min_length_for_truncation,
            char_budget: (dp / config.dp_per_char.max(1)) as usize,
        }
    }

    /// Character count to keep, or `None` when the text must not be truncated
    pub fn truncation_index(
        &self,
        text: &str,
        scroll_type: ScrollType,
        scroll_to_index: usize,
        surface: RenderSurface,
    ) -> Option<usize> {
        if surface.focused || surface.auto_width || text.is_empty() {
            return None;
        }

        let len = text.chars().count();
        // Bidi truncation is not attempted.
        if len < self.min_length || contains_rtl(text) {
            return None;
        }

        let mut index = self.char_budget;
        // Nothing past the end of the origin is visible once scrolled to it.
        if scroll_type == ScrollType::ScrollToTld {
            index = index.max(scroll_to_index);
        }

        Some(index.min(len))
    }

    /// Text to hand to layout; the caller keeps the full text
    pub fn truncate<'a>(
        &self,
        text: &'a str,
        scroll_type: ScrollType,
        scroll_to_index: usize,
        surface: RenderSurface,
    ) -> &'a str {
        match self.truncation_index(text, scroll_type, scroll_to_index, surface) {
            Some(index) => {
                log::debug!("Truncating display text to {} characters", index);
                char_prefix(text, index)
            }
            None => text,
        }
    }
}
