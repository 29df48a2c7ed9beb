//! Scroll position calculation
//!
//! Decides the horizontal scroll offset of the URL bar text: either the end
//! of the origin flush with the trailing edge of the viewport, or the
//! beginning of the text. Also maintains the visible text hint.

use log::{debug, trace, warn};
use omnibar_text::{contains_rtl, is_rtl, TextLayout};
use serde::Serialize;

use crate::display::char_prefix;
use crate::hint::VisibleHintCache;

/// What scrolling should be applied after the text changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollType {
    #[default]
    NoScroll,
    /// Bring the end of the origin (the TLD) into view
    ScrollToTld,
    /// Show the first character of the text
    ScrollToBeginning,
}

/// Inputs and result of the last scroll calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub scroll_type: ScrollType,
    pub viewport_width: i32,
    pub font_size: f32,
    /// Layout direction of the field
    pub is_rtl: bool,
    pub origin_end_index: usize,
    /// Resulting scroll offset in pixels
    pub offset: i32,
}

/// Everything a scroll calculation depends on besides the layout
#[derive(Debug, Clone, Copy)]
pub struct ScrollRequest<'a> {
    /// Text the layout was built from
    pub text: &'a str,
    pub scroll_type: ScrollType,
    /// Character index just past the origin; only used by `ScrollToTld`
    pub origin_end_index: usize,
    pub viewport_width: i32,
    pub font_size: f32,
    /// Layout direction of the field
    pub is_rtl: bool,
    /// Whether the placeholder shown for empty text reads right-to-left
    pub placeholder_rtl: bool,
}

/// Result of a scroll request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Layout or viewport not known yet; retry after the next layout pass
    Pending,
    /// `NoScroll` was requested; nothing changed
    Skipped,
    /// Inputs matched the previous calculation; its offset is reapplied
    Reused(i32),
    /// Offset freshly calculated
    Scrolled(i32),
}

impl ScrollOutcome {
    /// Offset to apply, if any
    pub fn offset(self) -> Option<i32> {
        match self {
            ScrollOutcome::Reused(offset) | ScrollOutcome::Scrolled(offset) => Some(offset),
            ScrollOutcome::Pending | ScrollOutcome::Skipped => None,
        }
    }
}

/// Scroll calculator holding the cached state of the previous calculation
#[derive(Debug, Clone, Default)]
pub struct ScrollPositionCalculator {
    previous: Option<ScrollState>,
    hints: VisibleHintCache,
    /// Only compute a full visible hint when the text keeps the previous origin
    require_same_origin_for_hint: bool,
}

impl ScrollPositionCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip visible hint calculation when the origin differs from the
    /// previously scrolled text
    pub fn with_same_origin_hints(mut self, enabled: bool) -> Self {
        self.require_same_origin_for_hint = enabled;
        self
    }

    /// State recorded by the last completed calculation
    pub fn previous(&self) -> Option<&ScrollState> {
        self.previous.as_ref()
    }

    pub fn hints(&self) -> &VisibleHintCache {
        &self.hints
    }

    pub fn hints_mut(&mut self) -> &mut VisibleHintCache {
        &mut self.hints
    }

    /// Visible hint for the current viewport width
    pub fn visible_hint(&self, viewport_width: i32) -> Option<&str> {
        self.hints.get(viewport_width)
    }

    /// Calculate the scroll offset for `request`
    ///
    /// `layout` must have been built from `request.text`. Without a layout,
    /// or with an empty viewport, the request is deferred and no cached
    /// state is touched.
    pub fn calculate(&mut self, request: &ScrollRequest<'_>, layout: Option<&dyn TextLayout>) -> ScrollOutcome {
        let layout = match layout {
            Some(layout) if request.viewport_width > 0 => layout,
            _ => {
                debug!(
                    "Deferring {:?} until layout is available (viewport {}px)",
                    request.scroll_type, request.viewport_width
                );
                return ScrollOutcome::Pending;
            }
        };

        let scroll_type = if request.text.is_empty() {
            ScrollType::ScrollToBeginning
        } else {
            request.scroll_type
        };

        if let Some(previous) = &self.previous {
            // Font sizes change in discrete steps, so exact comparison is fine.
            if previous.scroll_type == scroll_type
                && previous.viewport_width == request.viewport_width
                && previous.font_size == request.font_size
                && previous.is_rtl == request.is_rtl
                && previous.origin_end_index == request.origin_end_index
                && self.hints.is_visible_text_the_same(request.text)
            {
                trace!("Reusing scroll offset {}", previous.offset);
                return ScrollOutcome::Reused(previous.offset);
            }
        }

        let offset = match scroll_type {
            ScrollType::ScrollToTld => self.scroll_to_tld(request, layout),
            ScrollType::ScrollToBeginning => self.scroll_to_beginning(request, layout),
            ScrollType::NoScroll => return ScrollOutcome::Skipped,
        };

        self.previous = Some(ScrollState {
            scroll_type,
            viewport_width: request.viewport_width,
            font_size: request.font_size,
            is_rtl: request.is_rtl,
            origin_end_index: request.origin_end_index,
            offset,
        });
        self.hints.record(request.text, request.viewport_width);

        ScrollOutcome::Scrolled(offset)
    }

    /// Offset that shows the very beginning of the text
    fn scroll_to_beginning(&mut self, request: &ScrollRequest<'_>, layout: &dyn TextLayout) -> i32 {
        // No hint on this path; it is not used for regular navigation.
        self.hints.set_hint(None);

        let viewport = request.viewport_width as f32;
        let scroll_pos = if request.text.is_empty() {
            if request.is_rtl && request.placeholder_rtl {
                // Offset 0 of an empty layout is already the maximum scroll position,
                // unlike non-empty text where the end position is used.
                (layout.primary_horizontal(0) as i32 - request.viewport_width) as f32
            } else {
                0.0
            }
        } else if is_rtl(request.text) {
            let end_x = layout.primary_horizontal(layout.len());
            (end_x - viewport + layout.text_width()).max(0.0)
        } else {
            0.0
        };

        debug!("Scrolling to beginning: offset {}", scroll_pos);
        scroll_pos as i32
    }

    /// Offset that keeps the end of the origin at the trailing edge
    fn scroll_to_tld(&mut self, request: &ScrollRequest<'_>, layout: &dyn TextLayout) -> i32 {
        let len = layout.len();
        let viewport = request.viewport_width as f32;

        if request.origin_end_index > len {
            warn!(
                "Attempting to scroll past the end of the URL: {} (end index {}, length {})",
                request.text, request.origin_end_index, len
            );
        }
        let origin_end = request.origin_end_index.min(len);

        let end_x = layout.primary_horizontal(origin_end);
        // The final origin component is LTR when its caret advances rightwards.
        let prior_x = if len == 1 {
            0.0
        } else {
            layout.primary_horizontal(origin_end.saturating_sub(1))
        };

        let scroll_pos = if prior_x < end_x {
            let hint = if end_x > viewport {
                // One extra character covers glyphs partially drawn past the origin.
                Some(char_prefix(request.text, (origin_end + 1).min(len)).to_string())
            } else if layout.primary_horizontal(len) <= viewport {
                // Nothing is clipped, so a hint would tell a consumer nothing.
                None
            } else if self.require_same_origin_for_hint && !self.keeps_previous_origin(request.text) {
                None
            } else {
                calculate_visible_hint(request.text, layout, viewport)
            };
            self.hints.set_hint(hint);

            (end_x - viewport).max(0.0)
        } else {
            // No hint for bidi text.
            self.hints.set_hint(None);

            let run_start = rtl_run_start(layout, origin_end, end_x);
            let width = layout.measure_text(run_start..origin_end);
            if width < viewport {
                (end_x + width - viewport).max(0.0)
            } else {
                end_x + viewport
            }
        };

        debug!(
            "Scrolling to TLD at index {}: end x {}, offset {}",
            origin_end, end_x, scroll_pos
        );
        scroll_pos as i32
    }

    /// Whether `text` starts with the origin of the previously scrolled text
    fn keeps_previous_origin(&self, text: &str) -> bool {
        let (Some(previous), Some(previous_text)) = (&self.previous, self.hints.scroll_text()) else {
            return false;
        };
        if previous_text.chars().count() < previous.origin_end_index {
            return false;
        }

        let previous_origin = char_prefix(previous_text, previous.origin_end_index);
        !previous_origin.is_empty() && text.starts_with(previous_origin)
    }
}

/// Start of the right-to-left run ending at `origin_end`
///
/// Walks backwards while carets sit right of `end_x`. The first RTL
/// character after LTR text reports an LTR-looking caret position, so the
/// run is extended by one more index once the walk stops.
fn rtl_run_start(layout: &dyn TextLayout, origin_end: usize, end_x: f32) -> usize {
    let mut start = origin_end.saturating_sub(1);
    for i in (0..origin_end.saturating_sub(1)).rev() {
        if layout.primary_horizontal(i) > end_x {
            start = i;
        } else {
            start = start.saturating_sub(1);
            break;
        }
    }
    start
}

/// Prefix of `text` up to and including the last character visible in a
/// viewport of `viewport` pixels scrolled to the start
///
/// Includes one character beyond the last fully visible one. Returns
/// `None` when the prefix contains right-to-left text, for which
/// advance-based searching is unreliable.
pub fn calculate_visible_hint(text: &str, layout: &dyn TextLayout, viewport: f32) -> Option<String> {
    let len = layout.len();
    let final_visible = layout.offset_for_advance(viewport);
    let exclusive_end = (final_visible + 1).min(len);

    let prefix = char_prefix(text, exclusive_end);
    if contains_rtl(prefix) {
        return None;
    }

    debug_assert!(
        layout.primary_horizontal(exclusive_end) >= viewport,
        "visible hint ends inside the viewport at {}",
        exclusive_end
    );
    Some(prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibar_text::{Direction, FixedAdvanceShaper, LayoutParams, LineLayout};

    // 10px font => 6px per character
    const FONT_SIZE: f32 = 10.0;

    fn layout(text: &str, direction: Direction, viewport: i32) -> LineLayout {
        let mut shaper = FixedAdvanceShaper::new();
        let params = LayoutParams {
            font_size: FONT_SIZE,
            direction,
            width: viewport as f32,
        };
        LineLayout::new(text, &mut shaper, &params)
    }

    fn request(text: &str, scroll_type: ScrollType, origin_end_index: usize, viewport_width: i32) -> ScrollRequest<'_> {
        ScrollRequest {
            text,
            scroll_type,
            origin_end_index,
            viewport_width,
            font_size: FONT_SIZE,
            is_rtl: false,
            placeholder_rtl: false,
        }
    }

    fn calculate(calc: &mut ScrollPositionCalculator, request: &ScrollRequest<'_>) -> ScrollOutcome {
        let line = layout(request.text, Direction::Ltr, request.viewport_width);
        calc.calculate(request, Some(&line))
    }

    #[test]
    fn test_short_ltr_text_not_scrolled() {
        let text = "https://a.com/x";
        for scroll_type in [ScrollType::ScrollToTld, ScrollType::ScrollToBeginning] {
            let mut calc = ScrollPositionCalculator::new();
            let outcome = calculate(&mut calc, &request(text, scroll_type, 13, 300));
            assert_eq!(outcome, ScrollOutcome::Scrolled(0));
            assert_eq!(calc.visible_hint(300), None);
        }
    }

    #[test]
    fn test_long_origin_scrolled_to_trailing_edge() {
        // Origin is 40 characters = 240px in a 120px viewport.
        let text = format!("https://{}.com/path/to/page", "a".repeat(28));
        let mut calc = ScrollPositionCalculator::new();
        let outcome = calculate(&mut calc, &request(&text, ScrollType::ScrollToTld, 40, 120));
        assert_eq!(outcome, ScrollOutcome::Scrolled(120));

        // Hint runs one character past the origin.
        let hint = calc.visible_hint(120).unwrap();
        assert_eq!(hint.chars().count(), 41);
        assert!(text.starts_with(hint));
    }

    #[test]
    fn test_visible_hint_for_clipped_path() {
        // Origin fits (13 chars = 78px), whole text (30 chars = 180px) does not.
        let text = "https://a.com/abcdefghijklmnop";
        let mut calc = ScrollPositionCalculator::new();
        let outcome = calculate(&mut calc, &request(text, ScrollType::ScrollToTld, 13, 100));
        assert_eq!(outcome, ScrollOutcome::Scrolled(0));

        // 16 characters fit in 100px, plus one of slack.
        assert_eq!(calc.visible_hint(100), Some("https://a.com/abc"));
        assert_eq!(calc.visible_hint(99), None);
    }

    #[test]
    fn test_visible_hint_dropped_for_rtl_prefix() {
        let text = "https://a.com/שלוםabcdefghijklmnop";
        let mut calc = ScrollPositionCalculator::new();
        let outcome = calculate(&mut calc, &request(text, ScrollType::ScrollToTld, 13, 100));
        assert_eq!(outcome, ScrollOutcome::Scrolled(0));
        assert_eq!(calc.visible_hint(100), None);
    }

    #[test]
    fn test_cache_hit_matches_fresh_calculation() {
        let text = format!("https://{}.com/", "b".repeat(40));
        let req = request(&text, ScrollType::ScrollToTld, 52, 150);

        let mut calc = ScrollPositionCalculator::new();
        let first = calculate(&mut calc, &req);
        let second = calculate(&mut calc, &req);
        assert_eq!(first, ScrollOutcome::Scrolled(162));
        assert_eq!(second, ScrollOutcome::Reused(162));

        let mut fresh = ScrollPositionCalculator::new();
        assert_eq!(calculate(&mut fresh, &req).offset(), second.offset());
    }

    #[test]
    fn test_cache_invalidated_by_origin_end_change() {
        let text = format!("https://{}.com/", "b".repeat(40));
        let mut calc = ScrollPositionCalculator::new();
        calculate(&mut calc, &request(&text, ScrollType::ScrollToTld, 52, 150));

        let req = request(&text, ScrollType::ScrollToTld, 45, 150);
        let outcome = calculate(&mut calc, &req);
        // 45 * 6 = 270 => 120
        assert_eq!(outcome, ScrollOutcome::Scrolled(120));
        assert_eq!(calc.previous().unwrap().origin_end_index, 45);

        let mut fresh = ScrollPositionCalculator::new();
        assert_eq!(calculate(&mut fresh, &req), outcome);
    }

    #[test]
    fn test_cache_invalidated_by_width_change() {
        let text = format!("https://{}.com/", "b".repeat(40));
        let mut calc = ScrollPositionCalculator::new();
        calculate(&mut calc, &request(&text, ScrollType::ScrollToTld, 52, 150));
        let outcome = calculate(&mut calc, &request(&text, ScrollType::ScrollToTld, 52, 200));
        assert_eq!(outcome, ScrollOutcome::Scrolled(112));
        assert_eq!(calc.previous().unwrap().viewport_width, 200);
    }

    #[test]
    fn test_pending_without_layout() {
        let mut calc = ScrollPositionCalculator::new();
        let req = request("https://a.com", ScrollType::ScrollToTld, 13, 100);
        assert_eq!(calc.calculate(&req, None), ScrollOutcome::Pending);
        assert!(calc.previous().is_none());

        let line = layout("https://a.com", Direction::Ltr, 0);
        let zero_width = request("https://a.com", ScrollType::ScrollToTld, 13, 0);
        assert_eq!(calc.calculate(&zero_width, Some(&line)), ScrollOutcome::Pending);
        assert!(calc.previous().is_none());
    }

    #[test]
    fn test_no_scroll_leaves_state() {
        let mut calc = ScrollPositionCalculator::new();
        calculate(&mut calc, &request("https://a.com", ScrollType::ScrollToTld, 13, 100));
        let before = *calc.previous().unwrap();

        let outcome = calculate(&mut calc, &request("https://b.com", ScrollType::NoScroll, 0, 100));
        assert_eq!(outcome, ScrollOutcome::Skipped);
        assert_eq!(*calc.previous().unwrap(), before);
    }

    #[test]
    fn test_origin_end_past_text_is_clamped() {
        let text = "a".repeat(30);
        let mut calc = ScrollPositionCalculator::new();
        let outcome = calculate(&mut calc, &request(&text, ScrollType::ScrollToTld, 500, 100));
        // Scrolls as far as possible: 180px of text in a 100px viewport.
        assert_eq!(outcome, ScrollOutcome::Scrolled(80));
    }

    #[test]
    fn test_empty_text_scrolls_to_beginning() {
        let mut calc = ScrollPositionCalculator::new();
        let outcome = calculate(&mut calc, &request("", ScrollType::ScrollToTld, 0, 100));
        assert_eq!(outcome, ScrollOutcome::Scrolled(0));
        assert_eq!(calc.previous().unwrap().scroll_type, ScrollType::ScrollToBeginning);
    }

    #[test]
    fn test_empty_rtl_field_with_rtl_placeholder() {
        let mut calc = ScrollPositionCalculator::new();
        let req = ScrollRequest {
            is_rtl: true,
            placeholder_rtl: true,
            ..request("", ScrollType::ScrollToBeginning, 0, 100)
        };
        let line = layout("", Direction::Rtl, 100);
        let outcome = calc.calculate(&req, Some(&line));
        assert_eq!(outcome, ScrollOutcome::Scrolled(line.primary_horizontal(0) as i32 - 100));
        assert!(outcome.offset().unwrap() <= 0);
        assert_eq!(calc.visible_hint(100), None);
    }

    #[test]
    fn test_rtl_text_scrolls_to_its_start() {
        // 30 Hebrew characters = 180px, laid out in an LTR paragraph.
        let text = "ש".repeat(30);
        let mut calc = ScrollPositionCalculator::new();
        let outcome = calculate(&mut calc, &request(&text, ScrollType::ScrollToBeginning, 0, 100));
        assert_eq!(outcome, ScrollOutcome::Scrolled(80));
    }

    #[test]
    fn test_bidi_origin_takes_rtl_branch() {
        // "https://" followed by a 20 character Hebrew host, all in an LTR paragraph.
        let text = format!("https://{}/page", "א".repeat(20));
        let mut calc = ScrollPositionCalculator::new();
        let outcome = calculate(&mut calc, &request(&text, ScrollType::ScrollToTld, 28, 60));

        // The RTL run starts at the first Hebrew character: 120px wide, wider
        // than the viewport, so the offset is end_x + viewport.
        let line = layout(&text, Direction::Ltr, 60);
        let end_x = line.primary_horizontal(28);
        assert!((end_x - 48.0).abs() < 0.01);
        assert_eq!(outcome, ScrollOutcome::Scrolled(108));
        assert_eq!(calc.visible_hint(60), None);
    }

    #[test]
    fn test_short_rtl_run_flush_with_edge() {
        let text = "https://אבג/x";
        let mut calc = ScrollPositionCalculator::new();
        let outcome = calculate(&mut calc, &request(text, ScrollType::ScrollToTld, 11, 40));
        // end_x = 48 (left edge of the run), run width 18px: 48 + 18 - 40.
        assert_eq!(outcome, ScrollOutcome::Scrolled(26));
    }

    #[test]
    fn test_rtl_run_start() {
        let line = layout("abcאבג", Direction::Ltr, 100);
        let end_x = line.primary_horizontal(6);
        assert_eq!(rtl_run_start(&line, 6, end_x), 3);
        assert_eq!(rtl_run_start(&line, 0, 0.0), 0);
    }

    #[test]
    fn test_same_origin_hint_gate() {
        let mut calc = ScrollPositionCalculator::new().with_same_origin_hints(true);
        let first = "https://a.com/abcdefghijklmnop";
        calculate(&mut calc, &request(first, ScrollType::ScrollToTld, 13, 100));
        // No previous origin on the first calculation.
        assert_eq!(calc.visible_hint(100), None);

        let second = "https://a.com/abcdefghijklmnopq";
        calculate(&mut calc, &request(second, ScrollType::ScrollToTld, 13, 100));
        assert_eq!(calc.visible_hint(100), Some("https://a.com/abc"));

        let other = "https://b.com/abcdefghijklmnop";
        calculate(&mut calc, &request(other, ScrollType::ScrollToTld, 13, 100));
        assert_eq!(calc.visible_hint(100), None);
    }

    #[test]
    fn test_calculate_visible_hint() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let line = layout(text, Direction::Ltr, 60);
        assert_eq!(calculate_visible_hint(text, &line, 60.0).as_deref(), Some("abcdefghijk"));
    }
}
