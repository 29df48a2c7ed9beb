//! URL bar state
//!
//! Owns the display text, its layout and the scroll calculator. The
//! hosting widget drives it with explicit calls for text, focus, font,
//! direction and layout pass events, and reads back the scroll offset.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use omnibar_text::{
    first_strong_direction, is_rtl, Direction, FixedAdvanceShaper, LayoutParams, LineLayout, TextLayout,
    TextShaper,
};
use serde::Serialize;

use crate::config::UrlBarConfig;
use crate::display::DisplayText;
use crate::ellipsis::{apply_ellipsis, ellipsis_span};
use crate::scroll::{ScrollOutcome, ScrollPositionCalculator, ScrollRequest, ScrollType};
use crate::truncation::{RenderSurface, TruncationEstimator};

/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Direction of the URL as laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlDirection {
    /// No text; the locale decides
    #[default]
    Locale,
    LeftToRight,
    RightToLeft,
}

type DirectionListener = Box<dyn FnMut(UrlDirection)>;

/// Single-line URL field
pub struct UrlBar<S: TextShaper = FixedAdvanceShaper> {
    config: UrlBarConfig,
    shaper: S,
    truncation: TruncationEstimator,
    text: DisplayText,
    /// Characters hidden behind an ellipsis when rendering
    ellipsis: Option<Range<usize>>,
    placeholder: String,
    font_size: f32,
    layout_direction: Direction,
    focused: bool,
    auto_width: bool,
    viewport_width: i32,
    layout: Option<LineLayout>,
    /// Text, font or direction changed since the last layout pass
    layout_requested: bool,
    pending_scroll: bool,
    /// Intended scroll type; may not be applied yet while a scroll is pending
    current_scroll_type: ScrollType,
    origin_end_index: usize,
    scroll_x: i32,
    calculator: ScrollPositionCalculator,
    url_direction: UrlDirection,
    direction_listener: Option<DirectionListener>,
}

impl UrlBar<FixedAdvanceShaper> {
    /// URL bar measuring text with the fixed-advance estimate
    pub fn new(config: UrlBarConfig) -> Self {
        Self::with_shaper(FixedAdvanceShaper::new(), config)
    }
}

impl<S: TextShaper> UrlBar<S> {
    pub fn with_shaper(shaper: S, config: UrlBarConfig) -> Self {
        let truncation = TruncationEstimator::new(&config);
        let calculator =
            ScrollPositionCalculator::new().with_same_origin_hints(config.no_visible_hint_for_different_tld);

        Self {
            config,
            shaper,
            truncation,
            text: DisplayText::default(),
            ellipsis: None,
            placeholder: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            layout_direction: Direction::Ltr,
            focused: false,
            auto_width: false,
            viewport_width: 0,
            layout: None,
            layout_requested: true,
            pending_scroll: false,
            current_scroll_type: ScrollType::NoScroll,
            origin_end_index: 0,
            scroll_x: 0,
            calculator,
            url_direction: UrlDirection::Locale,
            direction_listener: None,
        }
    }

    /// Replace the text
    ///
    /// Layout is requested; any scroll waits for the next layout pass.
    pub fn set_text(&mut self, text: impl Into<DisplayText>) {
        self.text = text.into();
        log::trace!("set_text: {}", self.text.as_str());
        self.request_layout();
        self.limit_displayable_length();
        self.fixup_text_direction();

        self.calculator.hints_mut().retain_if_prefix_of(self.text.as_str());
    }

    /// Replace the text, truncating it first if it is far longer than
    /// could ever be visible
    pub fn set_text_with_truncation(&mut self, text: &str, scroll_type: ScrollType, scroll_to_index: usize) {
        let surface = RenderSurface {
            focused: self.focused,
            auto_width: self.auto_width,
        };
        let truncated = self.truncation.truncate(text, scroll_type, scroll_to_index, surface);
        self.set_text(truncated);
    }

    /// Set how the text should be scrolled
    ///
    /// `scroll_to_index` is the end of the origin and only applies to
    /// `ScrollType::ScrollToTld`.
    pub fn set_scroll_state(&mut self, scroll_type: ScrollType, scroll_to_index: usize) {
        self.origin_end_index = if scroll_type == ScrollType::ScrollToTld {
            scroll_to_index
        } else {
            0
        };
        self.scroll_display_text(scroll_type);
    }

    /// Scroll the text according to `scroll_type`, or remember it until
    /// the layout is known
    pub fn scroll_display_text(&mut self, scroll_type: ScrollType) {
        self.current_scroll_type = scroll_type;
        self.pending_scroll = self.layout_requested || self.layout.is_none();
        if self.pending_scroll {
            return;
        }

        // The caret owns the scroll position while editing.
        if self.focused {
            return;
        }

        let request = ScrollRequest {
            text: self.text.as_str(),
            scroll_type,
            origin_end_index: self.origin_end_index,
            viewport_width: self.viewport_width,
            font_size: self.font_size,
            is_rtl: self.layout_direction.is_rtl(),
            placeholder_rtl: is_rtl(&self.placeholder),
        };
        let layout = self.layout.as_ref().map(|layout| layout as &dyn TextLayout);

        match self.calculator.calculate(&request, layout) {
            ScrollOutcome::Pending => self.pending_scroll = true,
            ScrollOutcome::Skipped => {}
            ScrollOutcome::Reused(offset) | ScrollOutcome::Scrolled(offset) => self.scroll_x = offset,
        }
    }

    /// Layout pass of the hosting widget
    ///
    /// Lays out the text for `viewport_width` (content width, padding
    /// excluded) and resolves any pending scroll or width change.
    pub fn on_layout(&mut self, viewport_width: i32) {
        let width_changed = viewport_width != self.viewport_width;
        self.viewport_width = viewport_width;

        if self.layout_requested || width_changed || self.layout.is_none() {
            self.rebuild_layout();
        }
        self.layout_requested = false;

        let last_width = self.calculator.hints().viewport_width();
        let metrics_changed = self.calculator.previous().is_some_and(|previous| {
            previous.font_size != self.font_size || previous.is_rtl != self.layout_direction.is_rtl()
        });
        if self.pending_scroll || last_width != Some(viewport_width) || metrics_changed {
            self.scroll_display_text(self.current_scroll_type);
        }
    }

    /// Size changed without a full layout pass
    pub fn on_size_changed(&mut self, viewport_width: i32) {
        self.on_layout(viewport_width);
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        if font_size != self.font_size {
            self.font_size = font_size;
            self.calculator.hints_mut().set_hint(None);
            self.request_layout();
        }
    }

    pub fn set_layout_direction(&mut self, direction: Direction) {
        if direction != self.layout_direction {
            self.layout_direction = direction;
            self.calculator.hints_mut().set_hint(None);
            self.request_layout();
            self.fixup_text_direction();
        }
    }

    pub fn on_font_or_direction_changed(&mut self, font_size: f32, is_rtl: bool) {
        self.set_font_size(font_size);
        self.set_layout_direction(Direction::from_rtl(is_rtl));
    }

    pub fn set_focused(&mut self, focused: bool) {
        if focused == self.focused {
            return;
        }
        self.focused = focused;
        if focused {
            self.pending_scroll = false;
        }
        // Paragraph direction depends on focus.
        self.request_layout();
        self.fixup_text_direction();
    }

    /// Whether the field sizes itself to its content
    pub fn set_auto_width(&mut self, auto_width: bool) {
        self.auto_width = auto_width;
    }

    /// Text shown while the field is empty
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Register a listener for URL direction changes; it is called
    /// immediately with the current direction
    pub fn set_url_direction_listener(&mut self, mut listener: impl FnMut(UrlDirection) + 'static) {
        listener(self.url_direction);
        self.direction_listener = Some(Box::new(listener));
    }

    pub fn clear_url_direction_listener(&mut self) {
        self.direction_listener = None;
    }

    /// Current horizontal scroll offset in pixels
    pub fn scroll_offset(&self) -> i32 {
        self.scroll_x
    }

    /// Prefix of the text covering everything visible, if known for the
    /// current viewport width
    pub fn visible_text_hint(&self) -> Option<&str> {
        self.calculator.visible_hint(self.viewport_width)
    }

    /// Whether `text` would look the same as what was last scrolled
    pub fn is_visible_text_the_same(&self, text: &str) -> bool {
        self.calculator.hints().is_visible_text_the_same(text)
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn display_text(&self) -> &DisplayText {
        &self.text
    }

    /// Text as painted, with an ellipsis standing in for overly long middles
    ///
    /// Layout and scroll offset describe the full text. The two agree up to
    /// the start of the elided span, which lies far past any origin end.
    pub fn rendered_text(&self) -> Cow<'_, str> {
        match &self.ellipsis {
            Some(span) => Cow::Owned(apply_ellipsis(self.text.as_str(), span)),
            None => Cow::Borrowed(self.text.as_str()),
        }
    }

    pub fn ellipsis_span(&self) -> Option<Range<usize>> {
        self.ellipsis.clone()
    }

    pub fn url_direction(&self) -> UrlDirection {
        self.url_direction
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn config(&self) -> &UrlBarConfig {
        &self.config
    }

    /// Layout of the current text, once a layout pass has run
    pub fn layout(&self) -> Option<&LineLayout> {
        self.layout.as_ref()
    }

    fn request_layout(&mut self) {
        self.layout_requested = true;
    }

    // Lays out the full text, not the ellipsized one, so indices stay
    // character indices into `self.text`.
    fn rebuild_layout(&mut self) {
        let params = LayoutParams {
            font_size: self.font_size,
            direction: self.paragraph_direction(),
            width: self.viewport_width.max(0) as f32,
        };
        self.layout = Some(LineLayout::new(self.text.as_str(), &mut self.shaper, &params));
    }

    /// Unfocused URLs are laid out left-to-right so RTL runs never flip the
    /// whole URL around; while editing, or when empty, the text decides.
    fn paragraph_direction(&self) -> Direction {
        if self.focused || self.text.is_empty() {
            first_strong_direction(self.text.as_str()).unwrap_or(self.layout_direction)
        } else {
            Direction::Ltr
        }
    }

    fn fixup_text_direction(&mut self) {
        let direction = if self.text.is_empty() {
            UrlDirection::Locale
        } else {
            match self.paragraph_direction() {
                Direction::Ltr => UrlDirection::LeftToRight,
                Direction::Rtl => UrlDirection::RightToLeft,
            }
        };

        if direction != self.url_direction {
            log::debug!("URL direction changed to {:?}", direction);
            self.url_direction = direction;
            if let Some(listener) = self.direction_listener.as_mut() {
                listener(direction);
            }
            // Keep the display text visible in the new direction.
            self.scroll_display_text(self.current_scroll_type);
        }
    }

    fn limit_displayable_length(&mut self) {
        self.ellipsis = ellipsis_span(self.text.len(), self.config.max_displayable_length());
    }
}

impl<S: TextShaper> fmt::Debug for UrlBar<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlBar")
            .field("text", &self.text)
            .field("viewport_width", &self.viewport_width)
            .field("font_size", &self.font_size)
            .field("focused", &self.focused)
            .field("scroll_type", &self.current_scroll_type)
            .field("scroll_x", &self.scroll_x)
            .field("pending_scroll", &self.pending_scroll)
            .finish_non_exhaustive()
    }
}
