//! Display length limiting
//!
//! Extremely long text has its middle replaced with an ellipsis when
//! rendered. Only presentation is affected; the text itself is unchanged.

use std::ops::Range;

use crate::display::char_prefix;

pub const ELLIPSIS: char = '\u{2026}';

/// Character range hidden behind the ellipsis, if the text is too long
pub fn ellipsis_span(len: usize, max_len: usize) -> Option<Range<usize>> {
    if len <= max_len {
        return None;
    }
    let keep = max_len / 2;
    Some(keep..len - keep)
}

/// Render `text` with `span` collapsed into a single ellipsis
pub fn apply_ellipsis(text: &str, span: &Range<usize>) -> String {
    let head = char_prefix(text, span.start);
    let tail: String = text.chars().skip(span.end).collect();

    let mut rendered = String::with_capacity(head.len() + ELLIPSIS.len_utf8() + tail.len());
    rendered.push_str(head);
    rendered.push(ELLIPSIS);
    rendered.push_str(&tail);
    rendered
}
