//! Display text
//!
//! The string shown in the URL bar and where its origin ends.

use url::Url;

use crate::error::{UrlBarError, UrlBarResult};

/// Text shown in the URL bar
///
/// Replaced wholesale on every update. Indices are character indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayText {
    text: String,
    char_len: usize,
    /// Character index just past the origin (scheme, host and port)
    origin_end_index: usize,
}

impl DisplayText {
    /// Create display text with no known origin
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_origin_end(text, 0)
    }

    pub fn with_origin_end(text: impl Into<String>, origin_end_index: usize) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            text,
            char_len,
            origin_end_index,
        }
    }

    /// Build display text from a URL as typed or shown
    ///
    /// The URL is validated with the `url` crate, but the origin end is
    /// located in the string as given, so internationalized hosts keep
    /// their displayed (not punycode) form.
    pub fn from_url(input: &str) -> UrlBarResult<Self> {
        let url = Url::parse(input)?;
        if !url.has_host() {
            return Err(UrlBarError::MissingHost(input.to_string()));
        }

        let authority_start = input
            .find("://")
            .map(|i| i + 3)
            .ok_or_else(|| UrlBarError::MissingHost(input.to_string()))?;
        let rest = &input[authority_start..];
        let authority_len = rest
            .find(|c: char| matches!(c, '/' | '?' | '#'))
            .unwrap_or(rest.len());
        let origin_end = input[..authority_start + authority_len].chars().count();

        Ok(Self::with_origin_end(input, origin_end))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    pub fn origin_end_index(&self) -> usize {
        self.origin_end_index
    }

    /// The first `count` characters
    pub fn prefix(&self, count: usize) -> &str {
        char_prefix(&self.text, count)
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl From<&str> for DisplayText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for DisplayText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// The first `count` characters of `text` (all of it if shorter)
pub(crate) fn char_prefix(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
