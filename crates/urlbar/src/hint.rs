//! Visible text hint cache
//!
//! Remembers which prefix of the text was visible after the last scroll
//! calculation, so a consumer can skip re-rendering when only text past
//! the visible part changes (e.g. a same-document navigation appending a
//! fragment).

/// Visible prefix of the last scrolled text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleHintCache {
    /// Prefix of the text up to and including the last visible character
    hint: Option<String>,
    /// Text the last scroll was calculated for
    scroll_text: Option<String>,
    /// Viewport width the last scroll was calculated for
    viewport_width: Option<i32>,
}

impl VisibleHintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hint, if it was calculated for this viewport width
    ///
    /// Returns `None` both when no hint exists and when the width changed
    /// since, in which case the hint is unknown rather than stale.
    pub fn get(&self, viewport_width: i32) -> Option<&str> {
        if self.viewport_width != Some(viewport_width) {
            return None;
        }
        self.hint.as_deref()
    }

    /// Whether `text` would show exactly what was visible last time
    pub fn is_visible_text_the_same(&self, text: &str) -> bool {
        match &self.hint {
            Some(hint) => text.starts_with(hint.as_str()),
            None => self.scroll_text.as_deref() == Some(text),
        }
    }

    /// Drop the hint unless it is still a prefix of `text`
    pub fn retain_if_prefix_of(&mut self, text: &str) {
        if self.hint.as_deref().is_some_and(|hint| !text.starts_with(hint)) {
            self.hint = None;
        }
    }

    /// The hint regardless of viewport width
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Text of the last scroll calculation
    pub fn scroll_text(&self) -> Option<&str> {
        self.scroll_text.as_deref()
    }

    pub fn viewport_width(&self) -> Option<i32> {
        self.viewport_width
    }

    pub(crate) fn set_hint(&mut self, hint: Option<String>) {
        self.hint = hint;
    }

    pub(crate) fn record(&mut self, text: &str, viewport_width: i32) {
        self.scroll_text = Some(text.to_string());
        self.viewport_width = Some(viewport_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_hint(hint: &str, text: &str, width: i32) -> VisibleHintCache {
        let mut cache = VisibleHintCache::new();
        cache.set_hint(Some(hint.to_string()));
        cache.record(text, width);
        cache
    }

    #[test]
    fn test_empty_cache() {
        let cache = VisibleHintCache::new();
        assert_eq!(cache.get(100), None);
        assert!(!cache.is_visible_text_the_same("anything"));
    }

    #[test]
    fn test_get_requires_same_width() {
        let cache = cache_with_hint("https://a.com/x", "https://a.com/xyz", 300);
        assert_eq!(cache.get(300), Some("https://a.com/x"));
        assert_eq!(cache.get(301), None);
        assert_eq!(cache.hint(), Some("https://a.com/x"));
    }

    #[test]
    fn test_same_visible_text_by_prefix() {
        let cache = cache_with_hint("https://a.com/x", "https://a.com/xyz", 300);
        assert!(cache.is_visible_text_the_same("https://a.com/xyz#fragment"));
        assert!(!cache.is_visible_text_the_same("https://b.com/xyz"));
    }

    #[test]
    fn test_same_visible_text_without_hint() {
        let mut cache = VisibleHintCache::new();
        cache.record("https://a.com", 300);
        assert!(cache.is_visible_text_the_same("https://a.com"));
        assert!(!cache.is_visible_text_the_same("https://a.com/"));
    }

    #[test]
    fn test_retain_if_prefix_of() {
        let mut cache = cache_with_hint("https://a.com/x", "https://a.com/xyz", 300);
        cache.retain_if_prefix_of("https://a.com/xylophone");
        assert!(cache.hint().is_some());

        cache.retain_if_prefix_of("https://other.com");
        assert_eq!(cache.hint(), None);
        assert_eq!(cache.scroll_text(), Some("https://a.com/xyz"));
    }
}
