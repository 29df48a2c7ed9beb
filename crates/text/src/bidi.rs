//! Bidirectional text helpers
//!
//! Direction checks based on Unicode bidi classes.

use unicode_bidi::{bidi_class, BidiClass, Level};

/// Paragraph or run direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn from_rtl(rtl: bool) -> Self {
        if rtl {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Direction::Rtl
    }

    /// Embedding level used as the paragraph level for this direction
    pub(crate) fn level(self) -> Level {
        match self {
            Direction::Ltr => Level::ltr(),
            Direction::Rtl => Level::rtl(),
        }
    }
}

/// Check if a character is strongly right-to-left
pub fn is_strong_rtl(c: char) -> bool {
    matches!(bidi_class(c), BidiClass::R | BidiClass::AL)
}

/// Check if any character in the text is strongly right-to-left
pub fn contains_rtl(text: &str) -> bool {
    text.chars().any(is_strong_rtl)
}

/// Direction of the first strongly directional character, if any
pub fn first_strong_direction(text: &str) -> Option<Direction> {
    text.chars().find_map(|c| match bidi_class(c) {
        BidiClass::L => Some(Direction::Ltr),
        BidiClass::R | BidiClass::AL => Some(Direction::Rtl),
        _ => None,
    })
}

/// Check if the text reads right-to-left (first strong character heuristic)
pub fn is_rtl(text: &str) -> bool {
    first_strong_direction(text) == Some(Direction::Rtl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_rtl() {
        assert!(!contains_rtl("https://example.com/"));
        assert!(contains_rtl("https://example.com/שלום"));
        assert!(contains_rtl("مثال"));
        assert!(!contains_rtl(""));
    }

    #[test]
    fn test_first_strong_direction() {
        assert_eq!(first_strong_direction("123 abc"), Some(Direction::Ltr));
        assert_eq!(first_strong_direction("123 שלום abc"), Some(Direction::Rtl));
        assert_eq!(first_strong_direction("12/34"), None);
    }

    #[test]
    fn test_is_rtl_uses_first_strong() {
        assert!(is_rtl("שלום.com"));
        assert!(!is_rtl("example.שלום"));
        assert!(!is_rtl(""));
    }
}
