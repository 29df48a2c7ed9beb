//! URL bar error types

use omnibar_text::TextError;
use thiserror::Error;

/// URL bar result type
pub type UrlBarResult<T> = Result<T, UrlBarError>;

/// Errors from building display text or loading configuration
///
/// Scroll calculation itself never fails; these cover the edges where
/// user input and files come in.
#[derive(Debug, Error)]
pub enum UrlBarError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Text(#[from] TextError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UrlBarError::MissingHost("data:text/plain,hi".to_string());
        assert_eq!(format!("{}", err), "URL has no host: data:text/plain,hi");
    }

    #[test]
    fn test_from_parse_error() {
        let err: UrlBarError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, UrlBarError::InvalidUrl(_)));
    }
}
