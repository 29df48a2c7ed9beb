//! Text error types

use thiserror::Error;

/// Text operation result type
pub type TextResult<T> = Result<T, TextError>;

/// Text measurement errors
#[derive(Debug, Error)]
pub enum TextError {
    #[error("Failed to parse font data: {0}")]
    FontParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
