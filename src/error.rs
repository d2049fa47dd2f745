//! Error types for the ipynb-render library.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while reading a notebook or a configuration.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid notebook JSON: {0}")]
    Json(String),

    #[error("Unsupported notebook format version {0} (expected 4)")]
    UnsupportedVersion(u32),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Errors that occur during rendering.
///
/// Unknown document content never produces one of these; it is rendered as a
/// placeholder element instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("missing renderer for MIME type: {0}")]
    MissingRenderer(String),

    #[error("Math rendering error: {0}")]
    Math(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json(err.to_string())
    }
}
