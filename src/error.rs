//! Error types
//!
//! Extraction is best-effort: only fetch and configuration failures abort an
//! extraction. Everything else is collected next to the extracted data.

use thiserror::Error;

use crate::config::Syntax;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Transport-level failure while fetching a page
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Page answered with anything but 200 OK
    #[error("received HTTP status {0}")]
    HttpStatus(u16),

    /// A JSON-LD block could not be decoded
    #[error("invalid JSON-LD: {0}")]
    JsonLd(#[source] serde_json::Error),

    #[error("failed to serialize extracted data: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid extractor config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("unknown syntax: {0}")]
    UnknownSyntax(String),

    /// An extractor worker died before reporting back
    #[error("{syntax} extractor failed: {message}")]
    Worker { syntax: Syntax, message: String },
}
