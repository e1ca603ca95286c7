//! Structured metadata extraction from HTML
//!
//! Extracts the machine-readable metadata a page embeds:
//! - Microdata (itemscope/itemprop, schema-agnostic)
//! - JSON-LD
//! - OpenGraph meta tags
//! - X (Twitter) card meta tags, completed from OpenGraph
//!
//! Pages can be handed in as markup or fetched over HTTP by [`Extractor`].

pub mod config;
pub mod error;
pub mod extract;
pub mod extractors;
pub mod fetch;

pub use config::{ExtractorConfig, Syntax};
pub use error::{ExtractError, Result};
pub use extract::{Extracted, Extraction, Extractor};
pub use extractors::*;
