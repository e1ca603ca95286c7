//! JSON-LD extraction from HTML
//!
//! Extracts JSON-LD data from <script type="application/ld+json"> tags.
//! Objects are returned as written, in document order; `@graph` is not
//! flattened.

use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ExtractError;

pub type JsonLdObject = Map<String, Value>;

/// Parse `html` and extract its JSON-LD objects
pub fn parse_jsonld(html: &str) -> (Vec<JsonLdObject>, Vec<ExtractError>) {
    let document = Html::parse_document(html);
    extract_jsonld(&document)
}

/// Extract JSON-LD objects from a parsed document.
///
/// A block holding an array contributes each of its objects; a block that
/// fails to decode is reported and skipped.
pub fn extract_jsonld(document: &Html) -> (Vec<JsonLdObject>, Vec<ExtractError>) {
    let mut objects = Vec::new();
    let mut errors = Vec::new();

    // Select all JSON-LD script tags
    let selector = match Selector::parse(r#"script[type="application/ld+json"]"#) {
        Ok(s) => s,
        Err(_) => return (objects, errors),
    };

    for element in document.select(&selector) {
        let content = element.inner_html();
        let trimmed = content.trim();

        let decoded = if trimmed.starts_with('[') {
            serde_json::from_str::<Vec<JsonLdObject>>(trimmed)
        } else if trimmed.starts_with('{') {
            serde_json::from_str::<JsonLdObject>(trimmed).map(|object| vec![object])
        } else {
            continue;
        };

        match decoded {
            Ok(decoded) => objects.extend(decoded),
            Err(e) => {
                warn!("skipping malformed JSON-LD block: {}", e);
                errors.push(ExtractError::JsonLd(e));
            }
        }
    }

    (objects, errors)
}
