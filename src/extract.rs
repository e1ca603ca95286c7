//! Extraction orchestration
//!
//! Runs every selected extractor over one page, each on its own blocking
//! worker, and gathers their results and non-fatal errors.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::{ExtractorConfig, Syntax};
use crate::error::{ExtractError, Result};
use crate::extractors::{
    parse_jsonld, parse_microdata, parse_opengraph, parse_xcards, JsonLdObject, MicrodataItem,
    OpenGraph, XCards,
};
use crate::fetch::fetch;

/// Output of one extractor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Extracted {
    OpenGraph(Option<OpenGraph>),
    XCards(Option<XCards>),
    JsonLd(Vec<JsonLdObject>),
    Microdata(Vec<MicrodataItem>),
}

impl Extracted {
    pub fn is_empty(&self) -> bool {
        match self {
            Extracted::OpenGraph(og) => og.is_none(),
            Extracted::XCards(card) => card.is_none(),
            Extracted::JsonLd(objects) => objects.is_empty(),
            Extracted::Microdata(items) => items.is_empty(),
        }
    }
}

/// Everything extracted from one page
#[derive(Debug)]
pub struct Extraction {
    url: String,
    extracted: BTreeMap<Syntax, Extracted>,
    errors: Vec<ExtractError>,
}

impl Extraction {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Output of `syntax`, `None` if it was not selected
    pub fn get(&self, syntax: Syntax) -> Option<&Extracted> {
        self.extracted.get(&syntax)
    }

    pub fn opengraph(&self) -> Option<&OpenGraph> {
        match self.get(Syntax::OpenGraph) {
            Some(Extracted::OpenGraph(og)) => og.as_ref(),
            _ => None,
        }
    }

    pub fn xcards(&self) -> Option<&XCards> {
        match self.get(Syntax::XCards) {
            Some(Extracted::XCards(card)) => card.as_ref(),
            _ => None,
        }
    }

    pub fn jsonld(&self) -> &[JsonLdObject] {
        match self.get(Syntax::JsonLd) {
            Some(Extracted::JsonLd(objects)) => objects,
            _ => &[],
        }
    }

    pub fn microdata(&self) -> &[MicrodataItem] {
        match self.get(Syntax::Microdata) {
            Some(Extracted::Microdata(items)) => items,
            _ => &[],
        }
    }

    /// Non-fatal errors reported by the extractors
    pub fn errors(&self) -> &[ExtractError] {
        &self.errors
    }

    /// True when no extractor found anything
    pub fn is_empty(&self) -> bool {
        self.extracted.values().all(Extracted::is_empty)
    }

    /// Pretty JSON object keyed by syntax name
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.extracted).map_err(ExtractError::Serialize)
    }
}

/// Metadata extractor for a single page at a time
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Restrict extraction to `syntaxes`. An empty selection keeps the
    /// current one.
    pub fn with_syntaxes(mut self, syntaxes: impl IntoIterator<Item = Syntax>) -> Self {
        let mut selected: Vec<Syntax> = Vec::new();
        for syntax in syntaxes {
            if !selected.contains(&syntax) {
                selected.push(syntax);
            }
        }
        if !selected.is_empty() {
            self.config.syntaxes = selected;
        }
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Fetch timeout in seconds
    pub fn with_fetch_timeout(mut self, fetch_timeout: u8) -> Self {
        self.config.fetch_timeout = fetch_timeout;
        self
    }

    /// Extract metadata from `content`, or from `url` when no content is given.
    ///
    /// `url` is also the base for resolving relative microdata URLs. Only a
    /// failed fetch is an error; extractor problems end up in
    /// [`Extraction::errors`].
    #[instrument(skip(self, content), fields(syntaxes = ?self.config.syntaxes))]
    pub async fn extract(&self, url: &str, content: Option<String>) -> Result<Extraction> {
        let content: Arc<str> = match content {
            Some(content) => content.into(),
            None => fetch(url, &self.config).await?.into(),
        };

        let workers = self.config.syntaxes.iter().map(|&syntax| {
            let url = url.to_string();
            let content = Arc::clone(&content);
            async move {
                let joined = tokio::task::spawn_blocking(move || run(syntax, &url, &content)).await;
                (syntax, joined)
            }
        });

        let mut extraction = Extraction {
            url: url.to_string(),
            extracted: BTreeMap::new(),
            errors: Vec::new(),
        };

        for (syntax, joined) in join_all(workers).await {
            match joined {
                Ok((extracted, errors)) => {
                    debug!(%syntax, errors = errors.len(), "extractor finished");
                    extraction.errors.extend(errors);
                    extraction.extracted.insert(syntax, extracted);
                }
                Err(e) => {
                    warn!(%syntax, "extractor worker failed: {}", e);
                    extraction.errors.push(ExtractError::Worker {
                        syntax,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(extraction)
    }
}

fn run(syntax: Syntax, url: &str, content: &str) -> (Extracted, Vec<ExtractError>) {
    match syntax {
        Syntax::OpenGraph => {
            let (og, errors) = parse_opengraph(content);
            (Extracted::OpenGraph(og), errors)
        }
        Syntax::XCards => {
            let (card, errors) = parse_xcards(content);
            (Extracted::XCards(card), errors)
        }
        Syntax::JsonLd => {
            let (objects, errors) = parse_jsonld(content);
            debug!(objects = objects.len(), "json-ld extracted");
            (Extracted::JsonLd(objects), errors)
        }
        Syntax::Microdata => {
            let (items, errors) = parse_microdata(url, content);
            debug!(items = items.len(), "microdata extracted");
            (Extracted::Microdata(items), errors)
        }
    }
}
