//! Extractor configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

pub const DEFAULT_USER_AGENT: &str =
    "microdata-extract (+https://crates.io/crates/microdata_extract)";

/// Fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT: u8 = 3;

/// Metadata syntaxes the extractor understands.
///
/// Variants are declared in the lexical order of their names so that maps
/// keyed by `Syntax` serialize with sorted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Syntax {
    #[serde(rename = "json-ld")]
    JsonLd,
    #[serde(rename = "microdata")]
    Microdata,
    #[serde(rename = "opengraph")]
    OpenGraph,
    #[serde(rename = "xcards")]
    XCards,
}

impl Syntax {
    /// Every supported syntax, in default processing order
    pub const ALL: [Syntax; 4] = [
        Syntax::OpenGraph,
        Syntax::XCards,
        Syntax::JsonLd,
        Syntax::Microdata,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::JsonLd => "json-ld",
            Syntax::Microdata => "microdata",
            Syntax::OpenGraph => "opengraph",
            Syntax::XCards => "xcards",
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Syntax {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        Syntax::ALL
            .into_iter()
            .find(|syntax| syntax.as_str() == s.trim())
            .ok_or_else(|| ExtractError::UnknownSyntax(s.to_string()))
    }
}

/// Settings shared by every extraction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Syntaxes to extract, in processing order
    #[serde(default = "default_syntaxes")]
    pub syntaxes: Vec<Syntax>,
    /// User-Agent header sent when fetching pages
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Whole-request fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u8,
}

fn default_syntaxes() -> Vec<Syntax> {
    Syntax::ALL.to_vec()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_fetch_timeout() -> u8 {
    DEFAULT_FETCH_TIMEOUT
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            syntaxes: default_syntaxes(),
            user_agent: default_user_agent(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

impl ExtractorConfig {
    /// Load a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: ExtractorConfig = serde_json::from_str(json).map_err(ExtractError::Config)?;
        if config.syntaxes.is_empty() {
            config.syntaxes = default_syntaxes();
        }
        Ok(config)
    }

    pub fn wants(&self, syntax: Syntax) -> bool {
        self.syntaxes.contains(&syntax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.syntaxes, Syntax::ALL.to_vec());
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.fetch_timeout, 3);
    }

    #[test]
    fn test_syntax_names() {
        assert_eq!("json-ld".parse::<Syntax>().unwrap(), Syntax::JsonLd);
        assert_eq!("xcards".parse::<Syntax>().unwrap(), Syntax::XCards);
        assert_eq!(Syntax::OpenGraph.to_string(), "opengraph");
        assert!(matches!(
            "rdfa".parse::<Syntax>(),
            Err(ExtractError::UnknownSyntax(name)) if name == "rdfa"
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config =
            ExtractorConfig::from_json(r#"{"syntaxes": ["microdata", "json-ld"], "fetch_timeout": 10}"#)
                .unwrap();
        assert_eq!(config.syntaxes, vec![Syntax::Microdata, Syntax::JsonLd]);
        assert_eq!(config.fetch_timeout, 10);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);

        let empty = ExtractorConfig::from_json(r#"{"syntaxes": []}"#).unwrap();
        assert_eq!(empty.syntaxes, Syntax::ALL.to_vec());

        assert!(matches!(
            ExtractorConfig::from_json(r#"{"syntaxes": ["rdfa"]}"#),
            Err(ExtractError::Config(_))
        ));
    }
}
