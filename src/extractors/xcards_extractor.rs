//! X (Twitter) card meta tags extraction
//!
//! Reads `<meta name="twitter:…">` tags, then falls back to the page's
//! OpenGraph data for every field the card leaves empty.

use scraper::Html;
use serde::{Deserialize, Serialize};

use super::{
    extract_opengraph, fill_str, fill_vec, meta_pairs, parse_int, structured_entry, OpenGraph,
    OpenGraphAudio, OpenGraphImage, OpenGraphVideo, Verticals,
};
use crate::error::ExtractError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XCards {
    // X specific metadata
    #[serde(rename = "twitter:card", skip_serializing_if = "String::is_empty")]
    pub card: String,
    #[serde(rename = "twitter:site", skip_serializing_if = "String::is_empty")]
    pub site: String,
    #[serde(rename = "twitter:creator", skip_serializing_if = "String::is_empty")]
    pub creator: String,

    // Basic metadata
    #[serde(rename = "twitter:type", skip_serializing_if = "String::is_empty")]
    pub card_type: String,
    #[serde(rename = "twitter:title", skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(rename = "twitter:url", skip_serializing_if = "String::is_empty")]
    pub url: String,

    // Optional metadata
    #[serde(rename = "twitter:description", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "twitter:determiner", skip_serializing_if = "String::is_empty")]
    pub determiner: String,
    #[serde(rename = "twitter:locale", skip_serializing_if = "String::is_empty")]
    pub locale: String,
    #[serde(rename = "twitter:locale:alternate", skip_serializing_if = "Vec::is_empty")]
    pub locale_alternate: Vec<String>,
    #[serde(rename = "twitter:site_name", skip_serializing_if = "String::is_empty")]
    pub site_name: String,

    // Media borrowed from OpenGraph
    #[serde(rename = "og:image", skip_serializing_if = "Vec::is_empty")]
    pub og_images: Vec<OpenGraphImage>,
    #[serde(rename = "og:audio", skip_serializing_if = "Vec::is_empty")]
    pub og_audios: Vec<OpenGraphAudio>,
    #[serde(rename = "og:video", skip_serializing_if = "Vec::is_empty")]
    pub og_videos: Vec<OpenGraphVideo>,

    // Card media
    #[serde(rename = "twitter:image", skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<XCardsImage>,
    #[serde(rename = "twitter:audio", skip_serializing_if = "Vec::is_empty")]
    pub audios: Vec<XCardsAudio>,
    #[serde(rename = "twitter:video", skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<XCardsVideo>,

    #[serde(flatten)]
    pub verticals: Verticals,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XCardsImage {
    #[serde(rename = "twitter:image")]
    pub url: String,
    #[serde(rename = "twitter:image:secure_url", skip_serializing_if = "String::is_empty")]
    pub secure_url: String,
    #[serde(rename = "twitter:image:type", skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(rename = "twitter:image:width", skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(rename = "twitter:image:height", skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(rename = "twitter:image:alt", skip_serializing_if = "String::is_empty")]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XCardsVideo {
    #[serde(rename = "twitter:video")]
    pub url: String,
    #[serde(rename = "twitter:video:secure_url", skip_serializing_if = "String::is_empty")]
    pub secure_url: String,
    #[serde(rename = "twitter:video:type", skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(rename = "twitter:video:width", skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(rename = "twitter:video:height", skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XCardsAudio {
    #[serde(rename = "twitter:audio")]
    pub url: String,
    #[serde(rename = "twitter:audio:secure_url", skip_serializing_if = "String::is_empty")]
    pub secure_url: String,
    #[serde(rename = "twitter:audio:type", skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
}

/// Parse `html` and extract its X card, completed from OpenGraph
pub fn parse_xcards(html: &str) -> (Option<XCards>, Vec<ExtractError>) {
    let document = Html::parse_document(html);
    (extract_xcards(&document), Vec::new())
}

/// Extract the X card of a parsed document.
///
/// `None` only when the page carries neither card nor OpenGraph tags.
pub fn extract_xcards(document: &Html) -> Option<XCards> {
    let pairs = meta_pairs(document, "name");
    let mut card = (!pairs.is_empty()).then(XCards::default);
    if let Some(card) = card.as_mut() {
        for (name, content) in pairs {
            card.apply(name, content);
        }
    }

    if let Some(og) = extract_opengraph(document) {
        card.get_or_insert_with(XCards::default).fill_missing(&og);
    }

    card
}

impl XCards {
    fn apply(&mut self, name: &str, content: &str) {
        let parts: Vec<&str> = name.split(':').collect();
        let value = content.to_string();

        match name {
            "twitter:card" => self.card = value,
            "twitter:site" => self.site = value,
            "twitter:creator" => self.creator = value,
            "twitter:type" => self.card_type = value,
            "twitter:title" => self.title = value,
            "twitter:url" => self.url = value,
            "twitter:description" => self.description = value,
            "twitter:determiner" => self.determiner = value,
            "twitter:locale" => self.locale = value,
            "twitter:locale:alternate" => self.locale_alternate.push(value),
            "twitter:site_name" => self.site_name = value,
            _ => match parts.as_slice() {
                ["twitter", "image", rest @ ..] => {
                    let image = structured_entry(&mut self.images, rest.is_empty());
                    match rest.first() {
                        None => image.url = value,
                        Some(&"secure_url") => image.secure_url = value,
                        Some(&"type") => image.mime_type = value,
                        Some(&"width") => image.width = parse_int(content),
                        Some(&"height") => image.height = parse_int(content),
                        Some(&"alt") => image.alt = value,
                        _ => {}
                    }
                }
                ["twitter", "video", rest @ ..] => {
                    let video = structured_entry(&mut self.videos, rest.is_empty());
                    match rest.first() {
                        None => video.url = value,
                        Some(&"secure_url") => video.secure_url = value,
                        Some(&"type") => video.mime_type = value,
                        Some(&"width") => video.width = parse_int(content),
                        Some(&"height") => video.height = parse_int(content),
                        _ => {}
                    }
                }
                ["twitter", "audio", rest @ ..] => {
                    let audio = structured_entry(&mut self.audios, rest.is_empty());
                    match rest.first() {
                        None => audio.url = value,
                        Some(&"secure_url") => audio.secure_url = value,
                        Some(&"type") => audio.mime_type = value,
                        _ => {}
                    }
                }
                _ => self.verticals.apply(name, &parts, content),
            },
        }
    }

    /// Fill every field the card shares with OpenGraph and left empty
    fn fill_missing(&mut self, og: &OpenGraph) {
        fill_str(&mut self.card_type, &og.og_type);
        fill_str(&mut self.title, &og.title);
        fill_str(&mut self.url, &og.url);
        fill_str(&mut self.description, &og.description);
        fill_str(&mut self.determiner, &og.determiner);
        fill_str(&mut self.locale, &og.locale);
        fill_vec(&mut self.locale_alternate, &og.locale_alternate);
        fill_str(&mut self.site_name, &og.site_name);
        fill_vec(&mut self.og_images, &og.images);
        fill_vec(&mut self.og_audios, &og.audios);
        fill_vec(&mut self.og_videos, &og.videos);
        self.verticals.fill_missing(&og.verticals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::Article;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_xcards() {
        let html = r#"
        <head>
            <meta name="twitter:card" content="summary_large_image">
            <meta name="twitter:site" content="@example">
            <meta name="twitter:creator" content="@jdoe">
            <meta name="twitter:title" content="Card title">
            <meta name="twitter:image" content="https://example.com/card.png">
            <meta name="twitter:image:alt" content="Card image">
            <meta name="twitter:player" content="https://example.com/player">
            <meta name="description" content="Page description">
        </head>
        "#;

        let (card, errors) = parse_xcards(html);
        assert!(errors.is_empty());
        let card = card.unwrap();
        assert_eq!(card.card, "summary_large_image");
        assert_eq!(card.site, "@example");
        assert_eq!(card.creator, "@jdoe");
        assert_eq!(card.title, "Card title");
        assert_eq!(
            card.images,
            vec![XCardsImage {
                url: "https://example.com/card.png".to_string(),
                alt: "Card image".to_string(),
                ..Default::default()
            }]
        );
        assert!(card.og_images.is_empty());
    }

    #[test]
    fn test_card_fields_win_over_opengraph() {
        let html = r#"
            <meta name="twitter:title" content="Card title">
            <meta property="og:title" content="OG title">
            <meta property="og:description" content="OG description">
            <meta property="og:type" content="article">
            <meta property="og:image" content="https://example.com/og.png">
            <meta property="og:locale:alternate" content="de_DE">
        "#;

        let card = parse_xcards(html).0.unwrap();
        assert_eq!(card.title, "Card title");
        assert_eq!(card.description, "OG description");
        assert_eq!(card.card_type, "article");
        assert_eq!(card.locale_alternate, vec!["de_DE"]);
        assert_eq!(card.og_images[0].url, "https://example.com/og.png");
        assert!(card.images.is_empty());
    }

    #[test]
    fn test_opengraph_only_page() {
        let html = r#"
            <meta property="og:title" content="go-microdata-extract">
            <meta property="og:url" content="https://github.com/aafeher/go-microdata-extract">
            <meta property="og:site_name" content="GitHub">
        "#;

        let card = parse_xcards(html).0.unwrap();
        assert_eq!(card.title, "go-microdata-extract");
        assert_eq!(card.url, "https://github.com/aafeher/go-microdata-extract");
        assert_eq!(card.site_name, "GitHub");
        assert_eq!(card.card, "");
    }

    #[test]
    fn test_no_card() {
        let (card, errors) = parse_xcards(r#"<meta charset="utf-8"><title>x</title>"#);
        assert!(card.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_verticals_merge_field_by_field() {
        let html = r#"
            <meta name="article:section" content="Card section">
            <meta property="article:section" content="OG section">
            <meta property="article:author" content="Jane">
            <meta property="book:isbn" content="123">
        "#;

        let card = parse_xcards(html).0.unwrap();
        assert_eq!(
            card.verticals.article,
            Some(Article {
                section: "Card section".to_string(),
                author: vec!["Jane".to_string()],
                ..Default::default()
            })
        );
        assert_eq!(card.verticals.book.unwrap().isbn, "123");
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let html = r#"
            <meta name="twitter:card" content="summary">
            <meta name="twitter:image" content="https://example.com/x.png">
            <meta name="twitter:image:width" content="300">
        "#;

        let json = serde_json::to_value(parse_xcards(html).0.unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "twitter:card": "summary",
                "twitter:image": [{"twitter:image": "https://example.com/x.png", "twitter:image:width": 300}]
            })
        );
    }
}
