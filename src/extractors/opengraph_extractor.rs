//! OpenGraph meta tags extraction
//!
//! Extracts `<meta property="og:…">` tags plus the `music:`, `video:`,
//! `article:`, `book:` and `profile:` vertical namespaces.
//! Reference: https://ogp.me/

use chrono::{DateTime, FixedOffset};
use scraper::Html;
use serde::{Deserialize, Serialize};

use super::{fill_opt, fill_str, fill_vec, meta_pairs, parse_int, parse_time, structured_entry};
use crate::error::ExtractError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGraph {
    // Basic metadata
    #[serde(rename = "og:type")]
    pub og_type: String,
    #[serde(rename = "og:title")]
    pub title: String,
    #[serde(rename = "og:url")]
    pub url: String,

    // Optional metadata
    #[serde(rename = "og:description", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "og:determiner", skip_serializing_if = "String::is_empty")]
    pub determiner: String,
    #[serde(rename = "og:locale", skip_serializing_if = "String::is_empty")]
    pub locale: String,
    #[serde(rename = "og:locale:alternate", skip_serializing_if = "Vec::is_empty")]
    pub locale_alternate: Vec<String>,
    #[serde(rename = "og:site_name", skip_serializing_if = "String::is_empty")]
    pub site_name: String,

    // Media
    #[serde(rename = "og:image", skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<OpenGraphImage>,
    #[serde(rename = "og:video", skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<OpenGraphVideo>,
    #[serde(rename = "og:audio", skip_serializing_if = "Vec::is_empty")]
    pub audios: Vec<OpenGraphAudio>,

    #[serde(flatten)]
    pub verticals: Verticals,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGraphImage {
    #[serde(rename = "og:image")]
    pub url: String,
    #[serde(rename = "og:image:secure_url", skip_serializing_if = "String::is_empty")]
    pub secure_url: String,
    #[serde(rename = "og:image:type", skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(rename = "og:image:width", skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(rename = "og:image:height", skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(rename = "og:image:alt", skip_serializing_if = "String::is_empty")]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGraphVideo {
    #[serde(rename = "og:video")]
    pub url: String,
    #[serde(rename = "og:video:secure_url", skip_serializing_if = "String::is_empty")]
    pub secure_url: String,
    #[serde(rename = "og:video:type", skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(rename = "og:video:width", skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(rename = "og:video:height", skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenGraphAudio {
    #[serde(rename = "og:audio")]
    pub url: String,
    #[serde(rename = "og:audio:secure_url", skip_serializing_if = "String::is_empty")]
    pub secure_url: String,
    #[serde(rename = "og:audio:type", skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
}

/// Object-type specific groups, shared by OpenGraph and X cards
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Verticals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<Music>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<Article>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Music {
    #[serde(rename = "music:duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(rename = "music:album", skip_serializing_if = "String::is_empty")]
    pub album: String,
    #[serde(rename = "music:album:disc", skip_serializing_if = "Option::is_none")]
    pub album_disc: Option<i64>,
    #[serde(rename = "music:album:track", skip_serializing_if = "Option::is_none")]
    pub album_track: Option<i64>,
    #[serde(rename = "music:musician", skip_serializing_if = "Vec::is_empty")]
    pub musician: Vec<String>,
    #[serde(rename = "music:song", skip_serializing_if = "Vec::is_empty")]
    pub song: Vec<MusicSong>,
    #[serde(rename = "music:creator", skip_serializing_if = "Vec::is_empty")]
    pub creator: Vec<String>,
    #[serde(rename = "music:release_date", skip_serializing_if = "String::is_empty")]
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicSong {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disc: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    #[serde(rename = "video:duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(rename = "video:actor", skip_serializing_if = "Vec::is_empty")]
    pub actor: Vec<VideoActor>,
    #[serde(rename = "video:director", skip_serializing_if = "Vec::is_empty")]
    pub director: Vec<String>,
    #[serde(rename = "video:writer", skip_serializing_if = "Vec::is_empty")]
    pub writer: Vec<String>,
    #[serde(rename = "video:release_date", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<FixedOffset>>,
    #[serde(rename = "video:tag", skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(rename = "video:series", skip_serializing_if = "String::is_empty")]
    pub series: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoActor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(rename = "article:published_time", skip_serializing_if = "Option::is_none")]
    pub published_time: Option<DateTime<FixedOffset>>,
    #[serde(rename = "article:modified_time", skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<FixedOffset>>,
    #[serde(rename = "article:expiration_time", skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<FixedOffset>>,
    #[serde(rename = "article:author", skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<String>,
    #[serde(rename = "article:section", skip_serializing_if = "String::is_empty")]
    pub section: String,
    #[serde(rename = "article:tag", skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    #[serde(rename = "book:author", skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<String>,
    #[serde(rename = "book:isbn", skip_serializing_if = "String::is_empty")]
    pub isbn: String,
    #[serde(rename = "book:release_date", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<FixedOffset>>,
    #[serde(rename = "book:tag", skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(rename = "profile:first_name", skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(rename = "profile:last_name", skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(rename = "profile:username", skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(rename = "profile:gender", skip_serializing_if = "String::is_empty")]
    pub gender: String,
}

/// Parse `html` and extract its OpenGraph tags
pub fn parse_opengraph(html: &str) -> (Option<OpenGraph>, Vec<ExtractError>) {
    let document = Html::parse_document(html);
    (extract_opengraph(&document), Vec::new())
}

/// Extract OpenGraph tags from a parsed document.
///
/// `None` when the page has no `<meta property=… content=…>` at all; any
/// such tag, recognized or not, yields `Some`.
pub fn extract_opengraph(document: &Html) -> Option<OpenGraph> {
    let pairs = meta_pairs(document, "property");
    if pairs.is_empty() {
        return None;
    }

    let mut og = OpenGraph::default();
    for (property, content) in pairs {
        og.apply(property, content);
    }
    Some(og)
}

impl OpenGraph {
    fn apply(&mut self, property: &str, content: &str) {
        let parts: Vec<&str> = property.split(':').collect();
        let value = content.to_string();

        match property {
            "og:type" => self.og_type = value,
            "og:title" => self.title = value,
            "og:url" => self.url = value,
            "og:description" => self.description = value,
            "og:determiner" => self.determiner = value,
            "og:locale" => self.locale = value,
            "og:locale:alternate" => self.locale_alternate.push(value),
            "og:site_name" => self.site_name = value,
            _ => match parts.as_slice() {
                ["og", "image", rest @ ..] => {
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
                ["og", "video", rest @ ..] => {
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
                ["og", "audio", rest @ ..] => {
                    let audio = structured_entry(&mut self.audios, rest.is_empty());
                    match rest.first() {
                        None => audio.url = value,
                        Some(&"secure_url") => audio.secure_url = value,
                        Some(&"type") => audio.mime_type = value,
                        _ => {}
                    }
                }
                _ => self.verticals.apply(property, &parts, content),
            },
        }
    }
}

impl Verticals {
    /// Apply a `music:`/`video:`/`article:`/`book:`/`profile:` tag.
    /// Other properties are ignored.
    pub(crate) fn apply(&mut self, property: &str, parts: &[&str], content: &str) {
        let value = content.to_string();

        match parts {
            ["music", ..] => {
                let music = self.music.get_or_insert_with(Music::default);
                match parts {
                    ["music", "duration"] => music.duration = parse_int(content),
                    ["music", "album"] => music.album = value,
                    ["music", "album", "disc"] => music.album_disc = parse_int(content),
                    ["music", "album", "track"] => music.album_track = parse_int(content),
                    ["music", "musician"] => music.musician.push(value),
                    ["music", "song", rest @ ..] => {
                        let song = structured_entry(&mut music.song, rest.is_empty());
                        match rest.first() {
                            None => song.url = value,
                            Some(&"disc") => song.disc = parse_int(content),
                            Some(&"track") => song.track = parse_int(content),
                            _ => {}
                        }
                    }
                    ["music", "creator"] => music.creator.push(value),
                    ["music", "release_date"] => music.release_date = value,
                    _ => {}
                }
            }
            ["video", ..] => {
                let video = self.video.get_or_insert_with(Video::default);
                match parts {
                    ["video", "actor", rest @ ..] => {
                        let actor = structured_entry(&mut video.actor, rest.is_empty());
                        match rest.first() {
                            None => actor.url = value,
                            Some(&"role") => actor.role = value,
                            _ => {}
                        }
                    }
                    ["video", "director"] => video.director.push(value),
                    ["video", "writer"] => video.writer.push(value),
                    ["video", "duration"] => video.duration = parse_int(content),
                    ["video", "release_date"] => video.release_date = parse_time(content),
                    ["video", "tag"] => video.tag.push(value),
                    ["video", "series"] => video.series = value,
                    _ => {}
                }
            }
            ["article", ..] => {
                let article = self.article.get_or_insert_with(Article::default);
                match property {
                    "article:published_time" => article.published_time = parse_time(content),
                    "article:modified_time" => article.modified_time = parse_time(content),
                    "article:expiration_time" => article.expiration_time = parse_time(content),
                    "article:author" => article.author.push(value),
                    "article:section" => article.section = value,
                    "article:tag" => article.tag.push(value),
                    _ => {}
                }
            }
            ["book", ..] => {
                let book = self.book.get_or_insert_with(Book::default);
                match property {
                    "book:isbn" => book.isbn = value,
                    "book:release_date" => book.release_date = parse_time(content),
                    "book:author" => book.author.push(value),
                    "book:tag" => book.tag.push(value),
                    _ => {}
                }
            }
            ["profile", ..] => {
                let profile = self.profile.get_or_insert_with(Profile::default);
                match property {
                    "profile:first_name" => profile.first_name = value,
                    "profile:last_name" => profile.last_name = value,
                    "profile:username" => profile.username = value,
                    "profile:gender" => profile.gender = value,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// Take every group, or every field of a group, that is still empty here
    pub(crate) fn fill_missing(&mut self, source: &Verticals) {
        fill_group(&mut self.music, &source.music, Music::fill_missing);
        fill_group(&mut self.video, &source.video, Video::fill_missing);
        fill_group(&mut self.article, &source.article, Article::fill_missing);
        fill_group(&mut self.book, &source.book, Book::fill_missing);
        fill_group(&mut self.profile, &source.profile, Profile::fill_missing);
    }
}

fn fill_group<T: Clone>(target: &mut Option<T>, source: &Option<T>, fill: fn(&mut T, &T)) {
    let Some(source) = source else {
        return;
    };
    match target {
        Some(target) => fill(target, source),
        None => *target = Some(source.clone()),
    }
}

impl Music {
    fn fill_missing(&mut self, source: &Music) {
        fill_opt(&mut self.duration, &source.duration);
        fill_str(&mut self.album, &source.album);
        fill_opt(&mut self.album_disc, &source.album_disc);
        fill_opt(&mut self.album_track, &source.album_track);
        fill_vec(&mut self.musician, &source.musician);
        fill_vec(&mut self.song, &source.song);
        fill_vec(&mut self.creator, &source.creator);
        fill_str(&mut self.release_date, &source.release_date);
    }
}

impl Video {
    fn fill_missing(&mut self, source: &Video) {
        fill_opt(&mut self.duration, &source.duration);
        fill_vec(&mut self.actor, &source.actor);
        fill_vec(&mut self.director, &source.director);
        fill_vec(&mut self.writer, &source.writer);
        fill_opt(&mut self.release_date, &source.release_date);
        fill_vec(&mut self.tag, &source.tag);
        fill_str(&mut self.series, &source.series);
    }
}

impl Article {
    fn fill_missing(&mut self, source: &Article) {
        fill_opt(&mut self.published_time, &source.published_time);
        fill_opt(&mut self.modified_time, &source.modified_time);
        fill_opt(&mut self.expiration_time, &source.expiration_time);
        fill_vec(&mut self.author, &source.author);
        fill_str(&mut self.section, &source.section);
        fill_vec(&mut self.tag, &source.tag);
    }
}

impl Book {
    fn fill_missing(&mut self, source: &Book) {
        fill_vec(&mut self.author, &source.author);
        fill_str(&mut self.isbn, &source.isbn);
        fill_opt(&mut self.release_date, &source.release_date);
        fill_vec(&mut self.tag, &source.tag);
    }
}

impl Profile {
    fn fill_missing(&mut self, source: &Profile) {
        fill_str(&mut self.first_name, &source.first_name);
        fill_str(&mut self.last_name, &source.last_name);
        fill_str(&mut self.username, &source.username);
        fill_str(&mut self.gender, &source.gender);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn og(html: &str) -> OpenGraph {
        let (og, errors) = parse_opengraph(html);
        assert!(errors.is_empty());
        og.expect("opengraph data")
    }

    #[test]
    fn test_extract_opengraph() {
        let html = r#"
        <html>
        <head>
            <meta property="og:title" content="Test Page">
            <meta property="og:type" content="website">
            <meta property="og:url" content="https://example.com/">
            <meta property="og:description" content="A test description">
            <meta property="og:locale" content="en_US">
            <meta property="og:locale:alternate" content="fr_FR">
            <meta property="og:locale:alternate" content="es_ES">
            <meta property="og:site_name" content="Example">
            <meta name="twitter:card" content="summary_large_image">
        </head>
        </html>
        "#;

        let result = og(html);
        assert_eq!(result.title, "Test Page");
        assert_eq!(result.og_type, "website");
        assert_eq!(result.url, "https://example.com/");
        assert_eq!(result.description, "A test description");
        assert_eq!(result.locale, "en_US");
        assert_eq!(result.locale_alternate, vec!["fr_FR", "es_ES"]);
        assert_eq!(result.site_name, "Example");
    }

    #[test]
    fn test_no_opengraph() {
        let (result, errors) = parse_opengraph("<html><head><title>x</title></head></html>");
        assert!(result.is_none());
        assert!(errors.is_empty());

        // empty content does not count
        let (result, _) = parse_opengraph(r#"<meta property="og:title" content="">"#);
        assert!(result.is_none());
    }

    #[test]
    fn test_unrecognized_property_still_counts() {
        let result = og(r#"<meta property="fb:app_id" content="1234">"#);
        assert_eq!(result, OpenGraph::default());
    }

    #[test]
    fn test_structured_images() {
        let html = r#"
            <meta property="og:image" content="https://example.com/a.jpg">
            <meta property="og:image:width" content="1200">
            <meta property="og:image:height" content="630px">
            <meta property="og:image:alt" content="First">
            <meta property="og:image" content="https://example.com/b.jpg">
            <meta property="og:image:secure_url" content="https://secure.example.com/b.jpg">
            <meta property="og:image:type" content="image/jpeg">
            <meta property="og:image:width" content="wide">
        "#;

        let result = og(html);
        assert_eq!(
            result.images,
            vec![
                OpenGraphImage {
                    url: "https://example.com/a.jpg".to_string(),
                    width: Some(1200),
                    height: Some(630),
                    alt: "First".to_string(),
                    ..Default::default()
                },
                OpenGraphImage {
                    url: "https://example.com/b.jpg".to_string(),
                    secure_url: "https://secure.example.com/b.jpg".to_string(),
                    mime_type: "image/jpeg".to_string(),
                    ..Default::default()
                },
            ]
        );
    }

    #[test]
    fn test_sub_property_before_media_opens_entry() {
        let html = r#"
            <meta property="og:video:width" content="640">
            <meta property="og:video:type" content="video/mp4">
            <meta property="og:audio:type" content="audio/mpeg">
            <meta property="og:audio" content="https://example.com/a.mp3">
        "#;

        let result = og(html);
        assert_eq!(result.videos.len(), 1);
        assert_eq!(result.videos[0].width, Some(640));
        assert_eq!(result.videos[0].mime_type, "video/mp4");
        assert_eq!(result.videos[0].url, "");
        // a bare og:audio always opens a new entry
        assert_eq!(result.audios.len(), 2);
        assert_eq!(result.audios[1].url, "https://example.com/a.mp3");
    }

    #[test]
    fn test_verticals() {
        let html = r#"
            <meta property="og:type" content="article">
            <meta property="article:published_time" content="2024-01-15T10:30:00Z">
            <meta property="article:modified_time" content="not a date">
            <meta property="article:author" content="Jane">
            <meta property="article:author" content="John">
            <meta property="article:section" content="Science">
            <meta property="article:tag" content="research">
            <meta property="music:song" content="https://example.com/song/1">
            <meta property="music:song:track" content="1">
            <meta property="music:song" content="https://example.com/song/2">
            <meta property="music:song:disc" content="2">
            <meta property="music:release_date" content="2011-10-12">
            <meta property="video:actor" content="https://example.com/actor/1">
            <meta property="video:actor:role" content="Lead">
            <meta property="video:release_date" content="2011-10-12">
            <meta property="book:isbn" content="978-3-16-148410-0">
            <meta property="profile:username" content="jdoe">
        "#;

        let result = og(html);
        let article = result.verticals.article.as_ref().unwrap();
        assert_eq!(
            article.published_time.map(|t| t.to_rfc3339()),
            Some("2024-01-15T10:30:00+00:00".to_string())
        );
        assert_eq!(article.modified_time, None);
        assert_eq!(article.author, vec!["Jane", "John"]);
        assert_eq!(article.section, "Science");
        assert_eq!(article.tag, vec!["research"]);

        let music = result.verticals.music.as_ref().unwrap();
        assert_eq!(music.song.len(), 2);
        assert_eq!(music.song[0].track, Some(1));
        assert_eq!(music.song[1].disc, Some(2));
        assert_eq!(music.release_date, "2011-10-12");

        let video = result.verticals.video.as_ref().unwrap();
        assert_eq!(video.actor[0].role, "Lead");
        assert_eq!(
            video.release_date.map(|t| t.to_rfc3339()),
            Some("2011-10-12T00:00:00+00:00".to_string())
        );

        assert_eq!(result.verticals.book.as_ref().unwrap().isbn, "978-3-16-148410-0");
        assert_eq!(result.verticals.profile.as_ref().unwrap().username, "jdoe");
    }

    #[test]
    fn test_json_shape() {
        let html = r#"
            <meta property="og:title" content="go-microdata-extract">
            <meta property="og:image" content="https://example.com/a.jpg">
            <meta property="og:image:width" content="1200">
            <meta property="profile:gender" content="female">
        "#;

        let json = serde_json::to_value(og(html)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "og:type": "",
                "og:title": "go-microdata-extract",
                "og:url": "",
                "og:image": [{"og:image": "https://example.com/a.jpg", "og:image:width": 1200}],
                "profile": {"profile:gender": "female"}
            })
        );
    }
}
