//! HTML extraction modules
//!
//! Each module provides extraction for a specific metadata format.

mod jsonld_extractor;
mod microdata_extractor;
mod opengraph_extractor;
mod xcards_extractor;

pub use jsonld_extractor::*;
pub use microdata_extractor::*;
pub use opengraph_extractor::*;
pub use xcards_extractor::*;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use scraper::{Html, Selector};

/// `(key, content)` of every `<meta>` carrying both, in document order.
/// `key_attr` is `property` for OpenGraph and `name` for X cards.
fn meta_pairs<'a>(document: &'a Html, key_attr: &str) -> Vec<(&'a str, &'a str)> {
    let selector = match Selector::parse("meta") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let key = element.value().attr(key_attr)?;
            let content = element.value().attr("content")?;
            (!key.is_empty() && !content.is_empty()).then_some((key, content))
        })
        .collect()
}

/// Entry a structured property applies to.
///
/// A bare property (`og:image`) opens a new entry; sub-properties
/// (`og:image:width`) update the latest one, opening one if there is none.
fn structured_entry<T: Default>(entries: &mut Vec<T>, opens_entry: bool) -> &mut T {
    if opens_entry || entries.is_empty() {
        entries.push(T::default());
    }
    let last = entries.len() - 1;
    &mut entries[last]
}

/// Leading integer of `content` (`"1200px"` -> 1200), `None` if there is none
fn parse_int(content: &str) -> Option<i64> {
    let content = content.trim_start();
    let end = content
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '+' || c == '-')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    content[..end].parse().ok()
}

/// Dates as they appear in meta tags. Zone-less values are taken as UTC.
fn parse_time(content: &str) -> Option<DateTime<FixedOffset>> {
    let content = content.trim();

    DateTime::parse_from_rfc3339(content)
        .or_else(|_| DateTime::parse_from_str(content, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(content, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(content, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

fn fill_str(target: &mut String, source: &str) {
    if target.is_empty() {
        target.push_str(source);
    }
}

fn fill_vec<T: Clone>(target: &mut Vec<T>, source: &[T]) {
    if target.is_empty() {
        target.extend_from_slice(source);
    }
}

fn fill_opt<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if target.is_none() {
        target.clone_from(source);
    }
}
