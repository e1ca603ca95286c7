//! Microdata (itemscope/itemprop/itemtype attributes) extraction
//!
//! Walks the parsed document depth-first. Every `itemscope` element reached
//! outside of another item's property scan becomes a top-level item; inside
//! an item, `itemprop` elements become properties and `itemprop itemscope`
//! elements become nested items bound to that property.
//! Reference: https://html.spec.whatwg.org/multipage/microdata.html

use ego_tree::NodeRef;
use indexmap::map::Entry;
use indexmap::IndexMap;
use scraper::node::Element;
use scraper::{Html, Node};
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// One microdata item, rooted at an `itemscope` element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MicrodataItem {
    /// `itemtype`, when present and non-blank
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// `itemid`, whenever the attribute exists (even if empty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Properties,
}

/// A property value: text, a nested item, or every value seen for a repeated name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Item(Box<MicrodataItem>),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&MicrodataItem> {
        match self {
            PropertyValue::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::Text(text.to_string())
    }
}

impl From<MicrodataItem> for PropertyValue {
    fn from(item: MicrodataItem) -> Self {
        PropertyValue::Item(Box::new(item))
    }
}

/// Item properties in the order their names were first seen
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(IndexMap<String, PropertyValue>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `name`.
    ///
    /// The first value is stored as is; a second one turns the slot into a
    /// list holding both, and later ones are appended to that list.
    pub fn add(&mut self, name: impl Into<String>, value: PropertyValue) {
        match self.0.entry(name.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                PropertyValue::List(values) => values.push(value),
                existing => {
                    let first = std::mem::replace(existing, PropertyValue::List(Vec::new()));
                    *existing = PropertyValue::List(vec![first, value]);
                }
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse `html` and extract its microdata items
pub fn parse_microdata(base_url: &str, html: &str) -> (Vec<MicrodataItem>, Vec<ExtractError>) {
    let document = Html::parse_document(html);
    extract_microdata(base_url, &document)
}

/// Extract microdata items from an already parsed document.
///
/// Items come back in document order of their root elements. `base_url` is
/// only used to absolutize `url`/`*Url` properties; a malformed base leaves
/// those hrefs unresolved. The error list is reserved for recoverable
/// anomalies and is currently always empty.
pub fn extract_microdata(base_url: &str, document: &Html) -> (Vec<MicrodataItem>, Vec<ExtractError>) {
    let walker = Walker {
        origin: origin_of(base_url),
    };

    let mut items = Vec::new();
    walker.walk(document.tree.root(), &mut items);

    (items, Vec::new())
}

struct Walker {
    /// `scheme://host[:port]` of the base URL
    origin: Option<String>,
}

impl Walker {
    /// Look for top-level items below `node`
    fn walk(&self, node: NodeRef<'_, Node>, items: &mut Vec<MicrodataItem>) {
        if let Some(element) = node.value().as_element() {
            if is_scope(element) {
                self.emit(node, element, items);
                return;
            }
        }

        for child in node.children() {
            self.walk(child, items);
        }
    }

    /// Append the item rooted at `node` as a top-level item.
    ///
    /// Its slot is reserved before the scan so that independent items found
    /// inside it land after it.
    fn emit(&self, node: NodeRef<'_, Node>, element: &Element, items: &mut Vec<MicrodataItem>) {
        let slot = items.len();
        items.push(MicrodataItem::default());
        let item = self.build_item(node, element, items);
        items[slot] = item;
    }

    fn build_item(
        &self,
        node: NodeRef<'_, Node>,
        element: &Element,
        items: &mut Vec<MicrodataItem>,
    ) -> MicrodataItem {
        let mut item = MicrodataItem {
            item_type: attr_value(element, "itemtype").map(String::from),
            id: element.attr("itemid").map(|id| id.trim().to_string()),
            properties: Properties::new(),
        };
        self.collect_properties(node, &mut item.properties, items);
        item
    }

    fn collect_properties(
        &self,
        node: NodeRef<'_, Node>,
        properties: &mut Properties,
        items: &mut Vec<MicrodataItem>,
    ) {
        for child in node.children() {
            let Some(element) = child.value().as_element() else {
                continue;
            };

            match (attr_value(element, "itemprop"), is_scope(element)) {
                (Some(name), true) => {
                    let nested = self.build_item(child, element, items);
                    properties.add(name, nested.into());
                }
                (Some(name), false) => {
                    let value = self.resolve_value(child, element, name);
                    properties.add(name, PropertyValue::Text(value));
                }
                // A scope without a property name is an item of its own
                (None, true) => self.emit(child, element, items),
                (None, false) => self.collect_properties(child, properties, items),
            }
        }
    }

    fn resolve_value(&self, node: NodeRef<'_, Node>, element: &Element, name: &str) -> String {
        if let Some(datetime) = attr_value(element, "datetime") {
            return datetime.to_string();
        }

        if is_url_property(name) {
            if let Some(href) = element.attr("href") {
                return self.resolve_href(href.trim());
            }
        }

        text_content(node)
    }

    /// Absolute and protocol-relative hrefs are kept verbatim; anything else
    /// is appended to the base origin (the base path is dropped).
    fn resolve_href(&self, href: &str) -> String {
        if href.starts_with("//") || href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }

        match &self.origin {
            Some(origin) => format!("{origin}{href}"),
            None => href.to_string(),
        }
    }
}

fn is_scope(element: &Element) -> bool {
    element.attr("itemscope").is_some()
}

fn is_url_property(name: &str) -> bool {
    name == "url" || name.ends_with("Url")
}

/// Trimmed attribute value, `None` when absent or blank
fn attr_value<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn origin_of(base_url: &str) -> Option<String> {
    let base = url::Url::parse(base_url).ok()?;
    let host = base.host_str()?;

    Some(match base.port() {
        Some(port) => format!("{}://{}:{}", base.scheme(), host, port),
        None => format!("{}://{}", base.scheme(), host),
    })
}

/// Text of a property element.
///
/// Pre-order over the subtree, the element itself included: every element
/// contributes its `value` attribute, while a text node is only taken while
/// nothing has been collected yet. Whitespace-only text counts as collected.
fn text_content(node: NodeRef<'_, Node>) -> String {
    let mut text = String::new();

    for descendant in node.descendants() {
        match descendant.value() {
            Node::Text(chunk) => {
                if text.is_empty() {
                    text.push_str(chunk);
                }
            }
            Node::Element(element) => {
                if let Some(value) = element.attr("value") {
                    text.push_str(value);
                }
            }
            _ => {}
        }
    }

    text.trim().to_string()
}
