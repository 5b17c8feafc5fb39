//! Blog post payload as supplied by the content API.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::lenient::{first_text, scalar_text};
use super::products::ProductRecord;

/// Keys under which call sites attach the nested content document.
pub const DOCUMENT_KEYS: [&str; 3] = ["content_json", "structured_content", "content_document"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct BlogPost {
    pub id: Option<String>,
    pub title: String,
    pub slug: Option<String>,
    pub author: Option<String>,
    /// Legacy plain-text body.
    pub content: Option<String>,
    /// Nested content document, decoded when it arrived as a JSON string.
    pub document: Option<Value>,
    /// Products attached to the post payload.
    pub products: Vec<ProductRecord>,
}

impl BlogPost {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_document(mut self, document: Value) -> Self {
        self.document = decode_document(document);
        self
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let author = match map.get("author") {
            Some(Value::Object(author)) => first_text(author, &["name", "display_name"]),
            _ => first_text(map, &["author"]),
        };

        let document = DOCUMENT_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|value| decode_document(value.clone()));

        let products = match map.get("products") {
            Some(Value::Array(items)) => items.iter().cloned().map(ProductRecord::from).collect(),
            _ => Vec::new(),
        };

        Self {
            id: map.get("id").and_then(scalar_text),
            title: first_text(map, &["title"]).unwrap_or_default(),
            slug: first_text(map, &["slug"]),
            author,
            content: match map.get("content") {
                Some(Value::String(text)) => Some(text.clone()),
                _ => None,
            },
            document,
            products,
        }
    }
}

impl From<Value> for BlogPost {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(&map),
            _ => Self::default(),
        }
    }
}

/// Documents stored as text columns arrive JSON-encoded; anything that does
/// not decode to a value is treated as absent.
fn decode_document(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(encoded) => {
            let trimmed = encoded.trim();
            if trimmed.is_empty() {
                return None;
            }
            serde_json::from_str::<Value>(trimmed)
                .ok()
                .filter(|decoded| !decoded.is_null())
        }
        other => Some(other),
    }
}
