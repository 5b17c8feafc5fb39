//! Product identities and the summaries used to hydrate product references.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use slug::slugify;

use super::lenient::{first_text, number};

/// Product identifier normalised to its string form.
///
/// The content API emits ids as integers in one place and numeric strings in
/// another; both `42` and `"42"` map to the same key. Strings are kept verbatim
/// after trimming, so `"042"` stays distinct from `42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    return Some(Self(integer.to_string()));
                }
                if let Some(integer) = number.as_u64() {
                    return Some(Self(integer.to_string()));
                }
                number
                    .as_f64()
                    .filter(|float| float.is_finite() && float.fract() == 0.0)
                    .map(|float| Self(format!("{float:.0}")))
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Raw product entry as delivered alongside a post.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ProductRecord {
    pub id: Option<ProductId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub lowest_price: Option<f64>,
    pub currency: Option<String>,
}

impl ProductRecord {
    pub fn new(id: u64, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Some(ProductId::from(id)),
            name: Some(name.into()),
            slug: Some(slug.into()),
            ..Self::default()
        }
    }
}

impl From<Value> for ProductRecord {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        let id = ["id", "product_id"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(ProductId::from_value);

        let brand = match map.get("brand") {
            Some(Value::Object(brand)) => first_text(brand, &["name"]),
            _ => first_text(&map, &["brand"]),
        };

        Self {
            id,
            name: first_text(&map, &["name", "title"]),
            slug: first_text(&map, &["slug"]),
            image_url: first_text(&map, &["image_url", "thumbnail", "image"]),
            brand,
            lowest_price: ["lowest_price", "price"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(number),
            currency: first_text(&map, &["currency"]),
        }
    }
}

/// Minimal product view a reference resolves to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl ProductSummary {
    /// Build a summary from a raw record; records without an id yield `None`.
    ///
    /// The slug falls back to a slugified name and then to the id, so every
    /// summary carries a usable link under `base_path`.
    pub fn from_record(record: &ProductRecord, base_path: &str) -> Option<Self> {
        let id = record.id.clone()?;

        let slug = record
            .slug
            .as_deref()
            .map(|slug| slug.trim().trim_matches('/').to_string())
            .filter(|slug| !slug.is_empty())
            .or_else(|| {
                record
                    .name
                    .as_deref()
                    .map(slugify)
                    .filter(|slug| !slug.is_empty())
            })
            .unwrap_or_else(|| id.as_str().to_string());

        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| slug.clone());

        Some(Self {
            url: product_url(base_path, &slug),
            id,
            name,
            slug,
            image_url: record.image_url.clone(),
            brand: record.brand.clone(),
            lowest_price: record.lowest_price,
            currency: record.currency.clone(),
        })
    }
}

pub fn product_url(base_path: &str, slug: &str) -> String {
    format!("{}/{}", base_path.trim_end_matches('/'), slug)
}
