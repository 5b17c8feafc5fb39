//! Structured post content: sections, product placements and the flat
//! buying-guide schema.
//!
//! Documents come from a generation pipeline that does not strictly enforce a
//! schema, so every type here is built leniently from `serde_json::Value`.
//! Unreadable fields become `None` instead of failing the whole document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{first_text, ordinal, scalar_text, text_list};
use super::products::ProductId;

/// Tag assigned to sections that carry only markdown.
pub const PLAIN_CONTENT_TAG: &str = "content";

/// One addressable block of a post's structured content.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Section {
    /// Free-form `type` tag; matched by substring during dispatch.
    pub kind_tag: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub products: Option<Vec<ProductPlacement>>,
    pub products_mentioned: Option<Vec<ProductId>>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
    pub headers: Option<Vec<String>>,
    pub rows: Option<Vec<Vec<String>>>,
    pub specs: Option<Vec<SpecEntry>>,
    pub faqs: Option<Vec<FaqEntry>>,
    pub affiliate_placement: Option<AffiliatePlacement>,
}

impl Section {
    pub fn markdown(kind_tag: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind_tag: kind_tag.into(),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Markdown body, when present and not blank.
    pub fn body_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|content| !content.trim().is_empty())
    }

    /// Title, when present and not blank.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let headers = text_list(map.get("headers"));
        let rows = map
            .get("rows")
            .and_then(|rows| table_rows(rows, headers.as_deref().unwrap_or_default()));

        Self {
            kind_tag: first_text(map, &["type"]).unwrap_or_default(),
            title: first_text(map, &["title", "heading"]),
            content: map.get("content").and_then(scalar_text),
            products: map.get("products").and_then(product_placements),
            products_mentioned: map.get("products_mentioned").and_then(product_ids),
            pros: text_list(map.get("pros")),
            cons: text_list(map.get("cons")),
            headers,
            rows,
            specs: map.get("specs").and_then(spec_entries),
            faqs: map.get("faqs").and_then(faq_entries),
            affiliate_placement: first_text(map, &["affiliate_placement"])
                .map(|raw| AffiliatePlacement::parse(&raw)),
        }
    }
}

impl From<Value> for Section {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(&map),
            Value::String(text) => Self::markdown(PLAIN_CONTENT_TAG, text),
            _ => Self::default(),
        }
    }
}

/// A product referenced from within a section. Never owns the product; the
/// id is resolved against the hydration map at render time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPlacement {
    pub product_id: ProductId,
    pub context: Option<String>,
    pub position: Option<u32>,
    pub cta_text: Option<String>,
}

impl ProductPlacement {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            context: None,
            position: None,
            cta_text: None,
        }
    }

    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return ProductId::from_value(value).map(Self::new);
        };

        let product_id = ["product_id", "id"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(ProductId::from_value)?;

        Some(Self {
            product_id,
            context: first_text(
                map,
                &[
                    "context",
                    "reason",
                    "summary",
                    "verdict",
                    "description",
                    "content",
                ],
            ),
            position: map.get("position").and_then(ordinal),
            cta_text: first_text(map, &["cta_text", "cta"]),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Where affiliate links for a comparison table are placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffiliatePlacement {
    BelowTable,
    Other(String),
}

impl AffiliatePlacement {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "below_table" => Self::BelowTable,
            _ => Self::Other(normalized),
        }
    }
}

fn product_placements(value: &Value) -> Option<Vec<ProductPlacement>> {
    let Value::Array(items) = value else {
        return None;
    };
    Some(items.iter().filter_map(ProductPlacement::from_value).collect())
}

fn product_ids(value: &Value) -> Option<Vec<ProductId>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(map) => ["product_id", "id"]
                        .iter()
                        .filter_map(|key| map.get(*key))
                        .find_map(ProductId::from_value),
                    other => ProductId::from_value(other),
                })
                .collect(),
        ),
        other => ProductId::from_value(other).map(|id| vec![id]),
    }
}

/// Rows are arrays of cells or objects keyed by header name.
pub(crate) fn table_rows(value: &Value, headers: &[String]) -> Option<Vec<Vec<String>>> {
    let Value::Array(rows) = value else {
        return None;
    };

    let rows = rows
        .iter()
        .filter_map(|row| match row {
            Value::Array(cells) => Some(cells.iter().map(cell_text).collect()),
            Value::Object(cells) if !headers.is_empty() => Some(
                headers
                    .iter()
                    .map(|header| cells.get(header).map(cell_text).unwrap_or_default())
                    .collect(),
            ),
            Value::Object(cells) => Some(cells.values().map(cell_text).collect()),
            _ => None,
        })
        .collect();
    Some(rows)
}

fn cell_text(value: &Value) -> String {
    scalar_text(value).unwrap_or_default()
}

fn spec_entries(value: &Value) -> Option<Vec<SpecEntry>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| {
                    let Value::Object(map) = item else {
                        return None;
                    };
                    let label = first_text(map, &["label", "name", "key"])?;
                    let value = map.get("value").and_then(scalar_text).unwrap_or_default();
                    Some(SpecEntry { label, value })
                })
                .collect(),
        ),
        Value::Object(map) => Some(
            map.iter()
                .filter(|(label, _)| !label.trim().is_empty())
                .map(|(label, value)| SpecEntry {
                    label: label.clone(),
                    value: cell_text(value),
                })
                .collect(),
        ),
        _ => None,
    }
}

pub(crate) fn faq_entries(value: &Value) -> Option<Vec<FaqEntry>> {
    let Value::Array(items) = value else {
        return None;
    };

    Some(
        items
            .iter()
            .filter_map(|item| {
                let Value::Object(map) = item else {
                    return None;
                };
                let question = first_text(map, &["question", "q"])?;
                let answer = first_text(map, &["answer", "a"]).unwrap_or_default();
                Some(FaqEntry { question, answer })
            })
            .collect(),
    )
}

/// Keys of the flat buying-guide schema, in the order they are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlatKey {
    Introduction,
    QuickPicks,
    BuyingCriteria,
    DetailedReviews,
    ComparisonTable,
    BudgetBreakdown,
    SetupGuide,
    CommonMistakes,
    ExpertVerdict,
    Conclusion,
    Faqs,
}

impl FlatKey {
    /// Render order for flat documents. Units follow this list rather than
    /// the order keys appear in the payload, since producers emit keys in no
    /// stable order.
    pub const ALL: [FlatKey; 11] = [
        FlatKey::Introduction,
        FlatKey::QuickPicks,
        FlatKey::BuyingCriteria,
        FlatKey::DetailedReviews,
        FlatKey::ComparisonTable,
        FlatKey::BudgetBreakdown,
        FlatKey::SetupGuide,
        FlatKey::CommonMistakes,
        FlatKey::ExpertVerdict,
        FlatKey::Conclusion,
        FlatKey::Faqs,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FlatKey::Introduction => "introduction",
            FlatKey::QuickPicks => "quick_picks",
            FlatKey::BuyingCriteria => "buying_criteria",
            FlatKey::DetailedReviews => "detailed_reviews",
            FlatKey::ComparisonTable => "comparison_table",
            FlatKey::BudgetBreakdown => "budget_breakdown",
            FlatKey::SetupGuide => "setup_guide",
            FlatKey::CommonMistakes => "common_mistakes",
            FlatKey::ExpertVerdict => "expert_verdict",
            FlatKey::Conclusion => "conclusion",
            FlatKey::Faqs => "faqs",
        }
    }

    /// Heading shown when the document does not supply one.
    pub const fn default_title(self) -> Option<&'static str> {
        match self {
            FlatKey::Introduction => None,
            FlatKey::QuickPicks => Some("Quick Picks"),
            FlatKey::BuyingCriteria => Some("What to Look For"),
            FlatKey::DetailedReviews => Some("Detailed Reviews"),
            FlatKey::ComparisonTable => Some("Comparison Table"),
            FlatKey::BudgetBreakdown => Some("Budget Breakdown"),
            FlatKey::SetupGuide => Some("Setup Guide"),
            FlatKey::CommonMistakes => Some("Common Mistakes to Avoid"),
            FlatKey::ExpertVerdict => Some("Expert Verdict"),
            FlatKey::Conclusion => Some("Conclusion"),
            FlatKey::Faqs => Some("Frequently Asked Questions"),
        }
    }
}

/// A content document keyed by the fixed flat schema names.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatStructuredDoc {
    entries: Vec<(FlatKey, Value)>,
}

impl FlatStructuredDoc {
    /// Collect the recognised keys present in `map`. Returns `None` when the
    /// map exposes none of them; `null` values count as absent.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let entries: Vec<(FlatKey, Value)> = FlatKey::ALL
            .iter()
            .filter_map(|key| match map.get(key.as_str()) {
                None | Some(Value::Null) => None,
                Some(value) => Some((*key, value.clone())),
            })
            .collect();

        (!entries.is_empty()).then_some(Self { entries })
    }

    pub fn keys(&self) -> impl Iterator<Item = FlatKey> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn into_entries(self) -> Vec<(FlatKey, Value)> {
        self.entries
    }
}
