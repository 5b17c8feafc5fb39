//! Classifies a post's content into exactly one authoritative shape.

use serde_json::{Map, Value};

use crate::domain::content::{
    FlatKey, FlatStructuredDoc, PLAIN_CONTENT_TAG, ProductPlacement, Section, faq_entries,
    table_rows,
};
use crate::domain::lenient::{first_text, scalar_text};
use crate::domain::posts::BlogPost;

use super::types::ContentMode;

/// Tag given to flat entries lowered into product placements.
const SHOWCASE_TAG: &str = "product_showcase_inline";

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedContent {
    Sections(Vec<Section>),
    Flat(FlatStructuredDoc),
    Plain(String),
}

impl NormalizedContent {
    pub fn mode(&self) -> ContentMode {
        match self {
            NormalizedContent::Sections(_) => ContentMode::Sections,
            NormalizedContent::Flat(_) => ContentMode::Flat,
            NormalizedContent::Plain(_) => ContentMode::Plain,
        }
    }

    /// Structural units in render order. Plain content always yields exactly
    /// one unit, which may be blank.
    pub fn into_units(self) -> Vec<Section> {
        match self {
            NormalizedContent::Sections(sections) => sections,
            NormalizedContent::Flat(doc) => doc
                .into_entries()
                .into_iter()
                .map(|(key, value)| lower_flat_entry(key, value))
                .collect(),
            NormalizedContent::Plain(text) => vec![Section::markdown(PLAIN_CONTENT_TAG, text)],
        }
    }
}

/// Precedence is fixed: a `sections` array beats flat keys, which beat the
/// post's plain `content`.
pub fn normalize(post: &BlogPost) -> NormalizedContent {
    if let Some(Value::Object(document)) = &post.document {
        if let Some(Value::Array(items)) = document.get("sections") {
            return NormalizedContent::Sections(items.iter().cloned().map(Section::from).collect());
        }
        if let Some(doc) = FlatStructuredDoc::from_map(document) {
            return NormalizedContent::Flat(doc);
        }
    }

    NormalizedContent::Plain(post.content.clone().unwrap_or_default())
}

fn lower_flat_entry(key: FlatKey, value: Value) -> Section {
    let mut section = match value {
        Value::Object(map) => {
            let mut section = Section::from_map(&map);
            if section.kind_tag.is_empty() {
                section.kind_tag = key.as_str().to_string();
            }
            section
        }
        Value::Array(items) => lower_flat_array(key, &items),
        other => Section::markdown(key.as_str(), scalar_text(&other).unwrap_or_default()),
    };

    if section.title_text().is_none() {
        section.title = key.default_title().map(str::to_string);
    }
    section
}

fn lower_flat_array(key: FlatKey, items: &[Value]) -> Section {
    match key {
        FlatKey::Faqs => Section {
            kind_tag: key.as_str().to_string(),
            faqs: faq_entries(&Value::Array(items.to_vec())),
            ..Section::default()
        },
        FlatKey::QuickPicks | FlatKey::DetailedReviews | FlatKey::BudgetBreakdown
            if items.iter().any(carries_product_id) =>
        {
            let products = items
                .iter()
                .enumerate()
                .filter(|(_, item)| carries_product_id(item))
                .filter_map(|(index, item)| {
                    let mut placement = ProductPlacement::from_value(item)?;
                    if placement.position.is_none() {
                        placement.position = u32::try_from(index + 1).ok();
                    }
                    Some(placement)
                })
                .collect();
            Section {
                kind_tag: SHOWCASE_TAG.to_string(),
                products: Some(products),
                ..Section::default()
            }
        }
        FlatKey::ComparisonTable if items.iter().all(Value::is_object) && !items.is_empty() => {
            let headers: Vec<String> = items
                .first()
                .and_then(Value::as_object)
                .map(|first| first.keys().cloned().collect())
                .unwrap_or_default();
            let rows = table_rows(&Value::Array(items.to_vec()), &headers);
            Section {
                kind_tag: key.as_str().to_string(),
                headers: Some(headers),
                rows,
                ..Section::default()
            }
        }
        _ => Section::markdown(
            key.as_str(),
            markdown_list(items, key == FlatKey::SetupGuide),
        ),
    }
}

fn carries_product_id(item: &Value) -> bool {
    item.as_object()
        .is_some_and(|map| map.contains_key("product_id"))
}

fn markdown_list(items: &[Value], numbered: bool) -> String {
    items
        .iter()
        .filter_map(list_item_text)
        .enumerate()
        .map(|(index, text)| {
            if numbered {
                format!("{}. {text}", index + 1)
            } else {
                format!("- {text}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_item_text(item: &Value) -> Option<String> {
    let Value::Object(map) = item else {
        return scalar_text(item);
    };
    object_item_text(map)
}

fn object_item_text(map: &Map<String, Value>) -> Option<String> {
    let heading = first_text(map, &["title", "name", "heading", "step", "mistake"]);
    let detail = first_text(
        map,
        &[
            "description",
            "content",
            "text",
            "detail",
            "explanation",
            "tip",
            "reason",
            "fix",
        ],
    );

    match (heading, detail) {
        (Some(heading), Some(detail)) => Some(format!("**{heading}**: {detail}")),
        (Some(heading), None) => Some(format!("**{heading}**")),
        (None, Some(detail)) => Some(detail),
        (None, None) => None,
    }
}
