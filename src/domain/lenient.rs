//! Tolerant field extraction for JSON produced by the content generation pipeline.
//!
//! Authoring payloads are only loosely schema'd: numbers arrive as strings,
//! single values arrive where lists are expected, and keys drift between
//! synonyms. These helpers never fail; a field that cannot be read is `None`.

use serde_json::{Map, Value};

/// First non-blank string stored under any of `keys`.
pub(crate) fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(|value| match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        })
}

/// Render a scalar as display text. Containers and `null` yield `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read a list of display strings, one per element, in input order.
///
/// Elements are never dropped: blank strings stay as given and `null` or
/// container elements become `""`, so positions line up with sibling lists
/// such as table rows. A lone scalar becomes a one-element list.
///
/// Returns `None` when the field is absent or has an unusable shape, so callers
/// can distinguish "not provided" from "provided but empty".
pub(crate) fn text_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| scalar_text(item).unwrap_or_default())
                .collect(),
        ),
        Value::Null | Value::Object(_) => None,
        scalar => scalar_text(scalar).map(|text| vec![text]),
    }
}

/// Read a number that may have been serialised as a string.
pub(crate) fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

/// Read a 1-based ordinal such as a product position.
pub(crate) fn ordinal(value: &Value) -> Option<u32> {
    let raw = number(value)?;
    if raw < 0.0 || raw.fract() != 0.0 || raw > f64::from(u32::MAX) {
        return None;
    }
    Some(raw as u32)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_text_skips_blank_and_non_string_values() {
        let value = json!({ "name": "  ", "title": 4, "label": "Amp" });
        let map = value.as_object().expect("object");
        assert_eq!(
            first_text(map, &["name", "title", "label"]).as_deref(),
            Some("Amp")
        );
    }

    #[test]
    fn text_list_keeps_every_position() {
        assert_eq!(
            text_list(Some(&json!("Warm tone"))),
            Some(vec!["Warm tone".to_string()])
        );
        assert_eq!(
            text_list(Some(&json!(["Light", 3, null, "", true, [1]]))),
            Some(vec![
                "Light".into(),
                "3".into(),
                "".into(),
                "".into(),
                "true".into(),
                "".into(),
            ])
        );
        assert_eq!(text_list(Some(&json!({ "a": 1 }))), None);
        assert_eq!(text_list(None), None);
    }

    #[test]
    fn ordinal_rejects_fractions_and_negatives() {
        assert_eq!(ordinal(&json!(2)), Some(2));
        assert_eq!(ordinal(&json!("3")), Some(3));
        assert_eq!(ordinal(&json!(1.5)), None);
        assert_eq!(ordinal(&json!(-1)), None);
    }
}
