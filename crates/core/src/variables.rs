//! Environment variable mappings.
//!
//! Environments store their variables as a JSON object. Interpolation only
//! ever sees a flat `String -> String` mapping produced by [`flatten`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::CoreError;

/// Flat variable mapping handed to the interpolator.
pub type Variables = BTreeMap<String, String>;

/// Render a scalar JSON value as the text it substitutes to.
///
/// Returns `None` for `null`, arrays and objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Flatten a stored variables value into a [`Variables`] mapping.
///
/// Strings are kept verbatim, numbers and booleans are stringified and
/// nulls or nested values are skipped. Anything other than a JSON object
/// yields `None` so the caller can decide how to degrade.
pub fn flatten(value: &Value) -> Option<Variables> {
    let object = value.as_object()?;
    Some(
        object
            .iter()
            .filter_map(|(key, v)| scalar_text(v).map(|text| (key.clone(), text)))
            .collect(),
    )
}

/// Validate user-supplied variables before they are stored.
///
/// The value must be a JSON object with scalar (or null) values only.
pub fn validate(value: &Value) -> Result<(), CoreError> {
    let object = value
        .as_object()
        .ok_or_else(|| CoreError::invalid_payload("variables", "expected a JSON object"))?;

    if let Some((key, _)) = object
        .iter()
        .find(|(_, v)| matches!(v, Value::Array(_) | Value::Object(_)))
    {
        return Err(CoreError::invalid_payload(
            "variables",
            format!("variable '{key}' must be a string, number or boolean"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn flatten_keeps_strings_and_stringifies_scalars() {
        let vars = flatten(&json!({
            "baseUrl": "https://api.example.com",
            "retries": 3,
            "debug": true,
            "unset": null
        }))
        .unwrap();

        assert_eq!(vars["baseUrl"], "https://api.example.com");
        assert_eq!(vars["retries"], "3");
        assert_eq!(vars["debug"], "true");
        assert!(!vars.contains_key("unset"));
    }

    #[test]
    fn flatten_skips_nested_values() {
        let vars = flatten(&json!({"a": {"b": 1}, "c": [1], "d": "ok"})).unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["d"], "ok");
    }

    #[test]
    fn flatten_rejects_non_objects() {
        assert!(flatten(&json!("{\"a\": 1}")).is_none());
        assert!(flatten(&json!([1, 2])).is_none());
        assert!(flatten(&Value::Null).is_none());
    }

    #[test]
    fn validate_accepts_flat_object() {
        assert!(validate(&json!({"a": "1", "b": 2, "c": false, "d": null})).is_ok());
        assert!(validate(&json!({})).is_ok());
    }

    #[test]
    fn validate_rejects_nesting_and_non_objects() {
        assert_matches!(
            validate(&json!({"a": {"b": "c"}})),
            Err(CoreError::InvalidPayload { field: "variables", .. })
        );
        assert_matches!(
            validate(&json!("text")),
            Err(CoreError::InvalidPayload { field: "variables", .. })
        );
    }
}
