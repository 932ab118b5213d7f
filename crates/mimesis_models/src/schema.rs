//! Strict structured-output schemas.

use serde_json::{Map, Value as JsonValue};

/// Normalise a JSON schema for strict structured output.
///
/// Strict mode requires every object to forbid additional properties and to
/// list all of its properties as required. This applies both rules at every
/// nesting level, including array items and `anyOf` branches, and leaves an
/// explicit `additionalProperties` alone.
///
/// # Examples
///
/// ```
/// use mimesis_models::strict_schema;
/// use serde_json::json;
///
/// let schema = strict_schema(&json!({
///     "type": "object",
///     "properties": {
///         "action": { "type": "string" },
///         "targets": { "type": "array", "items": {
///             "type": "object",
///             "properties": { "id": { "type": "string" } }
///         }}
///     }
/// }));
///
/// assert_eq!(schema["additionalProperties"], json!(false));
/// assert_eq!(schema["required"], json!(["action", "targets"]));
/// assert_eq!(schema["properties"]["targets"]["items"]["required"], json!(["id"]));
/// ```
pub fn strict_schema(schema: &JsonValue) -> JsonValue {
    match schema {
        JsonValue::Object(map) => JsonValue::Object(strict_object(map)),
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(strict_schema).collect()),
        other => other.clone(),
    }
}

fn strict_object(map: &Map<String, JsonValue>) -> Map<String, JsonValue> {
    let mut out: Map<String, JsonValue> = map
        .iter()
        .map(|(key, value)| (key.clone(), strict_schema(value)))
        .collect();

    if map.get("type").and_then(JsonValue::as_str) == Some("object") {
        let names: Vec<JsonValue> = map
            .get("properties")
            .and_then(JsonValue::as_object)
            .map(|props| props.keys().cloned().map(JsonValue::String).collect())
            .unwrap_or_default();
        out.insert("required".to_string(), JsonValue::Array(names));
        out.entry("additionalProperties")
            .or_insert(JsonValue::Bool(false));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_named_type_is_not_an_object_marker() {
        let schema = strict_schema(&json!({
            "type": "object",
            "properties": { "type": { "type": "string" } }
        }));
        assert_eq!(schema["required"], json!(["type"]));
        assert!(schema["properties"]["type"].get("required").is_none());
    }

    #[test]
    fn test_scalars_untouched() {
        assert_eq!(strict_schema(&json!({"type": "string"})), json!({"type": "string"}));
    }
}
