//! Conversions between stored values and their editable text form

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Separator used when a list is shown as text
pub const LIST_SEPARATOR: &str = ", ";

/// Split comma-separated text into trimmed, non-empty entries
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Show a list as comma-separated text
pub fn join_list(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// Like [`split_list`], but at least one entry must remain
pub fn required_list(field: &'static str, text: &str) -> Result<Vec<String>, ValidationError> {
    let items = split_list(text);
    if items.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(items)
}

/// A required text field: blank is rejected, anything else kept verbatim
pub fn require(field: &'static str, text: &str) -> Result<String, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(text.to_string())
}

/// An optional text field: blank means absent
pub fn optional(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Pretty-printed JSON for a structured field
pub fn to_json_text<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Parse a JSON-bearing field. Blank text yields the empty value.
pub fn parse_json<T>(field: &'static str, text: &str) -> Result<T, ValidationError>
where
    T: DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(text).map_err(|err| ValidationError::invalid_format(field, err))
}

/// Free-form JSON content, checked at the parse boundary to be an object or
/// an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredDocument(Value);

impl StructuredDocument {
    pub fn new(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(_) | Value::Array(_) => Ok(Self(value)),
            other => Err(format!("expected an object or array, found {}", kind(&other))),
        }
    }

    /// Parse editor text; blank or scalar content is rejected
    pub fn parse(field: &'static str, text: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| ValidationError::invalid_format(field, err))?;
        Self::new(value).map_err(|reason| ValidationError::invalid_format(field, reason))
    }

    pub fn to_text(&self) -> String {
        to_json_text(&self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl Default for StructuredDocument {
    fn default() -> Self {
        Self(Value::Object(Default::default()))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        client: String,
        text: String,
        rating: u8,
    }

    #[test]
    fn test_split_trims_and_drops_empty() {
        assert_eq!(split_list(" React ,Node,, "), vec!["React", "Node"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_join_then_split_is_identity() {
        let lists = vec![
            vec!["React".to_string()],
            vec!["Rust".to_string(), "Tokio".to_string(), "Axum web".to_string()],
            vec![],
        ];
        for list in lists {
            assert_eq!(split_list(&join_list(&list)), list);
        }
    }

    #[test]
    fn test_required_list_needs_one_token() {
        assert_eq!(
            required_list("technologies", " , ,"),
            Err(ValidationError::Required("technologies"))
        );
        assert_eq!(required_list("technologies", "Go,").unwrap(), vec!["Go"]);
    }

    #[test]
    fn test_require_and_optional() {
        assert_eq!(require("title", "   "), Err(ValidationError::Required("title")));
        assert_eq!(require("title", " Shop").unwrap(), " Shop");
        assert_eq!(optional(""), None);
        assert_eq!(optional("https://x.dev"), Some("https://x.dev".to_string()));
    }

    #[test]
    fn test_json_round_trip() {
        let entries = vec![
            Entry {
                client: "Acme".to_string(),
                text: "Great work, \"fast\"".to_string(),
                rating: 5,
            },
            Entry {
                client: "Globex".to_string(),
                text: String::new(),
                rating: 3,
            },
        ];
        let text = to_json_text(&entries);
        assert!(text.contains('\n'));
        let parsed: Vec<Entry> = parse_json("testimonials", &text).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_blank_json_is_empty_value() {
        let parsed: Vec<Entry> = parse_json("testimonials", "  ").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_malformed_json_is_invalid_format() {
        let err = parse_json::<Vec<Entry>>("services", "not json").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "services", .. }));

        let wrong_shape = parse_json::<Vec<Entry>>("testimonials", r#"[{"client":"A"}]"#);
        assert!(wrong_shape.is_err());
    }

    #[test]
    fn test_structured_document_rejects_scalars() {
        let doc = StructuredDocument::parse("content", r#"{"items":[1,2]}"#).unwrap();
        assert_eq!(doc.get("items"), Some(&json!([1, 2])));
        assert_eq!(StructuredDocument::parse("content", &doc.to_text()).unwrap(), doc);

        assert!(StructuredDocument::parse("content", "42").is_err());
        assert!(StructuredDocument::parse("content", "").is_err());
        assert!(StructuredDocument::new(json!(null)).is_err());
    }
}
