//! # Print Requests and Documents
//!
//! A [`PrintRequest`] is what clients POST to `/print`. It renders to a
//! plain-text document: the free text first, then one line per item.
//!
//! ```
//! use printbridge::document::PrintRequest;
//!
//! let request = PrintRequest {
//!     text: Some("Hello".into()),
//!     items: Some(vec!["Item 1: $10".into(), "Total: $10".into()]),
//! };
//! assert_eq!(request.render(), "Hello\nItem 1: $10\nTotal: $10\n");
//! ```
//!
//! ## Shape Leniency
//!
//! Payloads are checked for shape only. A non-string `text` scalar is
//! stringified, an empty `text` counts as absent, a non-array `items` is
//! ignored, and item elements that are not strings are stringified (`null`
//! becomes an empty line).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A request to print free text and/or a list of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRequest {
    /// Free text printed before the items
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Line items, printed one per line in order
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl PrintRequest {
    /// Render the request as a linear text document.
    pub fn render(&self) -> String {
        let mut content = String::new();

        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            content.push_str(text);
            content.push('\n');
        }

        if let Some(items) = &self.items {
            content.push_str(&items.join("\n"));
            content.push('\n');
        }

        content
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        other => Some(scalar_to_string(other)),
    })
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(items.into_iter().map(scalar_to_string).collect()),
        _ => None,
    })
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> PrintRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_only() {
        let req = PrintRequest {
            text: Some("Hello".into()),
            items: None,
        };
        assert_eq!(req.render(), "Hello\n");
    }

    #[test]
    fn test_multiline_text_is_kept_verbatim() {
        let req = PrintRequest {
            text: Some("a\nb".into()),
            items: None,
        };
        assert_eq!(req.render(), "a\nb\n");
    }

    #[test]
    fn test_items_only_preserve_order() {
        let req = PrintRequest {
            text: None,
            items: Some(vec!["z".into(), "a".into(), "m".into()]),
        };
        assert_eq!(req.render(), "z\na\nm\n");
    }

    #[test]
    fn test_text_precedes_items() {
        let req = parse(r#"{"items":["Item 1: $10","Total: $10"],"text":"Hello"}"#);
        assert_eq!(req.render(), "Hello\nItem 1: $10\nTotal: $10\n");
    }

    #[test]
    fn test_empty_request_renders_nothing() {
        assert_eq!(parse("{}").render(), "");
    }

    #[test]
    fn test_empty_items_renders_single_break() {
        assert_eq!(parse(r#"{"items":[]}"#).render(), "\n");
    }

    #[test]
    fn test_empty_text_counts_as_absent() {
        assert_eq!(parse(r#"{"text":"","items":["x"]}"#).render(), "x\n");
    }

    #[test]
    fn test_non_string_text_is_stringified() {
        assert_eq!(parse(r#"{"text":42}"#).render(), "42\n");
        assert_eq!(parse(r#"{"text":null}"#).text, None);
    }

    #[test]
    fn test_non_array_items_are_ignored() {
        let req = parse(r#"{"text":"t","items":"not a list"}"#);
        assert_eq!(req.items, None);
        assert_eq!(req.render(), "t\n");
    }

    #[test]
    fn test_item_elements_are_stringified() {
        let req = parse(r#"{"items":["a",1,true,null]}"#);
        assert_eq!(
            req.items,
            Some(vec!["a".into(), "1".into(), "true".into(), String::new()])
        );
    }

    #[test]
    fn test_unknown_fields_ignored() {
        assert_eq!(parse(r#"{"text":"x","copies":3}"#).render(), "x\n");
    }
}
