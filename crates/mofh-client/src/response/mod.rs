//! Decoded provider responses.
//!
//! The provider answers in XML or JSON depending on the configured surface.
//! Both decode into a tree that supports the same path lookups, so error
//! detection and field extraction are written once.

mod json;
mod xml;

pub use json::JsonResponse;
pub use xml::{XmlElement, XmlResponse};

use mofh_config::ApiSurface;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Body that could not be decoded as the configured format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// Format-neutral value found at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Explicit null (`null` in JSON, `nil="true"` in XML).
    Null,
    Scalar(String),
    List(Vec<FieldValue>),
    Record(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Text of a scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric zero or boolean false, in any of their textual forms.
    #[must_use]
    pub fn is_zero_or_false(&self) -> bool {
        let Some(text) = self.as_text() else {
            return false;
        };
        let text = text.trim();
        text.eq_ignore_ascii_case("false") || text.parse::<f64>().is_ok_and(|n| n == 0.0)
    }

    /// Scalars as-is, lists of scalars joined with ", ".
    #[must_use]
    pub fn to_message(&self) -> Option<String> {
        match self {
            Self::Scalar(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().filter_map(Self::to_message).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        }
    }

    /// Named field of a record. Lists answer for their first element.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        match self {
            Self::Record(fields) => fields.get(name),
            Self::List(items) => items.first().and_then(|first| first.field(name)),
            _ => None,
        }
    }

    /// Elements of a list; any other value is a list of itself.
    #[must_use]
    pub fn into_items(self) -> Vec<FieldValue> {
        match self {
            Self::List(items) => items,
            Self::Null => Vec::new(),
            other => vec![other],
        }
    }
}

/// Read-only view over a decoded body.
pub trait DecodedResponse: Send + Sync + fmt::Debug {
    /// Value at a path of field names below the root.
    ///
    /// A list met before the last segment is entered through its first
    /// element.
    fn lookup(&self, path: &[&str]) -> Option<FieldValue>;

    /// Items of a body that is itself a list.
    fn root_items(&self) -> Option<Vec<FieldValue>>;

    /// Value at a dotted path such as `result.status`.
    fn get(&self, path: &str) -> Option<FieldValue> {
        let segments: Vec<&str> = path.split('.').collect();
        self.lookup(&segments)
    }

    fn has_field(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Trimmed, non-empty scalar text at a dotted path.
    fn get_text(&self, path: &str) -> Option<String> {
        self.get(path)
            .and_then(|value| value.as_text().map(|text| text.trim().to_string()))
            .filter(|text| !text.is_empty())
    }
}

/// Decodes a body according to the configured surface.
pub fn decode(surface: ApiSurface, body: &str) -> Result<Box<dyn DecodedResponse>, DecodeError> {
    match surface {
        ApiSurface::Json => Ok(Box::new(JsonResponse::parse(body)?)),
        ApiSurface::Xml => Ok(Box::new(XmlResponse::parse(body)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(text: &str) -> FieldValue {
        FieldValue::Scalar(text.to_string())
    }

    #[test]
    fn test_zero_or_false() {
        for text in ["0", " 0 ", "0.0", "false", "FALSE"] {
            assert!(scalar(text).is_zero_or_false(), "{}", text);
        }
        for text in ["1", "true", "", "active", "00x"] {
            assert!(!scalar(text).is_zero_or_false(), "{}", text);
        }
        assert!(!FieldValue::Null.is_zero_or_false());
    }

    #[test]
    fn test_message_joins_lists() {
        let errors = FieldValue::List(vec![scalar("first"), scalar(""), scalar("second")]);
        assert_eq!(errors.to_message().unwrap(), "first, second");
        assert_eq!(FieldValue::List(Vec::new()).to_message(), None);
        assert_eq!(FieldValue::Null.to_message(), None);
    }

    #[test]
    fn test_decode_by_surface() {
        let json = decode(ApiSurface::Json, r#"{"version": "1.2"}"#).unwrap();
        assert_eq!(json.get_text("version").unwrap(), "1.2");

        let xml = decode(ApiSurface::Xml, "<version><version>1.2</version></version>").unwrap();
        assert_eq!(xml.get_text("version").unwrap(), "1.2");

        assert!(decode(ApiSurface::Json, "<version/>").is_err());
        assert!(decode(ApiSurface::Xml, r#"{"version": "1.2"}"#).is_err());
    }
}
