use super::{DecodeError, DecodedResponse, FieldValue};
use serde_json::Value;

/// Response decoded from the JSON surface.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    root: Value,
}

impl JsonResponse {
    pub fn parse(body: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(body.trim())
            .map(|root| Self { root })
            .map_err(|e| DecodeError(format!("invalid JSON: {}", e)))
    }
}

fn to_field(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Scalar(b.to_string()),
        Value::Number(n) => FieldValue::Scalar(n.to_string()),
        Value::String(s) => FieldValue::Scalar(s.clone()),
        Value::Array(items) => FieldValue::List(items.iter().map(to_field).collect()),
        Value::Object(map) => FieldValue::Record(map.iter().map(|(k, v)| (k.clone(), to_field(v))).collect()),
    }
}

impl DecodedResponse for JsonResponse {
    fn lookup(&self, path: &[&str]) -> Option<FieldValue> {
        // Field paths only make sense below an object root.
        if !self.root.is_object() {
            return None;
        }

        let mut node = &self.root;
        for segment in path {
            if let Value::Array(items) = node {
                node = items.first()?;
            }
            node = node.as_object()?.get(*segment)?;
        }
        Some(to_field(node))
    }

    fn root_items(&self) -> Option<Vec<FieldValue>> {
        self.root.as_array().map(|items| items.iter().map(to_field).collect())
    }
}
