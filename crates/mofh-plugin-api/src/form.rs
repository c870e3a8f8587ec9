//! Configuration form schema rendered by the platform's admin UI.

use serde::{Deserialize, Serialize};

/// Input widget of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Password,
    Number,
    Checkbox,
    /// One of [`FormField::options`].
    Select,
}

/// One configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Configuration key the value is stored under.
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FormField {
    /// Creates a required field.
    #[must_use]
    pub fn required(name: &str, field_type: FieldType, label: &str, placeholder: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            required: true,
            options: Vec::new(),
        }
    }

    /// Creates an optional field.
    #[must_use]
    pub fn optional(name: &str, field_type: FieldType, label: &str, placeholder: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type, label, placeholder)
        }
    }

    /// Creates an optional choice between `options`; the first one is the default.
    #[must_use]
    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| (*o).to_string()).collect(),
            ..Self::optional(name, FieldType::Select, label, options.first().copied().unwrap_or_default())
        }
    }
}

/// Configuration form of a server manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigForm {
    pub label: String,
    pub fields: Vec<FormField>,
}

impl ConfigForm {
    /// Names of the fields the platform must collect.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name.as_str())
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}
