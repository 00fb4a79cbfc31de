use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single imported row: field key -> cell, plus validation annotations.
///
/// Cell values are never rewritten by validation; workflows only append
/// messages to a cell's annotation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: String,
    #[serde(default)]
    pub values: HashMap<String, CellValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ValidationMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub source: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warn,
    Info,
}

impl ImportRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: HashMap::new(),
        }
    }

    /// Set a plain string cell value (builder-style, used heavily in tests).
    pub fn with_value(mut self, field: &str, value: &str) -> Self {
        self.values.insert(
            field.to_string(),
            CellValue {
                value: Some(serde_json::Value::String(value.to_string())),
                messages: Vec::new(),
            },
        );
        self
    }

    /// Read a field's value as a string, if present and textual.
    pub fn str_value(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)?
            .value
            .as_ref()?
            .as_str()
    }

    /// Attach a validation error to a field. The cell entry is created if the
    /// field was never populated.
    pub fn add_error(&mut self, field: &str, message: &str) {
        let cell = self.values.entry(field.to_string()).or_default();
        cell.messages.push(ValidationMessage {
            kind: MessageKind::Error,
            source: "custom".to_string(),
            message: message.to_string(),
        });
    }

    /// Whether any field carries an error annotation.
    pub fn has_errors(&self) -> bool {
        self.values
            .values()
            .any(|cell| cell.messages.iter().any(|m| m.kind == MessageKind::Error))
    }

    /// Errors attached to a specific field.
    pub fn field_errors(&self, field: &str) -> Vec<&ValidationMessage> {
        self.values
            .get(field)
            .map(|cell| {
                cell.messages
                    .iter()
                    .filter(|m| m.kind == MessageKind::Error)
                    .collect()
            })
            .unwrap_or_default()
    }
}
