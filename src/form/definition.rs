use crate::error::FormLoadError;
use crate::field::{FieldConfig, FieldValues};
use serde::{Deserialize, Serialize};
use std::fs;

/// A form as the builder hands it over: an ordered list of fields plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldConfig>,
}

impl FormConfig {
    /// Parse a form from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, FormLoadError> {
        serde_json::from_str(json).map_err(|e| FormLoadError::JsonParse(e.to_string()))
    }

    /// Load a form from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, FormLoadError> {
        let content = fs::read_to_string(path)
            .map_err(|e| FormLoadError::Io(format!("Could not read '{}': {}", path, e)))?;
        Self::from_json(&content)
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.id == field_id)
    }
}

/// Parse a `{ "fieldId": value }` snapshot from JSON.
pub fn field_values_from_json(json: &str) -> Result<FieldValues, FormLoadError> {
    serde_json::from_str(json).map_err(|e| FormLoadError::JsonParse(e.to_string()))
}

/// Load a `{ "fieldId": value }` snapshot from a JSON file.
pub fn field_values_from_file(path: &str) -> Result<FieldValues, FormLoadError> {
    let content = fs::read_to_string(path)
        .map_err(|e| FormLoadError::Io(format!("Could not read '{}': {}", path, e)))?;
    field_values_from_json(&content)
}
