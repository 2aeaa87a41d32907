use thiserror::Error;

/// Errors returned by `DependencyManager` mutations.
///
/// These signal caller mistakes (mutating a field that is not there, adding one twice).
/// Broken conditional logic is never an error; it is reported through `ValidationResult`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("Field '{field_id}' already exists in the dependency graph")]
    FieldAlreadyExists { field_id: String },

    #[error("Field '{field_id}' not found in the dependency graph")]
    FieldNotFound { field_id: String },
}

/// Errors that can occur while loading forms or field values from disk or JSON.
#[derive(Error, Debug, Clone)]
pub enum FormLoadError {
    #[error("Failed to read form data: {0}")]
    Io(String),

    #[error("Failed to parse form JSON: {0}")]
    JsonParse(String),
}

/// Errors that can occur when converting a custom user format into a `FormConfig`.
#[derive(Error, Debug, Clone)]
pub enum FormConversionError {
    #[error("Invalid custom form data: {0}")]
    Validation(String),
}
