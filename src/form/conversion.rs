use super::definition::FormConfig;
use crate::error::FormConversionError;

/// A trait for custom form models that can be converted into a `FormConfig`.
///
/// Persistence layers and importers keep their own shapes; implementing this trait
/// is how they hand a form to the evaluator and the dependency manager.
///
/// # Example
///
/// ```rust,no_run
/// use formlogic::prelude::*;
/// use formlogic::error::FormConversionError;
///
/// struct StoredQuestion { key: String, prompt: String }
/// struct StoredForm { slug: String, questions: Vec<StoredQuestion> }
///
/// impl IntoForm for StoredForm {
///     fn into_form(self) -> std::result::Result<FormConfig, FormConversionError> {
///         if self.questions.is_empty() {
///             return Err(FormConversionError::Validation("form has no questions".into()));
///         }
///         Ok(FormConfig {
///             id: self.slug.clone(),
///             title: self.slug,
///             description: None,
///             fields: self
///                 .questions
///                 .into_iter()
///                 .map(|q| FieldConfig::new(q.key, FieldType::Text, q.prompt))
///                 .collect(),
///         })
///     }
/// }
/// ```
pub trait IntoForm {
    /// Consumes the object and converts it into a form the engine understands.
    fn into_form(self) -> Result<FormConfig, FormConversionError>;
}

impl IntoForm for FormConfig {
    fn into_form(self) -> Result<FormConfig, FormConversionError> {
        Ok(self)
    }
}
