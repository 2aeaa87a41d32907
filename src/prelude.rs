//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the formlogic crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use formlogic::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let form = FormConfig::from_file("path/to/form.json")?;
//! let values = field_values_from_file("path/to/values.json")?;
//!
//! let evaluator = ConditionalEvaluator::default();
//! for (field_id, result) in evaluator.evaluate_all_fields(&form.fields, &values) {
//!     println!("{}: {:?}", field_id, result);
//! }
//! # Ok(())
//! # }
//! ```

// Evaluation and dependency tracking
pub use crate::evaluator::{
    ConditionalEvaluator, EvaluationContext, EvaluatorBuilder, ReasonPolicy, ValidationResult,
    VisibilityResult,
};
pub use crate::graph::{DependencyChange, DependencyGraph, DependencyManager, GraphNode};

// Field and form types
pub use crate::field::{
    Condition, ConditionalLogic, FieldConfig, FieldType, FieldValue, FieldValues,
    LogicOperator, Operator,
};
pub use crate::form::{FormConfig, IntoForm, field_values_from_file, field_values_from_json};

// Error types
pub use crate::error::{DependencyError, FormConversionError, FormLoadError};

// Reason formatting
pub use crate::trace::{ConditionTrace, ReasonFormatter};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
