//! # formlogic - Conditional Logic Engine for Form Builders
//!
//! **formlogic** decides which fields of a conversational form are visible, based on
//! the answers given so far, and keeps track of how fields reference each other so
//! that broken or circular rules are caught before a form is saved.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the form**: Build a list of `FieldConfig`s, or load a `FormConfig`
//!     from JSON, or implement `IntoForm` for your own stored format.
//! 2.  **Evaluate**: Hand the fields and a snapshot of `FieldValues` to a
//!     `ConditionalEvaluator`. Each field gets a `VisibilityResult` with reasons for
//!     the conditions that failed.
//! 3.  **Edit**: While the form is edited, keep a `DependencyManager` in step with
//!     `add_field`/`update_field`/`remove_field` and run `validate` or `check_field`
//!     before persisting a rule.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formlogic::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let fields = vec![
//!         FieldConfig::new("has_license", FieldType::Checkbox, "Has Driver License"),
//!         FieldConfig::new("license_number", FieldType::Text, "License Number")
//!             .with_conditional(ConditionalLogic::show_when(
//!                 LogicOperator::And,
//!                 vec![Condition::new("has_license", Operator::Equals, true)],
//!             )),
//!     ];
//!
//!     let evaluator = ConditionalEvaluator::default();
//!     let mut values = FieldValues::new();
//!     values.insert("has_license".to_string(), FieldValue::Bool(true));
//!
//!     let results = evaluator.evaluate_all_fields(&fields, &values);
//!     println!("license_number visible: {}", results["license_number"].visible);
//!
//!     let manager = DependencyManager::new(fields);
//!     let validation = manager.validate();
//!     if !validation.is_valid {
//!         for error in &validation.errors {
//!             eprintln!("{}", error);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod evaluator;
pub mod field;
pub mod form;
pub mod graph;
pub mod prelude;
pub mod trace;
