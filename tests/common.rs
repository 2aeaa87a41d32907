//! Common test utilities for building field lists and value snapshots.
use formlogic::prelude::*;

/// Shorthand for a field without conditional logic.
#[allow(dead_code)]
pub fn field(id: &str, field_type: FieldType, label: &str) -> FieldConfig {
    FieldConfig::new(id, field_type, label)
}

/// A text field shown when all `conditions` hold.
#[allow(dead_code)]
pub fn conditional_field(id: &str, label: &str, conditions: Vec<Condition>) -> FieldConfig {
    field(id, FieldType::Text, label)
        .with_conditional(ConditionalLogic::show_when(LogicOperator::And, conditions))
}

/// A text field shown when `referenced == "test"`.
#[allow(dead_code)]
pub fn referencing(id: &str, referenced: &str) -> FieldConfig {
    conditional_field(
        id,
        id,
        vec![Condition::new(referenced, Operator::Equals, "test")],
    )
}

/// Builds a value snapshot from `(field_id, value)` pairs.
#[allow(dead_code)]
pub fn values<const N: usize>(pairs: [(&str, FieldValue); N]) -> FieldValues {
    pairs
        .into_iter()
        .map(|(id, value)| (id.to_string(), value))
        .collect()
}

/// The driver-license form.
///
/// `license_number` is shown when `has_license == true`; `vehicle_type` is shown when
/// `has_license == true AND age > 18`.
#[allow(dead_code)]
pub fn license_fields() -> Vec<FieldConfig> {
    vec![
        field("name", FieldType::Text, "Full Name"),
        field("age", FieldType::Number, "Age"),
        field("has_license", FieldType::Checkbox, "Has Driver License"),
        conditional_field(
            "license_number",
            "License Number",
            vec![Condition::new("has_license", Operator::Equals, true)],
        ),
        field("vehicle_type", FieldType::Select, "Vehicle Type").with_conditional(
            ConditionalLogic::show_when(
                LogicOperator::And,
                vec![
                    Condition::new("has_license", Operator::Equals, true),
                    Condition::new("age", Operator::GreaterThan, 18),
                ],
            ),
        ),
    ]
}

/// The license form as the builder would store it.
#[allow(dead_code)]
pub const LICENSE_FORM_JSON: &str = r#"{
    "id": "driver-survey",
    "title": "Driver Survey",
    "fields": [
        { "id": "name", "type": "text", "label": "Full Name", "required": true },
        { "id": "age", "type": "number", "label": "Age" },
        { "id": "has_license", "type": "checkbox", "label": "Has Driver License" },
        {
            "id": "license_number",
            "type": "text",
            "label": "License Number",
            "conditional": {
                "show": true,
                "logic": "and",
                "conditions": [{ "fieldId": "has_license", "operator": "equals", "value": true }]
            }
        },
        {
            "id": "vehicle_type",
            "type": "select",
            "label": "Vehicle Type",
            "options": ["Car", "Motorcycle", "Truck"],
            "conditional": {
                "show": true,
                "conditions": [
                    { "fieldId": "has_license", "operator": "equals", "value": true },
                    { "fieldId": "age", "operator": "greater_than", "value": 18 }
                ]
            }
        }
    ]
}"#;
