//! Tests for conditional-logic validation and evaluation ordering.
mod common;
use common::*;
use formlogic::evaluator::{CIRCULAR_DEPENDENCY_ERROR, SELF_REFERENCE_ERROR};
use formlogic::prelude::*;

fn position(order: &[String], id: &str) -> usize {
    order.iter().position(|f| f == id).unwrap()
}

#[test]
fn test_valid_field_passes() {
    let fields = license_fields();
    let result = ConditionalEvaluator::default().validate_conditional_logic(&fields[4], &fields);
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
}

#[test]
fn test_mutual_reference_is_circular() {
    let fields = vec![referencing("field1", "field2"), referencing("field2", "field1")];
    let result = ConditionalEvaluator::default().validate_conditional_logic(&fields[0], &fields);
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec![CIRCULAR_DEPENDENCY_ERROR]);
}

#[test]
fn test_long_cycle_is_detected() {
    let fields = vec![
        referencing("a", "c"),
        referencing("b", "a"),
        referencing("c", "b"),
    ];
    let evaluator = ConditionalEvaluator::default();
    for field in &fields {
        let result = evaluator.validate_conditional_logic(field, &fields);
        assert_eq!(result.errors, vec![CIRCULAR_DEPENDENCY_ERROR]);
    }
}

#[test]
fn test_cycle_elsewhere_is_not_reported_for_field_outside_it() {
    let fields = vec![
        referencing("a", "b"),
        referencing("b", "a"),
        referencing("c", "a"),
    ];
    let result = ConditionalEvaluator::default().validate_conditional_logic(&fields[2], &fields);
    assert!(result.is_valid);
}

#[test]
fn test_self_reference() {
    let fields = vec![referencing("loop", "loop")];
    let result = ConditionalEvaluator::default().validate_conditional_logic(&fields[0], &fields);
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec![SELF_REFERENCE_ERROR]);
}

#[test]
fn test_dangling_reference() {
    let fields = vec![referencing("a", "missing")];
    let result = ConditionalEvaluator::default().validate_conditional_logic(&fields[0], &fields);
    assert_eq!(result.errors, vec!["Referenced field \"missing\" does not exist"]);
}

#[test]
fn test_all_problems_reported_together() {
    let troubled = conditional_field(
        "a",
        "A",
        vec![
            Condition::new("a", Operator::Equals, "x"),
            Condition::new("ghost", Operator::Equals, "x"),
            Condition::new("ghost", Operator::NotEquals, "y"),
            Condition::new("b", Operator::Equals, "x"),
        ],
    );
    let fields = vec![troubled, referencing("b", "a")];
    let result = ConditionalEvaluator::default().validate_conditional_logic(&fields[0], &fields);

    assert!(!result.is_valid);
    assert_eq!(
        result.errors,
        vec![
            SELF_REFERENCE_ERROR.to_string(),
            "Referenced field \"ghost\" does not exist".to_string(),
            CIRCULAR_DEPENDENCY_ERROR.to_string(),
        ]
    );
}

#[test]
fn test_evaluation_order_puts_dependencies_first() {
    let fields = vec![
        referencing("summary", "details"),
        referencing("details", "intro"),
        field("intro", FieldType::Text, "Intro"),
        field("footer", FieldType::Text, "Footer"),
    ];
    let order = ConditionalEvaluator::default().get_field_evaluation_order(&fields);

    assert_eq!(order, vec!["intro", "details", "summary", "footer"]);
}

#[test]
fn test_evaluation_order_keeps_input_order_for_independent_fields() {
    let fields = license_fields();
    let order = ConditionalEvaluator::default().get_field_evaluation_order(&fields);
    assert_eq!(
        order,
        vec!["name", "age", "has_license", "license_number", "vehicle_type"]
    );
}

#[test]
fn test_evaluation_order_respects_every_dependency() {
    let fields = vec![
        conditional_field(
            "e",
            "E",
            vec![
                Condition::new("d", Operator::Equals, 1),
                Condition::new("a", Operator::Equals, 1),
            ],
        ),
        referencing("d", "c"),
        referencing("c", "b"),
        field("b", FieldType::Number, "B"),
        field("a", FieldType::Number, "A"),
    ];
    let order = ConditionalEvaluator::default().get_field_evaluation_order(&fields);

    assert_eq!(order.len(), fields.len());
    for field in &fields {
        for condition in field.conditions() {
            assert!(position(&order, &condition.field_id) < position(&order, &field.id));
        }
    }
}

#[test]
fn test_evaluation_order_terminates_on_cycles() {
    let fields = vec![
        referencing("x", "y"),
        field("root", FieldType::Text, "Root"),
        referencing("y", "x"),
        referencing("after", "root"),
        referencing("selfish", "selfish"),
    ];
    let order = ConditionalEvaluator::default().get_field_evaluation_order(&fields);

    assert_eq!(order, vec!["root", "after", "selfish", "x", "y"]);
}

#[test]
fn test_evaluation_order_ignores_unknown_references() {
    let fields = vec![referencing("a", "ghost"), field("b", FieldType::Text, "B")];
    let order = ConditionalEvaluator::default().get_field_evaluation_order(&fields);
    assert_eq!(order, vec!["a", "b"]);
}

#[test]
fn test_duplicate_ids_use_first_occurrence() {
    let fields = vec![
        referencing("x", "y"),
        field("y", FieldType::Text, "Y"),
        referencing("y", "x"),
    ];
    let evaluator = ConditionalEvaluator::default();

    assert!(evaluator.validate_conditional_logic(&fields[0], &fields).is_valid);

    let results = evaluator.evaluate_all_fields(&fields, &values([("y", FieldValue::from("test"))]));
    assert_eq!(results.len(), 2);
    assert!(results["y"].visible);
    assert!(results["x"].visible);
}
