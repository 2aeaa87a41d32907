use super::EvaluationContext;
use crate::field::{Condition, FieldValue, Operator};
use crate::trace::ConditionTrace;

/// Evaluates single conditions against one snapshot of field values.
pub(super) struct ConditionEngine<'a> {
    context: &'a EvaluationContext<'a>,
}

impl<'a> ConditionEngine<'a> {
    pub(super) fn new(context: &'a EvaluationContext<'a>) -> Self {
        Self { context }
    }

    pub(super) fn evaluate(&self, condition: &Condition) -> ConditionTrace {
        let field_id = condition.field_id.clone();
        let actual = match self.context.value_of(&condition.field_id) {
            Some(value) => value,
            None => {
                return ConditionTrace::Missing {
                    label: self.context.label_of(&field_id).to_string(),
                    field_id,
                };
            }
        };

        let met = Self::apply(condition.operator, actual, &condition.value);
        tracing::trace!(
            field_id = %field_id,
            operator = %condition.operator,
            met,
            "evaluated condition"
        );

        if met {
            ConditionTrace::Met { field_id }
        } else {
            ConditionTrace::Mismatch {
                label: self.context.label_of(&field_id).to_string(),
                field_id,
                operator: condition.operator,
                expected: condition.value.clone(),
                actual: actual.clone(),
            }
        }
    }

    fn apply(operator: Operator, actual: &FieldValue, expected: &FieldValue) -> bool {
        match operator {
            Operator::Equals => actual == expected,
            Operator::NotEquals => actual != expected,
            Operator::Contains => Self::contains(actual, expected),
            Operator::GreaterThan => Self::compare_numbers(actual, expected, |a, b| a > b),
            Operator::LessThan => Self::compare_numbers(actual, expected, |a, b| a < b),
        }
    }

    fn contains(actual: &FieldValue, expected: &FieldValue) -> bool {
        match actual {
            FieldValue::List(items) => items.contains(expected),
            FieldValue::Text(text) => match expected {
                FieldValue::List(_) | FieldValue::Null => false,
                scalar => text.contains(&scalar.to_string()),
            },
            _ => false,
        }
    }

    fn compare_numbers(actual: &FieldValue, expected: &FieldValue, op: fn(f64, f64) -> bool) -> bool {
        match (actual.as_number(), expected.as_number()) {
            (Some(a), Some(b)) => op(a, b),
            _ => false,
        }
    }
}
