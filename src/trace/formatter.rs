use super::ConditionTrace;
use crate::field::Operator;

/// Turns condition traces into the reason strings shown next to hidden fields.
pub struct ReasonFormatter;

impl ReasonFormatter {
    /// Explain why a condition failed. Met conditions have nothing to explain.
    pub fn format_trace(trace: &ConditionTrace) -> Option<String> {
        match trace {
            ConditionTrace::Met { .. } => None,
            ConditionTrace::Missing { label, .. } => Some(format!("{} has no value", label)),
            ConditionTrace::Mismatch {
                label,
                operator,
                expected,
                ..
            } => {
                let phrase = match operator {
                    Operator::Equals => "is not",
                    Operator::NotEquals => "is",
                    Operator::Contains => "does not contain",
                    Operator::GreaterThan => "is not greater than",
                    Operator::LessThan => "is not less than",
                };
                Some(format!("{} {} \"{}\"", label, phrase, expected))
            }
        }
    }

    /// Reasons for every failed trace, in condition order.
    pub fn format_failures<'a>(traces: impl IntoIterator<Item = &'a ConditionTrace>) -> Vec<String> {
        traces.into_iter().filter_map(Self::format_trace).collect()
    }
}
