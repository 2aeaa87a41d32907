mod formatter;

pub use formatter::ReasonFormatter;

use crate::field::{FieldValue, Operator};

/// A record of how a single condition was evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionTrace {
    Met {
        field_id: String,
    },
    /// The referenced field had no value, so the condition could not hold.
    Missing {
        field_id: String,
        label: String,
    },
    /// A value was present but did not satisfy the operator.
    Mismatch {
        field_id: String,
        label: String,
        operator: Operator,
        expected: FieldValue,
        actual: FieldValue,
    },
}

impl ConditionTrace {
    pub fn is_met(&self) -> bool {
        matches!(self, ConditionTrace::Met { .. })
    }

    pub fn field_id(&self) -> &str {
        match self {
            ConditionTrace::Met { field_id }
            | ConditionTrace::Missing { field_id, .. }
            | ConditionTrace::Mismatch { field_id, .. } => field_id,
        }
    }
}
