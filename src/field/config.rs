use super::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of input a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Url,
    Number,
    Date,
    Time,
    Checkbox,
    Radio,
    Select,
    Multiselect,
    Rating,
    File,
    Section,
    Statement,
}

/// One form field's definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Visibility rule. `None` means the field is always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<ConditionalLogic>,
}

impl FieldConfig {
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            placeholder: None,
            required: false,
            options: None,
            conditional: None,
        }
    }

    pub fn with_conditional(mut self, conditional: ConditionalLogic) -> Self {
        self.conditional = Some(conditional);
        self
    }

    /// The conditions that actually take effect. Empty when there is no rule.
    pub fn conditions(&self) -> &[Condition] {
        self.conditional
            .as_ref()
            .map(|c| c.conditions.as_slice())
            .unwrap_or_default()
    }
}

/// A field's visibility rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalLogic {
    /// `true` reveals the field when the conditions hold, `false` hides it.
    pub show: bool,
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic: LogicOperator,
}

impl ConditionalLogic {
    pub fn show_when(logic: LogicOperator, conditions: Vec<Condition>) -> Self {
        Self {
            show: true,
            conditions,
            logic,
        }
    }

    pub fn hide_when(logic: LogicOperator, conditions: Vec<Condition>) -> Self {
        Self {
            show: false,
            conditions,
            logic,
        }
    }
}

/// One comparison against another field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field_id: String,
    pub operator: Operator,
    pub value: FieldValue,
}

impl Condition {
    pub fn new(field_id: impl Into<String>, operator: Operator, value: impl Into<FieldValue>) -> Self {
        Self {
            field_id: field_id.into(),
            operator,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
        };
        write!(f, "{}", name)
    }
}

/// How the conditions of one rule are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}
