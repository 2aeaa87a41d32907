use crate::field::{FieldConfig, FieldValue, FieldValues, LogicOperator};
use crate::graph::collect_dependencies;
use crate::trace::{ConditionTrace, ReasonFormatter};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

mod engine;

use engine::ConditionEngine;

pub const SELF_REFERENCE_ERROR: &str = "Field cannot reference itself in conditional logic";
pub const CIRCULAR_DEPENDENCY_ERROR: &str = "Circular dependency detected in conditional logic";

/// The outcome of evaluating one field's visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibilityResult {
    pub visible: bool,
    /// Human-readable explanations for the conditions that failed.
    pub reasons: Vec<String>,
}

impl VisibilityResult {
    pub fn visible() -> Self {
        Self {
            visible: true,
            reasons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Everything a visibility check may look at: the current answers and the field list
/// used to resolve labels.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub field_values: &'a FieldValues,
    pub fields: &'a [FieldConfig],
}

impl<'a> EvaluationContext<'a> {
    pub fn new(field_values: &'a FieldValues, fields: &'a [FieldConfig]) -> Self {
        Self {
            field_values,
            fields,
        }
    }

    /// The value of a field, treating `Null` the same as a missing key.
    pub fn value_of(&self, field_id: &str) -> Option<&'a FieldValue> {
        self.field_values.get(field_id).filter(|v| v.is_present())
    }

    /// The label of a field, or its raw id when the field is unknown.
    pub fn label_of<'b>(&self, field_id: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.fields
            .iter()
            .find(|f| f.id == field_id)
            .map(|f| f.label.as_str())
            .unwrap_or(field_id)
    }
}

/// When failed-condition reasons are copied into a `VisibilityResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReasonPolicy {
    /// Only when the conditions were not met and the field ends up hidden.
    #[default]
    WhenHidden,
    /// For every failed condition, whatever the final visibility.
    Always,
}

pub struct EvaluatorBuilder {
    reason_policy: ReasonPolicy,
}

impl EvaluatorBuilder {
    pub fn new() -> Self {
        Self {
            reason_policy: ReasonPolicy::default(),
        }
    }

    pub fn with_reason_policy(mut self, policy: ReasonPolicy) -> Self {
        self.reason_policy = policy;
        self
    }

    pub fn build(self) -> ConditionalEvaluator {
        ConditionalEvaluator {
            reason_policy: self.reason_policy,
        }
    }
}

impl Default for EvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluates conditional visibility rules and checks them for graph errors.
///
/// The evaluator holds configuration only. Every call works on the inputs it is given
/// and returns the same output for the same input, so one instance can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalEvaluator {
    reason_policy: ReasonPolicy,
}

impl ConditionalEvaluator {
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    pub fn reason_policy(&self) -> ReasonPolicy {
        self.reason_policy
    }

    /// Decides whether `field` is visible for the values in `context`.
    ///
    /// Every condition is evaluated (no short-circuiting) so that each failure can be
    /// explained. A referenced field without a value never satisfies its condition.
    /// Malformed rules, such as ones referencing unknown fields, are evaluated rather
    /// than rejected.
    pub fn evaluate_field_visibility(
        &self,
        field: &FieldConfig,
        context: &EvaluationContext<'_>,
    ) -> VisibilityResult {
        let Some(conditional) = field
            .conditional
            .as_ref()
            .filter(|c| !c.conditions.is_empty())
        else {
            return VisibilityResult::visible();
        };

        let engine = ConditionEngine::new(context);
        let traces: Vec<ConditionTrace> = conditional
            .conditions
            .iter()
            .map(|condition| engine.evaluate(condition))
            .collect();

        let conditions_met = match conditional.logic {
            LogicOperator::And => traces.iter().all(ConditionTrace::is_met),
            LogicOperator::Or => traces.iter().any(ConditionTrace::is_met),
        };
        let visible = if conditional.show {
            conditions_met
        } else {
            !conditions_met
        };

        let reasons = match self.reason_policy {
            ReasonPolicy::WhenHidden if conditions_met || visible => Vec::new(),
            ReasonPolicy::WhenHidden | ReasonPolicy::Always => {
                ReasonFormatter::format_failures(&traces)
            }
        };

        tracing::debug!(field_id = %field.id, visible, conditions_met, "evaluated field visibility");
        VisibilityResult { visible, reasons }
    }

    /// Evaluates every field, in dependency order, against one snapshot of values.
    pub fn evaluate_all_fields(
        &self,
        fields: &[FieldConfig],
        field_values: &FieldValues,
    ) -> AHashMap<String, VisibilityResult> {
        let context = EvaluationContext::new(field_values, fields);
        let by_id: AHashMap<&str, &FieldConfig> = fields
            .iter()
            .rev()
            .map(|f| (f.id.as_str(), f))
            .collect();

        self.get_field_evaluation_order(fields)
            .into_iter()
            .filter_map(|id| {
                let field = by_id.get(id.as_str())?;
                let result = self.evaluate_field_visibility(field, &context);
                Some((id, result))
            })
            .collect()
    }

    /// Checks a field's rule for self-references, unknown references, and cycles.
    ///
    /// All checks run and their errors accumulate. A self-reference is reported only as
    /// such; the cycle check looks for loops through other fields.
    pub fn validate_conditional_logic(
        &self,
        field: &FieldConfig,
        all_fields: &[FieldConfig],
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let conditions = field.conditions();

        if conditions.iter().any(|c| c.field_id == field.id) {
            errors.push(SELF_REFERENCE_ERROR.to_string());
        }

        let known: AHashSet<&str> = all_fields.iter().map(|f| f.id.as_str()).collect();
        for missing in conditions
            .iter()
            .map(|c| c.field_id.as_str())
            .filter(|id| *id != field.id && !known.contains(id))
            .unique()
        {
            errors.push(format!("Referenced field \"{}\" does not exist", missing));
        }

        if Self::has_circular_dependency(field, all_fields) {
            errors.push(CIRCULAR_DEPENDENCY_ERROR.to_string());
        }

        ValidationResult::from_errors(errors)
    }

    /// Walks dependency edges from the field's direct dependencies and reports
    /// whether the walk comes back to the field.
    fn has_circular_dependency(field: &FieldConfig, all_fields: &[FieldConfig]) -> bool {
        let mut edges: AHashMap<&str, Vec<&str>> = AHashMap::with_capacity(all_fields.len());
        for f in all_fields.iter().filter(|f| f.id != field.id) {
            edges
                .entry(f.id.as_str())
                .or_insert_with(|| f.conditions().iter().map(|c| c.field_id.as_str()).collect());
        }

        let mut stack: Vec<&str> = field
            .conditions()
            .iter()
            .map(|c| c.field_id.as_str())
            .filter(|id| *id != field.id)
            .collect();
        let mut visited: AHashSet<&str> = AHashSet::new();

        while let Some(id) = stack.pop() {
            if id == field.id {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(deps) = edges.get(id) {
                stack.extend(deps.iter().copied());
            }
        }
        false
    }

    /// Orders field ids so that every field follows the fields it depends on.
    ///
    /// Independent fields keep their input order. Self-references and unknown ids are
    /// ignored. Fields caught in a cycle cannot be placed and are appended at the end
    /// in input order.
    pub fn get_field_evaluation_order(&self, fields: &[FieldConfig]) -> Vec<String> {
        let mut index: AHashMap<&str, usize> = AHashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            index.entry(field.id.as_str()).or_insert(i);
        }

        let mut pending = vec![0usize; fields.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); fields.len()];
        for (i, field) in fields.iter().enumerate() {
            let deps: AHashSet<usize> = collect_dependencies(field)
                .iter()
                .filter_map(|id| index.get(id.as_str()).copied())
                .filter(|&dep| dep != i)
                .collect();
            pending[i] = deps.len();
            for dep in deps {
                dependents[dep].push(i);
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = pending
            .iter()
            .positions(|&count| count == 0)
            .map(Reverse)
            .collect();
        let mut placed = vec![false; fields.len()];
        let mut order = Vec::with_capacity(fields.len());

        while let Some(Reverse(i)) = ready.pop() {
            placed[i] = true;
            order.push(fields[i].id.clone());
            for &dependent in &dependents[i] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() < fields.len() {
            let cyclic: Vec<String> = fields
                .iter()
                .zip(&placed)
                .filter(|(_, placed)| !**placed)
                .map(|(f, _)| f.id.clone())
                .collect();
            tracing::warn!(
                fields = %cyclic.iter().join(", "),
                "circular dependencies prevent ordering; appending in form order"
            );
            order.extend(cyclic);
        }
        order
    }
}
