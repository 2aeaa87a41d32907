use super::{DependencyGraph, GraphNode, collect_dependencies};
use crate::error::DependencyError;
use crate::evaluator::{ConditionalEvaluator, ValidationResult};
use crate::field::FieldConfig;
use ahash::AHashSet;
use serde::Serialize;

/// What a mutation did to the dependency edges of one field.
///
/// Dependency lists are sorted so changes compare and print deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DependencyChange {
    #[serde(rename_all = "camelCase")]
    Add {
        field_id: String,
        new_dependencies: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Remove {
        field_id: String,
        old_dependencies: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Update {
        field_id: String,
        old_dependencies: Vec<String>,
        new_dependencies: Vec<String>,
    },
}

impl DependencyChange {
    pub fn field_id(&self) -> &str {
        match self {
            DependencyChange::Add { field_id, .. }
            | DependencyChange::Remove { field_id, .. }
            | DependencyChange::Update { field_id, .. } => field_id,
        }
    }
}

fn sorted(ids: &AHashSet<String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.iter().cloned().collect();
    ids.sort();
    ids
}

/// Keeps the dependency graph of one form in step with edits made in the builder.
///
/// Mutations check their preconditions before touching anything, so a rejected call
/// leaves both the field list and the graph as they were. The manager holds no locks;
/// callers sharing one between sessions must serialize mutations themselves.
pub struct DependencyManager {
    fields: Vec<FieldConfig>,
    graph: DependencyGraph,
    evaluator: ConditionalEvaluator,
}

impl DependencyManager {
    pub fn new(fields: Vec<FieldConfig>) -> Self {
        let graph = DependencyGraph::build(&fields);
        tracing::debug!(fields = fields.len(), "built dependency graph");
        Self {
            fields,
            graph,
            evaluator: ConditionalEvaluator::default(),
        }
    }

    pub fn get_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// The current fields, in form order.
    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn get_field(&self, field_id: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn add_field(&mut self, field: FieldConfig) -> Result<DependencyChange, DependencyError> {
        if self.graph.contains(&field.id) {
            tracing::warn!(field_id = %field.id, "rejected add of an existing field");
            return Err(DependencyError::FieldAlreadyExists {
                field_id: field.id.clone(),
            });
        }

        let field_id = field.id.clone();
        let dependencies = collect_dependencies(&field);

        // Fields already pointing at this id become its dependents now that it exists.
        let mut dependents: AHashSet<String> = self
            .graph
            .nodes
            .iter()
            .filter(|(_, node)| node.dependencies.contains(&field_id))
            .map(|(id, _)| id.clone())
            .collect();
        if dependencies.contains(&field_id) {
            dependents.insert(field_id.clone());
        }

        self.graph.nodes.insert(
            field_id.clone(),
            GraphNode {
                dependencies: dependencies.clone(),
                dependents,
                level: None,
            },
        );
        for dep in &dependencies {
            self.graph.link(dep, field_id.clone());
        }
        self.fields.push(field);
        self.refresh_levels_from(&field_id);

        tracing::debug!(field_id = %field_id, dependencies = dependencies.len(), "added field");
        Ok(DependencyChange::Add {
            field_id,
            new_dependencies: sorted(&dependencies),
        })
    }

    /// Removes a field. Fields that referenced it keep the now-dangling reference;
    /// `validate` reports those.
    pub fn remove_field(&mut self, field_id: &str) -> Result<DependencyChange, DependencyError> {
        let Some(node) = self.graph.nodes.remove(field_id) else {
            tracing::warn!(field_id, "rejected removal of an unknown field");
            return Err(DependencyError::FieldNotFound {
                field_id: field_id.to_string(),
            });
        };

        for dep in &node.dependencies {
            self.graph.unlink(dep, field_id);
        }
        self.fields.retain(|f| f.id != field_id);

        let mut scope: AHashSet<String> = AHashSet::new();
        for dependent in node.dependents.iter().filter(|d| d.as_str() != field_id) {
            scope.extend(self.graph.descendants(dependent));
            scope.insert(dependent.clone());
        }
        self.graph.assign_levels(scope);

        tracing::debug!(field_id, orphaned = node.dependents.len(), "removed field");
        Ok(DependencyChange::Remove {
            field_id: field_id.to_string(),
            old_dependencies: sorted(&node.dependencies),
        })
    }

    /// Replaces a field's definition and rewires the edges its conditions changed.
    pub fn update_field(&mut self, field: FieldConfig) -> Result<DependencyChange, DependencyError> {
        let Some(position) = self.fields.iter().position(|f| f.id == field.id) else {
            tracing::warn!(field_id = %field.id, "rejected update of an unknown field");
            return Err(DependencyError::FieldNotFound {
                field_id: field.id.clone(),
            });
        };
        let field_id = field.id.clone();
        let old_dependencies = self
            .graph
            .node(&field_id)
            .map(|node| node.dependencies.clone())
            .unwrap_or_default();
        let new_dependencies = collect_dependencies(&field);

        for dropped in old_dependencies.difference(&new_dependencies) {
            self.graph.unlink(dropped, &field_id);
        }
        for added in new_dependencies.difference(&old_dependencies) {
            self.graph.link(added, field_id.clone());
        }
        let node = self.graph.nodes.entry(field_id.clone()).or_default();
        node.dependencies = new_dependencies.clone();

        self.fields[position] = field;
        self.refresh_levels_from(&field_id);

        tracing::debug!(field_id = %field_id, "updated field");
        Ok(DependencyChange::Update {
            field_id,
            old_dependencies: sorted(&old_dependencies),
            new_dependencies: sorted(&new_dependencies),
        })
    }

    fn refresh_levels_from(&mut self, field_id: &str) {
        let mut scope = self.graph.descendants(field_id);
        scope.insert(field_id.to_string());
        self.graph.assign_levels(scope);
    }

    /// Resolves ids back to fields, keeping form order.
    fn resolve<'a>(&'a self, ids: &AHashSet<String>) -> Vec<&'a FieldConfig> {
        self.fields.iter().filter(|f| ids.contains(&f.id)).collect()
    }

    fn select(&self, predicate: impl Fn(&GraphNode) -> bool) -> Vec<&FieldConfig> {
        self.fields
            .iter()
            .filter(|f| self.graph.node(&f.id).is_some_and(&predicate))
            .collect()
    }

    /// Every field other than `field_id`, i.e. what a new condition may reference.
    /// Forward references are offered too; cycles are caught by validation.
    pub fn get_available_references(&self, field_id: &str) -> Vec<&FieldConfig> {
        self.fields.iter().filter(|f| f.id != field_id).collect()
    }

    pub fn get_dependent_fields(&self, field_id: &str) -> Vec<&FieldConfig> {
        match self.graph.node(field_id) {
            Some(node) => self.resolve(&node.dependents),
            None => Vec::new(),
        }
    }

    pub fn get_dependency_fields(&self, field_id: &str) -> Vec<&FieldConfig> {
        match self.graph.node(field_id) {
            Some(node) => self.resolve(&node.dependencies),
            None => Vec::new(),
        }
    }

    /// Transitive dependencies of a field.
    pub fn get_all_dependencies(&self, field_id: &str) -> Vec<&FieldConfig> {
        self.resolve(&self.graph.ancestors(field_id))
    }

    /// Transitive dependents of a field.
    pub fn get_all_dependents(&self, field_id: &str) -> Vec<&FieldConfig> {
        self.resolve(&self.graph.descendants(field_id))
    }

    pub fn get_root_fields(&self) -> Vec<&FieldConfig> {
        self.select(|node| node.dependencies.is_empty())
    }

    pub fn get_leaf_fields(&self) -> Vec<&FieldConfig> {
        self.select(|node| node.dependents.is_empty())
    }

    pub fn get_fields_at_level(&self, level: u32) -> Vec<&FieldConfig> {
        self.select(|node| node.level == Some(level))
    }

    /// Fields whose level is undefined because they sit on or below a cycle.
    pub fn get_circular_fields(&self) -> Vec<&FieldConfig> {
        self.select(|node| node.level.is_none())
    }

    pub fn get_evaluation_order(&self) -> Vec<String> {
        self.evaluator.get_field_evaluation_order(&self.fields)
    }

    /// Validates every field's conditional logic. Errors are prefixed with the
    /// owning field's label and id.
    pub fn validate(&self) -> ValidationResult {
        let errors = self
            .fields
            .iter()
            .flat_map(|field| {
                self.evaluator
                    .validate_conditional_logic(field, &self.fields)
                    .errors
                    .into_iter()
                    .map(move |error| format!("{} ({}): {}", field.label, field.id, error))
            })
            .collect();
        ValidationResult::from_errors(errors)
    }

    /// Validates a new or edited field against the current fields without applying it.
    pub fn check_field(&self, field: &FieldConfig) -> ValidationResult {
        let mut candidates = self.fields.clone();
        match candidates.iter_mut().find(|f| f.id == field.id) {
            Some(existing) => *existing = field.clone(),
            None => candidates.push(field.clone()),
        }
        self.evaluator.validate_conditional_logic(field, &candidates)
    }
}
