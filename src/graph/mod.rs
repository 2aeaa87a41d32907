//! Field dependency graph.
//!
//! A field depends on every field its conditional logic references. Nodes live in a
//! single id-keyed map and edges are stored as id sets in both directions
//! (`dependencies` and the inverse `dependents`), so lookups always go through the map.
//!
//! Levels are the longest distance from a root plus one. Self-references and
//! references to fields that are not in the graph do not contribute to levels; they
//! are surfaced by validation instead. Nodes on a cycle, or downstream of one, have
//! no level.

mod manager;

pub use manager::{DependencyChange, DependencyManager};

use crate::field::FieldConfig;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::collections::VecDeque;

/// One field's position in the dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Ids referenced by this field's conditions.
    pub dependencies: AHashSet<String>,
    /// Ids of fields whose conditions reference this field.
    pub dependents: AHashSet<String>,
    /// `None` while the node sits on or below a cycle.
    pub level: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    pub nodes: AHashMap<String, GraphNode>,
}

/// The set of field ids referenced by a field's conditional logic.
pub fn collect_dependencies(field: &FieldConfig) -> AHashSet<String> {
    field
        .conditions()
        .iter()
        .map(|c| c.field_id.clone())
        .collect()
}

impl DependencyGraph {
    /// Builds the full graph for a field list and assigns every level.
    ///
    /// When an id appears more than once, the first occurrence defines the node.
    pub fn build(fields: &[FieldConfig]) -> Self {
        let mut graph = Self::default();
        for field in fields {
            graph
                .nodes
                .entry(field.id.clone())
                .or_insert_with(|| GraphNode {
                    dependencies: collect_dependencies(field),
                    ..GraphNode::default()
                });
        }

        let edges: Vec<(String, String)> = graph
            .nodes
            .iter()
            .flat_map(|(id, node)| {
                node.dependencies
                    .iter()
                    .map(move |dep| (dep.clone(), id.clone()))
            })
            .collect();
        for (dependency, dependent) in edges {
            graph.link(&dependency, dependent);
        }

        let all: Vec<String> = graph.nodes.keys().cloned().collect();
        graph.assign_levels(all);
        graph
    }

    pub fn node(&self, field_id: &str) -> Option<&GraphNode> {
        self.nodes.get(field_id)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.nodes.contains_key(field_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every id reachable by following `dependents` edges, excluding the start.
    pub fn descendants(&self, field_id: &str) -> AHashSet<String> {
        self.walk(field_id, |node| &node.dependents)
    }

    /// Every id reachable by following `dependencies` edges, excluding the start.
    /// Ids that are not nodes of the graph are skipped.
    pub fn ancestors(&self, field_id: &str) -> AHashSet<String> {
        self.walk(field_id, |node| &node.dependencies)
    }

    fn walk(&self, start: &str, edges: impl Fn(&GraphNode) -> &AHashSet<String>) -> AHashSet<String> {
        let mut visited = AHashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([start]);

        while let Some(id) = queue.pop_front() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            for next in edges(node) {
                if next != start && self.nodes.contains_key(next) && visited.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Registers `dependent` on `dependency`'s node, if that node exists.
    pub(crate) fn link(&mut self, dependency: &str, dependent: String) {
        if let Some(node) = self.nodes.get_mut(dependency) {
            node.dependents.insert(dependent);
        }
    }

    pub(crate) fn unlink(&mut self, dependency: &str, dependent: &str) {
        if let Some(node) = self.nodes.get_mut(dependency) {
            node.dependents.remove(dependent);
        }
    }

    /// Dependencies that take part in ordering: existing nodes other than the field itself.
    fn resolvable_dependencies<'a>(&'a self, field_id: &'a str) -> impl Iterator<Item = &'a String> {
        self.nodes
            .get(field_id)
            .into_iter()
            .flat_map(|node| node.dependencies.iter())
            .filter(move |dep| dep.as_str() != field_id && self.nodes.contains_key(dep.as_str()))
    }

    /// Recomputes levels for every node in `scope`.
    ///
    /// The scope must be closed under `dependents`; nodes outside it keep their
    /// current level and are read as fixed inputs.
    pub(crate) fn assign_levels(&mut self, scope: impl IntoIterator<Item = String>) {
        let scope: AHashSet<String> = scope
            .into_iter()
            .filter(|id| self.nodes.contains_key(id))
            .collect();

        let mut pending: AHashMap<String, usize> = AHashMap::with_capacity(scope.len());
        let mut ready = VecDeque::new();
        for id in &scope {
            let in_scope = self
                .resolvable_dependencies(id)
                .filter(|dep| scope.contains(*dep))
                .count();
            pending.insert(id.clone(), in_scope);
            if in_scope == 0 {
                ready.push_back(id.clone());
            }
        }
        for id in &scope {
            if let Some(node) = self.nodes.get_mut(id) {
                node.level = None;
            }
        }

        // Kahn's algorithm restricted to the scope
        while let Some(id) = ready.pop_front() {
            let level = self.level_from_dependencies(&id);
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            node.level = level;
            let dependents: Vec<String> = node
                .dependents
                .iter()
                .filter(|d| **d != id)
                .cloned()
                .collect();

            for dependent in dependents {
                if let Some(count) = pending.get_mut(&dependent) {
                    if *count > 0 {
                        *count -= 1;
                        if *count == 0 {
                            ready.push_back(dependent);
                        }
                    }
                }
            }
        }

        let unresolved = scope
            .iter()
            .filter(|id| self.nodes.get(id.as_str()).is_some_and(|n| n.level.is_none()))
            .count();
        if unresolved > 0 {
            tracing::debug!(unresolved, "fields left without a level due to circular dependencies");
        }
    }

    fn level_from_dependencies(&self, field_id: &str) -> Option<u32> {
        let mut level = 1;
        for dep in self.resolvable_dependencies(field_id) {
            let dep_level = self.nodes.get(dep.as_str())?.level?;
            level = level.max(dep_level + 1);
        }
        Some(level)
    }
}
