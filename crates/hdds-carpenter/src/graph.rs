// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Carpenter build graph.
//!
//! Holds the schema nodes that must be fabricated together with the
//! dependency edges between them. Both edge directions live in one
//! structure and are only mutated through [`BuildGraph::add_dependency`]
//! and [`BuildGraph::remove`], which keep `dependencies` and `depends_on`
//! mutual inverses.
//!
//! ```text
//!   dependencies:  A -> {I, III}      III -> {I}
//!   depends_on:    I -> {A, III}      III -> {A}
//! ```

use crate::schema::TypeSchema;
use std::collections::{BTreeMap, BTreeSet};

/// Whether a schema name resolves against the local registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// A compatible local type exists and is reused.
    Known,
    /// No compatible local type; must be fabricated.
    Unknown,
}

/// One candidate for fabrication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    schema: TypeSchema,
    interfaces: Vec<String>,
    provenance: Provenance,
}

impl SchemaNode {
    /// Create a node; `interfaces` is the flattened interface set.
    pub fn new(schema: TypeSchema, interfaces: Vec<String>, provenance: Provenance) -> Self {
        Self {
            schema,
            interfaces,
            provenance,
        }
    }

    /// Wire type name.
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Wire schema of the type (fields in constructor order).
    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    /// Flattened interface set.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Known or unknown to the local registry.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// Unknown schema nodes plus their unresolved dependency edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildGraph {
    nodes: BTreeMap<String, SchemaNode>,
    dependencies: BTreeMap<String, BTreeSet<String>>,
    depends_on: BTreeMap<String, BTreeSet<String>>,
    known: BTreeSet<String>,
}

impl BuildGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Replaces nothing: an existing node of that name is kept
    /// and `false` is returned.
    pub fn insert(&mut self, node: SchemaNode) -> bool {
        if self.nodes.contains_key(node.name()) {
            return false;
        }
        self.dependencies.entry(node.name().to_string()).or_default();
        self.nodes.insert(node.name().to_string(), node);
        true
    }

    /// Record that `dependent` cannot be built before `dependency`.
    ///
    /// `dependency` need not be a node of this graph; such dangling edges
    /// keep the dependent blocked forever.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) {
        if dependent == dependency || !self.nodes.contains_key(dependent) {
            return;
        }
        self.dependencies
            .entry(dependent.to_string())
            .or_default()
            .insert(dependency.to_string());
        self.depends_on
            .entry(dependency.to_string())
            .or_default()
            .insert(dependent.to_string());
    }

    /// Remove a resolved node and every edge that mentions it.
    pub fn remove(&mut self, name: &str) -> Option<SchemaNode> {
        let node = self.nodes.remove(name)?;
        for dependency in self.dependencies.remove(name).unwrap_or_default() {
            if let Some(dependents) = self.depends_on.get_mut(&dependency) {
                dependents.remove(name);
                if dependents.is_empty() {
                    self.depends_on.remove(&dependency);
                }
            }
        }
        for dependent in self.depends_on.remove(name).unwrap_or_default() {
            if let Some(deps) = self.dependencies.get_mut(&dependent) {
                deps.remove(name);
            }
        }
        Some(node)
    }

    /// Get a node by name.
    pub fn node(&self, name: &str) -> Option<&SchemaNode> {
        self.nodes.get(name)
    }

    /// Node names in order.
    pub fn names(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Unresolved dependencies of a node.
    pub fn dependencies_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(name)
    }

    /// Nodes waiting on `name`.
    pub fn dependents_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.depends_on.get(name)
    }

    /// Full forward adjacency: node -> unresolved dependencies.
    pub fn dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.dependencies
    }

    /// Full reverse adjacency: name -> nodes depending on it.
    pub fn depends_on(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.depends_on
    }

    /// Nodes with no outstanding dependency, in name order.
    pub fn ready(&self) -> Vec<String> {
        self.dependencies
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Dependency names that have no node in this graph.
    pub fn missing(&self) -> BTreeSet<String> {
        self.depends_on
            .keys()
            .filter(|name| !self.nodes.contains_key(*name))
            .cloned()
            .collect()
    }

    /// Schema names that resolved locally during extraction.
    pub fn known(&self) -> &BTreeSet<String> {
        &self.known
    }

    pub(crate) fn set_known(&mut self, known: BTreeSet<String>) {
        self.known = known;
    }

    /// Number of nodes still to fabricate.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when no node, edge or reverse edge remains.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.dependencies.is_empty() && self.depends_on.is_empty()
    }
}
