// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema extractor: wire schema -> carpenter build graph.
//!
//! 1. Classify every wire type as known (a local type with the same shape
//!    and interfaces exists) or unknown. A known type that refers to an
//!    unknown one is itself unknown.
//! 2. Flatten the interface set of each unknown type over the "extends"
//!    relation.
//! 3. Record an edge for every interface or field reference from an
//!    unknown type to a name that does not resolve locally.

use crate::config::CarpenterConfig;
use crate::error::CarpenterError;
use crate::graph::{BuildGraph, Provenance, SchemaNode};
use crate::registry::{matches_schema, TypeResolver};
use crate::schema::{TypeSchema, WireSchema};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Known/unknown split of a wire schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Types reused from the local registry.
    pub known: BTreeSet<String>,
    /// Types that must be fabricated.
    pub unknown: BTreeSet<String>,
}

/// Builds a [`BuildGraph`] from a wire schema against a local registry.
pub struct SchemaExtractor<'a> {
    local: &'a dyn TypeResolver,
    strict: bool,
}

impl<'a> SchemaExtractor<'a> {
    /// Create an extractor resolving against `local`.
    pub fn new(local: &'a dyn TypeResolver) -> Self {
        Self {
            local,
            strict: true,
        }
    }

    /// Apply runtime configuration.
    pub fn with_config(mut self, config: &CarpenterConfig) -> Self {
        self.strict = config.strict_known_types;
        self
    }

    /// Split the wire schema into known and unknown type names.
    pub fn classify(&self, wire: &WireSchema) -> Result<Classification, CarpenterError> {
        let index = index_schema(wire)?;
        Ok(self.classify_index(&index))
    }

    /// Build the graph of unknown types.
    pub fn extract(&self, wire: &WireSchema) -> Result<BuildGraph, CarpenterError> {
        let index = index_schema(wire)?;
        let classification = self.classify_index(&index);

        let mut graph = BuildGraph::new();
        for name in &classification.unknown {
            let Some(schema) = index.get(name.as_str()) else {
                continue;
            };
            let interfaces = self.flatten_interfaces(schema, &index);
            graph.insert(SchemaNode::new(
                (*schema).clone(),
                interfaces,
                Provenance::Unknown,
            ));
        }

        for name in &classification.unknown {
            let Some(node) = graph.node(name) else {
                continue;
            };
            let unresolved: Vec<String> = references(node.schema(), node.interfaces())
                .into_iter()
                .filter(|reference| !self.resolves_locally(reference, &index, &classification))
                .map(str::to_string)
                .collect();
            for reference in unresolved {
                graph.add_dependency(name, &reference);
            }
        }

        let missing = graph.missing();
        if missing.is_empty() {
            log::info!(
                "[extract] {} wire types: {} known, {} to fabricate",
                index.len(),
                classification.known.len(),
                classification.unknown.len()
            );
        } else {
            log::info!(
                "[extract] {} wire types: {} known, {} to fabricate, missing [{}]",
                index.len(),
                classification.known.len(),
                classification.unknown.len(),
                missing.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        graph.set_known(classification.known);
        Ok(graph)
    }

    /// Per-type classification, then demotion of every known type that
    /// references a fabricated one, repeated until stable.
    fn classify_index(&self, index: &BTreeMap<&str, &TypeSchema>) -> Classification {
        let mut classification = Classification::default();
        for (name, schema) in index {
            if self.is_known(schema, index) {
                classification.known.insert((*name).to_string());
            } else {
                classification.unknown.insert((*name).to_string());
            }
        }

        loop {
            let demoted: Vec<String> = classification
                .known
                .iter()
                .filter(|name| {
                    index.get(name.as_str()).is_some_and(|schema| {
                        let interfaces = self.flatten_interfaces(schema, index);
                        references(schema, &interfaces)
                            .iter()
                            .any(|r| classification.unknown.contains(*r))
                    })
                })
                .cloned()
                .collect();
            if demoted.is_empty() {
                break;
            }
            for name in demoted {
                log::debug!("[extract] {} references a fabricated type; fabricating", name);
                classification.known.remove(&name);
                classification.unknown.insert(name);
            }
        }
        classification
    }

    fn is_known(&self, schema: &TypeSchema, index: &BTreeMap<&str, &TypeSchema>) -> bool {
        let Some(local) = self.local.resolve(&schema.name) else {
            return false;
        };
        if !self.strict {
            log::debug!("[extract] {} resolves locally", schema.name);
            return true;
        }

        let local_interfaces = local.interface_names();
        let conforms = self
            .flatten_interfaces(schema, index)
            .iter()
            .all(|i| local_interfaces.contains(&i.as_str()));
        if matches_schema(&local, schema) && conforms {
            log::debug!("[extract] {} resolves locally", schema.name);
            true
        } else {
            log::warn!(
                "[extract] local type {} does not match the wire shape; fabricating",
                schema.name
            );
            false
        }
    }

    /// A reference resolves locally if it is a known wire type, or is absent
    /// from the wire schema but present in the local registry.
    fn resolves_locally(
        &self,
        name: &str,
        index: &BTreeMap<&str, &TypeSchema>,
        classification: &Classification,
    ) -> bool {
        if index.contains_key(name) {
            classification.known.contains(name)
        } else {
            self.local.resolve(name).is_some()
        }
    }

    /// Declared interfaces first, then ancestors breadth-first.
    fn flatten_interfaces(
        &self,
        schema: &TypeSchema,
        index: &BTreeMap<&str, &TypeSchema>,
    ) -> Vec<String> {
        let mut flattened = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = schema.interfaces.iter().cloned().collect();

        while let Some(interface) = queue.pop_front() {
            if interface == schema.name || !visited.insert(interface.clone()) {
                continue;
            }
            if let Some(wire) = index.get(interface.as_str()) {
                queue.extend(wire.interfaces.iter().cloned());
            } else if let Some(local) = self.local.resolve(&interface) {
                queue.extend(local.interface_names().into_iter().map(str::to_string));
            }
            flattened.push(interface);
        }
        flattened
    }
}

/// Interface and field type names a schema refers to, itself excluded.
fn references<'s>(schema: &'s TypeSchema, interfaces: &'s [String]) -> BTreeSet<&'s str> {
    interfaces
        .iter()
        .map(String::as_str)
        .chain(
            schema
                .fields
                .iter()
                .flat_map(|f| f.type_ref.referenced_names()),
        )
        .filter(|reference| *reference != schema.name)
        .collect()
}

/// Index wire types by name, collapsing identical duplicates.
fn index_schema(wire: &WireSchema) -> Result<BTreeMap<&str, &TypeSchema>, CarpenterError> {
    let mut index: BTreeMap<&str, &TypeSchema> = BTreeMap::new();
    for schema in &wire.types {
        match index.get(schema.name.as_str()) {
            Some(existing) if *existing == schema => {}
            Some(_) => {
                return Err(CarpenterError::ConflictingSchema {
                    type_name: schema.name.clone(),
                });
            }
            None => {
                index.insert(schema.name.as_str(), schema);
            }
        }
    }
    Ok(index)
}
