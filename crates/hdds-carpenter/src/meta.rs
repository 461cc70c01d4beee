// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Meta carpenter: drives a build graph to completion.
//!
//! Fixed-point iteration over dependency count. Each pass fabricates every
//! node with no outstanding dependency, records it in the object registry
//! and removes it from the graph, which unblocks its dependents for the
//! next pass. A pass that finds nothing to build while nodes remain ends the
//! run with [`CarpenterError::Uncarpentable`]. With N nodes the loop runs at
//! most N passes.

use crate::cache::{SchemaFingerprint, TypeCache};
use crate::carpenter::ClassCarpenter;
use crate::config::CarpenterConfig;
use crate::error::CarpenterError;
use crate::graph::{BuildGraph, SchemaNode};
use crate::registry::{ChainResolver, ObjectRegistry, TypeResolver};
use crate::runtime::RuntimeType;
use std::sync::Arc;

/// Names fabricated in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// 1-based pass number within the run.
    pub pass: usize,
    /// Types built in this pass, in name order.
    pub built: Vec<String>,
}

/// Builds every node of a [`BuildGraph`] into an [`ObjectRegistry`].
pub struct MetaCarpenter<'a> {
    local: &'a dyn TypeResolver,
    carpenter: ClassCarpenter,
    cache: Option<Arc<TypeCache>>,
    registry: ObjectRegistry,
    passes: Vec<PassReport>,
    log_passes: bool,
}

impl<'a> MetaCarpenter<'a> {
    /// Create a meta carpenter resolving known types through `local`.
    pub fn new(local: &'a dyn TypeResolver) -> Self {
        Self {
            local,
            carpenter: ClassCarpenter::new(),
            cache: None,
            registry: ObjectRegistry::new(),
            passes: Vec::new(),
            log_passes: false,
        }
    }

    /// Reuse fabricated types across runs through a shared cache.
    pub fn with_cache(mut self, cache: Arc<TypeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Apply runtime configuration.
    pub fn with_config(mut self, config: &CarpenterConfig) -> Self {
        self.log_passes = config.log_passes;
        self
    }

    /// Carpenter used for fabrication.
    pub fn carpenter(&self) -> &ClassCarpenter {
        &self.carpenter
    }

    /// Types fabricated so far in the current run.
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Passes completed in the current (or last) run.
    pub fn passes(&self) -> &[PassReport] {
        &self.passes
    }

    /// Consume the whole graph and return the fabricated types.
    ///
    /// Each call is an independent run with a fresh registry. On failure
    /// no registry is returned.
    pub fn build(&mut self, mut graph: BuildGraph) -> Result<ObjectRegistry, CarpenterError> {
        self.registry = ObjectRegistry::new();
        self.passes.clear();
        let total = graph.len();

        while graph.len() > 0 {
            self.step(&mut graph)?;
        }
        debug_assert!(graph.is_empty(), "build graph must be empty after a run");

        log::info!(
            "[meta] built {} types in {} passes",
            total,
            self.passes.len()
        );
        Ok(std::mem::take(&mut self.registry))
    }

    /// Run one pass: fabricate every node whose dependencies are all built.
    pub fn step(&mut self, graph: &mut BuildGraph) -> Result<PassReport, CarpenterError> {
        let ready = graph.ready();
        if ready.is_empty() && graph.len() > 0 {
            return Err(stalled(graph));
        }

        for name in &ready {
            let Some(node) = graph.node(name) else {
                continue;
            };
            let ty = self.fabricate(node)?;
            self.registry.insert(ty);
            graph.remove(name);
        }

        let report = PassReport {
            pass: self.passes.len() + 1,
            built: ready,
        };
        if self.log_passes {
            log::info!("[meta] pass {}: built [{}]", report.pass, report.built.join(", "));
        } else {
            log::debug!("[meta] pass {}: built [{}]", report.pass, report.built.join(", "));
        }
        self.passes.push(report.clone());
        Ok(report)
    }

    fn fabricate(&self, node: &SchemaNode) -> Result<RuntimeType, CarpenterError> {
        let resolver = ChainResolver::new(&self.registry, self.local);
        match &self.cache {
            Some(cache) => {
                let key = SchemaFingerprint::compute(node, &resolver);
                cache.get_or_try_build(key, || self.carpenter.carpent(node, &resolver))
            }
            None => self.carpenter.carpent(node, &resolver),
        }
    }
}

/// Build the error for a pass that could not make progress.
fn stalled(graph: &BuildGraph) -> CarpenterError {
    let missing = graph.missing();
    let residue = graph.names();

    let culprit = residue
        .iter()
        .find(|name| {
            graph
                .dependencies_of(name)
                .is_some_and(|deps| deps.iter().any(|d| missing.contains(d)))
        })
        .or_else(|| residue.first())
        .map(|name| name.to_string())
        .unwrap_or_default();

    let missing: Vec<String> = if missing.is_empty() {
        // Pure cycle: report what the culprit is waiting on.
        graph
            .dependencies_of(&culprit)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default()
    } else {
        missing.into_iter().collect()
    };

    log::warn!(
        "[meta] build stalled with {} residual types [{}]; {} waits on [{}]",
        residue.len(),
        residue.join(", "),
        culprit,
        missing.join(", ")
    );
    CarpenterError::Uncarpentable {
        type_name: culprit,
        missing,
    }
}
