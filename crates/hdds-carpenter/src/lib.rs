// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HDDS Carpenter - runtime types for unknown wire schemas
//!
//! A received envelope describes every type in its object graph: fields,
//! field types and implemented interfaces. When the receiver cannot load
//! some of those types itself, the carpenter fabricates them at runtime so
//! deserialization can proceed: each fabricated type is instantiable with
//! the declared fields in declared order, exposes one accessor per field,
//! and conforms to every interface the schema lists.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdds_carpenter::{
//!     LocalRegistry, MetaCarpenter, PrimitiveKind, SchemaExtractor, TypeSchema, Value,
//!     WireSchema,
//! };
//!
//! let local = LocalRegistry::new();
//! let wire = WireSchema::new(vec![
//!     TypeSchema::interface("Named").field("name", PrimitiveKind::String),
//!     TypeSchema::class("Sensor")
//!         .field("name", PrimitiveKind::String)
//!         .field("reading", PrimitiveKind::F64)
//!         .implements("Named"),
//! ]);
//!
//! let graph = SchemaExtractor::new(&local).extract(&wire)?;
//! let registry = MetaCarpenter::new(&local).build(graph)?;
//!
//! let sensor = registry.get("Sensor").expect("fabricated");
//! let instance = sensor
//!     .construct(vec![Value::from("probe-1"), Value::from(21.5f64)])
//!     .expect("construct");
//! let named = instance.as_interface("Named").expect("conforms");
//! assert_eq!(named.get_as::<String>("name").expect("name"), "probe-1");
//! # Ok::<(), hdds_carpenter::CarpenterError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  WireSchema (flat list of TypeSchema from the envelope)     |
//! +-------------------------------------------------------------+
//! |  SchemaExtractor   known/unknown split, interface flattening|
//! |                    -> BuildGraph (dependencies/depends_on)  |
//! +-------------------------------------------------------------+
//! |  MetaCarpenter     pass loop over zero-dependency nodes     |
//! |    ClassCarpenter  one RuntimeType per node                 |
//! |    TypeCache       optional cross-run reuse                 |
//! +-------------------------------------------------------------+
//! |  ObjectRegistry (name -> RuntimeType) for the deserializer  |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`schema`] - wire-level type descriptors and YAML/JSON loading
//! - [`extractor`] - wire schema to build graph
//! - [`graph`] - schema nodes and the bidirectional dependency graph
//! - [`carpenter`] - single-type fabrication
//! - [`meta`] - multi-pass graph builds
//! - [`runtime`] - runtime types, values and instances
//! - [`registry`] - local and fabricated type lookup
//! - [`cache`] - cross-run fabricated type cache

/// Concurrent LRU cache of fabricated types.
pub mod cache;
/// Single-type fabrication.
pub mod carpenter;
/// Constants and runtime configuration.
pub mod config;
/// Error types.
pub mod error;
/// Wire schema to build graph.
pub mod extractor;
/// Schema nodes and the bidirectional dependency graph.
pub mod graph;
/// Multi-pass graph builds.
pub mod meta;
/// Local and fabricated type lookup.
pub mod registry;
/// Runtime types, values and instances.
pub mod runtime;
/// Wire-level type descriptors.
pub mod schema;

pub use cache::{CacheStats, SchemaFingerprint, TypeCache};
pub use carpenter::ClassCarpenter;
pub use config::CarpenterConfig;
pub use error::{CarpenterError, InstanceError, LoaderError};
pub use extractor::{Classification, SchemaExtractor};
pub use graph::{BuildGraph, Provenance, SchemaNode};
pub use meta::{MetaCarpenter, PassReport};
pub use registry::{ChainResolver, LocalRegistry, ObjectRegistry, TypeResolver};
pub use runtime::{
    FieldSlot, FieldType, FromValue, Instance, InterfaceView, LoaderId, RuntimeType, TypeKind,
    TypeOrigin, Value,
};
pub use schema::{
    FieldSchema, PrimitiveKind, SchemaKind, SchemaLoader, TypeRef, TypeSchema, WireSchema,
};

/// Extract and build in one call.
///
/// Returns the fabricated types for every wire type `local` cannot supply.
pub fn fabricate(
    wire: &WireSchema,
    local: &dyn TypeResolver,
    config: &CarpenterConfig,
) -> Result<ObjectRegistry, CarpenterError> {
    let graph = SchemaExtractor::new(local)
        .with_config(config)
        .extract(wire)?;
    MetaCarpenter::new(local).with_config(config).build(graph)
}
