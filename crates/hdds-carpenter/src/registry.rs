// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type lookup: the host's local registry and the per-run object registry.

use crate::carpenter::define_type;
use crate::error::CarpenterError;
use crate::runtime::{RuntimeType, TypeKind, TypeOrigin};
use crate::schema::{SchemaKind, TypeSchema};
use dashmap::DashMap;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// TypeResolver trait
// ---------------------------------------------------------------------------

/// Resolves a wire type name to a loadable runtime type.
///
/// Injected into the extractor and carpenters instead of a process-wide
/// lookup, so each build run decides what counts as "known".
pub trait TypeResolver {
    /// Look up a type by wire name. Returns `None` if the name is unknown.
    fn resolve(&self, name: &str) -> Option<RuntimeType>;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> Option<RuntimeType>,
{
    fn resolve(&self, name: &str) -> Option<RuntimeType> {
        self(name)
    }
}

// ---------------------------------------------------------------------------
// LocalRegistry
// ---------------------------------------------------------------------------

/// Concurrent registry of types the host process can load itself.
#[derive(Debug, Default)]
pub struct LocalRegistry {
    types: DashMap<String, RuntimeType>,
}

impl LocalRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing runtime type under its own name.
    ///
    /// Returns the previously registered type of that name, if any.
    pub fn register(&self, ty: RuntimeType) -> Option<RuntimeType> {
        self.types.insert(ty.name().to_string(), ty)
    }

    /// Define a local type from a schema and register it.
    ///
    /// Field and interface references must already be registered here
    /// (or be the type itself).
    pub fn define(&self, schema: &TypeSchema) -> Result<RuntimeType, CarpenterError> {
        let interfaces = self.flatten_interfaces(&schema.interfaces);
        let ty = define_type(schema, &interfaces, self, TypeOrigin::Local)?;
        log::debug!(
            "[registry] defined local type {} ({:?})",
            ty.name(),
            ty.kind()
        );
        self.register(ty.clone());
        Ok(ty)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn flatten_interfaces(&self, declared: &[String]) -> Vec<String> {
        let mut flattened: Vec<String> = Vec::new();
        for name in declared {
            if !flattened.contains(name) {
                flattened.push(name.clone());
            }
            if let Some(interface) = self.resolve(name) {
                for parent in interface.interface_names() {
                    if !flattened.iter().any(|n| n == parent) {
                        flattened.push(parent.to_string());
                    }
                }
            }
        }
        flattened
    }
}

impl TypeResolver for LocalRegistry {
    fn resolve(&self, name: &str) -> Option<RuntimeType> {
        self.types.get(name).map(|entry| entry.value().clone())
    }
}

// ---------------------------------------------------------------------------
// ObjectRegistry
// ---------------------------------------------------------------------------

/// Output of one build run: fabricated types by wire name.
///
/// Insert-only; an existing entry is never replaced.
#[derive(Debug, Default, Clone)]
pub struct ObjectRegistry {
    types: BTreeMap<String, RuntimeType>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fabricated type. Returns `false` (and keeps the existing
    /// entry) if the name is already present.
    pub fn insert(&mut self, ty: RuntimeType) -> bool {
        if let Some(existing) = self.types.get(ty.name()) {
            log::warn!(
                "[registry] refusing to replace {} ({:?}) in object registry",
                existing.name(),
                existing.origin()
            );
            return false;
        }
        self.types.insert(ty.name().to_string(), ty);
        true
    }

    /// Get a fabricated type by name.
    pub fn get(&self, name: &str) -> Option<&RuntimeType> {
        self.types.get(name)
    }

    /// Check whether a name has been fabricated.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Fabricated type names in order.
    pub fn names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuntimeType)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fabricated types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing was fabricated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Instantiable (class-kind) entries only.
    pub fn classes(&self) -> impl Iterator<Item = &RuntimeType> {
        self.types.values().filter(|t| t.kind() == TypeKind::Class)
    }
}

impl TypeResolver for ObjectRegistry {
    fn resolve(&self, name: &str) -> Option<RuntimeType> {
        self.types.get(name).cloned()
    }
}

// ---------------------------------------------------------------------------
// ChainResolver
// ---------------------------------------------------------------------------

/// Resolves through the run's fabricated types first, then the host types.
pub struct ChainResolver<'a> {
    built: &'a ObjectRegistry,
    local: &'a dyn TypeResolver,
}

impl<'a> ChainResolver<'a> {
    pub fn new(built: &'a ObjectRegistry, local: &'a dyn TypeResolver) -> Self {
        Self { built, local }
    }
}

impl TypeResolver for ChainResolver<'_> {
    fn resolve(&self, name: &str) -> Option<RuntimeType> {
        self.built.resolve(name).or_else(|| self.local.resolve(name))
    }
}

/// Whether a local type has the shape a wire schema describes.
pub(crate) fn matches_schema(local: &RuntimeType, schema: &TypeSchema) -> bool {
    let kind_matches = match (&schema.kind, local.kind()) {
        (SchemaKind::Class, TypeKind::Class) | (SchemaKind::Interface, TypeKind::Interface) => true,
        (SchemaKind::Enum(constants), TypeKind::Enum) => constants.as_slice() == local.constants(),
        _ => false,
    };
    kind_matches
        && local.fields().len() == schema.fields.len()
        && local
            .fields()
            .iter()
            .zip(&schema.fields)
            .all(|(slot, field)| slot.name == field.name && slot.type_ref == field.type_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PrimitiveKind;

    #[test]
    fn test_local_define_flattens_parents() {
        let local = LocalRegistry::new();
        local
            .define(&TypeSchema::interface("I").field("a", PrimitiveKind::I32))
            .expect("I");
        local
            .define(&TypeSchema::interface("III").implements("I"))
            .expect("III");
        let a = local
            .define(
                &TypeSchema::class("A")
                    .field("a", PrimitiveKind::I32)
                    .implements("III"),
            )
            .expect("A");

        assert_eq!(a.interface_names(), vec!["III", "I"]);
        assert_eq!(a.origin(), TypeOrigin::Local);
        assert_eq!(local.len(), 3);
    }

    #[test]
    fn test_object_registry_is_insert_only() {
        let local = LocalRegistry::new();
        let first = local.define(&TypeSchema::class("A")).expect("A");
        let mut registry = ObjectRegistry::new();
        assert!(registry.insert(first.clone()));
        assert!(!registry.insert(first));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["A"]);
    }

    #[test]
    fn test_chain_prefers_built_types() {
        let local = LocalRegistry::new();
        let local_a = local.define(&TypeSchema::class("A")).expect("local A");

        let other = LocalRegistry::new();
        let built_a = other
            .define(&TypeSchema::class("A").field("x", PrimitiveKind::U8))
            .expect("built A");
        let mut built = ObjectRegistry::new();
        built.insert(built_a);

        let chain = ChainResolver::new(&built, &local);
        let resolved = chain.resolve("A").expect("resolve");
        assert_eq!(resolved.fields().len(), 1);
        assert!(local.resolve("A").is_some_and(|t| t.same_type(&local_a)));
        assert!(chain.resolve("B").is_none());
    }

    #[test]
    fn test_closure_resolver() {
        let local = LocalRegistry::new();
        local.define(&TypeSchema::class("A")).expect("A");
        let only_a = |name: &str| if name == "A" { local.resolve(name) } else { None };
        assert!(only_a.resolve("A").is_some());
        assert!(only_a.resolve("B").is_none());
    }

    #[test]
    fn test_matches_schema() {
        let local = LocalRegistry::new();
        let a = local
            .define(&TypeSchema::class("A").field("a", PrimitiveKind::I32))
            .expect("A");
        assert!(matches_schema(
            &a,
            &TypeSchema::class("A").field("a", PrimitiveKind::I32)
        ));
        assert!(!matches_schema(
            &a,
            &TypeSchema::class("A").field("a", PrimitiveKind::I64)
        ));
        assert!(!matches_schema(&a, &TypeSchema::interface("A")));
    }
}
