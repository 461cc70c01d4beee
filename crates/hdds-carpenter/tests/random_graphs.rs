// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Randomized acyclic schemas.
//!
//! Type `T{i}` may only reference `T{j}` with `j < i`, so every generated
//! wire schema is buildable. The first `known` types are also defined in
//! the local registry.

use hdds_carpenter::{
    BuildGraph, LocalRegistry, MetaCarpenter, PrimitiveKind, SchemaExtractor, TypeRef, TypeSchema,
    WireSchema,
};
use std::collections::{BTreeMap, BTreeSet};

const PRIMITIVES: [PrimitiveKind; 4] = [
    PrimitiveKind::I32,
    PrimitiveKind::F64,
    PrimitiveKind::String,
    PrimitiveKind::Bool,
];

fn name(i: usize) -> String {
    format!("T{}", i)
}

fn random_schema(rng: &mut fastrand::Rng, count: usize) -> Vec<TypeSchema> {
    let mut interfaces: Vec<usize> = Vec::new();
    let mut types = Vec::with_capacity(count);

    for i in 0..count {
        let is_interface = rng.u8(0..10) < 3;
        let mut schema = if is_interface {
            TypeSchema::interface(name(i))
        } else {
            TypeSchema::class(name(i))
        };

        for &parent in &interfaces {
            if rng.bool() {
                schema = schema.implements(name(parent));
            }
        }

        // Interfaces carry no properties so classes always conform.
        if !is_interface {
            for f in 0..rng.usize(0..4) {
                let field = format!("f{}", f);
                schema = if i > 0 && rng.bool() {
                    let target = TypeRef::named(name(rng.usize(0..i)));
                    let target = if rng.bool() {
                        TypeRef::sequence(target)
                    } else {
                        target
                    };
                    schema.nullable_field(field, target)
                } else {
                    schema.field(field, PRIMITIVES[rng.usize(0..PRIMITIVES.len())])
                };
            }
        }

        if is_interface {
            interfaces.push(i);
        }
        types.push(schema);
    }
    types
}

fn local_with(types: &[TypeSchema], known: usize) -> LocalRegistry {
    let local = LocalRegistry::new();
    for schema in &types[..known] {
        local.define(schema).expect("local define");
    }
    local
}

#[test]
fn test_random_graphs_build_in_dependency_order() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_ca27);

    for _ in 0..64 {
        let count = rng.usize(1..16);
        let known = rng.usize(0..=count);
        let types = random_schema(&mut rng, count);
        let local = local_with(&types, known);
        let wire: WireSchema = types.iter().cloned().collect();

        let extractor = SchemaExtractor::new(&local);
        let classification = extractor.classify(&wire).expect("classify");
        let expected_unknown: BTreeSet<String> = (known..count).map(name).collect();
        assert_eq!(classification.unknown, expected_unknown);

        let graph: BuildGraph = extractor.extract(&wire).expect("extract");
        assert_eq!(graph, extractor.extract(&wire).expect("extract again"));
        assert!(graph.missing().is_empty());
        let edges = graph.dependencies().clone();

        let mut meta = MetaCarpenter::new(&local);
        let registry = meta.build(graph).expect("build");
        let built: BTreeSet<String> = registry.names().iter().map(|n| n.to_string()).collect();
        assert_eq!(built, expected_unknown);

        let pass_of: BTreeMap<&str, usize> = meta
            .passes()
            .iter()
            .flat_map(|p| p.built.iter().map(move |n| (n.as_str(), p.pass)))
            .collect();
        for (dependent, deps) in &edges {
            for dep in deps {
                assert!(
                    pass_of[dependent.as_str()] > pass_of[dep.as_str()],
                    "{} built before its dependency {}",
                    dependent,
                    dep
                );
            }
        }
        assert!(meta.passes().len() <= count - known);
    }
}

#[test]
fn test_removing_a_dependency_makes_build_fail() {
    let mut rng = fastrand::Rng::with_seed(7);

    for _ in 0..32 {
        let count = rng.usize(2..12);
        let types = random_schema(&mut rng, count);
        let local = LocalRegistry::new();
        let wire: WireSchema = types.iter().cloned().collect();
        let graph = SchemaExtractor::new(&local).extract(&wire).expect("extract");

        let Some((victim, _)) = graph.depends_on().iter().next() else {
            continue;
        };
        let victim = victim.clone();
        let pruned: WireSchema = types
            .iter()
            .filter(|t| t.name != victim)
            .cloned()
            .collect();

        let graph = SchemaExtractor::new(&local).extract(&pruned).expect("extract");
        assert!(graph.missing().contains(&victim));
        let err = MetaCarpenter::new(&local).build(graph).unwrap_err();
        assert!(err.is_uncarpentable(), "unexpected error {}", err);
    }
}
