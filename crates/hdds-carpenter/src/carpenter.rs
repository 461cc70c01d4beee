// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class carpenter: fabricates one runtime type from a resolved schema node.

use crate::error::CarpenterError;
use crate::graph::SchemaNode;
use crate::registry::TypeResolver;
use crate::runtime::{
    FieldSlot, FieldType, LoaderId, RuntimeType, TypeDefinition, TypeKind, TypeOrigin,
};
use crate::schema::{SchemaKind, TypeRef, TypeSchema};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Fabricates runtime types.
///
/// Each carpenter owns a [`LoaderId`]; every type it defines is a new
/// nominal type, even when built twice from the same node. Types defined by
/// different carpenters are never the same type but remain interchangeable
/// through the interfaces they implement.
#[derive(Debug)]
pub struct ClassCarpenter {
    loader: LoaderId,
    next_serial: AtomicU64,
}

impl ClassCarpenter {
    /// Create a carpenter with a fresh loader id.
    pub fn new() -> Self {
        Self {
            loader: LoaderId::next(),
            next_serial: AtomicU64::new(0),
        }
    }

    /// Loader id stamped on every type this carpenter defines.
    pub fn loader(&self) -> LoaderId {
        self.loader
    }

    /// Number of types defined so far.
    pub fn built_count(&self) -> u64 {
        self.next_serial.load(Ordering::Relaxed)
    }

    /// Fabricate the type described by `node`.
    ///
    /// Every field type and interface the node references must resolve
    /// through `resolver` (or be the node itself); otherwise the node is
    /// [`CarpenterError::Uncarpentable`].
    pub fn carpent(
        &self,
        node: &SchemaNode,
        resolver: &dyn TypeResolver,
    ) -> Result<RuntimeType, CarpenterError> {
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);
        let origin = TypeOrigin::Carpented {
            loader: self.loader,
            serial,
        };
        let ty = define_type(node.schema(), node.interfaces(), resolver, origin)?;
        log::debug!(
            "[carpenter] built {} ({:?}, {} fields, interfaces [{}]) loader={} serial={}",
            ty.name(),
            ty.kind(),
            ty.fields().len(),
            ty.interface_names().join(", "),
            self.loader.as_u64(),
            serial
        );
        Ok(ty)
    }
}

impl Default for ClassCarpenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a schema and turn it into a runtime type.
///
/// `interfaces` is the flattened interface set, in order.
pub(crate) fn define_type(
    schema: &TypeSchema,
    interfaces: &[String],
    resolver: &dyn TypeResolver,
    origin: TypeOrigin,
) -> Result<RuntimeType, CarpenterError> {
    let name = schema.name.as_str();
    validate_fields(schema)?;

    let (kind, constants) = match &schema.kind {
        SchemaKind::Class => (TypeKind::Class, Vec::new()),
        SchemaKind::Interface => (TypeKind::Interface, Vec::new()),
        SchemaKind::Enum(constants) if constants.is_empty() => {
            return Err(CarpenterError::EmptyEnum {
                type_name: name.to_string(),
            });
        }
        SchemaKind::Enum(constants) => (TypeKind::Enum, constants.clone()),
    };

    let mut missing = BTreeSet::new();
    let mut resolved: HashMap<&str, RuntimeType> = HashMap::new();
    let referenced = interfaces
        .iter()
        .map(String::as_str)
        .chain(schema.fields.iter().flat_map(|f| f.type_ref.referenced_names()));
    for reference in referenced {
        if reference == name || resolved.contains_key(reference) {
            continue;
        }
        match resolver.resolve(reference) {
            Some(ty) => {
                resolved.insert(reference, ty);
            }
            None => {
                missing.insert(reference.to_string());
            }
        }
    }
    if !missing.is_empty() {
        return Err(CarpenterError::Uncarpentable {
            type_name: name.to_string(),
            missing: missing.into_iter().collect(),
        });
    }

    let fields: Vec<FieldSlot> = schema
        .fields
        .iter()
        .map(|f| FieldSlot {
            name: f.name.clone(),
            type_ref: f.type_ref.clone(),
            field_type: field_type(&f.type_ref, name, &resolved),
            nullable: f.nullable,
        })
        .collect();

    let interface_types: Vec<RuntimeType> = interfaces
        .iter()
        .filter_map(|i| resolved.get(i.as_str()).cloned())
        .collect();
    if let Some(not_interface) = interface_types.iter().find(|i| !i.is_interface()) {
        return Err(CarpenterError::NotAnInterface {
            type_name: name.to_string(),
            interface: not_interface.name().to_string(),
        });
    }

    let dispatch = if kind == TypeKind::Interface {
        HashMap::new()
    } else {
        build_dispatch(name, &fields, &interface_types)?
    };

    Ok(RuntimeType::from_definition(TypeDefinition {
        name: name.to_string(),
        kind,
        fields,
        interfaces: interface_types,
        constants,
        dispatch,
        origin,
    }))
}

fn validate_fields(schema: &TypeSchema) -> Result<(), CarpenterError> {
    let mut seen = HashSet::new();
    for field in &schema.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(CarpenterError::DuplicateField {
                type_name: schema.name.clone(),
                field: field.name.clone(),
            });
        }
        if field.nullable && field.type_ref.is_primitive() {
            return Err(CarpenterError::NullablePrimitive {
                type_name: schema.name.clone(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}

fn field_type(type_ref: &TypeRef, owner: &str, resolved: &HashMap<&str, RuntimeType>) -> FieldType {
    match type_ref {
        TypeRef::Primitive(kind) => FieldType::Primitive(*kind),
        TypeRef::Named(name) if name == owner => FieldType::SelfRef,
        TypeRef::Named(name) => match resolved.get(name.as_str()) {
            Some(ty) => FieldType::Object(ty.clone()),
            // Every reference was resolved above.
            None => FieldType::SelfRef,
        },
        TypeRef::Sequence(inner) => FieldType::Sequence(Box::new(field_type(inner, owner, resolved))),
    }
}

/// Map every interface property onto the implementing field slot.
fn build_dispatch(
    type_name: &str,
    fields: &[FieldSlot],
    interfaces: &[RuntimeType],
) -> Result<HashMap<String, Vec<(String, usize)>>, CarpenterError> {
    let mut dispatch = HashMap::with_capacity(interfaces.len());
    for interface in interfaces {
        let mut slots = Vec::with_capacity(interface.fields().len());
        for property in interface.fields() {
            let slot = fields
                .iter()
                .position(|f| f.name == property.name && f.type_ref == property.type_ref)
                .ok_or_else(|| CarpenterError::InterfaceMismatch {
                    type_name: type_name.to_string(),
                    interface: interface.name().to_string(),
                    property: property.name.clone(),
                })?;
            slots.push((property.name.clone(), slot));
        }
        dispatch.insert(interface.name().to_string(), slots);
    }
    Ok(dispatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstanceError;
    use crate::graph::Provenance;
    use crate::registry::LocalRegistry;
    use crate::runtime::{Instance, Value};
    use crate::schema::PrimitiveKind;

    fn node(schema: TypeSchema) -> SchemaNode {
        let interfaces = schema.interfaces.clone();
        SchemaNode::new(schema, interfaces, Provenance::Unknown)
    }

    #[test]
    fn test_constructor_and_accessors_follow_declaration_order() {
        let carpenter = ClassCarpenter::new();
        let local = LocalRegistry::new();
        let ty = carpenter
            .carpent(
                &node(
                    TypeSchema::class("A")
                        .field("b", PrimitiveKind::I32)
                        .field("a", PrimitiveKind::String),
                ),
                &local,
            )
            .expect("carpent");

        assert_eq!(ty.accessor_names(), vec!["getB", "getA"]);
        let instance = ty
            .construct(vec![Value::from(7i32), Value::from("seven")])
            .expect("construct");
        assert_eq!(instance.get_as::<i32>("b"), Ok(7));
        assert_eq!(instance.get_as::<String>("a"), Ok("seven".to_string()));
        assert_eq!(instance.call_accessor("getA"), Ok(&Value::from("seven")));
        assert_eq!(instance.to_string(), "A{b=7, a=seven}");
    }

    #[test]
    fn test_constructor_rejects_bad_arguments() {
        let ty = ClassCarpenter::new()
            .carpent(
                &node(
                    TypeSchema::class("A")
                        .field("a", PrimitiveKind::I32)
                        .nullable_field("s", TypeRef::sequence(PrimitiveKind::String.into())),
                ),
                &LocalRegistry::new(),
            )
            .expect("carpent");

        assert!(matches!(
            ty.construct(vec![Value::from(1i32)]),
            Err(InstanceError::ArityMismatch { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            ty.construct(vec![Value::from(1i64), Value::Null]),
            Err(InstanceError::TypeMismatch { ref field, .. }) if field == "a"
        ));
        assert!(matches!(
            ty.construct(vec![Value::Null, Value::Null]),
            Err(InstanceError::MandatoryFieldNull { ref field, .. }) if field == "a"
        ));
        let ok = ty
            .construct(vec![Value::from(1i32), Value::Null])
            .expect("nullable sequence");
        assert!(ok.get("s").is_ok_and(Value::is_null));
    }

    #[test]
    fn test_each_carpent_defines_a_new_type() {
        let carpenter = ClassCarpenter::new();
        let local = LocalRegistry::new();
        let schema = node(TypeSchema::class("A").field("a", PrimitiveKind::U8));
        let first = carpenter.carpent(&schema, &local).expect("first");
        let second = carpenter.carpent(&schema, &local).expect("second");
        assert!(!first.same_type(&second));
        assert_eq!(carpenter.built_count(), 2);
    }

    #[test]
    fn test_missing_reference_is_uncarpentable() {
        let err = ClassCarpenter::new()
            .carpent(
                &node(
                    TypeSchema::class("A")
                        .field("b", TypeRef::named("B"))
                        .implements("I"),
                ),
                &LocalRegistry::new(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CarpenterError::Uncarpentable {
                type_name: "A".into(),
                missing: vec!["B".into(), "I".into()],
            }
        );
    }

    #[test]
    fn test_interface_mismatch() {
        let local = LocalRegistry::new();
        local
            .define(&TypeSchema::interface("I").field("a", PrimitiveKind::I32))
            .expect("I");
        let err = ClassCarpenter::new()
            .carpent(
                &node(
                    TypeSchema::class("A")
                        .field("a", PrimitiveKind::I64)
                        .implements("I"),
                ),
                &local,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CarpenterError::InterfaceMismatch { ref interface, ref property, .. }
                if interface == "I" && property == "a"
        ));
    }

    #[test]
    fn test_class_in_interface_list_is_rejected() {
        let local = LocalRegistry::new();
        local
            .define(&TypeSchema::class("B").field("a", PrimitiveKind::I32))
            .expect("B");
        let err = ClassCarpenter::new()
            .carpent(
                &node(
                    TypeSchema::class("A")
                        .field("a", PrimitiveKind::I32)
                        .implements("B"),
                ),
                &local,
            )
            .unwrap_err();
        assert_eq!(
            err,
            CarpenterError::NotAnInterface {
                type_name: "A".into(),
                interface: "B".into(),
            }
        );
        assert!(local
            .define(&TypeSchema::interface("I").implements("B"))
            .is_err());
    }

    #[test]
    fn test_schema_validation() {
        let carpenter = ClassCarpenter::new();
        let local = LocalRegistry::new();

        let dup = TypeSchema::class("A")
            .field("a", PrimitiveKind::I32)
            .field("a", PrimitiveKind::I64);
        assert!(matches!(
            carpenter.carpent(&node(dup), &local),
            Err(CarpenterError::DuplicateField { .. })
        ));

        let nullable = TypeSchema::class("A").nullable_field("a", PrimitiveKind::I32);
        assert!(matches!(
            carpenter.carpent(&node(nullable), &local),
            Err(CarpenterError::NullablePrimitive { .. })
        ));

        let empty = TypeSchema::enumeration("E", Vec::<String>::new());
        assert!(matches!(
            carpenter.carpent(&node(empty), &local),
            Err(CarpenterError::EmptyEnum { .. })
        ));
    }

    #[test]
    fn test_self_reference() {
        let ty = ClassCarpenter::new()
            .carpent(
                &node(
                    TypeSchema::class("Link")
                        .field("id", PrimitiveKind::U32)
                        .nullable_field("next", TypeRef::named("Link")),
                ),
                &LocalRegistry::new(),
            )
            .expect("carpent");
        let tail = ty
            .construct(vec![Value::from(2u32), Value::Null])
            .expect("tail");
        let head = ty
            .construct(vec![Value::from(1u32), Value::from(tail)])
            .expect("head");
        let next = head.get_as::<Instance>("next").expect("next");
        assert_eq!(next.get_as::<u32>("id"), Ok(2));
    }

    #[test]
    fn test_enum_constants() {
        let local = LocalRegistry::new();
        let carpenter = ClassCarpenter::new();
        let level = carpenter
            .carpent(&node(TypeSchema::enumeration("Level", ["LOW", "HIGH"])), &local)
            .expect("enum");
        let high = level.enum_constant("HIGH").expect("HIGH");
        assert_eq!(high.enum_constant(), Some("HIGH"));
        assert!(level.enum_constant("MID").is_err());
        assert!(level.construct(Vec::new()).is_err());

        local.register(level);
        let reading = carpenter
            .carpent(
                &node(TypeSchema::class("Reading").field("level", TypeRef::named("Level"))),
                &local,
            )
            .expect("reading");
        let r = reading.construct(vec![high]).expect("construct");
        assert_eq!(r.to_string(), "Reading{level=HIGH}");
    }
}
