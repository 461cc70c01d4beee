// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type handles.

use crate::config::ACCESSOR_PREFIX;
use crate::error::InstanceError;
use crate::runtime::{Instance, Value};
use crate::schema::{PrimitiveKind, TypeRef};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_LOADER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of the carpenter that defined a type.
///
/// Every [`crate::ClassCarpenter`] draws a fresh id, so types it defines
/// never compare equal to types defined by another carpenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoaderId(u64);

impl LoaderId {
    /// Allocate a process-unique loader id.
    pub fn next() -> Self {
        Self(NEXT_LOADER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Where a runtime type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeOrigin {
    /// Registered by the host application.
    Local,
    /// Fabricated at runtime.
    Carpented {
        /// Carpenter that built the type.
        loader: LoaderId,
        /// Per-carpenter build sequence number.
        serial: u64,
    },
}

/// Runtime type kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

/// Resolved type of a field slot.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Built-in primitive.
    Primitive(PrimitiveKind),
    /// Another runtime type.
    Object(RuntimeType),
    /// The owning type itself.
    SelfRef,
    /// Sequence of the element type.
    Sequence(Box<FieldType>),
}

/// One constructor parameter / accessor of a runtime type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    /// Field name.
    pub name: String,
    /// Declared wire type.
    pub type_ref: TypeRef,
    /// Resolved runtime type.
    pub field_type: FieldType,
    /// Whether `Null` is accepted.
    pub nullable: bool,
}

/// Immutable definition behind a [`RuntimeType`] handle.
pub(crate) struct TypeDefinition {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) fields: Vec<FieldSlot>,
    pub(crate) interfaces: Vec<RuntimeType>,
    pub(crate) constants: Vec<String>,
    /// Interface name -> (property name, slot index) for every property.
    pub(crate) dispatch: HashMap<String, Vec<(String, usize)>>,
    pub(crate) origin: TypeOrigin,
}

/// Cheaply clonable handle to a local or fabricated type.
///
/// Equality is nominal: two handles are equal when they name the same type
/// from the same origin.
#[derive(Clone)]
pub struct RuntimeType(Arc<TypeDefinition>);

impl RuntimeType {
    pub(crate) fn from_definition(definition: TypeDefinition) -> Self {
        Self(Arc::new(definition))
    }

    /// Type name (wire identity).
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Type kind.
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Origin of the definition.
    pub fn origin(&self) -> TypeOrigin {
        self.0.origin
    }

    /// Check if this is an interface.
    pub fn is_interface(&self) -> bool {
        self.0.kind == TypeKind::Interface
    }

    /// Check if this type was fabricated at runtime.
    pub fn is_carpented(&self) -> bool {
        matches!(self.0.origin, TypeOrigin::Carpented { .. })
    }

    /// Field slots in constructor order. For interfaces these are the
    /// properties implementors must expose.
    pub fn fields(&self) -> &[FieldSlot] {
        &self.0.fields
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSlot> {
        self.0.fields.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.0.fields.iter().position(|f| f.name == name)
    }

    /// Flattened interface set (declared interfaces plus all ancestors).
    pub fn interfaces(&self) -> &[RuntimeType] {
        &self.0.interfaces
    }

    /// Names of the flattened interface set.
    pub fn interface_names(&self) -> Vec<&str> {
        self.0.interfaces.iter().map(RuntimeType::name).collect()
    }

    /// Enum constants in ordinal order (empty for non-enums).
    pub fn constants(&self) -> &[String] {
        &self.0.constants
    }

    /// Accessor names, one per field, in declaration order.
    pub fn accessor_names(&self) -> Vec<String> {
        self.0
            .fields
            .iter()
            .map(|f| accessor_name(&f.name))
            .collect()
    }

    /// Check whether the type implements the named interface.
    pub fn implements(&self, interface: &str) -> bool {
        self.0.interfaces.iter().any(|i| i.name() == interface)
    }

    /// Nominal identity check.
    pub fn same_type(&self, other: &RuntimeType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.name == other.0.name && self.0.origin == other.0.origin)
    }

    /// Whether a value of this type can be stored where `target` is expected.
    pub fn is_assignable_to(&self, target: &RuntimeType) -> bool {
        self.same_type(target) || (target.is_interface() && self.implements(target.name()))
    }

    /// Slot indices serving each property of `interface`.
    pub(crate) fn dispatch(&self, interface: &str) -> Option<&[(String, usize)]> {
        self.0.dispatch.get(interface).map(Vec::as_slice)
    }

    /// Invoke the constructor with arguments in field declaration order.
    pub fn construct(&self, args: Vec<Value>) -> Result<Instance, InstanceError> {
        if self.0.kind != TypeKind::Class {
            return Err(InstanceError::NotInstantiable(self.0.name.clone()));
        }
        if args.len() != self.0.fields.len() {
            return Err(InstanceError::ArityMismatch {
                type_name: self.0.name.clone(),
                expected: self.0.fields.len(),
                got: args.len(),
            });
        }
        for (slot, arg) in self.0.fields.iter().zip(&args) {
            if arg.is_null() {
                if !slot.nullable {
                    return Err(InstanceError::MandatoryFieldNull {
                        type_name: self.0.name.clone(),
                        field: slot.name.clone(),
                    });
                }
                continue;
            }
            self.check_value(slot, &slot.field_type, arg)?;
        }
        Ok(Instance::new(self.clone(), args))
    }

    /// Look up an enum constant by name.
    pub fn enum_constant(&self, constant: &str) -> Result<Value, InstanceError> {
        if self.0.kind != TypeKind::Enum {
            return Err(InstanceError::NotInstantiable(self.0.name.clone()));
        }
        self.0
            .constants
            .iter()
            .position(|c| c == constant)
            .map(|ordinal| Value::Enum {
                ty: self.clone(),
                ordinal,
            })
            .ok_or_else(|| InstanceError::UnknownConstant {
                type_name: self.0.name.clone(),
                constant: constant.to_string(),
            })
    }

    fn check_value(
        &self,
        slot: &FieldSlot,
        expected: &FieldType,
        value: &Value,
    ) -> Result<(), InstanceError> {
        let matches = match (expected, value) {
            (FieldType::Primitive(kind), v) => v.primitive_kind() == Some(*kind),
            (FieldType::Object(target), Value::Object(instance)) => {
                instance.runtime_type().is_assignable_to(target)
            }
            (FieldType::Object(target), Value::Enum { ty, .. }) => ty.is_assignable_to(target),
            (FieldType::SelfRef, Value::Object(instance)) => {
                instance.runtime_type().is_assignable_to(self)
            }
            (FieldType::Sequence(element), Value::Sequence(items)) => {
                for item in items {
                    if item.is_null() && !matches!(**element, FieldType::Primitive(_)) {
                        continue;
                    }
                    self.check_value(slot, element, item)?;
                }
                true
            }
            _ => false,
        };
        if matches {
            Ok(())
        } else {
            Err(InstanceError::TypeMismatch {
                field: slot.name.clone(),
                expected: slot.type_ref.to_string(),
                got: value.type_label(),
            })
        }
    }
}

/// Accessor name for a field: `name` -> `getName`.
pub fn accessor_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!(
            "{}{}{}",
            ACCESSOR_PREFIX,
            first.to_uppercase(),
            chars.as_str()
        ),
        None => ACCESSOR_PREFIX.to_string(),
    }
}

impl PartialEq for RuntimeType {
    fn eq(&self, other: &Self) -> bool {
        self.same_type(other)
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeType")
            .field("name", &self.0.name)
            .field("kind", &self.0.kind)
            .field("origin", &self.0.origin)
            .finish()
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_name() {
        assert_eq!(accessor_name("name"), "getName");
        assert_eq!(accessor_name("x"), "getX");
        assert_eq!(accessor_name("éclair"), "getÉclair");
    }

    #[test]
    fn test_loader_ids_are_unique() {
        let a = LoaderId::next();
        let b = LoaderId::next();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }
}
