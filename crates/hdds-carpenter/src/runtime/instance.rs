// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instances of runtime types and interface-typed views onto them.

use crate::error::InstanceError;
use crate::runtime::{FromValue, RuntimeType, Value};
use std::fmt;

/// An object of a class-kind [`RuntimeType`].
///
/// Created only through [`RuntimeType::construct`], so the bound values
/// always match the declared field types.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    ty: RuntimeType,
    values: Vec<Value>,
}

impl Instance {
    pub(crate) fn new(ty: RuntimeType, values: Vec<Value>) -> Self {
        Self { ty, values }
    }

    /// Exact runtime type of the instance.
    pub fn runtime_type(&self) -> &RuntimeType {
        &self.ty
    }

    /// Type name.
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// Read a field value by name.
    pub fn get(&self, field: &str) -> Result<&Value, InstanceError> {
        self.ty
            .field_index(field)
            .and_then(|index| self.values.get(index))
            .ok_or_else(|| InstanceError::FieldNotFound(field.to_string()))
    }

    /// Read a field value converted to `T`.
    pub fn get_as<T: FromValue>(&self, field: &str) -> Result<T, InstanceError> {
        T::from_value(self.get(field)?).map_err(|e| with_field(e, field))
    }

    /// Read a field through its accessor name (`getName`).
    pub fn call_accessor(&self, accessor: &str) -> Result<&Value, InstanceError> {
        self.ty
            .accessor_names()
            .iter()
            .position(|a| a == accessor)
            .and_then(|index| self.values.get(index))
            .ok_or_else(|| InstanceError::FieldNotFound(accessor.to_string()))
    }

    /// Field names and values in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.ty
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    /// Check whether the instance can be used where `interface` is expected.
    pub fn is_instance_of(&self, interface: &str) -> bool {
        self.ty.name() == interface || self.ty.implements(interface)
    }

    /// View the instance through one of its interfaces.
    pub fn as_interface(&self, interface: &str) -> Result<InterfaceView<'_>, InstanceError> {
        let properties = self
            .ty
            .dispatch(interface)
            .ok_or_else(|| InstanceError::NotImplemented {
                type_name: self.ty.name().to_string(),
                interface: interface.to_string(),
            })?;
        Ok(InterfaceView {
            instance: self,
            interface: interface.to_string(),
            properties,
        })
    }

    /// Retain the instance only if its exact type is `ty`.
    pub fn downcast_exact(&self, ty: &RuntimeType) -> Option<&Instance> {
        self.ty.same_type(ty).then_some(self)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.ty.name())?;
        for (i, (name, value)) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Interface-typed reference to an [`Instance`].
///
/// Only the properties declared by the interface are reachable.
#[derive(Debug, Clone)]
pub struct InterfaceView<'a> {
    instance: &'a Instance,
    interface: String,
    properties: &'a [(String, usize)],
}

impl<'a> InterfaceView<'a> {
    /// Interface this view exposes.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Underlying instance.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Property names declared by the interface.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    /// Read a property.
    pub fn get(&self, property: &str) -> Result<&'a Value, InstanceError> {
        let instance = self.instance;
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .and_then(|(_, slot)| instance.values.get(*slot))
            .ok_or_else(|| InstanceError::FieldNotFound(property.to_string()))
    }

    /// Read a property converted to `T`.
    pub fn get_as<T: FromValue>(&self, property: &str) -> Result<T, InstanceError> {
        T::from_value(self.get(property)?).map_err(|e| with_field(e, property))
    }
}

fn with_field(err: InstanceError, field: &str) -> InstanceError {
    match err {
        InstanceError::TypeMismatch { expected, got, .. } => InstanceError::TypeMismatch {
            field: field.to_string(),
            expected,
            got,
        },
        other => other,
    }
}
