// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire-level type schemas.
//!
//! These are the already-parsed per-type descriptors an envelope carries
//! alongside a serialized object graph: type name, ordered fields with their
//! declared types, and the interfaces each type implements.
//!
//! # Example YAML
//!
//! ```yaml
//! types:
//!   - name: net.corp.Named
//!     kind: interface
//!     fields:
//!       - { name: name, type: { primitive: string } }
//!   - name: net.corp.Sensor
//!     interfaces: [net.corp.Named]
//!     fields:
//!       - { name: name, type: { primitive: string } }
//!       - { name: readings, type: { sequence: { primitive: f64 } } }
//! ```

mod loader;

pub use loader::SchemaLoader;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
}

impl PrimitiveKind {
    /// Wire name of the primitive.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "string",
        }
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// Built-in primitive.
    Primitive(PrimitiveKind),
    /// Reference to another type by wire name.
    Named(String),
    /// Variable-length sequence of the element type.
    Sequence(Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for a named reference.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Shorthand for a sequence.
    pub fn sequence(element: TypeRef) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// Check if this is a primitive.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Every type name referenced by this type, including inside sequences.
    pub fn referenced_names(&self) -> Vec<&str> {
        match self {
            Self::Primitive(_) => Vec::new(),
            Self::Named(name) => vec![name.as_str()],
            Self::Sequence(inner) => inner.referenced_names(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.name()),
            Self::Named(name) => f.write_str(name),
            Self::Sequence(inner) => write!(f, "sequence<{}>", inner),
        }
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(value: PrimitiveKind) -> Self {
        Self::Primitive(value)
    }
}

/// One field of a type schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name, unique within the owning type.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Whether `Null` is an acceptable value.
    #[serde(default)]
    pub nullable: bool,
}

impl FieldSchema {
    /// Create a mandatory field.
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            nullable: false,
        }
    }

    /// Mark as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// What sort of type a schema describes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Concrete, instantiable type.
    #[default]
    Class,
    /// Capability with properties; implementors must expose them.
    Interface,
    /// Enumeration with ordered constants.
    Enum(Vec<String>),
}

/// Wire description of one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Wire-level type identity.
    pub name: String,
    /// Type kind.
    #[serde(default)]
    pub kind: SchemaKind,
    /// Fields in declaration order (constructor order).
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    /// Implemented interfaces; for an interface, its parents.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl TypeSchema {
    /// Create a class schema.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaKind::Class,
            fields: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    /// Create an interface schema.
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: SchemaKind::Interface,
            ..Self::class(name)
        }
    }

    /// Create an enum schema.
    pub fn enumeration<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: SchemaKind::Enum(constants.into_iter().map(Into::into).collect()),
            ..Self::class(name)
        }
    }

    /// Append a mandatory field.
    pub fn field(mut self, name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        self.fields.push(FieldSchema::new(name, type_ref));
        self
    }

    /// Append a nullable field.
    pub fn nullable_field(mut self, name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        self.fields.push(FieldSchema::new(name, type_ref).nullable());
        self
    }

    /// Declare an implemented (or, for interfaces, extended) interface.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Check if this describes an interface.
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, SchemaKind::Interface)
    }
}

/// Flat list of type descriptors extracted from one envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSchema {
    /// Every type present in the serialized graph.
    #[serde(default)]
    pub types: Vec<TypeSchema>,
}

impl WireSchema {
    /// Create a wire schema from type descriptors.
    pub fn new(types: Vec<TypeSchema>) -> Self {
        Self { types }
    }

    /// Find a type descriptor by name.
    pub fn get(&self, name: &str) -> Option<&TypeSchema> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Number of type descriptors.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the schema has no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeSchema> for WireSchema {
    fn from_iter<T: IntoIterator<Item = TypeSchema>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
