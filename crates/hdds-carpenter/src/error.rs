// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema extraction, type fabrication and instance access.

use std::fmt;

// ---------------------------------------------------------------------------
// CarpenterError
// ---------------------------------------------------------------------------

/// Failures while turning a wire schema into runtime types.
///
/// Every variant names the offending type so the caller can tell an operator
/// why a message could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarpenterError {
    /// One or more referenced types can never be resolved: they are absent
    /// from the wire schema and unknown to the local registry, or the
    /// remaining nodes only wait on each other.
    Uncarpentable {
        /// Type that could not be fabricated.
        type_name: String,
        /// Names of the dependencies that never became available.
        missing: Vec<String>,
    },
    /// Two fields of one type share a name.
    DuplicateField {
        /// Owning type.
        type_name: String,
        /// Repeated field name.
        field: String,
    },
    /// A primitive field was declared nullable.
    NullablePrimitive {
        /// Owning type.
        type_name: String,
        /// Offending field.
        field: String,
    },
    /// A class does not expose a property required by one of its interfaces.
    InterfaceMismatch {
        /// Implementing type.
        type_name: String,
        /// Interface declaring the property.
        interface: String,
        /// Property missing or mistyped on the implementor.
        property: String,
    },
    /// An entry of the interface list names a class or enum.
    NotAnInterface {
        /// Declaring type.
        type_name: String,
        /// Listed name that is not an interface.
        interface: String,
    },
    /// An enum schema without constants.
    EmptyEnum {
        /// Enum type name.
        type_name: String,
    },
    /// The wire schema carries two different definitions under one name.
    ConflictingSchema {
        /// Type name defined twice.
        type_name: String,
    },
}

impl CarpenterError {
    /// Name of the type the failure is attributed to.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Uncarpentable { type_name, .. }
            | Self::DuplicateField { type_name, .. }
            | Self::NullablePrimitive { type_name, .. }
            | Self::InterfaceMismatch { type_name, .. }
            | Self::NotAnInterface { type_name, .. }
            | Self::EmptyEnum { type_name }
            | Self::ConflictingSchema { type_name } => type_name,
        }
    }

    /// Returns `true` for the dependency-resolution failure.
    pub fn is_uncarpentable(&self) -> bool {
        matches!(self, Self::Uncarpentable { .. })
    }
}

impl fmt::Display for CarpenterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncarpentable { type_name, missing } => write!(
                f,
                "type {} is uncarpentable: unresolved dependencies [{}]",
                type_name,
                missing.join(", ")
            ),
            Self::DuplicateField { type_name, field } => {
                write!(f, "type {} declares field {} more than once", type_name, field)
            }
            Self::NullablePrimitive { type_name, field } => write!(
                f,
                "field {} of type {} is primitive and cannot be nullable",
                field, type_name
            ),
            Self::InterfaceMismatch {
                type_name,
                interface,
                property,
            } => write!(
                f,
                "type {} does not provide property {} required by interface {}",
                type_name, property, interface
            ),
            Self::NotAnInterface {
                type_name,
                interface,
            } => write!(
                f,
                "type {} lists {} as an interface but it is not one",
                type_name, interface
            ),
            Self::EmptyEnum { type_name } => write!(f, "enum {} has no constants", type_name),
            Self::ConflictingSchema { type_name } => {
                write!(f, "conflicting definitions for type {}", type_name)
            }
        }
    }
}

impl std::error::Error for CarpenterError {}

// ---------------------------------------------------------------------------
// InstanceError
// ---------------------------------------------------------------------------

/// Errors for constructing and reading fabricated instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// The type is an interface or enum and has no constructor.
    NotInstantiable(String),
    /// Constructor called with the wrong number of arguments.
    ArityMismatch {
        type_name: String,
        expected: usize,
        got: usize,
    },
    /// Argument does not match the declared field type.
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },
    /// `Null` passed for a non-nullable field.
    MandatoryFieldNull { type_name: String, field: String },
    /// No field or property with this name.
    FieldNotFound(String),
    /// The instance's type does not implement the requested interface.
    NotImplemented { type_name: String, interface: String },
    /// Unknown enum constant.
    UnknownConstant { type_name: String, constant: String },
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstantiable(name) => write!(f, "type {} cannot be instantiated", name),
            Self::ArityMismatch {
                type_name,
                expected,
                got,
            } => write!(
                f,
                "constructor of {} takes {} arguments, got {}",
                type_name, expected, got
            ),
            Self::TypeMismatch {
                field,
                expected,
                got,
            } => write!(
                f,
                "field {}: type mismatch: expected {}, got {}",
                field, expected, got
            ),
            Self::MandatoryFieldNull { type_name, field } => {
                write!(f, "field {} of {} is mandatory but null", field, type_name)
            }
            Self::FieldNotFound(name) => write!(f, "field not found: {}", name),
            Self::NotImplemented {
                type_name,
                interface,
            } => write!(f, "type {} does not implement {}", type_name, interface),
            Self::UnknownConstant {
                type_name,
                constant,
            } => write!(f, "enum {} has no constant {}", type_name, constant),
        }
    }
}

impl std::error::Error for InstanceError {}

// ---------------------------------------------------------------------------
// LoaderError
// ---------------------------------------------------------------------------

/// Errors reading schemas or configuration from text or files.
#[derive(Debug)]
pub enum LoaderError {
    /// File could not be read.
    Io(std::io::Error),
    /// YAML parse failure.
    Yaml(serde_yaml::Error),
    /// JSON parse failure.
    Json(serde_json::Error),
    /// File extension is neither YAML nor JSON.
    UnsupportedFormat(String),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read schema file: {}", e),
            Self::Yaml(e) => write!(f, "failed to parse YAML: {}", e),
            Self::Json(e) => write!(f, "failed to parse JSON: {}", e),
            Self::UnsupportedFormat(ext) => write!(f, "unsupported schema format: {}", ext),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Yaml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_yaml::Error> for LoaderError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
