// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field values bound into fabricated instances.

use crate::error::InstanceError;
use crate::runtime::{Instance, RuntimeType};
use crate::schema::PrimitiveKind;
use std::fmt;

/// A value held by a field of a runtime instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Primitives
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),

    // Composites
    Sequence(Vec<Value>),
    Object(Instance),
    Enum { ty: RuntimeType, ordinal: usize },

    // Special
    Null,
}

impl Value {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Primitive kind of this value, if it is a primitive.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::Char(_) => PrimitiveKind::Char,
            Self::String(_) => PrimitiveKind::String,
            _ => return None,
        })
    }

    /// Short description used in type mismatch errors.
    pub fn type_label(&self) -> String {
        match self {
            Self::Sequence(_) => "sequence".to_string(),
            Self::Object(instance) => instance.runtime_type().name().to_string(),
            Self::Enum { ty, .. } => ty.name().to_string(),
            Self::Null => "null".to_string(),
            other => other
                .primitive_kind()
                .map(|p| p.name().to_string())
                .unwrap_or_default(),
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as instance.
    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    /// Enum constant name, if this is an enum value.
    pub fn enum_constant(&self) -> Option<&str> {
        match self {
            Self::Enum { ty, ordinal } => ty.constants().get(*ordinal).map(String::as_str),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Object(instance) => write!(f, "{}", instance),
            Self::Enum { .. } => f.write_str(self.enum_constant().unwrap_or("?")),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Trait for extracting typed values from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, InstanceError>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, InstanceError> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(InstanceError::TypeMismatch {
                        field: String::new(),
                        expected: $name.to_string(),
                        got: other.type_label(),
                    }),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(u8, U8, "u8");
impl_from_value!(u16, U16, "u16");
impl_from_value!(u32, U32, "u32");
impl_from_value!(u64, U64, "u64");
impl_from_value!(i8, I8, "i8");
impl_from_value!(i16, I16, "i16");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f32, F32, "f32");
impl_from_value!(f64, F64, "f64");
impl_from_value!(char, Char, "char");

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, InstanceError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| InstanceError::TypeMismatch {
                field: String::new(),
                expected: "string".to_string(),
                got: value.type_label(),
            })
    }
}

impl FromValue for Instance {
    fn from_value(value: &Value) -> Result<Self, InstanceError> {
        value
            .as_object()
            .cloned()
            .ok_or_else(|| InstanceError::TypeMismatch {
                field: String::new(),
                expected: "object".to_string(),
                got: value.type_label(),
            })
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, InstanceError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, InstanceError> {
        match value {
            Value::Sequence(items) => items.iter().map(T::from_value).collect(),
            other => Err(InstanceError::TypeMismatch {
                field: String::new(),
                expected: "sequence".to_string(),
                got: other.type_label(),
            }),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_values() {
        assert_eq!(Value::from(42u32).primitive_kind(), Some(PrimitiveKind::U32));
        assert_eq!(Value::from("x").primitive_kind(), Some(PrimitiveKind::String));
        assert_eq!(Value::Null.primitive_kind(), None);
        assert_eq!(u32::from_value(&Value::U32(7)), Ok(7));
        assert!(u32::from_value(&Value::I32(7)).is_err());
    }

    #[test]
    fn test_option_and_vec() {
        assert_eq!(Option::<i64>::from_value(&Value::Null), Ok(None));
        assert_eq!(Option::<i64>::from_value(&Value::I64(3)), Ok(Some(3)));
        assert_eq!(Value::from(None::<i64>), Value::Null);

        let seq = Value::from(vec![1.5f64, 2.5]);
        assert_eq!(Vec::<f64>::from_value(&seq), Ok(vec![1.5, 2.5]));
        assert_eq!(seq.to_string(), "[1.5, 2.5]");
    }

    #[test]
    fn test_mismatch_label() {
        let err = String::from_value(&Value::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            InstanceError::TypeMismatch {
                field: String::new(),
                expected: "string".into(),
                got: "bool".into(),
            }
        );
    }
}
