// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime types, values and instances.
//!
//! A [`RuntimeType`] is a tagged record description: ordered field slots,
//! a flattened interface set and a per-interface dispatch table mapping
//! each interface property onto a field slot. Host-registered types and
//! fabricated types share the same representation and differ only in
//! their [`TypeOrigin`].

mod instance;
mod types;
mod value;

pub use instance::{Instance, InterfaceView};
pub use types::{accessor_name, FieldSlot, FieldType, LoaderId, RuntimeType, TypeKind, TypeOrigin};
pub(crate) use types::TypeDefinition;
pub use value::{FromValue, Value};
