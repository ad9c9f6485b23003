// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

//! # ledgerwire - typed structured-data codec and schema registry
//!
//! Declares ledger data models (structs, tagged unions, tuples) at runtime,
//! resolves forward and mutually recursive type references in one explicit
//! pass, and serializes validated values to the ledger network's canonical
//! little-endian wire format.
//!
//! ## Quick Start
//!
//! ```rust
//! use ledgerwire::{wire, Instance, SchemaRegistry, StructBuilder, TypeRef, Value};
//! use std::sync::Arc;
//!
//! // Declare the schema.
//! let mut registry = SchemaRegistry::new();
//! let point = StructBuilder::new("Point")
//!     .field("x", TypeRef::U32)
//!     .field("y", TypeRef::U32)
//!     .register(&mut registry)
//!     .unwrap();
//! registry.resolve_all().unwrap();
//! let registry = Arc::new(registry);
//!
//! // Build a validated instance and round-trip it.
//! let value = Value::record([("x", Value::from(1u32)), ("y", Value::from(2u32))]);
//! let instance = Instance::new(&registry, point, value).unwrap();
//!
//! let bytes = wire::encode(&instance).unwrap();
//! assert_eq!(bytes, [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00]);
//! assert_eq!(wire::decode(&bytes, &registry, point).unwrap(), instance);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------------------------------+
//! |                      Declaration surface                         |
//! |        StructBuilder / EnumBuilder / TupleBuilder                |
//! +------------------------------------------------------------------+
//! |                       SchemaRegistry                             |
//! |   name -> TypeDescriptor table | resolve_all() fixed point       |
//! +------------------------------------------------------------------+
//! |                         Value model                              |
//! |        Value (untyped tree) | Instance (validated binding)       |
//! +------------------------------------------------------------------+
//! |                           Codec                                  |
//! |     wire::encode / wire::decode | DecodeLimits guards            |
//! +------------------------------------------------------------------+
//! ```
//!
//! ## Lifecycle
//!
//! Declarations and [`SchemaRegistry::resolve_all`] run single-threaded at
//! load time; afterwards the registry is frozen and safe to share behind an
//! `Arc` for unsynchronized concurrent reads. Instances are independently
//! owned and validated on construction and on every mutation, so the codec
//! never sees a malformed value.

/// Fluent builders for declaring schema types.
pub mod builder;
/// Type descriptors: primitives, type references, struct/enum/tuple shapes.
pub mod descriptor;
/// Descriptor-bound values with construction-time validation.
pub mod instance;
/// Schema registry with deferred name resolution.
pub mod registry;
/// Untyped runtime value tree.
pub mod value;
/// Canonical wire encoding and decoding.
pub mod wire;

pub use builder::{EnumBuilder, StructBuilder, TupleBuilder};
pub use descriptor::{
    EnumDescriptor, EnumVariant, FieldSpec, PrimitiveKind, TypeDescriptor, TypeKind, TypeRef,
    MAX_ENUM_VARIANTS,
};
pub use instance::{FromValue, Instance, ShapeError};
pub use registry::{DefId, SchemaError, SchemaRegistry};
pub use value::Value;
pub use wire::{DecodeError, DecodeLimits, EncodeError};
