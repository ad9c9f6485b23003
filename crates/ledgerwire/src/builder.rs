// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

//! Fluent builders for declaring schema types.
//!
//! Each builder assembles one [`TypeDescriptor`] and registers it into a
//! [`SchemaRegistry`], returning the [`DefId`] handle. Field, element, and
//! payload types may reference not-yet-declared names via
//! [`TypeRef::named`]; call [`SchemaRegistry::resolve_all`] after the last
//! declaration of a load unit.

use crate::descriptor::{EnumDescriptor, EnumVariant, FieldSpec, TypeDescriptor, TypeKind, TypeRef};
use crate::registry::{DefId, SchemaError, SchemaRegistry};

/// Builder for struct types.
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl StructBuilder {
    /// Start a struct declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(FieldSpec::new(name, ty));
        self
    }

    /// Add a field referencing a registered type by name.
    pub fn named_field(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.field(name, TypeRef::named(type_name))
    }

    /// Add an optional field; may be omitted at construction time.
    pub fn optional_field(self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.field(name, TypeRef::option(ty))
    }

    /// Build the descriptor without registering it.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(self.name, TypeKind::Struct(self.fields))
    }

    /// Register the descriptor and return its handle.
    pub fn register(self, registry: &mut SchemaRegistry) -> Result<DefId, SchemaError> {
        registry.register(self.build())
    }
}

/// Builder for tagged unions.
///
/// Wire discriminants follow declaration order, starting at zero.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    variants: Vec<EnumVariant>,
}

impl EnumBuilder {
    /// Start an enum declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Add a payload-carrying variant.
    pub fn variant(mut self, name: impl Into<String>, payload: TypeRef) -> Self {
        self.variants.push(EnumVariant::new(name, payload));
        self
    }

    /// Add a unit variant.
    pub fn unit_variant(mut self, name: impl Into<String>) -> Self {
        self.variants.push(EnumVariant::unit(name));
        self
    }

    /// Build the descriptor without registering it.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(self.name, TypeKind::Enum(EnumDescriptor::new(self.variants)))
    }

    /// Register the descriptor and return its handle.
    pub fn register(self, registry: &mut SchemaRegistry) -> Result<DefId, SchemaError> {
        registry.register(self.build())
    }
}

/// Builder for positional tuple types.
#[derive(Debug)]
pub struct TupleBuilder {
    name: String,
    elements: Vec<TypeRef>,
}

impl TupleBuilder {
    /// Start a tuple declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Append an element type.
    pub fn element(mut self, ty: TypeRef) -> Self {
        self.elements.push(ty);
        self
    }

    /// Build the descriptor without registering it.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::new(self.name, TypeKind::Tuple(self.elements))
    }

    /// Register the descriptor and return its handle.
    pub fn register(self, registry: &mut SchemaRegistry) -> Result<DefId, SchemaError> {
        registry.register(self.build())
    }
}
