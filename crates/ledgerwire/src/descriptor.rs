// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

//! Type descriptors for the ledger schema model.
//!
//! A [`TypeDescriptor`] is an immutable schema node: a struct with named
//! ordered fields, a tagged union with up to 256 variants, or a positional
//! tuple. Field and element types are [`TypeRef`]s, which may name a type
//! that has not been declared yet; see [`crate::registry::SchemaRegistry`]
//! for the resolution pass that rewrites those names into [`DefId`] handles.

use crate::registry::DefId;

/// Maximum number of variants a tagged union may declare.
///
/// The wire discriminant is a single byte, so 256 is a hard ceiling.
pub const MAX_ENUM_VARIANTS: usize = 256;

/// Primitive type kinds.
///
/// The ledger wire format carries no floating point; quantities that need
/// sub-unit precision are fixed-point integers at the schema level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    Str,
}

impl PrimitiveKind {
    /// Encoded width in bytes (None for strings).
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::U8 | Self::I8 => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 => Some(4),
            Self::U64 | Self::I64 => Some(8),
            Self::U128 | Self::I128 => Some(16),
            Self::Str => None,
        }
    }
}

/// Reference to a field, element, or payload type.
///
/// `Named` is a forward reference: legal at declaration time, rewritten to
/// `Def` by the registry's resolution pass. Every other variant is already
/// concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Primitive kind.
    Primitive(PrimitiveKind),
    /// Opaque fixed-width byte string (hashes, signatures, key material).
    FixedBytes(usize),
    /// Variable-length sequence.
    List(Box<TypeRef>),
    /// Key-value pairs, length-prefixed on the wire.
    Map(Box<TypeRef>, Box<TypeRef>),
    /// Explicitly absent-or-present wrapper.
    Option(Box<TypeRef>),
    /// Pending reference to a registered type by name.
    Named(String),
    /// Resolved reference into the registry's definition table.
    Def(DefId),
}

impl TypeRef {
    pub const BOOL: TypeRef = TypeRef::Primitive(PrimitiveKind::Bool);
    pub const U8: TypeRef = TypeRef::Primitive(PrimitiveKind::U8);
    pub const U16: TypeRef = TypeRef::Primitive(PrimitiveKind::U16);
    pub const U32: TypeRef = TypeRef::Primitive(PrimitiveKind::U32);
    pub const U64: TypeRef = TypeRef::Primitive(PrimitiveKind::U64);
    pub const U128: TypeRef = TypeRef::Primitive(PrimitiveKind::U128);
    pub const I8: TypeRef = TypeRef::Primitive(PrimitiveKind::I8);
    pub const I16: TypeRef = TypeRef::Primitive(PrimitiveKind::I16);
    pub const I32: TypeRef = TypeRef::Primitive(PrimitiveKind::I32);
    pub const I64: TypeRef = TypeRef::Primitive(PrimitiveKind::I64);
    pub const I128: TypeRef = TypeRef::Primitive(PrimitiveKind::I128);
    pub const STR: TypeRef = TypeRef::Primitive(PrimitiveKind::Str);

    /// Pending reference to a type by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Fixed-width byte string of `width` bytes.
    pub fn fixed_bytes(width: usize) -> Self {
        Self::FixedBytes(width)
    }

    /// Sequence of `element`.
    pub fn list(element: TypeRef) -> Self {
        Self::List(Box::new(element))
    }

    /// Map from `key` to `value`.
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Optional `inner`.
    pub fn option(inner: TypeRef) -> Self {
        Self::Option(Box::new(inner))
    }

    /// True if this reference (or anything nested in it) is still a name.
    pub fn is_pending(&self) -> bool {
        match self {
            Self::Named(_) => true,
            Self::List(inner) | Self::Option(inner) => inner.is_pending(),
            Self::Map(k, v) => k.is_pending() || v.is_pending(),
            Self::Primitive(_) | Self::FixedBytes(_) | Self::Def(_) => false,
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Product type with named ordered fields.
    Struct(Vec<FieldSpec>),
    /// Tagged union.
    Enum(EnumDescriptor),
    /// Positional product type.
    Tuple(Vec<TypeRef>),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Type name, unique within a registry.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Check if this is an enum type.
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    /// Check if this is a tuple type.
    pub fn is_tuple(&self) -> bool {
        matches!(self.kind, TypeKind::Tuple(_))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldSpec]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get enum descriptor if this is an enum.
    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match &self.kind {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Get tuple elements if this is a tuple.
    pub fn elements(&self) -> Option<&[TypeRef]> {
        match &self.kind {
            TypeKind::Tuple(elems) => Some(elems),
            _ => None,
        }
    }

    /// Iterate every type reference held by this descriptor.
    pub(crate) fn refs(&self) -> impl Iterator<Item = &TypeRef> {
        let refs: Vec<&TypeRef> = match &self.kind {
            TypeKind::Struct(fields) => fields.iter().map(|f| &f.ty).collect(),
            TypeKind::Enum(e) => e.variants.iter().filter_map(|v| v.payload.as_ref()).collect(),
            TypeKind::Tuple(elems) => elems.iter().collect(),
        };
        refs.into_iter()
    }

    /// Mutable counterpart of [`Self::refs`], used by the resolution pass.
    pub(crate) fn refs_mut(&mut self) -> impl Iterator<Item = &mut TypeRef> {
        let refs: Vec<&mut TypeRef> = match &mut self.kind {
            TypeKind::Struct(fields) => fields.iter_mut().map(|f| &mut f.ty).collect(),
            TypeKind::Enum(e) => e
                .variants
                .iter_mut()
                .filter_map(|v| v.payload.as_mut())
                .collect(),
            TypeKind::Tuple(elems) => elems.iter_mut().collect(),
        };
        refs.into_iter()
    }
}

/// Field specification for struct members.
///
/// Optionality is expressed through an `Option(_)` field type; there is no
/// separate flag. An `Option`-typed field may be omitted at construction and
/// defaults to the explicit absent marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, unique within the struct.
    pub name: String,
    /// Field type.
    pub ty: TypeRef,
}

impl FieldSpec {
    /// Create a new field specification.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Tagged union descriptor.
///
/// The wire discriminant of a variant is its ordinal position in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    /// Variants in declaration order.
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// Create an enum descriptor.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self { variants }
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get a variant's wire discriminant.
    pub fn discriminant(&self, name: &str) -> Option<u8> {
        self.variants
            .iter()
            .position(|v| v.name == name)
            .map(|i| i as u8)
    }

    /// Get variant by wire discriminant.
    pub fn variant_by_discriminant(&self, discriminant: u8) -> Option<&EnumVariant> {
        self.variants.get(discriminant as usize)
    }
}

/// Enum variant: a name plus zero or one payload type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    /// Variant name, unique within the enum.
    pub name: String,
    /// Payload type, or None for unit variants.
    pub payload: Option<TypeRef>,
}

impl EnumVariant {
    /// Create a payload-carrying variant.
    pub fn new(name: impl Into<String>, payload: TypeRef) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload),
        }
    }

    /// Create a unit variant.
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_widths() {
        assert_eq!(PrimitiveKind::Bool.fixed_width(), Some(1));
        assert_eq!(PrimitiveKind::U32.fixed_width(), Some(4));
        assert_eq!(PrimitiveKind::U128.fixed_width(), Some(16));
        assert_eq!(PrimitiveKind::Str.fixed_width(), None);
    }

    #[test]
    fn test_type_ref_pending() {
        assert!(TypeRef::named("Account").is_pending());
        assert!(TypeRef::list(TypeRef::named("Account")).is_pending());
        assert!(TypeRef::map(TypeRef::STR, TypeRef::named("Account")).is_pending());
        assert!(!TypeRef::U32.is_pending());
        assert!(!TypeRef::option(TypeRef::STR).is_pending());
    }

    #[test]
    fn test_struct_descriptor_lookup() {
        let desc = TypeDescriptor::new(
            "Point",
            TypeKind::Struct(vec![
                FieldSpec::new("x", TypeRef::U32),
                FieldSpec::new("y", TypeRef::U32),
            ]),
        );
        assert!(desc.is_struct());
        assert!(desc.field("x").is_some());
        assert!(desc.field("z").is_none());
        assert_eq!(desc.fields().map(<[FieldSpec]>::len), Some(2));
    }

    #[test]
    fn test_enum_discriminants_follow_declaration_order() {
        let e = EnumDescriptor::new(vec![
            EnumVariant::new("Created", TypeRef::STR),
            EnumVariant::unit("Deleted"),
            EnumVariant::new("Renamed", TypeRef::STR),
        ]);
        assert_eq!(e.discriminant("Created"), Some(0));
        assert_eq!(e.discriminant("Deleted"), Some(1));
        assert_eq!(e.discriminant("Renamed"), Some(2));
        assert_eq!(e.discriminant("Burned"), None);
        assert_eq!(
            e.variant_by_discriminant(1).map(|v| v.name.as_str()),
            Some("Deleted")
        );
        assert!(e.variant_by_discriminant(3).is_none());
    }
}
