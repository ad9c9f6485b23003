// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

//! Runtime value tree.
//!
//! [`Value`] is the untyped representation of one schema instance. On its
//! own it carries no shape guarantees; binding a value to a descriptor (and
//! getting validation) is the job of [`crate::instance::Instance`].

use std::collections::HashMap;

/// A dynamic value holding any wire-expressible shape.
///
/// Absence is always the explicit [`Value::None`] marker, never an implicit
/// zero or empty container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    // Primitives
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Str(String),
    /// Opaque fixed-width byte string (hash digests and the like).
    Bytes(Vec<u8>),

    // Containers
    List(Vec<Value>),
    /// Key-value entries in declaration order.
    Map(Vec<(Value, Value)>),
    /// Explicit absent marker for optional positions.
    None,
    Some(Box<Value>),

    // Composites
    Struct(HashMap<String, Value>),
    Tuple(Vec<Value>),
    /// Active enum variant: name plus payload if the variant carries one.
    Variant(String, Option<Box<Value>>),
}

impl Value {
    /// Opaque byte string value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Present optional value.
    pub fn some(inner: Value) -> Self {
        Self::Some(Box::new(inner))
    }

    /// Struct value from named fields.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Unit enum variant.
    pub fn unit_variant(name: impl Into<String>) -> Self {
        Self::Variant(name.into(), None)
    }

    /// Payload-carrying enum variant.
    pub fn variant(name: impl Into<String>, payload: Value) -> Self {
        Self::Variant(name.into(), Some(Box::new(payload)))
    }

    /// Check if value is the absent marker.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u128.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Self::U128(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as list elements.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as map entries.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as tuple elements.
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap one level of optionality, if present.
    pub fn as_option(&self) -> Option<Option<&Value>> {
        match self {
            Self::None => Some(None),
            Self::Some(inner) => Some(Some(inner)),
            _ => None,
        }
    }

    /// Try to get struct field.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Active variant name.
    pub fn variant_name(&self) -> Option<&str> {
        match self {
            Self::Variant(name, _) => Some(name),
            _ => None,
        }
    }

    /// Active variant payload.
    pub fn variant_payload(&self) -> Option<&Value> {
        match self {
            Self::Variant(_, Some(payload)) => Some(payload),
            _ => None,
        }
    }

    /// Short constructor name, used in error messages.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::U128(_) => "u128",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::I128(_) => "i128",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::None => "none",
            Self::Some(_) => "some",
            Self::Struct(_) => "struct",
            Self::Tuple(_) => "tuple",
            Self::Variant(_, _) => "variant",
        }
    }
}

// Conversion traits
macro_rules! impl_from_primitive {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_primitive!(bool, Bool);
impl_from_primitive!(u8, U8);
impl_from_primitive!(u16, U16);
impl_from_primitive!(u32, U32);
impl_from_primitive!(u64, U64);
impl_from_primitive!(u128, U128);
impl_from_primitive!(i8, I8);
impl_from_primitive!(i16, I16);
impl_from_primitive!(i32, I32);
impl_from_primitive!(i64, I64);
impl_from_primitive!(i128, I128);

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Option::Some(inner) => Self::some(inner.into()),
            Option::None => Self::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_conversions() {
        let v = Value::from(42u32);
        assert_eq!(v.as_u32(), Some(42));
        assert_eq!(v.as_u64(), None);

        let v = Value::from("alice");
        assert_eq!(v.as_str(), Some("alice"));

        let v = Value::from(340_282_366_920_938u128);
        assert_eq!(v.as_u128(), Some(340_282_366_920_938));
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(Value::from(None::<u32>), Value::None);
        assert!(Value::from(None::<u32>).is_none());
        assert_eq!(
            Value::from(Some("logo")).as_option(),
            Some(Some(&Value::Str("logo".into())))
        );
    }

    #[test]
    fn test_record_and_field_access() {
        let v = Value::record([("x", Value::from(1u32)), ("y", Value::from(2u32))]);
        assert_eq!(v.get_field("x").and_then(Value::as_u32), Some(1));
        assert_eq!(v.get_field("y").and_then(Value::as_u32), Some(2));
        assert!(v.get_field("z").is_none());
    }

    #[test]
    fn test_variant_accessors() {
        let unit = Value::unit_variant("Deleted");
        assert_eq!(unit.variant_name(), Some("Deleted"));
        assert!(unit.variant_payload().is_none());

        let carrying = Value::variant("Created", Value::from("wonderland"));
        assert_eq!(carrying.variant_name(), Some("Created"));
        assert_eq!(
            carrying.variant_payload().and_then(Value::as_str),
            Some("wonderland")
        );
    }

    #[test]
    fn test_list_conversion() {
        let v = Value::from(vec![1u64, 2, 3]);
        assert_eq!(v.as_list().map(<[Value]>::len), Some(3));
        assert_eq!(v.as_list().unwrap()[2].as_u64(), Some(3));
    }
}
