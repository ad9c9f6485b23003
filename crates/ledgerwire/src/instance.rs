// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

//! Descriptor-bound values with construction-time validation.
//!
//! An [`Instance`] pairs a [`Value`] with the [`DefId`] it conforms to.
//! The pairing is checked when the instance is built and on every mutation,
//! so a value that reaches the codec already matches its descriptor.
//! Violations surface here as [`ShapeError`], not at encode time.

use crate::descriptor::{EnumDescriptor, FieldSpec, TypeDescriptor, TypeKind, TypeRef};
use crate::registry::{DefId, SchemaRegistry};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Errors raised when a value does not match its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The registry has not completed its resolution pass.
    UnresolvedSchema(String),
    /// No type with this name is registered.
    UnknownType(String),
    /// A required struct field is absent.
    MissingField { ty: String, field: String },
    /// The value carries a field the struct does not declare.
    UnknownField { ty: String, field: String },
    /// A value's constructor does not match the declared type.
    Mismatch {
        ty: String,
        context: String,
        expected: String,
        got: String,
    },
    /// Tuple arity does not match the declaration.
    Arity { ty: String, expected: usize, got: usize },
    /// The enum does not declare this variant.
    UnknownVariant { ty: String, variant: String },
    /// The variant declares a payload but none was supplied.
    MissingPayload { ty: String, variant: String },
    /// The variant is a unit but a payload was supplied.
    UnexpectedPayload { ty: String, variant: String },
    /// Fixed-width byte string has the wrong length.
    WrongByteLength {
        ty: String,
        context: String,
        expected: usize,
        got: usize,
    },
    /// Positional access past the end of a tuple.
    IndexOutOfBounds { index: usize, length: usize },
    /// Typed extraction from an incompatible value.
    Conversion { expected: String, got: String },
    /// Operation does not apply to this descriptor kind.
    InvalidOperation(String),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedSchema(name) => {
                write!(f, "registry not resolved; cannot instantiate '{}'", name)
            }
            Self::UnknownType(name) => write!(f, "unknown type: '{}'", name),
            Self::MissingField { ty, field } => {
                write!(f, "'{}': missing required field '{}'", ty, field)
            }
            Self::UnknownField { ty, field } => {
                write!(f, "'{}': unknown field '{}'", ty, field)
            }
            Self::Mismatch {
                ty,
                context,
                expected,
                got,
            } => write!(
                f,
                "'{}' at {}: expected {}, got {}",
                ty, context, expected, got
            ),
            Self::Arity { ty, expected, got } => {
                write!(f, "'{}': expected {} elements, got {}", ty, expected, got)
            }
            Self::UnknownVariant { ty, variant } => {
                write!(f, "'{}': unknown variant '{}'", ty, variant)
            }
            Self::MissingPayload { ty, variant } => {
                write!(f, "'{}': variant '{}' requires a payload", ty, variant)
            }
            Self::UnexpectedPayload { ty, variant } => {
                write!(f, "'{}': unit variant '{}' takes no payload", ty, variant)
            }
            Self::WrongByteLength {
                ty,
                context,
                expected,
                got,
            } => write!(
                f,
                "'{}' at {}: expected {} bytes, got {}",
                ty, context, expected, got
            ),
            Self::IndexOutOfBounds { index, length } => {
                write!(f, "index out of bounds: {} >= {}", index, length)
            }
            Self::Conversion { expected, got } => {
                write!(f, "cannot extract {} from a {} value", expected, got)
            }
            Self::InvalidOperation(msg) => write!(f, "invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for ShapeError {}

/// A validated value bound to one registered descriptor.
#[derive(Debug, Clone)]
pub struct Instance {
    registry: Arc<SchemaRegistry>,
    def: DefId,
    value: Value,
}

impl Instance {
    /// Bind `value` to the descriptor behind `def`, validating its shape.
    ///
    /// Omitted `Option`-typed struct fields are filled with the explicit
    /// absent marker. Everything else must be present and well-shaped.
    pub fn new(
        registry: &Arc<SchemaRegistry>,
        def: DefId,
        mut value: Value,
    ) -> Result<Self, ShapeError> {
        let descriptor = registry
            .get(def)
            .ok_or_else(|| ShapeError::UnknownType(format!("{:?}", def)))?;
        if !registry.is_resolved() {
            return Err(ShapeError::UnresolvedSchema(descriptor.name.clone()));
        }
        validate(registry, descriptor, &mut value)?;
        Ok(Self {
            registry: Arc::clone(registry),
            def,
            value,
        })
    }

    /// Like [`Self::new`], looking the descriptor up by name.
    pub fn by_name(
        registry: &Arc<SchemaRegistry>,
        name: &str,
        value: Value,
    ) -> Result<Self, ShapeError> {
        let def = registry
            .lookup(name)
            .ok_or_else(|| ShapeError::UnknownType(name.to_string()))?;
        Self::new(registry, def, value)
    }

    /// Internal constructor for values whose shape is already established.
    pub(crate) fn from_parts(registry: &Arc<SchemaRegistry>, def: DefId, value: Value) -> Self {
        Self {
            registry: Arc::clone(registry),
            def,
            value,
        }
    }

    /// The bound descriptor.
    pub fn descriptor(&self) -> &TypeDescriptor {
        self.registry.descriptor(self.def)
    }

    /// The bound type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor().name
    }

    /// The definition handle.
    pub fn def(&self) -> DefId {
        self.def
    }

    /// The registry this instance was built against.
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// The underlying value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Into inner value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Get a struct field converted to a concrete type.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, ShapeError> {
        T::from_value(self.get_field(name)?)
    }

    /// Get a struct field by name.
    pub fn get_field(&self, name: &str) -> Result<&Value, ShapeError> {
        let descriptor = self.descriptor();
        if descriptor.field(name).is_none() {
            return Err(ShapeError::UnknownField {
                ty: descriptor.name.clone(),
                field: name.to_string(),
            });
        }
        match &self.value {
            Value::Struct(fields) => fields.get(name).ok_or_else(|| ShapeError::MissingField {
                ty: descriptor.name.clone(),
                field: name.to_string(),
            }),
            _ => Err(ShapeError::InvalidOperation(
                "get_field requires a struct type".into(),
            )),
        }
    }

    /// Set a struct field, validating the new value against the field type.
    pub fn set<T: Into<Value>>(&mut self, name: &str, value: T) -> Result<(), ShapeError> {
        self.set_field(name, value.into())
    }

    /// Set a struct field from a raw [`Value`].
    pub fn set_field(&mut self, name: &str, mut value: Value) -> Result<(), ShapeError> {
        let descriptor = self.registry.descriptor(self.def);
        let field = descriptor
            .field(name)
            .ok_or_else(|| ShapeError::UnknownField {
                ty: descriptor.name.clone(),
                field: name.to_string(),
            })?;
        check_ref(
            &self.registry,
            &field.ty,
            &mut value,
            &descriptor.name,
            &field.name,
        )?;
        match &mut self.value {
            Value::Struct(fields) => {
                fields.insert(name.to_string(), value);
                Ok(())
            }
            _ => Err(ShapeError::InvalidOperation(
                "set_field requires a struct type".into(),
            )),
        }
    }

    /// Switch an enum instance to another variant.
    pub fn select_variant(
        &mut self,
        name: &str,
        payload: Option<Value>,
    ) -> Result<(), ShapeError> {
        let descriptor = self.registry.descriptor(self.def);
        let e = descriptor
            .as_enum()
            .ok_or_else(|| ShapeError::InvalidOperation("select_variant requires an enum".into()))?;
        let mut value = Value::Variant(name.to_string(), payload.map(Box::new));
        check_enum(&self.registry, e, &mut value, &descriptor.name)?;
        self.value = value;
        Ok(())
    }

    /// Get a tuple element by position.
    pub fn element(&self, index: usize) -> Result<&Value, ShapeError> {
        match &self.value {
            Value::Tuple(elems) => elems.get(index).ok_or(ShapeError::IndexOutOfBounds {
                index,
                length: elems.len(),
            }),
            _ => Err(ShapeError::InvalidOperation(
                "element requires a tuple type".into(),
            )),
        }
    }

    /// Set a tuple element, validating against the declared element type.
    pub fn set_element(&mut self, index: usize, mut value: Value) -> Result<(), ShapeError> {
        let descriptor = self.registry.descriptor(self.def);
        let elements = descriptor
            .elements()
            .ok_or_else(|| ShapeError::InvalidOperation("set_element requires a tuple".into()))?;
        let ty = elements.get(index).ok_or(ShapeError::IndexOutOfBounds {
            index,
            length: elements.len(),
        })?;
        check_ref(
            &self.registry,
            ty,
            &mut value,
            &descriptor.name,
            &format!("element {}", index),
        )?;
        match &mut self.value {
            Value::Tuple(elems) => {
                elems[index] = value;
                Ok(())
            }
            _ => Err(ShapeError::InvalidOperation(
                "set_element requires a tuple type".into(),
            )),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.def == other.def && self.value == other.value
    }
}

/// Validate a value against a descriptor, filling omitted optional fields.
fn validate(
    registry: &SchemaRegistry,
    descriptor: &TypeDescriptor,
    value: &mut Value,
) -> Result<(), ShapeError> {
    match &descriptor.kind {
        TypeKind::Struct(fields) => check_struct(registry, fields, value, &descriptor.name),
        TypeKind::Enum(e) => check_enum(registry, e, value, &descriptor.name),
        TypeKind::Tuple(elements) => check_tuple(registry, elements, value, &descriptor.name),
    }
}

fn check_struct(
    registry: &SchemaRegistry,
    fields: &[FieldSpec],
    value: &mut Value,
    ty: &str,
) -> Result<(), ShapeError> {
    let map = match value {
        Value::Struct(map) => map,
        other => {
            return Err(mismatch(ty, "value", "struct", other));
        }
    };
    if let Some(unknown) = map.keys().find(|k| !fields.iter().any(|f| &f.name == *k)) {
        return Err(ShapeError::UnknownField {
            ty: ty.to_string(),
            field: unknown.clone(),
        });
    }
    for field in fields {
        match map.get_mut(&field.name) {
            Some(v) => check_ref(registry, &field.ty, v, ty, &field.name)?,
            None => {
                // Omitted optionals become the explicit absent marker.
                if matches!(field.ty, TypeRef::Option(_)) {
                    map.insert(field.name.clone(), Value::None);
                } else {
                    return Err(ShapeError::MissingField {
                        ty: ty.to_string(),
                        field: field.name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_enum(
    registry: &SchemaRegistry,
    e: &EnumDescriptor,
    value: &mut Value,
    ty: &str,
) -> Result<(), ShapeError> {
    let (name, payload) = match value {
        Value::Variant(name, payload) => (name, payload),
        other => return Err(mismatch(ty, "value", "variant", other)),
    };
    let variant = e.variant(name).ok_or_else(|| ShapeError::UnknownVariant {
        ty: ty.to_string(),
        variant: name.clone(),
    })?;
    match (&variant.payload, payload) {
        (Some(payload_ty), Some(payload)) => {
            check_ref(registry, payload_ty, payload, ty, &variant.name)
        }
        (None, None) => Ok(()),
        (Some(_), None) => Err(ShapeError::MissingPayload {
            ty: ty.to_string(),
            variant: variant.name.clone(),
        }),
        (None, Some(_)) => Err(ShapeError::UnexpectedPayload {
            ty: ty.to_string(),
            variant: variant.name.clone(),
        }),
    }
}

fn check_tuple(
    registry: &SchemaRegistry,
    elements: &[TypeRef],
    value: &mut Value,
    ty: &str,
) -> Result<(), ShapeError> {
    let elems = match value {
        Value::Tuple(elems) => elems,
        other => return Err(mismatch(ty, "value", "tuple", other)),
    };
    if elems.len() != elements.len() {
        return Err(ShapeError::Arity {
            ty: ty.to_string(),
            expected: elements.len(),
            got: elems.len(),
        });
    }
    for (i, (element_ty, v)) in elements.iter().zip(elems.iter_mut()).enumerate() {
        check_ref(registry, element_ty, v, ty, &format!("element {}", i))?;
    }
    Ok(())
}

/// Validate one value position against its declared type reference.
fn check_ref(
    registry: &SchemaRegistry,
    ty: &TypeRef,
    value: &mut Value,
    ty_name: &str,
    context: &str,
) -> Result<(), ShapeError> {
    match ty {
        TypeRef::Primitive(kind) => {
            let ok = matches!(
                (kind, &*value),
                (crate::descriptor::PrimitiveKind::Bool, Value::Bool(_))
                    | (crate::descriptor::PrimitiveKind::U8, Value::U8(_))
                    | (crate::descriptor::PrimitiveKind::U16, Value::U16(_))
                    | (crate::descriptor::PrimitiveKind::U32, Value::U32(_))
                    | (crate::descriptor::PrimitiveKind::U64, Value::U64(_))
                    | (crate::descriptor::PrimitiveKind::U128, Value::U128(_))
                    | (crate::descriptor::PrimitiveKind::I8, Value::I8(_))
                    | (crate::descriptor::PrimitiveKind::I16, Value::I16(_))
                    | (crate::descriptor::PrimitiveKind::I32, Value::I32(_))
                    | (crate::descriptor::PrimitiveKind::I64, Value::I64(_))
                    | (crate::descriptor::PrimitiveKind::I128, Value::I128(_))
                    | (crate::descriptor::PrimitiveKind::Str, Value::Str(_))
            );
            if ok {
                Ok(())
            } else {
                Err(ShapeError::Mismatch {
                    ty: ty_name.to_string(),
                    context: context.to_string(),
                    expected: format!("{:?}", kind).to_lowercase(),
                    got: value.kind_name().to_string(),
                })
            }
        }
        TypeRef::FixedBytes(width) => match value {
            Value::Bytes(bytes) if bytes.len() == *width => Ok(()),
            Value::Bytes(bytes) => Err(ShapeError::WrongByteLength {
                ty: ty_name.to_string(),
                context: context.to_string(),
                expected: *width,
                got: bytes.len(),
            }),
            other => Err(mismatch(ty_name, context, "bytes", other)),
        },
        TypeRef::List(element_ty) => match value {
            Value::List(elems) => {
                for (i, v) in elems.iter_mut().enumerate() {
                    check_ref(
                        registry,
                        element_ty,
                        v,
                        ty_name,
                        &format!("{}[{}]", context, i),
                    )?;
                }
                Ok(())
            }
            other => Err(mismatch(ty_name, context, "list", other)),
        },
        TypeRef::Map(key_ty, value_ty) => match value {
            Value::Map(entries) => {
                for (i, (k, v)) in entries.iter_mut().enumerate() {
                    check_ref(registry, key_ty, k, ty_name, &format!("{} key {}", context, i))?;
                    check_ref(
                        registry,
                        value_ty,
                        v,
                        ty_name,
                        &format!("{} value {}", context, i),
                    )?;
                }
                Ok(())
            }
            other => Err(mismatch(ty_name, context, "map", other)),
        },
        TypeRef::Option(inner_ty) => match value {
            Value::None => Ok(()),
            Value::Some(inner) => check_ref(registry, inner_ty, inner, ty_name, context),
            other => Err(mismatch(ty_name, context, "option", other)),
        },
        TypeRef::Def(id) => {
            let descriptor = registry.descriptor(*id);
            validate(registry, descriptor, value)
        }
        TypeRef::Named(name) => Err(ShapeError::InvalidOperation(format!(
            "unresolved reference '{}' reached validation in '{}'",
            name, ty_name
        ))),
    }
}

fn mismatch(ty: &str, context: &str, expected: &str, got: &Value) -> ShapeError {
    ShapeError::Mismatch {
        ty: ty.to_string(),
        context: context.to_string(),
        expected: expected.to_string(),
        got: got.kind_name().to_string(),
    }
}

/// Trait for extracting concrete values from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ShapeError>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, ShapeError> {
                match value {
                    Value::$variant(v) => Ok(v.clone()),
                    other => Err(ShapeError::Conversion {
                        expected: $name.to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(u8, U8, "u8");
impl_from_value!(u16, U16, "u16");
impl_from_value!(u32, U32, "u32");
impl_from_value!(u64, U64, "u64");
impl_from_value!(u128, U128, "u128");
impl_from_value!(i8, I8, "i8");
impl_from_value!(i16, I16, "i16");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(i128, I128, "i128");
impl_from_value!(String, Str, "str");

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, ShapeError> {
        match value {
            Value::Bytes(bytes) => Ok(bytes.clone()),
            other => Err(ShapeError::Conversion {
                expected: "bytes".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}
