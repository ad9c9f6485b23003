// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

//! Canonical wire encoding and decoding.
//!
//! The byte layout matches the ledger network's canonical format and is
//! load-bearing for interoperability:
//!
//! - integers are fixed-width little-endian;
//! - bools are one byte, `0x00` or `0x01`;
//! - strings, lists, and maps carry a compact length prefix followed by
//!   their raw content (UTF-8 bytes, elements, key-value pairs);
//! - optional positions are `0x00` (absent) or `0x01` plus the payload;
//! - struct fields and tuple elements follow declaration order with no tags
//!   and no padding;
//! - enums are a one-byte discriminant (declaration-order ordinal) followed
//!   by the variant payload, if any;
//! - fixed-width byte strings are raw bytes with no prefix.
//!
//! The compact length prefix stores the mode in the two low bits of the
//! first byte: `00` single-byte (< 2^6), `01` two-byte (< 2^14), `10`
//! four-byte (< 2^30). The big-integer mode `11` is rejected: any length
//! that size also exceeds the decode limits.
//!
//! Decoding consumes exactly the bytes the matching encode produced;
//! trailing or missing bytes are an error, never ignored.

use crate::descriptor::{EnumDescriptor, FieldSpec, PrimitiveKind, TypeDescriptor, TypeKind, TypeRef};
use crate::instance::Instance;
use crate::registry::{DefId, SchemaRegistry};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Resource guards applied while decoding untrusted bytes.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
    /// Maximum nesting depth of composite values.
    pub max_depth: usize,
    /// Maximum length accepted from any compact length prefix.
    pub max_sequence_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_sequence_len: 1 << 20,
        }
    }
}

/// Errors raised while encoding.
///
/// A validated [`Instance`] cannot normally reach these; they guard the
/// raw-value path and the length ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Value constructor does not match the descriptor position.
    Mismatch { expected: String, got: String },
    /// Struct value lacks a declared field.
    MissingField { ty: String, field: String },
    /// Enum value names an undeclared variant.
    UnknownVariant { ty: String, variant: String },
    /// Length does not fit the compact prefix.
    LengthOverflow { len: usize },
    /// A pending name reference survived into encoding.
    Unresolved { name: String },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch { expected, got } => {
                write!(f, "cannot encode {} where {} is declared", got, expected)
            }
            Self::MissingField { ty, field } => {
                write!(f, "'{}': field '{}' absent at encode time", ty, field)
            }
            Self::UnknownVariant { ty, variant } => {
                write!(f, "'{}': cannot encode undeclared variant '{}'", ty, variant)
            }
            Self::LengthOverflow { len } => {
                write!(f, "length {} exceeds the compact prefix range", len)
            }
            Self::Unresolved { name } => {
                write!(f, "unresolved type reference '{}' at encode time", name)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Errors raised while decoding.
///
/// Every variant carries the byte offset at which decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before the descriptor was fully decoded.
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },
    /// Input continues past the end of the decoded value.
    TrailingBytes { consumed: usize, remaining: usize },
    /// Enum discriminant outside the declared variant range.
    UnknownVariant {
        ty: String,
        discriminant: u8,
        offset: usize,
    },
    /// Bool byte other than `0x00`/`0x01`.
    InvalidBool { offset: usize, byte: u8 },
    /// Option marker byte other than `0x00`/`0x01`.
    InvalidOptionMarker { offset: usize, byte: u8 },
    /// String content is not valid UTF-8.
    Utf8 { offset: usize },
    /// Compact prefix in the unsupported big-integer mode.
    LengthOverflow { offset: usize },
    /// Compact prefix wider than its value requires.
    NonCanonicalLength { offset: usize },
    /// Nesting exceeded [`DecodeLimits::max_depth`].
    DepthLimitExceeded { offset: usize, max: usize },
    /// Length prefix exceeded [`DecodeLimits::max_sequence_len`].
    SequenceTooLong {
        len: usize,
        max: usize,
        offset: usize,
    },
    /// No type registered under the given handle.
    UnknownType(String),
    /// The registry has not completed its resolution pass.
    UnresolvedSchema(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { offset, need, have } => write!(
                f,
                "unexpected end of input at offset {}: need {} bytes, have {}",
                offset, need, have
            ),
            Self::TrailingBytes {
                consumed,
                remaining,
            } => write!(
                f,
                "{} trailing bytes after decoding {} bytes",
                remaining, consumed
            ),
            Self::UnknownVariant {
                ty,
                discriminant,
                offset,
            } => write!(
                f,
                "'{}': unknown discriminant {} at offset {}",
                ty, discriminant, offset
            ),
            Self::InvalidBool { offset, byte } => {
                write!(f, "invalid bool byte {:#04x} at offset {}", byte, offset)
            }
            Self::InvalidOptionMarker { offset, byte } => {
                write!(f, "invalid option marker {:#04x} at offset {}", byte, offset)
            }
            Self::Utf8 { offset } => write!(f, "invalid UTF-8 in string at offset {}", offset),
            Self::LengthOverflow { offset } => {
                write!(f, "unsupported big-integer length prefix at offset {}", offset)
            }
            Self::NonCanonicalLength { offset } => {
                write!(f, "non-canonical length prefix at offset {}", offset)
            }
            Self::DepthLimitExceeded { offset, max } => {
                write!(f, "nesting deeper than {} at offset {}", max, offset)
            }
            Self::SequenceTooLong { len, max, offset } => write!(
                f,
                "declared length {} exceeds limit {} at offset {}",
                len, max, offset
            ),
            Self::UnknownType(name) => write!(f, "unknown type: '{}'", name),
            Self::UnresolvedSchema(name) => {
                write!(f, "registry not resolved; cannot decode '{}'", name)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Encode an instance to canonical bytes.
pub fn encode(instance: &Instance) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder {
        buf: Vec::new(),
        registry: instance.registry(),
    };
    encoder.encode_def(instance.def(), instance.value())?;
    Ok(encoder.buf)
}

/// Decode canonical bytes into an instance of `def`, with default limits.
pub fn decode(
    bytes: &[u8],
    registry: &Arc<SchemaRegistry>,
    def: DefId,
) -> Result<Instance, DecodeError> {
    decode_with_limits(bytes, registry, def, &DecodeLimits::default())
}

/// Decode canonical bytes into an instance of `def`.
///
/// Consumes the whole input: trailing bytes fail with
/// [`DecodeError::TrailingBytes`].
pub fn decode_with_limits(
    bytes: &[u8],
    registry: &Arc<SchemaRegistry>,
    def: DefId,
    limits: &DecodeLimits,
) -> Result<Instance, DecodeError> {
    let descriptor = registry
        .get(def)
        .ok_or_else(|| DecodeError::UnknownType(format!("{:?}", def)))?;
    if !registry.is_resolved() {
        return Err(DecodeError::UnresolvedSchema(descriptor.name.clone()));
    }

    let mut decoder = Decoder {
        buf: bytes,
        offset: 0,
        registry,
        limits,
        depth: 0,
    };
    let value = decoder.decode_def(def)?;
    if decoder.offset != bytes.len() {
        return Err(DecodeError::TrailingBytes {
            consumed: decoder.offset,
            remaining: bytes.len() - decoder.offset,
        });
    }
    // Shape is established by construction: the decoder only produces
    // values that mirror the descriptor it walked.
    Ok(Instance::from_parts(registry, def, value))
}

struct Encoder<'a> {
    buf: Vec<u8>,
    registry: &'a SchemaRegistry,
}

impl Encoder<'_> {
    fn encode_def(&mut self, def: DefId, value: &Value) -> Result<(), EncodeError> {
        let descriptor = self.registry.descriptor(def);
        match &descriptor.kind {
            TypeKind::Struct(fields) => self.encode_struct(descriptor, fields, value),
            TypeKind::Enum(e) => self.encode_enum(descriptor, e, value),
            TypeKind::Tuple(elements) => self.encode_tuple(elements, value),
        }
    }

    fn encode_struct(
        &mut self,
        descriptor: &TypeDescriptor,
        fields: &[FieldSpec],
        value: &Value,
    ) -> Result<(), EncodeError> {
        let map = match value {
            Value::Struct(map) => map,
            other => return Err(mismatch("struct", other)),
        };
        // Declared order is the wire contract, independent of map order.
        for field in fields {
            let field_value = map.get(&field.name).ok_or_else(|| EncodeError::MissingField {
                ty: descriptor.name.clone(),
                field: field.name.clone(),
            })?;
            self.encode_ref(&field.ty, field_value)?;
        }
        Ok(())
    }

    fn encode_enum(
        &mut self,
        descriptor: &TypeDescriptor,
        e: &EnumDescriptor,
        value: &Value,
    ) -> Result<(), EncodeError> {
        let (name, payload) = match value {
            Value::Variant(name, payload) => (name, payload),
            other => return Err(mismatch("variant", other)),
        };
        let index = e
            .variants
            .iter()
            .position(|v| v.name == *name)
            .ok_or_else(|| EncodeError::UnknownVariant {
                ty: descriptor.name.clone(),
                variant: name.clone(),
            })?;
        self.buf.push(index as u8);
        let variant = &e.variants[index];
        match (&variant.payload, payload) {
            (Some(payload_ty), Some(payload)) => self.encode_ref(payload_ty, payload),
            (None, None) => Ok(()),
            (Some(_), None) => Err(mismatch("variant payload", &Value::None)),
            (None, Some(payload)) => Err(mismatch("unit variant", payload)),
        }
    }

    fn encode_tuple(&mut self, elements: &[TypeRef], value: &Value) -> Result<(), EncodeError> {
        let elems = match value {
            Value::Tuple(elems) => elems,
            other => return Err(mismatch("tuple", other)),
        };
        if elems.len() != elements.len() {
            return Err(mismatch("tuple of matching arity", value));
        }
        for (ty, v) in elements.iter().zip(elems) {
            self.encode_ref(ty, v)?;
        }
        Ok(())
    }

    fn encode_ref(&mut self, ty: &TypeRef, value: &Value) -> Result<(), EncodeError> {
        match ty {
            TypeRef::Primitive(kind) => self.encode_primitive(*kind, value),
            TypeRef::FixedBytes(width) => match value {
                Value::Bytes(bytes) if bytes.len() == *width => {
                    self.buf.extend_from_slice(bytes);
                    Ok(())
                }
                other => Err(mismatch(&format!("{} raw bytes", width), other)),
            },
            TypeRef::List(element_ty) => match value {
                Value::List(elems) => {
                    self.put_compact(elems.len())?;
                    for elem in elems {
                        self.encode_ref(element_ty, elem)?;
                    }
                    Ok(())
                }
                other => Err(mismatch("list", other)),
            },
            TypeRef::Map(key_ty, value_ty) => match value {
                Value::Map(entries) => {
                    self.put_compact(entries.len())?;
                    for (k, v) in entries {
                        self.encode_ref(key_ty, k)?;
                        self.encode_ref(value_ty, v)?;
                    }
                    Ok(())
                }
                other => Err(mismatch("map", other)),
            },
            TypeRef::Option(inner_ty) => match value {
                Value::None => {
                    self.buf.push(0);
                    Ok(())
                }
                Value::Some(inner) => {
                    self.buf.push(1);
                    self.encode_ref(inner_ty, inner)
                }
                other => Err(mismatch("option", other)),
            },
            TypeRef::Def(id) => self.encode_def(*id, value),
            TypeRef::Named(name) => Err(EncodeError::Unresolved { name: name.clone() }),
        }
    }

    fn encode_primitive(&mut self, kind: PrimitiveKind, value: &Value) -> Result<(), EncodeError> {
        match (kind, value) {
            (PrimitiveKind::Bool, Value::Bool(v)) => self.buf.push(u8::from(*v)),
            (PrimitiveKind::U8, Value::U8(v)) => self.buf.push(*v),
            (PrimitiveKind::U16, Value::U16(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::U32, Value::U32(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::U64, Value::U64(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::U128, Value::U128(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::I8, Value::I8(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::I16, Value::I16(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::I32, Value::I32(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::I64, Value::I64(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::I128, Value::I128(v)) => self.buf.extend_from_slice(&v.to_le_bytes()),
            (PrimitiveKind::Str, Value::Str(s)) => {
                self.put_compact(s.len())?;
                self.buf.extend_from_slice(s.as_bytes());
            }
            (kind, other) => {
                return Err(mismatch(&format!("{:?}", kind).to_lowercase(), other));
            }
        }
        Ok(())
    }

    /// Compact length prefix: mode in the two low bits of the first byte.
    fn put_compact(&mut self, n: usize) -> Result<(), EncodeError> {
        if n < 1 << 6 {
            self.buf.push((n as u8) << 2);
        } else if n < 1 << 14 {
            self.buf
                .extend_from_slice(&(((n as u16) << 2) | 0b01).to_le_bytes());
        } else if n < 1 << 30 {
            self.buf
                .extend_from_slice(&(((n as u32) << 2) | 0b10).to_le_bytes());
        } else {
            return Err(EncodeError::LengthOverflow { len: n });
        }
        Ok(())
    }
}

fn mismatch(expected: &str, got: &Value) -> EncodeError {
    EncodeError::Mismatch {
        expected: expected.to_string(),
        got: got.kind_name().to_string(),
    }
}

struct Decoder<'a> {
    buf: &'a [u8],
    offset: usize,
    registry: &'a SchemaRegistry,
    limits: &'a DecodeLimits,
    depth: usize,
}

impl Decoder<'_> {
    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    fn read_bytes(&mut self, count: usize) -> Result<&[u8], DecodeError> {
        if self.remaining() < count {
            return Err(DecodeError::UnexpectedEof {
                offset: self.offset,
                need: count,
                have: self.remaining(),
            });
        }
        let slice = &self.buf[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                offset: self.offset,
                max: self.limits.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn check_len(&self, len: usize, offset: usize) -> Result<(), DecodeError> {
        if len > self.limits.max_sequence_len {
            return Err(DecodeError::SequenceTooLong {
                len,
                max: self.limits.max_sequence_len,
                offset,
            });
        }
        Ok(())
    }

    fn decode_def(&mut self, def: DefId) -> Result<Value, DecodeError> {
        self.enter()?;
        let descriptor = self.registry.descriptor(def);
        let value = match &descriptor.kind {
            TypeKind::Struct(fields) => self.decode_struct(fields),
            TypeKind::Enum(e) => self.decode_enum(descriptor, e),
            TypeKind::Tuple(elements) => self.decode_tuple(elements),
        }?;
        self.leave();
        Ok(value)
    }

    fn decode_struct(&mut self, fields: &[FieldSpec]) -> Result<Value, DecodeError> {
        let mut map = HashMap::with_capacity(fields.len());
        for field in fields {
            let value = self.decode_ref(&field.ty)?;
            map.insert(field.name.clone(), value);
        }
        Ok(Value::Struct(map))
    }

    fn decode_enum(
        &mut self,
        descriptor: &TypeDescriptor,
        e: &EnumDescriptor,
    ) -> Result<Value, DecodeError> {
        let discriminant = self.read_array::<1>()?[0];
        let variant = e.variant_by_discriminant(discriminant).ok_or_else(|| {
            DecodeError::UnknownVariant {
                ty: descriptor.name.clone(),
                discriminant,
                offset: self.offset - 1,
            }
        })?;
        let payload = match &variant.payload {
            Some(payload_ty) => Some(Box::new(self.decode_ref(payload_ty)?)),
            None => None,
        };
        Ok(Value::Variant(variant.name.clone(), payload))
    }

    fn decode_tuple(&mut self, elements: &[TypeRef]) -> Result<Value, DecodeError> {
        let mut elems = Vec::with_capacity(elements.len());
        for ty in elements {
            elems.push(self.decode_ref(ty)?);
        }
        Ok(Value::Tuple(elems))
    }

    fn decode_ref(&mut self, ty: &TypeRef) -> Result<Value, DecodeError> {
        match ty {
            TypeRef::Primitive(kind) => self.decode_primitive(*kind),
            TypeRef::FixedBytes(width) => {
                let offset = self.offset;
                self.check_len(*width, offset)?;
                Ok(Value::Bytes(self.read_bytes(*width)?.to_vec()))
            }
            TypeRef::List(element_ty) => {
                self.enter()?;
                let offset = self.offset;
                let len = self.take_compact()?;
                self.check_len(len, offset)?;
                let mut elems = Vec::with_capacity(len);
                for _ in 0..len {
                    elems.push(self.decode_ref(element_ty)?);
                }
                self.leave();
                Ok(Value::List(elems))
            }
            TypeRef::Map(key_ty, value_ty) => {
                self.enter()?;
                let offset = self.offset;
                let len = self.take_compact()?;
                self.check_len(len, offset)?;
                let mut entries = Vec::with_capacity(len);
                for _ in 0..len {
                    let k = self.decode_ref(key_ty)?;
                    let v = self.decode_ref(value_ty)?;
                    entries.push((k, v));
                }
                self.leave();
                Ok(Value::Map(entries))
            }
            TypeRef::Option(inner_ty) => {
                let offset = self.offset;
                match self.read_array::<1>()?[0] {
                    0 => Ok(Value::None),
                    1 => {
                        self.enter()?;
                        let inner = self.decode_ref(inner_ty)?;
                        self.leave();
                        Ok(Value::some(inner))
                    }
                    byte => Err(DecodeError::InvalidOptionMarker { offset, byte }),
                }
            }
            TypeRef::Def(id) => self.decode_def(*id),
            TypeRef::Named(name) => Err(DecodeError::UnresolvedSchema(name.clone())),
        }
    }

    fn decode_primitive(&mut self, kind: PrimitiveKind) -> Result<Value, DecodeError> {
        match kind {
            PrimitiveKind::Bool => {
                let offset = self.offset;
                match self.read_array::<1>()?[0] {
                    0 => Ok(Value::Bool(false)),
                    1 => Ok(Value::Bool(true)),
                    byte => Err(DecodeError::InvalidBool { offset, byte }),
                }
            }
            PrimitiveKind::U8 => Ok(Value::U8(self.read_array::<1>()?[0])),
            PrimitiveKind::U16 => Ok(Value::U16(u16::from_le_bytes(self.read_array()?))),
            PrimitiveKind::U32 => Ok(Value::U32(u32::from_le_bytes(self.read_array()?))),
            PrimitiveKind::U64 => Ok(Value::U64(u64::from_le_bytes(self.read_array()?))),
            PrimitiveKind::U128 => Ok(Value::U128(u128::from_le_bytes(self.read_array()?))),
            PrimitiveKind::I8 => Ok(Value::I8(self.read_array::<1>()?[0] as i8)),
            PrimitiveKind::I16 => Ok(Value::I16(i16::from_le_bytes(self.read_array()?))),
            PrimitiveKind::I32 => Ok(Value::I32(i32::from_le_bytes(self.read_array()?))),
            PrimitiveKind::I64 => Ok(Value::I64(i64::from_le_bytes(self.read_array()?))),
            PrimitiveKind::I128 => Ok(Value::I128(i128::from_le_bytes(self.read_array()?))),
            PrimitiveKind::Str => {
                let offset = self.offset;
                let len = self.take_compact()?;
                self.check_len(len, offset)?;
                let str_offset = self.offset;
                let bytes = self.read_bytes(len)?;
                let s = std::str::from_utf8(bytes)
                    .map_err(|_| DecodeError::Utf8 { offset: str_offset })?;
                Ok(Value::Str(s.to_string()))
            }
        }
    }

    /// Compact length prefix, rejecting non-minimal encodings.
    fn take_compact(&mut self) -> Result<usize, DecodeError> {
        let offset = self.offset;
        let first = self.read_array::<1>()?[0];
        match first & 0b11 {
            0b00 => Ok((first >> 2) as usize),
            0b01 => {
                let second = self.read_array::<1>()?[0];
                let value = (u16::from_le_bytes([first, second]) >> 2) as usize;
                if value < 1 << 6 {
                    return Err(DecodeError::NonCanonicalLength { offset });
                }
                Ok(value)
            }
            0b10 => {
                let rest = self.read_array::<3>()?;
                let value =
                    (u32::from_le_bytes([first, rest[0], rest[1], rest[2]]) >> 2) as usize;
                if value < 1 << 14 {
                    return Err(DecodeError::NonCanonicalLength { offset });
                }
                Ok(value)
            }
            _ => Err(DecodeError::LengthOverflow { offset }),
        }
    }
}
