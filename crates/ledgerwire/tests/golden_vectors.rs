// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::too_many_lines)] // Test code

//! Golden byte vectors for the canonical wire format.
//!
//! These pin the load-bearing parts of the layout: field order, one-byte
//! declaration-order discriminants, little-endian integers, compact length
//! prefixes, and explicit option markers. Each vector is verified both ways:
//! encode must produce exactly these bytes, and decoding them must yield the
//! original instance.

use ledgerwire::{
    wire, DefId, EnumBuilder, Instance, SchemaRegistry, StructBuilder, TypeRef, Value,
};
use std::sync::Arc;

fn resolved(mut registry: SchemaRegistry) -> Arc<SchemaRegistry> {
    registry.resolve_all().expect("resolve");
    Arc::new(registry)
}

fn check_vector(registry: &Arc<SchemaRegistry>, def: DefId, value: Value, expected: &[u8]) {
    let instance = Instance::new(registry, def, value).expect("construct");
    let bytes = wire::encode(&instance).expect("encode");
    assert_eq!(bytes, expected, "encoded bytes differ from golden vector");
    let decoded = wire::decode(expected, registry, def).expect("decode");
    assert_eq!(decoded, instance, "golden vector does not decode back");
}

#[test]
fn test_point_vector() {
    let mut registry = SchemaRegistry::new();
    let point = StructBuilder::new("Point")
        .field("x", TypeRef::U32)
        .field("y", TypeRef::U32)
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    check_vector(
        &registry,
        point,
        Value::record([("x", Value::from(1u32)), ("y", Value::from(2u32))]),
        &[0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00],
    );
}

#[test]
fn test_field_order_is_declaration_order() {
    let mut registry = SchemaRegistry::new();
    let packed = StructBuilder::new("Packed")
        .field("first", TypeRef::U8)
        .field("second", TypeRef::U16)
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    // No padding between a one-byte and a two-byte field.
    check_vector(
        &registry,
        packed,
        Value::record([
            ("first", Value::from(0xAAu8)),
            ("second", Value::from(0x0102u16)),
        ]),
        &[0xAA, 0x02, 0x01],
    );
}

#[test]
fn test_string_length_prefix_boundaries() {
    let mut registry = SchemaRegistry::new();
    let label = StructBuilder::new("Label")
        .field("text", TypeRef::STR)
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    // 63 bytes: single-byte prefix 63 << 2.
    let s63 = "a".repeat(63);
    let mut expected = vec![0xFCu8];
    expected.extend_from_slice(s63.as_bytes());
    check_vector(
        &registry,
        label,
        Value::record([("text", Value::from(s63))]),
        &expected,
    );

    // 64 bytes: two-byte prefix (64 << 2) | 0b01.
    let s64 = "a".repeat(64);
    let mut expected = vec![0x01u8, 0x01];
    expected.extend_from_slice(s64.as_bytes());
    check_vector(
        &registry,
        label,
        Value::record([("text", Value::from(s64))]),
        &expected,
    );
}

#[test]
fn test_u128_little_endian() {
    let mut registry = SchemaRegistry::new();
    let quantity = StructBuilder::new("Quantity")
        .field("amount", TypeRef::U128)
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    check_vector(
        &registry,
        quantity,
        Value::record([("amount", Value::from(1u128))]),
        &[
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ],
    );
}

#[test]
fn test_enum_discriminant_vectors() {
    let mut registry = SchemaRegistry::new();
    let event = EnumBuilder::new("AssetEvent")
        .variant("Created", TypeRef::STR)
        .variant("Deleted", TypeRef::STR)
        .variant("Added", TypeRef::STR)
        .variant("Removed", TypeRef::STR)
        .variant("MetadataInserted", TypeRef::STR)
        .variant("MetadataRemoved", TypeRef::STR)
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    check_vector(
        &registry,
        event,
        Value::variant("Created", Value::from("x")),
        &[0x00, 0x04, b'x'],
    );
    check_vector(
        &registry,
        event,
        Value::variant("MetadataInserted", Value::from("x")),
        &[0x04, 0x04, b'x'],
    );
    check_vector(
        &registry,
        event,
        Value::variant("MetadataRemoved", Value::from("x")),
        &[0x05, 0x04, b'x'],
    );
}

#[test]
fn test_unit_enum_is_bare_discriminant() {
    let mut registry = SchemaRegistry::new();
    let filter = EnumBuilder::new("AssetEventFilter")
        .unit_variant("ByCreated")
        .unit_variant("ByDeleted")
        .unit_variant("ByAdded")
        .unit_variant("ByRemoved")
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    check_vector(&registry, filter, Value::unit_variant("ByCreated"), &[0x00]);
    check_vector(&registry, filter, Value::unit_variant("ByRemoved"), &[0x03]);
}

#[test]
fn test_option_marker_vectors() {
    let mut registry = SchemaRegistry::new();
    let slot = StructBuilder::new("Slot")
        .optional_field("value", TypeRef::U32)
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    check_vector(&registry, slot, Value::record::<&str, _>([]), &[0x00]);
    check_vector(
        &registry,
        slot,
        Value::record([("value", Value::some(Value::from(7u32)))]),
        &[0x01, 0x07, 0x00, 0x00, 0x00],
    );
}

#[test]
fn test_container_vectors() {
    let mut registry = SchemaRegistry::new();
    let bag = StructBuilder::new("Bag")
        .field("items", TypeRef::list(TypeRef::U8))
        .field("weights", TypeRef::map(TypeRef::STR, TypeRef::U64))
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    check_vector(
        &registry,
        bag,
        Value::record([
            ("items", Value::List(Vec::new())),
            (
                "weights",
                Value::Map(vec![
                    (Value::from("a"), Value::from(1u64)),
                    (Value::from("b"), Value::from(2u64)),
                ]),
            ),
        ]),
        &[
            0x00, // empty list
            0x08, // two map entries
            0x04, b'a', 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // "a" -> 1
            0x04, b'b', 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // "b" -> 2
        ],
    );
}

#[test]
fn test_fixed_bytes_have_no_prefix() {
    let mut registry = SchemaRegistry::new();
    let stamp = StructBuilder::new("Stamp")
        .field("digest", TypeRef::fixed_bytes(4))
        .register(&mut registry)
        .expect("register");
    let registry = resolved(registry);

    check_vector(
        &registry,
        stamp,
        Value::record([("digest", Value::bytes([0xDE, 0xAD, 0xBE, 0xEF]))]),
        &[0xDE, 0xAD, 0xBE, 0xEF],
    );
}
