// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

#![allow(clippy::uninlined_format_args)] // Example code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Examples panic on failure

//! Declares a small ledger schema, builds a domain instance, and prints its
//! canonical encoding.
//!
//! Run with: `cargo run --example ledger_schema`

use ledgerwire::{wire, Instance, SchemaRegistry, StructBuilder, TypeRef, Value};
use std::sync::Arc;

fn main() {
    // Declaration phase: types may reference each other by name in any order.
    let mut registry = SchemaRegistry::new();
    let domain = StructBuilder::new("Domain")
        .named_field("id", "DomainId")
        .optional_field("logo", TypeRef::STR)
        .field("account_names", TypeRef::list(TypeRef::STR))
        .register(&mut registry)
        .expect("register Domain");
    StructBuilder::new("DomainId")
        .field("name", TypeRef::STR)
        .register(&mut registry)
        .expect("register DomainId");

    // One resolution pass, then the registry is frozen and shareable.
    registry.resolve_all().expect("resolve");
    let registry = Arc::new(registry);

    let wonderland = Instance::new(
        &registry,
        domain,
        Value::record([
            ("id", Value::record([("name", Value::from("wonderland"))])),
            ("account_names", Value::from(vec!["alice", "bob"])),
        ]),
    )
    .expect("construct");

    let bytes = wire::encode(&wonderland).expect("encode");
    print!("Domain 'wonderland' encodes to {} bytes:", bytes.len());
    for (i, byte) in bytes.iter().enumerate() {
        if i % 16 == 0 {
            println!();
            print!("  {:04x}  ", i);
        }
        print!("{:02x} ", byte);
    }
    println!();

    let decoded = wire::decode(&bytes, &registry, domain).expect("decode");
    assert_eq!(decoded, wonderland);
    println!("Round-trip OK: decode(encode(v)) == v");
}
