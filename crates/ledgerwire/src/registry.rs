// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 ledgerwire developers

//! Schema registry with deferred name resolution.
//!
//! Declarations go through two phases. During load, descriptors are
//! registered under unique names and may reference each other by name in any
//! order, including cycles. [`SchemaRegistry::resolve_all`] then rewrites
//! every pending name into a [`DefId`] handle in a single fixed-point pass;
//! a name with no definition fails the whole pass. Once resolved, the
//! registry is frozen: further registration is rejected, and the table is
//! safe for unsynchronized concurrent reads (wrap it in an `Arc`).

use crate::descriptor::{TypeDescriptor, TypeRef, MAX_ENUM_VARIANTS};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// Handle to a registered type definition.
///
/// Only valid for the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefId(u32);

impl DefId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors raised during schema registration and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A type with this name is already registered.
    DuplicateDefinition(String),
    /// A struct declares the same field name twice.
    DuplicateField { ty: String, field: String },
    /// An enum declares the same variant name twice.
    DuplicateVariant { ty: String, variant: String },
    /// An enum exceeds the one-byte discriminant space.
    TooManyVariants { ty: String, count: usize },
    /// A name reference had no definition when the resolution pass ran.
    UnresolvedType { name: String, referenced_by: String },
    /// Registration attempted after the registry was resolved.
    RegistryFrozen(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDefinition(name) => {
                write!(f, "type '{}' is already registered", name)
            }
            Self::DuplicateField { ty, field } => {
                write!(f, "struct '{}' declares field '{}' twice", ty, field)
            }
            Self::DuplicateVariant { ty, variant } => {
                write!(f, "enum '{}' declares variant '{}' twice", ty, variant)
            }
            Self::TooManyVariants { ty, count } => write!(
                f,
                "enum '{}' declares {} variants, limit is {}",
                ty, count, MAX_ENUM_VARIANTS
            ),
            Self::UnresolvedType {
                name,
                referenced_by,
            } => write!(
                f,
                "type '{}' referenced by '{}' is not registered",
                name, referenced_by
            ),
            Self::RegistryFrozen(name) => {
                write!(f, "cannot register '{}': registry is already resolved", name)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Name-keyed table of type definitions.
///
/// Single writer during load, read-only after [`Self::resolve_all`]. The
/// in-memory layout is a definition table plus a name index; resolved
/// references point into the table by [`DefId`], which carries recursive and
/// mutually recursive schemas without reference cycles.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    defs: Vec<TypeDescriptor>,
    by_name: HashMap<String, DefId>,
    resolved: bool,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its name.
    ///
    /// The descriptor may reference not-yet-registered names; those stay
    /// pending until [`Self::resolve_all`].
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<DefId, SchemaError> {
        if self.resolved {
            return Err(SchemaError::RegistryFrozen(descriptor.name));
        }
        check_shape(&descriptor)?;

        let id = DefId(self.defs.len() as u32);
        match self.by_name.entry(descriptor.name.clone()) {
            Entry::Occupied(_) => return Err(SchemaError::DuplicateDefinition(descriptor.name)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        log::trace!("registered type '{}' as {:?}", descriptor.name, id);
        self.defs.push(descriptor);
        Ok(id)
    }

    /// Look up a definition handle by name.
    pub fn lookup(&self, name: &str) -> Option<DefId> {
        self.by_name.get(name).copied()
    }

    /// Get a descriptor by handle.
    pub fn get(&self, id: DefId) -> Option<&TypeDescriptor> {
        self.defs.get(id.index())
    }

    /// Descriptor for a handle issued by this registry.
    ///
    /// Internal accessor for code paths that hold a `DefId` obtained from
    /// this registry, where absence would be a logic bug.
    pub(crate) fn descriptor(&self, id: DefId) -> &TypeDescriptor {
        &self.defs[id.index()]
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Whether the resolution pass has completed.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Resolve every pending name reference in every registered descriptor.
    ///
    /// All-or-nothing: the first dangling name aborts the pass with
    /// [`SchemaError::UnresolvedType`] and leaves the registry unresolved.
    /// Calling this on an already-resolved registry is a no-op.
    pub fn resolve_all(&mut self) -> Result<(), SchemaError> {
        if self.resolved {
            return Ok(());
        }

        // Validate first so the rewrite below cannot fail halfway through.
        for def in &self.defs {
            for r in def.refs() {
                check_names(r, &self.by_name, &def.name)?;
            }
        }

        let Self { defs, by_name, .. } = self;
        for def in defs.iter_mut() {
            for r in def.refs_mut() {
                rewrite(r, by_name);
            }
        }

        self.resolved = true;
        log::debug!("resolved {} type definitions", self.defs.len());
        Ok(())
    }
}

/// Reject malformed descriptors at registration time.
fn check_shape(descriptor: &TypeDescriptor) -> Result<(), SchemaError> {
    match &descriptor.kind {
        crate::descriptor::TypeKind::Struct(fields) => {
            for (i, field) in fields.iter().enumerate() {
                if fields[..i].iter().any(|f| f.name == field.name) {
                    return Err(SchemaError::DuplicateField {
                        ty: descriptor.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }
        crate::descriptor::TypeKind::Enum(e) => {
            if e.variants.len() > MAX_ENUM_VARIANTS {
                return Err(SchemaError::TooManyVariants {
                    ty: descriptor.name.clone(),
                    count: e.variants.len(),
                });
            }
            for (i, variant) in e.variants.iter().enumerate() {
                if e.variants[..i].iter().any(|v| v.name == variant.name) {
                    return Err(SchemaError::DuplicateVariant {
                        ty: descriptor.name.clone(),
                        variant: variant.name.clone(),
                    });
                }
            }
        }
        crate::descriptor::TypeKind::Tuple(_) => {}
    }
    Ok(())
}

fn check_names(
    r: &TypeRef,
    by_name: &HashMap<String, DefId>,
    referrer: &str,
) -> Result<(), SchemaError> {
    match r {
        TypeRef::Named(name) => {
            if by_name.contains_key(name) {
                Ok(())
            } else {
                Err(SchemaError::UnresolvedType {
                    name: name.clone(),
                    referenced_by: referrer.to_string(),
                })
            }
        }
        TypeRef::List(inner) | TypeRef::Option(inner) => check_names(inner, by_name, referrer),
        TypeRef::Map(k, v) => {
            check_names(k, by_name, referrer)?;
            check_names(v, by_name, referrer)
        }
        TypeRef::Primitive(_) | TypeRef::FixedBytes(_) | TypeRef::Def(_) => Ok(()),
    }
}

/// Rewrite `Named` into `Def`. Names were validated, so lookups succeed.
fn rewrite(r: &mut TypeRef, by_name: &HashMap<String, DefId>) {
    match r {
        TypeRef::Named(name) => {
            if let Some(id) = by_name.get(name.as_str()) {
                *r = TypeRef::Def(*id);
            }
        }
        TypeRef::List(inner) | TypeRef::Option(inner) => rewrite(inner, by_name),
        TypeRef::Map(k, v) => {
            rewrite(k, by_name);
            rewrite(v, by_name);
        }
        TypeRef::Primitive(_) | TypeRef::FixedBytes(_) | TypeRef::Def(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumDescriptor, EnumVariant, FieldSpec, TypeKind};

    fn point() -> TypeDescriptor {
        TypeDescriptor::new(
            "Point",
            TypeKind::Struct(vec![
                FieldSpec::new("x", TypeRef::U32),
                FieldSpec::new("y", TypeRef::U32),
            ]),
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = SchemaRegistry::new();
        let id = registry.register(point()).expect("register");
        assert_eq!(registry.lookup("Point"), Some(id));
        assert_eq!(registry.get(id).map(|d| d.name.as_str()), Some("Point"));
        assert!(registry.lookup("Line").is_none());
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(point()).expect("first");
        let err = registry.register(point()).expect_err("second");
        assert_eq!(err, SchemaError::DuplicateDefinition("Point".into()));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut registry = SchemaRegistry::new();
        let desc = TypeDescriptor::new(
            "Bad",
            TypeKind::Struct(vec![
                FieldSpec::new("a", TypeRef::U32),
                FieldSpec::new("a", TypeRef::U64),
            ]),
        );
        let err = registry.register(desc).expect_err("duplicate field");
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_forward_reference_resolves() {
        let mut registry = SchemaRegistry::new();
        let event = TypeDescriptor::new(
            "AccountEvent",
            TypeKind::Enum(EnumDescriptor::new(vec![
                EnumVariant::new("Created", TypeRef::named("AccountId")),
                EnumVariant::unit("Deleted"),
            ])),
        );
        registry.register(event).expect("enum first");
        let id_desc = TypeDescriptor::new(
            "AccountId",
            TypeKind::Struct(vec![FieldSpec::new("name", TypeRef::STR)]),
        );
        let account_id = registry.register(id_desc).expect("struct second");

        registry.resolve_all().expect("resolve");
        assert!(registry.is_resolved());

        let event = registry.get(registry.lookup("AccountEvent").unwrap()).unwrap();
        let created = event.as_enum().unwrap().variant("Created").unwrap();
        assert_eq!(created.payload, Some(TypeRef::Def(account_id)));
    }

    #[test]
    fn test_dangling_reference_fails() {
        let mut registry = SchemaRegistry::new();
        let desc = TypeDescriptor::new(
            "Holder",
            TypeKind::Struct(vec![FieldSpec::new("inner", TypeRef::named("Z"))]),
        );
        registry.register(desc).expect("register");
        let err = registry.resolve_all().expect_err("dangling");
        assert_eq!(
            err,
            SchemaError::UnresolvedType {
                name: "Z".into(),
                referenced_by: "Holder".into(),
            }
        );
        assert!(!registry.is_resolved());
    }

    #[test]
    fn test_resolve_all_is_idempotent() {
        let mut registry = SchemaRegistry::new();
        let desc = TypeDescriptor::new(
            "Chain",
            TypeKind::Struct(vec![FieldSpec::new(
                "next",
                TypeRef::option(TypeRef::named("Chain")),
            )]),
        );
        registry.register(desc).expect("register");
        registry.resolve_all().expect("first pass");
        let snapshot = format!("{:?}", registry);
        registry.resolve_all().expect("second pass");
        assert_eq!(snapshot, format!("{:?}", registry));
    }

    #[test]
    fn test_register_after_resolve_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(point()).expect("register");
        registry.resolve_all().expect("resolve");
        let err = registry.register(point()).expect_err("frozen");
        assert!(matches!(err, SchemaError::RegistryFrozen(_)));
    }

    #[test]
    fn test_self_reference_resolves_without_cycles() {
        let mut registry = SchemaRegistry::new();
        let desc = TypeDescriptor::new(
            "Tree",
            TypeKind::Struct(vec![FieldSpec::new(
                "children",
                TypeRef::list(TypeRef::named("Tree")),
            )]),
        );
        let id = registry.register(desc).expect("register");
        registry.resolve_all().expect("resolve");
        let tree = registry.get(id).unwrap();
        assert_eq!(
            tree.field("children").map(|f| &f.ty),
            Some(&TypeRef::list(TypeRef::Def(id)))
        );
    }
}
