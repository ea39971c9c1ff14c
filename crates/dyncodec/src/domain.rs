// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema domains: deduplicating registries of schema descriptors.
//!
//! A [`SchemaDomain`] maps fully-qualified message names to resolved
//! descriptors.  Equality is content-based, so a domain serialized on one
//! process and reconstructed on another compares equal to the original,
//! and descriptors resolved by name from equal domains compare equal.
//!
//! Domains are never mutated after construction; codecs share them as
//! `Arc<SchemaDomain>`.

use crate::descriptor::SchemaDescriptor;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A registry of schema descriptors supporting identity-preserving
/// lookup by message name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaDomain {
    // BTreeMap keeps iteration, hashing and serialization deterministic.
    schemas: BTreeMap<String, Arc<SchemaDescriptor>>,
}

impl SchemaDomain {
    /// Build a single-root domain from a descriptor, closing over every
    /// message type its fields reference.
    ///
    /// Duplicate nested names with identical content deduplicate; a
    /// conflicting redefinition keeps the first registration and logs a
    /// warning (the input graph is malformed in that case).
    pub fn build_from(descriptor: &Arc<SchemaDescriptor>) -> Self {
        let mut schemas = BTreeMap::new();
        collect(&mut schemas, descriptor);
        log::debug!(
            "[SchemaDomain] built domain with {} schemas from {}",
            schemas.len(),
            descriptor.name
        );
        Self { schemas }
    }

    /// Build a domain from several root descriptors, closing over nested
    /// message types.
    ///
    /// Fails if two descriptors claim the same name with different
    /// content.
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<SchemaDescriptor>>,
    {
        let mut schemas = BTreeMap::new();
        for descriptor in descriptors {
            try_collect(&mut schemas, &descriptor)?;
        }
        Ok(Self { schemas })
    }

    /// Look up a descriptor by fully-qualified message name.
    pub fn descriptor(&self, name: &str) -> Option<&Arc<SchemaDescriptor>> {
        self.schemas.get(name)
    }

    /// Whether the domain contains the given message name.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered message names, in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if no schemas are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Recursive closure collection, first registration wins.
fn collect(schemas: &mut BTreeMap<String, Arc<SchemaDescriptor>>, descriptor: &Arc<SchemaDescriptor>) {
    if let Some(existing) = schemas.get(&descriptor.name) {
        if existing != descriptor {
            log::warn!(
                "[SchemaDomain] conflicting redefinition of {} ignored",
                descriptor.name
            );
        }
        return;
    }
    schemas.insert(descriptor.name.clone(), descriptor.clone());
    for nested in descriptor.nested_messages() {
        collect(schemas, nested);
    }
}

/// Recursive closure collection, conflicting redefinitions are errors.
fn try_collect(
    schemas: &mut BTreeMap<String, Arc<SchemaDescriptor>>,
    descriptor: &Arc<SchemaDescriptor>,
) -> Result<()> {
    if let Some(existing) = schemas.get(&descriptor.name) {
        if existing != descriptor {
            return Err(Error::ConflictingSchema {
                name: descriptor.name.clone(),
            });
        }
        return Ok(());
    }
    schemas.insert(descriptor.name.clone(), descriptor.clone());
    for nested in descriptor.nested_messages() {
        try_collect(schemas, nested)?;
    }
    Ok(())
}
