// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Extension providers and the process-local provider registry.
//!
//! An extension provider augments a schema with optional fields.  Codecs
//! store providers by symbolic name so the references survive transport;
//! the receiving process resolves them against its own registry.
//!
//! This module only validates and stores references.  The extension
//! resolution algorithm itself lives with the provider implementations.

use crate::descriptor::FieldDescriptor;
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

/// A source of optional schema fields.
pub trait ExtensionProvider: Send + Sync {
    /// Symbolic name the provider is registered and transported under.
    fn provider_name(&self) -> &str;

    /// Extension fields this provider contributes to the given message
    /// type.  Empty if the provider does not extend it.
    fn extension_fields(&self, message_name: &str) -> Vec<FieldDescriptor>;
}

fn registry() -> &'static DashMap<String, Arc<dyn ExtensionProvider>> {
    static REGISTRY: OnceLock<DashMap<String, Arc<dyn ExtensionProvider>>> = OnceLock::new();
    REGISTRY.get_or_init(DashMap::new)
}

/// Register an extension provider under its own name.
///
/// Re-registering a name replaces the previous provider.
pub fn register_provider(provider: Arc<dyn ExtensionProvider>) {
    let name = provider.provider_name().to_string();
    log::debug!("[extension] registering provider {}", name);
    registry().insert(name, provider);
}

/// Resolve a provider reference against the process-local registry.
pub fn lookup_provider(name: &str) -> Option<Arc<dyn ExtensionProvider>> {
    registry().get(name).map(|entry| entry.value().clone())
}

/// Validate extension-host references against the registry.
///
/// Each reference is checked individually; the first one that does not
/// resolve aborts the whole registration with an error identifying it.
/// Valid references dedupe into an unordered set.
pub fn validate_extension_hosts<I, S>(names: I) -> Result<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut validated = BTreeSet::new();
    for name in names {
        let name = name.into();
        if lookup_provider(&name).is_none() {
            return Err(Error::InvalidExtensionHost { name });
        }
        validated.insert(name);
    }
    Ok(validated)
}


#[cfg(test)]
mod tests {
    use super::test_support::register_stub;
    use super::*;

    #[test]
    fn test_validate_accepts_registered() {
        register_stub("ext.alpha");
        register_stub("ext.beta");

        let hosts =
            validate_extension_hosts(["ext.alpha", "ext.beta", "ext.alpha"]).expect("valid");
        assert_eq!(hosts.len(), 2);
        assert!(hosts.contains("ext.alpha"));
    }

    #[test]
    fn test_validate_rejects_unknown() {
        register_stub("ext.known");

        let err = validate_extension_hosts(["ext.known", "ext.missing"]).expect_err("invalid");
        assert!(matches!(err, Error::InvalidExtensionHost { ref name } if name == "ext.missing"));
    }

    #[test]
    fn test_lookup_resolves_registered() {
        register_stub("ext.lookup");
        let provider = lookup_provider("ext.lookup").expect("registered");
        assert_eq!(provider.provider_name(), "ext.lookup");
        assert!(lookup_provider("ext.nope").is_none());
    }
}
