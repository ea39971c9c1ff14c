// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The runtime-bound message codec.
//!
//! A [`MessageCodec`] binds a schema domain and a message name, resolves
//! the descriptor lazily on first use, and delegates byte-level work to
//! the wire codec through the resolved [`Parser`].  Instances are
//! immutable; "modifying" operations return a new codec.

use crate::descriptor::SchemaDescriptor;
use crate::domain::SchemaDomain;
use crate::error::{Error, Result};
use crate::extension::validate_extension_hosts;
use crate::message::{DynamicMessage, Parser};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Encoder/decoder for structured messages whose schema is known only at
/// runtime.
///
/// Created via the factory methods, never by direct construction.  Two
/// codecs are equal iff their extension-host sets (as sets), their
/// domains and their message names are all equal; the memoized parser is
/// derived state and never participates in identity.
#[derive(Debug, Clone)]
pub struct MessageCodec {
    pub(crate) domain: Arc<SchemaDomain>,
    pub(crate) message_name: String,
    pub(crate) extension_hosts: BTreeSet<String>,
    // Memoized parser; process-local, rebuilt lazily after transport.
    pub(crate) parser: OnceLock<Parser>,
}

impl MessageCodec {
    /// Create a codec directly from a descriptor, building a
    /// single-schema domain (closed over nested types) from it.
    ///
    /// Never fails for a valid descriptor.  No extension providers.
    pub fn from_descriptor(descriptor: &Arc<SchemaDescriptor>) -> Self {
        Self {
            domain: Arc::new(SchemaDomain::build_from(descriptor)),
            message_name: descriptor.name.clone(),
            extension_hosts: BTreeSet::new(),
            parser: OnceLock::new(),
        }
    }

    /// Create a codec for a message name inside an existing domain.
    ///
    /// The domain is shared, not rebuilt: codecs over the same domain
    /// resolve equal descriptors for the same name, which matters for
    /// nested message fields compared across codec instances.
    pub fn from_domain(domain: &Arc<SchemaDomain>, message_name: &str) -> Result<Self> {
        if message_name.is_empty() {
            return Err(Error::EmptyMessageName);
        }
        if !domain.contains(message_name) {
            return Err(Error::UnresolvedMessage {
                name: message_name.to_string(),
            });
        }
        Ok(Self {
            domain: domain.clone(),
            message_name: message_name.to_string(),
            extension_hosts: BTreeSet::new(),
            parser: OnceLock::new(),
        })
    }

    /// Create a codec for a descriptor known to belong to an existing
    /// domain.
    pub fn from_domain_descriptor(
        domain: &Arc<SchemaDomain>,
        descriptor: &Arc<SchemaDescriptor>,
    ) -> Result<Self> {
        Self::from_domain(domain, &descriptor.name)
    }

    /// Return a codec like this one with the given extension hosts
    /// registered in addition to the receiver's.
    ///
    /// Each new reference is validated against the provider registry;
    /// the first invalid one aborts with an error identifying it.  The
    /// receiver is not modified.
    pub fn with_extensions_from<I, S>(&self, more_hosts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let validated = validate_extension_hosts(more_hosts)?;
        let mut extension_hosts = self.extension_hosts.clone();
        extension_hosts.extend(validated);
        Ok(Self {
            domain: self.domain.clone(),
            message_name: self.message_name.clone(),
            extension_hosts,
            parser: OnceLock::new(),
        })
    }

    /// The bound schema domain.
    pub fn domain(&self) -> &Arc<SchemaDomain> {
        &self.domain
    }

    /// The fully-qualified message name this codec encodes.
    pub fn message_name(&self) -> &str {
        &self.message_name
    }

    /// The registered extension-host references (unordered set).
    pub fn extension_hosts(&self) -> &BTreeSet<String> {
        &self.extension_hosts
    }

    /// Get the memoized parser, resolving it lazily on first use.
    ///
    /// Resolution looks the descriptor up in the bound domain, builds an
    /// empty message instance of that schema and takes its canonical
    /// parser.  Construction is pure, so a race between threads causes
    /// at worst redundant work; only one parser is ever published.
    pub fn parser(&self) -> Result<&Parser> {
        if let Some(parser) = self.parser.get() {
            return Ok(parser);
        }
        let descriptor = self.domain.descriptor(&self.message_name).ok_or_else(|| {
            Error::UnresolvedMessage {
                name: self.message_name.clone(),
            }
        })?;
        log::debug!("[MessageCodec] resolving parser for {}", self.message_name);
        let parser = DynamicMessage::new(descriptor).parser();
        Ok(self.parser.get_or_init(|| parser))
    }

    /// Encode a message to wire bytes.
    ///
    /// Fails with a schema mismatch if the message conforms to a
    /// different schema than the codec is bound to.  The check covers
    /// the full descriptor content, so a message built against a
    /// same-named schema with a different layout is rejected instead
    /// of being encoded in the foreign layout.
    pub fn encode(&self, message: &DynamicMessage) -> Result<Vec<u8>> {
        let parser = self.parser()?;
        if message.descriptor() != parser.descriptor() {
            return Err(Error::SchemaMismatch {
                expected: parser.descriptor().name.clone(),
                found: message.type_name().to_string(),
            });
        }
        Ok(parser.to_bytes(message)?)
    }

    /// Decode wire bytes into a message instance.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicMessage> {
        Ok(self.parser()?.parse(bytes)?)
    }
}

impl PartialEq for MessageCodec {
    fn eq(&self, other: &Self) -> bool {
        self.message_name == other.message_name
            && self.extension_hosts == other.extension_hosts
            && self.domain == other.domain
    }
}

impl Eq for MessageCodec {}

impl Hash for MessageCodec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.message_name.hash(state);
        self.extension_hosts.hash(state);
        self.domain.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SchemaBuilder;
    use crate::descriptor::PrimitiveKind;
    use crate::extension::test_support::register_stub;

    fn reading() -> Arc<SchemaDescriptor> {
        Arc::new(
            SchemaBuilder::new("sensor.Reading")
                .field("sensor_id", PrimitiveKind::U32)
                .field("temperature", PrimitiveKind::F64)
                .build(),
        )
    }

    #[test]
    fn test_from_descriptor_builds_domain() {
        let codec = MessageCodec::from_descriptor(&reading());
        assert_eq!(codec.message_name(), "sensor.Reading");
        assert!(codec.domain().contains("sensor.Reading"));
        assert!(codec.extension_hosts().is_empty());
    }

    #[test]
    fn test_from_domain_unresolved_name() {
        let domain = Arc::new(SchemaDomain::build_from(&reading()));
        let err = MessageCodec::from_domain(&domain, "sensor.Missing").expect_err("unresolved");
        assert!(matches!(err, Error::UnresolvedMessage { ref name } if name == "sensor.Missing"));

        let err = MessageCodec::from_domain(&domain, "").expect_err("empty");
        assert!(matches!(err, Error::EmptyMessageName));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = MessageCodec::from_descriptor(&reading());

        let mut msg = DynamicMessage::new(&reading());
        msg.set("sensor_id", 7u32).expect("set id");
        msg.set("temperature", 23.5f64).expect("set temp");

        let bytes = codec.encode(&msg).expect("encode");
        let decoded = codec.decode(&bytes).expect("decode");
        assert_eq!(decoded.get::<u32>("sensor_id").expect("id"), 7);
        assert_eq!(decoded.get::<f64>("temperature").expect("temp"), 23.5);
    }

    #[test]
    fn test_encode_rejects_foreign_schema() {
        let codec = MessageCodec::from_descriptor(&reading());
        let other = Arc::new(
            SchemaBuilder::new("sensor.Other")
                .field("n", PrimitiveKind::U32)
                .build(),
        );
        let err = codec.encode(&DynamicMessage::new(&other)).expect_err("mismatch");
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn test_encode_rejects_same_name_different_layout() {
        let codec = MessageCodec::from_descriptor(&reading());
        let wide = Arc::new(
            SchemaBuilder::new("sensor.Reading")
                .field("sensor_id", PrimitiveKind::U64)
                .field("temperature", PrimitiveKind::F64)
                .build(),
        );
        let mut msg = DynamicMessage::new(&wide);
        msg.set("sensor_id", u64::from(u32::MAX) + 42).expect("set");
        let err = codec.encode(&msg).expect_err("layout mismatch");
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn test_parser_memoized() {
        let codec = MessageCodec::from_descriptor(&reading());
        let first = codec.parser().expect("parser") as *const Parser;
        let second = codec.parser().expect("parser") as *const Parser;
        assert_eq!(first, second);
    }

    #[test]
    fn test_with_extensions_is_pure() {
        register_stub("ext.codec_test");
        let codec = MessageCodec::from_descriptor(&reading());

        let extended = codec.with_extensions_from(["ext.codec_test"]).expect("extend");
        assert!(codec.extension_hosts().is_empty());
        assert!(extended.extension_hosts().contains("ext.codec_test"));
        assert_ne!(codec, extended);

        // Empty addition yields an equal codec
        let same = codec.with_extensions_from(Vec::<String>::new()).expect("noop");
        assert_eq!(codec, same);
    }

    #[test]
    fn test_invalid_extension_aborts() {
        let codec = MessageCodec::from_descriptor(&reading());
        let err = codec
            .with_extensions_from(["ext.definitely_unregistered"])
            .expect_err("invalid");
        assert!(
            matches!(err, Error::InvalidExtensionHost { ref name } if name == "ext.definitely_unregistered")
        );
        assert!(codec.extension_hosts().is_empty());
    }
}
