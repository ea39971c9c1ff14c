// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cross-process transport envelope for the codec object itself.
//!
//! The domain reference and message name are resolved dynamically, not
//! hard-compiled, so the codec's transport protocol is explicit and
//! ordered: ordinary field state (the extension-host set) first, then
//! the schema domain, then the message name.  Writer and reader must
//! agree on this exact sequence; a silent reordering corrupts the
//! reconstructed codec without any detectable error, which is why the
//! order is pinned here in one place and asserted by tests.
//!
//! The memoized parser never travels: it is derived, process-local state
//! and is recomputed lazily on first use after reconstruction.

use crate::codec::MessageCodec;
use crate::domain::SchemaDomain;
use crate::error::{Error, Result};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Envelope contract version.  Bump on any change to the field sequence.
pub const ENVELOPE_VERSION: u32 = 1;

// Tail order: version, extension hosts, domain, message name.
impl Serialize for MessageCodec {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&ENVELOPE_VERSION)?;
        tuple.serialize_element(&self.extension_hosts)?;
        tuple.serialize_element(self.domain.as_ref())?;
        tuple.serialize_element(&self.message_name)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for MessageCodec {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<Self, D::Error> {
        struct EnvelopeVisitor;

        impl<'de> Visitor<'de> for EnvelopeVisitor {
            type Value = MessageCodec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a versioned codec envelope")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> core::result::Result<Self::Value, A::Error> {
                let version: u32 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::custom("missing envelope version"))?;
                if version != ENVELOPE_VERSION {
                    return Err(de::Error::custom(format!(
                        "unsupported codec envelope version: {}",
                        version
                    )));
                }
                let extension_hosts: BTreeSet<String> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::custom("missing extension hosts"))?;
                let domain: SchemaDomain = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::custom("missing schema domain"))?;
                let message_name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::custom("missing message name"))?;

                Ok(MessageCodec {
                    domain: Arc::new(domain),
                    message_name,
                    extension_hosts,
                    // Parser is rebuilt lazily in the receiving process.
                    parser: OnceLock::new(),
                })
            }
        }

        deserializer.deserialize_tuple(4, EnvelopeVisitor)
    }
}

impl MessageCodec {
    /// Serialize this codec into transportable envelope bytes.
    pub fn transport_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Transport {
            reason: e.to_string(),
        })
    }

    /// Reconstruct a codec from envelope bytes produced by
    /// [`MessageCodec::transport_bytes`].
    pub fn from_transport_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::Transport {
            reason: e.to_string(),
        })
    }
}
