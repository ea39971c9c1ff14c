// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic codec-provider hook for host frameworks.
//!
//! A framework that selects codecs automatically for arbitrary runtime
//! types calls [`codec_provider`] for the dynamic-message case: the
//! returned provider builds a [`MessageCodec`] when the requested type is
//! a structured message, and reports a descriptive "cannot provide"
//! failure otherwise.

use crate::codec::MessageCodec;
use crate::descriptor::SchemaDescriptor;
use std::fmt;
use std::sync::Arc;

/// Runtime token describing the type a codec is requested for.
#[derive(Debug, Clone)]
pub enum RuntimeType {
    /// A structured message type, carrying its resolved descriptor.
    Message(Arc<SchemaDescriptor>),
    /// Any other runtime type, identified by name only.
    Named(String),
}

impl RuntimeType {
    /// The type's name.
    pub fn name(&self) -> &str {
        match self {
            Self::Message(desc) => &desc.name,
            Self::Named(name) => name,
        }
    }
}

/// Failure to provide a codec for a requested runtime type.
#[derive(Debug)]
pub struct CannotProvideCodec {
    /// The offending type.
    pub type_name: String,
    /// Why no codec could be provided.
    pub reason: String,
}

impl fmt::Display for CannotProvideCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot provide a codec for {}: {}",
            self.type_name, self.reason
        )
    }
}

impl std::error::Error for CannotProvideCodec {}

/// Provider of codecs for runtime types.
pub trait CodecProvider {
    /// Produce a codec for the requested type, given codecs already
    /// selected for its component types.
    fn codec_for(
        &self,
        ty: &RuntimeType,
        component_codecs: &[MessageCodec],
    ) -> core::result::Result<MessageCodec, CannotProvideCodec>;
}

/// [`CodecProvider`] for structured message types.
#[derive(Debug, Default)]
pub struct DynamicCodecProvider;

impl CodecProvider for DynamicCodecProvider {
    fn codec_for(
        &self,
        ty: &RuntimeType,
        _component_codecs: &[MessageCodec],
    ) -> core::result::Result<MessageCodec, CannotProvideCodec> {
        match ty {
            RuntimeType::Message(descriptor) => Ok(MessageCodec::from_descriptor(descriptor)),
            RuntimeType::Named(name) => Err(CannotProvideCodec {
                type_name: name.clone(),
                reason: "not a structured message type".into(),
            }),
        }
    }
}

/// Entry point handed to the host framework's codec-selection machinery.
pub fn codec_provider() -> DynamicCodecProvider {
    DynamicCodecProvider
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SchemaBuilder;
    use crate::descriptor::PrimitiveKind;

    #[test]
    fn test_provides_for_message_type() {
        let desc = Arc::new(
            SchemaBuilder::new("acme.Event")
                .field("seq", PrimitiveKind::U64)
                .build(),
        );
        let provider = codec_provider();
        let codec = provider
            .codec_for(&RuntimeType::Message(desc), &[])
            .expect("provide");
        assert_eq!(codec.message_name(), "acme.Event");
    }

    #[test]
    fn test_cannot_provide_names_the_type() {
        let provider = codec_provider();
        let err = provider
            .codec_for(&RuntimeType::Named("std.collections.Vec".into()), &[])
            .expect_err("cannot provide");
        assert_eq!(
            err.to_string(),
            "cannot provide a codec for std.collections.Vec: not a structured message type"
        );
    }
}
