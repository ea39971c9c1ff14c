// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # dyncodec - Transportable runtime-schema message codec
//!
//! A binary codec for structured messages whose schema is known only at
//! runtime.  The codec itself can be shipped across process boundaries
//! (for example from a coordinating process to distributed workers) and
//! reconstructs a working encoder/decoder there, without the receiving
//! process having compiled message structs available: the schema domain
//! and message name travel with the codec, and the parser is rebuilt
//! lazily on first use.
//!
//! ## Quick Start
//!
//! ```rust
//! use dyncodec::{MessageCodec, SchemaBuilder, PrimitiveKind, DynamicMessage};
//! use std::sync::Arc;
//!
//! # fn main() -> dyncodec::Result<()> {
//! // Describe a message type at runtime
//! let descriptor = Arc::new(
//!     SchemaBuilder::new("sensor.Reading")
//!         .field("sensor_id", PrimitiveKind::U32)
//!         .field("temperature", PrimitiveKind::F64)
//!         .build(),
//! );
//!
//! // Build a codec and encode a message
//! let codec = MessageCodec::from_descriptor(&descriptor);
//! let mut reading = DynamicMessage::new(&descriptor);
//! reading.set("sensor_id", 42u32).unwrap();
//! reading.set("temperature", 23.5f64).unwrap();
//! let bytes = codec.encode(&reading)?;
//!
//! // Ship the codec itself elsewhere and decode there
//! let transported = MessageCodec::from_transport_bytes(&codec.transport_bytes()?)?;
//! let decoded = transported.decode(&bytes)?;
//! assert_eq!(decoded.get::<f64>("temperature").unwrap(), 23.5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MessageCodec`] | Runtime-bound encoder/decoder, the unit of transport |
//! | [`SchemaDomain`] | Deduplicating registry of schema descriptors |
//! | [`SchemaDescriptor`] | Runtime description of one message layout |
//! | [`DynamicMessage`] | Message instance conforming to a descriptor |
//! | [`Parser`] | Derived, schema-bound decode capability (never transported) |
//!
//! ## Modules Overview
//!
//! - [`codec`] - The message codec and its factories (start here)
//! - [`domain`] - Schema domains
//! - [`descriptor`] / [`builder`] - Runtime schema descriptions
//! - [`message`] / [`value`] - Dynamic message instances
//! - [`wire`] - Byte-level message encoding
//! - [`extension`] - Extension providers and their registry
//! - [`envelope`] - Cross-process transport of the codec itself
//! - [`provider`] - Codec-provider hook for host frameworks

/// Fluent builder for schema descriptors.
pub mod builder;
/// The runtime-bound message codec.
pub mod codec;
/// Schema descriptors (runtime type descriptions).
pub mod descriptor;
/// Schema domains (descriptor registries).
pub mod domain;
/// Cross-process transport envelope for codecs.
pub mod envelope;
/// Crate-level error types.
pub mod error;
/// Extension providers and the process-local registry.
pub mod extension;
/// Dynamic message instances and parsers.
pub mod message;
/// Codec-provider hook for host frameworks.
pub mod provider;
/// Runtime field values.
pub mod value;
/// Byte-level wire encoding for messages.
pub mod wire;

pub use builder::SchemaBuilder;
pub use codec::MessageCodec;
pub use descriptor::{
    EnumDescriptor, EnumVariant, FieldDescriptor, FieldKind, PrimitiveKind, SchemaDescriptor,
};
pub use domain::SchemaDomain;
pub use envelope::ENVELOPE_VERSION;
pub use error::{Error, Result};
pub use extension::{lookup_provider, register_provider, ExtensionProvider};
pub use message::{DynamicMessage, FromValue, IntoValue, Parser};
pub use provider::{codec_provider, CannotProvideCodec, CodecProvider, RuntimeType};
pub use value::Value;
pub use wire::WireError;
