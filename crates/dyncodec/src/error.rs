// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error types.

use crate::wire::WireError;
use std::fmt;

/// Errors surfaced by codec construction, registration and use.
///
/// Configuration errors (`EmptyMessageName`, `UnresolvedMessage`,
/// `InvalidExtensionHost`, `ConflictingSchema`) are raised at
/// construction/registration time, never deferred to encode/decode of a
/// validly constructed codec.
#[derive(Debug)]
pub enum Error {
    /// A codec was requested for an empty message name.
    EmptyMessageName,
    /// The message name does not resolve inside the bound domain.
    UnresolvedMessage { name: String },
    /// An extension-host reference does not resolve to a registered
    /// extension provider.
    InvalidExtensionHost { name: String },
    /// Two descriptors claim the same name with different content.
    ConflictingSchema { name: String },
    /// A message of a different schema was handed to this codec.
    SchemaMismatch { expected: String, found: String },
    /// Delegated wire encode/decode failure.
    Wire(WireError),
    /// Codec transport (envelope) failure.
    Transport { reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessageName => write!(f, "message name must not be empty"),
            Self::UnresolvedMessage { name } => {
                write!(f, "message {} not found in schema domain", name)
            }
            Self::InvalidExtensionHost { name } => {
                write!(f, "invalid extension host: {} is not a registered extension provider", name)
            }
            Self::ConflictingSchema { name } => {
                write!(f, "conflicting schema definitions for {}", name)
            }
            Self::SchemaMismatch { expected, found } => {
                write!(f, "schema mismatch: codec is bound to {}, got {}", expected, found)
            }
            Self::Wire(e) => write!(f, "wire codec error: {}", e),
            Self::Transport { reason } => write!(f, "codec transport error: {}", reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

/// Crate-level result alias.
pub type Result<T> = core::result::Result<T, Error>;
