// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte-level wire encoding for dynamic messages.
//!
//! Little-endian, aligned encoding with length-prefixed strings and
//! repeated fields.  Fields are written in descriptor order, so the
//! output is byte-for-byte identical to what a statically bound codec
//! for the same schema would produce.
//!
//! This module knows nothing about schema domains or codec transport;
//! it is handed an already-resolved descriptor and a value tree.

use crate::descriptor::{FieldKind, PrimitiveKind, SchemaDescriptor};
use crate::message::DynamicMessage;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Errors for wire encode/decode operations.
#[derive(Debug)]
pub enum WireError {
    BufferTooSmall { need: usize, have: usize },
    InvalidData(String),
    TypeMismatch { expected: String, found: String },
    Utf8Error(std::string::FromUtf8Error),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { need, have } => {
                write!(f, "Buffer too small: need {} bytes, have {}", need, have)
            }
            Self::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Self::Utf8Error(e) => write!(f, "UTF-8 error: {}", e),
        }
    }
}

impl std::error::Error for WireError {}

impl From<std::string::FromUtf8Error> for WireError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Utf8Error(e)
    }
}

/// Encode a dynamic message to wire bytes using its own descriptor.
pub fn encode_message(message: &DynamicMessage) -> Result<Vec<u8>, WireError> {
    encode_with(message.value(), message.descriptor())
}

/// Encode a value tree against an explicit schema descriptor.
///
/// The descriptor decides the layout: a value tree that does not
/// conform to it fails with a type mismatch instead of being written
/// in a foreign layout.
pub fn encode_with(value: &Value, descriptor: &SchemaDescriptor) -> Result<Vec<u8>, WireError> {
    let mut encoder = Encoder::new();
    encoder.encode_fields(value, descriptor)?;
    Ok(encoder.into_bytes())
}

/// Decode wire bytes into a dynamic message.
pub fn decode_message(
    bytes: &[u8],
    descriptor: &Arc<SchemaDescriptor>,
) -> Result<DynamicMessage, WireError> {
    let mut decoder = Decoder::new(bytes);
    let value = decoder.decode_fields(descriptor)?;
    Ok(DynamicMessage::from_value(descriptor, value))
}

/// Wire encoder for dynamic values.
struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn align(&mut self, alignment: usize) {
        let padding = (alignment - (self.buffer.len() % alignment)) % alignment;
        self.buffer.extend(std::iter::repeat_n(0, padding));
    }

    fn encode_fields(
        &mut self,
        value: &Value,
        descriptor: &SchemaDescriptor,
    ) -> Result<(), WireError> {
        if let Value::Message(map) = value {
            for field in &descriptor.fields {
                let field_value = map.get(&field.name).ok_or_else(|| {
                    WireError::InvalidData(format!("Missing field: {}", field.name))
                })?;
                self.encode_value(field_value, &field.kind)?;
            }
            Ok(())
        } else {
            Err(WireError::TypeMismatch {
                expected: "message".into(),
                found: format!("{:?}", value),
            })
        }
    }

    fn encode_value(&mut self, value: &Value, kind: &FieldKind) -> Result<(), WireError> {
        match kind {
            FieldKind::Primitive(p) => self.encode_primitive(value, p),
            FieldKind::Enum(_) => {
                if let Value::Enum(val, _) = value {
                    self.align(kind.alignment());
                    self.buffer.extend(&val.to_le_bytes());
                    Ok(())
                } else {
                    Err(WireError::TypeMismatch {
                        expected: "enum".into(),
                        found: format!("{:?}", value),
                    })
                }
            }
            FieldKind::Message(inner) => self.encode_fields(value, inner),
            FieldKind::Repeated(elem) => {
                if let Value::Repeated(vec) = value {
                    // Write length
                    self.align(4);
                    self.buffer.extend(&(vec.len() as u32).to_le_bytes());
                    // Write elements
                    for e in vec {
                        self.encode_value(e, elem)?;
                    }
                    Ok(())
                } else {
                    Err(WireError::TypeMismatch {
                        expected: "repeated".into(),
                        found: format!("{:?}", value),
                    })
                }
            }
        }
    }

    fn encode_primitive(&mut self, value: &Value, kind: &PrimitiveKind) -> Result<(), WireError> {
        self.align(kind.alignment());
        if let Some(size) = kind.size() {
            self.buffer.reserve(size);
        }
        match (value, kind) {
            (Value::Bool(v), PrimitiveKind::Bool) => {
                self.buffer.push(u8::from(*v));
            }
            (Value::U8(v), PrimitiveKind::U8) => {
                self.buffer.push(*v);
            }
            (Value::U16(v), PrimitiveKind::U16) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::U32(v), PrimitiveKind::U32) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::U64(v), PrimitiveKind::U64) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::I8(v), PrimitiveKind::I8) => {
                self.buffer.push(*v as u8);
            }
            (Value::I16(v), PrimitiveKind::I16) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::I32(v), PrimitiveKind::I32) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::I64(v), PrimitiveKind::I64) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::F32(v), PrimitiveKind::F32) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::F64(v), PrimitiveKind::F64) => {
                self.buffer.extend(&v.to_le_bytes());
            }
            (Value::String(s), PrimitiveKind::String { max_length }) => {
                if let Some(max) = max_length {
                    if s.len() > *max {
                        return Err(WireError::InvalidData("string exceeds bound".into()));
                    }
                }
                let bytes = s.as_bytes();
                self.buffer.extend(&(bytes.len() as u32).to_le_bytes());
                self.buffer.extend(bytes);
            }
            _ => {
                return Err(WireError::TypeMismatch {
                    expected: format!("{:?}", kind),
                    found: format!("{:?}", value),
                });
            }
        }
        Ok(())
    }
}

/// Wire decoder for dynamic values.
struct Decoder<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Decoder<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    fn align(&mut self, alignment: usize) {
        self.offset = (self.offset + alignment - 1) & !(alignment - 1);
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], WireError> {
        if self.offset + count > self.buffer.len() {
            return Err(WireError::BufferTooSmall {
                need: count,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, WireError> {
        self.align(4);
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn decode_fields(&mut self, descriptor: &SchemaDescriptor) -> Result<Value, WireError> {
        let mut map = HashMap::new();
        for field in &descriptor.fields {
            let value = self.decode_value(&field.kind)?;
            map.insert(field.name.clone(), value);
        }
        Ok(Value::Message(map))
    }

    fn decode_value(&mut self, kind: &FieldKind) -> Result<Value, WireError> {
        match kind {
            FieldKind::Primitive(p) => self.decode_primitive(p),
            FieldKind::Enum(e) => {
                self.align(kind.alignment());
                let bytes = self.read_bytes(4)?;
                let val = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                let name = e
                    .variant_by_value(val)
                    .map(|v| v.name.clone())
                    .unwrap_or_default();
                Ok(Value::Enum(val, name))
            }
            FieldKind::Message(inner) => self.decode_fields(inner),
            FieldKind::Repeated(elem) => {
                let len = self.read_u32()? as usize;
                let mut vec = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    vec.push(self.decode_value(elem)?);
                }
                Ok(Value::Repeated(vec))
            }
        }
    }

    fn decode_primitive(&mut self, kind: &PrimitiveKind) -> Result<Value, WireError> {
        self.align(kind.alignment());
        match kind {
            PrimitiveKind::Bool => {
                let bytes = self.read_bytes(1)?;
                Ok(Value::Bool(bytes[0] != 0))
            }
            PrimitiveKind::U8 => {
                let bytes = self.read_bytes(1)?;
                Ok(Value::U8(bytes[0]))
            }
            PrimitiveKind::U16 => {
                let bytes = self.read_bytes(2)?;
                Ok(Value::U16(u16::from_le_bytes([bytes[0], bytes[1]])))
            }
            PrimitiveKind::U32 => Ok(Value::U32(self.read_u32()?)),
            PrimitiveKind::U64 => {
                let bytes = self.read_bytes(8)?;
                Ok(Value::U64(u64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ])))
            }
            PrimitiveKind::I8 => {
                let bytes = self.read_bytes(1)?;
                Ok(Value::I8(bytes[0] as i8))
            }
            PrimitiveKind::I16 => {
                let bytes = self.read_bytes(2)?;
                Ok(Value::I16(i16::from_le_bytes([bytes[0], bytes[1]])))
            }
            PrimitiveKind::I32 => {
                let bytes = self.read_bytes(4)?;
                Ok(Value::I32(i32::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3],
                ])))
            }
            PrimitiveKind::I64 => {
                let bytes = self.read_bytes(8)?;
                Ok(Value::I64(i64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ])))
            }
            PrimitiveKind::F32 => {
                let bytes = self.read_bytes(4)?;
                Ok(Value::F32(f32::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3],
                ])))
            }
            PrimitiveKind::F64 => {
                let bytes = self.read_bytes(8)?;
                Ok(Value::F64(f64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ])))
            }
            PrimitiveKind::String { max_length } => {
                let len = self.read_u32()? as usize;
                if let Some(max) = max_length {
                    if len > *max {
                        return Err(WireError::InvalidData("string exceeds bound".into()));
                    }
                }
                let str_bytes = self.read_bytes(len)?;
                let s = String::from_utf8(str_bytes.to_vec())?;
                Ok(Value::String(s))
            }
        }
    }
}
