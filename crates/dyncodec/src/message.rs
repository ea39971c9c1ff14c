// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic message container and its canonical parser.

use crate::descriptor::{EnumDescriptor, FieldKind, PrimitiveKind, SchemaDescriptor};
use crate::value::Value;
use crate::wire::{self, WireError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Errors for dynamic message operations.
#[derive(Debug)]
pub enum MessageError {
    FieldNotFound(String),
    TypeMismatch { expected: String, got: String },
    InvalidOperation(String),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldNotFound(name) => write!(f, "Field not found: {}", name),
            Self::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            Self::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for MessageError {}

/// A runtime message instance conforming to a schema descriptor.
#[derive(Debug, Clone)]
pub struct DynamicMessage {
    /// Schema descriptor.
    descriptor: Arc<SchemaDescriptor>,
    /// Field values.
    value: Value,
}

impl DynamicMessage {
    /// Create a new message with all fields at their default values.
    pub fn new(descriptor: &Arc<SchemaDescriptor>) -> Self {
        let mut fields = HashMap::new();
        for field in &descriptor.fields {
            fields.insert(field.name.clone(), default_value(&field.kind));
        }
        Self {
            descriptor: descriptor.clone(),
            value: Value::Message(fields),
        }
    }

    /// Create from an existing value.
    pub fn from_value(descriptor: &Arc<SchemaDescriptor>, value: Value) -> Self {
        Self {
            descriptor: descriptor.clone(),
            value,
        }
    }

    /// Get the schema descriptor.
    pub fn descriptor(&self) -> &Arc<SchemaDescriptor> {
        &self.descriptor
    }

    /// Get the message type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Get the underlying value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Get mutable reference to the underlying value.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Get a field value by name.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, MessageError> {
        T::from_value(self.get_field(name)?)
    }

    /// Set a field value by name.
    pub fn set<T: IntoValue>(&mut self, name: &str, value: T) -> Result<(), MessageError> {
        if self.descriptor.field(name).is_none() {
            return Err(MessageError::FieldNotFound(name.to_string()));
        }
        match &mut self.value {
            Value::Message(fields) => {
                fields.insert(name.to_string(), value.into_value());
                Ok(())
            }
            _ => Err(MessageError::InvalidOperation(
                "set requires a message value".into(),
            )),
        }
    }

    /// Get field by name.
    pub fn get_field(&self, name: &str) -> Result<&Value, MessageError> {
        if self.descriptor.field(name).is_none() {
            return Err(MessageError::FieldNotFound(name.to_string()));
        }
        match &self.value {
            Value::Message(fields) => fields
                .get(name)
                .ok_or_else(|| MessageError::FieldNotFound(name.to_string())),
            _ => Err(MessageError::InvalidOperation(
                "get_field requires a message value".into(),
            )),
        }
    }

    /// Iterate over fields.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        match &self.value {
            Value::Message(fields) => {
                Box::new(fields.iter().map(|(k, v)| (k.as_str(), v))) as Box<dyn Iterator<Item = _>>
            }
            _ => Box::new(std::iter::empty()),
        }
    }

    /// The canonical parser for this message's schema.
    pub fn parser(&self) -> Parser {
        Parser {
            descriptor: self.descriptor.clone(),
        }
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.value == other.value
    }
}

/// Create the default value for a field kind.
fn default_value(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Primitive(p) => default_primitive(p),
        FieldKind::Enum(e) => default_enum(e),
        FieldKind::Message(inner) => {
            let mut fields = HashMap::new();
            for field in &inner.fields {
                fields.insert(field.name.clone(), default_value(&field.kind));
            }
            Value::Message(fields)
        }
        FieldKind::Repeated(_) => Value::Repeated(Vec::new()),
    }
}

fn default_primitive(kind: &PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Bool => Value::Bool(false),
        PrimitiveKind::U8 => Value::U8(0),
        PrimitiveKind::U16 => Value::U16(0),
        PrimitiveKind::U32 => Value::U32(0),
        PrimitiveKind::U64 => Value::U64(0),
        PrimitiveKind::I8 => Value::I8(0),
        PrimitiveKind::I16 => Value::I16(0),
        PrimitiveKind::I32 => Value::I32(0),
        PrimitiveKind::I64 => Value::I64(0),
        PrimitiveKind::F32 => Value::F32(0.0),
        PrimitiveKind::F64 => Value::F64(0.0),
        PrimitiveKind::String { .. } => Value::String(String::new()),
    }
}

fn default_enum(e: &EnumDescriptor) -> Value {
    match e.variants.first() {
        Some(v) => Value::Enum(v.value, v.name.clone()),
        None => Value::Enum(0, String::new()),
    }
}

/// A schema-bound capability for turning raw bytes into a message
/// instance and back.
///
/// Derived, process-local state: parsers are rebuilt from the schema
/// wherever they are needed and never travel across a transport boundary.
#[derive(Debug, Clone)]
pub struct Parser {
    descriptor: Arc<SchemaDescriptor>,
}

impl Parser {
    /// The schema this parser is bound to.
    pub fn descriptor(&self) -> &Arc<SchemaDescriptor> {
        &self.descriptor
    }

    /// Parse a byte sequence into a message instance.
    pub fn parse(&self, bytes: &[u8]) -> Result<DynamicMessage, WireError> {
        wire::decode_message(bytes, &self.descriptor)
    }

    /// Encode a message instance to bytes in this parser's schema layout.
    ///
    /// The parser's descriptor decides the layout, not the message's.
    /// A value tree that does not conform fails with a type mismatch.
    pub fn to_bytes(&self, message: &DynamicMessage) -> Result<Vec<u8>, WireError> {
        wire::encode_with(message.value(), &self.descriptor)
    }
}

/// Trait for converting from a runtime [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, MessageError>;
}

/// Trait for converting into a runtime [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

// Implement FromValue for primitives
macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, MessageError> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(MessageError::TypeMismatch {
                        expected: $name.to_string(),
                        got: format!("{:?}", other),
                    }),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(u8, U8, "u8");
impl_from_value!(u16, U16, "u16");
impl_from_value!(u32, U32, "u32");
impl_from_value!(u64, U64, "u64");
impl_from_value!(i8, I8, "i8");
impl_from_value!(i16, I16, "i16");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f32, F32, "f32");
impl_from_value!(f64, F64, "f64");

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, MessageError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(MessageError::TypeMismatch {
                expected: "string".to_string(),
                got: format!("{:?}", other),
            }),
        }
    }
}

// Implement IntoValue for primitives
macro_rules! impl_into_value {
    ($ty:ty, $variant:ident) => {
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

impl_into_value!(bool, Bool);
impl_into_value!(u8, U8);
impl_into_value!(u16, U16);
impl_into_value!(u32, U32);
impl_into_value!(u64, U64);
impl_into_value!(i8, I8);
impl_into_value!(i16, I16);
impl_into_value!(i32, I32);
impl_into_value!(i64, I64);
impl_into_value!(f32, F32);
impl_into_value!(f64, F64);

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}
