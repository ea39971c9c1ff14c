// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema descriptors: runtime descriptions of message layouts.
//!
//! A [`SchemaDescriptor`] describes the field layout of one structured
//! message type, independent of any compiled representation.  Nested
//! message fields carry the full descriptor of the inner type, so a
//! descriptor is a self-contained graph that a [`crate::domain::SchemaDomain`]
//! can close over.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Primitive field kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    String { max_length: Option<usize> },
}

impl PrimitiveKind {
    /// Get the encoded size in bytes (None for strings).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::U8 | Self::I8 => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 | Self::F32 => Some(4),
            Self::U64 | Self::I64 | Self::F64 => Some(8),
            Self::String { .. } => None,
        }
    }

    /// Get the wire alignment requirement.
    pub fn alignment(&self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 | Self::String { .. } => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }
}

/// Kind of a single message field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Primitive field.
    Primitive(PrimitiveKind),
    /// Enumeration field.
    Enum(EnumDescriptor),
    /// Nested message field, carrying the inner type's descriptor.
    Message(Arc<SchemaDescriptor>),
    /// Repeated field (dynamic length) of the given element kind.
    Repeated(Box<FieldKind>),
}

impl FieldKind {
    /// Get the wire alignment requirement.
    pub fn alignment(&self) -> usize {
        match self {
            Self::Primitive(p) => p.alignment(),
            Self::Enum(_) => 4,
            Self::Message(inner) => inner.alignment(),
            Self::Repeated(elem) => elem.alignment().max(4),
        }
    }
}

/// A complete schema descriptor for one message type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Fully-qualified message name.
    pub name: String,
    /// Ordered field layout.
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    /// Create a new schema descriptor.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the wire alignment requirement.
    pub fn alignment(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.kind.alignment())
            .max()
            .unwrap_or(1)
    }

    /// Descriptors of message types referenced by this schema's fields,
    /// in field order.  Does not recurse.
    pub fn nested_messages(&self) -> impl Iterator<Item = &Arc<SchemaDescriptor>> {
        self.fields.iter().filter_map(|f| f.kind_message())
    }
}

/// Field descriptor for message members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a primitive field descriptor.
    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, FieldKind::Primitive(kind))
    }

    /// The nested message descriptor, if this field (or a repeated field's
    /// element) is a message.
    fn kind_message(&self) -> Option<&Arc<SchemaDescriptor>> {
        match &self.kind {
            FieldKind::Message(inner) => Some(inner),
            FieldKind::Repeated(elem) => match elem.as_ref() {
                FieldKind::Message(inner) => Some(inner),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Enumeration descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// Enum variants.
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// Create an enum descriptor.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self { variants }
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get variant by value.
    pub fn variant_by_value(&self, value: i32) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Variant value.
    pub value: i32,
}

impl EnumVariant {
    /// Create an enum variant.
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveKind::Bool.size(), Some(1));
        assert_eq!(PrimitiveKind::U32.size(), Some(4));
        assert_eq!(PrimitiveKind::F64.size(), Some(8));
        assert_eq!(PrimitiveKind::String { max_length: None }.size(), None);
    }

    #[test]
    fn test_primitive_alignment() {
        assert_eq!(PrimitiveKind::U8.alignment(), 1);
        assert_eq!(PrimitiveKind::U16.alignment(), 2);
        assert_eq!(PrimitiveKind::U32.alignment(), 4);
        assert_eq!(PrimitiveKind::F64.alignment(), 8);
    }

    #[test]
    fn test_field_lookup() {
        let desc = SchemaDescriptor::new(
            "geo.Point",
            vec![
                FieldDescriptor::primitive("x", PrimitiveKind::I32),
                FieldDescriptor::primitive("y", PrimitiveKind::F64),
            ],
        );

        assert!(desc.field("x").is_some());
        assert!(desc.field("z").is_none());
        assert_eq!(desc.alignment(), 8);
    }

    #[test]
    fn test_nested_messages() {
        let point = Arc::new(SchemaDescriptor::new(
            "geo.Point",
            vec![
                FieldDescriptor::primitive("x", PrimitiveKind::I32),
                FieldDescriptor::primitive("y", PrimitiveKind::I32),
            ],
        ));
        let poly = SchemaDescriptor::new(
            "geo.Polygon",
            vec![FieldDescriptor::new(
                "vertices",
                FieldKind::Repeated(Box::new(FieldKind::Message(point.clone()))),
            )],
        );

        let nested: Vec<_> = poly.nested_messages().collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name, "geo.Point");
    }

    #[test]
    fn test_enum_descriptor() {
        let variants = vec![
            EnumVariant::new("RED", 0),
            EnumVariant::new("GREEN", 1),
            EnumVariant::new("BLUE", 2),
        ];
        let enum_desc = EnumDescriptor::new(variants);

        assert_eq!(enum_desc.variant("GREEN").map(|v| v.value), Some(1));
        assert_eq!(
            enum_desc.variant_by_value(2).map(|v| &v.name as &str),
            Some("BLUE")
        );
    }
}
