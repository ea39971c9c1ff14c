// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for schema descriptors.

use crate::descriptor::{
    EnumDescriptor, FieldDescriptor, FieldKind, PrimitiveKind, SchemaDescriptor,
};
use std::sync::Arc;

/// Builder for creating [`SchemaDescriptor`] instances.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Create a new builder for a message type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a primitive field.
    pub fn field(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.fields.push(FieldDescriptor::primitive(name, kind));
        self
    }

    /// Add an unbounded string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String { max_length: None })
    }

    /// Add a bounded string field.
    pub fn bounded_string_field(self, name: impl Into<String>, max_length: usize) -> Self {
        self.field(
            name,
            PrimitiveKind::String {
                max_length: Some(max_length),
            },
        )
    }

    /// Add an enum field.
    pub fn enum_field(mut self, name: impl Into<String>, descriptor: EnumDescriptor) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, FieldKind::Enum(descriptor)));
        self
    }

    /// Add a nested message field.
    pub fn message_field(
        mut self,
        name: impl Into<String>,
        descriptor: Arc<SchemaDescriptor>,
    ) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, FieldKind::Message(descriptor)));
        self
    }

    /// Add a repeated primitive field.
    pub fn repeated_field(mut self, name: impl Into<String>, element_kind: PrimitiveKind) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            FieldKind::Repeated(Box::new(FieldKind::Primitive(element_kind))),
        ));
        self
    }

    /// Add a repeated nested message field.
    pub fn repeated_message_field(
        mut self,
        name: impl Into<String>,
        descriptor: Arc<SchemaDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            FieldKind::Repeated(Box::new(FieldKind::Message(descriptor))),
        ));
        self
    }

    /// Add a field with an explicit kind.
    pub fn field_with_kind(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }

    /// Finalize into a [`SchemaDescriptor`].
    pub fn build(self) -> SchemaDescriptor {
        SchemaDescriptor::new(self.name, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_field_order() {
        let desc = SchemaBuilder::new("sensor.Reading")
            .field("sensor_id", PrimitiveKind::U32)
            .field("temperature", PrimitiveKind::F64)
            .string_field("unit")
            .build();

        assert_eq!(desc.name, "sensor.Reading");
        assert_eq!(desc.fields.len(), 3);
        assert_eq!(desc.fields[0].name, "sensor_id");
        assert_eq!(desc.fields[2].name, "unit");
    }

    #[test]
    fn test_builder_nested() {
        let inner = Arc::new(
            SchemaBuilder::new("sensor.Position")
                .field("lat", PrimitiveKind::F64)
                .field("lon", PrimitiveKind::F64)
                .build(),
        );
        let desc = SchemaBuilder::new("sensor.Report")
            .message_field("position", inner.clone())
            .repeated_message_field("history", inner)
            .build();

        let nested: Vec<_> = desc.nested_messages().collect();
        assert_eq!(nested.len(), 2);
        assert!(nested.iter().all(|d| d.name == "sensor.Position"));
    }
}
