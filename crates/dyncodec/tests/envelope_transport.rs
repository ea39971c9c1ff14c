// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cross-process transport: the codec envelope must round-trip exactly,
//! and a reconstructed codec must decode using only transported state.

use dyncodec::{
    register_provider, DynamicMessage, ExtensionProvider, FieldDescriptor, MessageCodec,
    PrimitiveKind, SchemaBuilder, SchemaDescriptor, ENVELOPE_VERSION,
};
use std::sync::Arc;

struct StubProvider(&'static str);

impl ExtensionProvider for StubProvider {
    fn provider_name(&self) -> &str {
        self.0
    }

    fn extension_fields(&self, _message_name: &str) -> Vec<FieldDescriptor> {
        Vec::new()
    }
}

fn telemetry() -> Arc<SchemaDescriptor> {
    let position = Arc::new(
        SchemaBuilder::new("fleet.Position")
            .field("lat", PrimitiveKind::F64)
            .field("lon", PrimitiveKind::F64)
            .build(),
    );
    Arc::new(
        SchemaBuilder::new("fleet.Telemetry")
            .field("vehicle_id", PrimitiveKind::U32)
            .message_field("position", position)
            .repeated_field("speeds", PrimitiveKind::F32)
            .build(),
    )
}

#[test]
fn transported_codec_equals_original() {
    register_provider(Arc::new(StubProvider("tx.meta")));

    let original = MessageCodec::from_descriptor(&telemetry())
        .with_extensions_from(["tx.meta"])
        .expect("extend");

    let bytes = original.transport_bytes().expect("serialize");
    let restored = MessageCodec::from_transport_bytes(&bytes).expect("reconstruct");

    assert_eq!(original, restored);
    assert_eq!(restored.message_name(), "fleet.Telemetry");
    assert!(restored.extension_hosts().contains("tx.meta"));
}

#[test]
fn reconstructed_codec_decodes_with_transported_state_only() {
    let descriptor = telemetry();
    let sender = MessageCodec::from_descriptor(&descriptor);

    let mut msg = DynamicMessage::new(&descriptor);
    msg.set("vehicle_id", 17u32).expect("set id");
    let payload = sender.encode(&msg).expect("encode");

    // Simulate the worker process: it has only the envelope bytes and
    // the payload, no descriptor of its own.
    let envelope = sender.transport_bytes().expect("envelope");
    drop(sender);
    drop(descriptor);

    let worker = MessageCodec::from_transport_bytes(&envelope).expect("reconstruct");
    let decoded = worker.decode(&payload).expect("first decode resolves parser");
    assert_eq!(decoded.get::<u32>("vehicle_id").expect("id"), 17);

    // The transported domain carried the nested type as well.
    assert!(worker.domain().contains("fleet.Position"));
}

#[test]
fn envelope_tail_order_is_extensions_domain_then_name() {
    let codec = MessageCodec::from_descriptor(&telemetry());
    let value = serde_json::to_value(&codec).expect("json");
    let tail = value.as_array().expect("tuple as array");

    assert_eq!(tail.len(), 4);
    assert_eq!(tail[0], serde_json::json!(ENVELOPE_VERSION));
    assert!(tail[1].is_array(), "phase 1: ordinary field state");
    assert!(tail[2].is_object(), "phase 2a: schema domain");
    assert_eq!(
        tail[3],
        serde_json::json!("fleet.Telemetry"),
        "phase 2b: message name"
    );
}

#[test]
fn future_envelope_version_is_rejected() {
    let codec = MessageCodec::from_descriptor(&telemetry());
    let mut value = serde_json::to_value(&codec).expect("json");
    value[0] = serde_json::json!(ENVELOPE_VERSION + 1);

    let err = serde_json::from_value::<MessageCodec>(value).expect_err("reject");
    assert!(err.to_string().contains("unsupported codec envelope version"));
}

#[test]
fn truncated_envelope_is_a_transport_error() {
    let codec = MessageCodec::from_descriptor(&telemetry());
    let bytes = codec.transport_bytes().expect("serialize");

    let err = MessageCodec::from_transport_bytes(&bytes[..bytes.len() / 2]).expect_err("truncated");
    assert!(err.to_string().contains("codec transport error"));
}
