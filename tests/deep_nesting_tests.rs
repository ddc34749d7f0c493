// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Deep nesting tests.
//!
//! Tests cover:
//! - Decode, encode, JSON export and import of 100,000-level chains
//! - Chains through a singular and through a repeated message field
//! - Dropping deep records on a default-sized test thread
//! - Errors raised at the bottom of a deep chain

use std::sync::Arc;

use seicodec::encoding::protobuf::varint::{varint_len, write_varint};
use seicodec::{
    parse_proto, record, CodecError, EntityCodec, MessageCodec, ProtoCodec, ProtoValue, Record,
    SchemaRegistry,
};
use serde_json::Value;

// ============================================================================
// Fixtures
// ============================================================================

const NODE_PROTO: &str = r#"
syntax = "proto3";

package test.nesting;

message Node {
  Node child = 1;
  uint32 depth = 2;
  repeated Node children = 3;
}
"#;

const LEVELS: usize = 100_000;

/// Innermost node: `depth = 7`.
const LEAF: [u8; 2] = [0x10, 0x07];

const CHILD_TAG: u8 = 0x0A;
const CHILDREN_TAG: u8 = 0x1A;

fn node() -> EntityCodec {
    let mut registry = SchemaRegistry::new();
    registry
        .add_file(parse_proto("node.proto", NODE_PROTO).unwrap())
        .unwrap();
    registry.link().unwrap();
    ProtoCodec::new(Arc::new(registry))
        .entity("test.nesting.Node")
        .unwrap()
}

/// `levels` nodes wrapped around [`LEAF`] through the field with `tag`.
fn nested_bytes(tag: u8, levels: usize) -> Vec<u8> {
    let mut payload_lens = Vec::with_capacity(levels);
    let mut len = LEAF.len();
    for _ in 0..levels {
        payload_lens.push(len);
        len += 1 + varint_len(len as u64);
    }
    let mut data = Vec::with_capacity(len);
    for payload_len in payload_lens.iter().rev() {
        data.push(tag);
        write_varint(&mut data, *payload_len as u64);
    }
    data.extend_from_slice(&LEAF);
    data
}

/// Number of levels below `record` and the leaf's `depth` value.
fn record_chain(record: &Record) -> (usize, i64) {
    let mut levels = 0;
    let mut node = record;
    loop {
        let next = match (&node["child"], &node["children"]) {
            (ProtoValue::Message(child), _) => child,
            (_, ProtoValue::List(items)) if !items.is_empty() => items[0].as_message().unwrap(),
            _ => break,
        };
        levels += 1;
        node = next;
    }
    (levels, node["depth"].as_i64().unwrap())
}

/// Number of levels below `json` and the leaf's `depth` value.
fn json_chain(json: &Value) -> (usize, u64) {
    let mut levels = 0;
    let mut node = json;
    loop {
        let next = match (node.get("child"), node["children"].get(0)) {
            (Some(child), _) => child,
            (None, Some(first)) => first,
            (None, None) => break,
        };
        levels += 1;
        node = next;
    }
    (levels, node["depth"].as_u64().unwrap())
}

/// Take a JSON tree apart without recursing; `serde_json::Value` drops recursively.
fn dismantle(json: Value) {
    let mut pending = vec![json];
    while let Some(value) = pending.pop() {
        match value {
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, v)| v)),
            Value::Array(items) => pending.extend(items),
            _ => {}
        }
    }
}

// ============================================================================
// Singular Chains
// ============================================================================

#[test]
fn test_deep_singular_chain_through_every_entry_point() {
    let node = node();
    let data = nested_bytes(CHILD_TAG, LEVELS);

    let decoded = node.decode(&data).unwrap();
    assert_eq!(record_chain(&decoded), (LEVELS, 7));
    assert_eq!(node.encode(&decoded).unwrap(), data);

    let completed = node.from_partial(&decoded).unwrap();
    assert_eq!(record_chain(&completed), (LEVELS, 7));
    assert_eq!(node.encode(&completed).unwrap(), data);
    drop(completed);

    let json = node.to_json(&decoded).unwrap();
    drop(decoded);
    assert_eq!(json_chain(&json), (LEVELS, 7));

    let imported = node.from_json(&json).unwrap();
    dismantle(json);
    assert_eq!(node.encode(&imported).unwrap(), data);
}

#[test]
fn test_deep_record_built_in_memory() {
    let node = node();
    let mut value = record([("depth", ProtoValue::Int(7))]);
    for _ in 0..LEVELS {
        value = record([("child", ProtoValue::Message(value))]);
    }

    let bytes = node.encode(&value).unwrap();
    assert_eq!(bytes, nested_bytes(CHILD_TAG, LEVELS));

    // Keys missing at every level are filled in on the way down
    let completed = node.from_partial(&value).unwrap();
    assert_eq!(record_chain(&completed), (LEVELS, 7));
    assert_eq!(completed["children"], ProtoValue::List(Vec::new()));
}

// ============================================================================
// Repeated Chains
// ============================================================================

#[test]
fn test_deep_repeated_chain_through_every_entry_point() {
    let node = node();
    let data = nested_bytes(CHILDREN_TAG, LEVELS);

    let decoded = node.decode(&data).unwrap();
    assert_eq!(record_chain(&decoded), (LEVELS, 7));
    assert_eq!(node.encode(&decoded).unwrap(), data);

    let completed = node.from_partial(&decoded).unwrap();
    assert_eq!(node.encode(&completed).unwrap(), data);
    drop(completed);

    let json = node.to_json(&decoded).unwrap();
    drop(decoded);
    assert_eq!(json_chain(&json), (LEVELS, 7));

    let imported = node.from_json(&json).unwrap();
    dismantle(json);
    assert_eq!(record_chain(&imported), (LEVELS, 7));
    assert_eq!(node.encode(&imported).unwrap(), data);
}

#[test]
fn test_siblings_after_deep_child_keep_their_order() {
    let node = node();
    let mut inner = record([("depth", ProtoValue::Int(1))]);
    for _ in 0..1_000 {
        inner = record([("child", ProtoValue::Message(inner))]);
    }
    let value = record([(
        "children",
        ProtoValue::List(vec![
            ProtoValue::Message(inner),
            ProtoValue::Message(record([("depth", ProtoValue::Int(2))])),
        ]),
    )]);

    let bytes = node.encode(&value).unwrap();
    assert_eq!(&bytes[bytes.len() - 4..], &[CHILDREN_TAG, 0x02, 0x10, 0x02]);

    let json = node.to_json(&node.decode(&bytes).unwrap()).unwrap();
    assert_eq!(json["children"][1]["depth"], 2);
    assert_eq!(json_chain(&json["children"][0]), (1_000, 1));
    dismantle(json);
}

// ============================================================================
// Errors at Depth
// ============================================================================

#[test]
fn test_malformed_leaf_fails_at_depth() {
    let node = node();
    let mut data = nested_bytes(CHILD_TAG, LEVELS);
    // the leaf's varint now runs into the end of its span
    let last = data.len() - 1;
    data[last] = 0x87;
    let err = node.decode(&data).unwrap_err();
    assert!(
        matches!(err, CodecError::MalformedVarint { position, .. } if position == last),
        "{err}"
    );
}

#[test]
fn test_bad_leaf_value_fails_at_depth() {
    let node = node();
    let mut value = record([("depth", ProtoValue::Int(-1))]);
    for _ in 0..LEVELS {
        value = record([("child", ProtoValue::Message(value))]);
    }
    assert!(matches!(
        node.encode(&value),
        Err(CodecError::TypeMismatch { .. })
    ));
    assert!(matches!(
        node.from_partial(&value),
        Err(CodecError::TypeMismatch { .. })
    ));
    assert!(matches!(
        node.to_json(&value),
        Err(CodecError::TypeMismatch { .. })
    ));
}
