// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use seicodec::{parse_proto, EntityCodec, ProtoCodec, SchemaRegistry};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

/// A message exercising every scalar kind, packing mode, and recursion.
pub const SCALARS_PROTO: &str = r#"
syntax = "proto3";

package test.scalars;

enum Level {
  LEVEL_UNSPECIFIED = 0;
  LEVEL_LOW = 1;
  LEVEL_HIGH = 2;
}

message Scalars {
  bool flag = 1;
  int32 small = 2;
  int64 big = 3;
  uint32 count = 4;
  uint64 height = 5;
  double ratio = 6;
  string label = 7;
  bytes blob = 8;
  Level level = 9;
  repeated int32 deltas = 10;
  repeated uint64 unpacked = 11 [packed = false];
  Scalars child = 12;
  repeated string tags = 13;
  repeated Level levels = 14;
  string display_name = 15 [json_name = "displayName"];
}
"#;

/// Registry with the bundled chain schemas.
pub fn builtin_registry() -> SchemaRegistry {
    SchemaRegistry::builtin().expect("bundled schemas link")
}

/// Registry with the bundled chain schemas plus [`SCALARS_PROTO`].
pub fn test_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    seicodec::schema::builtin::register_builtin(&mut registry).expect("bundled schemas parse");
    registry
        .add_file(parse_proto("scalars.proto", SCALARS_PROTO).expect("test schema parses"))
        .expect("test schema registers");
    registry.link().expect("test schema links");
    registry
}

/// Codec for one entity of [`test_registry`].
pub fn entity(name: &str) -> EntityCodec {
    ProtoCodec::new(Arc::new(test_registry()))
        .entity(name)
        .expect("entity exists")
}

/// Parse a hex string with optional spaces.
pub fn bytes(hex_text: &str) -> Vec<u8> {
    let cleaned: String = hex_text.split_whitespace().collect();
    hex::decode(cleaned).expect("valid hex")
}
