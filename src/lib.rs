// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Seicodec
//!
//! Schema-driven Protocol Buffers codec and JSON bridge for Sei chain module APIs.
//!
//! One generic engine, parameterized by field descriptor tables parsed from
//! `.proto` text, provides the five operations every entity exposes:
//! binary encode, binary decode, JSON import, JSON export, and partial-record
//! hydration.
//!
//! ## Architecture
//!
//! - `core/` - error type, native value model, schema registry
//! - `schema/` - schema AST, `.proto` parser, bundled chain schemas
//! - `encoding/protobuf/` - varints, tags, framing, message encoder/decoder, raw scanner
//! - `encoding/defaults.rs` - canonical defaults and zero-value omission
//! - `encoding/json/` - JSON bridge
//! - `encoding/codec.rs` - per-entity facade
//! - `config.rs` - TOML configuration for the CLI
//!
//! ## Example: Encoding an exchange rate
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use seicodec::{record, MessageCodec, ProtoCodec, ProtoValue};
//!
//! let codec = ProtoCodec::builtin()?;
//! let tuple = codec.entity("ExchangeRateTuple")?;
//!
//! let bytes = tuple.encode(&record([("denom", "usei"), ("exchange_rate", "1.25")]))?;
//! assert_eq!(hex_string(&bytes), "0a04757365691204312e3235");
//!
//! let decoded = tuple.decode(&bytes)?;
//! assert_eq!(decoded["denom"], ProtoValue::from("usei"));
//! # Ok(())
//! # }
//! # fn hex_string(b: &[u8]) -> String { b.iter().map(|x| format!("{x:02x}")).collect() }
//! ```
//!
//! ## Example: JSON bridge
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use seicodec::{MessageCodec, ProtoCodec};
//!
//! let codec = ProtoCodec::builtin()?;
//! let item = codec.entity("PriceSnapshotItem")?;
//!
//! let value = item.from_json(&serde_json::json!({"denom": "usei"}))?;
//! assert!(value["oracle_exchange_rate"].is_absent());
//! assert_eq!(item.to_json(&value)?, serde_json::json!({"denom": "usei"}));
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    record, CodecError, ProtoValue, Record, Result, SchemaRegistry, MAX_SAFE_INTEGER,
};
pub use core::value::{to_safe_number, to_safe_signed};

// Encoding/decoding
pub mod encoding;

pub use encoding::{
    decode_message, decode_message_with_length, default_record, encode_message, from_json,
    from_partial, scan_fields, to_json, EntityCodec, MessageCodec, ProtoCodec, RawField,
    RawValue,
};

// Schema parsing
pub mod schema;

pub use schema::{
    parse_proto, parse_proto_file, EnumSchema, FieldDescriptor, FieldKind, Label, MessageSchema,
    ProtoFile, ScalarType, WireType,
};

// Configuration
pub mod config;

pub use config::CodecConfig;
