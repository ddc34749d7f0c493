// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message encoding/decoding implementations.
//!
//! - [`protobuf`] - wire format: varints, tags, framing, message encoder/decoder
//! - [`defaults`] - canonical defaults, zero-value omission, partial records
//! - [`json`] - JSON bridge
//! - [`codec`] - per-entity facade over all of the above

pub mod codec;
pub mod defaults;
pub mod json;
pub mod protobuf;

pub use codec::{EntityCodec, MessageCodec, ProtoCodec};
pub use defaults::{default_record, default_value, from_partial, is_default};
pub use json::{from_json, to_json};
pub use protobuf::{
    decode_message, decode_message_with_length, encode_message, scan_fields, RawField, RawValue,
    WireCursor, WireWriter,
};
