// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Protocol Buffers wire codec.
//!
//! - [`varint`] - Base-128 varints
//! - [`cursor`] / [`writer`] - Wire framing (tags, fixed-width values, length-delimited spans)
//! - [`scalar`] - One scalar or enum value
//! - [`encoder`] / [`decoder`] - Whole messages driven by a [`MessageSchema`](crate::schema::MessageSchema)
//! - [`raw`] - Schema-less field scanning

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod raw;
pub mod scalar;
pub mod varint;
pub mod writer;

pub use cursor::WireCursor;
pub use decoder::{decode_message, decode_message_with_length};
pub use encoder::encode_message;
pub use raw::{scan_fields, RawField, RawValue};
pub use writer::WireWriter;
