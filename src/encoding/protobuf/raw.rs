// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema-less field scanner.
//!
//! Walks wire bytes without a schema and reports every field as it appears.
//! Without a schema the scanner cannot tell varint kinds apart, nor strings
//! from bytes from embedded messages, so values are reported raw.

use std::fmt;

use super::cursor::WireCursor;
use crate::core::Result;
use crate::schema::ast::WireType;

/// Raw payload of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Varint payload
    Varint(u64),
    /// 8-byte payload
    Fixed64(u64),
    /// 4-byte payload
    Fixed32(u32),
    /// Length-delimited payload (string, bytes, message or packed span)
    LengthDelimited(Vec<u8>),
}

/// One field occurrence on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Field number
    pub number: u32,
    /// Wire type
    pub wire_type: WireType,
    /// Cursor position of the tag
    pub position: usize,
    /// Payload
    pub value: RawValue,
}

/// Scan every top-level field of `data`.
pub fn scan_fields(data: &[u8]) -> Result<Vec<RawField>> {
    let mut cursor = WireCursor::new(data);
    let mut fields = Vec::new();

    while !cursor.at_limit() {
        let position = cursor.position();
        let (number, wire_type) = cursor.read_tag()?;
        let value = match wire_type {
            WireType::Varint => RawValue::Varint(cursor.read_varint()?),
            WireType::Fixed64 => RawValue::Fixed64(cursor.read_fixed64()?),
            WireType::LengthDelimited => {
                RawValue::LengthDelimited(cursor.read_length_delimited()?.to_vec())
            }
            WireType::Fixed32 => RawValue::Fixed32(cursor.read_fixed32()?),
        };
        fields.push(RawField {
            number,
            wire_type,
            position,
            value,
        });
    }

    Ok(fields)
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Varint(v) => write!(f, "{v}"),
            RawValue::Fixed64(v) => write!(f, "{v} (double {})", f64::from_bits(*v)),
            RawValue::Fixed32(v) => write!(f, "{v}"),
            RawValue::LengthDelimited(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) if !text.chars().any(char::is_control) => {
                    write!(f, "{:?} ({} bytes)", text, bytes.len())
                }
                _ => write!(f, "0x{} ({} bytes)", hex::encode(bytes), bytes.len()),
            },
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{} field {} [{}] = {}",
            self.position,
            self.number,
            self.wire_type.as_str(),
            self.value
        )
    }
}
