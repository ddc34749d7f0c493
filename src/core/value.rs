// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Native value model.
//!
//! Decoded messages are plain field-name to value maps. Every integer kind
//! shares one carrier, [`ProtoValue::Int`], whose 64-bit quantities are kept
//! inside the safe-integer range `[-(2^53 - 1), 2^53 - 1]` so that they stay
//! exact when exported as JSON numbers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::{CodecError, Result};

/// Largest integer the native numeric carrier represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// A native record: declared field name -> value.
pub type Record = HashMap<String, ProtoValue>;

/// Native value of a single field.
///
/// `Absent` is the distinguished state of an unset message-typed field. It is
/// never the same thing as `Message(Record::new())`, which is a message that
/// is present with all of its fields at their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProtoValue {
    // bool
    Bool(bool),

    /// int32, int64, uint32, uint64 (range-checked safe-integer carrier)
    Int(i64),

    // double
    Double(f64),

    // string (UTF-8)
    String(String),

    // bytes
    Bytes(Vec<u8>),

    /// Enum number; numbers outside the variant table are kept as-is
    Enum(i32),

    // Nested message
    Message(Record),

    // Repeated field
    List(Vec<ProtoValue>),

    /// Unset optional message
    Absent,
}

impl ProtoValue {
    /// Check if this value is the absent marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, ProtoValue::Absent)
    }

    /// Try to get the inner integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ProtoValue::Int(v) => Some(*v),
            ProtoValue::Enum(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Try to get the inner boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ProtoValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the inner string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ProtoValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the inner bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ProtoValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get the nested record.
    pub fn as_message(&self) -> Option<&Record> {
        match self {
            ProtoValue::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get the repeated elements.
    pub fn as_list(&self) -> Option<&[ProtoValue]> {
        match self {
            ProtoValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the type name of this value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            ProtoValue::Bool(_) => "bool",
            ProtoValue::Int(_) => "int",
            ProtoValue::Double(_) => "double",
            ProtoValue::String(_) => "string",
            ProtoValue::Bytes(_) => "bytes",
            ProtoValue::Enum(_) => "enum",
            ProtoValue::Message(_) => "message",
            ProtoValue::List(_) => "list",
            ProtoValue::Absent => "absent",
        }
    }
}

// Nested records can be as deep as the input that produced them, so the
// children are moved onto a heap stack instead of being dropped recursively.
impl Drop for ProtoValue {
    fn drop(&mut self) {
        if !self.has_nested_children() {
            return;
        }
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut value) = pending.pop() {
            value.take_children(&mut pending);
        }
    }
}

impl ProtoValue {
    fn is_nonempty_container(&self) -> bool {
        match self {
            ProtoValue::Message(record) => !record.is_empty(),
            ProtoValue::List(items) => !items.is_empty(),
            _ => false,
        }
    }

    fn has_nested_children(&self) -> bool {
        match self {
            ProtoValue::Message(record) => record.values().any(Self::is_nonempty_container),
            ProtoValue::List(items) => items.iter().any(Self::is_nonempty_container),
            _ => false,
        }
    }

    /// Move the direct children of a message or list into `out`.
    fn take_children(&mut self, out: &mut Vec<ProtoValue>) {
        match self {
            ProtoValue::Message(record) => out.extend(record.drain().map(|(_, value)| value)),
            ProtoValue::List(items) => out.append(items),
            _ => {}
        }
    }
}

impl From<bool> for ProtoValue {
    fn from(v: bool) -> Self {
        ProtoValue::Bool(v)
    }
}

impl From<i64> for ProtoValue {
    fn from(v: i64) -> Self {
        ProtoValue::Int(v)
    }
}

impl From<i32> for ProtoValue {
    fn from(v: i32) -> Self {
        ProtoValue::Int(v as i64)
    }
}

impl From<f64> for ProtoValue {
    fn from(v: f64) -> Self {
        ProtoValue::Double(v)
    }
}

impl From<&str> for ProtoValue {
    fn from(v: &str) -> Self {
        ProtoValue::String(v.to_string())
    }
}

impl From<String> for ProtoValue {
    fn from(v: String) -> Self {
        ProtoValue::String(v)
    }
}

impl From<Vec<u8>> for ProtoValue {
    fn from(v: Vec<u8>) -> Self {
        ProtoValue::Bytes(v)
    }
}

impl From<Record> for ProtoValue {
    fn from(v: Record) -> Self {
        ProtoValue::Message(v)
    }
}

/// Convert a raw unsigned 64-bit wire value to the native carrier.
///
/// Succeeds for `raw <= 2^53 - 1`, fails with [`CodecError::IntegerOverflow`]
/// above it. Never truncates.
pub fn to_safe_number(field: &str, raw: u64) -> Result<i64> {
    if raw > MAX_SAFE_INTEGER as u64 {
        return Err(CodecError::integer_overflow(field, raw));
    }
    Ok(raw as i64)
}

/// Range-check a signed 64-bit value against the safe-integer range.
pub fn to_safe_signed(field: &str, value: i64) -> Result<i64> {
    if !(-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value) {
        return Err(CodecError::integer_overflow(field, value));
    }
    Ok(value)
}

/// Build a record from `(name, value)` pairs.
///
/// Handy for fixtures passed to `from_partial`.
pub fn record<I, K, V>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ProtoValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
