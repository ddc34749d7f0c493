// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema-driven message decoder.
//!
//! Nested messages are decoded with an explicit frame stack rather than
//! native recursion: entering a message pushes a frame and narrows the
//! cursor limit, reaching the limit pops the frame and stores the finished
//! record in its parent. Nesting depth is therefore bounded by the input
//! size, not by the call stack.
//!
//! Decoding rules:
//! - Unknown field numbers are skipped by wire type
//! - Packable repeated fields accept both packed and unpacked elements
//! - A singular field seen twice keeps the later value (messages are replaced, not merged)
//! - Enum numbers outside the variant table are kept unchanged

use tracing::{debug, trace, warn};

use super::cursor::WireCursor;
use super::scalar::{read_enum, read_scalar};
use crate::core::{CodecError, ProtoValue, Record, Result, SchemaRegistry};
use crate::encoding::defaults::default_record;
use crate::schema::ast::{FieldDescriptor, FieldKind, MessageSchema, WireType};

/// One message under construction.
struct Frame<'s> {
    schema: &'s MessageSchema,
    record: Record,
    /// Parent field receiving this record; `None` for the root
    slot: Option<&'s FieldDescriptor>,
}

impl<'s> Frame<'s> {
    fn new(schema: &'s MessageSchema, slot: Option<&'s FieldDescriptor>) -> Self {
        Self {
            schema,
            record: default_record(schema),
            slot,
        }
    }
}

/// Decode the whole of `data` as an instance of `schema`.
pub fn decode_message(
    registry: &SchemaRegistry,
    schema: &MessageSchema,
    data: &[u8],
) -> Result<Record> {
    decode_message_with_length(registry, schema, data, None)
}

/// Decode the first `length` bytes of `data` (all of it when `None`).
///
/// A `length` larger than `data` fails with [`CodecError::TruncatedMessage`].
pub fn decode_message_with_length<'s>(
    registry: &'s SchemaRegistry,
    schema: &'s MessageSchema,
    data: &[u8],
    length: Option<usize>,
) -> Result<Record> {
    let mut cursor = WireCursor::new(data);
    if let Some(length) = length {
        cursor.enter(length as u64)?;
    }

    let mut stack = vec![Frame::new(schema, None)];
    let mut max_depth = 1usize;

    loop {
        if cursor.at_limit() {
            if stack.len() == 1 {
                break;
            }
            let Some(done) = stack.pop() else {
                break;
            };
            cursor.exit();
            if let (Some(parent), Some(slot)) = (stack.last_mut(), done.slot) {
                store(&mut parent.record, slot, ProtoValue::Message(done.record));
            }
            continue;
        }

        let Some(current) = stack.last().map(|frame| frame.schema) else {
            break;
        };
        let tag_position = cursor.position();
        let (number, wire_type) = cursor.read_tag()?;

        let Some(field) = current.field_by_number(number) else {
            trace!(
                message = %current.full_name,
                field_number = number,
                wire_type = wire_type.as_str(),
                position = tag_position,
                "skipping unknown field"
            );
            cursor.skip(wire_type)?;
            continue;
        };

        match &field.kind {
            FieldKind::Message(type_name) => {
                expect_wire_type(field, WireType::LengthDelimited, wire_type, tag_position)?;
                let child = registry.get_message(type_name)?;
                let len = cursor.read_varint()?;
                cursor.enter(len)?;
                stack.push(Frame::new(child, Some(field)));
                max_depth = max_depth.max(stack.len());
            }
            _ if field.is_repeated()
                && field.is_packable()
                && wire_type == WireType::LengthDelimited =>
            {
                let len = cursor.read_varint()?;
                cursor.enter(len)?;
                let mut items = Vec::new();
                while !cursor.at_limit() {
                    items.push(read_element(registry, &mut cursor, field)?);
                }
                cursor.exit();
                if let Some(frame) = stack.last_mut() {
                    for item in items {
                        store(&mut frame.record, field, item);
                    }
                }
            }
            _ => {
                expect_wire_type(field, field.element_wire_type(), wire_type, tag_position)?;
                let value = read_element(registry, &mut cursor, field)?;
                if let Some(frame) = stack.last_mut() {
                    store(&mut frame.record, field, value);
                }
            }
        }
    }

    let root = stack
        .pop()
        .ok_or_else(|| CodecError::invalid_schema(&schema.full_name, "decoder lost its root frame"))?;
    debug!(
        message = %schema.full_name,
        bytes = cursor.position(),
        depth = max_depth,
        "decoded message"
    );
    Ok(root.record)
}

/// Read one non-message element of `field`.
fn read_element(
    registry: &SchemaRegistry,
    cursor: &mut WireCursor<'_>,
    field: &FieldDescriptor,
) -> Result<ProtoValue> {
    match &field.kind {
        FieldKind::Scalar(scalar) => read_scalar(cursor, &field.name, *scalar),
        FieldKind::Enum(enum_name) => {
            let number = read_enum(cursor)?;
            let known = registry
                .get_enum(enum_name)
                .map(|e| e.contains(number))
                .unwrap_or(false);
            if !known {
                warn!(
                    field = %field.name,
                    enum_name = %enum_name,
                    value = number,
                    "enum value outside the variant table"
                );
            }
            Ok(ProtoValue::Enum(number))
        }
        FieldKind::Message(type_name) | FieldKind::Unresolved(type_name) => {
            Err(CodecError::invalid_schema(
                type_name,
                format!("field '{}' cannot be read as a scalar", field.name),
            ))
        }
    }
}

fn expect_wire_type(
    field: &FieldDescriptor,
    expected: WireType,
    found: WireType,
    position: usize,
) -> Result<()> {
    if expected == found {
        return Ok(());
    }
    Err(CodecError::UnexpectedWireType {
        field: field.name.clone(),
        expected: expected.as_u8(),
        found: found.as_u8(),
        position,
    })
}

/// Store a decoded value: append for repeated fields, replace otherwise.
fn store(record: &mut Record, field: &FieldDescriptor, value: ProtoValue) {
    if !field.is_repeated() {
        record.insert(field.name.clone(), value);
        return;
    }
    match record.get_mut(&field.name) {
        Some(ProtoValue::List(items)) => items.push(value),
        _ => {
            record.insert(field.name.clone(), ProtoValue::List(vec![value]));
        }
    }
}
