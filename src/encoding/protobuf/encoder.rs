// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema-driven message encoder.
//!
//! Fields are written in field-table order. Defaults are omitted, present
//! messages are always written, packable repeated fields share one
//! length-delimited span unless declared `[packed = false]`.
//!
//! Nested messages are written from an explicit frame stack, the mirror of
//! the decoder: entering a message opens a span on the writer and pushes a
//! frame, finishing its field table pops the frame and closes the span.

use tracing::{debug, trace};

use super::scalar::{write_enum, write_scalar};
use super::writer::WireWriter;
use crate::core::{CodecError, ProtoValue, Record, Result, SchemaRegistry};
use crate::encoding::defaults::is_default;
use crate::schema::ast::{FieldDescriptor, FieldKind, MessageSchema};

/// One message being written.
struct Frame<'a> {
    schema: &'a MessageSchema,
    record: &'a Record,
    /// Next entry of the field table
    field: usize,
    /// Next element of the repeated message field at `field`
    item: usize,
}

impl<'a> Frame<'a> {
    fn new(schema: &'a MessageSchema, record: &'a Record) -> Self {
        Self {
            schema,
            record,
            field: 0,
            item: 0,
        }
    }
}

/// Encode `record` as an instance of `schema`.
///
/// Keys of `record` that the entity does not declare are ignored; declared
/// fields missing from `record` are treated as defaults.
pub fn encode_message(
    registry: &SchemaRegistry,
    schema: &MessageSchema,
    record: &Record,
) -> Result<Vec<u8>> {
    let mut writer = WireWriter::new();
    write_message(registry, schema, record, &mut writer)?;
    let bytes = writer.finish();
    debug!(message = %schema.full_name, bytes = bytes.len(), "encoded message");
    Ok(bytes)
}

/// Append the fields of `record` to `writer`, without an outer length prefix.
pub fn write_message(
    registry: &SchemaRegistry,
    schema: &MessageSchema,
    record: &Record,
    writer: &mut WireWriter,
) -> Result<()> {
    let mut stack = vec![Frame::new(schema, record)];

    while let Some(frame) = stack.last_mut() {
        let schema = frame.schema;
        let record = frame.record;
        let Some(field) = schema.fields.get(frame.field) else {
            trace_undeclared(schema, record);
            stack.pop();
            if !stack.is_empty() {
                writer.ldelim();
            }
            continue;
        };

        let value = match record.get(&field.name) {
            Some(value) if !is_default(value) => value,
            _ => {
                frame.field += 1;
                continue;
            }
        };

        let FieldKind::Message(type_name) = &field.kind else {
            write_field(field, value, writer)?;
            frame.field += 1;
            continue;
        };

        let element = if field.is_repeated() {
            let items = value
                .as_list()
                .ok_or_else(|| CodecError::type_mismatch(&field.name, "list", value.type_name()))?;
            match items.get(frame.item) {
                Some(item) => {
                    frame.item += 1;
                    item
                }
                None => {
                    frame.item = 0;
                    frame.field += 1;
                    continue;
                }
            }
        } else {
            frame.field += 1;
            value
        };

        let ProtoValue::Message(child) = element else {
            return Err(CodecError::type_mismatch(
                &field.name,
                field.kind.describe(),
                element.type_name(),
            ));
        };
        let child_schema = registry.get_message(type_name)?;
        writer.write_varint(u64::from(field.tag()));
        writer.fork();
        stack.push(Frame::new(child_schema, child));
    }
    Ok(())
}

fn trace_undeclared(schema: &MessageSchema, record: &Record) {
    let undeclared = record
        .keys()
        .filter(|key| schema.field_by_name(key).is_none())
        .count();
    if undeclared > 0 {
        trace!(message = %schema.full_name, undeclared, "ignoring undeclared record keys");
    }
}

/// Write a non-default scalar or enum field, singular or repeated.
fn write_field(
    field: &FieldDescriptor,
    value: &ProtoValue,
    writer: &mut WireWriter,
) -> Result<()> {
    let tag = u64::from(field.tag());
    if !field.is_repeated() {
        writer.write_varint(tag);
        return write_element(field, value, writer);
    }

    let items = value
        .as_list()
        .ok_or_else(|| CodecError::type_mismatch(&field.name, "list", value.type_name()))?;
    if field.packed {
        writer.write_varint(tag);
        writer.fork();
        for item in items {
            write_element(field, item, writer)?;
        }
        writer.ldelim();
    } else {
        for item in items {
            writer.write_varint(tag);
            write_element(field, item, writer)?;
        }
    }
    Ok(())
}

fn write_element(
    field: &FieldDescriptor,
    value: &ProtoValue,
    writer: &mut WireWriter,
) -> Result<()> {
    match &field.kind {
        FieldKind::Scalar(scalar) => write_scalar(writer, &field.name, *scalar, value),
        FieldKind::Enum(_) => write_enum(writer, &field.name, value),
        FieldKind::Message(type_name) => Err(CodecError::invalid_schema(
            type_name,
            format!("field '{}' cannot be written as a scalar", field.name),
        )),
        FieldKind::Unresolved(type_name) => Err(CodecError::invalid_schema(
            type_name,
            format!("field '{}' was never linked", field.name),
        )),
    }
}
