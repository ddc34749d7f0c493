// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Canonical defaults and zero-value omission.
//!
//! Every field kind has one canonical default. A singular scalar or enum
//! equal to its default is never written; a repeated field with no elements
//! is never written. A message field is written exactly when it is present,
//! even if all of its own fields are defaults.

use std::collections::hash_map;

use tracing::trace;

use crate::core::value::to_safe_signed;
use crate::core::{CodecError, ProtoValue, Record, Result, SchemaRegistry};
use crate::schema::ast::{FieldDescriptor, FieldKind, MessageSchema, ScalarType};

/// Canonical default of a scalar kind.
pub fn scalar_default(scalar: ScalarType) -> ProtoValue {
    match scalar {
        ScalarType::Bool => ProtoValue::Bool(false),
        ScalarType::Int32 | ScalarType::Int64 | ScalarType::Uint32 | ScalarType::Uint64 => {
            ProtoValue::Int(0)
        }
        ScalarType::Double => ProtoValue::Double(0.0),
        ScalarType::String => ProtoValue::String(String::new()),
        ScalarType::Bytes => ProtoValue::Bytes(Vec::new()),
    }
}

/// Canonical default of a field.
pub fn default_value(field: &FieldDescriptor) -> ProtoValue {
    if field.is_repeated() {
        return ProtoValue::List(Vec::new());
    }
    match &field.kind {
        FieldKind::Scalar(scalar) => scalar_default(*scalar),
        FieldKind::Enum(_) => ProtoValue::Enum(0),
        FieldKind::Message(_) | FieldKind::Unresolved(_) => ProtoValue::Absent,
    }
}

/// Whether `value` is omitted on encode.
pub fn is_default(value: &ProtoValue) -> bool {
    match value {
        ProtoValue::Absent => true,
        ProtoValue::Bool(b) => !*b,
        ProtoValue::Int(v) => *v == 0,
        ProtoValue::Enum(n) => *n == 0,
        // -0.0 compares equal to 0.0 and is omitted too
        ProtoValue::Double(d) => *d == 0.0,
        ProtoValue::String(s) => s.is_empty(),
        ProtoValue::Bytes(b) => b.is_empty(),
        ProtoValue::List(items) => items.is_empty(),
        ProtoValue::Message(_) => false,
    }
}

/// Record holding the default of every declared field.
pub fn default_record(schema: &MessageSchema) -> Record {
    schema
        .fields
        .iter()
        .map(|field| (field.name.clone(), default_value(field)))
        .collect()
}

/// One message being completed.
struct Frame<'a> {
    schema: &'a MessageSchema,
    entries: hash_map::Iter<'a, String, ProtoValue>,
    record: Record,
    /// Parent field receiving this record; `None` for the root
    slot: Option<&'a FieldDescriptor>,
    /// Repeated message field whose elements are being completed
    pending: Option<Pending<'a>>,
}

struct Pending<'a> {
    field: &'a FieldDescriptor,
    elements: std::slice::Iter<'a, ProtoValue>,
    items: Vec<ProtoValue>,
}

impl<'a> Frame<'a> {
    fn new(
        schema: &'a MessageSchema,
        partial: &'a Record,
        slot: Option<&'a FieldDescriptor>,
    ) -> Self {
        Self {
            schema,
            entries: partial.iter(),
            record: default_record(schema),
            slot,
            pending: None,
        }
    }
}

/// Build a complete record from a partial one.
///
/// Missing or `Absent` keys take their defaults, nested records are
/// completed the same way and lists element by element. Keys the entity does
/// not declare fail with [`CodecError::UnknownField`]; values of the wrong
/// kind fail with [`CodecError::TypeMismatch`].
pub fn from_partial(
    registry: &SchemaRegistry,
    schema: &MessageSchema,
    partial: &Record,
) -> Result<Record> {
    let mut stack = vec![Frame::new(schema, partial, None)];

    while let Some(frame) = stack.last_mut() {
        if let Some(pending) = &mut frame.pending {
            let field = pending.field;
            match pending.elements.next() {
                Some(element) => {
                    let child = nested_partial(registry, field, element)?;
                    stack.push(child);
                }
                None => {
                    let items = std::mem::take(&mut pending.items);
                    frame.record.insert(field.name.clone(), ProtoValue::List(items));
                    frame.pending = None;
                }
            }
            continue;
        }

        let schema = frame.schema;
        let Some((key, value)) = frame.entries.next() else {
            let Some(done) = stack.pop() else {
                break;
            };
            trace!(message = %done.schema.full_name, "completed partial record");
            let record = done.record;
            match (stack.last_mut(), done.slot) {
                (Some(parent), Some(slot)) => match &mut parent.pending {
                    Some(pending) if slot.is_repeated() => {
                        pending.items.push(ProtoValue::Message(record));
                    }
                    _ => {
                        parent.record.insert(slot.name.clone(), ProtoValue::Message(record));
                    }
                },
                _ => return Ok(record),
            }
            continue;
        };

        let field = schema
            .field_by_name(key)
            .ok_or_else(|| CodecError::UnknownField {
                message: schema.full_name.clone(),
                field: key.clone(),
            })?;
        if value.is_absent() {
            continue;
        }

        if field.is_repeated() {
            let items = value.as_list().ok_or_else(|| {
                CodecError::type_mismatch(&field.name, "list", value.type_name())
            })?;
            if matches!(field.kind, FieldKind::Message(_)) {
                frame.pending = Some(Pending {
                    field,
                    elements: items.iter(),
                    items: Vec::with_capacity(items.len()),
                });
                continue;
            }
            let normalized = items
                .iter()
                .map(|item| normalize_element(field, item))
                .collect::<Result<Vec<_>>>()?;
            frame.record.insert(field.name.clone(), ProtoValue::List(normalized));
        } else if matches!(field.kind, FieldKind::Message(_)) {
            let child = nested_partial(registry, field, value)?;
            stack.push(child);
        } else {
            let normalized = normalize_element(field, value)?;
            frame.record.insert(field.name.clone(), normalized);
        }
    }

    Err(CodecError::invalid_schema(
        &schema.full_name,
        "partial record completion lost its root frame",
    ))
}

/// Start completing `value` as the message type of `field`.
fn nested_partial<'a>(
    registry: &'a SchemaRegistry,
    field: &'a FieldDescriptor,
    value: &'a ProtoValue,
) -> Result<Frame<'a>> {
    let (FieldKind::Message(type_name), ProtoValue::Message(partial)) = (&field.kind, value) else {
        return Err(CodecError::type_mismatch(
            &field.name,
            field.kind.describe(),
            value.type_name(),
        ));
    };
    let child = registry.get_message(type_name)?;
    Ok(Frame::new(child, partial, Some(field)))
}

/// Check one scalar or enum value against the field kind, coercing where the
/// native model allows.
fn normalize_element(field: &FieldDescriptor, value: &ProtoValue) -> Result<ProtoValue> {
    let mismatch = || CodecError::type_mismatch(&field.name, field.kind.describe(), value.type_name());
    match (&field.kind, value) {
        (FieldKind::Scalar(ScalarType::Bool), ProtoValue::Bool(_))
        | (FieldKind::Scalar(ScalarType::Double), ProtoValue::Double(_))
        | (FieldKind::Scalar(ScalarType::String), ProtoValue::String(_))
        | (FieldKind::Scalar(ScalarType::Bytes), ProtoValue::Bytes(_)) => Ok(value.clone()),
        (FieldKind::Scalar(ScalarType::Double), ProtoValue::Int(v)) => {
            Ok(ProtoValue::Double(*v as f64))
        }
        (FieldKind::Scalar(scalar), ProtoValue::Int(v)) => {
            check_integer(&field.name, *scalar, *v)?;
            Ok(value.clone())
        }
        (FieldKind::Enum(_), ProtoValue::Enum(_)) => Ok(value.clone()),
        (FieldKind::Enum(_), ProtoValue::Int(v)) => i32::try_from(*v)
            .map(ProtoValue::Enum)
            .map_err(|_| mismatch()),
        _ => Err(mismatch()),
    }
}

/// Range-check an integer against its scalar kind.
pub(crate) fn check_integer(field: &str, scalar: ScalarType, value: i64) -> Result<()> {
    if scalar.is_64bit_integer() {
        to_safe_signed(field, value)?;
    }
    let in_range = match scalar {
        ScalarType::Int32 => i32::try_from(value).is_ok(),
        ScalarType::Uint32 => u32::try_from(value).is_ok(),
        ScalarType::Int64 => true,
        ScalarType::Uint64 => value >= 0,
        _ => false,
    };
    if in_range {
        Ok(())
    } else {
        Err(CodecError::type_mismatch(field, scalar.as_str(), value.to_string()))
    }
}
