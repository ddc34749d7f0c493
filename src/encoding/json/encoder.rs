// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Native record to JSON tree.
//!
//! Keys are the fields' JSON names in declaration order. Every declared
//! field is emitted except an absent message, whose key is left out.
//! Nested messages are exported from an explicit frame stack.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Number, Value};

use crate::core::{CodecError, ProtoValue, Record, Result, SchemaRegistry};
use crate::encoding::defaults::{check_integer, default_value};
use crate::schema::ast::{
    EnumVariant, FieldDescriptor, FieldKind, MessageSchema, ScalarType, UNRECOGNIZED_NAME,
};

/// One message being exported.
struct Frame<'a> {
    schema: &'a MessageSchema,
    record: &'a Record,
    object: Map<String, Value>,
    /// Parent field receiving this object; `None` for the root
    slot: Option<&'a FieldDescriptor>,
    /// Next entry of the field table
    field: usize,
    /// Exported elements of the repeated message field at `field`
    items: Vec<Value>,
}

impl<'a> Frame<'a> {
    fn new(
        schema: &'a MessageSchema,
        record: &'a Record,
        slot: Option<&'a FieldDescriptor>,
    ) -> Self {
        Self {
            schema,
            record,
            object: Map::with_capacity(schema.fields.len()),
            slot,
            field: 0,
            items: Vec::new(),
        }
    }
}

/// Export a record as a JSON object.
///
/// Keys missing from `record` are exported with their field default.
///
/// # Example
///
/// ```
/// use seicodec::{record, to_json, SchemaRegistry};
///
/// let registry = SchemaRegistry::builtin()?;
/// let tuple = registry.get_message("ExchangeRateTuple")?;
/// let json = to_json(&registry, tuple, &record([("denom", "usei")]))?;
/// assert_eq!(json, serde_json::json!({"denom": "usei", "exchange_rate": ""}));
/// # Ok::<(), seicodec::CodecError>(())
/// ```
pub fn to_json(registry: &SchemaRegistry, schema: &MessageSchema, record: &Record) -> Result<Value> {
    let mut stack = vec![Frame::new(schema, record, None)];

    while let Some(frame) = stack.last_mut() {
        let (schema, record) = (frame.schema, frame.record);
        let Some(field) = schema.fields.get(frame.field) else {
            let Some(done) = stack.pop() else {
                break;
            };
            let object = Value::Object(done.object);
            match (stack.last_mut(), done.slot) {
                (Some(parent), Some(slot)) if slot.is_repeated() => parent.items.push(object),
                (Some(parent), Some(slot)) => {
                    parent.object.insert(slot.json_name.clone(), object);
                }
                _ => return Ok(object),
            }
            continue;
        };

        let FieldKind::Message(type_name) = &field.kind else {
            if let Some(value) = export_field(registry, field, record)? {
                frame.object.insert(field.json_name.clone(), value);
            }
            frame.field += 1;
            continue;
        };

        let element = match record.get(&field.name) {
            None | Some(ProtoValue::Absent) if field.is_repeated() => {
                frame.object.insert(field.json_name.clone(), Value::Array(Vec::new()));
                frame.field += 1;
                continue;
            }
            None | Some(ProtoValue::Absent) => {
                frame.field += 1;
                continue;
            }
            Some(ProtoValue::List(items)) if field.is_repeated() => {
                match items.get(frame.items.len()) {
                    Some(item) => item,
                    None => {
                        let array = Value::Array(std::mem::take(&mut frame.items));
                        frame.object.insert(field.json_name.clone(), array);
                        frame.field += 1;
                        continue;
                    }
                }
            }
            Some(other) if field.is_repeated() => {
                return Err(CodecError::type_mismatch(&field.name, "list", other.type_name()));
            }
            Some(value) => {
                frame.field += 1;
                value
            }
        };

        let ProtoValue::Message(child) = element else {
            return Err(CodecError::type_mismatch(
                &field.name,
                field.kind.describe(),
                element.type_name(),
            ));
        };
        let child_schema = registry.get_message(type_name)?;
        stack.push(Frame::new(child_schema, child, Some(field)));
    }

    Err(CodecError::invalid_schema(
        &schema.full_name,
        "JSON export lost its root frame",
    ))
}

/// Export one scalar or enum field, falling back to its default.
///
/// Returns `None` only for an absent singular value.
fn export_field(
    registry: &SchemaRegistry,
    field: &FieldDescriptor,
    record: &Record,
) -> Result<Option<Value>> {
    let default;
    let value = match record.get(&field.name) {
        Some(value) => value,
        None => {
            default = default_value(field);
            &default
        }
    };

    if field.is_repeated() {
        let items = match value {
            ProtoValue::List(items) => items.as_slice(),
            ProtoValue::Absent => &[][..],
            other => {
                return Err(CodecError::type_mismatch(
                    &field.name,
                    "list",
                    other.type_name(),
                ))
            }
        };
        let array = items
            .iter()
            .map(|item| element_to_json(registry, field, item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Value::Array(array)))
    } else if value.is_absent() {
        Ok(None)
    } else {
        element_to_json(registry, field, value).map(Some)
    }
}

fn element_to_json(
    registry: &SchemaRegistry,
    field: &FieldDescriptor,
    value: &ProtoValue,
) -> Result<Value> {
    let mismatch = || CodecError::type_mismatch(&field.name, field.kind.describe(), value.type_name());
    match (&field.kind, value) {
        (FieldKind::Scalar(ScalarType::Bool), ProtoValue::Bool(b)) => Ok(Value::Bool(*b)),
        (FieldKind::Scalar(ScalarType::Double), ProtoValue::Double(d)) => Ok(double_to_json(*d)),
        (FieldKind::Scalar(ScalarType::String), ProtoValue::String(s)) => {
            Ok(Value::String(s.clone()))
        }
        (FieldKind::Scalar(ScalarType::Bytes), ProtoValue::Bytes(b)) => {
            Ok(Value::String(STANDARD.encode(b)))
        }
        (FieldKind::Scalar(scalar), ProtoValue::Int(v)) if *scalar != ScalarType::Double => {
            check_integer(&field.name, *scalar, *v)?;
            Ok(Value::Number(Number::from(*v)))
        }
        (FieldKind::Enum(enum_name), ProtoValue::Enum(_) | ProtoValue::Int(_)) => {
            let number = value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(mismatch)?;
            let schema = registry.get_enum(enum_name)?;
            Ok(match schema.variant(number) {
                EnumVariant::Known(name) => Value::String(name.to_string()),
                EnumVariant::Unrecognized(_) => Value::String(UNRECOGNIZED_NAME.to_string()),
            })
        }
        _ => Err(mismatch()),
    }
}

/// Finite doubles become numbers; NaN and infinities become their string names.
fn double_to_json(value: f64) -> Value {
    match Number::from_f64(value) {
        Some(n) => Value::Number(n),
        None if value.is_nan() => Value::String("NaN".to_string()),
        None if value > 0.0 => Value::String("Infinity".to_string()),
        None => Value::String("-Infinity".to_string()),
    }
}
