// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON tree to native record.
//!
//! Import is permissive about shape: a key may be the field's JSON name or its
//! declared name, `null` and missing keys take the field default, integers may
//! arrive as numbers or decimal strings, and unknown keys are ignored. It is
//! strict about content: bad base64, unknown enum names, and integers outside
//! the field's range are errors.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{map, Map, Value};
use tracing::trace;

use crate::core::{CodecError, ProtoValue, Record, Result, SchemaRegistry, MAX_SAFE_INTEGER};
use crate::encoding::defaults::{check_integer, default_record};
use crate::schema::ast::{
    FieldDescriptor, FieldKind, MessageSchema, ScalarType, UNRECOGNIZED_NAME, UNRECOGNIZED_NUMBER,
};

/// One message being imported.
struct Frame<'a> {
    schema: &'a MessageSchema,
    entries: map::Iter<'a>,
    record: Record,
    /// Parent field receiving this record; `None` for the root
    slot: Option<&'a FieldDescriptor>,
    /// Repeated message field whose elements are being imported
    pending: Option<Pending<'a>>,
}

struct Pending<'a> {
    field: &'a FieldDescriptor,
    elements: std::slice::Iter<'a, Value>,
    items: Vec<ProtoValue>,
}

impl<'a> Frame<'a> {
    fn new(
        schema: &'a MessageSchema,
        object: &'a Map<String, Value>,
        slot: Option<&'a FieldDescriptor>,
    ) -> Self {
        Self {
            schema,
            entries: object.iter(),
            record: default_record(schema),
            slot,
            pending: None,
        }
    }
}

/// Import a JSON object as a complete record.
///
/// # Example
///
/// ```
/// use seicodec::{from_json, ProtoValue, SchemaRegistry};
///
/// let registry = SchemaRegistry::builtin()?;
/// let counter = registry.get_message("VotePenaltyCounter")?;
/// let record = from_json(&registry, counter, &serde_json::json!({"miss_count": "7"}))?;
/// assert_eq!(record["miss_count"], ProtoValue::Int(7));
/// assert_eq!(record["abstain_count"], ProtoValue::Int(0));
/// # Ok::<(), seicodec::CodecError>(())
/// ```
pub fn from_json(registry: &SchemaRegistry, schema: &MessageSchema, json: &Value) -> Result<Record> {
    let object = json.as_object().ok_or_else(|| {
        CodecError::invalid_json(&schema.full_name, format!("expected object, found {}", kind_of(json)))
    })?;
    let mut stack = vec![Frame::new(schema, object, None)];

    while let Some(frame) = stack.last_mut() {
        if let Some(pending) = &mut frame.pending {
            let field = pending.field;
            match pending.elements.next() {
                Some(element) => {
                    let child = message_object(registry, field, element)?;
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

        let Some(field) = schema.field_by_json_name(key) else {
            trace!(message = %schema.full_name, key = %key, "ignoring unknown JSON key");
            continue;
        };
        if value.is_null() {
            continue;
        }

        if field.is_repeated() {
            let items = value.as_array().ok_or_else(|| {
                let found = kind_of(value);
                CodecError::invalid_json(&field.name, format!("expected array, found {found}"))
            })?;
            if matches!(field.kind, FieldKind::Message(_)) {
                frame.pending = Some(Pending {
                    field,
                    elements: items.iter(),
                    items: Vec::with_capacity(items.len()),
                });
                continue;
            }
            let converted = items
                .iter()
                .map(|item| element_from_json(registry, field, item))
                .collect::<Result<Vec<_>>>()?;
            frame.record.insert(field.name.clone(), ProtoValue::List(converted));
        } else if matches!(field.kind, FieldKind::Message(_)) {
            let child = message_object(registry, field, value)?;
            stack.push(child);
        } else {
            let converted = element_from_json(registry, field, value)?;
            frame.record.insert(field.name.clone(), converted);
        }
    }

    Err(CodecError::invalid_schema(
        &schema.full_name,
        "JSON import lost its root frame",
    ))
}

/// Start importing `value` as the message type of `field`.
fn message_object<'a>(
    registry: &'a SchemaRegistry,
    field: &'a FieldDescriptor,
    value: &'a Value,
) -> Result<Frame<'a>> {
    let FieldKind::Message(type_name) = &field.kind else {
        return Err(CodecError::invalid_schema(&field.name, "not a message field"));
    };
    let child = registry.get_message(type_name)?;
    let object = value
        .as_object()
        .ok_or_else(|| unexpected(field, "object", value))?;
    Ok(Frame::new(child, object, Some(field)))
}

fn element_from_json(
    registry: &SchemaRegistry,
    field: &FieldDescriptor,
    value: &Value,
) -> Result<ProtoValue> {
    match &field.kind {
        FieldKind::Scalar(ScalarType::Bool) => bool_from_json(field, value).map(ProtoValue::Bool),
        FieldKind::Scalar(ScalarType::Double) => {
            double_from_json(field, value).map(ProtoValue::Double)
        }
        FieldKind::Scalar(ScalarType::String) => match value {
            Value::String(s) => Ok(ProtoValue::String(s.clone())),
            Value::Number(n) => Ok(ProtoValue::String(n.to_string())),
            Value::Bool(b) => Ok(ProtoValue::String(b.to_string())),
            other => Err(unexpected(field, "string", other)),
        },
        FieldKind::Scalar(ScalarType::Bytes) => {
            let text = value
                .as_str()
                .ok_or_else(|| unexpected(field, "base64 string", value))?;
            STANDARD
                .decode(text)
                .map(ProtoValue::Bytes)
                .map_err(|e| CodecError::InvalidBase64 {
                    field: field.name.clone(),
                    reason: e.to_string(),
                })
        }
        FieldKind::Scalar(scalar) => {
            let v = integer_from_json(field, value)?;
            check_integer(&field.name, *scalar, v)?;
            Ok(ProtoValue::Int(v))
        }
        FieldKind::Enum(enum_name) => {
            let schema = registry.get_enum(enum_name)?;
            let number = match value {
                Value::String(name) if name == UNRECOGNIZED_NAME => UNRECOGNIZED_NUMBER,
                Value::String(name) => {
                    schema
                        .number_of(name)
                        .ok_or_else(|| CodecError::UnknownEnumName {
                            enum_name: schema.full_name.clone(),
                            name: name.clone(),
                        })?
                }
                Value::Number(_) => {
                    let n = integer_from_json(field, value)?;
                    match i32::try_from(n) {
                        Ok(n) if schema.contains(n) => n,
                        _ => UNRECOGNIZED_NUMBER,
                    }
                }
                other => return Err(unexpected(field, "enum name or number", other)),
            };
            Ok(ProtoValue::Enum(number))
        }
        FieldKind::Message(type_name) => Err(CodecError::invalid_schema(
            type_name,
            format!("field '{}' cannot be imported as a scalar", field.name),
        )),
        FieldKind::Unresolved(name) => Err(CodecError::invalid_schema(
            name,
            "registry is not linked",
        )),
    }
}

fn bool_from_json(field: &FieldDescriptor, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(unexpected(field, "bool", other)),
    }
}

fn double_from_json(field: &FieldDescriptor, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| unexpected(field, "double", value)),
        Value::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            text => text
                .trim()
                .parse::<f64>()
                .map_err(|_| unexpected(field, "double", value)),
        },
        other => Err(unexpected(field, "double", other)),
    }
}

/// Read an integer from a JSON number or decimal string.
///
/// Values beyond `i64` fail with `IntegerOverflow`; narrower range checks are
/// left to the caller.
fn integer_from_json(field: &FieldDescriptor, value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(v)
            } else if let Some(v) = n.as_u64() {
                Err(CodecError::integer_overflow(&field.name, v))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.fract() != 0.0 || !f.is_finite() {
                    return Err(unexpected(field, "integer", value));
                }
                if f.abs() > MAX_SAFE_INTEGER as f64 {
                    return Err(CodecError::integer_overflow(&field.name, n));
                }
                Ok(f as i64)
            }
        }
        Value::String(s) => {
            let text = s.trim();
            if let Ok(v) = text.parse::<i64>() {
                Ok(v)
            } else if text.parse::<u64>().is_ok() || text.parse::<i128>().is_ok() {
                Err(CodecError::integer_overflow(&field.name, text))
            } else {
                Err(unexpected(field, "integer", value))
            }
        }
        other => Err(unexpected(field, "integer", other)),
    }
}

fn unexpected(field: &FieldDescriptor, expected: &str, found: &Value) -> CodecError {
    CodecError::invalid_json(
        &field.name,
        format!("expected {expected}, found {}", kind_of(found)),
    )
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builtin().unwrap()
    }

    #[test]
    fn test_missing_and_null_keys_take_defaults() {
        let registry = registry();
        let item = registry.get_message("PriceSnapshotItem").unwrap();
        let record = from_json(&registry, item, &json!({"denom": null})).unwrap();
        assert_eq!(record["denom"], ProtoValue::String(String::new()));
        assert!(record["oracle_exchange_rate"].is_absent());
    }

    #[test]
    fn test_integers_from_numbers_and_strings() {
        let registry = registry();
        let snapshot = registry.get_message("PriceSnapshot").unwrap();
        let r = from_json(&registry, snapshot, &json!({"snapshotTimestamp": 1700000000})).unwrap();
        assert_eq!(r["snapshotTimestamp"], ProtoValue::Int(1_700_000_000));
        let r = from_json(&registry, snapshot, &json!({"snapshotTimestamp": "-5"})).unwrap();
        assert_eq!(r["snapshotTimestamp"], ProtoValue::Int(-5));
        let err = from_json(&registry, snapshot, &json!({"snapshotTimestamp": 1.5})).unwrap_err();
        assert!(matches!(err, CodecError::InvalidJson { .. }));
    }

    #[test]
    fn test_safe_integer_boundary() {
        let registry = registry();
        let counter = registry.get_message("VotePenaltyCounter").unwrap();
        let ok = from_json(&registry, counter, &json!({"miss_count": 9_007_199_254_740_991u64})).unwrap();
        assert_eq!(ok["miss_count"], ProtoValue::Int(MAX_SAFE_INTEGER));
        let err = from_json(&registry, counter, &json!({"miss_count": 9_007_199_254_740_992u64}))
            .unwrap_err();
        assert!(matches!(err, CodecError::IntegerOverflow { .. }));
        let err = from_json(&registry, counter, &json!({"miss_count": "18446744073709551615"}))
            .unwrap_err();
        assert!(matches!(err, CodecError::IntegerOverflow { .. }));
    }

    #[test]
    fn test_declared_name_is_accepted() {
        let registry = registry();
        let tuple = registry.get_message("ExchangeRateTuple").unwrap();
        let r = from_json(&registry, tuple, &json!({"exchange_rate": 1.25, "bogus": 1})).unwrap();
        assert_eq!(r["exchange_rate"], ProtoValue::String("1.25".into()));
        assert!(!r.contains_key("bogus"));
    }

    #[test]
    fn test_enum_names_and_numbers() {
        let registry = registry();
        let config = registry.get_message("AccessConfig").unwrap();
        let r = from_json(&registry, config, &json!({"permission": "ACCESS_TYPE_EVERYBODY"})).unwrap();
        assert_eq!(r["permission"], ProtoValue::Enum(3));
        let r = from_json(&registry, config, &json!({"permission": 2})).unwrap();
        assert_eq!(r["permission"], ProtoValue::Enum(2));
        let r = from_json(&registry, config, &json!({"permission": 99})).unwrap();
        assert_eq!(r["permission"], ProtoValue::Enum(UNRECOGNIZED_NUMBER));
        let r = from_json(&registry, config, &json!({"permission": "UNRECOGNIZED"})).unwrap();
        assert_eq!(r["permission"], ProtoValue::Enum(UNRECOGNIZED_NUMBER));

        let err = from_json(&registry, config, &json!({"permission": "ACCESS_TYPE_SOMETIMES"}))
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownEnumName { .. }));
    }

    #[test]
    fn test_invalid_base64() {
        let registry = registry();
        let any = registry.get_message("google.protobuf.Any").unwrap();
        let r = from_json(&registry, any, &json!({"value": "aGVsbG8="})).unwrap();
        assert_eq!(r["value"], ProtoValue::Bytes(b"hello".to_vec()));
        let err = from_json(&registry, any, &json!({"value": "not base64!"})).unwrap_err();
        assert!(matches!(err, CodecError::InvalidBase64 { .. }));
    }

    #[test]
    fn test_nested_and_repeated() {
        let registry = registry();
        let params = registry
            .get_message("seiprotocol.seichain.oracle.Params")
            .unwrap();
        let r = from_json(
            &registry,
            params,
            &json!({"vote_period": "10", "whitelist": [{"name": "usei"}, {}]}),
        )
        .unwrap();
        assert_eq!(r["vote_period"], ProtoValue::Int(10));
        let whitelist = r["whitelist"].as_list().unwrap();
        assert_eq!(whitelist.len(), 2);
        assert_eq!(
            whitelist[0],
            ProtoValue::Message(record([("name", "usei")]))
        );
        assert_eq!(
            whitelist[1],
            ProtoValue::Message(record([("name", "")]))
        );
    }

    #[test]
    fn test_shape_errors() {
        let registry = registry();
        let params = registry
            .get_message("seiprotocol.seichain.oracle.Params")
            .unwrap();
        assert!(matches!(
            from_json(&registry, params, &json!([1, 2])),
            Err(CodecError::InvalidJson { .. })
        ));
        assert!(matches!(
            from_json(&registry, params, &json!({"whitelist": "usei"})),
            Err(CodecError::InvalidJson { .. })
        ));
        assert!(matches!(
            from_json(&registry, params, &json!({"whitelist": ["usei"]})),
            Err(CodecError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_bool_string_forms() {
        let registry = registry();
        let schema = MessageSchema::new("t.Flag").with_field(FieldDescriptor::new(
            "enabled",
            1,
            FieldKind::Scalar(ScalarType::Bool),
        ));
        let r = from_json(&registry, &schema, &json!({"enabled": "true"})).unwrap();
        assert_eq!(r["enabled"], ProtoValue::Bool(true));
        assert!(from_json(&registry, &schema, &json!({"enabled": 1})).is_err());
    }
}
