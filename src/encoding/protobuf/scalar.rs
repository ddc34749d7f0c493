// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Scalar codec: one value of a scalar or enum kind, without its tag.
//!
//! Signed integers use plain two's-complement varints (no zigzag), so a
//! negative value always costs 10 bytes. 32-bit kinds read the low 32 bits
//! of the varint. 64-bit kinds are checked against the safe-integer range in
//! both directions.

use super::cursor::WireCursor;
use super::writer::WireWriter;
use crate::core::value::{to_safe_number, to_safe_signed};
use crate::core::{CodecError, ProtoValue, Result};
use crate::schema::ast::ScalarType;

/// Write the payload of one scalar value.
pub fn write_scalar(
    writer: &mut WireWriter,
    field: &str,
    scalar: ScalarType,
    value: &ProtoValue,
) -> Result<()> {
    match (scalar, value) {
        (ScalarType::Bool, ProtoValue::Bool(b)) => writer.write_varint(*b as u64),
        (ScalarType::Int32, ProtoValue::Int(v)) => {
            let v = i32::try_from(*v)
                .map_err(|_| CodecError::type_mismatch(field, "int32", v.to_string()))?;
            writer.write_signed_varint(i64::from(v));
        }
        (ScalarType::Int64, ProtoValue::Int(v)) => {
            writer.write_signed_varint(to_safe_signed(field, *v)?);
        }
        (ScalarType::Uint32, ProtoValue::Int(v)) => {
            let v = u32::try_from(*v)
                .map_err(|_| CodecError::type_mismatch(field, "uint32", v.to_string()))?;
            writer.write_varint(v as u64);
        }
        (ScalarType::Uint64, ProtoValue::Int(v)) => {
            if *v < 0 {
                return Err(CodecError::type_mismatch(field, "uint64", v.to_string()));
            }
            writer.write_varint(to_safe_signed(field, *v)? as u64);
        }
        (ScalarType::Double, ProtoValue::Double(d)) => writer.write_fixed64(d.to_bits()),
        (ScalarType::String, ProtoValue::String(s)) => writer.write_length_delimited(s.as_bytes()),
        (ScalarType::Bytes, ProtoValue::Bytes(b)) => writer.write_length_delimited(b),
        (scalar, other) => {
            return Err(CodecError::type_mismatch(
                field,
                scalar.as_str(),
                other.type_name(),
            ))
        }
    }
    Ok(())
}

/// Write the payload of one enum value.
///
/// Numbers outside the variant table are written unchanged.
pub fn write_enum(writer: &mut WireWriter, field: &str, value: &ProtoValue) -> Result<()> {
    let number = match value {
        ProtoValue::Enum(n) => *n,
        ProtoValue::Int(v) => i32::try_from(*v)
            .map_err(|_| CodecError::type_mismatch(field, "enum", v.to_string()))?,
        other => return Err(CodecError::type_mismatch(field, "enum", other.type_name())),
    };
    writer.write_signed_varint(i64::from(number));
    Ok(())
}

/// Read the payload of one scalar value.
pub fn read_scalar(cursor: &mut WireCursor<'_>, field: &str, scalar: ScalarType) -> Result<ProtoValue> {
    let value = match scalar {
        ScalarType::Bool => ProtoValue::Bool(cursor.read_varint()? != 0),
        ScalarType::Int32 => ProtoValue::Int(cursor.read_varint()? as u32 as i32 as i64),
        ScalarType::Uint32 => ProtoValue::Int(cursor.read_varint()? as u32 as i64),
        ScalarType::Int64 => ProtoValue::Int(to_safe_signed(field, cursor.read_varint()? as i64)?),
        ScalarType::Uint64 => ProtoValue::Int(to_safe_number(field, cursor.read_varint()?)?),
        ScalarType::Double => ProtoValue::Double(f64::from_bits(cursor.read_fixed64()?)),
        ScalarType::String => {
            let position = cursor.position();
            let bytes = cursor.read_length_delimited()?;
            let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 {
                field: field.to_string(),
                position,
            })?;
            ProtoValue::String(text.to_string())
        }
        ScalarType::Bytes => ProtoValue::Bytes(cursor.read_length_delimited()?.to_vec()),
    };
    Ok(value)
}

/// Read the payload of one enum value, truncated to 32 bits.
pub fn read_enum(cursor: &mut WireCursor<'_>) -> Result<i32> {
    Ok(cursor.read_varint()? as u32 as i32)
}
