// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Base-128 varint encoding.
//!
//! Seven payload bits per byte, least significant group first, high bit set
//! on every byte except the last. A 64-bit value takes at most 10 bytes.

use crate::core::{CodecError, Result};

/// Longest varint a 64-bit value can need.
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` as a varint.
#[inline]
pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Append a signed value as its 64-bit two's-complement varint.
///
/// Negative numbers always take the full 10 bytes.
#[inline]
pub fn write_signed_varint(buf: &mut Vec<u8>, value: i64) {
    write_varint(buf, value as u64);
}

/// Number of bytes `value` occupies as a varint.
#[inline]
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Read a varint from `data` starting at `pos`.
///
/// Returns the value and the position just past it. Fails when the input
/// ends mid-varint, or when the tenth byte carries anything beyond the 64th
/// bit (a continuation bit included).
#[inline]
pub fn read_varint(data: &[u8], pos: usize) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = data.get(pos + i) else {
            return Err(CodecError::malformed_varint(
                pos,
                "input ended inside a varint",
            ));
        };
        if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(CodecError::malformed_varint(
                pos,
                format!("byte {byte:#04x} at offset {i} overflows 64 bits"),
            ));
        }
        result |= ((byte & 0x7F) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((result, pos + i + 1));
        }
    }
    // the tenth byte is at most 0x01, so the loop always returns
    Err(CodecError::malformed_varint(
        pos,
        format!("continuation past {MAX_VARINT_LEN} bytes"),
    ))
}
