// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Read cursor over Protocol Buffers wire bytes.
//!
//! The cursor tracks:
//! - `offset`: current read position in the buffer
//! - `limit`: end of the span being read (the whole buffer at top level)
//! - `limit_stack`: saved limits of the enclosing spans
//!
//! Entering a length-delimited span narrows the limit; leaving restores it.
//! Every read is bounded by the current limit, so a nested message can
//! never consume its parent's bytes.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use seicodec::encoding::protobuf::cursor::WireCursor;
//! use seicodec::schema::WireType;
//!
//! let data = [0x08, 0x96, 0x01];
//! let mut cursor = WireCursor::new(&data);
//! assert_eq!(cursor.read_tag()?, (1, WireType::Varint));
//! assert_eq!(cursor.read_varint()?, 150);
//! assert!(cursor.at_limit());
//! # Ok(())
//! # }
//! ```

use byteorder::{ByteOrder, LittleEndian};

use super::varint::read_varint;
use crate::core::{CodecError, Result};
use crate::schema::ast::{WireType, MAX_FIELD_NUMBER};

/// Bounded read cursor over wire bytes.
pub struct WireCursor<'a> {
    data: &'a [u8],
    offset: usize,
    limit: usize,
    limit_stack: Vec<usize>,
}

impl<'a> WireCursor<'a> {
    /// Create a cursor over the whole buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            limit: data.len(),
            limit_stack: Vec::new(),
        }
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left before the current limit.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.offset)
    }

    /// Check if the current span is exhausted.
    #[inline]
    pub fn at_limit(&self) -> bool {
        self.offset >= self.limit
    }

    /// Nesting depth of entered spans.
    #[inline]
    pub fn depth(&self) -> usize {
        self.limit_stack.len()
    }

    /// Narrow the limit to the next `len` bytes.
    ///
    /// Fails with [`CodecError::TruncatedMessage`] if fewer than `len` bytes
    /// remain in the current span.
    pub fn enter(&mut self, len: u64) -> Result<()> {
        let available = self.remaining();
        if len > available as u64 {
            return Err(CodecError::truncated(len, available, self.offset));
        }
        self.limit_stack.push(self.limit);
        self.limit = self.offset + len as usize;
        Ok(())
    }

    /// Restore the limit saved by the matching [`enter`](Self::enter).
    pub fn exit(&mut self) {
        if let Some(limit) = self.limit_stack.pop() {
            self.limit = limit;
        }
    }

    /// Read one varint.
    pub fn read_varint(&mut self) -> Result<u64> {
        let (value, end) = read_varint(&self.data[..self.limit], self.offset)?;
        self.offset = end;
        Ok(value)
    }

    /// Read a tag and split it into field number and wire type.
    pub fn read_tag(&mut self) -> Result<(u32, WireType)> {
        let position = self.offset;
        let tag = self.read_varint()?;
        let number = tag >> 3;
        if number == 0 {
            return Err(CodecError::malformed_tag(
                tag,
                position,
                "field number must be positive",
            ));
        }
        if number > MAX_FIELD_NUMBER as u64 {
            return Err(CodecError::malformed_tag(
                tag,
                position,
                format!("field number {number} exceeds {MAX_FIELD_NUMBER}"),
            ));
        }
        let wire_type = WireType::from_u8((tag & 0x07) as u8).ok_or_else(|| {
            CodecError::malformed_tag(
                tag,
                position,
                format!("unsupported wire type {}", tag & 0x07),
            )
        })?;
        Ok((number as u32, wire_type))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(CodecError::truncated(len as u64, available, self.offset));
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Read 4 little-endian bytes.
    pub fn read_fixed32(&mut self) -> Result<u32> {
        self.take(4).map(LittleEndian::read_u32)
    }

    /// Read 8 little-endian bytes.
    pub fn read_fixed64(&mut self) -> Result<u64> {
        self.take(8).map(LittleEndian::read_u64)
    }

    /// Read a length prefix and return the payload it covers.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let position = self.offset;
        let len = self.read_varint()?;
        let available = self.remaining();
        if len > available as u64 {
            return Err(CodecError::truncated(len, available, position));
        }
        self.take(len as usize)
    }

    /// Skip one field value of the given wire type.
    pub fn skip(&mut self, wire_type: WireType) -> Result<()> {
        match wire_type {
            WireType::Varint => self.read_varint().map(|_| ()),
            WireType::Fixed64 => self.take(8).map(|_| ()),
            WireType::LengthDelimited => self.read_length_delimited().map(|_| ()),
            WireType::Fixed32 => self.take(4).map(|_| ()),
        }
    }
}
