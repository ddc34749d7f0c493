// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Append-only writer for Protocol Buffers wire bytes.
//!
//! Length-delimited spans whose size is not known up front are written with
//! [`WireWriter::fork`] / [`WireWriter::ldelim`]. The payload is appended in
//! place and the closed span's length prefix is kept aside; [`WireWriter::finish`]
//! stitches prefixes and payload together in one pass, so nesting depth never
//! causes bytes to be moved more than once.
//!
//! # Example
//!
//! ```
//! use seicodec::encoding::protobuf::writer::WireWriter;
//! use seicodec::schema::WireType;
//!
//! let mut writer = WireWriter::new();
//! writer.write_tag(1, WireType::LengthDelimited);
//! writer.fork();
//! writer.write_tag(1, WireType::Varint);
//! writer.write_varint(150);
//! writer.ldelim();
//! assert_eq!(writer.finish(), vec![0x0A, 0x03, 0x08, 0x96, 0x01]);
//! ```

use byteorder::{ByteOrder, LittleEndian};

use super::varint::{varint_len, write_signed_varint, write_varint};
use crate::schema::ast::WireType;

/// Default initial capacity for the writer buffer.
const DEFAULT_CAPACITY: usize = 64;

/// A length-delimited span, in the order spans were opened.
#[derive(Debug, Clone, Copy)]
struct Span {
    /// Offset in `buffer` where the length prefix belongs
    start: usize,
    /// Prefix bytes already set aside when the span was opened
    prefixes_before: usize,
    /// Range of the prefix in `prefixes`, once closed
    prefix: Option<(usize, usize)>,
}

/// Append-only wire writer.
#[derive(Debug, Default)]
pub struct WireWriter {
    buffer: Vec<u8>,
    /// Length prefixes of closed spans, in closing order
    prefixes: Vec<u8>,
    spans: Vec<Span>,
    /// Indices into `spans` of spans still open
    open: Vec<usize>,
}

impl WireWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a writer with a pre-sized buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Write a tag for `number` with `wire_type`.
    #[inline]
    pub fn write_tag(&mut self, number: u32, wire_type: WireType) {
        write_varint(
            &mut self.buffer,
            ((number as u64) << 3) | wire_type.as_u8() as u64,
        );
    }

    /// Write an unsigned varint.
    #[inline]
    pub fn write_varint(&mut self, value: u64) {
        write_varint(&mut self.buffer, value);
    }

    /// Write a signed integer as its two's-complement varint.
    #[inline]
    pub fn write_signed_varint(&mut self, value: i64) {
        write_signed_varint(&mut self.buffer, value);
    }

    /// Write 4 little-endian bytes.
    pub fn write_fixed32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write 8 little-endian bytes.
    pub fn write_fixed64(&mut self, value: u64) {
        let mut bytes = [0u8; 8];
        LittleEndian::write_u64(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write a length prefix followed by `payload`.
    pub fn write_length_delimited(&mut self, payload: &[u8]) {
        write_varint(&mut self.buffer, payload.len() as u64);
        self.buffer.extend_from_slice(payload);
    }

    /// Open a length-delimited span.
    pub fn fork(&mut self) {
        self.open.push(self.spans.len());
        self.spans.push(Span {
            start: self.buffer.len(),
            prefixes_before: self.prefixes.len(),
            prefix: None,
        });
    }

    /// Close the innermost open span and record its length prefix.
    ///
    /// Every prefix recorded since the span opened belongs to a span nested
    /// inside it, so those bytes count towards its length.
    pub fn ldelim(&mut self) {
        let Some(index) = self.open.pop() else {
            return;
        };
        let span = &mut self.spans[index];
        let len = (self.buffer.len() - span.start) + (self.prefixes.len() - span.prefixes_before);
        let offset = self.prefixes.len();
        write_varint(&mut self.prefixes, len as u64);
        span.prefix = Some((offset, varint_len(len as u64)));
    }

    /// Consume the writer and return the bytes.
    ///
    /// Spans still open are closed first.
    pub fn finish(mut self) -> Vec<u8> {
        while !self.open.is_empty() {
            self.ldelim();
        }
        if self.spans.is_empty() {
            return self.buffer;
        }

        // Spans are in opening order, so their starts never decrease and an
        // enclosing span's prefix lands before the ones it contains.
        let mut out = Vec::with_capacity(self.buffer.len() + self.prefixes.len());
        let mut copied = 0;
        for span in &self.spans {
            out.extend_from_slice(&self.buffer[copied..span.start]);
            if let Some((offset, len)) = span.prefix {
                out.extend_from_slice(&self.prefixes[offset..offset + len]);
            }
            copied = span.start;
        }
        out.extend_from_slice(&self.buffer[copied..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::protobuf::varint::read_varint;

    #[test]
    fn test_string_field() {
        let mut writer = WireWriter::new();
        writer.write_tag(1, WireType::LengthDelimited);
        writer.write_length_delimited(b"usei");
        assert_eq!(writer.finish(), vec![0x0A, 0x04, b'u', b's', b'e', b'i']);
    }

    #[test]
    fn test_fixed_values() {
        let mut writer = WireWriter::new();
        writer.write_fixed32(1);
        writer.write_fixed64(2);
        let bytes = writer.finish();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[..4], &[1, 0, 0, 0]);
        assert_eq!(bytes[4], 2);
    }

    #[test]
    fn test_nested_forks() {
        let mut writer = WireWriter::new();
        writer.write_tag(2, WireType::LengthDelimited);
        writer.fork();
        writer.write_tag(2, WireType::LengthDelimited);
        writer.fork();
        writer.write_tag(1, WireType::Varint);
        writer.write_varint(1);
        writer.ldelim();
        writer.ldelim();
        assert_eq!(writer.finish(), vec![0x12, 0x04, 0x12, 0x02, 0x08, 0x01]);
    }

    #[test]
    fn test_empty_fork_has_zero_length() {
        let mut writer = WireWriter::new();
        writer.write_tag(5, WireType::LengthDelimited);
        writer.fork();
        writer.ldelim();
        assert_eq!(writer.finish(), vec![0x2A, 0x00]);
    }

    #[test]
    fn test_long_span_prefix() {
        let payload = vec![0xAB; 200];
        let mut writer = WireWriter::new();
        writer.fork();
        for byte in &payload {
            writer.write_varint(*byte as u64 & 0x7F);
        }
        writer.ldelim();
        let bytes = writer.finish();
        assert_eq!(&bytes[..2], &[0xC8, 0x01]);
        assert_eq!(bytes.len(), 202);
    }

    #[test]
    fn test_inner_prefixes_count_towards_outer_length() {
        let mut writer = WireWriter::new();
        writer.write_tag(1, WireType::LengthDelimited);
        writer.fork();
        writer.write_tag(2, WireType::LengthDelimited);
        writer.fork();
        for _ in 0..200 {
            writer.write_varint(0x2A);
        }
        writer.ldelim();
        writer.ldelim();
        let bytes = writer.finish();
        // inner: 200 payload bytes behind C8 01; outer: 1 tag + 2 prefix + 200
        assert_eq!(&bytes[..6], &[0x0A, 0xCB, 0x01, 0x12, 0xC8, 0x01]);
        assert_eq!(bytes.len(), 206);
        assert!(bytes[6..].iter().all(|b| *b == 0x2A));
    }

    #[test]
    fn test_sibling_spans_after_nested_ones() {
        let mut writer = WireWriter::new();
        writer.write_tag(1, WireType::LengthDelimited);
        writer.fork();
        writer.write_tag(1, WireType::LengthDelimited);
        writer.fork();
        writer.ldelim();
        writer.ldelim();
        writer.write_tag(2, WireType::LengthDelimited);
        writer.fork();
        writer.write_tag(1, WireType::Varint);
        writer.write_varint(3);
        writer.ldelim();
        assert_eq!(
            writer.finish(),
            vec![0x0A, 0x02, 0x0A, 0x00, 0x12, 0x02, 0x08, 0x03]
        );
    }

    #[test]
    fn test_span_opened_at_same_offset_as_parent() {
        let mut writer = WireWriter::new();
        writer.fork();
        writer.fork();
        writer.write_varint(7);
        writer.ldelim();
        writer.ldelim();
        assert_eq!(writer.finish(), vec![0x02, 0x01, 0x07]);
    }

    #[test]
    fn test_deep_nesting_is_linear() {
        const DEPTH: usize = 10_000;
        let mut writer = WireWriter::new();
        for _ in 0..DEPTH {
            writer.write_tag(1, WireType::LengthDelimited);
            writer.fork();
        }
        for _ in 0..DEPTH {
            writer.ldelim();
        }
        let bytes = writer.finish();
        // innermost span is empty; every level adds one tag and its prefix
        assert_eq!(&bytes[bytes.len() - 2..], &[0x0A, 0x00]);
        assert_eq!(bytes[0], 0x0A);
        let mut pos = 0;
        let mut levels = 0;
        while pos < bytes.len() {
            assert_eq!(bytes[pos], 0x0A);
            let (len, next) = read_varint(&bytes, pos + 1).unwrap();
            assert_eq!(len as usize, bytes.len() - next);
            pos = next;
            levels += 1;
        }
        assert_eq!(levels, DEPTH);
    }
}
