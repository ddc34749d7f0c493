// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for seicodec.
//!
//! Errors fall into three groups:
//! - Wire errors raised while reading Protocol Buffers bytes
//! - Bridge errors raised while converting native records to and from JSON
//! - Schema errors raised while parsing and linking `.proto` definitions
//!
//! Every error is a local, non-recoverable failure for the call that raised
//! it. Unknown field numbers are not errors; the decoder skips them.

use thiserror::Error;

/// Errors that can occur while encoding, decoding, or bridging messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Varint continuation chain longer than 10 bytes or cut off by the end of input
    #[error("Malformed varint at position {position}: {reason}")]
    MalformedVarint {
        /// Cursor position where the varint started
        position: usize,
        /// What went wrong
        reason: String,
    },

    /// Tag with a non-positive field number or an unsupported wire type
    #[error("Malformed tag {tag:#x} at position {position}: {reason}")]
    MalformedTag {
        /// Raw tag value
        tag: u64,
        /// Cursor position of the tag
        position: usize,
        /// What went wrong
        reason: String,
    },

    /// Declared length runs past the end of the buffer
    #[error(
        "Truncated message: {requested} bytes declared at position {position}, but only {available} bytes remain"
    )]
    TruncatedMessage {
        /// Bytes the input claims to contain
        requested: u64,
        /// Bytes actually left in the buffer
        available: usize,
        /// Cursor position of the declared span
        position: usize,
    },

    /// 64-bit quantity outside the safe-integer range of the native carrier
    #[error("Integer overflow in field '{field}': {value} exceeds the safe integer range")]
    IntegerOverflow {
        /// Field being converted
        field: String,
        /// Offending value, in decimal
        value: String,
    },

    /// JSON bytes field is not valid base64
    #[error("Invalid base64 in field '{field}': {reason}")]
    InvalidBase64 {
        /// Field being converted
        field: String,
        /// Decoder message
        reason: String,
    },

    /// JSON enum string not present in the variant table
    #[error("Unknown enum name '{name}' for enum '{enum_name}'")]
    UnknownEnumName {
        /// Enum full name
        enum_name: String,
        /// Name that was not found
        name: String,
    },

    /// Known field arrived with a wire type its kind cannot carry
    #[error("Field '{field}' expects wire type {expected}, found {found} at position {position}")]
    UnexpectedWireType {
        /// Field name
        field: String,
        /// Wire type the schema allows
        expected: u8,
        /// Wire type seen on the wire
        found: u8,
        /// Cursor position of the tag
        position: usize,
    },

    /// String field bytes are not valid UTF-8
    #[error("Invalid UTF-8 in field '{field}' at position {position}")]
    InvalidUtf8 {
        /// Field name
        field: String,
        /// Cursor position of the payload
        position: usize,
    },

    /// Native value does not match the field kind
    #[error("Type mismatch in field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Kind the schema declares
        expected: String,
        /// Kind of the value supplied
        found: String,
    },

    /// Partial record names a field the entity does not declare
    #[error("Unknown field '{field}' for message '{message}'")]
    UnknownField {
        /// Message full name
        message: String,
        /// Field name that was not found
        field: String,
    },

    /// JSON tree has the wrong shape for the entity
    #[error("Invalid JSON for '{context}': {reason}")]
    InvalidJson {
        /// Field or message being read
        context: String,
        /// What went wrong
        reason: String,
    },

    /// Type not found in the schema registry
    #[error("Type not found: '{type_name}'")]
    TypeNotFound {
        /// Type name that was not found
        type_name: String,
    },

    /// Schema failed validation while linking
    #[error("Invalid schema '{schema_name}': {reason}")]
    InvalidSchema {
        /// Schema name or identifier
        schema_name: String,
        /// Validation error message
        reason: String,
    },

    /// Parse error in schema text
    #[error("Parse error in {context}: {message}")]
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// I/O failure while loading schema or configuration files
    #[error("I/O error: {0}")]
    Io(String),
}

impl CodecError {
    /// Create a malformed varint error.
    pub fn malformed_varint(position: usize, reason: impl Into<String>) -> Self {
        CodecError::MalformedVarint {
            position,
            reason: reason.into(),
        }
    }

    /// Create a malformed tag error.
    pub fn malformed_tag(tag: u64, position: usize, reason: impl Into<String>) -> Self {
        CodecError::MalformedTag {
            tag,
            position,
            reason: reason.into(),
        }
    }

    /// Create a truncated message error.
    pub fn truncated(requested: u64, available: usize, position: usize) -> Self {
        CodecError::TruncatedMessage {
            requested,
            available,
            position,
        }
    }

    /// Create an integer overflow error.
    pub fn integer_overflow(field: impl Into<String>, value: impl ToString) -> Self {
        CodecError::IntegerOverflow {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        CodecError::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid JSON error.
    pub fn invalid_json(context: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidJson {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a "type not found" error.
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        CodecError::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// Create an invalid schema error.
    pub fn invalid_schema(schema_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidSchema {
            schema_name: schema_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while reading wire bytes.
    pub fn is_wire_error(&self) -> bool {
        matches!(
            self,
            CodecError::MalformedVarint { .. }
                | CodecError::MalformedTag { .. }
                | CodecError::TruncatedMessage { .. }
                | CodecError::UnexpectedWireType { .. }
                | CodecError::InvalidUtf8 { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::MalformedVarint { position, reason } => vec![
                ("position", position.to_string()),
                ("reason", reason.clone()),
            ],
            CodecError::MalformedTag {
                tag,
                position,
                reason,
            } => vec![
                ("tag", tag.to_string()),
                ("position", position.to_string()),
                ("reason", reason.clone()),
            ],
            CodecError::TruncatedMessage {
                requested,
                available,
                position,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::IntegerOverflow { field, value } => {
                vec![("field", field.clone()), ("value", value.clone())]
            }
            CodecError::InvalidBase64 { field, reason } => {
                vec![("field", field.clone()), ("reason", reason.clone())]
            }
            CodecError::UnknownEnumName { enum_name, name } => {
                vec![("enum", enum_name.clone()), ("name", name.clone())]
            }
            CodecError::UnexpectedWireType {
                field,
                expected,
                found,
                position,
            } => vec![
                ("field", field.clone()),
                ("expected", expected.to_string()),
                ("found", found.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::InvalidUtf8 { field, position } => {
                vec![("field", field.clone()), ("position", position.to_string())]
            }
            CodecError::TypeMismatch {
                field,
                expected,
                found,
            } => vec![
                ("field", field.clone()),
                ("expected", expected.clone()),
                ("found", found.clone()),
            ],
            CodecError::UnknownField { message, field } => {
                vec![("message", message.clone()), ("field", field.clone())]
            }
            CodecError::InvalidJson { context, reason } => {
                vec![("context", context.clone()), ("reason", reason.clone())]
            }
            CodecError::TypeNotFound { type_name } => vec![("type", type_name.clone())],
            CodecError::InvalidSchema {
                schema_name,
                reason,
            } => vec![("schema", schema_name.clone()), ("reason", reason.clone())],
            CodecError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::Io(msg) => vec![("message", msg.clone())],
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::Io(err.to_string())
    }
}

/// Result type for seicodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
