// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema definitions for `.proto` message types.
//!
//! This module provides:
//! - [`ast`] - Field descriptor tables for messages and enums
//! - [`parser`] - A Pest parser for the proto3 subset
//! - [`builtin`] - Bundled schemas for the chain's module APIs

pub mod ast;
pub mod builtin;
pub mod parser;

pub use ast::{
    EnumSchema, EnumVariant, FieldDescriptor, FieldKind, Label, MessageSchema, ProtoFile,
    ScalarType, WireType,
};
pub use parser::{parse_proto, parse_proto_file};
