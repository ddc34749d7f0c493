// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout seicodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error handling for wire, bridge and schema failures
//! - [`ProtoValue`] - Native value representation
//! - [`SchemaRegistry`] - Linked message and enum types

pub mod error;
pub mod registry;
pub mod value;

pub use error::{CodecError, Result};
pub use registry::SchemaRegistry;
pub use value::{record, ProtoValue, Record, MAX_SAFE_INTEGER};
