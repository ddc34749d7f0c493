// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema parser implementations.

pub mod proto_parser;

pub use proto_parser::parse as parse_proto;

use std::path::Path;

use crate::core::Result;
use crate::schema::ast::ProtoFile;

/// Read and parse a `.proto` file from disk.
///
/// The path, as given, becomes the file's source name.
pub fn parse_proto_file(path: impl AsRef<Path>) -> Result<ProtoFile> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_proto(&path.display().to_string(), &text)
}
