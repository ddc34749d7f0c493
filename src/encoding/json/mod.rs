// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON bridge.
//!
//! Converts native records to and from `serde_json` trees using the same
//! entity schemas as the binary codec:
//! - [`to_json`] - export a record
//! - [`from_json`] - import a record

pub mod decoder;
pub mod encoder;

pub use decoder::from_json;
pub use encoder::to_json;
