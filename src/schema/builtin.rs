// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bundled `.proto` schemas for the chain's module APIs.
//!
//! The sources are compiled into the binary so the registry works without
//! any schema files on disk.

use crate::core::{Result, SchemaRegistry};
use crate::schema::parser::parse_proto;

/// `(source name, text)` of every bundled schema, dependencies first.
pub const BUILTIN_PROTOS: &[(&str, &str)] = &[
    (
        "google/protobuf/any.proto",
        include_str!("protos/google/protobuf/any.proto"),
    ),
    (
        "cosmos/base/v1beta1/coin.proto",
        include_str!("protos/cosmos/base/v1beta1/coin.proto"),
    ),
    ("oracle/oracle.proto", include_str!("protos/oracle/oracle.proto")),
    ("oracle/query.proto", include_str!("protos/oracle/query.proto")),
    ("oracle/tx.proto", include_str!("protos/oracle/tx.proto")),
    (
        "cosmwasm/wasm/v1/types.proto",
        include_str!("protos/wasm/types.proto"),
    ),
    ("dex/order.proto", include_str!("protos/dex/order.proto")),
];

/// Parse every bundled schema into `registry`. Does not link.
pub fn register_builtin(registry: &mut SchemaRegistry) -> Result<()> {
    for (name, text) in BUILTIN_PROTOS {
        registry.add_file(parse_proto(name, text)?)?;
    }
    Ok(())
}
