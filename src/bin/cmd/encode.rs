// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encode command - JSON in, wire bytes out.

use anyhow::Context as _;
use clap::Args;

use crate::common::{read_arg, Context, Result};
use seicodec::MessageCodec;

/// Encode a JSON value as a message.
#[derive(Args, Clone, Debug)]
pub struct EncodeCmd {
    /// Message type (full or unique short name)
    #[arg(value_name = "TYPE")]
    type_name: String,

    /// JSON object, or `-` to read standard input
    #[arg(value_name = "JSON")]
    json: String,

    /// Print base64 instead of hex
    #[arg(long)]
    base64: bool,
}

impl EncodeCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let entity = ctx.codec.entity(&self.type_name)?;
        let text = read_arg(&self.json)?;
        let tree: serde_json::Value =
            serde_json::from_str(&text).context("input is not valid JSON")?;

        let record = entity.from_json(&tree)?;
        let bytes = entity.encode(&record)?;

        if self.base64 {
            use base64::Engine as _;
            println!("{}", base64::engine::general_purpose::STANDARD.encode(&bytes));
        } else {
            println!("{}", hex::encode(&bytes));
        }
        Ok(())
    }
}
