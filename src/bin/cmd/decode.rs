// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - wire bytes in, JSON out.

use clap::Args;

use crate::common::{parse_hex, read_arg, to_json_string, Context, Result};
use seicodec::MessageCodec;

/// Decode a message and print it as JSON.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// Message type (full or unique short name)
    #[arg(value_name = "TYPE")]
    type_name: String,

    /// Hex-encoded bytes, or `-` to read standard input
    #[arg(value_name = "HEX")]
    hex: String,

    /// Decode only the first N bytes
    #[arg(short, long, value_name = "N")]
    length: Option<usize>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

impl DecodeCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let entity = ctx.codec.entity(&self.type_name)?;
        let bytes = parse_hex(&read_arg(&self.hex)?)?;

        let record = match entity.decode_with_length(&bytes, self.length) {
            Ok(record) => record,
            Err(e) if e.is_wire_error() => {
                let context = format!("input is not a valid {} message", entity.entity_name());
                return Err(anyhow::Error::new(e).context(context));
            }
            Err(e) => return Err(e.into()),
        };
        let tree = entity.to_json(&record)?;
        println!("{}", to_json_string(&tree, self.pretty || ctx.pretty)?);
        Ok(())
    }
}
