// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - dump raw wire fields without a schema.

use clap::Args;
use serde::Serialize;

use crate::common::{output_json_or, parse_hex, read_arg, Context, Result};
use seicodec::{scan_fields, RawField, RawValue};

/// Dump every field of a buffer.
#[derive(Args, Clone, Debug)]
pub struct InspectCmd {
    /// Hex-encoded bytes, or `-` to read standard input
    #[arg(value_name = "HEX")]
    hex: String,

    /// Also scan length-delimited payloads that parse as messages, up to this depth
    #[arg(short, long, default_value_t = 0)]
    depth: usize,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

#[derive(Serialize)]
struct FieldItem {
    position: usize,
    number: u32,
    wire_type: &'static str,
    value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    nested: Vec<FieldItem>,
}

impl InspectCmd {
    pub fn run(self, _ctx: &Context) -> Result<()> {
        let bytes = parse_hex(&read_arg(&self.hex)?)?;
        let fields = scan_fields(&bytes)?;
        let items: Vec<FieldItem> = fields.iter().map(|f| to_item(f, self.depth)).collect();

        output_json_or(self.json, &items, || {
            println!("=== {} bytes, {} fields ===", bytes.len(), items.len());
            print_items(&items, 0);
            Ok(())
        })
    }
}

fn to_item(field: &RawField, depth: usize) -> FieldItem {
    let nested = match &field.value {
        RawValue::LengthDelimited(payload) if depth > 0 && !payload.is_empty() => {
            scan_fields(payload)
                .map(|inner| inner.iter().map(|f| to_item(f, depth - 1)).collect())
                .unwrap_or_default()
        }
        _ => Vec::new(),
    };
    FieldItem {
        position: field.position,
        number: field.number,
        wire_type: field.wire_type.as_str(),
        value: field.value.to_string(),
        nested,
    }
}

fn print_items(items: &[FieldItem], indent: usize) {
    for item in items {
        println!(
            "{:indent$}@{} field {} [{}] = {}",
            "",
            item.position,
            item.number,
            item.wire_type,
            item.value,
            indent = indent * 2
        );
        print_items(&item.nested, indent + 1);
    }
}
