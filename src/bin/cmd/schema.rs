// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema command - list and show registered message types.

use clap::Subcommand;
use serde::Serialize;

use crate::common::{output_json_or, Context, Result};
use seicodec::{FieldDescriptor, Label, MessageSchema};

/// Schema operations.
#[derive(Subcommand, Clone, Debug)]
pub enum SchemaCmd {
    /// List all registered message and enum types
    List {
        /// Only types whose full name contains this text
        #[arg(value_name = "FILTER")]
        filter: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the field table of a message type, or the values of an enum
    Show {
        /// Message or enum type (full or unique short name)
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct TypeItem {
    kind: &'static str,
    name: String,
    entries: usize,
}

#[derive(Serialize)]
struct FieldDetail {
    number: u32,
    name: String,
    json_name: String,
    kind: String,
    label: &'static str,
    packed: bool,
    wire_type: &'static str,
}

#[derive(Serialize)]
struct MessageDetail {
    name: String,
    fields: Vec<FieldDetail>,
}

#[derive(Serialize)]
struct EnumDetail {
    name: String,
    values: Vec<(String, i32)>,
}

impl SchemaCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        match self {
            SchemaCmd::List { filter, json } => cmd_list(ctx, filter.as_deref(), json),
            SchemaCmd::Show { type_name, json } => cmd_show(ctx, &type_name, json),
        }
    }
}

fn cmd_list(ctx: &Context, filter: Option<&str>, json: bool) -> Result<()> {
    let registry = ctx.codec.registry();
    let matches = |name: &str| filter.map_or(true, |f| name.contains(f));

    let mut items: Vec<TypeItem> = registry
        .messages()
        .filter(|m| matches(&m.full_name))
        .map(|m| TypeItem {
            kind: "message",
            name: m.full_name.clone(),
            entries: m.fields.len(),
        })
        .collect();
    items.extend(
        registry
            .enums()
            .filter(|e| matches(&e.full_name))
            .map(|e| TypeItem {
                kind: "enum",
                name: e.full_name.clone(),
                entries: e.values.len(),
            }),
    );

    output_json_or(json, &items, || {
        println!("=== {} types ===", items.len());
        println!();
        for item in &items {
            println!("{:<8} {} ({})", item.kind, item.name, item.entries);
        }
        Ok(())
    })
}

fn cmd_show(ctx: &Context, type_name: &str, json: bool) -> Result<()> {
    let registry = ctx.codec.registry();

    if let Ok(message) = registry.get_message(type_name) {
        let detail = message_detail(message);
        return output_json_or(json, &detail, || {
            println!("=== message {} ===", detail.name);
            println!();
            for field in &detail.fields {
                let label = if field.label == "repeated" { "repeated " } else { "" };
                let packed = if field.packed { " [packed]" } else { "" };
                println!(
                    "  {:>3}  {}{} {}{}  (json: {}, wire: {})",
                    field.number,
                    label,
                    field.kind,
                    field.name,
                    packed,
                    field.json_name,
                    field.wire_type
                );
            }
            Ok(())
        });
    }

    let enum_schema = registry.get_enum(type_name)?;
    let detail = EnumDetail {
        name: enum_schema.full_name.clone(),
        values: enum_schema.values.clone(),
    };
    output_json_or(json, &detail, || {
        println!("=== enum {} ===", detail.name);
        println!();
        for (name, number) in &detail.values {
            println!("  {number:>3}  {name}");
        }
        Ok(())
    })
}

fn message_detail(message: &MessageSchema) -> MessageDetail {
    MessageDetail {
        name: message.full_name.clone(),
        fields: message.fields.iter().map(field_detail).collect(),
    }
}

fn field_detail(field: &FieldDescriptor) -> FieldDetail {
    FieldDetail {
        number: field.number,
        name: field.name.clone(),
        json_name: field.json_name.clone(),
        kind: field.kind.describe(),
        label: match field.label {
            Label::Singular => "singular",
            Label::Repeated => "repeated",
        },
        packed: field.packed,
        wire_type: field.wire_type().as_str(),
    }
}
