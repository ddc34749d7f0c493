// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `.proto` parser using Pest.
//!
//! Handles the proto3 subset the chain's module APIs are written in:
//! - `syntax`, `package`, `import` and `option` statements
//! - Messages with singular, `optional` and `repeated` fields, nested to any depth
//! - Enums
//! - Field options `packed` and `json_name` (other options are accepted and ignored)
//! - Services (skipped)
//!
//! Nested declarations are flattened to fully-qualified names. Type references
//! stay unresolved until the registry links them.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::trace;

use crate::core::{CodecError, Result};
use crate::schema::ast::{
    EnumSchema, FieldDescriptor, FieldKind, MessageSchema, ProtoFile, ScalarType,
};

/// Pest parser for `.proto` files.
#[derive(Parser)]
#[grammar = "schema/parser/proto_parser/proto.pest"] // Path relative to src/ directory
pub struct ProtoParser;

/// Scalar keywords that are valid protobuf but outside the supported kind set.
const UNSUPPORTED_SCALARS: &[&str] = &[
    "float", "sint32", "sint64", "fixed32", "fixed64", "sfixed32", "sfixed64",
];

/// Parse one `.proto` source.
///
/// `source_name` labels errors and becomes [`ProtoFile::name`].
pub fn parse(source_name: &str, text: &str) -> Result<ProtoFile> {
    let root = ProtoParser::parse(Rule::file, text)
        .map_err(|e| CodecError::parse(source_name, format!("{e}")))?
        .next()
        .ok_or_else(|| CodecError::parse(source_name, "empty parse tree"))?;

    let items: Vec<Pair<Rule>> = root.into_inner().collect();

    let mut file = ProtoFile {
        name: source_name.to_string(),
        ..Default::default()
    };

    // Package applies to every declaration in the file, wherever it appears
    for item in items.iter().filter(|p| p.as_rule() == Rule::package) {
        if !file.package.is_empty() {
            return Err(CodecError::parse(source_name, "multiple package statements"));
        }
        file.package = first_inner(item, Rule::full_ident)
            .map(|p| p.as_str().to_string())
            .unwrap_or_default();
    }

    for item in items {
        match item.as_rule() {
            Rule::syntax => check_syntax(source_name, item)?,
            Rule::import => {
                if let Some(path) = first_inner(&item, Rule::string_lit) {
                    file.imports.push(string_value(path));
                }
            }
            Rule::message => {
                let scope = file.package.clone();
                walk_message(source_name, &scope, item, &mut file)?;
            }
            Rule::enum_def => {
                let enum_schema = walk_enum(source_name, &file.package, item)?;
                file.enums.push(enum_schema);
            }
            Rule::unsupported => return Err(unsupported(source_name, &item)),
            // package handled above; options, services and empty statements carry nothing
            _ => {}
        }
    }

    trace!(
        source = source_name,
        package = %file.package,
        messages = file.messages.len(),
        enums = file.enums.len(),
        "parsed proto file"
    );
    Ok(file)
}

fn check_syntax(source_name: &str, pair: Pair<Rule>) -> Result<()> {
    let version = first_inner(&pair, Rule::string_lit)
        .map(string_value)
        .unwrap_or_default();
    if version != "proto3" {
        return Err(CodecError::parse(
            source_name,
            format!("syntax \"{version}\" is not supported, expected \"proto3\""),
        ));
    }
    Ok(())
}

fn walk_message(
    source_name: &str,
    scope: &str,
    pair: Pair<Rule>,
    file: &mut ProtoFile,
) -> Result<()> {
    let mut inner = pair.into_inner().filter(|p| p.as_rule() != Rule::kw_message);
    let name = inner
        .next()
        .ok_or_else(|| CodecError::parse(source_name, "message without a name"))?;
    let full_name = qualify(scope, name.as_str());
    let mut schema = MessageSchema::new(full_name.clone());

    for item in inner {
        match item.as_rule() {
            Rule::field => schema.add_field(walk_field(source_name, &full_name, item)?),
            Rule::message => walk_message(source_name, &full_name, item, file)?,
            Rule::enum_def => {
                let enum_schema = walk_enum(source_name, &full_name, item)?;
                file.enums.push(enum_schema);
            }
            Rule::unsupported => return Err(unsupported(source_name, &item)),
            _ => {}
        }
    }

    file.messages.push(schema);
    Ok(())
}

fn walk_field(source_name: &str, message: &str, pair: Pair<Rule>) -> Result<FieldDescriptor> {
    let mut label = None;
    let mut type_name = None;
    let mut name = None;
    let mut number = None;
    let mut options = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::label => label = Some(part.as_str()),
            Rule::type_ref => type_name = Some(part.as_str()),
            Rule::ident => name = Some(part.as_str()),
            Rule::int_lit => number = Some(part.as_str()),
            Rule::field_options => options = walk_options(part),
            _ => {}
        }
    }

    let (Some(type_name), Some(name), Some(number)) = (type_name, name, number) else {
        return Err(CodecError::parse(
            source_name,
            format!("incomplete field declaration in message '{message}'"),
        ));
    };

    let number = parse_int(number)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            CodecError::parse(
                source_name,
                format!("field '{message}.{name}' has invalid number {number}"),
            )
        })?;

    if UNSUPPORTED_SCALARS.contains(&type_name) {
        return Err(CodecError::parse(
            source_name,
            format!("field '{message}.{name}': scalar type '{type_name}' is not supported"),
        ));
    }
    let kind = match ScalarType::try_from_str(type_name) {
        Some(scalar) => FieldKind::Scalar(scalar),
        None => FieldKind::Unresolved(type_name.to_string()),
    };

    let mut field = match label {
        Some("repeated") => FieldDescriptor::repeated(name, number, kind),
        Some("required") => {
            return Err(CodecError::parse(
                source_name,
                format!("field '{message}.{name}': required fields are not supported"),
            ))
        }
        // `optional` only adds explicit presence, which scalar fields do not track
        _ => FieldDescriptor::new(name, number, kind),
    };

    for (option, value) in options {
        match option.as_str() {
            "packed" => {
                field.packed = match value.as_str() {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(CodecError::parse(
                            source_name,
                            format!("field '{message}.{name}': invalid packed value '{other}'"),
                        ))
                    }
                };
                // The registry rejects packed on singular or non-numeric fields
                if field.packed && !field.is_repeated() {
                    return Err(CodecError::parse(
                        source_name,
                        format!("field '{message}.{name}': packed requires a repeated field"),
                    ));
                }
            }
            "json_name" => field = field.with_json_name(value),
            other => trace!(field = %name, option = other, "ignoring field option"),
        }
    }

    Ok(field)
}

fn walk_enum(source_name: &str, scope: &str, pair: Pair<Rule>) -> Result<EnumSchema> {
    let mut inner = pair.into_inner().filter(|p| p.as_rule() != Rule::kw_enum);
    let name = inner
        .next()
        .ok_or_else(|| CodecError::parse(source_name, "enum without a name"))?;
    let mut schema = EnumSchema::new(qualify(scope, name.as_str()));

    for item in inner.filter(|p| p.as_rule() == Rule::enum_value) {
        let mut parts = item.into_inner();
        let (Some(value_name), Some(number)) = (parts.next(), parts.next()) else {
            return Err(CodecError::parse(
                source_name,
                format!("incomplete value in enum '{}'", schema.full_name),
            ));
        };
        let number = parse_signed(number.as_str())
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| {
                CodecError::parse(
                    source_name,
                    format!(
                        "enum value '{}' has invalid number {}",
                        value_name.as_str(),
                        number.as_str()
                    ),
                )
            })?;
        schema = schema.with_value(value_name.as_str(), number);
    }

    Ok(schema)
}

/// Collect `name = value` pairs from a field option list. String values are unquoted.
fn walk_options(pair: Pair<Rule>) -> Vec<(String, String)> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::field_option)
        .filter_map(|option| {
            let mut parts = option.into_inner();
            let name = parts.next()?.as_str().to_string();
            let constant = parts.next()?;
            let value = match constant.into_inner().next() {
                Some(v) if v.as_rule() == Rule::string_lit => string_value(v),
                Some(v) => v.as_str().to_string(),
                None => String::new(),
            };
            Some((name, value))
        })
        .collect()
}

fn unsupported(source_name: &str, pair: &Pair<Rule>) -> CodecError {
    let keyword = first_inner(pair, Rule::unsupported_kw)
        .map(|p| p.as_str())
        .unwrap_or("construct");
    let (line, _) = pair.as_span().start_pos().line_col();
    CodecError::parse(
        source_name,
        format!("line {line}: '{keyword}' is not supported"),
    )
}

fn first_inner<'a>(pair: &Pair<'a, Rule>, rule: Rule) -> Option<Pair<'a, Rule>> {
    pair.clone().into_inner().find(|p| p.as_rule() == rule)
}

fn string_value(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|chars| chars.as_str().to_string())
        .unwrap_or_default()
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

fn parse_int(literal: &str) -> Option<u64> {
    match literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => literal.parse().ok(),
    }
}

fn parse_signed(literal: &str) -> Option<i64> {
    match literal.strip_prefix('-') {
        Some(magnitude) => parse_int(magnitude)
            .and_then(|n| i64::try_from(n).ok())
            .map(|n| -n),
        None => parse_int(literal).and_then(|n| i64::try_from(n).ok()),
    }
}
