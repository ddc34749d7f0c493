// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema registry for message and enum types.
//!
//! Files are added, then [`SchemaRegistry::link`] resolves every field type
//! reference and validates the field tables. A linked registry is read-only;
//! share it behind an `Arc` across threads.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use super::error::{CodecError, Result};
use crate::schema::ast::{
    short_name, EnumSchema, FieldKind, MessageSchema, ProtoFile, MAX_FIELD_NUMBER,
};

/// Registry of fully-qualified message and enum types.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    messages: BTreeMap<String, MessageSchema>,
    enums: BTreeMap<String, EnumSchema>,
    linked: bool,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the bundled chain schemas, already linked.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        crate::schema::builtin::register_builtin(&mut registry)?;
        registry.link()?;
        Ok(registry)
    }

    /// Register every message and enum of a parsed file.
    pub fn add_file(&mut self, file: ProtoFile) -> Result<()> {
        debug!(
            file = %file.name,
            package = %file.package,
            messages = file.messages.len(),
            enums = file.enums.len(),
            "registering proto file"
        );
        for message in file.messages {
            self.add_message(message)?;
        }
        for enum_schema in file.enums {
            self.add_enum(enum_schema)?;
        }
        Ok(())
    }

    /// Register a single message type.
    pub fn add_message(&mut self, message: MessageSchema) -> Result<()> {
        if self.messages.contains_key(&message.full_name)
            || self.enums.contains_key(&message.full_name)
        {
            return Err(CodecError::invalid_schema(
                &message.full_name,
                "type is already registered",
            ));
        }
        self.linked = false;
        self.messages.insert(message.full_name.clone(), message);
        Ok(())
    }

    /// Register a single enum type.
    pub fn add_enum(&mut self, enum_schema: EnumSchema) -> Result<()> {
        if self.messages.contains_key(&enum_schema.full_name)
            || self.enums.contains_key(&enum_schema.full_name)
        {
            return Err(CodecError::invalid_schema(
                &enum_schema.full_name,
                "type is already registered",
            ));
        }
        self.linked = false;
        self.enums.insert(enum_schema.full_name.clone(), enum_schema);
        Ok(())
    }

    /// Resolve type references and validate all field tables.
    pub fn link(&mut self) -> Result<()> {
        for enum_schema in self.enums.values() {
            validate_enum(enum_schema)?;
        }

        let mut resolved: Vec<(String, usize, FieldKind)> = Vec::new();
        for message in self.messages.values() {
            validate_message(message)?;
            for (idx, field) in message.fields.iter().enumerate() {
                if let FieldKind::Unresolved(type_name) = &field.kind {
                    let kind = self.resolve(&message.full_name, type_name).ok_or_else(|| {
                        CodecError::invalid_schema(
                            &message.full_name,
                            format!("field '{}' references unknown type '{type_name}'", field.name),
                        )
                    })?;
                    resolved.push((message.full_name.clone(), idx, kind));
                } else if let FieldKind::Message(name) | FieldKind::Enum(name) = &field.kind {
                    if !self.messages.contains_key(name) && !self.enums.contains_key(name) {
                        return Err(CodecError::invalid_schema(
                            &message.full_name,
                            format!("field '{}' references unknown type '{name}'", field.name),
                        ));
                    }
                }
            }
        }

        for (message_name, idx, kind) in resolved {
            if let Some(message) = self.messages.get_mut(&message_name) {
                let field = &mut message.fields[idx];
                field.kind = kind;
                if field.packed && !field.is_packable() {
                    trace!(message = %message_name, field = %field.name, "message field is never packed");
                    field.packed = false;
                }
            }
        }

        self.linked = true;
        debug!(
            messages = self.messages.len(),
            enums = self.enums.len(),
            "schema registry linked"
        );
        Ok(())
    }

    /// Whether [`link`](Self::link) has run since the last registration.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Resolve a type reference written inside `scope` using protobuf
    /// scoping: innermost enclosing scope first, leading `.` is absolute.
    fn resolve(&self, scope: &str, name: &str) -> Option<FieldKind> {
        if let Some(absolute) = name.strip_prefix('.') {
            return self.kind_of(absolute);
        }
        let mut scope = scope;
        loop {
            let candidate = if scope.is_empty() {
                name.to_string()
            } else {
                format!("{scope}.{name}")
            };
            if let Some(kind) = self.kind_of(&candidate) {
                return Some(kind);
            }
            if scope.is_empty() {
                return None;
            }
            scope = scope.rsplit_once('.').map(|(parent, _)| parent).unwrap_or("");
        }
    }

    fn kind_of(&self, full_name: &str) -> Option<FieldKind> {
        if self.messages.contains_key(full_name) {
            Some(FieldKind::Message(full_name.to_string()))
        } else if self.enums.contains_key(full_name) {
            Some(FieldKind::Enum(full_name.to_string()))
        } else {
            None
        }
    }

    /// Look up a message by full name or unique short name.
    pub fn get_message(&self, name: &str) -> Result<&MessageSchema> {
        let name = name.strip_prefix('.').unwrap_or(name);
        if let Some(message) = self.messages.get(name) {
            return Ok(message);
        }
        let mut matches = self
            .messages
            .values()
            .filter(|m| m.short_name() == name || m.full_name.ends_with(&format!(".{name}")));
        match (matches.next(), matches.next()) {
            (Some(message), None) => Ok(message),
            _ => Err(CodecError::type_not_found(name)),
        }
    }

    /// Look up an enum by full name or unique short name.
    pub fn get_enum(&self, name: &str) -> Result<&EnumSchema> {
        let name = name.strip_prefix('.').unwrap_or(name);
        if let Some(enum_schema) = self.enums.get(name) {
            return Ok(enum_schema);
        }
        let mut matches = self.enums.values().filter(|e| short_name(&e.full_name) == name);
        match (matches.next(), matches.next()) {
            (Some(enum_schema), None) => Ok(enum_schema),
            _ => Err(CodecError::type_not_found(name)),
        }
    }

    /// All message types, ordered by full name.
    pub fn messages(&self) -> impl Iterator<Item = &MessageSchema> {
        self.messages.values()
    }

    /// All enum types, ordered by full name.
    pub fn enums(&self) -> impl Iterator<Item = &EnumSchema> {
        self.enums.values()
    }

    /// Get the number of registered types.
    pub fn len(&self) -> usize {
        self.messages.len() + self.enums.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate_message(message: &MessageSchema) -> Result<()> {
    let mut numbers = HashSet::new();
    let mut names = HashSet::new();
    for field in &message.fields {
        if field.number == 0 || field.number > MAX_FIELD_NUMBER {
            return Err(CodecError::invalid_schema(
                &message.full_name,
                format!("field '{}' has out-of-range number {}", field.name, field.number),
            ));
        }
        if !numbers.insert(field.number) {
            return Err(CodecError::invalid_schema(
                &message.full_name,
                format!("field number {} is used more than once", field.number),
            ));
        }
        if !names.insert(field.name.as_str()) {
            return Err(CodecError::invalid_schema(
                &message.full_name,
                format!("field name '{}' is used more than once", field.name),
            ));
        }
        if field.packed && !field.is_repeated() {
            return Err(CodecError::invalid_schema(
                &message.full_name,
                format!("field '{}' is packed but not repeated", field.name),
            ));
        }
        if field.packed && !matches!(field.kind, FieldKind::Unresolved(_)) && !field.is_packable()
        {
            return Err(CodecError::invalid_schema(
                &message.full_name,
                format!("field '{}' cannot be packed", field.name),
            ));
        }
    }
    Ok(())
}

fn validate_enum(enum_schema: &EnumSchema) -> Result<()> {
    match enum_schema.values.first() {
        None => Err(CodecError::invalid_schema(
            &enum_schema.full_name,
            "enum declares no values",
        )),
        Some((_, number)) if *number != 0 => Err(CodecError::invalid_schema(
            &enum_schema.full_name,
            "first enum value must be zero",
        )),
        Some(_) => Ok(()),
    }
}
