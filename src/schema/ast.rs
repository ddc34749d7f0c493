// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! AST types for parsed `.proto` schemas.
//!
//! A [`MessageSchema`] is the Field Descriptor table of one entity. Field
//! descriptors are immutable once a registry is linked.

/// Largest field number allowed by the wire format (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// How a field's value is framed on the wire (low 3 bits of the tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Base-128 varint
    Varint = 0,
    /// 8 bytes, little-endian
    Fixed64 = 1,
    /// varint length prefix followed by payload
    LengthDelimited = 2,
    /// 4 bytes, little-endian
    Fixed32 = 5,
}

impl WireType {
    /// Decode the 3-bit wire type. Groups (3, 4) and reserved values are rejected.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    /// Numeric wire type.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            WireType::Varint => "varint",
            WireType::Fixed64 => "fixed64",
            WireType::LengthDelimited => "length-delimited",
            WireType::Fixed32 => "fixed32",
        }
    }
}

/// Scalar kinds used across the chain's schema family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// bool
    Bool,
    /// int32
    Int32,
    /// int64
    Int64,
    /// uint32
    Uint32,
    /// uint64
    Uint64,
    /// double
    Double,
    /// string
    String,
    /// bytes
    Bytes,
}

impl ScalarType {
    /// Parse a scalar type keyword.
    pub fn try_from_str(s: &str) -> Option<Self> {
        match s {
            "bool" => Some(ScalarType::Bool),
            "int32" => Some(ScalarType::Int32),
            "int64" => Some(ScalarType::Int64),
            "uint32" => Some(ScalarType::Uint32),
            "uint64" => Some(ScalarType::Uint64),
            "double" => Some(ScalarType::Double),
            "string" => Some(ScalarType::String),
            "bytes" => Some(ScalarType::Bytes),
            _ => None,
        }
    }

    /// Keyword for this scalar type.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Double => "double",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }

    /// Wire type of a single value of this kind.
    pub fn wire_type(self) -> WireType {
        match self {
            ScalarType::Bool
            | ScalarType::Int32
            | ScalarType::Int64
            | ScalarType::Uint32
            | ScalarType::Uint64 => WireType::Varint,
            ScalarType::Double => WireType::Fixed64,
            ScalarType::String | ScalarType::Bytes => WireType::LengthDelimited,
        }
    }

    /// Whether repeated values of this kind may share one packed span.
    pub fn is_packable(self) -> bool {
        !matches!(self, ScalarType::String | ScalarType::Bytes)
    }

    /// Whether this is a 64-bit integer subject to the safe-integer check.
    pub fn is_64bit_integer(self) -> bool {
        matches!(self, ScalarType::Int64 | ScalarType::Uint64)
    }
}

/// Logical kind of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar value
    Scalar(ScalarType),
    /// Enum, by fully-qualified name
    Enum(String),
    /// Nested message, by fully-qualified name
    Message(String),
    /// Type reference as written in the schema, before linking
    Unresolved(String),
}

impl FieldKind {
    /// Human-readable kind name for error messages.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Scalar(s) => s.as_str().to_string(),
            FieldKind::Enum(name) => format!("enum {name}"),
            FieldKind::Message(name) => format!("message {name}"),
            FieldKind::Unresolved(name) => format!("unresolved {name}"),
        }
    }
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Zero or one value; messages carry presence, scalars use default omission
    Singular,
    /// Ordered sequence
    Repeated,
}

/// One entry of an entity's Field Descriptor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared field name
    pub name: String,
    /// External JSON key (defaults to `name`)
    pub json_name: String,
    /// Field number, unique within the message
    pub number: u32,
    /// Logical kind
    pub kind: FieldKind,
    /// Cardinality
    pub label: Label,
    /// Packed encoding for repeated numeric scalars and enums
    pub packed: bool,
}

impl FieldDescriptor {
    /// Create a singular field.
    pub fn new(name: impl Into<String>, number: u32, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            json_name: name.clone(),
            name,
            number,
            kind,
            label: Label::Singular,
            packed: false,
        }
    }

    /// Create a repeated field. Packable kinds default to packed.
    ///
    /// An unresolved reference starts out packed; linking clears the flag if
    /// it resolves to a message.
    pub fn repeated(name: impl Into<String>, number: u32, kind: FieldKind) -> Self {
        let packed = match &kind {
            FieldKind::Scalar(s) => s.is_packable(),
            FieldKind::Enum(_) | FieldKind::Unresolved(_) => true,
            FieldKind::Message(_) => false,
        };
        Self {
            label: Label::Repeated,
            packed,
            ..Self::new(name, number, kind)
        }
    }

    /// Override the JSON key.
    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self
    }

    /// Check if the field is repeated.
    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    /// Whether the kind permits packed encoding.
    pub fn is_packable(&self) -> bool {
        match &self.kind {
            FieldKind::Scalar(s) => s.is_packable(),
            FieldKind::Enum(_) => true,
            _ => false,
        }
    }

    /// Wire type of one element (ignores packing).
    pub fn element_wire_type(&self) -> WireType {
        match &self.kind {
            FieldKind::Scalar(s) => s.wire_type(),
            FieldKind::Enum(_) => WireType::Varint,
            FieldKind::Message(_) | FieldKind::Unresolved(_) => WireType::LengthDelimited,
        }
    }

    /// Wire type this field is written with.
    pub fn wire_type(&self) -> WireType {
        if self.is_repeated() && self.packed {
            WireType::LengthDelimited
        } else {
            self.element_wire_type()
        }
    }

    /// Tag value `(number << 3) | wire_type`.
    pub fn tag(&self) -> u32 {
        (self.number << 3) | self.wire_type().as_u8() as u32
    }
}

/// A message type: entity name plus its ordered field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    /// Fully-qualified name (e.g., "seiprotocol.seichain.oracle.Params")
    pub full_name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl MessageSchema {
    /// Create an empty message type.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field (builder style).
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a field.
    pub fn add_field(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    /// Last segment of the full name.
    pub fn short_name(&self) -> &str {
        short_name(&self.full_name)
    }

    /// Look up a field by number.
    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Look up a field by declared name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by JSON key, falling back to the declared name.
    pub fn field_by_json_name(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.json_name == key)
            .or_else(|| self.field_by_name(key))
    }
}

/// Result of mapping an enum number to a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumVariant<'a> {
    /// Declared variant
    Known(&'a str),
    /// Number not in the variant table
    Unrecognized(i32),
}

/// Name reserved for enum numbers outside the variant table.
pub const UNRECOGNIZED_NAME: &str = "UNRECOGNIZED";

/// Number reserved for the unrecognized variant in JSON import.
pub const UNRECOGNIZED_NUMBER: i32 = -1;

/// An enum type with its variant table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    /// Fully-qualified name
    pub full_name: String,
    /// `(name, number)` in declaration order
    pub values: Vec<(String, i32)>,
}

impl EnumSchema {
    /// Create an empty enum type.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            values: Vec::new(),
        }
    }

    /// Add a variant (builder style).
    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push((name.into(), number));
        self
    }

    /// Last segment of the full name.
    pub fn short_name(&self) -> &str {
        short_name(&self.full_name)
    }

    /// Map a number to its variant.
    pub fn variant(&self, number: i32) -> EnumVariant<'_> {
        match self.name_of(number) {
            Some(name) => EnumVariant::Known(name),
            None => EnumVariant::Unrecognized(number),
        }
    }

    /// Variant name for a number.
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, n)| *n == number)
            .map(|(name, _)| name.as_str())
    }

    /// Number for a variant name.
    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, number)| *number)
    }

    /// Whether the number is a declared variant.
    pub fn contains(&self, number: i32) -> bool {
        self.values.iter().any(|(_, n)| *n == number)
    }
}

/// One parsed `.proto` file, with nested declarations flattened to full names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoFile {
    /// Source name (path or label)
    pub name: String,
    /// Package, empty when undeclared
    pub package: String,
    /// Import paths as written
    pub imports: Vec<String>,
    /// Messages in declaration order
    pub messages: Vec<MessageSchema>,
    /// Enums in declaration order
    pub enums: Vec<EnumSchema>,
}

/// Last segment of a dotted name.
pub fn short_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}
