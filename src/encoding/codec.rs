// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-entity codec interface.
//!
//! Collaborators depend on exactly five operations per entity: binary
//! encode, binary decode (optionally of a leading sub-span), JSON import,
//! JSON export, and partial-record hydration. [`MessageCodec`] names that
//! contract; [`EntityCodec`] implements it for one message type of a linked
//! [`SchemaRegistry`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use seicodec::{record, MessageCodec, ProtoCodec, SchemaRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = ProtoCodec::new(Arc::new(SchemaRegistry::builtin()?));
//! let tuple = codec.entity("ExchangeRateTuple")?;
//!
//! let value = tuple.from_partial(&record([("denom", "usei"), ("exchange_rate", "1.25")]))?;
//! let bytes = tuple.encode(&value)?;
//! assert_eq!(bytes, [0x0A, 0x04, b'u', b's', b'e', b'i', 0x12, 0x04, b'1', b'.', b'2', b'5']);
//! assert_eq!(tuple.decode(&bytes)?, value);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::Value;

use super::defaults;
use super::json;
use super::protobuf::{decode_message_with_length, encode_message};
use crate::core::{Record, Result, SchemaRegistry};
use crate::schema::ast::MessageSchema;

// =============================================================================
// Message Codec Trait
// =============================================================================

/// The five codec operations of one entity.
pub trait MessageCodec: Send + Sync {
    /// Fully-qualified entity name.
    fn entity_name(&self) -> &str;

    /// Encode a record to wire bytes, omitting default-valued fields.
    fn encode(&self, record: &Record) -> Result<Vec<u8>>;

    /// Decode a whole buffer.
    fn decode(&self, data: &[u8]) -> Result<Record> {
        self.decode_with_length(data, None)
    }

    /// Decode the first `length` bytes of `data`, or all of it when `None`.
    fn decode_with_length(&self, data: &[u8], length: Option<usize>) -> Result<Record>;

    /// Export a record as a JSON tree.
    fn to_json(&self, record: &Record) -> Result<Value>;

    /// Import a record from a JSON tree.
    fn from_json(&self, json: &Value) -> Result<Record>;

    /// Complete a partial record against the entity defaults.
    fn from_partial(&self, partial: &Record) -> Result<Record>;
}

// =============================================================================
// Protobuf Codec
// =============================================================================

/// Entry point over a linked registry.
///
/// Cheap to clone; every [`EntityCodec`] it hands out shares the registry.
#[derive(Debug, Clone)]
pub struct ProtoCodec {
    registry: Arc<SchemaRegistry>,
}

impl ProtoCodec {
    /// Create a codec over a linked registry.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Codec over the bundled chain schemas.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(SchemaRegistry::builtin()?)))
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Codec for one message type, by full or unique short name.
    pub fn entity(&self, name: &str) -> Result<EntityCodec> {
        let schema = self.registry.get_message(name)?.clone();
        Ok(EntityCodec {
            registry: Arc::clone(&self.registry),
            schema,
        })
    }
}

/// Codec bound to one message type.
#[derive(Debug, Clone)]
pub struct EntityCodec {
    registry: Arc<SchemaRegistry>,
    schema: MessageSchema,
}

impl EntityCodec {
    /// Field table of the entity.
    pub fn schema(&self) -> &MessageSchema {
        &self.schema
    }

    /// A fresh record with every field at its default.
    pub fn default_record(&self) -> Record {
        defaults::default_record(&self.schema)
    }
}

impl MessageCodec for EntityCodec {
    fn entity_name(&self) -> &str {
        &self.schema.full_name
    }

    fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        encode_message(&self.registry, &self.schema, record)
    }

    fn decode_with_length(&self, data: &[u8], length: Option<usize>) -> Result<Record> {
        decode_message_with_length(&self.registry, &self.schema, data, length)
    }

    fn to_json(&self, record: &Record) -> Result<Value> {
        json::to_json(&self.registry, &self.schema, record)
    }

    fn from_json(&self, json: &Value) -> Result<Record> {
        json::from_json(&self.registry, &self.schema, json)
    }

    fn from_partial(&self, partial: &Record) -> Result<Record> {
        defaults::from_partial(&self.registry, &self.schema, partial)
    }
}
