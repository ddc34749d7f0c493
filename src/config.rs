// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! TOML configuration.
//!
//! ```toml
//! [schemas]
//! include_builtin = true
//! proto_files = ["protos/dex/params.proto"]
//!
//! [json]
//! pretty = true
//!
//! [log]
//! level = "debug"
//! json = false
//! ```
//!
//! Every section and key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{CodecError, Result, SchemaRegistry};
use crate::schema::builtin::register_builtin;
use crate::schema::parser::parse_proto_file;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// `[schemas]`
    #[serde(default)]
    pub schemas: SchemasConfig,
    /// `[json]`
    #[serde(default)]
    pub json: JsonConfig,
    /// `[log]`
    #[serde(default)]
    pub log: LogConfig,
}

/// Where message schemas come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemasConfig {
    /// Extra `.proto` files, registered after the bundled ones
    #[serde(default)]
    pub proto_files: Vec<PathBuf>,
    /// Load the bundled chain schemas
    #[serde(default = "default_true")]
    pub include_builtin: bool,
}

impl Default for SchemasConfig {
    fn default() -> Self {
        Self {
            proto_files: Vec::new(),
            include_builtin: true,
        }
    }
}

/// JSON output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonConfig {
    /// Indent JSON output
    #[serde(default)]
    pub pretty: bool,
}

/// Log output settings, applied by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// "trace" | "debug" | "info" | "warn" | "error", or any `EnvFilter` directive
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON structured logs instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}

impl CodecConfig {
    /// Read a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| CodecError::parse(path.display().to_string(), e.to_string()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CodecError::parse("config", e.to_string()))
    }

    /// Build and link the registry described by `[schemas]`.
    pub fn build_registry(&self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        if self.schemas.include_builtin {
            register_builtin(&mut registry)?;
        }
        for path in &self.schemas.proto_files {
            registry.add_file(parse_proto_file(path)?)?;
        }
        registry.link()?;
        Ok(registry)
    }
}
