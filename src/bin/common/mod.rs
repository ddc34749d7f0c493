// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seicodec::config::LogConfig;
use seicodec::{CodecConfig, ProtoCodec};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// State shared by every command.
pub struct Context {
    pub codec: ProtoCodec,
    pub pretty: bool,
}

impl Context {
    /// Load configuration, install logging, and build the schema registry.
    ///
    /// `protos` are registered after any files the configuration lists.
    pub fn load(config_path: Option<&PathBuf>, protos: &[PathBuf]) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => CodecConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => CodecConfig::default(),
        };
        init_tracing(&config.log);

        config.schemas.proto_files.extend(protos.iter().cloned());
        let registry = config.build_registry()?;
        tracing::debug!(types = registry.len(), "schema registry ready");

        Ok(Self {
            codec: ProtoCodec::new(Arc::new(registry)),
            pretty: config.json.pretty,
        })
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    // A subscriber may already be installed (e.g. by a test harness)
    let _ = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}

/// Parse hex text, ignoring whitespace and an optional `0x` prefix.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    hex::decode(digits).with_context(|| format!("invalid hex input '{text}'"))
}

/// Read an argument, or standard input when it is `-`.
pub fn read_arg(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
            .context("failed to read standard input")?;
        Ok(buf)
    } else {
        Ok(arg.to_string())
    }
}

/// Render a value as compact or indented JSON.
pub fn to_json_string<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Print `value` as JSON, or run the human-readable printer.
pub fn output_json_or<T>(json: bool, value: &T, human_fn: impl FnOnce() -> Result<()>) -> Result<()>
where
    T: Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human_fn()?;
    }
    Ok(())
}
