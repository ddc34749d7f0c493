// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Seicodec CLI
//!
//! Command-line front end for the schema-driven codec.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to hex
//! seicodec encode ExchangeRateTuple '{"denom":"usei","exchange_rate":"1.25"}'
//!
//! # Decode hex to JSON
//! seicodec decode ExchangeRateTuple 0a04757365691204312e3235 --pretty
//!
//! # Dump raw fields without a schema
//! seicodec inspect 0a04757365691204312e3235
//!
//! # Browse the registered types
//! seicodec schema list oracle
//! seicodec schema show seiprotocol.seichain.oracle.Params
//!
//! # Add schemas from disk
//! seicodec --proto my/module.proto schema list my.module
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cmd::{DecodeCmd, EncodeCmd, InspectCmd, SchemaCmd};
use common::{Context, Result};

/// Seicodec - Protocol Buffers codec for Sei chain module APIs
///
/// Encodes and decodes messages using the bundled chain schemas plus any
/// `.proto` files given on the command line or in the config file.
#[derive(Parser, Clone)]
#[command(name = "seicodec")]
#[command(about = "Schema-driven Protocol Buffers codec and JSON bridge", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extra .proto file to register (repeatable)
    #[arg(long = "proto", global = true, value_name = "FILE")]
    protos: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Encode a JSON object as hex wire bytes
    Encode(EncodeCmd),

    /// Decode hex wire bytes to JSON
    Decode(DecodeCmd),

    /// Dump raw wire fields without a schema
    Inspect(InspectCmd),

    /// Schema operations (list, show)
    #[command(subcommand)]
    Schema(SchemaCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::load(cli.config.as_ref(), &cli.protos)?;

    match cli.command {
        Commands::Encode(cmd) => cmd.run(&ctx),
        Commands::Decode(cmd) => cmd.run(&ctx),
        Commands::Inspect(cmd) => cmd.run(&ctx),
        Commands::Schema(cmd) => cmd.run(&ctx),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        if let Some(codec_err) = e.downcast_ref::<seicodec::CodecError>() {
            tracing::debug!(context = ?codec_err.log_fields(), "command failed");
        }
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
