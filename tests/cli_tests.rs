// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual seicodec binary and verify its behavior.

use std::{
    path::PathBuf,
    process::{Command, Output},
};

const TUPLE_HEX: &str = "0a04757365691204312e3235";
const TUPLE_JSON: &str = r#"{"denom":"usei","exchange_rate":"1.25"}"#;

/// Get the path to the built seicodec binary
fn seicodec_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_seicodec"))
}

/// Unique path under the system temp directory
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("seicodec_cli_{}_{name}", std::process::id()))
}

/// Run seicodec with arguments
fn run(args: &[&str]) -> Output {
    let bin = seicodec_bin();
    Command::new(&bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run seicodec and assert success
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run seicodec and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("Schema-driven Protocol Buffers codec"));
    assert!(output.contains("encode"));
    assert!(output.contains("decode"));
    assert!(output.contains("inspect"));
    assert!(output.contains("schema"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains("seicodec"));
}

#[test]
fn test_cli_invalid_subcommand() {
    let stderr = run_err(&["nonexistent"]);
    assert!(stderr.contains("unrecognized") || stderr.contains("unknown"));
}

// ============================================================================
// Encode / Decode Tests
// ============================================================================

#[test]
fn test_encode_hex() {
    let output = run_ok(&["encode", "ExchangeRateTuple", TUPLE_JSON]);
    assert_eq!(output.trim(), TUPLE_HEX);
}

#[test]
fn test_encode_base64() {
    let output = run_ok(&["encode", "ExchangeRateTuple", TUPLE_JSON, "--base64"]);
    assert_eq!(output.trim(), "CgR1c2VpEgQxLjI1");
}

#[test]
fn test_encode_default_record_is_empty() {
    let output = run_ok(&["encode", "ExchangeRateTuple", "{}"]);
    assert_eq!(output.trim(), "");
}

#[test]
fn test_encode_rejects_bad_json() {
    let stderr = run_err(&["encode", "ExchangeRateTuple", "{not json"]);
    assert!(stderr.contains("not valid JSON"));
}

#[test]
fn test_decode_json() {
    let output = run_ok(&["decode", "ExchangeRateTuple", TUPLE_HEX]);
    assert_eq!(output.trim(), TUPLE_JSON);
}

#[test]
fn test_decode_with_length_prefix() {
    let output = run_ok(&["decode", "ExchangeRateTuple", TUPLE_HEX, "--length", "6"]);
    assert_eq!(output.trim(), r#"{"denom":"usei","exchange_rate":""}"#);
}

#[test]
fn test_decode_pretty() {
    let output = run_ok(&["decode", "ExchangeRateTuple", TUPLE_HEX, "--pretty"]);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["denom"], "usei");
    assert!(output.trim().contains('\n'));
}

#[test]
fn test_decode_truncated_input_fails() {
    let stderr = run_err(&["decode", "ExchangeRateTuple", "0a057573"]);
    assert!(stderr.contains("Truncated"), "{stderr}");
    assert!(
        stderr.contains("not a valid seiprotocol.seichain.oracle.ExchangeRateTuple message"),
        "{stderr}"
    );
}

#[test]
fn test_decode_unknown_type_fails() {
    let stderr = run_err(&["decode", "NoSuchMessage", TUPLE_HEX]);
    assert!(stderr.contains("Type not found"), "{stderr}");
}

#[test]
fn test_decode_ambiguous_short_name_fails() {
    run_err(&["decode", "Params", ""]);
    let output = run_ok(&["decode", "seiprotocol.seichain.oracle.Params", ""]);
    assert!(output.contains("\"vote_period\":0"));
}

// ============================================================================
// Inspect Tests
// ============================================================================

#[test]
fn test_inspect_fields() {
    let output = run_ok(&["inspect", TUPLE_HEX]);
    assert!(output.contains("12 bytes, 2 fields"));
    assert!(output.contains("field 1 [length-delimited] = \"usei\" (4 bytes)"));
    assert!(output.contains("field 2 [length-delimited] = \"1.25\" (4 bytes)"));
}

#[test]
fn test_inspect_json_with_depth() {
    // PriceSnapshotItem with a nested OracleExchangeRate
    let output = run_ok(&["inspect", "0a047573656912030a0131", "--depth", "1", "--json"]);
    let items: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(items[1]["number"], 2);
    assert_eq!(items[1]["nested"][0]["number"], 1);
}

// ============================================================================
// Schema Tests
// ============================================================================

#[test]
fn test_schema_list_filter() {
    let output = run_ok(&["schema", "list", "oracle"]);
    assert!(output.contains("seiprotocol.seichain.oracle.ExchangeRateTuple"));
    assert!(!output.contains("cosmwasm.wasm.v1"));
}

#[test]
fn test_schema_show_message_json() {
    let output = run_ok(&["schema", "show", "ExchangeRateTuple", "--json"]);
    let detail: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(detail["name"], "seiprotocol.seichain.oracle.ExchangeRateTuple");
    assert_eq!(detail["fields"][0]["name"], "denom");
    assert_eq!(detail["fields"][1]["wire_type"], "length-delimited");
}

#[test]
fn test_schema_show_enum() {
    let output = run_ok(&["schema", "show", "AccessType"]);
    assert!(output.contains("ACCESS_TYPE_EVERYBODY"));
}

// ============================================================================
// Extra Schemas and Config
// ============================================================================

#[test]
fn test_extra_proto_file() {
    let proto = temp_path("extra.proto");
    std::fs::write(
        &proto,
        "syntax = \"proto3\";\npackage extra.v1;\nmessage Ping { uint64 seq = 1; }\n",
    )
    .unwrap();
    let proto_arg = proto.to_string_lossy().to_string();

    let output = run_ok(&["--proto", &proto_arg, "encode", "extra.v1.Ping", r#"{"seq":"150"}"#]);
    assert_eq!(output.trim(), "089601");

    std::fs::remove_file(&proto).ok();
}

#[test]
fn test_config_pretty_output() {
    let config = temp_path("pretty.toml");
    std::fs::write(&config, "[json]\npretty = true\n").unwrap();
    let config_arg = config.to_string_lossy().to_string();

    let output = run_ok(&["--config", &config_arg, "decode", "ExchangeRateTuple", TUPLE_HEX]);
    assert!(output.trim().contains('\n'));

    std::fs::remove_file(&config).ok();
}

#[test]
fn test_config_missing_file_fails() {
    let missing = temp_path("missing.toml").to_string_lossy().to_string();
    let stderr = run_err(&["--config", &missing, "schema", "list"]);
    assert!(stderr.contains("failed to load config"), "{stderr}");
}
