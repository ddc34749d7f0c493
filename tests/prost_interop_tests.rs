// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Cross-implementation tests against prost.
//!
//! Tests cover:
//! - Byte-identical output for the same logical message
//! - Decoding prost output, and prost decoding ours
//! - Packed/unpacked interoperability in both directions

mod common;

use common::entity;
use prost::Message;
use seicodec::{record, MessageCodec, ProtoValue, Record, MAX_SAFE_INTEGER};

// ============================================================================
// prost Mirrors
// ============================================================================

/// Mirror of `test.scalars.Scalars`; enums travel as their `int32` numbers.
#[derive(Clone, PartialEq, prost::Message)]
struct Scalars {
    #[prost(bool, tag = "1")]
    flag: bool,
    #[prost(int32, tag = "2")]
    small: i32,
    #[prost(int64, tag = "3")]
    big: i64,
    #[prost(uint32, tag = "4")]
    count: u32,
    #[prost(uint64, tag = "5")]
    height: u64,
    #[prost(double, tag = "6")]
    ratio: f64,
    #[prost(string, tag = "7")]
    label: String,
    #[prost(bytes = "vec", tag = "8")]
    blob: Vec<u8>,
    #[prost(int32, tag = "9")]
    level: i32,
    #[prost(int32, repeated, tag = "10")]
    deltas: Vec<i32>,
    #[prost(uint64, repeated, packed = "false", tag = "11")]
    unpacked: Vec<u64>,
    #[prost(message, optional, boxed, tag = "12")]
    child: Option<Box<Scalars>>,
    #[prost(string, repeated, tag = "13")]
    tags: Vec<String>,
    #[prost(int32, repeated, tag = "14")]
    levels: Vec<i32>,
    #[prost(string, tag = "15")]
    display_name: String,
}

/// Same field numbers as `Scalars`, but the packable lists go out unpacked.
#[derive(Clone, PartialEq, prost::Message)]
struct UnpackedScalars {
    #[prost(int32, repeated, packed = "false", tag = "10")]
    deltas: Vec<i32>,
    #[prost(int32, repeated, packed = "false", tag = "14")]
    levels: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct ExchangeRateTuple {
    #[prost(string, tag = "1")]
    denom: String,
    #[prost(string, tag = "2")]
    exchange_rate: String,
}

#[derive(Clone, PartialEq, prost::Message)]
struct Denom {
    #[prost(string, tag = "1")]
    name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
struct OracleParams {
    #[prost(uint64, tag = "1")]
    vote_period: u64,
    #[prost(string, tag = "2")]
    vote_threshold: String,
    #[prost(string, tag = "3")]
    reward_band: String,
    #[prost(message, repeated, tag = "4")]
    whitelist: Vec<Denom>,
    #[prost(string, tag = "5")]
    slash_fraction: String,
    #[prost(uint64, tag = "6")]
    slash_window: u64,
    #[prost(string, tag = "7")]
    min_valid_per_window: String,
    #[prost(int64, tag = "9")]
    lookback_duration: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
struct ActiveOrders {
    #[prost(uint64, repeated, tag = "1")]
    ids: Vec<u64>,
}

// ============================================================================
// Fixtures
// ============================================================================

fn sample_prost() -> Scalars {
    Scalars {
        flag: true,
        small: -5,
        big: -MAX_SAFE_INTEGER,
        count: u32::MAX,
        height: MAX_SAFE_INTEGER as u64,
        ratio: 2.5,
        label: "sei".to_string(),
        blob: vec![0, 1, 2],
        level: 2,
        deltas: vec![1, -1, 300],
        unpacked: vec![0, 7],
        child: Some(Box::new(Scalars {
            label: "inner".to_string(),
            levels: vec![1],
            ..Default::default()
        })),
        tags: vec![String::new(), "b".to_string()],
        levels: vec![1, 2, 42],
        display_name: "Sei".to_string(),
    }
}

fn ints(values: &[i64]) -> ProtoValue {
    ProtoValue::List(values.iter().map(|v| ProtoValue::Int(*v)).collect())
}

fn enums(values: &[i32]) -> ProtoValue {
    ProtoValue::List(values.iter().map(|v| ProtoValue::Enum(*v)).collect())
}

fn sample_record() -> Record {
    entity("Scalars")
        .from_partial(&record([
            ("flag", ProtoValue::Bool(true)),
            ("small", ProtoValue::Int(-5)),
            ("big", ProtoValue::Int(-MAX_SAFE_INTEGER)),
            ("count", ProtoValue::Int(i64::from(u32::MAX))),
            ("height", ProtoValue::Int(MAX_SAFE_INTEGER)),
            ("ratio", ProtoValue::Double(2.5)),
            ("label", "sei".into()),
            ("blob", ProtoValue::Bytes(vec![0, 1, 2])),
            ("level", ProtoValue::Enum(2)),
            ("deltas", ints(&[1, -1, 300])),
            ("unpacked", ints(&[0, 7])),
            (
                "child",
                ProtoValue::Message(record([("label", "inner".into()), ("levels", enums(&[1]))])),
            ),
            (
                "tags",
                ProtoValue::List(vec![ProtoValue::String(String::new()), "b".into()]),
            ),
            ("levels", enums(&[1, 2, 42])),
            ("display_name", "Sei".into()),
        ]))
        .unwrap()
}

// ============================================================================
// Byte Equivalence
// ============================================================================

#[test]
fn test_scalars_bytes_match_prost() {
    let ours = entity("Scalars").encode(&sample_record()).unwrap();
    assert_eq!(ours, sample_prost().encode_to_vec());
}

#[test]
fn test_decode_prost_output() {
    let bytes = sample_prost().encode_to_vec();
    assert_eq!(entity("Scalars").decode(&bytes).unwrap(), sample_record());
}

#[test]
fn test_prost_decodes_our_output() {
    let ours = entity("Scalars").encode(&sample_record()).unwrap();
    assert_eq!(Scalars::decode(ours.as_slice()).unwrap(), sample_prost());
}

#[test]
fn test_negative_int32_matches_prost() {
    let ours = entity("Scalars")
        .encode(&record([("small", ProtoValue::Int(-1))]))
        .unwrap();
    let theirs = Scalars {
        small: -1,
        ..Default::default()
    }
    .encode_to_vec();
    assert_eq!(ours, theirs);
    assert_eq!(ours.len(), 11);
}

#[test]
fn test_default_message_is_empty_in_both() {
    let scalars = entity("Scalars");
    assert!(scalars.encode(&scalars.default_record()).unwrap().is_empty());
    assert!(Scalars::default().encode_to_vec().is_empty());
}

#[test]
fn test_unpacked_prost_lists_decode() {
    let bytes = UnpackedScalars {
        deltas: vec![3, -2],
        levels: vec![0, 1],
    }
    .encode_to_vec();
    let decoded = entity("Scalars").decode(&bytes).unwrap();
    assert_eq!(decoded["deltas"], ints(&[3, -2]));
    assert_eq!(decoded["levels"], enums(&[0, 1]));
}

// ============================================================================
// Chain Messages
// ============================================================================

#[test]
fn test_exchange_rate_tuple_matches_prost() {
    let theirs = ExchangeRateTuple {
        denom: "usei".to_string(),
        exchange_rate: "1.25".to_string(),
    };
    let tuple = seicodec::ProtoCodec::builtin()
        .unwrap()
        .entity("ExchangeRateTuple")
        .unwrap();
    let value = record([("denom", "usei"), ("exchange_rate", "1.25")]);
    assert_eq!(tuple.encode(&value).unwrap(), theirs.encode_to_vec());
    assert_eq!(tuple.decode(&theirs.encode_to_vec()).unwrap(), value);
}

#[test]
fn test_oracle_params_match_prost() {
    let theirs = OracleParams {
        vote_period: 10,
        vote_threshold: "0.5".to_string(),
        whitelist: vec![
            Denom {
                name: "usei".to_string(),
            },
            Denom::default(),
        ],
        slash_window: 201_600,
        lookback_duration: 3600,
        ..Default::default()
    };
    let params = seicodec::ProtoCodec::builtin()
        .unwrap()
        .entity("seiprotocol.seichain.oracle.Params")
        .unwrap();
    let value = params
        .from_json(&serde_json::json!({
            "vote_period": "10",
            "vote_threshold": "0.5",
            "whitelist": [{"name": "usei"}, {}],
            "slash_window": 201600,
            "lookback_duration": 3600
        }))
        .unwrap();

    let ours = params.encode(&value).unwrap();
    assert_eq!(ours, theirs.encode_to_vec());
    assert_eq!(OracleParams::decode(ours.as_slice()).unwrap(), theirs);
}

#[test]
fn test_active_orders_packed_ids_match_prost() {
    let theirs = ActiveOrders {
        ids: vec![1, 150, MAX_SAFE_INTEGER as u64],
    };
    let orders = seicodec::ProtoCodec::builtin()
        .unwrap()
        .entity("ActiveOrders")
        .unwrap();
    let value = record([("ids", ints(&[1, 150, MAX_SAFE_INTEGER]))]);
    assert_eq!(orders.encode(&value).unwrap(), theirs.encode_to_vec());
    assert_eq!(orders.decode(&theirs.encode_to_vec()).unwrap(), value);
}

#[test]
fn test_prost_value_beyond_safe_range_overflows() {
    let bytes = ActiveOrders {
        ids: vec![MAX_SAFE_INTEGER as u64 + 1],
    }
    .encode_to_vec();
    let orders = seicodec::ProtoCodec::builtin()
        .unwrap()
        .entity("ActiveOrders")
        .unwrap();
    assert!(matches!(
        orders.decode(&bytes),
        Err(seicodec::CodecError::IntegerOverflow { .. })
    ));
}
