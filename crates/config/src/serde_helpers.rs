//! Misc serde helpers for config values.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serializer, de};
use std::str::FromStr;

/// An integer that may be given as a number, a decimal string or a `0x` hex string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(u64),
    Str(String),
}

/// Parses a quantity given either as decimal or as `0x`-prefixed hex.
pub fn parse_quantity(s: &str) -> Result<u64, String> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|err| format!("invalid quantity {s:?}: {err}"))
}

/// (De)serializes a chain id as a hex quantity, accepting numbers and decimal strings as input.
pub mod chain_id {
    use super::*;

    pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{id:#x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Int(id) => Ok(id),
            NumberOrString::Str(s) => parse_quantity(&s).map_err(de::Error::custom),
        }
    }
}

/// An enum that represents either a [serde_json::Number] integer, or a hex [U256].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrHexU256 {
    Int(serde_json::Number),
    Hex(U256),
}

/// Deserializes a U256 from an integer, a decimal string or a 0x-prefixed hex string.
pub fn from_int_or_hex<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrHexU256::deserialize(deserializer)? {
        NumberOrHexU256::Int(num) => U256::from_str(&num.to_string()).map_err(de::Error::custom),
        NumberOrHexU256::Hex(val) => Ok(val),
    }
}
