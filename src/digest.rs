//! Digest computation for amalgamated configuration trees using MD5
//!
//! The digest is a change detector only, never a security boundary.

use crate::error::ConfigError;
use crate::tree::ConfigTree;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Length of a rendered digest in hex characters
pub const DIGEST_HEX_LEN: usize = 32;

/// 128-bit fingerprint of a configuration tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 16]);

impl Digest {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex rendering, always 32 characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(text: &str) -> Result<Self, ConfigError> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| ConfigError::Digest(format!("invalid digest hex: {}", e)))?;
        let bytes: [u8; 16] = bytes.try_into().map_err(|b: Vec<u8>| {
            ConfigError::Digest(format!("digest must be 16 bytes, got {}", b.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Digest::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Canonical byte form of a tree: compact JSON, map keys in lexicographic order
pub fn canonical_bytes(tree: &ConfigTree) -> Result<Vec<u8>, ConfigError> {
    let canonical = canonicalize(tree.as_value());
    serde_json::to_vec(&canonical).map_err(|e| ConfigError::Digest(e.to_string()))
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Compute the digest of a tree
///
/// Two trees share a digest iff their canonical serializations are identical.
pub fn compute_digest(tree: &ConfigTree) -> Result<Digest, ConfigError> {
    let bytes = canonical_bytes(tree)?;
    Ok(Digest(md5::compute(&bytes).0))
}
