//! Opaque todo identifier.
//!
//! # Design
//! Externally an identifier is the 24-character hex form of a document
//! `ObjectId`. It is validated exactly once, when it crosses into the system
//! (`TodoId::parse`), and is a plain string from then on. Storage backends
//! that need the native `ObjectId` convert at their own edge.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Length of an identifier in hex characters (12 bytes).
pub const ID_LEN: usize = 24;

/// A validated todo identifier: 24 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new().to_hex())
    }

    /// Parse a client-supplied identifier. Surrounding whitespace is ignored
    /// and hex digits are normalised to lowercase.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() != ID_LEN || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidId(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TodoId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TodoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
