//! Cursor token encoding
//!
//! A token is the URL-safe, unpadded base64 of a JSON object with exactly two
//! integer fields, `created_at` and `id`. The JSON schema is explicit so that
//! any client can mint or read tokens; the base64 alphabet needs no escaping
//! inside a query string.

use crate::error::{Error, Result};
use crate::types::CompositeKey;
use base64::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structured payload carried inside a token
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CursorPayload {
    created_at: i64,
    id: i64,
}

/// Encode a `(created_at, id)` pair into an opaque token
pub fn encode(created_at: i64, id: i64) -> String {
    let payload = serde_json::json!({ "created_at": created_at, "id": id });
    BASE64_URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes())
}

/// Decode a token back into its `(created_at, id)` pair.
///
/// Fails with [`Error::MalformedToken`] when the text is not valid base64,
/// the payload is not a JSON object, or the object does not hold exactly the
/// two integer fields.
pub fn decode(token: &str) -> Result<(i64, i64)> {
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| Error::malformed_token(format!("invalid base64: {e}")))?;

    // The derived struct would also accept a two-element array.
    if bytes.iter().find(|b| !b.is_ascii_whitespace()) != Some(&b'{') {
        return Err(Error::malformed_token("payload is not an object"));
    }

    let payload: CursorPayload = serde_json::from_slice(&bytes)
        .map_err(|e| Error::malformed_token(format!("invalid payload: {e}")))?;

    Ok((payload.created_at, payload.id))
}

/// A decoded cursor position.
///
/// Serializes as its encoded token string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CursorToken {
    key: CompositeKey,
}

impl CursorToken {
    /// Create a token for the given position
    pub fn new(created_at: i64, id: i64) -> Self {
        Self {
            key: CompositeKey::new(created_at, id),
        }
    }

    /// Position this token points at
    pub fn key(&self) -> CompositeKey {
        self.key
    }

    /// Encode to the wire form
    pub fn encode(&self) -> String {
        encode(self.key.created_at, self.key.id)
    }

    /// Decode from the wire form
    pub fn decode(token: &str) -> Result<Self> {
        let (created_at, id) = decode(token)?;
        Ok(Self::new(created_at, id))
    }
}

impl From<CompositeKey> for CursorToken {
    fn from(key: CompositeKey) -> Self {
        Self { key }
    }
}

impl fmt::Display for CursorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for CursorToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl From<CursorToken> for String {
    fn from(token: CursorToken) -> Self {
        token.encode()
    }
}

impl TryFrom<String> for CursorToken {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::decode(&value)
    }
}
