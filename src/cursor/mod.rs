//! Cursor codec
//!
//! Opaque continuation tokens over the `(created_at, id)` ordering key.
//!
//! # Overview
//!
//! ```rust
//! use pagewise::cursor;
//!
//! let token = cursor::encode(1_700_000_000_000, 42);
//! assert_eq!(cursor::decode(&token).unwrap(), (1_700_000_000_000, 42));
//! ```
//!
//! Tokens carry no integrity protection; a tampered token either decodes to
//! another valid position or fails with a malformed-token error.

mod codec;

pub use codec::{decode, encode, CursorToken};
