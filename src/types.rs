//! Common types used throughout pagewise
//!
//! This module contains the row model and the ordering keys shared by the
//! storage, cursor and pagination modules.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// Limits
// ============================================================================

/// Smallest accepted page size
pub const MIN_LIMIT: i64 = 1;

/// Largest accepted page size
pub const MAX_LIMIT: i64 = 100;

/// Page size used when the caller supplies none
pub const DEFAULT_LIMIT: i64 = 10;

// ============================================================================
// Rows
// ============================================================================

/// A record of the dataset.
///
/// `id` is unique and assigned in increasing order at insert time.
/// `created_at` is epoch milliseconds and is neither unique nor
/// monotonic with `id`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub city: String,
    pub created_at: i64,
}

impl Row {
    /// Composite `(created_at, id)` key of this row
    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(self.created_at, self.id)
    }
}

/// A row that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRow {
    pub name: String,
    pub age: i32,
    pub city: String,
    pub created_at: i64,
}

impl NewRow {
    /// Create a new unsaved row
    pub fn new(name: impl Into<String>, age: i32, city: impl Into<String>, created_at: i64) -> Self {
        Self {
            name: name.into(),
            age,
            city: city.into(),
            created_at,
        }
    }

    /// Attach an id, producing a stored row
    pub fn with_id(self, id: i64) -> Row {
        Row {
            id,
            name: self.name,
            age: self.age,
            city: self.city,
            created_at: self.created_at,
        }
    }
}

// ============================================================================
// Ordering Keys
// ============================================================================

/// The `(created_at, id)` ordering key.
///
/// `created_at` alone has duplicates; `id` breaks ties so the pair is a
/// strict total order. `Ord` compares `created_at` first, then `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    pub created_at: i64,
    pub id: i64,
}

impl CompositeKey {
    /// Create a new composite key
    pub fn new(created_at: i64, id: i64) -> Self {
        Self { created_at, id }
    }
}

impl Ord for CompositeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for CompositeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
