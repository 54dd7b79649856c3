//! The query intents the pagination strategies issue against storage

use crate::error::Result;
use crate::types::{CompositeKey, Row};

/// Read access to the ordered dataset.
///
/// Implementations execute exactly these four bounded queries. Every failure
/// must surface as [`crate::Error::StorageUnavailable`]; callers never retry.
pub trait RowAccessor: Send + Sync {
    /// Rows ordered by `id` ascending, skipping `offset`, taking `limit`.
    fn scan_skip(&self, offset: u64, limit: u64) -> Result<Vec<Row>>;

    /// Rows with `id > after` (or all rows when `after` is `None`),
    /// ordered by `id` ascending, taking `limit`.
    fn scan_after_id(&self, after: Option<i64>, limit: u64) -> Result<Vec<Row>>;

    /// Rows strictly before `before` in `(created_at DESC, id DESC)` order
    /// (or from the top when `before` is `None`), taking `limit`.
    fn scan_before_key(&self, before: Option<CompositeKey>, limit: u64) -> Result<Vec<Row>>;

    /// Number of rows strictly before `key` in `(created_at DESC, id DESC)` order.
    fn count_before_key(&self, key: CompositeKey) -> Result<u64>;
}
