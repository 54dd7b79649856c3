//! Pagination strategy implementations
//!
//! Each strategy turns its request into one bounded query intent (two for
//! cursor pagination) and assembles the page.

use super::types::{
    CursorMeta, CursorPage, CursorRequest, KeysetMeta, KeysetPage, KeysetRequest, NumberedPage,
    OffsetMeta, OffsetPage, OffsetRequest, PageMeta, PageRequest, Paginator, Strategy,
};
use crate::error::Result;
use crate::storage::RowAccessor;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination over `id` ascending.
///
/// Cost is O(offset + limit). Inserts between calls shift positions, so
/// consecutive pages can skip or repeat rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetPaginator;

impl Paginator for OffsetPaginator {
    type Request = OffsetRequest;
    type Meta = OffsetMeta;

    fn strategy(&self) -> Strategy {
        Strategy::Offset
    }

    fn fetch(&self, store: &dyn RowAccessor, request: &OffsetRequest) -> Result<OffsetPage> {
        let rows = store.scan_skip(request.offset(), request.limit())?;
        Ok(OffsetPage::assemble(rows, request))
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page-number pagination, presentation sugar over [`OffsetPaginator`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PageNumberPaginator;

impl Paginator for PageNumberPaginator {
    type Request = PageRequest;
    type Meta = PageMeta;

    fn strategy(&self) -> Strategy {
        Strategy::Page
    }

    fn fetch(&self, store: &dyn RowAccessor, request: &PageRequest) -> Result<NumberedPage> {
        let page = OffsetPaginator.fetch(store, &request.to_offset())?;
        Ok(NumberedPage::assemble(page.data, request))
    }
}

// ============================================================================
// Keyset Pagination
// ============================================================================

/// Keyset pagination on the unique, monotonic `id`.
///
/// Each call is an index range scan of `limit` rows, independent of depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeysetPaginator;

impl Paginator for KeysetPaginator {
    type Request = KeysetRequest;
    type Meta = KeysetMeta;

    fn strategy(&self) -> Strategy {
        Strategy::Keyset
    }

    fn fetch(&self, store: &dyn RowAccessor, request: &KeysetRequest) -> Result<KeysetPage> {
        let rows = store.scan_after_id(request.last_id(), request.limit())?;
        Ok(KeysetPage::assemble(rows))
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor pagination over `(created_at DESC, id DESC)`.
///
/// After the data fetch, a separate count probe over rows strictly before the
/// last returned key decides `has_next_page`. The probe is issued only once
/// the fetch succeeded; if either query fails the whole call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorPaginator;

impl Paginator for CursorPaginator {
    type Request = CursorRequest;
    type Meta = CursorMeta;

    fn strategy(&self) -> Strategy {
        Strategy::Cursor
    }

    fn fetch(&self, store: &dyn RowAccessor, request: &CursorRequest) -> Result<CursorPage> {
        let before = request.after().map(|token| token.key());
        let rows = store.scan_before_key(before, request.limit())?;

        let has_next_page = match rows.last() {
            Some(last) => store.count_before_key(last.key())? > 0,
            None => false,
        };

        Ok(CursorPage::assemble(rows, has_next_page))
    }
}
