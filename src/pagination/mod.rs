//! Pagination module
//!
//! Supports: Offset, Page Number, Keyset, Cursor
//!
//! # Overview
//!
//! | Strategy | Order | Position | Continuation |
//! |----------|-------|----------|--------------|
//! | Offset | `id` asc | rank | caller adds `limit` to `offset` |
//! | Page | `id` asc | rank | caller increments `page` |
//! | Keyset | `id` asc | last `id` | `next_last_id` |
//! | Cursor | `(created_at, id)` desc | last key | `page_info.end_cursor` |
//!
//! Offset and page pagination drift when rows are inserted between calls;
//! keyset and cursor pagination do not, because they filter on a key value
//! instead of skipping a position.

mod strategies;
mod types;

pub use strategies::{CursorPaginator, KeysetPaginator, OffsetPaginator, PageNumberPaginator};
pub use types::{
    CursorMeta, CursorPage, CursorRequest, KeysetMeta, KeysetPage, KeysetRequest, NumberedPage,
    OffsetMeta, OffsetPage, OffsetRequest, Page, PageInfo, PageMeta, PageRequest, Paginator,
    Strategy,
};

#[cfg(test)]
mod tests;
