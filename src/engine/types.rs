//! Engine types
//!
//! Strategy-agnostic request and response wrappers, used by callers that
//! pick the strategy at runtime (CLI, benchmark).

use crate::pagination::{
    CursorPage, CursorRequest, KeysetPage, KeysetRequest, NumberedPage, OffsetPage, OffsetRequest,
    PageRequest, Strategy,
};
use crate::types::Row;
use serde::Serialize;

/// A request for any of the four strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Offset(OffsetRequest),
    Page(PageRequest),
    Keyset(KeysetRequest),
    Cursor(CursorRequest),
}

impl FetchRequest {
    /// Strategy this request targets
    pub fn strategy(&self) -> Strategy {
        match self {
            FetchRequest::Offset(_) => Strategy::Offset,
            FetchRequest::Page(_) => Strategy::Page,
            FetchRequest::Keyset(_) => Strategy::Keyset,
            FetchRequest::Cursor(_) => Strategy::Cursor,
        }
    }
}

/// A page from any of the four strategies.
///
/// Serializes as the inner envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FetchResponse {
    Offset(OffsetPage),
    Page(NumberedPage),
    Keyset(KeysetPage),
    Cursor(CursorPage),
}

impl FetchResponse {
    /// Rows of the page
    pub fn data(&self) -> &[Row] {
        match self {
            FetchResponse::Offset(page) => &page.data,
            FetchResponse::Page(page) => &page.data,
            FetchResponse::Keyset(page) => &page.data,
            FetchResponse::Cursor(page) => &page.data,
        }
    }

    /// Strategy that produced this page
    pub fn strategy(&self) -> Strategy {
        match self {
            FetchResponse::Offset(_) => Strategy::Offset,
            FetchResponse::Page(_) => Strategy::Page,
            FetchResponse::Keyset(_) => Strategy::Keyset,
            FetchResponse::Cursor(_) => Strategy::Cursor,
        }
    }
}
