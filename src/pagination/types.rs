//! Pagination types and traits
//!
//! Request parameters (validated on construction), the page envelope, and
//! the [`Paginator`] trait every strategy implements.

use crate::cursor::CursorToken;
use crate::error::{Error, Result};
use crate::storage::RowAccessor;
use crate::types::{Row, DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Strategy
// ============================================================================

/// The four pagination strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Positional skip over `id` order
    Offset,
    /// Page number sugar over offset
    Page,
    /// `id > last_id` filter
    Keyset,
    /// Opaque `(created_at, id)` token, descending
    Cursor,
}

impl Strategy {
    /// All strategies in declaration order
    pub const ALL: [Strategy; 4] = [
        Strategy::Offset,
        Strategy::Page,
        Strategy::Keyset,
        Strategy::Cursor,
    ];

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Offset => "offset",
            Strategy::Page => "page",
            Strategy::Keyset => "keyset",
            Strategy::Cursor => "cursor",
        }
    }

    /// Whether successive calls can skip or repeat rows under concurrent inserts
    pub fn drifts_under_inserts(&self) -> bool {
        matches!(self, Strategy::Offset | Strategy::Page)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Requests
// ============================================================================

fn validate_limit(name: &str, value: i64) -> Result<u64> {
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&value) {
        return Err(Error::invalid_parameter(
            name,
            format!("must be between {MIN_LIMIT} and {MAX_LIMIT}, got {value}"),
        ));
    }
    Ok(value as u64)
}

/// Offset fetch parameters.
///
/// Query cost grows with `offset`: storage walks every skipped row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetRequest {
    offset: u64,
    limit: u64,
}

impl OffsetRequest {
    /// Validate and build; `offset >= 0`, `limit` in `[1, 100]`
    pub fn new(offset: i64, limit: i64) -> Result<Self> {
        if offset < 0 {
            return Err(Error::invalid_parameter(
                "offset",
                format!("must be >= 0, got {offset}"),
            ));
        }
        Ok(Self {
            offset: offset as u64,
            limit: validate_limit("limit", limit)?,
        })
    }

    /// Build from optional parameters, applying defaults
    pub fn from_parts(offset: Option<i64>, limit: Option<i64>) -> Result<Self> {
        Self::new(offset.unwrap_or(0), limit.unwrap_or(DEFAULT_LIMIT))
    }

    /// Rows to skip
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Rows to take
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// The request a caller would issue for the following page
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }
}

impl Default for OffsetRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT as u64,
        }
    }
}

/// Page-number fetch parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Validate and build; `page >= 1`, `page_size` in `[1, 100]`
    pub fn new(page: i64, page_size: i64) -> Result<Self> {
        if page < 1 {
            return Err(Error::invalid_parameter(
                "page",
                format!("must be >= 1, got {page}"),
            ));
        }
        let page_size = validate_limit("page_size", page_size)?;

        // The derived offset must stay representable.
        (page - 1)
            .checked_mul(page_size as i64)
            .ok_or_else(|| Error::invalid_parameter("page", format!("{page} is too large")))?;

        Ok(Self {
            page: page as u64,
            page_size,
        })
    }

    /// Build from optional parameters, applying defaults
    pub fn from_parts(page: Option<i64>, page_size: Option<i64>) -> Result<Self> {
        Self::new(page.unwrap_or(1), page_size.unwrap_or(DEFAULT_LIMIT))
    }

    /// 1-based page number
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Rows per page
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Equivalent offset request: `offset = (page - 1) * page_size`
    pub fn to_offset(&self) -> OffsetRequest {
        OffsetRequest {
            offset: (self.page - 1) * self.page_size,
            limit: self.page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_LIMIT as u64,
        }
    }
}

/// Keyset fetch parameters.
///
/// `last_id` of `None` starts from the beginning; `Some(0)` is an ordinary
/// bound meaning `id > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeysetRequest {
    limit: u64,
    last_id: Option<i64>,
}

impl KeysetRequest {
    /// Validate and build; `limit` in `[1, 100]`
    pub fn new(limit: i64, last_id: Option<i64>) -> Result<Self> {
        Ok(Self {
            limit: validate_limit("limit", limit)?,
            last_id,
        })
    }

    /// Build from optional parameters, applying defaults
    pub fn from_parts(limit: Option<i64>, last_id: Option<i64>) -> Result<Self> {
        Self::new(limit.unwrap_or(DEFAULT_LIMIT), last_id)
    }

    /// Rows to take
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Last id seen by the caller
    pub fn last_id(&self) -> Option<i64> {
        self.last_id
    }
}

impl Default for KeysetRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT as u64,
            last_id: None,
        }
    }
}

/// Cursor fetch parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorRequest {
    limit: u64,
    after: Option<CursorToken>,
}

impl CursorRequest {
    /// Validate and build; `limit` in `[1, 100]`
    pub fn new(limit: i64, after: Option<CursorToken>) -> Result<Self> {
        Ok(Self {
            limit: validate_limit("limit", limit)?,
            after,
        })
    }

    /// Build from optional parameters, decoding the `after` token
    pub fn from_parts(limit: Option<i64>, after: Option<&str>) -> Result<Self> {
        let limit = validate_limit("limit", limit.unwrap_or(DEFAULT_LIMIT))?;
        let after = after.map(CursorToken::decode).transpose()?;
        Ok(Self { limit, after })
    }

    /// Rows to take
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Position to continue after
    pub fn after(&self) -> Option<CursorToken> {
        self.after
    }
}

impl Default for CursorRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT as u64,
            after: None,
        }
    }
}

// ============================================================================
// Page Envelope
// ============================================================================

/// A page of rows plus strategy-specific metadata.
///
/// Serializes as `{"data": [...], <metadata fields>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<M> {
    /// Rows in the strategy's order
    pub data: Vec<Row>,
    /// Continuation metadata
    #[serde(flatten)]
    pub meta: M,
}

impl<M> Page<M> {
    /// Create a page
    pub fn new(data: Vec<Row>, meta: M) -> Self {
        Self { data, meta }
    }

    /// Number of rows in the page
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the page holds no rows
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Offset metadata: echoes the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetMeta {
    pub offset: u64,
    pub limit: u64,
}

/// Page-number metadata: echoes the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u64,
    pub page_size: u64,
}

/// Keyset metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysetMeta {
    /// `id` of the last row returned; `null` for an empty page
    pub next_last_id: Option<i64>,
}

/// Cursor metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorMeta {
    pub page_info: PageInfo,
}

/// Continuation info for cursor pages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Token of the last row returned; `null` for an empty page
    pub end_cursor: Option<String>,
    /// Whether any row exists after `end_cursor`
    pub has_next_page: bool,
}

/// Result of an offset fetch
pub type OffsetPage = Page<OffsetMeta>;
/// Result of a page-number fetch
pub type NumberedPage = Page<PageMeta>;
/// Result of a keyset fetch
pub type KeysetPage = Page<KeysetMeta>;
/// Result of a cursor fetch
pub type CursorPage = Page<CursorMeta>;

impl OffsetPage {
    /// Assemble an offset page
    pub fn assemble(data: Vec<Row>, request: &OffsetRequest) -> Self {
        Self::new(
            data,
            OffsetMeta {
                offset: request.offset,
                limit: request.limit,
            },
        )
    }
}

impl NumberedPage {
    /// Assemble a page-number page
    pub fn assemble(data: Vec<Row>, request: &PageRequest) -> Self {
        Self::new(
            data,
            PageMeta {
                page: request.page,
                page_size: request.page_size,
            },
        )
    }
}

impl KeysetPage {
    /// Assemble a keyset page; the continuation is the last row's id
    pub fn assemble(data: Vec<Row>) -> Self {
        let next_last_id = data.last().map(|row| row.id);
        Self::new(data, KeysetMeta { next_last_id })
    }
}

impl CursorPage {
    /// Assemble a cursor page from rows and the existence probe result
    pub fn assemble(data: Vec<Row>, has_next_page: bool) -> Self {
        let end_cursor = data.last().map(|row| CursorToken::from(row.key()).encode());
        Self::new(
            data,
            CursorMeta {
                page_info: PageInfo {
                    end_cursor,
                    has_next_page,
                },
            },
        )
    }
}

// ============================================================================
// Paginator
// ============================================================================

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Validated request parameters
    type Request;
    /// Metadata carried next to the rows
    type Meta;

    /// Which strategy this is
    fn strategy(&self) -> Strategy;

    /// Run one bounded fetch against storage
    fn fetch(&self, store: &dyn RowAccessor, request: &Self::Request) -> Result<Page<Self::Meta>>;
}
