// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagewise
//!
//! Four ways to page through one relational dataset, side by side.
//!
//! ## Strategies
//!
//! - **Offset**: `ORDER BY id LIMIT n OFFSET k`
//! - **Page number**: offset with `k = (page - 1) * page_size`
//! - **Keyset**: `WHERE id > last_id ORDER BY id LIMIT n`
//! - **Cursor**: opaque token over `(created_at, id)`, newest first, with an
//!   exact `has_next_page`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagewise::{CursorRequest, DuckDbStore, PaginationEngine, Result};
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let store = Arc::new(DuckDbStore::open_in_memory("pagination_dataset")?);
//!     let engine = PaginationEngine::new(store);
//!
//!     let first = engine.cursor(&CursorRequest::from_parts(Some(20), None)?)?;
//!     if first.meta.page_info.has_next_page {
//!         let after = first.meta.page_info.end_cursor.as_deref();
//!         let second = engine.cursor(&CursorRequest::from_parts(Some(20), after)?)?;
//!         println!("{} more rows", second.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        Transport: HTTP /api/v1..v4, CLI fetch, bench     │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┴─────────────────────────────┐
//! │  PaginationEngine  (validate → fetch → assemble envelope)│
//! ├──────────────┬──────────────┬──────────────┬─────────────┤
//! │   Offset     │    Page      │   Keyset     │   Cursor    │
//! └──────────────┴──────────────┴──────────────┴─────────────┘
//!                              │
//! ┌────────────────────────────┴─────────────────────────────┐
//! │   RowAccessor  (DuckDbStore, one lease per call)         │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Dataset rows and ordering keys
pub mod types;

/// Opaque cursor tokens
pub mod cursor;

/// Row storage
pub mod storage;

/// Pagination strategies
pub mod pagination;

/// Strategy dispatch and deadlines
pub mod engine;

/// Configuration
pub mod config;

/// Dataset generation
pub mod seed;

/// Latency benchmark
pub mod bench;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::AppConfig;
pub use cursor::CursorToken;
pub use engine::{FetchRequest, FetchResponse, PaginationEngine};
pub use pagination::{
    CursorPage, CursorRequest, KeysetPage, KeysetRequest, NumberedPage, OffsetPage, OffsetRequest,
    Page, PageInfo, PageRequest, Strategy,
};
pub use storage::{DuckDbStore, RowAccessor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
