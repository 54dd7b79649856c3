//! Pagination engine
//!
//! Entry point for all four strategies.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PaginationEngine` - Runs a strategy against a [`RowAccessor`]
//! - `FetchRequest` / `FetchResponse` - Runtime-selected strategy wrappers
//!
//! The engine keeps no state between calls. Every continuation value
//! (offset, page, last id, cursor token) travels with the caller, so one
//! engine can serve any number of concurrent callers.

mod types;

pub use types::{FetchRequest, FetchResponse};

use crate::error::{Error, Result};
use crate::pagination::{
    CursorPage, CursorPaginator, CursorRequest, KeysetPage, KeysetPaginator, KeysetRequest,
    NumberedPage, OffsetPage, OffsetPaginator, OffsetRequest, Page, PageNumberPaginator,
    PageRequest, Paginator,
};
use crate::storage::RowAccessor;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Stateless pagination engine over a row accessor
#[derive(Clone)]
pub struct PaginationEngine {
    store: Arc<dyn RowAccessor>,
}

impl PaginationEngine {
    /// Create a new engine
    pub fn new(store: Arc<dyn RowAccessor>) -> Self {
        Self { store }
    }

    /// Underlying accessor
    pub fn store(&self) -> &dyn RowAccessor {
        self.store.as_ref()
    }

    /// Offset fetch
    pub fn offset(&self, request: &OffsetRequest) -> Result<OffsetPage> {
        self.run(&OffsetPaginator, request)
    }

    /// Page-number fetch
    pub fn page(&self, request: &PageRequest) -> Result<NumberedPage> {
        self.run(&PageNumberPaginator, request)
    }

    /// Keyset fetch
    pub fn keyset(&self, request: &KeysetRequest) -> Result<KeysetPage> {
        self.run(&KeysetPaginator, request)
    }

    /// Cursor fetch
    pub fn cursor(&self, request: &CursorRequest) -> Result<CursorPage> {
        self.run(&CursorPaginator, request)
    }

    /// Fetch with the strategy chosen by the request
    pub fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        Ok(match request {
            FetchRequest::Offset(r) => FetchResponse::Offset(self.offset(r)?),
            FetchRequest::Page(r) => FetchResponse::Page(self.page(r)?),
            FetchRequest::Keyset(r) => FetchResponse::Keyset(self.keyset(r)?),
            FetchRequest::Cursor(r) => FetchResponse::Cursor(self.cursor(r)?),
        })
    }

    /// Run `f` on the blocking pool, failing with [`Error::Timeout`] once
    /// `deadline` elapses.
    ///
    /// A timed-out call yields no page; whatever the storage call returns
    /// afterwards is dropped.
    pub async fn call<T, F>(self: &Arc<Self>, deadline: Duration, f: F) -> Result<T>
    where
        F: FnOnce(&PaginationEngine) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(self);
        let task = tokio::task::spawn_blocking(move || f(&engine));

        match tokio::time::timeout(deadline, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(Error::Other(format!("Pagination task failed: {e}"))),
            Err(_) => Err(Error::Timeout {
                timeout_ms: deadline.as_millis() as u64,
            }),
        }
    }

    fn run<P>(&self, paginator: &P, request: &P::Request) -> Result<Page<P::Meta>>
    where
        P: Paginator,
        P::Request: Debug,
    {
        let strategy = paginator.strategy();
        let start = Instant::now();

        let result = paginator.fetch(self.store.as_ref(), request);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(page) => tracing::debug!(
                %strategy,
                rows = page.len(),
                elapsed_ms,
                "Fetched page for {:?}",
                request
            ),
            Err(e) => tracing::warn!(%strategy, elapsed_ms, "Fetch failed: {}", e),
        }

        result
    }
}
