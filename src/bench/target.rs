//! Benchmark targets
//!
//! A target answers offset, keyset and cursor fetches either in-process
//! (through the engine) or over HTTP against a running server.

use crate::engine::PaginationEngine;
use crate::error::{Error, Result};
use crate::pagination::{
    CursorPage, CursorRequest, KeysetPage, KeysetRequest, OffsetPage, OffsetRequest,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Where benchmark requests go
pub enum BenchTarget {
    /// In-process engine, each call bounded by `deadline`
    Local {
        engine: Arc<PaginationEngine>,
        deadline: Duration,
    },
    /// Remote pagination server
    Remote(RemoteClient),
}

impl BenchTarget {
    /// Local target
    pub fn local(engine: Arc<PaginationEngine>, deadline: Duration) -> Self {
        Self::Local { engine, deadline }
    }

    /// Remote target at `base_url`
    pub fn remote(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self::Remote(RemoteClient::new(base_url, timeout)?))
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            Self::Local { .. } => "local".to_string(),
            Self::Remote(client) => client.base_url().to_string(),
        }
    }

    /// Offset fetch
    pub async fn offset(&self, request: OffsetRequest) -> Result<OffsetPage> {
        match self {
            Self::Local { engine, deadline } => {
                engine.call(*deadline, move |e| e.offset(&request)).await
            }
            Self::Remote(client) => {
                client
                    .get(
                        "/api/v1",
                        &[
                            ("offset", request.offset().to_string()),
                            ("limit", request.limit().to_string()),
                        ],
                    )
                    .await
            }
        }
    }

    /// Keyset fetch
    pub async fn keyset(&self, request: KeysetRequest) -> Result<KeysetPage> {
        match self {
            Self::Local { engine, deadline } => {
                engine.call(*deadline, move |e| e.keyset(&request)).await
            }
            Self::Remote(client) => {
                let mut query = vec![("limit", request.limit().to_string())];
                if let Some(last_id) = request.last_id() {
                    query.push(("last_id", last_id.to_string()));
                }
                client.get("/api/v3", &query).await
            }
        }
    }

    /// Cursor fetch
    pub async fn cursor(&self, request: CursorRequest) -> Result<CursorPage> {
        match self {
            Self::Local { engine, deadline } => {
                engine.call(*deadline, move |e| e.cursor(&request)).await
            }
            Self::Remote(client) => {
                let mut query = vec![("limit", request.limit().to_string())];
                if let Some(after) = request.after() {
                    query.push(("after", after.encode()));
                }
                client.get("/api/v4", &query).await
            }
        }
    }
}

/// Minimal JSON client for a pagination server
pub struct RemoteClient {
    client: Client,
    base_url: Url,
}

impl RemoteClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8000`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::invalid_config(
                "url",
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("pagewise/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Server base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` with `query` and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.base_url.join(path)?;
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        Ok(response.json::<T>().await?)
    }
}
