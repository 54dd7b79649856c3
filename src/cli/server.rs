//! HTTP server exposing the four pagination strategies
//!
//! | Route | Strategy |
//! |-------|----------|
//! | `GET /api/v1?offset&limit` | Offset |
//! | `GET /api/v2?page&page_size` | Page number |
//! | `GET /api/v3?limit&last_id` | Keyset |
//! | `GET /api/v4?limit&after` | Cursor |

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerSettings;
use crate::engine::PaginationEngine;
use crate::error::{Error, Result};
use crate::pagination::{
    CursorPage, CursorRequest, KeysetPage, KeysetRequest, NumberedPage, OffsetPage, OffsetRequest,
    PageRequest,
};

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    engine: Arc<PaginationEngine>,
    query_timeout: Duration,
}

impl AppState {
    /// Create state; every fetch is bounded by `query_timeout`
    pub fn new(engine: Arc<PaginationEngine>, query_timeout: Duration) -> Self {
        Self {
            engine,
            query_timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OffsetParams {
    offset: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct KeysetParams {
    limit: Option<i64>,
    last_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CursorParams {
    limit: Option<i64>,
    after: Option<String>,
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    kind: &'static str,
    error: String,
}

/// Crate error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::invalid_parameter("query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), "Request failed: {}", self.0);
        } else {
            tracing::warn!(kind = self.0.kind(), "Rejected request: {}", self.0);
        }

        let body = ErrorBody {
            success: false,
            kind: self.0.kind(),
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Build the router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1", get(offset_page))
        .route("/api/v2", get(numbered_page))
        .route("/api/v3", get(keyset_page))
        .route("/api/v4", get(cursor_page))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(settings: &ServerSettings, engine: Arc<PaginationEngine>) -> Result<()> {
    let app = router(AppState::new(engine, settings.query_timeout()));

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port))
        .await
        .map_err(|e| {
            Error::config(format!(
                "Failed to bind to {}:{}: {e}",
                settings.host, settings.port
            ))
        })?;

    let addr = listener.local_addr()?;
    tracing::info!(
        query_timeout_ms = settings.query_timeout_ms,
        "Starting HTTP server on http://{}",
        addr
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn offset_page(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<OffsetParams>, QueryRejection>,
) -> ApiResult<OffsetPage> {
    let Query(params) = params?;
    let request = OffsetRequest::from_parts(params.offset, params.limit)?;

    let page = state
        .engine
        .call(state.query_timeout, move |e| e.offset(&request))
        .await?;
    Ok(Json(page))
}

async fn numbered_page(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<NumberedPage> {
    let Query(params) = params?;
    let request = PageRequest::from_parts(params.page, params.page_size)?;

    let page = state
        .engine
        .call(state.query_timeout, move |e| e.page(&request))
        .await?;
    Ok(Json(page))
}

async fn keyset_page(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<KeysetParams>, QueryRejection>,
) -> ApiResult<KeysetPage> {
    let Query(params) = params?;
    let request = KeysetRequest::from_parts(params.limit, params.last_id)?;

    let page = state
        .engine
        .call(state.query_timeout, move |e| e.keyset(&request))
        .await?;
    Ok(Json(page))
}

async fn cursor_page(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<CursorParams>, QueryRejection>,
) -> ApiResult<CursorPage> {
    let Query(params) = params?;
    let request = CursorRequest::from_parts(params.limit, params.after.as_deref())?;

    let page = state
        .engine
        .call(state.query_timeout, move |e| e.cursor(&request))
        .await?;
    Ok(Json(page))
}
