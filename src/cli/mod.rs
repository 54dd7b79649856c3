//! CLI module
//!
//! Command-line interface and HTTP server.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `seed` - Generate the dataset
//! - `fetch` - Fetch one page with a chosen strategy
//! - `bench` - Measure per-strategy latency

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, FetchCommand, OutputFormat};
pub use runner::{fetch_request, Runner};
pub use server::{router, serve, ApiError, AppState};
