//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Offset, page, keyset and cursor pagination over one dataset
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides config; omit for in-memory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Table name (overrides config)
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Drop, recreate and fill the dataset table
    Seed {
        /// Rows to generate
        #[arg(long, default_value = "1000000")]
        rows: u64,

        /// RNG seed for a reproducible dataset
        #[arg(long)]
        rng_seed: Option<u64>,

        /// Rows per insert batch
        #[arg(long, default_value = "10000")]
        batch_size: usize,
    },

    /// Fetch one page and print it
    Fetch {
        #[command(subcommand)]
        strategy: FetchCommand,
    },

    /// Measure request latency of each strategy
    Bench {
        /// Benchmark a running server instead of the local store
        #[arg(long)]
        url: Option<String>,

        /// Requests per method
        #[arg(long, default_value = "10")]
        runs: usize,

        /// Page size
        #[arg(long, default_value = "50")]
        limit: i64,

        /// Dataset size the offset run spreads across (default: row count,
        /// or 1000000 for a remote server)
        #[arg(long)]
        total_rows: Option<u64>,
    },
}

/// One-shot fetch strategies
#[derive(Subcommand, Debug, Clone)]
pub enum FetchCommand {
    /// Offset pagination
    Offset {
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,

        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        limit: i64,
    },

    /// Page-number pagination
    Page {
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        page: i64,

        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        page_size: i64,
    },

    /// Keyset pagination over `id`
    Keyset {
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        limit: i64,

        /// Last id of the previous page
        #[arg(long, allow_negative_numbers = true)]
        last_id: Option<i64>,
    },

    /// Cursor pagination over `(created_at, id)`
    Cursor {
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        limit: i64,

        /// `end_cursor` of the previous page
        #[arg(long)]
        after: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Human-readable output
    Pretty,
}
