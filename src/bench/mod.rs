//! Pagination benchmark
//!
//! Measures per-request latency of three access patterns:
//!
//! - **Offset**: `runs` requests at offsets spread evenly over the dataset
//!   (`i * total_rows / runs`), showing cost growing with depth.
//! - **Cursor**: `runs` chained requests following `end_cursor`.
//! - **Keyset**: `runs` chained requests following `next_last_id`.
//!
//! Chained runs start over from the first page when they reach the end.

mod target;

pub use target::{BenchTarget, RemoteClient};

use crate::cursor::CursorToken;
use crate::error::{Error, Result};
use crate::pagination::{CursorRequest, KeysetRequest, OffsetRequest, Strategy};
use serde::Serialize;
use std::time::Instant;

/// Default number of requests per method
pub const DEFAULT_RUNS: usize = 10;

/// Default page size
pub const DEFAULT_BENCH_LIMIT: i64 = 50;

/// Default dataset size assumed for a remote target
pub const DEFAULT_TOTAL_ROWS: u64 = 1_000_000;

/// Benchmark parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    /// Requests per method
    pub runs: usize,
    /// Page size for every request
    pub limit: i64,
    /// Dataset size the offset run spreads across
    pub total_rows: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            limit: DEFAULT_BENCH_LIMIT,
            total_rows: DEFAULT_TOTAL_ROWS,
        }
    }
}

/// One timed request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub method: Strategy,
    pub iteration: usize,
    /// Offset for offset runs, last id (keyset) or iteration (cursor) otherwise
    pub position: i64,
    pub rows: usize,
    pub elapsed_ms: f64,
}

/// Aggregate over one method's samples
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub method: Strategy,
    pub iterations: usize,
    pub avg_ms: f64,
    pub max_ms: f64,
}

impl Summary {
    /// Summarize the samples of `method`; `None` when there are none
    pub fn of(method: Strategy, samples: &[Sample]) -> Option<Self> {
        let times: Vec<f64> = samples
            .iter()
            .filter(|s| s.method == method)
            .map(|s| s.elapsed_ms)
            .collect();

        if times.is_empty() {
            return None;
        }

        Some(Self {
            method,
            iterations: times.len(),
            avg_ms: times.iter().sum::<f64>() / times.len() as f64,
            max_ms: times.iter().copied().fold(f64::MIN, f64::max),
        })
    }
}

/// Benchmark results
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub samples: Vec<Sample>,
    pub summaries: Vec<Summary>,
}

/// Benchmark runner
pub struct Benchmark {
    target: BenchTarget,
    config: BenchConfig,
}

impl Benchmark {
    /// Create a benchmark; `runs` and `limit` are validated here
    pub fn new(target: BenchTarget, config: BenchConfig) -> Result<Self> {
        if config.runs == 0 {
            return Err(Error::invalid_parameter("runs", "must be >= 1"));
        }
        // Same bounds as every request.
        OffsetRequest::new(0, config.limit)?;

        Ok(Self { target, config })
    }

    /// Run all three methods in turn
    pub async fn run(&self) -> Result<BenchReport> {
        tracing::info!(
            bench_target = %self.target.describe(),
            runs = self.config.runs,
            limit = self.config.limit,
            "Starting benchmark"
        );

        let mut samples = self.run_offset().await?;
        samples.extend(self.run_cursor().await?);
        samples.extend(self.run_keyset().await?);

        let summaries: Vec<Summary> = [Strategy::Offset, Strategy::Cursor, Strategy::Keyset]
            .into_iter()
            .filter_map(|method| Summary::of(method, &samples))
            .collect();

        for s in &summaries {
            tracing::info!(
                method = %s.method,
                iterations = s.iterations,
                avg_ms = s.avg_ms,
                max_ms = s.max_ms,
                "Benchmark summary"
            );
        }

        Ok(BenchReport { samples, summaries })
    }

    /// Offsets visited by the offset run
    pub fn offsets(&self) -> Vec<u64> {
        let step = self.config.total_rows / self.config.runs as u64;
        (0..self.config.runs as u64).map(|i| i * step).collect()
    }

    async fn run_offset(&self) -> Result<Vec<Sample>> {
        let mut samples = Vec::with_capacity(self.config.runs);

        for (iteration, offset) in self.offsets().into_iter().enumerate() {
            let request = OffsetRequest::new(offset as i64, self.config.limit)?;

            let start = Instant::now();
            let page = self.target.offset(request).await?;
            samples.push(Sample {
                method: Strategy::Offset,
                iteration,
                position: offset as i64,
                rows: page.len(),
                elapsed_ms: elapsed_ms(start),
            });
        }

        Ok(samples)
    }

    async fn run_cursor(&self) -> Result<Vec<Sample>> {
        let mut samples = Vec::with_capacity(self.config.runs);
        let mut after: Option<CursorToken> = None;

        for iteration in 0..self.config.runs {
            let request = CursorRequest::new(self.config.limit, after)?;

            let start = Instant::now();
            let page = self.target.cursor(request).await?;
            samples.push(Sample {
                method: Strategy::Cursor,
                iteration,
                position: iteration as i64,
                rows: page.len(),
                elapsed_ms: elapsed_ms(start),
            });

            after = match (&page.meta.page_info.end_cursor, page.meta.page_info.has_next_page) {
                (Some(token), true) => Some(CursorToken::decode(token)?),
                _ => None,
            };
        }

        Ok(samples)
    }

    async fn run_keyset(&self) -> Result<Vec<Sample>> {
        let mut samples = Vec::with_capacity(self.config.runs);
        let mut last_id: Option<i64> = None;

        for iteration in 0..self.config.runs {
            let request = KeysetRequest::new(self.config.limit, last_id)?;

            let start = Instant::now();
            let page = self.target.keyset(request).await?;
            samples.push(Sample {
                method: Strategy::Keyset,
                iteration,
                position: last_id.unwrap_or(0),
                rows: page.len(),
                elapsed_ms: elapsed_ms(start),
            });

            last_id = page.meta.next_last_id;
        }

        Ok(samples)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Render summaries as a fixed-width table
pub fn render_table(summaries: &[Summary]) -> String {
    let mut out = String::from("Pagination Benchmark Results (ms)\n");
    out.push_str(&format!(
        "{:<8} {:>10} {:>14} {:>14}\n",
        "Method", "Iterations", "Avg Time (ms)", "Max Time (ms)"
    ));
    for s in summaries {
        out.push_str(&format!(
            "{:<8} {:>10} {:>14.2} {:>14.2}\n",
            s.method.as_str(),
            s.iterations,
            s.avg_ms,
            s.max_ms
        ));
    }
    out
}
