//! Dataset seeding
//!
//! Fills the store with synthetic people: a random ten-letter name, an age
//! in `[18, 80]`, one of six cities, and a `created_at` drawn uniformly
//! (whole seconds, stored as epoch milliseconds) between 2010-01-01 and now.
//!
//! Timestamps collide often at scale, which is exactly what exercises the
//! `(created_at, id)` tie-breaking of cursor pagination.

use crate::error::{Error, Result};
use crate::storage::DuckDbStore;
use crate::types::NewRow;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Cities rows are drawn from
pub const CITIES: [&str; 6] = ["Delhi", "Mumbai", "London", "New York", "Tokyo", "Berlin"];

/// Length of generated names
pub const NAME_LEN: usize = 10;

/// Youngest generated age
pub const MIN_AGE: i32 = 18;

/// Oldest generated age
pub const MAX_AGE: i32 = 80;

/// 2010-01-01T00:00:00Z in epoch seconds
pub const EARLIEST_SECS: i64 = 1_262_304_000;

/// Rows per appender flush
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

// ============================================================================
// Row Generator
// ============================================================================

/// Endless source of random rows
pub struct RowGenerator {
    rng: StdRng,
    latest_secs: i64,
}

impl RowGenerator {
    /// Create a generator; a fixed `seed` makes the sequence reproducible
    pub fn new(seed: Option<u64>, now: DateTime<Utc>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            latest_secs: now.timestamp().max(EARLIEST_SECS),
        }
    }

    /// Generate the next row
    pub fn next_row(&mut self) -> NewRow {
        let name: String = (0..NAME_LEN)
            .map(|_| LETTERS[self.rng.random_range(0..LETTERS.len())] as char)
            .collect();
        let age = self.rng.random_range(MIN_AGE..=MAX_AGE);
        let city = CITIES[self.rng.random_range(0..CITIES.len())];
        let created_at = self.rng.random_range(EARLIEST_SECS..=self.latest_secs) * 1000;

        NewRow::new(name, age, city, created_at)
    }
}

impl Iterator for RowGenerator {
    type Item = NewRow;

    fn next(&mut self) -> Option<NewRow> {
        Some(self.next_row())
    }
}

// ============================================================================
// Seeding
// ============================================================================

/// Seeding options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    /// Rows to insert
    pub rows: u64,
    /// RNG seed for a reproducible dataset
    pub rng_seed: Option<u64>,
    /// Rows per insert batch
    pub batch_size: usize,
}

impl SeedOptions {
    /// Options for `rows` rows with a random seed and the default batch size
    pub fn new(rows: u64) -> Self {
        Self {
            rows,
            rng_seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Fix the RNG seed
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Set the batch size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy)]
pub struct SeedReport {
    /// Rows inserted
    pub rows: u64,
    /// Wall time spent
    pub elapsed: Duration,
}

/// Drop and recreate the table, then insert `options.rows` generated rows
pub fn seed(store: &DuckDbStore, options: &SeedOptions) -> Result<SeedReport> {
    if options.batch_size == 0 {
        return Err(Error::invalid_parameter("batch_size", "must be >= 1"));
    }

    let start = Instant::now();
    store.reset()?;

    let mut generator = RowGenerator::new(options.rng_seed, Utc::now());
    let mut remaining = options.rows;

    while remaining > 0 {
        let take = remaining.min(options.batch_size as u64) as usize;
        let batch: Vec<NewRow> = generator.by_ref().take(take).collect();
        let ids = store.insert_rows(&batch)?;

        remaining -= take as u64;
        tracing::debug!(
            first_id = ids.start,
            last_id = ids.end - 1,
            remaining,
            "Inserted batch"
        );
    }

    let report = SeedReport {
        rows: options.rows,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        rows = report.rows,
        table = store.table(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Seeded dataset"
    );

    Ok(report)
}
