//! CLI runner - executes commands

use crate::bench::{render_table, BenchConfig, BenchTarget, Benchmark, DEFAULT_TOTAL_ROWS};
use crate::cli::commands::{Cli, Commands, FetchCommand, OutputFormat};
use crate::config::AppConfig;
use crate::engine::{FetchRequest, PaginationEngine};
use crate::error::Result;
use crate::pagination::{CursorRequest, KeysetRequest, OffsetRequest, PageRequest};
use crate::seed::{seed, SeedOptions};
use crate::storage::DuckDbStore;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Serve { host, port } => self.serve(config, host.clone(), *port).await,
            Commands::Seed {
                rows,
                rng_seed,
                batch_size,
            } => self.seed(&config, *rows, *rng_seed, *batch_size),
            Commands::Fetch { strategy } => self.fetch(&config, strategy).await,
            Commands::Bench {
                url,
                runs,
                limit,
                total_rows,
            } => {
                let config = BenchRun {
                    config: &config,
                    url: url.as_deref(),
                    runs: *runs,
                    limit: *limit,
                    total_rows: *total_rows,
                };
                self.bench(config).await
            }
        }
    }

    /// Config file, then environment, then global CLI flags
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.cli.config.as_deref())?;

        if let Some(db) = &self.cli.db {
            config.database.path = Some(db.clone());
        }
        if let Some(table) = &self.cli.table {
            config.database.table = table.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn open_store(config: &AppConfig) -> Result<Arc<DuckDbStore>> {
        Ok(Arc::new(DuckDbStore::from_config(&config.database)?))
    }

    async fn serve(
        &self,
        mut config: AppConfig,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<()> {
        if let Some(host) = host {
            config.server.host = host;
        }
        if let Some(port) = port {
            config.server.port = port;
        }
        config.validate()?;

        let store = Self::open_store(&config)?;
        if config.database.path.is_none() {
            tracing::warn!("Serving an in-memory database; it starts empty");
        }

        let engine = Arc::new(PaginationEngine::new(store));
        crate::cli::serve(&config.server, engine).await
    }

    fn seed(
        &self,
        config: &AppConfig,
        rows: u64,
        rng_seed: Option<u64>,
        batch_size: usize,
    ) -> Result<()> {
        let store = Self::open_store(config)?;

        let mut options = SeedOptions::new(rows).with_batch_size(batch_size);
        if let Some(rng_seed) = rng_seed {
            options = options.with_rng_seed(rng_seed);
        }

        let report = seed(&store, &options)?;
        self.output(&json!({
            "type": "SEED",
            "table": store.table(),
            "location": store.location(),
            "rows": report.rows,
            "elapsed_ms": report.elapsed.as_millis() as u64,
        }))
    }

    async fn fetch(&self, config: &AppConfig, command: &FetchCommand) -> Result<()> {
        let request = fetch_request(command)?;
        let engine = Arc::new(PaginationEngine::new(Self::open_store(config)?));

        let response = engine
            .call(config.server.query_timeout(), move |e| e.fetch(&request))
            .await?;
        self.output(&response)
    }

    async fn bench(&self, run: BenchRun<'_>) -> Result<()> {
        let deadline = run.config.server.query_timeout();

        let (target, total_rows) = match run.url {
            Some(url) => (
                BenchTarget::remote(url, deadline)?,
                run.total_rows.unwrap_or(DEFAULT_TOTAL_ROWS),
            ),
            None => {
                let store = Self::open_store(run.config)?;
                let total_rows = match run.total_rows {
                    Some(total) => total,
                    None => store.count()?,
                };
                let engine = Arc::new(PaginationEngine::new(store));
                (BenchTarget::local(engine, deadline), total_rows)
            }
        };

        let bench = Benchmark::new(
            target,
            BenchConfig {
                runs: run.runs,
                limit: run.limit,
                total_rows,
            },
        )?;
        let report = bench.run().await?;

        match self.cli.format {
            OutputFormat::Pretty => print!("{}", render_table(&report.summaries)),
            OutputFormat::Json => {
                for sample in &report.samples {
                    self.output(sample)?;
                }
                for summary in &report.summaries {
                    self.output(summary)?;
                }
            }
        }
        Ok(())
    }

    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Arguments of one `bench` invocation
struct BenchRun<'a> {
    config: &'a AppConfig,
    url: Option<&'a str>,
    runs: usize,
    limit: i64,
    total_rows: Option<u64>,
}

/// Validate fetch arguments into a request
pub fn fetch_request(command: &FetchCommand) -> Result<FetchRequest> {
    Ok(match command {
        FetchCommand::Offset { offset, limit } => {
            FetchRequest::Offset(OffsetRequest::new(*offset, *limit)?)
        }
        FetchCommand::Page { page, page_size } => {
            FetchRequest::Page(PageRequest::new(*page, *page_size)?)
        }
        FetchCommand::Keyset { limit, last_id } => {
            FetchRequest::Keyset(KeysetRequest::new(*limit, *last_id)?)
        }
        FetchCommand::Cursor { limit, after } => {
            FetchRequest::Cursor(CursorRequest::from_parts(Some(*limit), after.as_deref())?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pagination::Strategy;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pagewise").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_fetch_keyset() {
        let cli = parse(&["fetch", "keyset", "--limit", "5", "--last-id", "0"]);
        let Commands::Fetch { strategy } = cli.command else {
            panic!("expected fetch");
        };

        let request = fetch_request(&strategy).unwrap();
        assert_eq!(request.strategy(), Strategy::Keyset);
        assert_eq!(
            request,
            FetchRequest::Keyset(KeysetRequest::new(5, Some(0)).unwrap())
        );
    }

    #[test]
    fn test_fetch_request_validates() {
        let cli = parse(&["fetch", "offset", "--offset", "-1"]);
        let Commands::Fetch { strategy } = cli.command else {
            panic!("expected fetch");
        };
        assert!(matches!(
            fetch_request(&strategy),
            Err(Error::InvalidParameter { .. })
        ));

        let cursor = FetchCommand::Cursor {
            limit: 10,
            after: Some("!!".to_string()),
        };
        assert!(matches!(
            fetch_request(&cursor),
            Err(Error::MalformedToken { .. })
        ));
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = parse(&["--table", "people", "--format", "pretty", "seed", "--rows", "5"]);
        assert_eq!(cli.format, OutputFormat::Pretty);

        let config = Runner::new(cli).load_config().unwrap();
        assert_eq!(config.database.table, "people");
    }

    #[test]
    fn test_invalid_table_flag_rejected() {
        let cli = parse(&["--table", "drop table", "seed"]);
        assert!(matches!(
            Runner::new(cli).load_config(),
            Err(Error::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_bench_defaults() {
        let cli = parse(&["bench"]);
        let Commands::Bench {
            url,
            runs,
            limit,
            total_rows,
        } = cli.command
        else {
            panic!("expected bench");
        };
        assert_eq!(url, None);
        assert_eq!(runs, 10);
        assert_eq!(limit, 50);
        assert_eq!(total_rows, None);
    }
}
