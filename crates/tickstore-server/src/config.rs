//! Command-line and environment configuration.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--bind` | `TICKSTORE_BIND` | `0.0.0.0:8000` |
//! | `--store` | `TICKSTORE_STORE` | `duckdb` |
//! | `--db-path` | `TICKSTORE_DB_PATH` | `$TICKSTORE_HOME/tickstore.duckdb` |
//! | `--pool-size` | `TICKSTORE_POOL_SIZE` | `4` |
//! | `--store-timeout-ms` | `TICKSTORE_STORE_TIMEOUT_MS` | `5000` |
//! | `--write-chunk-size` | `TICKSTORE_WRITE_CHUNK_SIZE` | `500` |
//! | `--latest-lookback-secs` | `TICKSTORE_LATEST_LOOKBACK_SECS` | `3600` |
//! | `--environment` | `TICKSTORE_ENVIRONMENT` | `development` |
//! | `--cors-origins` | `TICKSTORE_CORS_ORIGINS` | `http://localhost:3000,http://localhost:8000` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickstore_core::{MemoryStore, PlannerConfig, ServiceConfig, TickStore};
use tickstore_warehouse::{Warehouse, WarehouseConfig, WarehouseError};

/// Tick trade ingestion and query service.
#[derive(Debug, Parser)]
#[command(name = "tickstore", version, about = "Tick trade ingestion and query service")]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// `serve` when no subcommand is given.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve,
    /// Write a generated random-walk history for the demo symbols.
    Seed(SeedArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SeedArgs {
    /// Days of history ending now.
    #[arg(long, default_value_t = 30)]
    pub days: u32,

    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..))]
    pub step_minutes: u32,

    /// Fixed RNG seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Duckdb,
    Memory,
}

#[derive(Debug, Clone, Args)]
pub struct Settings {
    #[arg(long, global = true, env = "TICKSTORE_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    #[arg(long, global = true, env = "TICKSTORE_STORE", value_enum, default_value_t = StoreKind::Duckdb)]
    pub store: StoreKind,

    #[arg(long, global = true, env = "TICKSTORE_DB_PATH")]
    pub db_path: Option<PathBuf>,

    #[arg(long, global = true, env = "TICKSTORE_POOL_SIZE", default_value_t = 4)]
    pub pool_size: usize,

    #[arg(
        long,
        global = true,
        env = "TICKSTORE_STORE_TIMEOUT_MS",
        default_value_t = 5_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub store_timeout_ms: u64,

    #[arg(long, global = true, env = "TICKSTORE_WRITE_CHUNK_SIZE", default_value_t = 500)]
    pub write_chunk_size: usize,

    #[arg(
        long,
        global = true,
        env = "TICKSTORE_LATEST_LOOKBACK_SECS",
        default_value_t = 3_600,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub latest_lookback_secs: u32,

    #[arg(long, global = true, env = "TICKSTORE_ENVIRONMENT", default_value = "development")]
    pub environment: String,

    #[arg(
        long,
        global = true,
        env = "TICKSTORE_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://localhost:8000"
    )]
    pub cors_origins: Vec<String>,
}

impl Settings {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            planner: PlannerConfig {
                latest_lookback: time::Duration::seconds(i64::from(self.latest_lookback_secs)),
                ..PlannerConfig::default()
            },
        }
    }

    pub fn warehouse_config(&self) -> WarehouseConfig {
        let defaults = WarehouseConfig::default();
        WarehouseConfig {
            db_path: self.db_path.clone().unwrap_or(defaults.db_path),
            tickstore_home: defaults.tickstore_home,
            max_pool_size: self.pool_size,
            write_chunk_size: self.write_chunk_size,
        }
    }

    /// Opens the configured backend.
    pub fn open_store(&self) -> Result<Arc<dyn TickStore>, WarehouseError> {
        match self.store {
            StoreKind::Memory => {
                tracing::warn!("using in-memory store; data is lost on exit");
                Ok(Arc::new(MemoryStore::new()))
            }
            StoreKind::Duckdb => Ok(Arc::new(Warehouse::open(self.warehouse_config())?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_with_documented_settings() {
        let cli = Cli::try_parse_from(["tickstore"]).expect("parse");
        assert!(matches!(cli.resolved_command(), Command::Serve));
        assert_eq!(cli.settings.bind.port(), 8000);
        assert_eq!(cli.settings.store_timeout_ms, 5_000);
        assert_eq!(
            cli.settings.cors_origins,
            ["http://localhost:3000", "http://localhost:8000"]
        );

        let config = cli.settings.service_config();
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.planner.latest_lookback, time::Duration::hours(1));
    }

    #[test]
    fn parses_seed_subcommand_with_global_store_flag() {
        let cli = Cli::try_parse_from(["tickstore", "seed", "--days", "2", "--seed", "7", "--store", "memory"])
            .expect("parse");
        match cli.resolved_command() {
            Command::Seed(args) => {
                assert_eq!(args.days, 2);
                assert_eq!(args.step_minutes, 15);
                assert_eq!(args.seed, Some(7));
            }
            Command::Serve => panic!("expected seed"),
        }
        assert_eq!(cli.settings.store, StoreKind::Memory);
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(Cli::try_parse_from(["tickstore", "--store-timeout-ms", "0"]).is_err());
    }
}
