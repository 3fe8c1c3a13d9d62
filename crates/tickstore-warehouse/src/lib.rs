pub mod duckdb;
pub mod migrations;

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ::duckdb::{params, Connection};
use serde::Serialize;
use thiserror::Error;
use tickstore_core::{
    Deadline, Observation, QueryDescriptor, SeriesPoint, StoreError, StoreErrorKind, Symbol,
    TickStore, UtcDateTime, WriteReport,
};
use uuid::Uuid;

pub use duckdb::{DuckDbConnectionManager, PooledConnection};

pub const DEFAULT_WRITE_CHUNK_SIZE: usize = 500;

const INSERT_TRADE: &str = "INSERT INTO trades (symbol, ts_us, price, volume) VALUES (?, ?, ?, ?)";

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    #[error("failed to acquire database connection: {0}")]
    Connection(#[source] ::duckdb::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("store deadline exceeded during {operation}")]
    DeadlineExceeded { operation: &'static str },
}

impl WarehouseError {
    /// Maps onto the store taxonomy. Engine errors take `kind`; connection,
    /// I/O and deadline failures are always `Unavailable`.
    pub fn into_store_error(self, kind: StoreErrorKind) -> StoreError {
        let message = self.to_string();
        match (self, kind) {
            (Self::DuckDb(_), StoreErrorKind::QueryFailed) => StoreError::query_failed(message),
            (Self::DuckDb(_), StoreErrorKind::WriteRejected) => {
                StoreError::write_rejected(message)
            }
            _ => StoreError::unavailable(message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub tickstore_home: PathBuf,
    pub db_path: PathBuf,
    pub max_pool_size: usize,
    /// Observations per insert transaction.
    pub write_chunk_size: usize,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let tickstore_home = resolve_tickstore_home();
        let db_path = tickstore_home.join("tickstore.duckdb");
        Self {
            tickstore_home,
            db_path,
            max_pool_size: 4,
            write_chunk_size: DEFAULT_WRITE_CHUNK_SIZE,
        }
    }
}

/// One row of the `ingest_log` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestLogEntry {
    pub batch_id: String,
    pub symbol_count: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub status: String,
}

/// DuckDB-backed [`TickStore`].
#[derive(Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    pub fn open_default() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::default())
    }

    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::open(config.db_path.clone(), config.max_pool_size)?;
        let warehouse = Self { config, manager };
        warehouse.initialize()?;
        tracing::info!(path = %warehouse.db_path().display(), "warehouse opened");
        Ok(warehouse)
    }

    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        self.manager.db_path()
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    /// Most recent batch log entries, newest first.
    pub fn recent_ingest_log(&self, limit: usize) -> Result<Vec<IngestLogEntry>, WarehouseError> {
        let connection = self.manager.acquire()?;
        let mut statement = connection.prepare(
            "SELECT batch_id, symbol_count, accepted, rejected, status FROM ingest_log \
             ORDER BY timestamp DESC LIMIT ?",
        )?;
        let rows = statement.query_map(params![to_i64(limit)], |row| {
            Ok(IngestLogEntry {
                batch_id: row.get(0)?,
                symbol_count: row.get(1)?,
                accepted: row.get(2)?,
                rejected: row.get(3)?,
                status: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn connection(&self) -> Result<PooledConnection, WarehouseError> {
        self.manager.acquire().map_err(WarehouseError::Connection)
    }

    fn write_batch_inner(
        &self,
        connection: &Connection,
        observations: &[Observation],
        deadline: Deadline,
    ) -> Result<WriteReport, WarehouseError> {
        write_chunks(
            observations,
            self.config.write_chunk_size,
            || deadline.is_expired(),
            |chunk| insert_chunk(connection, chunk),
        )
    }

    fn log_batch(
        &self,
        connection: &Connection,
        observations: &[Observation],
        report: &WriteReport,
        started: Instant,
    ) {
        let symbol_count = observations
            .iter()
            .map(Observation::symbol)
            .collect::<BTreeSet<_>>()
            .len();
        let status = match (report.accepted, report.rejected.len()) {
            (_, 0) => "ok",
            (0, _) => "failed",
            _ => "partial",
        };
        let latency_ms = started.elapsed().as_millis().min(i64::MAX as u128) as i64;

        let result = connection.execute(
            "INSERT INTO ingest_log (batch_id, symbol_count, accepted, rejected, status, latency_ms) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                Uuid::new_v4().to_string(),
                to_i64(symbol_count),
                to_i64(report.accepted),
                to_i64(report.rejected.len()),
                status,
                latency_ms,
            ],
        );
        if let Err(error) = result {
            tracing::warn!(%error, "failed to record ingest log entry");
        }
    }

    fn query_rows_inner(
        &self,
        descriptor: &QueryDescriptor,
        deadline: Deadline,
    ) -> Result<Vec<(i64, f64, i64)>, WarehouseError> {
        let connection = self.connection()?;
        let sql = bucket_query_sql(descriptor);
        let mut statement = connection.prepare(sql.as_str())?;
        let mut rows = statement.query(params![
            descriptor.symbol.as_str(),
            descriptor.window.start.unix_micros(),
            descriptor.window.end.unix_micros(),
        ])?;

        let mut output = Vec::new();
        while let Some(row) = rows.next()? {
            if deadline.is_expired() {
                return Err(WarehouseError::DeadlineExceeded { operation: "query" });
            }
            output.push((row.get(0)?, row.get(1)?, row.get(2)?));
        }
        // Rows arrive newest first so that LIMIT keeps the most recent buckets.
        output.reverse();
        Ok(output)
    }

    fn list_symbols_inner(&self, deadline: Deadline) -> Result<Vec<String>, WarehouseError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare("SELECT DISTINCT symbol FROM trades ORDER BY symbol")?;
        let mut rows = statement.query([])?;
        let mut symbols = Vec::new();
        while let Some(row) = rows.next()? {
            if deadline.is_expired() {
                return Err(WarehouseError::DeadlineExceeded {
                    operation: "list_symbols",
                });
            }
            symbols.push(row.get(0)?);
        }
        Ok(symbols)
    }
}

impl TickStore for Warehouse {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn write(&self, observation: &Observation, deadline: Deadline) -> Result<(), StoreError> {
        let connection = self
            .connection()
            .map_err(|error| error.into_store_error(StoreErrorKind::Unavailable))?;
        deadline.check("write")?;

        connection
            .execute(
                INSERT_TRADE,
                params![
                    observation.symbol().as_str(),
                    observation.timestamp().unix_micros(),
                    observation.price(),
                    observation.volume(),
                ],
            )
            .map_err(|error| {
                WarehouseError::from(error).into_store_error(StoreErrorKind::WriteRejected)
            })?;
        Ok(())
    }

    fn write_batch(
        &self,
        observations: &[Observation],
        deadline: Deadline,
    ) -> Result<WriteReport, StoreError> {
        let started = Instant::now();
        let connection = self
            .connection()
            .map_err(|error| error.into_store_error(StoreErrorKind::Unavailable))?;

        let report = self
            .write_batch_inner(&connection, observations, deadline)
            .map_err(|error| error.into_store_error(StoreErrorKind::Unavailable))?;
        self.log_batch(&connection, observations, &report, started);
        Ok(report)
    }

    fn query_rows(
        &self,
        descriptor: &QueryDescriptor,
        deadline: Deadline,
    ) -> Result<Vec<SeriesPoint>, StoreError> {
        deadline.check("query")?;
        self.query_rows_inner(descriptor, deadline)
            .map_err(|error| error.into_store_error(StoreErrorKind::QueryFailed))?
            .into_iter()
            .map(|(bucket_us, price, volume)| {
                UtcDateTime::from_unix_micros(bucket_us)
                    .map(|timestamp| SeriesPoint::new(timestamp, price, volume))
                    .map_err(|error| StoreError::query_failed(error.to_string()))
            })
            .collect()
    }

    fn list_symbols(&self, deadline: Deadline) -> Result<BTreeSet<Symbol>, StoreError> {
        deadline.check("list_symbols")?;
        let raw = self
            .list_symbols_inner(deadline)
            .map_err(|error| error.into_store_error(StoreErrorKind::QueryFailed))?;

        Ok(raw
            .into_iter()
            .filter_map(|value| match Symbol::parse(&value) {
                Ok(symbol) => Some(symbol),
                Err(error) => {
                    tracing::warn!(symbol = %value, %error, "skipping unparsable stored symbol");
                    None
                }
            })
            .collect())
    }

    fn ping(&self, deadline: Deadline) -> bool {
        if deadline.is_expired() {
            return false;
        }
        let Ok(connection) = self.manager.acquire() else {
            return false;
        };
        connection
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }
}

/// Writes `observations` in chunks of `chunk_size`, one `insert` call each.
///
/// A failed chunk rejects all of its indices. Expiry before the first chunk
/// is an error; expiry later rejects every index not yet attempted.
fn write_chunks(
    observations: &[Observation],
    chunk_size: usize,
    mut is_expired: impl FnMut() -> bool,
    mut insert: impl FnMut(&[Observation]) -> Result<(), WarehouseError>,
) -> Result<WriteReport, WarehouseError> {
    let chunk_size = chunk_size.max(1);
    let mut report = WriteReport::default();

    for (chunk_index, chunk) in observations.chunks(chunk_size).enumerate() {
        let offset = chunk_index * chunk_size;
        if is_expired() {
            if offset == 0 {
                return Err(WarehouseError::DeadlineExceeded {
                    operation: "write_batch",
                });
            }
            for index in offset..observations.len() {
                report.reject(index, "store deadline exceeded before sub-batch was written");
            }
            break;
        }

        match insert(chunk) {
            Ok(()) => report.accepted += chunk.len(),
            Err(error) => {
                tracing::warn!(offset, size = chunk.len(), %error, "sub-batch rejected");
                let reason = error.to_string();
                for index in offset..offset + chunk.len() {
                    report.reject(index, reason.clone());
                }
            }
        }
    }

    Ok(report)
}

fn insert_chunk(connection: &Connection, chunk: &[Observation]) -> Result<(), WarehouseError> {
    connection.execute_batch("BEGIN TRANSACTION")?;
    let result = (|| -> Result<(), WarehouseError> {
        let mut statement = connection.prepare(INSERT_TRADE)?;
        for observation in chunk {
            statement.execute(params![
                observation.symbol().as_str(),
                observation.timestamp().unix_micros(),
                observation.price(),
                observation.volume(),
            ])?;
        }
        Ok(())
    })();

    finalize_transaction(connection, result)
}

fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

/// Epoch-aligned bucketing: last trade price by `(ts_us, seq)`, summed volume.
///
/// Bucket width and limit come from typed values and are inlined; the symbol
/// and window bounds are bound parameters.
fn bucket_query_sql(descriptor: &QueryDescriptor) -> String {
    let width = descriptor.interval.micros();
    let limit = descriptor
        .limit
        .map(|limit| format!("LIMIT {limit}"))
        .unwrap_or_default();

    format!(
        r#"
WITH bucketed AS (
    SELECT
        ts_us - (((ts_us % {width}) + {width}) % {width}) AS bucket_us,
        ts_us,
        seq,
        price,
        volume
    FROM trades
    WHERE symbol = ? AND ts_us BETWEEN ? AND ?
),
ranked AS (
    SELECT
        bucket_us,
        price,
        volume,
        ROW_NUMBER() OVER (PARTITION BY bucket_us ORDER BY ts_us DESC, seq DESC) AS rn
    FROM bucketed
)
SELECT
    bucket_us,
    MAX(CASE WHEN rn = 1 THEN price END) AS price,
    CAST(SUM(volume) AS BIGINT) AS volume
FROM ranked
GROUP BY bucket_us
ORDER BY bucket_us DESC
{limit}
"#
    )
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn resolve_tickstore_home() -> PathBuf {
    if let Some(path) = env::var_os("TICKSTORE_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".tickstore");
    }

    PathBuf::from(".tickstore")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use tempfile::tempdir;
    use tickstore_core::{Interval, TimeWindow};

    fn open(temp: &tempfile::TempDir, write_chunk_size: usize) -> Warehouse {
        let tickstore_home = temp.path().join("tickstore-home");
        Warehouse::open(WarehouseConfig {
            db_path: tickstore_home.join("tickstore.duckdb"),
            tickstore_home,
            max_pool_size: 2,
            write_chunk_size,
        })
        .expect("warehouse open")
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(30))
    }

    fn observation(symbol: &str, price: f64, volume: i64, ts: &str) -> Observation {
        Observation::new(
            Symbol::parse(symbol).expect("symbol"),
            price,
            volume,
            UtcDateTime::parse(ts).expect("timestamp"),
        )
        .expect("observation")
    }

    fn descriptor(interval: Interval, start: &str, end: &str) -> QueryDescriptor {
        QueryDescriptor::new(
            Symbol::parse("AAPL").expect("symbol"),
            TimeWindow::new(
                UtcDateTime::parse(start).expect("start"),
                UtcDateTime::parse(end).expect("end"),
            )
            .expect("window"),
            interval,
        )
    }

    #[test]
    fn initializes_trade_tables() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open(&temp, DEFAULT_WRITE_CHUNK_SIZE);
        let connection = warehouse.manager.acquire().expect("acquire");
        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name IN ('trades', 'ingest_log')",
                [],
                |row| row.get(0),
            )
            .expect("query");
        assert_eq!(count, 2);
    }

    #[test]
    fn reopening_keeps_data() {
        let temp = tempdir().expect("tempdir");
        {
            let warehouse = open(&temp, DEFAULT_WRITE_CHUNK_SIZE);
            warehouse
                .write(&observation("AAPL", 1.0, 1, "2024-05-01T00:00:00Z"), deadline())
                .expect("write");
        }
        let warehouse = open(&temp, DEFAULT_WRITE_CHUNK_SIZE);
        assert_eq!(warehouse.list_symbols(deadline()).expect("symbols").len(), 1);
    }

    #[test]
    fn buckets_in_sql_with_last_price_and_summed_volume() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open(&temp, DEFAULT_WRITE_CHUNK_SIZE);
        warehouse
            .write_batch(
                &[
                    observation("AAPL", 100.0, 10, "2024-05-01T00:01:00Z"),
                    observation("AAPL", 101.0, 5, "2024-05-01T00:03:00Z"),
                    observation("AAPL", 102.0, 15, "2024-05-01T00:04:59Z"),
                    observation("AAPL", 110.0, 1, "2024-05-01T00:05:00Z"),
                    observation("MSFT", 400.0, 9, "2024-05-01T00:02:00Z"),
                ],
                deadline(),
            )
            .expect("write");

        let rows = warehouse
            .query_rows(
                &descriptor(Interval::FiveMinutes, "2024-05-01T00:00:00Z", "2024-05-01T00:09:59Z"),
                deadline(),
            )
            .expect("query");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp.format_rfc3339(), "2024-05-01T00:00:00Z");
        assert_eq!(rows[0].price, 102.0);
        assert_eq!(rows[0].volume, 30);
        assert_eq!(rows[1].price, 110.0);
    }

    #[test]
    fn equal_timestamps_resolve_by_insertion_order() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open(&temp, DEFAULT_WRITE_CHUNK_SIZE);
        warehouse
            .write_batch(
                &[
                    observation("AAPL", 1.0, 1, "2024-05-01T00:00:00Z"),
                    observation("AAPL", 2.0, 1, "2024-05-01T00:00:00Z"),
                ],
                deadline(),
            )
            .expect("write");

        let rows = warehouse
            .query_rows(
                &descriptor(Interval::OneMinute, "2024-05-01T00:00:00Z", "2024-05-01T00:00:00Z"),
                deadline(),
            )
            .expect("query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 2.0);
        assert_eq!(rows[0].volume, 2);
    }

    #[test]
    fn limit_keeps_most_recent_buckets_ascending() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open(&temp, DEFAULT_WRITE_CHUNK_SIZE);
        let batch: Vec<Observation> = (0..6)
            .map(|second| {
                observation(
                    "AAPL",
                    f64::from(second) + 1.0,
                    1,
                    &format!("2024-05-01T00:00:0{second}Z"),
                )
            })
            .collect();
        warehouse.write_batch(&batch, deadline()).expect("write");

        let rows = warehouse
            .query_rows(
                &descriptor(Interval::OneSecond, "2024-05-01T00:00:00Z", "2024-05-01T00:01:00Z")
                    .with_limit(3),
                deadline(),
            )
            .expect("query");
        let prices: Vec<f64> = rows.iter().map(|row| row.price).collect();
        assert_eq!(prices, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn batches_are_split_into_sub_batches_and_logged() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open(&temp, 2);
        let batch: Vec<Observation> = (0..5)
            .map(|second| {
                observation("AAPL", 1.0, 1, &format!("2024-05-01T00:00:0{second}Z"))
            })
            .collect();

        let report = warehouse.write_batch(&batch, deadline()).expect("write");
        assert_eq!(report, WriteReport::all_accepted(5));

        let log = warehouse.recent_ingest_log(10).expect("log");
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].accepted, 5);
        assert_eq!(log[0].status, "ok");
    }

    #[test]
    fn expired_deadline_fails_before_any_write() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open(&temp, DEFAULT_WRITE_CHUNK_SIZE);
        let err = warehouse
            .write_batch(
                &[observation("AAPL", 1.0, 1, "2024-05-01T00:00:00Z")],
                Deadline::after(Duration::ZERO),
            )
            .expect_err("expired");
        assert_eq!(err.kind(), StoreErrorKind::Unavailable);
        assert!(warehouse.list_symbols(deadline()).expect("symbols").is_empty());
    }

    #[test]
    fn ping_succeeds_on_open_database() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open(&temp, DEFAULT_WRITE_CHUNK_SIZE);
        assert!(warehouse.ping(deadline()));
        assert!(!warehouse.ping(Deadline::after(Duration::ZERO)));
    }

    #[test]
    fn deadline_errors_are_always_unavailable() {
        let error = WarehouseError::DeadlineExceeded { operation: "query" };
        assert_eq!(
            error.into_store_error(StoreErrorKind::QueryFailed).kind(),
            StoreErrorKind::Unavailable
        );
    }

    #[test]
    fn connection_errors_are_always_unavailable() {
        for kind in [StoreErrorKind::QueryFailed, StoreErrorKind::WriteRejected] {
            let error = WarehouseError::Connection(::duckdb::Error::QueryReturnedNoRows);
            assert_eq!(error.into_store_error(kind).kind(), StoreErrorKind::Unavailable);
        }

        let engine = WarehouseError::DuckDb(::duckdb::Error::QueryReturnedNoRows);
        assert_eq!(
            engine.into_store_error(StoreErrorKind::QueryFailed).kind(),
            StoreErrorKind::QueryFailed
        );
    }

    #[test]
    fn failed_sub_batch_rejects_only_its_own_indices() {
        let temp = tempdir().expect("tempdir");
        let warehouse = open(&temp, 2);
        {
            let connection = warehouse.manager.acquire().expect("acquire");
            connection
                .execute_batch(
                    r#"
DROP INDEX IF EXISTS idx_trades_symbol_ts;
DROP TABLE trades;
CREATE TABLE trades (
    symbol TEXT NOT NULL,
    ts_us BIGINT NOT NULL,
    price DOUBLE NOT NULL CHECK (price < 500),
    volume BIGINT NOT NULL,
    seq BIGINT NOT NULL DEFAULT nextval('trades_seq'),
    ingested_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
                )
                .expect("recreate trades");
        }

        let batch = [
            observation("AAPL", 100.0, 1, "2024-05-01T00:00:00Z"),
            observation("AAPL", 101.0, 1, "2024-05-01T00:00:01Z"),
            observation("AAPL", 102.0, 1, "2024-05-01T00:00:02Z"),
            observation("AAPL", 600.0, 1, "2024-05-01T00:00:03Z"),
            observation("AAPL", 103.0, 1, "2024-05-01T00:00:04Z"),
        ];
        let report = warehouse.write_batch(&batch, deadline()).expect("write");

        assert_eq!(report.accepted, 3);
        let rejected: Vec<usize> = report.rejected.iter().map(|point| point.index).collect();
        assert_eq!(rejected, [2, 3]);
        assert!(!report.is_complete());

        let rows = warehouse
            .query_rows(
                &descriptor(Interval::OneSecond, "2024-05-01T00:00:00Z", "2024-05-01T00:00:59Z"),
                deadline(),
            )
            .expect("query");
        let prices: Vec<f64> = rows.iter().map(|row| row.price).collect();
        assert_eq!(prices, [100.0, 101.0, 103.0]);

        let log = warehouse.recent_ingest_log(1).expect("log");
        assert_eq!(log[0].status, "partial");
        assert_eq!(log[0].accepted, 3);
        assert_eq!(log[0].rejected, 2);
    }

    #[test]
    fn deadline_between_sub_batches_rejects_the_remainder() {
        let batch: Vec<Observation> = (0..5)
            .map(|second| observation("AAPL", 1.0, 1, &format!("2024-05-01T00:00:0{second}Z")))
            .collect();
        let mut checks = 0;
        let mut written = Vec::new();

        let report = write_chunks(
            &batch,
            2,
            || {
                checks += 1;
                checks > 1
            },
            |chunk| {
                written.push(chunk.len());
                Ok(())
            },
        )
        .expect("first chunk attempted");

        assert_eq!(written, [2]);
        assert_eq!(report.accepted, 2);
        let rejected: Vec<usize> = report.rejected.iter().map(|point| point.index).collect();
        assert_eq!(rejected, [2, 3, 4]);
        assert!(report.rejected[0].reason.contains("deadline"));
    }
}
