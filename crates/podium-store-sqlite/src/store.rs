// crates/podium-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Leaderboard Store
// Description: Durable LeaderboardStore backed by SQLite WAL.
// Purpose: Persist leaderboard entries with atomic maximum-score upserts.
// Dependencies: podium-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`LeaderboardStore`] using `SQLite`. The
//! maximum-score policy runs inside the database as a single conditional
//! upsert, so the compare-and-write against the stored score is atomic even
//! under concurrent submissions. Rows read back from disk are re-validated
//! before they are returned; loads fail closed on corruption.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Instant;

use podium_core::EntryId;
use podium_core::LeaderboardEntry;
use podium_core::LeaderboardStore;
use podium_core::PlayerName;
use podium_core::Reconciliation;
use podium_core::StoreError;
use podium_core::Timestamp;
use podium_core::UpsertOutcome;
use podium_core::reconcile;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Millisecond bucket boundaries used for lightweight store perf snapshots.
const PERF_BUCKETS_MS: [u64; 10] = [1, 2, 5, 10, 20, 50, 100, 250, 500, 1_000];
/// Microsecond bucket boundaries used for read-pool lock wait histograms.
const READ_WAIT_TIME_BUCKETS_US: [u64; 10] =
    [100, 250, 500, 1_000, 2_500, 5_000, 10_000, 25_000, 50_000, 100_000];

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` leaderboard store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
/// - `read_pool_size` must be greater than zero.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Number of read-only connections used for read path isolation.
    #[serde(default = "default_read_pool_size")]
    pub read_pool_size: usize,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default read connection pool size.
const fn default_read_pool_size() -> usize {
    4
}

/// Validates runtime limits in the store configuration.
fn validate_runtime_limits(config: &SqliteStoreConfig) -> Result<(), SqliteStoreError> {
    if config.read_pool_size == 0 {
        return Err(SqliteStoreError::Invalid(
            "read_pool_size must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding full row payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Busy timeout expiry or lock contention.
    #[error("sqlite store unavailable: {0}")]
    Unavailable(String),
    /// Store corruption or failed row validation.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Unavailable(message) => Self::Unavailable(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed leaderboard store with WAL support.
///
/// # Invariants
/// - Writes are serialized through a single mutex-guarded connection.
/// - The compare-and-write of the maximum-score policy happens in one SQL
///   statement inside one transaction.
/// - Rows are re-validated after load before they leave the store.
#[derive(Clone)]
pub struct SqliteLeaderboardStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared writer connection guarded by a mutex.
    write_connection: Arc<Mutex<Connection>>,
    /// Read-only connection pool used for read path isolation under WAL.
    read_connections: Arc<Vec<Mutex<Connection>>>,
    /// Round-robin cursor for read connection selection.
    read_cursor: Arc<AtomicUsize>,
    /// Lightweight operation stats used for local performance diagnostics.
    perf_stats: Arc<Mutex<SqlitePerfStats>>,
}

/// Store-level operation counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqliteStoreOpCounts {
    /// Conditional upsert operations.
    pub upsert: u64,
    /// Ranked page reads (`top`).
    pub top: u64,
    /// Name existence probes.
    pub exists: u64,
}

/// Classified database error counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqliteDbErrorCounts {
    /// Count of `busy` database errors.
    pub busy: u64,
    /// Count of `locked` database errors.
    pub locked: u64,
    /// Count of all other database errors.
    pub other: u64,
}

/// Snapshot of lightweight `SQLite` perf/contention stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlitePerfStatsSnapshot {
    /// Per-class operation counts.
    pub op_counts: SqliteStoreOpCounts,
    /// Operation latencies represented as `<= upper_bound` buckets plus overflow slot.
    pub latency_buckets_ms: Vec<u64>,
    /// Upsert-operation histogram counts (length = `latency_buckets_ms.len() + 1`).
    pub upsert_latency_histogram: Vec<u64>,
    /// Top-operation histogram counts (length = `latency_buckets_ms.len() + 1`).
    pub top_latency_histogram: Vec<u64>,
    /// Exists-operation histogram counts (length = `latency_buckets_ms.len() + 1`).
    pub exists_latency_histogram: Vec<u64>,
    /// Cumulative upsert duration in milliseconds.
    pub upsert_total_duration_ms: u64,
    /// Cumulative top duration in milliseconds.
    pub top_total_duration_ms: u64,
    /// Cumulative exists duration in milliseconds.
    pub exists_total_duration_ms: u64,
    /// Read-pool lock wait bucket boundaries in microseconds.
    pub read_wait_buckets_us: Vec<u64>,
    /// Read-pool lock wait histogram counts.
    pub read_wait_histogram_us: Vec<u64>,
    /// Read-pool lock wait p50 estimate in microseconds.
    pub read_wait_p50_us: u64,
    /// Read-pool lock wait p95 estimate in microseconds.
    pub read_wait_p95_us: u64,
    /// Database error counters.
    pub db_errors: SqliteDbErrorCounts,
}

/// Internal mutable perf counters before snapshot serialization.
#[derive(Debug, Default)]
struct SqlitePerfStats {
    /// Per-operation counters.
    op_counts: SqliteStoreOpCounts,
    /// Upsert-operation latency histogram.
    upsert_latency_histogram: [u64; PERF_BUCKETS_MS.len() + 1],
    /// Top-operation latency histogram.
    top_latency_histogram: [u64; PERF_BUCKETS_MS.len() + 1],
    /// Exists-operation latency histogram.
    exists_latency_histogram: [u64; PERF_BUCKETS_MS.len() + 1],
    /// Cumulative upsert duration in milliseconds.
    upsert_total_duration_ms: u64,
    /// Cumulative top duration in milliseconds.
    top_total_duration_ms: u64,
    /// Cumulative exists duration in milliseconds.
    exists_total_duration_ms: u64,
    /// Read-pool lock wait histogram in microseconds.
    read_wait_histogram_us: [u64; READ_WAIT_TIME_BUCKETS_US.len() + 1],
    /// Classified database error counters.
    db_errors: SqliteDbErrorCounts,
}

/// Performance operation class used for histogram/counter updates.
#[derive(Debug, Clone, Copy)]
enum SqlitePerfOp {
    /// Conditional upsert (`upsert_max`).
    Upsert,
    /// Ranked page read (`top`).
    Top,
    /// Name existence probe (`exists`).
    Exists,
}

impl SqliteLeaderboardStore {
    /// Opens an `SQLite`-backed leaderboard store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        validate_runtime_limits(&config)?;
        let mut write_connection = open_connection(&config)?;
        initialize_schema(&mut write_connection)?;
        let mut read_connections = Vec::with_capacity(config.read_pool_size);
        for _ in 0 .. config.read_pool_size {
            let mut read_connection = open_connection(&config)?;
            initialize_schema(&mut read_connection)?;
            read_connections.push(Mutex::new(read_connection));
        }
        Ok(Self {
            config,
            write_connection: Arc::new(Mutex::new(write_connection)),
            read_connections: Arc::new(read_connections),
            read_cursor: Arc::new(AtomicUsize::new(0)),
            perf_stats: Arc::new(Mutex::new(SqlitePerfStats::default())),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Verifies the store can execute a simple SQL statement.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] if the mutex is poisoned or the query fails.
    fn check_connection(&self) -> Result<(), SqliteStoreError> {
        let connection = self.read_connection();
        let wait_started = Instant::now();
        let guard = connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite read mutex poisoned".to_string()))?;
        let wait_us = u64::try_from(wait_started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.record_read_wait(wait_us);
        guard.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)).map_err(db_error)?;
        drop(guard);
        Ok(())
    }

    /// Returns a snapshot of lightweight operation and contention stats.
    #[must_use]
    pub fn perf_stats_snapshot(&self) -> SqlitePerfStatsSnapshot {
        let guard = self.perf_stats.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        SqlitePerfStatsSnapshot {
            op_counts: guard.op_counts.clone(),
            latency_buckets_ms: PERF_BUCKETS_MS.to_vec(),
            upsert_latency_histogram: guard.upsert_latency_histogram.to_vec(),
            top_latency_histogram: guard.top_latency_histogram.to_vec(),
            exists_latency_histogram: guard.exists_latency_histogram.to_vec(),
            upsert_total_duration_ms: guard.upsert_total_duration_ms,
            top_total_duration_ms: guard.top_total_duration_ms,
            exists_total_duration_ms: guard.exists_total_duration_ms,
            read_wait_buckets_us: READ_WAIT_TIME_BUCKETS_US.to_vec(),
            read_wait_histogram_us: guard.read_wait_histogram_us.to_vec(),
            read_wait_p50_us: histogram_percentile(
                &READ_WAIT_TIME_BUCKETS_US,
                &guard.read_wait_histogram_us,
                50,
            ),
            read_wait_p95_us: histogram_percentile(
                &READ_WAIT_TIME_BUCKETS_US,
                &guard.read_wait_histogram_us,
                95,
            ),
            db_errors: guard.db_errors.clone(),
        }
    }

    /// Resets lightweight operation and contention stats to zero.
    pub fn reset_perf_stats(&self) {
        if let Ok(mut guard) = self.perf_stats.lock() {
            *guard = SqlitePerfStats::default();
        }
    }

    /// Records operation timing plus optional DB error classification.
    fn record_store_op(
        &self,
        op: SqlitePerfOp,
        elapsed: std::time::Duration,
        db_error: Option<&str>,
    ) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let bucket_index = histogram_bucket_index(elapsed_ms);
        let Ok(mut stats) = self.perf_stats.lock() else {
            return;
        };
        match op {
            SqlitePerfOp::Upsert => {
                stats.op_counts.upsert = stats.op_counts.upsert.saturating_add(1);
                stats.upsert_total_duration_ms =
                    stats.upsert_total_duration_ms.saturating_add(elapsed_ms);
                if let Some(slot) = stats.upsert_latency_histogram.get_mut(bucket_index) {
                    *slot = slot.saturating_add(1);
                }
            }
            SqlitePerfOp::Top => {
                stats.op_counts.top = stats.op_counts.top.saturating_add(1);
                stats.top_total_duration_ms =
                    stats.top_total_duration_ms.saturating_add(elapsed_ms);
                if let Some(slot) = stats.top_latency_histogram.get_mut(bucket_index) {
                    *slot = slot.saturating_add(1);
                }
            }
            SqlitePerfOp::Exists => {
                stats.op_counts.exists = stats.op_counts.exists.saturating_add(1);
                stats.exists_total_duration_ms =
                    stats.exists_total_duration_ms.saturating_add(elapsed_ms);
                if let Some(slot) = stats.exists_latency_histogram.get_mut(bucket_index) {
                    *slot = slot.saturating_add(1);
                }
            }
        }
        if let Some(message) = db_error {
            match classify_db_error_message(message) {
                SqliteDbErrorKind::Busy => {
                    stats.db_errors.busy = stats.db_errors.busy.saturating_add(1);
                }
                SqliteDbErrorKind::Locked => {
                    stats.db_errors.locked = stats.db_errors.locked.saturating_add(1);
                }
                SqliteDbErrorKind::Other => {
                    stats.db_errors.other = stats.db_errors.other.saturating_add(1);
                }
            }
        }
    }

    /// Records read-pool lock wait in microseconds.
    fn record_read_wait(&self, wait_us: u64) {
        let bucket = histogram_bucket_index_from_bounds(&READ_WAIT_TIME_BUCKETS_US, wait_us);
        let Ok(mut stats) = self.perf_stats.lock() else {
            return;
        };
        if let Some(slot) = stats.read_wait_histogram_us.get_mut(bucket) {
            *slot = slot.saturating_add(1);
        }
    }

    /// Returns the next read connection using round-robin selection.
    fn read_connection(&self) -> &Mutex<Connection> {
        let len = self.read_connections.len();
        let index = self.read_cursor.fetch_add(1, Ordering::Relaxed) % len;
        &self.read_connections[index]
    }

    /// Runs the conditional upsert and classifies the outcome.
    ///
    /// The pre-image read, the conditional write, and the post-image read all
    /// happen inside one transaction under the write mutex, so the outcome
    /// classification cannot race another writer.
    fn upsert_entry(
        &self,
        name: &PlayerName,
        score: i64,
        submitted_at: Timestamp,
    ) -> Result<UpsertOutcome, SqliteStoreError> {
        let mut guard = self
            .write_connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("write mutex poisoned".to_string()))?;
        let (previous, row) = {
            let tx = guard.transaction().map_err(db_error)?;
            let previous: Option<i64> = tx
                .query_row(
                    "SELECT score FROM entries WHERE name = ?1",
                    params![name.as_str()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(db_error)?;
            tx.execute(
                "INSERT INTO entries (name, score, submitted_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET score = excluded.score, submitted_at = \
                 excluded.submitted_at WHERE excluded.score > entries.score",
                params![name.as_str(), score, submitted_at.unix_millis()],
            )
            .map_err(db_error)?;
            let row = tx
                .query_row(
                    "SELECT id, name, score, submitted_at FROM entries WHERE name = ?1",
                    params![name.as_str()],
                    map_entry_row,
                )
                .map_err(db_error)?;
            tx.commit().map_err(db_error)?;
            (previous, row)
        };
        drop(guard);
        let entry = build_entry(row)?;
        match reconcile(previous, score) {
            Reconciliation::Insert => Ok(UpsertOutcome::Created(entry)),
            Reconciliation::Replace => {
                let Some(previous_score) = previous else {
                    return Err(SqliteStoreError::Corrupt(
                        "replace outcome without a stored score".to_string(),
                    ));
                };
                Ok(UpsertOutcome::Updated {
                    entry,
                    previous_score,
                })
            }
            Reconciliation::Keep => Ok(UpsertOutcome::Unchanged(entry)),
        }
    }

    /// Reads the ranked page through the read pool.
    fn top_entries(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, SqliteStoreError> {
        let limit = i64::try_from(limit)
            .map_err(|_| SqliteStoreError::Invalid("limit too large".to_string()))?;
        let connection = self.read_connection();
        let wait_started = Instant::now();
        let guard = connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite read mutex poisoned".to_string()))?;
        let wait_us = u64::try_from(wait_started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.record_read_wait(wait_us);
        let rows = {
            let mut stmt = guard
                .prepare(
                    "SELECT id, name, score, submitted_at FROM entries ORDER BY score DESC, id \
                     ASC LIMIT ?1",
                )
                .map_err(db_error)?;
            let mapped = stmt.query_map(params![limit], map_entry_row).map_err(db_error)?;
            let mut rows = Vec::new();
            for row in mapped {
                rows.push(row.map_err(db_error)?);
            }
            rows
        };
        drop(guard);
        rows.into_iter().map(build_entry).collect()
    }

    /// Probes for an entry with the given name through the read pool.
    fn name_exists(&self, name: &PlayerName) -> Result<bool, SqliteStoreError> {
        let connection = self.read_connection();
        let wait_started = Instant::now();
        let guard = connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite read mutex poisoned".to_string()))?;
        let wait_us = u64::try_from(wait_started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.record_read_wait(wait_us);
        let row: Option<i64> = guard
            .query_row(
                "SELECT 1 FROM entries WHERE name = ?1 LIMIT 1",
                params![name.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        drop(guard);
        Ok(row.is_some())
    }
}

impl LeaderboardStore for SqliteLeaderboardStore {
    fn upsert_max(
        &self,
        name: &PlayerName,
        score: i64,
        submitted_at: Timestamp,
    ) -> Result<UpsertOutcome, StoreError> {
        let started = Instant::now();
        let result = self.upsert_entry(name, score, submitted_at);
        self.record_store_op(
            SqlitePerfOp::Upsert,
            started.elapsed(),
            result.as_ref().err().and_then(db_error_message),
        );
        result.map_err(StoreError::from)
    }

    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let started = Instant::now();
        let result = self.top_entries(limit);
        self.record_store_op(
            SqlitePerfOp::Top,
            started.elapsed(),
            result.as_ref().err().and_then(db_error_message),
        );
        result.map_err(StoreError::from)
    }

    fn exists(&self, name: &PlayerName) -> Result<bool, StoreError> {
        let started = Instant::now();
        let result = self.name_exists(name);
        self.record_store_op(
            SqlitePerfOp::Exists,
            started.elapsed(),
            result.as_ref().err().and_then(db_error_message),
        );
        result.map_err(StoreError::from)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.check_connection().map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Classification used when attributing `SQLite` DB error strings.
#[derive(Debug, Clone, Copy)]
enum SqliteDbErrorKind {
    /// Error text indicates busy timeout contention.
    Busy,
    /// Error text indicates lock contention.
    Locked,
    /// Any error not matching busy/locked classifiers.
    Other,
}

/// Returns latency histogram bucket index for millisecond duration.
const fn histogram_bucket_index(duration_ms: u64) -> usize {
    let mut index = 0usize;
    while index < PERF_BUCKETS_MS.len() {
        if duration_ms <= PERF_BUCKETS_MS[index] {
            return index;
        }
        index += 1;
    }
    PERF_BUCKETS_MS.len()
}

/// Maps an `SQLite` failure to a store error, separating contention (busy
/// timeout expiry, lock conflicts) from other engine errors.
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::DatabaseBusy
                || failure.code == ErrorCode::DatabaseLocked =>
        {
            SqliteStoreError::Unavailable(err.to_string())
        }
        _ => SqliteStoreError::Db(err.to_string()),
    }
}

/// Classifies database error text into coarse contention categories.
fn classify_db_error_message(message: &str) -> SqliteDbErrorKind {
    let lower = message.to_ascii_lowercase();
    if lower.contains("busy") {
        SqliteDbErrorKind::Busy
    } else if lower.contains("locked") {
        SqliteDbErrorKind::Locked
    } else {
        SqliteDbErrorKind::Other
    }
}

/// Returns DB error message when a store error variant maps to the engine.
const fn db_error_message(error: &SqliteStoreError) -> Option<&str> {
    match error {
        SqliteStoreError::Db(message) | SqliteStoreError::Unavailable(message) => {
            Some(message.as_str())
        }
        _ => None,
    }
}

/// Returns bucket index for `value` against sorted histogram bounds.
fn histogram_bucket_index_from_bounds(bounds: &[u64], value: u64) -> usize {
    for (idx, upper_bound) in bounds.iter().enumerate() {
        if value <= *upper_bound {
            return idx;
        }
    }
    bounds.len()
}

/// Computes approximate percentile value from bucketed histogram counts.
fn histogram_percentile(bounds: &[u64], counts: &[u64], percentile: u32) -> u64 {
    if percentile == 0 || percentile > 100 || counts.is_empty() || bounds.is_empty() {
        return 0;
    }
    let total = counts.iter().fold(0_u64, |acc, value| acc.saturating_add(*value));
    if total == 0 {
        return 0;
    }
    let rank =
        total.saturating_mul(u64::from(percentile)).saturating_add(99).saturating_div(100).max(1);
    let mut running = 0_u64;
    for (idx, count) in counts.iter().enumerate() {
        running = running.saturating_add(*count);
        if running >= rank {
            return if idx < bounds.len() {
                bounds[idx]
            } else {
                bounds.last().copied().unwrap_or(0)
            };
        }
    }
    bounds.last().copied().unwrap_or(0)
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS entries (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE,
                    score INTEGER NOT NULL,
                    submitted_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_entries_rank
                    ON entries (score DESC, id ASC);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Raw entry row loaded from the entries table.
#[derive(Debug)]
struct EntryRow {
    /// Row identifier.
    id: i64,
    /// Stored player name.
    name: String,
    /// Stored best score.
    score: i64,
    /// Stored write time in unix milliseconds.
    submitted_at: i64,
}

/// Maps a `SQLite` row into an entry row payload.
fn map_entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        id: row.get(0)?,
        name: row.get(1)?,
        score: row.get(2)?,
        submitted_at: row.get(3)?,
    })
}

/// Builds a validated leaderboard entry from stored row data.
fn build_entry(row: EntryRow) -> Result<LeaderboardEntry, SqliteStoreError> {
    let id = u64::try_from(row.id)
        .ok()
        .and_then(EntryId::from_raw)
        .ok_or_else(|| SqliteStoreError::Corrupt(format!("entry id out of range: {}", row.id)))?;
    let name = PlayerName::parse(&row.name)
        .map_err(|err| SqliteStoreError::Corrupt(format!("stored name invalid: {err}")))?;
    if name.as_str() != row.name {
        return Err(SqliteStoreError::Corrupt("stored name is not normalized".to_string()));
    }
    Ok(LeaderboardEntry {
        id,
        name,
        score: row.score,
        submitted_at: Timestamp::from_unix_millis(row.submitted_at),
    })
}
