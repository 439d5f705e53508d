// crates/podium-core/src/interfaces/mod.rs
// ============================================================================
// Module: Podium Interfaces
// Description: Backend-agnostic storage contract for leaderboard entries.
// Purpose: Define the store surface used by the Podium runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The store contract is the seam between the reconciliation engine and
//! persistence. Implementations must provide an atomic conditional upsert:
//! the compare-and-write of a submission against the stored score happens as
//! one indivisible operation, so concurrent submissions for the same name can
//! neither create duplicate rows nor overwrite a higher score with a lower
//! one. Read operations observe fully applied writes only.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod memory;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::entry::LeaderboardEntry;
use crate::core::name::PlayerName;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Leaderboard store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("leaderboard store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("leaderboard store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("leaderboard store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("leaderboard store invalid data: {0}")]
    Invalid(String),
    /// Store is temporarily unavailable (busy, locked, or timed out).
    #[error("leaderboard store unavailable: {0}")]
    Unavailable(String),
    /// Store reported an error.
    #[error("leaderboard store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Upsert Outcome
// ============================================================================

/// Result of the atomic conditional upsert.
///
/// # Invariants
/// - Each variant carries the entry as persisted after the operation.
/// - `Updated` carries the score that was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No entry existed for the name; a new one was inserted.
    Created(LeaderboardEntry),
    /// The submitted score was higher; the stored entry was rewritten.
    Updated {
        /// Entry as persisted after the write.
        entry: LeaderboardEntry,
        /// Score that was replaced.
        previous_score: i64,
    },
    /// An entry with an equal or higher score already existed; no write.
    Unchanged(LeaderboardEntry),
}

// ============================================================================
// SECTION: Leaderboard Store
// ============================================================================

/// Leaderboard store for persistence.
pub trait LeaderboardStore: Send + Sync {
    /// Atomically reconciles a submission against the stored entry for the
    /// name: inserts when absent, replaces when the submitted score is
    /// strictly higher, and otherwise leaves the entry untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails or the store is
    /// unavailable.
    fn upsert_max(
        &self,
        name: &PlayerName,
        score: i64,
        submitted_at: Timestamp,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Returns up to `limit` entries ordered by score descending, ties broken
    /// by entry identifier ascending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// Reports whether an entry exists for the name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn exists(&self, name: &PlayerName) -> Result<bool, StoreError>;

    /// Reports store readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Handle
// ============================================================================

/// Cloneable shared handle to a leaderboard store trait object.
#[derive(Clone)]
pub struct SharedLeaderboardStore {
    /// Wrapped store implementation.
    inner: Arc<dyn LeaderboardStore>,
}

impl SharedLeaderboardStore {
    /// Wraps an existing shared store trait object.
    #[must_use]
    pub fn new(store: Arc<dyn LeaderboardStore>) -> Self {
        Self { inner: store }
    }

    /// Wraps a concrete store implementation.
    #[must_use]
    pub fn from_store(store: impl LeaderboardStore + 'static) -> Self {
        Self { inner: Arc::new(store) }
    }
}

impl fmt::Debug for SharedLeaderboardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedLeaderboardStore")
    }
}

impl LeaderboardStore for SharedLeaderboardStore {
    fn upsert_max(
        &self,
        name: &PlayerName,
        score: i64,
        submitted_at: Timestamp,
    ) -> Result<UpsertOutcome, StoreError> {
        self.inner.upsert_max(name, score, submitted_at)
    }

    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.inner.top(limit)
    }

    fn exists(&self, name: &PlayerName) -> Result<bool, StoreError> {
        self.inner.exists(name)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.inner.readiness()
    }
}
