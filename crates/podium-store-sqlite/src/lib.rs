// crates/podium-store-sqlite/src/lib.rs
// ============================================================================
// Module: Podium SQLite Store
// Description: Durable LeaderboardStore backed by SQLite WAL.
// Purpose: Persist leaderboard entries with atomic maximum-score upserts.
// Dependencies: podium-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This crate implements a durable [`podium_core::LeaderboardStore`] on top of
//! `SQLite`. The maximum-score policy is enforced inside the database with a
//! single conditional upsert statement, so concurrent submissions for the same
//! player can never lose a higher score to a lower one.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::store::SqliteDbErrorCounts;
pub use crate::store::SqliteLeaderboardStore;
pub use crate::store::SqlitePerfStatsSnapshot;
pub use crate::store::SqliteStoreConfig;
pub use crate::store::SqliteStoreError;
pub use crate::store::SqliteStoreMode;
pub use crate::store::SqliteStoreOpCounts;
pub use crate::store::SqliteSyncMode;
