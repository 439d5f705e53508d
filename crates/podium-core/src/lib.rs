// crates/podium-core/src/lib.rs
// ============================================================================
// Module: Podium Core
// Description: Domain model and reconciliation engine for the Podium leaderboard.
// Purpose: Provide the storage-agnostic leaderboard protocol shared by all hosts.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Podium keeps one leaderboard entry per player name and reconciles every
//! submission with a maximum-score policy: a new name creates an entry, a
//! higher score replaces the stored one, and an equal or lower score leaves
//! the store untouched. This crate defines the domain types, the pure
//! reconciliation policy, the store contract, an in-memory reference store,
//! and the service that ties them together.
//!
//! The crate performs no I/O and never reads wall-clock time on its own;
//! hosts supply timestamps through [`Clock`] or explicit arguments.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::core::entry::EntryId;
pub use crate::core::entry::LeaderboardEntry;
pub use crate::core::name::MAX_NAME_BYTES;
pub use crate::core::name::NameError;
pub use crate::core::name::PlayerName;
pub use crate::core::time::Clock;
pub use crate::core::time::SystemClock;
pub use crate::core::time::TimeError;
pub use crate::core::time::Timestamp;
pub use crate::interfaces::LeaderboardStore;
pub use crate::interfaces::SharedLeaderboardStore;
pub use crate::interfaces::StoreError;
pub use crate::interfaces::UpsertOutcome;
pub use crate::interfaces::memory::InMemoryLeaderboardStore;
pub use crate::runtime::reconcile::Reconciliation;
pub use crate::runtime::reconcile::reconcile;
pub use crate::runtime::service::LeaderboardError;
pub use crate::runtime::service::LeaderboardService;
pub use crate::runtime::service::SubmissionOutcome;
pub use crate::runtime::service::SubmissionReceipt;
