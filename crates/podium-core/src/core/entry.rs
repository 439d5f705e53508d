// crates/podium-core/src/core/entry.rs
// ============================================================================
// Module: Podium Leaderboard Entries
// Description: Entry identifier and leaderboard entry record.
// Purpose: Provide the canonical persisted shape of a leaderboard row.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A leaderboard entry is the unit of persistence: one row per normalized
//! player name holding the best score seen so far and the time of the last
//! accepted write. Identifiers are assigned by the store on first insert and
//! never change afterwards, even when the score is replaced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;

use crate::core::name::PlayerName;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Entry Identifier
// ============================================================================

/// Store-assigned leaderboard entry identifier.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based).
/// - Stable for the lifetime of the entry; score updates never reassign it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(NonZeroU64);

impl EntryId {
    /// Creates a new entry identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates an entry identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

// ============================================================================
// SECTION: Leaderboard Entry
// ============================================================================

/// Persisted leaderboard entry for one player name.
///
/// # Invariants
/// - `name` is unique across the leaderboard (case-sensitive, trimmed form).
/// - `score` is the highest score ever accepted for `name`.
/// - `submitted_at` is the server-assigned time of the last accepted write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// Normalized player name.
    pub name: PlayerName,
    /// Best score seen for the name.
    pub score: i64,
    /// Time of the last accepted write.
    pub submitted_at: Timestamp,
}
