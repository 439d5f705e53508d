// crates/podium-core/src/runtime/service.rs
// ============================================================================
// Module: Podium Leaderboard Service
// Description: Submission, query, and existence operations over a store.
// Purpose: Apply the reconciliation policy with validated inputs and
//          integrity-checked results.
// Dependencies: crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! The leaderboard service is the single entry point hosts use. It
//! normalizes player names before any store access, delegates the
//! compare-and-write to the store's atomic upsert, and classifies the result
//! into a submission receipt. Results coming back from the store are checked
//! against the leaderboard invariants; a failed check surfaces as an
//! invariant error rather than silently serving impossible state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use thiserror::Error;

use crate::core::entry::LeaderboardEntry;
use crate::core::name::PlayerName;
use crate::core::time::Timestamp;
use crate::interfaces::LeaderboardStore;
use crate::interfaces::StoreError;
use crate::interfaces::UpsertOutcome;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Leaderboard operation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling; hosts map them to
///   transport-level failures without inspecting message text.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Submission or query input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Submission conflicts with existing state. Reserved for first-accepted
    /// submission policies; the maximum-score policy never produces it.
    #[error("conflicting submission: {0}")]
    Conflict(String),
    /// Store failure propagated unchanged in kind.
    #[error("leaderboard store failure: {0}")]
    Store(#[from] StoreError),
    /// The store returned state that violates a leaderboard invariant.
    #[error("leaderboard invariant violated: {0}")]
    Invariant(String),
}

// ============================================================================
// SECTION: Submission Receipt
// ============================================================================

/// Classification of what a submission did to stored state.
///
/// # Invariants
/// - `Created` and `Updated` correspond to exactly one store mutation;
///   `Unchanged` corresponds to none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// First submission for the name created a new entry.
    Created,
    /// The submission beat the stored score and replaced it.
    Updated {
        /// Score that was replaced.
        previous_score: i64,
    },
    /// The stored score was equal or higher; nothing changed.
    Unchanged,
}

/// Result of a submission: the authoritative entry plus its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Entry as persisted after the submission.
    pub entry: LeaderboardEntry,
    /// What the submission did.
    pub outcome: SubmissionOutcome,
}

impl SubmissionReceipt {
    /// Reports whether the submission mutated the store.
    #[must_use]
    pub const fn mutated(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Created | SubmissionOutcome::Updated { .. })
    }
}

// ============================================================================
// SECTION: Leaderboard Service
// ============================================================================

/// Leaderboard operations over a backing store.
#[derive(Debug)]
pub struct LeaderboardService<S> {
    /// Backing store.
    store: S,
}

impl<S: LeaderboardStore> LeaderboardService<S> {
    /// Creates a service over the given store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Submits a score for a player name.
    ///
    /// The name is normalized before any store access; the compare-and-write
    /// against the stored score happens atomically inside the store. At most
    /// one entry ever exists per normalized name, the stored score only
    /// moves upward, and an equal or lower submission leaves the entry
    /// byte-for-byte untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::InvalidInput`] when the name fails
    /// validation, [`LeaderboardError::Store`] when the store fails, and
    /// [`LeaderboardError::Invariant`] when the store result contradicts the
    /// leaderboard invariants.
    pub fn submit(
        &self,
        raw_name: &str,
        score: i64,
        now: Timestamp,
    ) -> Result<SubmissionReceipt, LeaderboardError> {
        let name = PlayerName::parse(raw_name)
            .map_err(|err| LeaderboardError::InvalidInput(err.to_string()))?;
        let outcome = self.store.upsert_max(&name, score, now)?;
        let receipt = match outcome {
            UpsertOutcome::Created(entry) => {
                SubmissionReceipt { entry, outcome: SubmissionOutcome::Created }
            }
            UpsertOutcome::Updated { entry, previous_score } => {
                SubmissionReceipt { entry, outcome: SubmissionOutcome::Updated { previous_score } }
            }
            UpsertOutcome::Unchanged(entry) => {
                SubmissionReceipt { entry, outcome: SubmissionOutcome::Unchanged }
            }
        };
        verify_receipt(&name, score, &receipt)?;
        Ok(receipt)
    }

    /// Returns up to `limit` entries ordered by score descending, ties broken
    /// by entry identifier ascending.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::Store`] when the read fails and
    /// [`LeaderboardError::Invariant`] when the page violates ordering or
    /// uniqueness.
    pub fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let entries = self.store.top(limit)?;
        verify_page(limit, &entries)?;
        Ok(entries)
    }

    /// Reports whether an entry exists for the name.
    ///
    /// The answer reflects one point in time and may be stale by the time a
    /// caller acts on it; submission correctness never depends on it.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::InvalidInput`] when the name fails
    /// validation and [`LeaderboardError::Store`] when the read fails.
    pub fn exists(&self, raw_name: &str) -> Result<bool, LeaderboardError> {
        let name = PlayerName::parse(raw_name)
            .map_err(|err| LeaderboardError::InvalidInput(err.to_string()))?;
        Ok(self.store.exists(&name)?)
    }
}

// ============================================================================
// SECTION: Integrity Checks
// ============================================================================

/// Checks a submission receipt against the submission that produced it.
fn verify_receipt(
    name: &PlayerName,
    score: i64,
    receipt: &SubmissionReceipt,
) -> Result<(), LeaderboardError> {
    if receipt.entry.name != *name {
        return Err(LeaderboardError::Invariant(format!(
            "store answered for name '{}' after a submission for '{}'",
            receipt.entry.name, name
        )));
    }
    let consistent = match receipt.outcome {
        SubmissionOutcome::Created | SubmissionOutcome::Updated { .. } => {
            receipt.entry.score == score
        }
        SubmissionOutcome::Unchanged => receipt.entry.score >= score,
    };
    if !consistent {
        return Err(LeaderboardError::Invariant(format!(
            "stored score {} is inconsistent with submitted score {score}",
            receipt.entry.score
        )));
    }
    Ok(())
}

/// Checks a top page for size, ordering, and name uniqueness.
fn verify_page(limit: usize, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
    if entries.len() > limit {
        return Err(LeaderboardError::Invariant(format!(
            "store returned {} entries for a limit of {limit}",
            entries.len()
        )));
    }
    for pair in entries.windows(2) {
        if pair[1].score > pair[0].score {
            return Err(LeaderboardError::Invariant(
                "top page is not ordered by descending score".to_string(),
            ));
        }
    }
    let mut seen: HashSet<&PlayerName> = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(&entry.name) {
            return Err(LeaderboardError::Invariant(format!(
                "top page contains duplicate entries for name '{}'",
                entry.name
            )));
        }
    }
    Ok(())
}
