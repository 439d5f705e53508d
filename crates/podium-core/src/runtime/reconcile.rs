// crates/podium-core/src/runtime/reconcile.rs
// ============================================================================
// Module: Podium Score Reconciliation
// Description: Pure maximum-score reconciliation policy.
// Purpose: Decide what a submission does to stored state, free of storage.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Reconciliation is the single rule of the leaderboard: keep the highest
//! score ever submitted for each name. The decision is a pure function of
//! the stored score and the submitted score, so stores can apply it under
//! their own atomicity mechanism and tests can exercise it exhaustively.
//! Equal scores keep the stored entry, which preserves the original write
//! time and makes resubmissions idempotent.

// ============================================================================
// SECTION: Reconciliation
// ============================================================================

/// Decision for a submitted score against the stored score for the same name.
///
/// # Invariants
/// - Variants are exhaustive; every submission maps to exactly one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// No entry exists for the name; insert a new one.
    Insert,
    /// The submission beats the stored score; replace score and write time.
    Replace,
    /// The stored score is equal or higher; keep the entry untouched.
    Keep,
}

/// Decides how a submission reconciles against the stored score.
#[must_use]
pub const fn reconcile(existing: Option<i64>, submitted: i64) -> Reconciliation {
    match existing {
        None => Reconciliation::Insert,
        Some(current) => {
            if submitted > current {
                Reconciliation::Replace
            } else {
                Reconciliation::Keep
            }
        }
    }
}
