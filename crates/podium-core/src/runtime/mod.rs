// crates/podium-core/src/runtime/mod.rs
// ============================================================================
// Module: Podium Runtime
// Description: Reconciliation policy and the leaderboard service.
// Purpose: Group the behavior layered on top of the domain model.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime ties the domain model to storage: a pure reconciliation
//! policy decides what a submission does to stored state, and the
//! leaderboard service applies that policy through a store's atomic upsert
//! while validating inputs and checking result integrity.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod reconcile;
pub mod service;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use reconcile::Reconciliation;
pub use reconcile::reconcile;
pub use service::LeaderboardError;
pub use service::LeaderboardService;
pub use service::SubmissionOutcome;
pub use service::SubmissionReceipt;
