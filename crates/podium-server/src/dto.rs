// crates/podium-server/src/dto.rs
// ============================================================================
// Module: API Wire Types
// Description: JSON request and response bodies for the leaderboard API.
// Purpose: Keep the HTTP wire contract separate from domain types.
// Dependencies: podium-core, serde, tracing
// ============================================================================

//! ## Overview
//! Request bodies tolerate unknown fields so game clients can attach extra
//! metadata without breaking older servers. Response bodies are flat JSON
//! objects with timestamps rendered as RFC 3339 strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use podium_core::LeaderboardEntry;
use podium_core::SubmissionReceipt;

use crate::error::ApiError;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Body of `POST /leaderboard/submit`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    /// Raw player name as typed by the player.
    pub name: String,
    /// Claimed score for this run.
    pub score: i64,
}

/// Query parameters of `GET /leaderboard/top`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TopParams {
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// One leaderboard row in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    /// Store-assigned identifier.
    pub id: u64,
    /// Normalized player name.
    pub name: String,
    /// Best score recorded for the name.
    pub score: i64,
    /// RFC 3339 time of the last accepted write.
    pub timestamp: String,
}

impl EntryResponse {
    /// Renders a domain entry for the wire.
    ///
    /// # Errors
    /// Returns [`ApiError::Internal`] when the stored timestamp cannot be
    /// formatted, which signals store corruption rather than bad input.
    pub fn from_entry(entry: LeaderboardEntry) -> Result<Self, ApiError> {
        let timestamp = entry.submitted_at.to_rfc3339().map_err(|err| {
            tracing::error!(error = %err, "stored timestamp failed to format");
            ApiError::Internal
        })?;
        Ok(Self {
            id: entry.id.get(),
            name: entry.name.into_string(),
            score: entry.score,
            timestamp,
        })
    }
}

/// Body returned by `POST /leaderboard/submit`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    /// Store-assigned identifier of the authoritative entry.
    pub id: u64,
    /// Normalized player name.
    pub name: String,
    /// Best score recorded for the name after reconciliation.
    pub score: i64,
    /// RFC 3339 time of the last accepted write.
    pub timestamp: String,
    /// Whether this submission changed stored state.
    pub updated: bool,
}

impl SubmitResponse {
    /// Renders a submission receipt for the wire.
    ///
    /// # Errors
    /// Returns [`ApiError::Internal`] when the entry timestamp cannot be
    /// formatted.
    pub fn from_receipt(receipt: SubmissionReceipt) -> Result<Self, ApiError> {
        let updated = receipt.mutated();
        let entry = EntryResponse::from_entry(receipt.entry)?;
        Ok(Self {
            id: entry.id,
            name: entry.name,
            score: entry.score,
            timestamp: entry.timestamp,
            updated,
        })
    }
}

/// Body returned by `GET /leaderboard/check/{name}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheckResponse {
    /// Whether an entry exists for the normalized name.
    pub exists: bool,
}

/// Body returned by the health and readiness probes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusResponse {
    /// Probe verdict label.
    pub status: &'static str,
}

/// Error body shared by every non-2xx API response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
}
