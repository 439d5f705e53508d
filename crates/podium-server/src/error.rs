// crates/podium-server/src/error.rs
// ============================================================================
// Module: API Errors
// Description: HTTP error mapping for leaderboard API failures.
// Purpose: Translate domain failures into stable status codes and JSON bodies.
// Dependencies: axum, podium-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! Client mistakes surface as 400 or 409 with the offending detail in the
//! body. Store and invariant failures are logged server-side and collapse to
//! an opaque 500 so internal paths and SQL text never reach clients.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use podium_core::LeaderboardError;

use crate::dto::ErrorResponse;
use crate::telemetry::ApiOutcome;

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Wire-facing API failure.
///
/// # Invariants
/// - `Internal` carries no detail; the cause is logged before construction.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request payload or parameters failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Concurrent writes conflicted beyond the retry budget.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal failure with details withheld from the client.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// Returns the HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the telemetry outcome label for this error.
    #[must_use]
    pub const fn outcome(&self) -> ApiOutcome {
        match self {
            Self::InvalidInput(_) => ApiOutcome::InvalidInput,
            Self::Conflict(_) => ApiOutcome::Conflict,
            Self::Internal => ApiOutcome::Error,
        }
    }
}

impl From<LeaderboardError> for ApiError {
    fn from(err: LeaderboardError) -> Self {
        match err {
            LeaderboardError::InvalidInput(message) => Self::InvalidInput(message),
            LeaderboardError::Conflict(message) => Self::Conflict(message),
            LeaderboardError::Store(store_err) => {
                tracing::error!(error = %store_err, "leaderboard store failure");
                Self::Internal
            }
            LeaderboardError::Invariant(message) => {
                tracing::error!(detail = %message, "leaderboard invariant violation");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            Self::InvalidInput(message) | Self::Conflict(message) => message,
            Self::Internal => "internal error".to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
