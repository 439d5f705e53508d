// crates/podium-core/src/core/time.rs
// ============================================================================
// Module: Podium Time Model
// Description: Timestamp representation and clock abstraction.
// Purpose: Keep the core deterministic by sourcing time from hosts.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Timestamps record when a leaderboard write was accepted, as unix epoch
//! milliseconds. The core never reads wall-clock time directly; hosts supply
//! timestamps through the [`Clock`] trait or as explicit arguments, which
//! keeps reconciliation replayable in tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Timestamp conversion errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// Timestamp is outside the representable calendar range.
    #[error("timestamp out of range: {0}")]
    OutOfRange(String),
    /// Timestamp could not be rendered.
    #[error("timestamp formatting failed: {0}")]
    Format(String),
}

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Unix-epoch-milliseconds timestamp for leaderboard writes.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads
///   wall-clock time on its own.
/// - No monotonicity is assumed; ordering guarantees belong to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn unix_millis(self) -> i64 {
        self.0
    }

    /// Renders the timestamp as an RFC 3339 UTC string.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] when the value falls outside the calendar range
    /// supported by RFC 3339 or rendering fails.
    pub fn to_rfc3339(self) -> Result<String, TimeError> {
        let nanos = i128::from(self.0).saturating_mul(1_000_000);
        let datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|err| TimeError::OutOfRange(err.to_string()))?;
        datetime.format(&Rfc3339).map_err(|err| TimeError::Format(err.to_string()))
    }
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Time source supplied by hosts.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Timestamp::from_unix_millis(i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
    }
}
