// crates/podium-core/src/core/name.rs
// ============================================================================
// Module: Podium Player Names
// Description: Normalized player name newtype for leaderboard entries.
// Purpose: Enforce trim-only normalization and length bounds at construction.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Player names identify leaderboard entries. Normalization trims leading and
//! trailing whitespace and nothing else: interior whitespace and letter case
//! are preserved, so `"Alice"` and `"alice"` are distinct players.
//! Construction rejects names that are empty after trimming or that exceed
//! the storage bound, so a [`PlayerName`] value is always storable as-is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum byte length of a player name after trimming.
pub const MAX_NAME_BYTES: usize = 255;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Player name validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Name is empty after trimming.
    #[error("player name is empty after trimming")]
    Empty,
    /// Name exceeds the maximum stored length.
    #[error("player name exceeds {max} bytes after trimming: {actual}")]
    TooLong {
        /// Maximum allowed byte length.
        max: usize,
        /// Actual byte length after trimming.
        actual: usize,
    },
}

// ============================================================================
// SECTION: Player Name
// ============================================================================

/// Normalized player name.
///
/// # Invariants
/// - The wrapped string is the trimmed form; raw input is never stored.
/// - Never empty; at most [`MAX_NAME_BYTES`] bytes.
/// - No case folding is applied; equality is byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Parses a raw name into its normalized form.
    ///
    /// # Errors
    ///
    /// Returns [`NameError`] when the trimmed name is empty or too long.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        if trimmed.len() > MAX_NAME_BYTES {
            return Err(NameError::TooLong { max: MAX_NAME_BYTES, actual: trimmed.len() });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the normalized name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name and returns the normalized string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for PlayerName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PlayerName> for String {
    fn from(value: PlayerName) -> Self {
        value.0
    }
}
