// crates/podium-core/src/core/mod.rs
// ============================================================================
// Module: Podium Core Domain Model
// Description: Entry, player name, and time types for the leaderboard.
// Purpose: Group the plain domain data types shared across the crate.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Domain data types for the leaderboard: strongly typed entry identifiers,
//! normalized player names, timestamps, and the entry record itself. All
//! types here are plain values with no storage or transport concerns.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod entry;
pub mod name;
pub mod time;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use entry::EntryId;
pub use entry::LeaderboardEntry;
pub use name::MAX_NAME_BYTES;
pub use name::NameError;
pub use name::PlayerName;
pub use time::Clock;
pub use time::SystemClock;
pub use time::TimeError;
pub use time::Timestamp;
