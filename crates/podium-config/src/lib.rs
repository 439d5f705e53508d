// crates/podium-config/src/lib.rs
// ============================================================================
// Module: Podium Config
// Description: Configuration model, loading guards, and validation.
// Purpose: Provide one validated configuration surface for all Podium hosts.
// Dependencies: podium-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is read from a TOML file (`podium.toml` by default, override
//! via `PODIUM_CONFIG` or an explicit path), deserialized with serde defaults,
//! and checked by [`PodiumConfig::validate`]. Loading is strict and fail
//! closed: oversized files, non-UTF-8 content, and overlong paths are rejected
//! before parsing. Environment overrides (`PODIUM_PORT`, `PODIUM_STORE_PATH`)
//! are applied explicitly by hosts, never implicitly during load.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::config::ConfigError;
pub use crate::config::ENV_CONFIG_PATH;
pub use crate::config::ENV_PORT;
pub use crate::config::ENV_STORE_PATH;
pub use crate::config::EnvOverrides;
pub use crate::config::LeaderboardStoreType;
pub use crate::config::LimitsConfig;
pub use crate::config::PodiumConfig;
pub use crate::config::ServerConfig;
pub use crate::config::StoreConfig;
