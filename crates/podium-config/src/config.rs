// crates/podium-config/src/config.rs
// ============================================================================
// Module: Podium Configuration Model
// Description: TOML-backed configuration with strict load guards.
// Purpose: Define, load, and validate the configuration for all Podium hosts.
// Dependencies: podium-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The configuration has three sections: `[server]` (bind address and static
//! assets), `[store]` (backing store selection and `SQLite` tuning), and
//! `[limits]` (top-query bounds). Every field carries a serde default, so an
//! absent file and an empty file both produce a valid configuration.
//!
//! Loading is fail closed. The config path is bounded before any filesystem
//! access, the file size is bounded before the content is read, and the
//! content must be UTF-8. Validation is a separate step so hosts can apply
//! [`EnvOverrides`] between load and validate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use podium_store_sqlite::SqliteStoreConfig;
use podium_store_sqlite::SqliteStoreMode;
use podium_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming an alternate config file path.
pub const ENV_CONFIG_PATH: &str = "PODIUM_CONFIG";
/// Environment variable overriding the listener port.
pub const ENV_PORT: &str = "PODIUM_PORT";
/// Environment variable overriding the `SQLite` database path.
pub const ENV_STORE_PATH: &str = "PODIUM_STORE_PATH";

/// Config file looked up in the working directory when no path is given.
const DEFAULT_CONFIG_PATH: &str = "podium.toml";
/// Database file used when the sqlite store has no configured path.
const DEFAULT_STORE_PATH: &str = "podium.sqlite";
/// Maximum accepted config file size in bytes.
const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576;
/// Maximum length of a single config path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total config path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Optional directory of static assets served on unmatched paths.
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: None,
        }
    }
}

/// Returns the default listener address.
fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

// ============================================================================
// SECTION: Store Config
// ============================================================================

/// Selects the backing store implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardStoreType {
    /// Volatile in-process store for development and tests.
    Memory,
    /// Durable `SQLite` store.
    #[default]
    Sqlite,
}

/// Backing store settings.
///
/// # Invariants
/// - `path` is meaningful for the sqlite store only; the memory store rejects
///   a configured path.
/// - `SQLite` tuning fields mirror [`SqliteStoreConfig`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store implementation selector.
    #[serde(default)]
    pub store_type: LeaderboardStoreType,
    /// Database file path for the sqlite store.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// `SQLite` busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Number of read-only `SQLite` connections.
    #[serde(default = "default_read_pool_size")]
    pub read_pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: LeaderboardStoreType::default(),
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            read_pool_size: default_read_pool_size(),
        }
    }
}

impl StoreConfig {
    /// Validates the store section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the section mixes the memory
    /// store with a path or carries zero-valued tuning fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_type == LeaderboardStoreType::Memory && self.path.is_some() {
            return Err(ConfigError::Invalid(
                "store path not allowed for memory store".to_string(),
            ));
        }
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("store path must be non-empty".to_string()));
            }
        }
        if self.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "store busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.read_pool_size == 0 {
            return Err(ConfigError::Invalid(
                "store read_pool_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the sqlite store configuration, applying the default path.
    #[must_use]
    pub fn sqlite_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
            read_pool_size: self.read_pool_size,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Returns the default read connection pool size.
const fn default_read_pool_size() -> usize {
    4
}

// ============================================================================
// SECTION: Limits Config
// ============================================================================

/// Query limit settings for the HTTP boundary.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Entry count returned when a top query omits `limit`.
    #[serde(default = "default_top_limit")]
    pub default_top_limit: usize,
    /// Upper bound accepted for the `limit` query parameter.
    #[serde(default = "default_max_top_limit")]
    pub max_top_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            default_top_limit: default_top_limit(),
            max_top_limit: default_max_top_limit(),
        }
    }
}

/// Returns the default top-query entry count.
const fn default_top_limit() -> usize {
    10
}

/// Returns the default upper bound for the `limit` query parameter.
const fn default_max_top_limit() -> usize {
    100
}

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration for the Podium service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PodiumConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Backing store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Query limit settings.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl PodiumConfig {
    /// Loads configuration from an explicit path, the `PODIUM_CONFIG`
    /// environment variable, or `podium.toml` in the working directory, in
    /// that order. Defaults are returned when no config file exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path fails a guard, the file cannot
    /// be read, exceeds the size limit, is not UTF-8, or fails TOML parsing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(explicit) = path {
            return Self::load_file(explicit);
        }
        if let Some(env_path) = std::env::var_os(ENV_CONFIG_PATH) {
            return Self::load_file(Path::new(&env_path));
        }
        let fallback = Path::new(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::load_file(fallback);
        }
        Ok(Self::default())
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid TOML or
    /// contains unknown fields.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(
                "server.bind must be a valid socket address".to_string(),
            ));
        }
        if let Some(static_dir) = &self.server.static_dir {
            if static_dir.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "server.static_dir must be non-empty".to_string(),
                ));
            }
        }
        if self.limits.default_top_limit == 0 {
            return Err(ConfigError::Invalid(
                "default_top_limit must be greater than zero".to_string(),
            ));
        }
        if self.limits.max_top_limit == 0 {
            return Err(ConfigError::Invalid(
                "max_top_limit must be greater than zero".to_string(),
            ));
        }
        if self.limits.default_top_limit > self.limits.max_top_limit {
            return Err(ConfigError::Invalid(
                "default_top_limit must not exceed max_top_limit".to_string(),
            ));
        }
        self.store.validate()
    }

    /// Applies environment overrides on top of the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override value cannot be
    /// applied, for example a non-numeric port.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) -> Result<(), ConfigError> {
        if let Some(raw_port) = &overrides.port {
            let port: u16 = raw_port.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_PORT} must be a valid port number"))
            })?;
            let mut addr: SocketAddr = self.server.bind.parse().map_err(|_| {
                ConfigError::Invalid("server.bind must be a valid socket address".to_string())
            })?;
            addr.set_port(port);
            self.server.bind = addr.to_string();
        }
        if let Some(raw_path) = &overrides.store_path {
            if raw_path.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{ENV_STORE_PATH} must not be empty")));
            }
            self.store.path = Some(PathBuf::from(raw_path));
        }
        Ok(())
    }

    /// Reads, bounds, and parses one config file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_config_path(path)?;
        let metadata = std::fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_BYTES {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let raw = std::fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let text = String::from_utf8(raw)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(&text)
    }
}

// ============================================================================
// SECTION: Environment Overrides
// ============================================================================

/// Environment overrides applied between load and validate.
///
/// Hosts read the process environment once through [`EnvOverrides::from_env`];
/// tests construct the struct directly.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// Listener port override (`PODIUM_PORT`).
    pub port: Option<String>,
    /// `SQLite` database path override (`PODIUM_STORE_PATH`).
    pub store_path: Option<String>,
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set variable is not valid
    /// UTF-8. Invalid UTF-8 fails closed instead of being ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: read_env_strict(ENV_PORT)?,
            store_path: read_env_strict(ENV_STORE_PATH)?,
        })
    }
}

/// Reads an environment variable and enforces UTF-8 validity.
fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))
    })
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Messages name the offending field or guard without echoing file content.
#[derive(Debug, Error, Clone)]
pub enum ConfigError {
    /// Config file I/O error.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file failed TOML parsing.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config failed a load guard or a validation rule.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Load Guards
// ============================================================================

/// Bounds the config path before any filesystem access.
fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config path must be non-empty".to_string()));
    }
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
