// system-tests/src/config/env.rs
// ============================================================================
// Module: config::env
// Description: Environment variable parsing for system tests.
// Purpose: Provide strict, fail-closed parsing of system-test overrides.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Strict environment parsing for system-test overrides. Every variable
//! is optional, but once set it must parse cleanly. Unset variables fall
//! back to suite defaults; malformed values abort the run with a message
//! naming the variable.

// SECTION: Imports
// ----------------------------------------------------------------------------

use std::time::Duration;

// SECTION: Environment Variables
// ----------------------------------------------------------------------------

/// Environment variables recognized by the system-test suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Minimum client timeout in whole seconds.
    TimeoutSeconds,
    /// Worker count for concurrency suites.
    Workers,
}

impl SystemTestEnv {
    /// Returns the environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeoutSeconds => "PODIUM_SYSTEM_TEST_TIMEOUT_SEC",
            Self::Workers => "PODIUM_SYSTEM_TEST_WORKERS",
        }
    }
}

// SECTION: Configuration
// ----------------------------------------------------------------------------

/// Resolved system-test configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Minimum client timeout, when overridden.
    pub timeout: Option<Duration>,
    /// Concurrency worker count, when overridden.
    pub workers: Option<usize>,
}

impl SystemTestConfig {
    /// Loads configuration from the environment.
    ///
    /// # Errors
    /// Returns an error naming the offending variable when a set value
    /// fails to parse.
    pub fn load() -> Result<Self, String> {
        let timeout = match read_env_nonempty(SystemTestEnv::TimeoutSeconds)? {
            Some(raw) => Some(parse_timeout_seconds(&raw)?),
            None => None,
        };
        let workers = match read_env_nonempty(SystemTestEnv::Workers)? {
            Some(raw) => Some(parse_workers(&raw)?),
            None => None,
        };
        Ok(Self { timeout, workers })
    }
}

// SECTION: Parse Helpers
// ----------------------------------------------------------------------------

/// Reads an environment variable, requiring valid UTF-8 when present.
///
/// # Errors
/// Returns an error when the value is set but not valid UTF-8.
pub fn read_env_strict(var: SystemTestEnv) -> Result<Option<String>, String> {
    match std::env::var_os(var.as_str()) {
        Some(value) => match value.into_string() {
            Ok(text) => Ok(Some(text)),
            Err(_) => Err(format!("{} must be valid UTF-8", var.as_str())),
        },
        None => Ok(None),
    }
}

/// Reads an environment variable, rejecting values that are set but blank.
fn read_env_nonempty(var: SystemTestEnv) -> Result<Option<String>, String> {
    match read_env_strict(var)? {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(format!("{} must not be empty when set", var.as_str()));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

/// Parses a timeout override as a positive number of whole seconds.
fn parse_timeout_seconds(raw: &str) -> Result<Duration, String> {
    let seconds: u64 = raw.parse().map_err(|_| {
        format!(
            "{} must be a positive integer number of seconds",
            SystemTestEnv::TimeoutSeconds.as_str()
        )
    })?;
    if seconds == 0 {
        return Err(format!(
            "{} must be greater than zero",
            SystemTestEnv::TimeoutSeconds.as_str()
        ));
    }
    Ok(Duration::from_secs(seconds))
}

/// Parses a worker-count override as a positive integer.
fn parse_workers(raw: &str) -> Result<usize, String> {
    let workers: usize = raw.parse().map_err(|_| {
        format!(
            "{} must be a positive integer",
            SystemTestEnv::Workers.as_str()
        )
    })?;
    if workers == 0 {
        return Err(format!(
            "{} must be greater than zero",
            SystemTestEnv::Workers.as_str()
        ));
    }
    Ok(workers)
}
