// system-tests/src/config/mod.rs
// ============================================================================
// Module: config
// Description: System-test configuration loading.
// Purpose: Resolve environment-driven overrides for system test runs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment configuration for system-test runs. Overrides are read
//! strictly: a variable that is set but malformed fails the run instead
//! of being silently ignored.

// SECTION: Modules
// ----------------------------------------------------------------------------

mod env;


// SECTION: Re-exports
// ----------------------------------------------------------------------------

pub use env::SystemTestConfig;
pub use env::SystemTestEnv;
pub use env::read_env_strict;
