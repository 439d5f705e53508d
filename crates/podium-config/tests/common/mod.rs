// crates/podium-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared fixtures for podium-config integration tests.
// Purpose: Provide one canonical minimal configuration for mutation tests.
// Dependencies: podium-config
// ============================================================================

#![allow(dead_code, reason = "Not every test binary uses every shared helper.")]

use podium_config::ConfigError;
use podium_config::PodiumConfig;
use podium_config::StoreConfig;

/// Builds the minimal valid configuration used as a mutation baseline.
pub fn minimal_config() -> Result<PodiumConfig, ConfigError> {
    let raw = r#"
        [server]
        bind = "127.0.0.1:3000"

        [store]
        store_type = "sqlite"
        path = "podium.sqlite"
    "#;
    PodiumConfig::from_toml(raw)
}

/// Builds the minimal configuration with a replaced store section.
pub fn config_with_store(store: StoreConfig) -> Result<PodiumConfig, ConfigError> {
    let mut config = minimal_config()?;
    config.store = store;
    Ok(config)
}
