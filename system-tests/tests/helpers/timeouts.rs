// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: helpers::timeouts
// Description: Timeout resolution for system tests.
// Purpose: Honor environment timeout overrides without shortening suites.
// Dependencies: system-tests
// ============================================================================

use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Returns the effective timeout for a test operation.
///
/// `PODIUM_SYSTEM_TEST_TIMEOUT_SEC` acts as a floor: slow environments can
/// raise timeouts globally, but an override never shortens a timeout a
/// suite asked for explicitly.
///
/// # Panics
/// Panics when the override is set but malformed, so misconfigured runs
/// fail loudly instead of timing out with misleading durations.
#[must_use]
pub fn resolve_timeout(requested: Duration) -> Duration {
    let config = SystemTestConfig::load().unwrap_or_else(|err| panic!("{err}"));
    config
        .timeout
        .map_or(requested, |floor| std::cmp::max(requested, floor))
}
