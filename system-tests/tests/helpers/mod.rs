// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: helpers
// Description: Shared helpers for Podium system tests.
// Purpose: Provide server harness, HTTP client, and timing utilities.
// Dependencies: podium-config, podium-server, reqwest, tokio
// ============================================================================

//! ## Overview
//! Shared helpers for Podium system tests.
//! Purpose: Provide server harness, HTTP client, and timing utilities.
//! Invariants:
//! - System-test execution is deterministic and fail-closed.
//! - Inputs are treated as untrusted unless explicitly mocked.

#![allow(
    dead_code,
    reason = "Shared helpers are reused across multiple test suites."
)]

pub mod client;
pub mod harness;
pub mod readiness;
pub mod timeouts;
