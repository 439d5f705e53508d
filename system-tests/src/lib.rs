// system-tests/src/lib.rs
// ============================================================================
// Module: system_tests
// Description: Shared library surface for Podium system tests.
// Purpose: Host reusable system-test configuration utilities.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Library side of the system-tests crate. Integration suites under
//! `tests/` link against this crate for environment-driven test
//! configuration so every suite resolves overrides the same way.

// SECTION: Modules
// ----------------------------------------------------------------------------

pub mod config;
