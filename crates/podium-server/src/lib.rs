// crates/podium-server/src/lib.rs
// ============================================================================
// Module: Podium Server
// Description: Axum HTTP host for the Podium leaderboard service.
// Purpose: Expose leaderboard operations over a JSON API with health probes.
// Dependencies: axum, podium-config, podium-core, podium-store-sqlite, tokio, tower-http
// ============================================================================

//! ## Overview
//! This crate turns a validated [`podium_config::PodiumConfig`] into a
//! running HTTP server: JSON leaderboard routes under `/leaderboard`,
//! liveness and readiness probes, permissive CORS for browser game clients,
//! and optional static hosting for the game bundle itself. Handlers stay
//! async while store calls run on the Tokio blocking pool.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::dto::CheckResponse;
pub use crate::dto::EntryResponse;
pub use crate::dto::ErrorResponse;
pub use crate::dto::StatusResponse;
pub use crate::dto::SubmitRequest;
pub use crate::dto::SubmitResponse;
pub use crate::dto::TopParams;
pub use crate::error::ApiError;
pub use crate::server::PodiumServer;
pub use crate::server::PodiumServerError;
pub use crate::server::ReadinessState;
pub use crate::server::ServerState;
pub use crate::server::build_server_state;
pub use crate::telemetry::API_LATENCY_BUCKETS_MS;
pub use crate::telemetry::ApiMetricEvent;
pub use crate::telemetry::ApiMetrics;
pub use crate::telemetry::ApiOutcome;
pub use crate::telemetry::ApiRoute;
pub use crate::telemetry::NoopMetrics;
