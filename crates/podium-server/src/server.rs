// crates/podium-server/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: Axum HTTP server hosting the leaderboard API.
// Purpose: Assemble configuration, store, and routes into a running service.
// Dependencies: axum, podium-config, podium-core, podium-store-sqlite, tokio, tower-http
// ============================================================================

//! ## Overview
//! [`PodiumServer::from_config`] validates configuration, opens the configured
//! store, and assembles the router. [`PodiumServer::serve`] binds the address
//! and runs until SIGINT or SIGTERM arrives, then lets in-flight requests
//! drain before returning. Browser game clients are first-class: responses
//! carry permissive CORS headers and unmatched paths can fall back to a
//! static asset directory holding the game bundle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use axum::routing::post;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use podium_config::LeaderboardStoreType;
use podium_config::LimitsConfig;
use podium_config::PodiumConfig;
use podium_core::Clock;
use podium_core::InMemoryLeaderboardStore;
use podium_core::LeaderboardService;
use podium_core::LeaderboardStore;
use podium_core::SharedLeaderboardStore;
use podium_core::StoreError;
use podium_core::SystemClock;
use podium_store_sqlite::SqliteLeaderboardStore;

use crate::routes;
use crate::telemetry::ApiMetrics;
use crate::telemetry::NoopMetrics;


// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server construction and runtime failure.
#[derive(Debug, Error)]
pub enum PodiumServerError {
    /// Configuration failed validation.
    #[error("config error: {0}")]
    Config(String),
    /// Store could not be opened or prepared.
    #[error("store error: {0}")]
    Store(String),
    /// Network binding or serving failed.
    #[error("io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared state handed to every request handler.
pub struct ServerState {
    /// Leaderboard service bound to the configured store.
    pub service: LeaderboardService<SharedLeaderboardStore>,
    /// Clock used to stamp accepted submissions.
    pub clock: Arc<dyn Clock>,
    /// Metrics sink for request counters and latencies.
    pub metrics: Arc<dyn ApiMetrics>,
    /// Readiness probe over the live store.
    pub readiness: Arc<ReadinessState>,
    /// Paging limits for top queries.
    pub limits: LimitsConfig,
}

/// Store-backed readiness probe for `/readyz`.
pub struct ReadinessState {
    /// Store the probe queries.
    store: SharedLeaderboardStore,
}

impl ReadinessState {
    /// Creates a probe over the given store.
    #[must_use]
    pub const fn new(store: SharedLeaderboardStore) -> Self {
        Self { store }
    }

    /// Verifies the store answers a trivial query.
    ///
    /// # Errors
    /// Returns the store failure when the backend is unreachable.
    pub fn check(&self) -> Result<(), StoreError> {
        self.store.readiness()
    }
}

/// Builds handler state from its parts.
#[must_use]
pub fn build_server_state(
    store: SharedLeaderboardStore,
    clock: Arc<dyn Clock>,
    metrics: Arc<dyn ApiMetrics>,
    limits: LimitsConfig,
) -> Arc<ServerState> {
    let readiness = Arc::new(ReadinessState::new(store.clone()));
    Arc::new(ServerState {
        service: LeaderboardService::new(store),
        clock,
        metrics,
        readiness,
        limits,
    })
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Configured HTTP server ready to bind and serve.
pub struct PodiumServer {
    /// Socket address the listener binds.
    bind: SocketAddr,
    /// Optional static asset directory served on unmatched paths.
    static_dir: Option<PathBuf>,
    /// Handler state shared across requests.
    state: Arc<ServerState>,
}

impl PodiumServer {
    /// Validates configuration and assembles the server.
    ///
    /// # Errors
    /// Returns [`PodiumServerError::Config`] when validation fails and
    /// [`PodiumServerError::Store`] when the store cannot be opened.
    pub fn from_config(config: PodiumConfig) -> Result<Self, PodiumServerError> {
        config.validate().map_err(|err| PodiumServerError::Config(err.to_string()))?;
        let bind: SocketAddr = config.server.bind.parse().map_err(|_| {
            PodiumServerError::Config(format!(
                "server.bind is not a socket address: {}",
                config.server.bind
            ))
        })?;
        let store = open_store(&config)?;
        let state =
            build_server_state(store, Arc::new(SystemClock), Arc::new(NoopMetrics), config.limits);
        let static_dir = config.server.static_dir.as_deref().map(PathBuf::from);
        Ok(Self { bind, static_dir, state })
    }

    /// Returns the configured bind address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Builds the full router with API routes, probes, CORS, and tracing.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state), self.static_dir.clone())
    }

    /// Binds the configured address and serves until a shutdown signal.
    ///
    /// # Errors
    /// Returns [`PodiumServerError::Io`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), PodiumServerError> {
        let listener = tokio::net::TcpListener::bind(self.bind)
            .await
            .map_err(|err| PodiumServerError::Io(format!("bind {}: {err}", self.bind)))?;
        let local = listener
            .local_addr()
            .map_err(|err| PodiumServerError::Io(err.to_string()))?;
        tracing::info!(addr = %local, "leaderboard server listening");
        let router = build_router(self.state, self.static_dir);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| PodiumServerError::Io(err.to_string()))
    }
}

/// Opens the store selected by the configuration.
fn open_store(config: &PodiumConfig) -> Result<SharedLeaderboardStore, PodiumServerError> {
    match config.store.store_type {
        LeaderboardStoreType::Memory => {
            Ok(SharedLeaderboardStore::from_store(InMemoryLeaderboardStore::new()))
        }
        LeaderboardStoreType::Sqlite => {
            let store = SqliteLeaderboardStore::new(config.store.sqlite_config())
                .map_err(|err| PodiumServerError::Store(err.to_string()))?;
            Ok(SharedLeaderboardStore::from_store(store))
        }
    }
}

/// Assembles the router from handler state and the optional asset directory.
fn build_router(state: Arc<ServerState>, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/leaderboard/top", get(routes::handle_top))
        .route("/leaderboard/submit", post(routes::handle_submit))
        .route("/leaderboard/check/{name}", get(routes::handle_check))
        .route("/healthz", get(routes::handle_health))
        .route("/readyz", get(routes::handle_ready))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());
    match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    }
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "sigterm handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
