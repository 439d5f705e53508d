// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: helpers::harness
// Description: In-process server harness for system tests.
// Purpose: Spawn and tear down Podium servers on ephemeral ports.
// Dependencies: podium-config, podium-server, tokio
// ============================================================================

use std::net::SocketAddr;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use podium_config::LeaderboardStoreType;
use podium_config::LimitsConfig;
use podium_config::PodiumConfig;
use podium_config::ServerConfig;
use podium_config::StoreConfig;
use podium_server::PodiumServer;
use podium_server::PodiumServerError;
use system_tests::config::SystemTestConfig;
use tokio::task::JoinHandle;

use super::client::LeaderboardClient;

/// Handle for a spawned leaderboard server.
pub struct ServerHandle {
    base_url: String,
    join: JoinHandle<Result<(), PodiumServerError>>,
}

impl ServerHandle {
    /// Returns the server base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds an HTTP client aimed at this server.
    ///
    /// # Errors
    /// Returns an error when the client cannot be constructed.
    pub fn client(&self, timeout: Duration) -> Result<LeaderboardClient, String> {
        LeaderboardClient::new(self.base_url.clone(), timeout)
    }

    /// Shuts down the server task.
    pub async fn shutdown(self) {
        self.join.abort();
        let _ = self.join.await;
    }
}

// Intentionally no Drop impl: allow runtime shutdown to cleanly tear down servers.

/// Returns a free loopback address for test servers.
///
/// # Errors
/// Returns an error when no ephemeral port can be reserved.
pub fn allocate_bind_addr() -> Result<SocketAddr, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("failed to reserve test port: {err}"))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("failed to read reserved test port: {err}"))?;
    drop(listener);
    Ok(addr)
}

/// Builds a config backed by the in-memory store.
#[must_use]
pub fn base_memory_config(bind: &str) -> PodiumConfig {
    PodiumConfig {
        server: ServerConfig {
            bind: bind.to_string(),
            static_dir: None,
        },
        store: StoreConfig {
            store_type: LeaderboardStoreType::Memory,
            path: None,
            ..StoreConfig::default()
        },
        limits: LimitsConfig::default(),
    }
}

/// Builds a config backed by the SQLite store at the given path.
#[must_use]
pub fn base_sqlite_config(bind: &str, db_path: &Path) -> PodiumConfig {
    PodiumConfig {
        server: ServerConfig {
            bind: bind.to_string(),
            static_dir: None,
        },
        store: StoreConfig {
            store_type: LeaderboardStoreType::Sqlite,
            path: Some(db_path.to_path_buf()),
            ..StoreConfig::default()
        },
        limits: LimitsConfig::default(),
    }
}

/// Builds a memory-store config that also serves files from a directory.
#[must_use]
pub fn config_with_static_dir(bind: &str, static_dir: &Path) -> PodiumConfig {
    let mut config = base_memory_config(bind);
    config.server.static_dir = Some(static_dir.display().to_string());
    config
}

/// Spawns a leaderboard server in the background and returns its handle.
///
/// # Errors
/// Returns an error when initialization fails or the init task panics.
pub async fn spawn_server(config: PodiumConfig) -> Result<ServerHandle, String> {
    let base_url = format!("http://{}", config.server.bind);
    let server = tokio::task::spawn_blocking(move || PodiumServer::from_config(config))
        .await
        .map_err(|err| format!("server init join failed: {err}"))?
        .map_err(|err| format!("server init failed: {err}"))?;
    let join = tokio::spawn(async move { server.serve().await });
    Ok(ServerHandle { base_url, join })
}

/// Returns the concurrency worker count, honoring `PODIUM_SYSTEM_TEST_WORKERS`.
///
/// # Panics
/// Panics when the override is set but malformed.
#[must_use]
pub fn resolve_workers(default_workers: usize) -> usize {
    let config = SystemTestConfig::load().unwrap_or_else(|err| panic!("{err}"));
    config.workers.unwrap_or(default_workers)
}
