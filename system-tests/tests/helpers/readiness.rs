// system-tests/tests/helpers/readiness.rs
// ============================================================================
// Module: helpers::readiness
// Description: Server readiness polling.
// Purpose: Block suites until a spawned server is accepting requests.
// Dependencies: tokio
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use super::client::LeaderboardClient;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Polls the liveness endpoint until the server answers or time runs out.
///
/// # Errors
/// Returns an error describing the last failure when the deadline passes.
pub async fn wait_for_server_ready(
    client: &LeaderboardClient,
    timeout: Duration,
) -> Result<(), String> {
    let start = Instant::now();
    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        match client.health().await {
            Ok(response) if response.status == 200 => return Ok(()),
            Ok(response) => {
                if start.elapsed() > timeout {
                    return Err(format!(
                        "server not ready after {attempts} attempts: status {}",
                        response.status
                    ));
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            Err(err) => {
                if start.elapsed() > timeout {
                    return Err(format!("server not ready after {attempts} attempts: {err}"));
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    }
}
