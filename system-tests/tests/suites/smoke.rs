// system-tests/tests/suites/smoke.rs
// ============================================================================
// Module: Smoke Tests
// Description: Server boot and basic round-trip validation.
// Purpose: Ensure a fresh server answers probes, API calls, and static routes.
// Dependencies: system-tests helpers
// ============================================================================

//! Boot, probe, and round-trip smoke tests.

use helpers::harness::allocate_bind_addr;
use helpers::harness::base_memory_config;
use helpers::harness::config_with_static_dir;
use helpers::harness::spawn_server;
use helpers::readiness::wait_for_server_ready;
use tempfile::TempDir;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn server_reports_health_and_readiness() -> Result<(), Box<dyn std::error::Error>> {
    let bind = allocate_bind_addr()?.to_string();
    let server = spawn_server(base_memory_config(&bind)).await?;
    let client = server.client(std::time::Duration::from_secs(5))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(5)).await?;

    let health = client.health().await?;
    if health.status != 200 {
        return Err(format!("expected health status 200, got {}", health.status).into());
    }
    if health.body["status"] != "ok" {
        return Err(format!("unexpected health body: {}", health.body).into());
    }

    let ready = client.ready().await?;
    if ready.status != 200 {
        return Err(format!("expected readiness status 200, got {}", ready.status).into());
    }
    if ready.body["status"] != "ready" {
        return Err(format!("unexpected readiness body: {}", ready.body).into());
    }

    server.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_and_top_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let bind = allocate_bind_addr()?.to_string();
    let server = spawn_server(base_memory_config(&bind)).await?;
    let client = server.client(std::time::Duration::from_secs(5))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(5)).await?;

    let submit = client.submit("Ada", 100).await?;
    if submit.status != 200 {
        return Err(
            format!("expected submit status 200, got {}: {}", submit.status, submit.body).into(),
        );
    }
    if submit.body["name"] != "Ada" || submit.body["score"] != 100 {
        return Err(format!("unexpected submit body: {}", submit.body).into());
    }
    if submit.body["updated"] != true {
        return Err(format!("first submission should report updated: {}", submit.body).into());
    }
    if !submit.body["timestamp"].is_string() {
        return Err(format!("submit body missing timestamp: {}", submit.body).into());
    }

    let top = client.top().await?;
    if top.status != 200 {
        return Err(format!("expected top status 200, got {}", top.status).into());
    }
    let entries = top.body.as_array().ok_or("top response was not an array")?;
    if entries.len() != 1 {
        return Err(format!("expected one leaderboard entry, got {}", entries.len()).into());
    }
    if entries[0]["name"] != "Ada" || entries[0]["score"] != 100 {
        return Err(format!("unexpected top entry: {}", entries[0]).into());
    }

    let known = client.check("Ada").await?;
    if known.status != 200 || known.body["exists"] != true {
        return Err(format!("expected Ada to exist: {}", known.body).into());
    }
    let unknown = client.check("Nobody").await?;
    if unknown.status != 200 || unknown.body["exists"] != false {
        return Err(format!("expected Nobody to be absent: {}", unknown.body).into());
    }

    server.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unmatched_path_returns_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let bind = allocate_bind_addr()?.to_string();
    let server = spawn_server(base_memory_config(&bind)).await?;
    let client = server.client(std::time::Duration::from_secs(5))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(5)).await?;

    let status = client.get_status("/no-such-route").await?;
    if status != 404 {
        return Err(format!("expected 404 for unmatched path, got {status}").into());
    }

    server.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn serves_static_files_when_configured() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    std::fs::write(
        temp.path().join("index.html"),
        "<html><body>Podium Arcade</body></html>",
    )?;

    let bind = allocate_bind_addr()?.to_string();
    let server = spawn_server(config_with_static_dir(&bind, temp.path())).await?;
    let client = server.client(std::time::Duration::from_secs(5))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(5)).await?;

    let (status, body) = client.get_text("/index.html").await?;
    if status != 200 || !body.contains("Podium Arcade") {
        return Err(format!("expected served index.html, got {status}: {body}").into());
    }

    let (root_status, root_body) = client.get_text("/").await?;
    if root_status != 200 || !root_body.contains("Podium Arcade") {
        return Err(format!("expected index at root, got {root_status}: {root_body}").into());
    }

    server.shutdown().await;
    Ok(())
}
