// system-tests/tests/suites/store_persistence.rs
// ============================================================================
// Module: Store Persistence Tests
// Description: End-to-end durability validation for the SQLite store.
// Purpose: Ensure leaderboard state survives server restarts.
// Dependencies: system-tests helpers
// ============================================================================

//! `SQLite` leaderboard persistence tests.

use helpers::harness::allocate_bind_addr;
use helpers::harness::base_sqlite_config;
use helpers::harness::spawn_server;
use helpers::readiness::wait_for_server_ready;
use podium_core::LeaderboardStore;
use podium_store_sqlite::SqliteLeaderboardStore;
use tempfile::TempDir;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn entries_survive_server_restart() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("leaderboard.sqlite");

    let bind = allocate_bind_addr()?.to_string();
    let mut config = base_sqlite_config(&bind, &db_path);
    let store_config = config.store.sqlite_config();

    let server = spawn_server(config.clone()).await?;
    let client = server.client(std::time::Duration::from_secs(5))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(5)).await?;

    let ada = client.submit("Ada", 1_200).await?;
    if ada.status != 200 {
        return Err(format!("Ada submission failed: {}", ada.body).into());
    }
    let bob = client.submit("Bob", 800).await?;
    if bob.status != 200 {
        return Err(format!("Bob submission failed: {}", bob.body).into());
    }

    server.shutdown().await;

    let bind2 = allocate_bind_addr()?.to_string();
    config.server.bind = bind2;
    let server2 = spawn_server(config).await?;
    let client2 = server2.client(std::time::Duration::from_secs(5))?;
    wait_for_server_ready(&client2, std::time::Duration::from_secs(5)).await?;

    let top = client2.top().await?;
    let entries = top.body.as_array().ok_or("top response was not an array")?;
    if entries.len() != 2 {
        return Err(format!("expected both entries after restart: {}", top.body).into());
    }
    if entries[0]["name"] != "Ada" || entries[0]["score"] != 1_200 {
        return Err(format!("Ada entry changed across restart: {}", entries[0]).into());
    }
    if entries[1]["name"] != "Bob" || entries[1]["score"] != 800 {
        return Err(format!("Bob entry changed across restart: {}", entries[1]).into());
    }

    let check = client2.check("Ada").await?;
    if check.body["exists"] != true {
        return Err(format!("expected Ada to exist after restart: {}", check.body).into());
    }

    server2.shutdown().await;

    let store = SqliteLeaderboardStore::new(store_config)?;
    let rows = store.top(10)?;
    if rows.len() != 2 || rows[0].name.as_str() != "Ada" || rows[0].score != 1_200 {
        return Err(format!("direct store read disagrees with API: {rows:?}").into());
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn entry_ids_stay_stable_across_restart() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("leaderboard.sqlite");

    let bind = allocate_bind_addr()?.to_string();
    let mut config = base_sqlite_config(&bind, &db_path);

    let server = spawn_server(config.clone()).await?;
    let client = server.client(std::time::Duration::from_secs(5))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(5)).await?;

    let first = client.submit("Ada", 100).await?;
    if first.status != 200 {
        return Err(format!("initial submission failed: {}", first.body).into());
    }
    let entry_id = first.body["id"].as_u64().ok_or("initial submission missing id")?;

    server.shutdown().await;

    let bind2 = allocate_bind_addr()?.to_string();
    config.server.bind = bind2;
    let server2 = spawn_server(config).await?;
    let client2 = server2.client(std::time::Duration::from_secs(5))?;
    wait_for_server_ready(&client2, std::time::Duration::from_secs(5)).await?;

    let updated = client2.submit("Ada", 500).await?;
    if updated.status != 200 || updated.body["updated"] != true {
        return Err(format!("post-restart update failed: {}", updated.body).into());
    }
    if updated.body["id"] != entry_id {
        return Err(format!(
            "entry id changed across restart: expected {entry_id}, got {}",
            updated.body["id"]
        )
        .into());
    }

    let top = client2.top().await?;
    let entries = top.body.as_array().ok_or("top response was not an array")?;
    if entries.len() != 1 || entries[0]["score"] != 500 {
        return Err(format!("expected one Ada entry at 500: {}", top.body).into());
    }

    server2.shutdown().await;
    Ok(())
}
