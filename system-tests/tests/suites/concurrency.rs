// system-tests/tests/suites/concurrency.rs
// ============================================================================
// Module: Concurrency Tests
// Description: Parallel submission behavior against a live server.
// Purpose: Ensure best-score semantics hold under concurrent writers.
// Dependencies: system-tests helpers
// ============================================================================

//! Concurrent submission and read-consistency tests.

use helpers::harness::allocate_bind_addr;
use helpers::harness::base_memory_config;
use helpers::harness::base_sqlite_config;
use helpers::harness::resolve_workers;
use helpers::harness::spawn_server;
use helpers::readiness::wait_for_server_ready;
use tempfile::TempDir;
use tokio::task::JoinSet;

use crate::helpers;

const DEFAULT_WORKERS: usize = 8;
const MAX_SCORE: i64 = 60;

#[tokio::test(flavor = "multi_thread")]
async fn two_simultaneous_submissions_settle_on_higher_score()
-> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("leaderboard.sqlite");
    let bind = allocate_bind_addr()?.to_string();
    let server = spawn_server(base_sqlite_config(&bind, &db_path)).await?;
    let client = server.client(std::time::Duration::from_secs(10))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(10)).await?;

    let (first, second) = tokio::join!(client.submit("Carol", 30), client.submit("Carol", 40));
    let first = first?;
    let second = second?;
    if first.status != 200 || second.status != 200 {
        return Err(format!("submissions failed: {} and {}", first.status, second.status).into());
    }

    let top = client.top().await?;
    let entries = top.body.as_array().ok_or("top response was not an array")?;
    if entries.len() != 1 {
        return Err(format!("expected one entry for one name, got {}", entries.len()).into());
    }
    if entries[0]["name"] != "Carol" || entries[0]["score"] != 40 {
        return Err(format!("expected a single Carol entry at 40: {}", entries[0]).into());
    }

    server.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_same_name_submissions_keep_max_score()
-> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("leaderboard.sqlite");
    let bind = allocate_bind_addr()?.to_string();
    let server = spawn_server(base_sqlite_config(&bind, &db_path)).await?;
    let client = server.client(std::time::Duration::from_secs(10))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(10)).await?;

    let workers = resolve_workers(DEFAULT_WORKERS);
    let scores: Vec<i64> = (1..=MAX_SCORE).collect();

    let mut joins = JoinSet::new();
    for worker_idx in 0..workers {
        let client = client.clone();
        let scores = scores.clone();
        joins.spawn(async move {
            for step in 0..scores.len() {
                let score = scores[(step + worker_idx * 7) % scores.len()];
                let response = client.submit("Racer", score).await?;
                if response.status != 200 {
                    return Err(format!(
                        "worker {worker_idx} got status {}: {}",
                        response.status, response.body
                    ));
                }
                let recorded = response.body["score"]
                    .as_i64()
                    .ok_or_else(|| format!("worker {worker_idx} missing score field"))?;
                if recorded < score {
                    return Err(format!(
                        "worker {worker_idx} saw recorded score {recorded} below submitted {score}"
                    ));
                }
            }
            Ok::<(), String>(())
        });
    }
    while let Some(result) = joins.join_next().await {
        result
            .map_err(|err| format!("worker join error: {err}"))?
            .map_err(|err| format!("worker execution failed: {err}"))?;
    }

    let top = client.top().await?;
    let entries = top.body.as_array().ok_or("top response was not an array")?;
    if entries.len() != 1 {
        return Err(format!("expected one entry for one name, got {}", entries.len()).into());
    }
    if entries[0]["name"] != "Racer" || entries[0]["score"] != MAX_SCORE {
        return Err(format!("expected Racer at the maximum score: {}", entries[0]).into());
    }

    server.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_distinct_names_all_recorded() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("leaderboard.sqlite");
    let bind = allocate_bind_addr()?.to_string();
    let server = spawn_server(base_sqlite_config(&bind, &db_path)).await?;
    let client = server.client(std::time::Duration::from_secs(10))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(10)).await?;

    let workers = resolve_workers(DEFAULT_WORKERS);

    let mut joins = JoinSet::new();
    for worker_idx in 0..workers {
        let client = client.clone();
        joins.spawn(async move {
            let name = format!("player-{worker_idx:02}");
            let score = (worker_idx as i64 + 1) * 10;
            let response = client.submit(&name, score).await?;
            if response.status != 200 {
                return Err(format!(
                    "submission for {name} got status {}: {}",
                    response.status, response.body
                ));
            }
            Ok::<(), String>(())
        });
    }
    while let Some(result) = joins.join_next().await {
        result
            .map_err(|err| format!("worker join error: {err}"))?
            .map_err(|err| format!("worker execution failed: {err}"))?;
    }

    for worker_idx in 0..workers {
        let name = format!("player-{worker_idx:02}");
        let check = client.check(&name).await?;
        if check.body["exists"] != true {
            return Err(format!("expected {name} to exist after fan-out").into());
        }
    }

    let limit = std::cmp::min(workers, 100);
    let top = client.top_with_limit(&limit.to_string()).await?;
    let entries = top.body.as_array().ok_or("top response was not an array")?;
    if entries.len() != limit {
        return Err(format!("expected {limit} entries, got {}", entries.len()).into());
    }
    let scores: Vec<i64> =
        entries.iter().filter_map(|entry| entry["score"].as_i64()).collect();
    if scores.windows(2).any(|pair| pair[0] < pair[1]) {
        return Err(format!("ranking is not descending: {scores:?}").into());
    }

    server.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reads_never_observe_score_regression() -> Result<(), Box<dyn std::error::Error>> {
    let bind = allocate_bind_addr()?.to_string();
    let server = spawn_server(base_memory_config(&bind)).await?;
    let client = server.client(std::time::Duration::from_secs(10))?;
    wait_for_server_ready(&client, std::time::Duration::from_secs(10)).await?;

    let mut joins = JoinSet::new();
    for offset in 1..=2_i64 {
        let client = client.clone();
        joins.spawn(async move {
            let mut score = offset;
            while score <= 100 {
                let response = client.submit("Climber", score).await?;
                if response.status != 200 {
                    return Err(format!("writer got status {}", response.status));
                }
                score += 2;
            }
            Ok::<(), String>(())
        });
    }
    for reader_idx in 0..4 {
        let client = client.clone();
        joins.spawn(async move {
            let mut last_seen: i64 = 0;
            for _ in 0..30 {
                let top = client.top_with_limit("1").await?;
                let entries = top
                    .body
                    .as_array()
                    .ok_or_else(|| format!("reader {reader_idx} got a non-array body"))?;
                if let Some(entry) = entries.first() {
                    let observed = entry["score"]
                        .as_i64()
                        .ok_or_else(|| format!("reader {reader_idx} missing score"))?;
                    if observed < last_seen {
                        return Err(format!(
                            "reader {reader_idx} saw score regress from {last_seen} to {observed}"
                        ));
                    }
                    last_seen = observed;
                }
                tokio::time::sleep(std::time::Duration::from_millis(2)).await;
            }
            Ok::<(), String>(())
        });
    }
    while let Some(result) = joins.join_next().await {
        result
            .map_err(|err| format!("task join error: {err}"))?
            .map_err(|err| format!("task execution failed: {err}"))?;
    }

    let top = client.top().await?;
    let entries = top.body.as_array().ok_or("top response was not an array")?;
    if entries.len() != 1 || entries[0]["score"] != 100 {
        return Err(format!("expected Climber to finish at 100: {}", top.body).into());
    }

    server.shutdown().await;
    Ok(())
}
