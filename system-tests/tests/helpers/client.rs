// system-tests/tests/helpers/client.rs
// ============================================================================
// Module: helpers::client
// Description: HTTP client for the leaderboard API.
// Purpose: Drive the public Podium endpoints from system-test suites.
// Dependencies: reqwest, serde_json
// ============================================================================

//! ## Overview
//! Thin reqwest wrapper speaking the leaderboard HTTP API. Responses are
//! captured as status plus parsed JSON so suites assert on exact bodies
//! without re-deserializing per call site.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use super::timeouts;

/// Response captured from one API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body.
    pub body: Value,
}

/// HTTP client bound to one running leaderboard server.
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    base_url: String,
    client: Client,
}

impl LeaderboardClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, String> {
        let timeout = timeouts::resolve_timeout(timeout);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self { base_url, client })
    }

    /// Submits a score for a player name.
    ///
    /// # Errors
    /// Returns an error when the request fails or the body is not JSON.
    pub async fn submit(&self, name: &str, score: i64) -> Result<ApiResponse, String> {
        let payload = serde_json::json!({ "name": name, "score": score });
        self.post_json("/leaderboard/submit", &payload).await
    }

    /// Submits a raw payload, including malformed ones.
    ///
    /// # Errors
    /// Returns an error when the request fails or the body is not JSON.
    pub async fn submit_raw(&self, payload: &Value) -> Result<ApiResponse, String> {
        self.post_json("/leaderboard/submit", payload).await
    }

    /// Fetches the leaderboard with the server default limit.
    ///
    /// # Errors
    /// Returns an error when the request fails or the body is not JSON.
    pub async fn top(&self) -> Result<ApiResponse, String> {
        self.get_json("/leaderboard/top").await
    }

    /// Fetches the leaderboard with an explicit raw `limit` query value.
    ///
    /// # Errors
    /// Returns an error when the request fails or the body is not JSON.
    pub async fn top_with_limit(&self, limit: &str) -> Result<ApiResponse, String> {
        self.get_json(&format!("/leaderboard/top?limit={limit}")).await
    }

    /// Checks whether a player name already holds an entry.
    ///
    /// # Errors
    /// Returns an error when the request fails or the body is not JSON.
    pub async fn check(&self, name: &str) -> Result<ApiResponse, String> {
        self.get_json(&format!("/leaderboard/check/{name}")).await
    }

    /// Probes the liveness endpoint.
    ///
    /// # Errors
    /// Returns an error when the request fails or the body is not JSON.
    pub async fn health(&self) -> Result<ApiResponse, String> {
        self.get_json("/healthz").await
    }

    /// Probes the readiness endpoint.
    ///
    /// # Errors
    /// Returns an error when the request fails or the body is not JSON.
    pub async fn ready(&self) -> Result<ApiResponse, String> {
        self.get_json("/readyz").await
    }

    /// Fetches an arbitrary path and returns only the status code.
    ///
    /// # Errors
    /// Returns an error when the request itself fails.
    pub async fn get_status(&self, path: &str) -> Result<u16, String> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| format!("GET {path} failed: {err}"))?;
        Ok(response.status().as_u16())
    }

    /// Fetches an arbitrary path and returns the status code and body text.
    ///
    /// # Errors
    /// Returns an error when the request fails or the body cannot be read.
    pub async fn get_text(&self, path: &str) -> Result<(u16, String), String> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| format!("GET {path} failed: {err}"))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| format!("GET {path} body read failed: {err}"))?;
        Ok((status, body))
    }

    async fn get_json(&self, path: &str) -> Result<ApiResponse, String> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| format!("GET {path} failed: {err}"))?;
        Self::capture(path, response).await
    }

    async fn post_json(&self, path: &str, payload: &Value) -> Result<ApiResponse, String> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|err| format!("POST {path} failed: {err}"))?;
        Self::capture(path, response).await
    }

    async fn capture(path: &str, response: reqwest::Response) -> Result<ApiResponse, String> {
        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .map_err(|err| format!("{path} returned a non-JSON body: {err}"))?;
        Ok(ApiResponse { status, body })
    }
}
