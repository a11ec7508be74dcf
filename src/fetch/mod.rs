//! Fetch resilience layer.
//!
//! Wraps outbound retrieval with bounded, linearly backed-off retries.
//! The actual HTTP call sits behind the [`Transport`] trait so the retry
//! logic can be driven by a scripted transport in tests.

pub mod cache;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::types::{FetchFailure, PokedexError, Result};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default number of total attempts per retrieval.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for linear backoff (ms).
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

const USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));

/// Bounded retry with linear backoff.
///
/// Between attempt `n` and `n + 1` the caller waits `base_delay * n`.
/// There is never a wait after the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Build a policy. An attempt bound of 0 is raised to 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait applied after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// What came back from one GET, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    /// A 200 response carrying a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.into(),
        }
    }
}

/// Abstraction over the network call itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET. Only connection-level problems are errors here;
    /// status and content-type are checked by the caller.
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, FetchFailure>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build provider HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, FetchFailure> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .text()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Retry
// ---------------------------------------------------------------------------

/// Check status and content type, then decode the JSON body.
pub fn decode_response(raw: RawResponse) -> std::result::Result<Value, FetchFailure> {
    if !(200..300).contains(&raw.status) {
        return Err(FetchFailure::Status(raw.status));
    }

    let is_json = raw
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        return Err(FetchFailure::NotJson(raw.content_type));
    }

    serde_json::from_str(&raw.body).map_err(|e| FetchFailure::Decode(e.to_string()))
}

/// Retrieve and decode `url`, retrying every kind of failure.
///
/// Returns the payload of the first successful attempt. After
/// `policy.max_attempts` failures returns [`PokedexError::Retrieval`]
/// carrying the last observed cause.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    url: &str,
    policy: RetryPolicy,
) -> Result<Value> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let failure = match transport.get(url).await.and_then(decode_response) {
            Ok(payload) => {
                if attempt > 1 {
                    debug!(url, attempt, "Retrieval succeeded after retry");
                }
                return Ok(payload);
            }
            Err(failure) => failure,
        };

        warn!(url, attempt, max_attempts, error = %failure, "Retrieval attempt failed");

        if attempt >= max_attempts {
            return Err(PokedexError::Retrieval {
                url: url.to_string(),
                attempts: attempt,
                cause: failure,
            });
        }

        let delay = policy.delay_after(attempt);
        debug!(url, attempt, delay_ms = delay.as_millis() as u64, "Backing off before retry");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
