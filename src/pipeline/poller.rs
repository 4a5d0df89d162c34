// src/pipeline/poller.rs
//! Bounded-retry polling for extraction job results.
//!
//! The loop makes at most `max_attempts` requests and sleeps exactly
//! `interval` between attempts (a wall-clock wait, never a busy spin).
//! An explicit pending signal and an unexpected transport error both
//! consume one attempt; only an unparseable 200 body is fatal.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{PollConfig, ServiceConfig};
use crate::error::ImportError;
use crate::pipeline::submitter::JobHandle;

/// States of the bounded-retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Submitted,
    Pending,
    Ready,
    Exhausted,
}

/// One poll attempt either yields the raw record, asks for another
/// attempt, or fails the import outright.
enum Attempt {
    Ready(Value),
    Retry,
}

pub struct ResultPoller {
    client: Client,
    config: ServiceConfig,
}

impl ResultPoller {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Poll until the job result is ready or the attempt budget runs out.
    /// Returns the first raw record of the result collection.
    pub async fn poll(
        &self,
        identifier: &str,
        handle: &JobHandle,
        poll: &PollConfig,
    ) -> Result<Value, ImportError> {
        let mut state = PollState::Submitted;

        for attempt in 1..=poll.max_attempts {
            // Wait between attempts only, never before the first one.
            if state == PollState::Pending {
                tokio::time::sleep(poll.interval).await;
            }

            info!(
                "Polling snapshot {} (attempt {}/{})",
                handle.as_str(),
                attempt,
                poll.max_attempts
            );

            match self.query_snapshot(identifier, handle).await? {
                Attempt::Ready(record) => {
                    info!("Extraction result ready after {} attempts", attempt);
                    return Ok(record);
                }
                Attempt::Retry => {
                    state = PollState::Pending;
                }
            }
        }

        Err(ImportError::Timeout {
            identifier: identifier.to_string(),
            attempts: poll.max_attempts,
        })
    }

    async fn query_snapshot(
        &self,
        identifier: &str,
        handle: &JobHandle,
    ) -> Result<Attempt, ImportError> {
        let response = match self
            .client
            .get(format!("{}/snapshot/{}", self.config.base_url, handle.as_str()))
            .query(&[("format", "json")])
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Poll request failed, will retry: {}", e);
                return Ok(Attempt::Retry);
            }
        };

        let status = response.status();

        // 202 and 404 are the service's explicit "still running" signals.
        if status == StatusCode::ACCEPTED || status == StatusCode::NOT_FOUND {
            return Ok(Attempt::Retry);
        }

        if !status.is_success() {
            warn!("Poll returned HTTP {}, will retry", status);
            return Ok(Attempt::Retry);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read poll response body, will retry: {}", e);
                return Ok(Attempt::Retry);
            }
        };

        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| ImportError::InvalidPayload {
                identifier: identifier.to_string(),
                reason: format!("unparseable poll result: {}", e),
            })?;

        match parsed {
            Value::Array(records) => match records.into_iter().next() {
                Some(first) if first.is_object() => Ok(Attempt::Ready(first)),
                Some(_) => Err(ImportError::InvalidPayload {
                    identifier: identifier.to_string(),
                    reason: "poll result record is not an object".to_string(),
                }),
                // Empty collection means the job has not produced anything yet.
                None => Ok(Attempt::Retry),
            },
            _ => Ok(Attempt::Retry),
        }
    }
}
