// src/pipeline/submitter.rs
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::ServiceConfig;
use crate::error::ImportError;

/// Opaque handle for an asynchronous extraction job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct TriggerResponse {
    snapshot_id: String,
}

/// Starts an asynchronous extraction job for a subject identifier.
///
/// Failures at this stage are never retried: any non-success response or
/// network failure surfaces as `ServiceUnavailable` immediately.
pub struct JobSubmitter {
    client: Client,
    config: ServiceConfig,
}

impl JobSubmitter {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub async fn submit(&self, identifier: &str) -> Result<JobHandle, ImportError> {
        let url = subject_url(identifier);
        info!("Submitting extraction job for profile: {}", url);

        let request_body = serde_json::json!([{ "url": url }]);

        let response = self
            .client
            .post(format!("{}/trigger", self.config.base_url))
            .query(&[("dataset_id", self.config.dataset_id.as_str())])
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ImportError::ServiceUnavailable {
                identifier: identifier.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::ServiceUnavailable {
                identifier: identifier.to_string(),
                reason: format!("submit returned HTTP {}", status),
            });
        }

        let trigger: TriggerResponse =
            response
                .json()
                .await
                .map_err(|e| ImportError::ServiceUnavailable {
                    identifier: identifier.to_string(),
                    reason: format!("submit response missing snapshot id: {}", e),
                })?;

        info!("Extraction job started, snapshot id: {}", trigger.snapshot_id);
        Ok(JobHandle(trigger.snapshot_id))
    }
}

/// Build the canonical subject URL from an identifier.
///
/// Accepts full URLs, bare handles, `@handles` and `linkedin.com/in/...`
/// fragments.
pub(crate) fn subject_url(identifier: &str) -> String {
    if identifier.starts_with("http") {
        return identifier.to_string();
    }
    let handle = identifier
        .trim_start_matches('@')
        .trim_start_matches("linkedin.com/in/")
        .trim_end_matches('/');
    format!("https://www.linkedin.com/in/{}/", handle)
}
