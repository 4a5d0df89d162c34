// src/config.rs
use anyhow::{Context, Result};
use std::time::Duration;

/// Connection settings for the primary extraction service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub dataset_id: String,
    pub api_key: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("EXTRACTION_API_KEY")
            .context("EXTRACTION_API_KEY environment variable not set")?;

        let base_url = std::env::var("EXTRACTION_API_URL")
            .unwrap_or_else(|_| "https://api.brightdata.com/datasets/v3".to_string());

        let dataset_id = std::env::var("EXTRACTION_DATASET_ID")
            .unwrap_or_else(|_| "gd_l1viktl72bvl7bjuj0".to_string());

        Ok(Self {
            base_url,
            dataset_id,
            api_key,
        })
    }

    pub fn new(base_url: &str, dataset_id: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            dataset_id: dataset_id.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

/// Bounded-retry settings for the result poller.
///
/// Extraction jobs usually complete within 30-60 seconds; the defaults
/// allow up to 20 x 8s of wall-clock waiting before giving up. Tests
/// inject a zero interval to run the loop without real delays.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_secs(8),
        }
    }
}

impl PollConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}
