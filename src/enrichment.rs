// src/enrichment.rs
//! Optional secondary skill source.
//!
//! Enrichment may augment the primary profile's skills but never
//! overrides primary data, and its failure is never fatal: the
//! orchestrator downgrades any `Err` from `fetch_skills` to a warning
//! and an empty skill list. The trait keeps that optional contract
//! visible in the type signature.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use tracing::info;

use crate::error::ImportError;
use crate::pipeline::normalizer::skill_from_raw;
use crate::types::profile::{Provenance, SkillEntry};

pub trait EnrichmentSource: Send + Sync {
    fn fetch_skills(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Vec<SkillEntry>, ImportError>> + Send;
}

/// Default source: no enrichment configured, always an empty skill list.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl EnrichmentSource for NoEnrichment {
    async fn fetch_skills(&self, _identifier: &str) -> Result<Vec<SkillEntry>, ImportError> {
        Ok(Vec::new())
    }
}

/// HTTP-backed skill source returning a JSON array of skill-like records
/// (bare strings or `{name, level}` objects).
pub struct SkillApiEnrichment {
    client: Client,
    base_url: String,
}

impl SkillApiEnrichment {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

impl EnrichmentSource for SkillApiEnrichment {
    async fn fetch_skills(&self, identifier: &str) -> Result<Vec<SkillEntry>, ImportError> {
        let url = format!("{}/skills/{}", self.base_url, identifier);
        info!("Fetching enrichment skills: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ImportError::EnrichmentFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::EnrichmentFailed(format!(
                "enrichment service returned HTTP {}",
                status
            )));
        }

        let records: Vec<Value> = response
            .json()
            .await
            .map_err(|e| ImportError::EnrichmentFailed(e.to_string()))?;

        let skills: Vec<SkillEntry> = records
            .iter()
            .filter_map(|record| skill_from_raw(record, Provenance::Enrichment))
            .collect();

        info!("Enrichment returned {} skills", skills.len());
        Ok(skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_enrichment_yields_empty_list() {
        let skills = NoEnrichment.fetch_skills("johndoe").await.unwrap();
        assert!(skills.is_empty());
    }
}
