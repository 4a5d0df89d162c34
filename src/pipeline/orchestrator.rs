// src/pipeline/orchestrator.rs
//! Composes the import pipeline into one fail-closed flow.
//!
//! Any failure at or before normalization of the primary payload is
//! fatal and propagates untouched; the pipeline never substitutes a
//! different primary source and never returns a partially built profile.
//! Only the enrichment attempt is allowed to fail quietly.

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{PollConfig, ServiceConfig};
use crate::enrichment::{EnrichmentSource, NoEnrichment};
use crate::error::ImportError;
use crate::pipeline::merger;
use crate::pipeline::normalizer;
use crate::pipeline::poller::ResultPoller;
use crate::pipeline::submitter::JobSubmitter;
use crate::pipeline::ImportStage;
use crate::types::profile::CanonicalProfile;

pub struct ImportOrchestrator<E = NoEnrichment> {
    submitter: JobSubmitter,
    poller: ResultPoller,
    poll_config: PollConfig,
    enrichment: E,
}

impl ImportOrchestrator<NoEnrichment> {
    pub fn new(service: ServiceConfig) -> Result<Self> {
        Ok(Self {
            submitter: JobSubmitter::new(service.clone())?,
            poller: ResultPoller::new(service)?,
            poll_config: PollConfig::default(),
            enrichment: NoEnrichment,
        })
    }
}

impl<E: EnrichmentSource> ImportOrchestrator<E> {
    pub fn with_poll_config(mut self, poll_config: PollConfig) -> Self {
        self.poll_config = poll_config;
        self
    }

    pub fn with_enrichment<E2: EnrichmentSource>(self, enrichment: E2) -> ImportOrchestrator<E2> {
        ImportOrchestrator {
            submitter: self.submitter,
            poller: self.poller,
            poll_config: self.poll_config,
            enrichment,
        }
    }

    /// Run one import end to end: submit, poll, validate, normalize,
    /// attempt enrichment, merge. Returns the canonical profile by value.
    pub async fn import_profile(&self, identifier: &str) -> Result<CanonicalProfile, ImportError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ImportError::InvalidPayload {
                identifier: "<empty>".to_string(),
                reason: "subject identifier must be non-empty".to_string(),
            });
        }

        info!("Profile import started for: {}", identifier);

        info!("[{}] {}", ImportStage::Submitting, identifier);
        let handle = self.submitter.submit(identifier).await?;

        info!("[{}] {}", ImportStage::Polling, identifier);
        let raw = self
            .poller
            .poll(identifier, &handle, &self.poll_config)
            .await?;

        info!("[{}] {}", ImportStage::Validating, identifier);
        if !crate::pipeline::validator::has_identity(&raw) {
            return Err(ImportError::ValidationFailed {
                identifier: identifier.to_string(),
            });
        }

        info!("[{}] {}", ImportStage::Normalizing, identifier);
        let primary = normalizer::normalize(&raw);

        // From here on nothing can fail the run.
        info!("[{}] {}", ImportStage::EnrichmentAttempt, identifier);
        let enrichment_skills = match self.enrichment.fetch_skills(identifier).await {
            Ok(skills) => skills,
            Err(e) => {
                warn!("Enrichment skipped for {}: {}", identifier, e);
                Vec::new()
            }
        };
        let enriched = !enrichment_skills.is_empty();

        info!("[{}] {}", ImportStage::Merging, identifier);
        let mut profile = merger::merge(primary, enrichment_skills);
        if enriched {
            profile.metadata.source = "primary+enrichment".to_string();
        }

        info!(
            "Profile import done for {}: {} skills, {} experience entries",
            identifier,
            profile.skills.len(),
            profile.experience.len()
        );

        Ok(profile)
    }
}
