//! External profile import pipeline.
//!
//! Submits an asynchronous extraction job for a subject identifier,
//! polls the result under a bounded-retry policy, validates and
//! normalizes the raw payload into a [`CanonicalProfile`], and
//! optionally merges in a secondary skill enrichment that can never
//! override the primary source.

pub mod config;
pub mod enrichment;
pub mod error;
pub mod pipeline;
pub mod types;

pub use config::{PollConfig, ServiceConfig};
pub use enrichment::{EnrichmentSource, NoEnrichment, SkillApiEnrichment};
pub use error::ImportError;
pub use pipeline::ImportOrchestrator;
pub use types::profile::{CanonicalProfile, Provenance, SkillEntry};
