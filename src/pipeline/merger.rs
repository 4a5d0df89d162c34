// src/pipeline/merger.rs
//! Combines the canonical primary profile with the optional enrichment
//! skill set. Enrichment only ever augments skills; every other field of
//! the primary profile passes through untouched, and on a name collision
//! the primary entry keeps its casing, level and provenance.

use tracing::info;

use crate::pipeline::normalizer::dedup_skills;
use crate::types::profile::{CanonicalProfile, Provenance, SkillEntry};

pub fn merge(primary: CanonicalProfile, enrichment: Vec<SkillEntry>) -> CanonicalProfile {
    if enrichment.is_empty() {
        return primary;
    }

    let mut profile = primary;
    let primary_count = profile.skills.len();
    let enrichment_count = enrichment.len();

    let combined = profile
        .skills
        .into_iter()
        .chain(enrichment.into_iter().map(|skill| SkillEntry {
            provenance: Provenance::Enrichment,
            ..skill
        }))
        .collect();

    profile.skills = dedup_skills(combined);

    info!(
        "Merged skills: primary: {}, enrichment: {}, combined: {}",
        primary_count,
        enrichment_count,
        profile.skills.len()
    );

    profile
}
