// src/pipeline/mod.rs
use std::fmt;

pub mod merger;
pub mod normalizer;
pub mod orchestrator;
pub mod poller;
pub mod submitter;
pub mod validator;

pub use orchestrator::ImportOrchestrator;
pub use poller::{PollState, ResultPoller};
pub use submitter::{JobHandle, JobSubmitter};

/// Stages an import run moves through, in order. Fatal errors can only
/// originate at or before `Normalizing`; the enrichment attempt cannot
/// fail the overall run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Submitting,
    Polling,
    Validating,
    Normalizing,
    EnrichmentAttempt,
    Merging,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportStage::Submitting => "submitting",
            ImportStage::Polling => "polling",
            ImportStage::Validating => "validating",
            ImportStage::Normalizing => "normalizing",
            ImportStage::EnrichmentAttempt => "enrichment",
            ImportStage::Merging => "merging",
        };
        write!(f, "{}", name)
    }
}
