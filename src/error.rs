// src/error.rs
use thiserror::Error;

/// Errors produced by the profile import pipeline.
///
/// The first four variants are fatal and bubble unchanged to the caller;
/// `EnrichmentFailed` is caught by the orchestrator and only ever results
/// in an empty enrichment skill list.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The extraction service rejected the submit request or was unreachable.
    #[error("import failed for {identifier}: extraction service unavailable: {reason}")]
    ServiceUnavailable { identifier: String, reason: String },

    /// The poll loop exhausted its attempt budget without a result.
    #[error("import failed for {identifier}: no result after {attempts} poll attempts")]
    Timeout { identifier: String, attempts: u32 },

    /// The poll result was empty or could not be parsed.
    #[error("import failed for {identifier}: invalid payload: {reason}")]
    InvalidPayload { identifier: String, reason: String },

    /// The raw payload carried no identifying field at all.
    #[error("import failed for {identifier}: payload has no identifying field")]
    ValidationFailed { identifier: String },

    /// The secondary enrichment source errored. Never fatal.
    #[error("enrichment fetch failed: {0}")]
    EnrichmentFailed(String),
}

impl ImportError {
    /// True for errors that abort the whole import run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ImportError::EnrichmentFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors_embed_identifier() {
        let err = ImportError::Timeout {
            identifier: "johndoe".to_string(),
            attempts: 20,
        };
        assert!(err.to_string().contains("import failed for johndoe"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_enrichment_failure_is_not_fatal() {
        let err = ImportError::EnrichmentFailed("503".to_string());
        assert!(!err.is_fatal());
    }
}
