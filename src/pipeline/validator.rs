// src/pipeline/validator.rs
use serde_json::Value;

/// Identity fields checked before normalization is attempted. A payload
/// carrying none of these is rejected without further processing.
const IDENTITY_FIELDS: &[&str] = &["name", "full_name", "headline", "position"];

/// Cheap fail-fast gate: true only if at least one identity field is
/// present and non-empty in the raw payload.
pub fn has_identity(payload: &Value) -> bool {
    IDENTITY_FIELDS.iter().any(|field| {
        payload
            .get(field)
            .and_then(Value::as_str)
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_payload_with_name() {
        assert!(has_identity(&json!({"name": "John Doe"})));
    }

    #[test]
    fn test_accepts_payload_with_headline_only() {
        assert!(has_identity(&json!({"headline": "Engineer"})));
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert!(!has_identity(&json!({})));
    }

    #[test]
    fn test_rejects_blank_identity_fields() {
        assert!(!has_identity(&json!({"name": "", "headline": "   "})));
    }

    #[test]
    fn test_rejects_non_string_identity_fields() {
        assert!(!has_identity(&json!({"name": 42, "position": null})));
    }

    #[test]
    fn test_rejects_payload_with_only_other_fields() {
        assert!(!has_identity(&json!({"experience": [{"title": "Dev"}]})));
    }
}
