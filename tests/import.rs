//! End-to-end tests for the import pipeline using wiremock HTTP mocks.

use std::time::Duration;

use profile_import::{
    ImportError, ImportOrchestrator, NoEnrichment, PollConfig, Provenance, ServiceConfig,
    SkillApiEnrichment,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_orchestrator(base_url: &str) -> ImportOrchestrator<NoEnrichment> {
    let service = ServiceConfig::new(base_url, "ds_test", "test-key");
    ImportOrchestrator::new(service)
        .expect("orchestrator construction should not fail")
        .with_poll_config(PollConfig::default().with_interval(Duration::ZERO))
}

async fn mount_trigger_ok(server: &MockServer, snapshot_id: &str) {
    Mock::given(method("POST"))
        .and(path("/trigger"))
        .and(query_param("dataset_id", "ds_test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "snapshot_id": snapshot_id })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn import_succeeds_after_pending_polls() {
    let server = MockServer::start().await;
    mount_trigger_ok(&server, "abc123").await;

    // First two polls report the job still running, the third delivers.
    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    let record = serde_json::json!([{
        "name": "John Doe",
        "headline": "Engineer",
        "experience": [
            { "title": "Dev", "company": "Acme", "start_date": "2019-01" }
        ]
    }]);

    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&record))
        .expect(1)
        .mount(&server)
        .await;

    let profile = test_orchestrator(&server.uri())
        .import_profile("johndoe")
        .await
        .expect("import should succeed");

    assert_eq!(profile.personal_info.full_name, "John Doe");
    assert_eq!(profile.personal_info.title, "Engineer");
    assert_eq!(profile.experience.len(), 1);
    assert_eq!(profile.experience[0].position, "Dev");
    assert_eq!(profile.experience[0].company, "Acme");
    assert_eq!(profile.experience[0].start_date, "2019-01");
    assert_eq!(profile.metadata.source, "primary");
}

#[tokio::test]
async fn submit_failure_is_service_unavailable_with_zero_polls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/trigger"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_orchestrator(&server.uri())
        .import_profile("johndoe")
        .await
        .expect_err("import should fail");

    assert!(matches!(err, ImportError::ServiceUnavailable { .. }));
    assert!(err.to_string().contains("import failed for johndoe"));
}

#[tokio::test]
async fn always_pending_source_exhausts_exact_attempt_budget() {
    let server = MockServer::start().await;
    mount_trigger_ok(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .respond_with(ResponseTemplate::new(202))
        .expect(20)
        .mount(&server)
        .await;

    let err = test_orchestrator(&server.uri())
        .import_profile("johndoe")
        .await
        .expect_err("import should time out");

    match err {
        ImportError::Timeout {
            identifier,
            attempts,
        } => {
            assert_eq!(identifier, "johndoe");
            assert_eq!(attempts, 20);
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    // MockServer verifies on drop that exactly 20 requests were made.
}

#[tokio::test]
async fn empty_result_collection_counts_as_pending() {
    let server = MockServer::start().await;
    mount_trigger_ok(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let orchestrator = test_orchestrator(&server.uri()).with_poll_config(
        PollConfig::default()
            .with_max_attempts(3)
            .with_interval(Duration::ZERO),
    );

    let err = orchestrator
        .import_profile("johndoe")
        .await
        .expect_err("import should time out");
    assert!(matches!(err, ImportError::Timeout { attempts: 3, .. }));
}

#[tokio::test]
async fn unparseable_poll_body_is_invalid_payload() {
    let server = MockServer::start().await;
    mount_trigger_ok(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = test_orchestrator(&server.uri())
        .import_profile("johndoe")
        .await
        .expect_err("import should fail");
    assert!(matches!(err, ImportError::InvalidPayload { .. }));
}

#[tokio::test]
async fn payload_without_identity_fails_validation() {
    let server = MockServer::start().await;
    mount_trigger_ok(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{}])))
        .mount(&server)
        .await;

    let err = test_orchestrator(&server.uri())
        .import_profile("johndoe")
        .await
        .expect_err("import should fail validation");

    assert!(matches!(err, ImportError::ValidationFailed { .. }));
    assert!(err.to_string().contains("import failed for johndoe"));
}

#[tokio::test]
async fn empty_identifier_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/trigger"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_orchestrator(&server.uri())
        .import_profile("   ")
        .await
        .expect_err("empty identifier should be rejected");
    assert!(matches!(err, ImportError::InvalidPayload { .. }));
}

#[tokio::test]
async fn enrichment_failure_is_downgraded_to_primary_only_profile() {
    let server = MockServer::start().await;
    mount_trigger_ok(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "name": "John Doe",
            "skills": ["React"]
        }])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/skills/johndoe"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let enrichment =
        SkillApiEnrichment::new(&server.uri()).expect("enrichment construction should not fail");
    let profile = test_orchestrator(&server.uri())
        .with_enrichment(enrichment)
        .import_profile("johndoe")
        .await
        .expect("enrichment failure must not fail the import");

    assert_eq!(profile.skills.len(), 1);
    assert_eq!(profile.skills[0].name, "React");
    assert_eq!(profile.skills[0].provenance, Provenance::Primary);
    assert_eq!(profile.metadata.source, "primary");
}

#[tokio::test]
async fn enrichment_skills_are_merged_without_overriding_primary() {
    let server = MockServer::start().await;
    mount_trigger_ok(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/snapshot/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "name": "John Doe",
            "skills": ["React"]
        }])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/skills/johndoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            "react",
            { "name": "GraphQL", "level": "Advanced" }
        ])))
        .mount(&server)
        .await;

    let enrichment =
        SkillApiEnrichment::new(&server.uri()).expect("enrichment construction should not fail");
    let profile = test_orchestrator(&server.uri())
        .with_enrichment(enrichment)
        .import_profile("johndoe")
        .await
        .expect("import should succeed");

    assert_eq!(profile.skills.len(), 2);
    // Primary casing and provenance win the case-insensitive collision.
    assert_eq!(profile.skills[0].name, "React");
    assert_eq!(profile.skills[0].provenance, Provenance::Primary);
    assert_eq!(profile.skills[1].name, "GraphQL");
    assert_eq!(profile.skills[1].level, "Advanced");
    assert_eq!(profile.skills[1].provenance, Provenance::Enrichment);
    assert_eq!(profile.metadata.source, "primary+enrichment");
}
