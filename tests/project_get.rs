//! Tests for fetching single projects.
//!
//! Uses wiremock to mock the Dependency-Track API.

use dtrackapi::{DtrackClient, DtrackError, Get, PageOptions, Project, Uuid};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT_UUID: &str = "b0d9a4e3-6f3b-4a52-8b8e-4a4c1d0c7f21";
const PARENT_UUID: &str = "7c1d2e3f-4a5b-4c6d-8e7f-901a2b3c4d5e";

fn project_json() -> serde_json::Value {
    serde_json::json!({
        "uuid": PROJECT_UUID,
        "name": "payments",
        "version": "2.1.0",
        "classifier": "APPLICATION",
        "active": true,
        "isLatest": true,
        "tags": [{"name": "critical"}, {"name": "pci"}],
        "parent": {"uuid": PARENT_UUID, "name": "platform"},
        "lastBomImport": 1717171717000_i64,
        "metrics": {
            "critical": 1,
            "high": 3,
            "vulnerabilities": 4,
            "inheritedRiskScore": 25.0
        }
    })
}

#[tokio::test]
async fn test_get_project_sends_api_key_and_decodes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/project/{PROJECT_UUID}")))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();
    let uuid = Uuid::parse_str(PROJECT_UUID).unwrap();

    let project = Project::get(&client, uuid).await.unwrap();

    assert_eq!(project.uuid, uuid);
    assert_eq!(project.display_name(), "payments@2.1.0");
    assert_eq!(project.is_latest, Some(true));
    assert!(project.has_tag("pci"));
    assert_eq!(project.last_bom_import, 1717171717000);
    assert_eq!(project.metrics.as_ref().unwrap().high, 3);
    assert_eq!(
        project.parent.map(|p| p.uuid),
        Some(Uuid::parse_str(PARENT_UUID).unwrap())
    );
}

#[tokio::test]
async fn test_get_project_with_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/project/{PROJECT_UUID}")))
        .and(header("Authorization", "Bearer oidc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::with_bearer_token("oidc-token", &mock_server.uri()).unwrap();
    let uuid = Uuid::parse_str(PROJECT_UUID).unwrap();

    assert!(Project::get(&client, uuid).await.is_ok());
}

#[tokio::test]
async fn test_get_project_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/project/{PROJECT_UUID}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("The project could not be found."))
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();
    let uuid = Uuid::parse_str(PROJECT_UUID).unwrap();

    let err = Project::get(&client, uuid).await.unwrap_err();

    match err {
        DtrackError::NotFound { entity_type, id } => {
            assert_eq!(entity_type, "project");
            assert_eq!(id, PROJECT_UUID);
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_project_forbidden_keeps_status_and_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/project/{PROJECT_UUID}")))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string("Access to the specified project is forbidden"),
        )
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();
    let uuid = Uuid::parse_str(PROJECT_UUID).unwrap();

    let err = Project::get(&client, uuid).await.unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert!(err.to_string().contains("forbidden"));
}

#[tokio::test]
async fn test_get_project_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/project/{PROJECT_UUID}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();
    let uuid = Uuid::parse_str(PROJECT_UUID).unwrap();

    let err = Project::get(&client, uuid).await.unwrap_err();

    assert!(matches!(err, DtrackError::ParseError(_)));
}

#[tokio::test]
async fn test_lookup_by_name_and_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project/lookup"))
        .and(query_param("name", "payments"))
        .and(query_param("version", "2.1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let project = Project::lookup(&client, "payments", "2.1.0").await.unwrap();

    assert_eq!(project.name.as_deref(), Some("payments"));
}

#[tokio::test]
async fn test_lookup_missing_project_names_it() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project/lookup"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let err = Project::lookup(&client, "payments", "9.9.9")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "project 'payments@9.9.9' not found");
}

#[tokio::test]
async fn test_parent_and_children() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/project/{PARENT_UUID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuid": PARENT_UUID,
            "name": "platform",
            "active": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/project/{PARENT_UUID}/children")))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "1")
                .set_body_json(serde_json::json!([project_json()])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();
    let project: Project = serde_json::from_value(project_json()).unwrap();

    let parent = project.parent(&client).await.unwrap().unwrap();
    assert_eq!(parent.name.as_deref(), Some("platform"));

    let children = parent
        .children(&client, &PageOptions::for_page(1, 10))
        .await
        .unwrap();
    assert_eq!(children.total_count, 1);
    assert_eq!(children.items[0].uuid, project.uuid);
}
