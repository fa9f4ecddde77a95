//! Tests for project listings: all projects, by name and by tag.

use dtrackapi::{DtrackClient, List, PageOptions, Project, ProjectListQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project(name: &str, version: &str) -> serde_json::Value {
    serde_json::json!({
        "uuid": uuid::Uuid::new_v4(),
        "name": name,
        "version": version,
        "active": true
    })
}

#[tokio::test]
async fn test_list_page_reads_total_from_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .and(query_param("pageNumber", "2"))
        .and(query_param("pageSize", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "5")
                .set_body_json(serde_json::json!([
                    project("alpha", "1.0"),
                    project("beta", "1.0")
                ])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();
    let options = PageOptions::for_page(2, 2);

    let page = Project::list_page(&client, &ProjectListQuery::default(), &options)
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.total_count, 5);
    assert!(page.has_more(&options));
}

#[tokio::test]
async fn test_list_page_total_need_not_match_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "250")
                .set_body_json(serde_json::json!([project("alpha", "1.0")])),
        )
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let page = Project::list_page(&client, &ProjectListQuery::default(), &PageOptions::default())
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.total_count, 250);
}

#[tokio::test]
async fn test_list_page_without_header_counts_zero() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([project("alpha", "1.0")])),
        )
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let page = Project::list_page(&client, &ProjectListQuery::default(), &PageOptions::default())
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_default_listing_sends_no_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let page = Project::list_page(&client, &ProjectListQuery::default(), &PageOptions::default())
        .await
        .unwrap();
    assert!(page.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_list_with_offset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .and(query_param("offset", "40"))
        .and(query_param("pageSize", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    Project::list_page(
        &client,
        &ProjectListQuery::default(),
        &PageOptions::with_offset(40, 20),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_list_all_walks_pages() {
    let mock_server = MockServer::start().await;

    let first: Vec<_> = (0..100).map(|i| project(&format!("p{i}"), "1")).collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .and(query_param("pageNumber", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "101")
                .set_body_json(&first),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .and(query_param("pageNumber", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "101")
                .set_body_json(serde_json::json!([project("last", "1")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let all = Project::list_all(&client, &ProjectListQuery::default())
        .await
        .unwrap();

    assert_eq!(all.len(), 101);
    assert_eq!(all[100].name.as_deref(), Some("last"));
}

#[tokio::test]
async fn test_list_all_follows_total_when_server_caps_page_size() {
    let mock_server = MockServer::start().await;

    for (page_number, count) in [(1, 50), (2, 50), (3, 20)] {
        let items: Vec<_> = (0..count)
            .map(|i| project(&format!("p{page_number}-{i}"), "1"))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/v1/project"))
            .and(query_param("pageNumber", page_number.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "120")
                    .set_body_json(&items),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let all = Project::list_all(&client, &ProjectListQuery::default())
        .await
        .unwrap();

    assert_eq!(all.len(), 120);
    assert_eq!(all[119].name.as_deref(), Some("p3-19"));
}

#[tokio::test]
async fn test_list_all_without_header_stops_on_short_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .and(query_param("pageNumber", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([project("a", "1"), project("b", "1")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let all = Project::list_all(&client, &ProjectListQuery::default())
        .await
        .unwrap();

    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_for_name_returns_every_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .and(query_param("name", "payments"))
        .and(query_param("excludeInactive", "true"))
        .and(query_param("onlyRoot", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            project("payments", "2.0.0"),
            project("payments", "2.1.0")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let projects = Project::for_name(&client, "payments", true, false)
        .await
        .unwrap();

    assert_eq!(projects.len(), 2);
    assert!(projects
        .iter()
        .all(|p| p.name.as_deref() == Some("payments")));
}

#[tokio::test]
async fn test_for_name_empty_is_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let projects = Project::for_name(&client, "nothing", false, false)
        .await
        .unwrap();

    assert!(projects.is_empty());
}

#[tokio::test]
async fn test_list_by_tag_puts_tag_in_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project/tag/critical"))
        .and(query_param("excludeInactive", "false"))
        .and(query_param("onlyRoot", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "1")
                .set_body_json(serde_json::json!([project("payments", "2.1.0")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let page = Project::list_by_tag(&client, "critical", false, true, &PageOptions::default())
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.total_count, 1);

    let requests = mock_server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default();
    assert!(!query.contains("critical"));
}

#[tokio::test]
async fn test_list_by_tag_encodes_special_characters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/project/tag/team%2Fpayments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = DtrackClient::new("test-key", &mock_server.uri()).unwrap();

    let page = Project::list_by_tag(&client, "team/payments", false, false, &PageOptions::default())
        .await
        .unwrap();

    assert!(page.is_empty());
}
