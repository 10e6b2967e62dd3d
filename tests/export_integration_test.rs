//! End-to-end export tests against a mock consent API

use chrono::{NaiveDate, Utc};
use consent_export::adapters::consent_api::{ConsentApiClient, ConsentFetcher, ProjectLister};
use consent_export::config::{secret_string, ExporterConfig};
use consent_export::core::export::{ExportCoordinator, ExportOutcome};
use consent_export::domain::{ApiError, DateWindow, ExporterError, OrganizationId};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tempfile::TempDir;

const TOKEN: &str = "test-token";
const HEADER: &str = "projectId;token;collection;identifier;accept;date;value;preferences";

fn test_config(base_url: &str, output_dir: &str) -> ExporterConfig {
    let mut config = ExporterConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.access_token = Some(secret_string(TOKEN.to_string()));
    config.api.timeout_seconds = 5;
    config.api.retry.max_retries = 2;
    config.api.retry.initial_delay_ms = 1;
    config.api.retry.max_delay_ms = 10;
    config.api.retry.jitter = false;
    config.api.rate_limit.max_requests = 60_000;
    config.api.rate_limit.period_seconds = 60;
    config.export.organization_id = Some("org-1".to_string());
    config.export.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
    config.export.end_date = NaiveDate::from_ymd_opt(2024, 1, 31);
    config.export.output_dir = output_dir.to_string();
    config
}

fn january() -> DateWindow {
    DateWindow::in_timezone(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        &Utc,
    )
    .unwrap()
}

fn projects_query(page: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("data.organizationId".into(), "org-1".into()),
        Matcher::UrlEncoded("with".into(), "metadata".into()),
        Matcher::UrlEncoded("page".into(), page.to_string()),
        Matcher::UrlEncoded("perPage".into(), "100".into()),
    ])
}

fn consents_query(page: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("sort".into(), "-createdAt".into()),
        Matcher::UrlEncoded("page".into(), page.to_string()),
        Matcher::UrlEncoded("start".into(), "2024-01-01T00:00:00.000Z".into()),
        Matcher::UrlEncoded("end".into(), "2024-01-31T23:59:59.999Z".into()),
    ])
}

async fn mock_projects_page(
    server: &mut ServerGuard,
    page: u32,
    last_page: u32,
    body: serde_json::Value,
) -> mockito::Mock {
    server
        .mock("GET", "/vault/projects")
        .match_query(projects_query(page))
        .match_header("authorization", format!("Bearer {TOKEN}").as_str())
        .match_header("x-requested-with", "XMLHttpRequest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-last-page", &last_page.to_string())
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

async fn mock_consents_page(
    server: &mut ServerGuard,
    project_id: &str,
    page: u32,
    last_page: u32,
    body: serde_json::Value,
) -> mockito::Mock {
    server
        .mock("GET", format!("/app/consents/{project_id}").as_str())
        .match_query(consents_query(page))
        .match_header("authorization", format!("Bearer {TOKEN}").as_str())
        .match_header("x-requested-with", "XMLHttpRequest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("x-last-page", &last_page.to_string())
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_end_to_end_export() {
    let mut server = Server::new_async().await;
    let output = TempDir::new().unwrap();

    let projects = mock_projects_page(
        &mut server,
        1,
        1,
        json!([
            { "id": "proj-1", "metadata": { "lastPublishedAt": "2023-11-02T10:00:00Z" } },
            { "id": "draft", "metadata": {} },
        ]),
    )
    .await;
    let page1 = mock_consents_page(
        &mut server,
        "proj-1",
        1,
        2,
        json!([{
            "projectId": "proj-1",
            "token": "tok-a",
            "collection": "cookies",
            "identifier": "user-1",
            "accept": true,
            "createdAt": "2024-01-20T08:00:00.000Z",
            "value": "all",
            "preferences": { "analytics": true }
        }]),
    )
    .await;
    let page2 = mock_consents_page(
        &mut server,
        "proj-1",
        2,
        2,
        json!([{
            "projectId": "proj-1",
            "token": "tok-b",
            "collection": "cookies",
            "accept": false,
            "createdAt": "2024-01-05T08:00:00.000Z",
            "preferences": null
        }]),
    )
    .await;

    let config = test_config(&server.url(), &output.path().to_string_lossy());
    let coordinator = ExportCoordinator::with_window(&config, january()).unwrap();
    let outcome = coordinator.execute().await.unwrap();

    projects.assert_async().await;
    page1.assert_async().await;
    page2.assert_async().await;

    let ExportOutcome::Completed(summary) = outcome else {
        panic!("Expected a completed export");
    };
    assert_eq!(summary.total_projects, 1);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.consents_written, 2);

    let expected_path = output
        .path()
        .join("organization_org-1_consents_from_2024-01-01_to_2024-01-31.csv");
    assert_eq!(summary.output_path, expected_path);

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            HEADER,
            r#"proj-1;tok-a;cookies;user-1;1;2024-01-20T08:00:00.000Z;all;{"analytics":true}"#,
            "proj-1;tok-b;cookies;;0;2024-01-05T08:00:00.000Z;undefined;null",
        ]
    );
}

#[tokio::test]
async fn test_no_published_projects_writes_no_file() {
    let mut server = Server::new_async().await;
    let output = TempDir::new().unwrap();

    let projects = mock_projects_page(
        &mut server,
        1,
        1,
        json!([
            { "id": "draft-1", "metadata": { "lastPublishedAt": null } },
            { "id": "draft-2", "metadata": { "lastPublishedAt": "" } },
        ]),
    )
    .await;

    let config = test_config(&server.url(), &output.path().to_string_lossy());
    let coordinator = ExportCoordinator::with_window(&config, january()).unwrap();
    let outcome = coordinator.execute().await.unwrap();

    projects.assert_async().await;
    assert!(matches!(outcome, ExportOutcome::NoPublishedProjects));
    assert!(!coordinator.output_path().exists());
}

#[tokio::test]
async fn test_existing_export_file_is_replaced() {
    let mut server = Server::new_async().await;
    let output = TempDir::new().unwrap();

    let _projects = mock_projects_page(
        &mut server,
        1,
        1,
        json!([{ "id": "proj-1", "metadata": { "lastPublishedAt": "2023-01-01" } }]),
    )
    .await;
    let _consents = mock_consents_page(&mut server, "proj-1", 1, 1, json!([])).await;

    let config = test_config(&server.url(), &output.path().to_string_lossy());
    let coordinator = ExportCoordinator::with_window(&config, january()).unwrap();
    std::fs::write(coordinator.output_path(), "stale content\n").unwrap();

    coordinator.execute().await.unwrap();

    let contents = std::fs::read_to_string(coordinator.output_path()).unwrap();
    assert_eq!(contents, format!("{HEADER}\n"));
}

#[tokio::test]
async fn test_project_listing_follows_last_page() {
    let mut server = Server::new_async().await;
    let config = test_config(&server.url(), "unused");

    let mut mocks = Vec::new();
    for page in 1..=3 {
        mocks.push(
            mock_projects_page(
                &mut server,
                page,
                3,
                json!([
                    { "id": format!("pub-{page}"), "metadata": { "lastPublishedAt": "2023-06-01" } },
                    { "id": format!("draft-{page}"), "metadata": {} },
                ]),
            )
            .await,
        );
    }

    let client = ConsentApiClient::new(&config.api).unwrap();
    let ids = ProjectLister::new(&client, 100)
        .list_published_project_ids(&OrganizationId::new("org-1").unwrap())
        .await
        .unwrap();

    for mock in &mocks {
        mock.assert_async().await;
    }
    let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec!["pub-1", "pub-2", "pub-3"]);
}

#[tokio::test]
async fn test_empty_consent_page_does_not_end_listing() {
    let mut server = Server::new_async().await;
    let config = test_config(&server.url(), "unused");

    let page1 = mock_consents_page(&mut server, "proj-1", 1, 2, json!([])).await;
    let page2 =
        mock_consents_page(&mut server, "proj-1", 2, 2, json!([{ "token": "late" }])).await;

    let client = ConsentApiClient::new(&config.api).unwrap();
    let fetcher = ConsentFetcher::new(&client);
    let mut pages = fetcher.fetch_consents("proj-1", &january()).unwrap();

    assert_eq!(pages.next_page().await.unwrap().map(|p| p.len()), Some(0));
    let second = pages.next_page().await.unwrap().unwrap();
    assert_eq!(second[0].get("token"), Some(&json!("late")));
    assert!(pages.next_page().await.unwrap().is_none());

    page1.assert_async().await;
    page2.assert_async().await;
}

#[tokio::test]
async fn test_blank_project_id_is_rejected_without_request() {
    let server = Server::new_async().await;
    let config = test_config(&server.url(), "unused");

    let client = ConsentApiClient::new(&config.api).unwrap();
    let result = ConsentFetcher::new(&client).fetch_consents("  ", &january());

    assert!(matches!(result, Err(ExporterError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let output = TempDir::new().unwrap();

    let projects = server
        .mock("GET", "/vault/projects")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("no such organization")
        .expect(1)
        .create_async()
        .await;

    let config = test_config(&server.url(), &output.path().to_string_lossy());
    let coordinator = ExportCoordinator::with_window(&config, january()).unwrap();
    let err = coordinator.execute().await.unwrap_err();

    projects.assert_async().await;
    assert!(matches!(
        err,
        ExporterError::Api(ApiError::ClientError { status: 404, .. })
    ));
    assert!(!coordinator.output_path().exists());
}

#[tokio::test]
async fn test_rate_limited_requests_are_retried_until_exhausted() {
    let mut server = Server::new_async().await;

    let projects = server
        .mock("GET", "/vault/projects")
        .match_query(Matcher::Any)
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let config = test_config(&server.url(), "unused");
    let client = ConsentApiClient::new(&config.api).unwrap();
    let err = ProjectLister::new(&client, 100)
        .list_published_project_ids(&OrganizationId::new("org-1").unwrap())
        .await
        .unwrap_err();

    projects.assert_async().await;
    assert!(matches!(err, ExporterError::Api(ApiError::RateLimited { .. })));
}

#[tokio::test]
async fn test_server_error_then_success() {
    let mut server = Server::new_async().await;

    // Matching mocks are served in creation order until each has its hits
    let failing = server
        .mock("GET", "/vault/projects")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let succeeding = server
        .mock("GET", "/vault/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("x-last-page", "1")
        .with_body(r#"[{"id":"proj-1","metadata":{"lastPublishedAt":"2023-01-01"}}]"#)
        .expect(1)
        .create_async()
        .await;

    let config = test_config(&server.url(), "unused");
    let client = ConsentApiClient::new(&config.api).unwrap();
    let ids = ProjectLister::new(&client, 100)
        .list_published_project_ids(&OrganizationId::new("org-1").unwrap())
        .await
        .unwrap();

    failing.assert_async().await;
    succeeding.assert_async().await;
    assert_eq!(ids.len(), 1);
}

#[tokio::test]
async fn test_missing_last_page_header_is_an_error() {
    let mut server = Server::new_async().await;

    let projects = server
        .mock("GET", "/vault/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let config = test_config(&server.url(), "unused");
    let client = ConsentApiClient::new(&config.api).unwrap();
    let err = ProjectLister::new(&client, 100)
        .list_published_project_ids(&OrganizationId::new("org-1").unwrap())
        .await
        .unwrap_err();

    projects.assert_async().await;
    assert!(matches!(err, ExporterError::Api(ApiError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_failure_midway_keeps_written_rows() {
    let mut server = Server::new_async().await;
    let output = TempDir::new().unwrap();

    let _projects = mock_projects_page(
        &mut server,
        1,
        1,
        json!([
            { "id": "proj-1", "metadata": { "lastPublishedAt": "2023-01-01" } },
            { "id": "proj-2", "metadata": { "lastPublishedAt": "2023-01-01" } },
        ]),
    )
    .await;
    let _first = mock_consents_page(
        &mut server,
        "proj-1",
        1,
        1,
        json!([{ "projectId": "proj-1", "token": "kept" }]),
    )
    .await;
    let _second = server
        .mock("GET", "/app/consents/proj-2")
        .match_query(Matcher::Any)
        .with_status(400)
        .create_async()
        .await;

    let config = test_config(&server.url(), &output.path().to_string_lossy());
    let coordinator = ExportCoordinator::with_window(&config, january()).unwrap();
    assert!(coordinator.execute().await.is_err());

    let contents = std::fs::read_to_string(coordinator.output_path()).unwrap();
    assert!(contents.starts_with(HEADER));
    assert!(contents.contains("proj-1;kept;"));
}

#[tokio::test]
async fn test_non_object_consent_fails_after_earlier_rows() {
    let mut server = Server::new_async().await;
    let output = TempDir::new().unwrap();

    let _projects = mock_projects_page(
        &mut server,
        1,
        1,
        json!([{ "id": "proj-1", "metadata": { "lastPublishedAt": "2023-01-01" } }]),
    )
    .await;
    let _consents = mock_consents_page(
        &mut server,
        "proj-1",
        1,
        1,
        json!([{ "projectId": "proj-1", "token": "a" }, null]),
    )
    .await;

    let config = test_config(&server.url(), &output.path().to_string_lossy());
    let coordinator = ExportCoordinator::with_window(&config, january()).unwrap();
    let err = coordinator.execute().await.unwrap_err();

    assert!(matches!(err, ExporterError::InvalidArgument(_)));
    let contents = std::fs::read_to_string(coordinator.output_path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec![HEADER, "proj-1;a;;;;;undefined;"]);
}

#[tokio::test]
async fn test_numeric_publication_timestamp_counts_as_published() {
    let mut server = Server::new_async().await;
    let output = TempDir::new().unwrap();

    let projects = mock_projects_page(
        &mut server,
        1,
        1,
        json!([
            { "id": "proj-1", "metadata": { "lastPublishedAt": 1_700_000_000_000_u64 } },
            { "id": "proj-2", "metadata": null },
            { "id": "proj-3", "metadata": { "lastPublishedAt": false } },
        ]),
    )
    .await;
    let consents = mock_consents_page(
        &mut server,
        "proj-1",
        1,
        1,
        json!([{ "projectId": "proj-1", "token": "t" }]),
    )
    .await;

    let config = test_config(&server.url(), &output.path().to_string_lossy());
    let coordinator = ExportCoordinator::with_window(&config, january()).unwrap();
    let outcome = coordinator.execute().await.unwrap();

    projects.assert_async().await;
    consents.assert_async().await;
    let ExportOutcome::Completed(summary) = outcome else {
        panic!("Expected a completed export");
    };
    assert_eq!(summary.total_projects, 1);
    assert_eq!(summary.consents_written, 1);
}

#[tokio::test]
async fn test_elapsed_time_excludes_project_listing() {
    let mut server = Server::new_async().await;
    let output = TempDir::new().unwrap();
    let listing_delay = std::time::Duration::from_millis(500);

    let _projects = server
        .mock("GET", "/vault/projects")
        .match_query(projects_query(1))
        .with_status(200)
        .with_header("x-last-page", "1")
        .with_body_from_request(move |_| {
            std::thread::sleep(listing_delay);
            json!([{ "id": "proj-1", "metadata": { "lastPublishedAt": "2023-01-01" } }])
                .to_string()
                .into_bytes()
        })
        .create_async()
        .await;
    let _consents = mock_consents_page(&mut server, "proj-1", 1, 1, json!([])).await;

    let config = test_config(&server.url(), &output.path().to_string_lossy());
    let coordinator = ExportCoordinator::with_window(&config, january()).unwrap();
    let ExportOutcome::Completed(summary) = coordinator.execute().await.unwrap() else {
        panic!("Expected a completed export");
    };

    assert!(summary.duration < listing_delay);
}
