//! HTTP tests against a mock eCFR API.
//!
//! The harvester uses the blocking reqwest client, so every client is
//! created and driven inside `spawn_blocking`.

use std::time::Duration;

use ecfr_harvester::batch::download_all;
use ecfr_harvester::fetch::{DocumentFetcher, DocumentRequest, EcfrClient, FetchErrorKind};
use ecfr_harvester::harvester::{plan_downloads, process_directory};
use ecfr_harvester::http::RetryPolicy;
use ecfr_harvester::store::{DocumentStore, StoreOutcome};
use ecfr_harvester::{HarvestConfig, HarvesterError};
use ecfr_wordcount::{AgencyTotal, ContainmentRule};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TITLE_XML: &str = include_str!("fixtures/title-1-2024-01-01.xml");

fn client_for(server_uri: &str) -> EcfrClient {
    let config = HarvestConfig::default()
        .with_base_url(server_uri)
        .with_http_timeout(Duration::from_secs(5));
    EcfrClient::new(&config)
        .expect("client builds")
        .with_retry(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
        })
}

async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.expect("blocking task")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_title_document() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-01-01/title-1.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TITLE_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let bytes = blocking(move || {
        client_for(&uri).fetch(&DocumentRequest::new(1u32, "2024-01-01"))
    })
    .await
    .unwrap();

    assert_eq!(bytes, TITLE_XML.as_bytes());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_chapter_uses_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-01-01/title-7.xml"))
        .and(query_param("chapter", "VII"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ECFR/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = blocking(move || {
        let request = DocumentRequest::new(7u32, "2024-01-01").with_chapter("VII");
        client_for(&uri).fetch(&request)
    })
    .await;

    assert_eq!(result.unwrap(), b"<ECFR/>".to_vec());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_title_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let err = blocking(move || {
        client_for(&uri).fetch(&DocumentRequest::new(51u32, "2024-01-01"))
    })
    .await
    .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NotFound);
    assert!(!err.is_retryable());
    assert!(err.url.ends_with("/title-51.xml"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_errors_are_retried_then_transient() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let err = blocking(move || {
        client_for(&uri).fetch(&DocumentRequest::new(1u32, "2024-01-01"))
    })
    .await
    .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::Transient);
    assert!(err.message.contains("gave up after 2 attempts"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_latest_date() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/versions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "versions": [{"date": "2024-06-03"}, {"date": "2024-05-01"}]
        })))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let date = blocking(move || client_for(&uri).latest_date()).await.unwrap();
    assert_eq!(date, "2024-06-03");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_latest_date_without_versions() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/versions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"versions": []})))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = blocking(move || client_for(&uri).latest_date()).await;
    assert!(matches!(result, Err(HarvesterError::UnexpectedResponse(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_store_fetches_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-01-01/title-1.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TITLE_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let uri = mock_server.uri();
    let (first, second) = blocking(move || {
        let client = client_for(&uri);
        let store = DocumentStore::open(root).unwrap();
        let request = DocumentRequest::new(1u32, "2024-01-01");
        let first = store.fetch_and_store(&client, &request).unwrap();
        let second = store.fetch_and_store(&client, &request).unwrap();
        (first, second)
    })
    .await;

    assert_eq!(
        first,
        StoreOutcome::Downloaded {
            bytes: TITLE_XML.len()
        }
    );
    assert_eq!(second, StoreOutcome::Cached);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_and_process_corpus() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/v1/agencies.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "agencies": [
                {
                    "name": "Administrative Committee of the Federal Register",
                    "slug": "administrative-committee-of-the-federal-register",
                    "cfr_references": [{"title": 1}],
                    "children": [
                        {
                            "name": "Office of the Federal Register",
                            "slug": "office-of-the-federal-register",
                            "cfr_references": [{"title": 1}, {"title": 2, "chapter": "I"}]
                        }
                    ]
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-01-01/title-1.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TITLE_XML))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/versioner/v1/full/2024-01-01/title-2.xml"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let uri = mock_server.uri();
    let (requests, outcome, summary) = blocking(move || {
        let client = client_for(&uri);
        let store = DocumentStore::open(root).unwrap();
        let requests = plan_downloads(&client, &["2024-01-01".to_string()]).unwrap();
        let outcome = download_all(&store, &client, &requests, 2, &());
        let summary = process_directory(&store, 2, ContainmentRule::Substring).unwrap();
        (requests, outcome, summary)
    })
    .await;

    assert_eq!(requests.len(), 2);
    assert_eq!(outcome.downloaded, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].document, "title 2 chapter I @ 2024-01-01");

    assert_eq!(summary.documents, 1);
    assert_eq!(
        summary.totals,
        vec![
            AgencyTotal::new("", 3),
            AgencyTotal::new("ADMINISTRATIVE COMMITTEE OF THE FEDERAL REGISTER", 17),
            AgencyTotal::new("ADMINISTRATIVE CONFERENCE OF THE UNITED STATES", 6),
            AgencyTotal::new("OFFICE OF THE FEDERAL REGISTER", 12),
        ]
    );
}
