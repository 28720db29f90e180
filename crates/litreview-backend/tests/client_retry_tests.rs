//! Retry and normalization behaviour of the search client against a mock API.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use litreview_backend::client::{
    RetryReason, SearchFailure, SearchOutcome, SemanticScholarClient,
};
use litreview_backend::config::Config;
use litreview_backend::error::ClientError;
use litreview_backend::models::PaperRecord;

const SEARCH_PATH: &str = "/graph/v1/paper/search";

fn test_client(mock_server: &MockServer) -> SemanticScholarClient {
    SemanticScholarClient::new(Config::for_testing(&mock_server.uri())).unwrap()
}

async fn request_count(mock_server: &MockServer) -> usize {
    mock_server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

fn search_body() -> serde_json::Value {
    json!({
        "total": 2,
        "offset": 0,
        "data": [
            {
                "paperId": "p1",
                "url": "https://www.semanticscholar.org/paper/p1",
                "title": "Attention Is All You Need",
                "abstract": "Transformers.",
                "year": 2017,
                "isOpenAccess": true,
                "authors": [{"authorId": "1", "name": "Ashish Vaswani"}],
                "openAccessPdf": {"url": "https://arxiv.org/pdf/1706.03762", "status": "GREEN"}
            },
            {
                "paperId": "p2",
                "title": "Closed Paper",
                "year": 2020,
                "isOpenAccess": false,
                "authors": [],
                "openAccessPdf": null
            }
        ]
    })
}

fn found(outcome: SearchOutcome) -> Vec<PaperRecord> {
    match outcome {
        SearchOutcome::Found(records) => records,
        SearchOutcome::Failed(failure) => panic!("expected results, got {failure:?}"),
    }
}

// =============================================================================
// Success Path
// =============================================================================

#[tokio::test]
async fn test_search_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("query", "attention"))
        .and(query_param("limit", "5"))
        .and(query_param(
            "fields",
            "paperId,url,title,abstract,authors,year,isOpenAccess,openAccessPdf",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = found(test_client(&mock_server).search_papers("attention", 5).await.unwrap());
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_search_derives_pdf_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .mount(&mock_server)
        .await;

    let records = found(test_client(&mock_server).search_papers("q", 10).await.unwrap());

    let first = records[0].paper().unwrap();
    assert_eq!(first.pdf_url.as_deref(), Some("https://arxiv.org/pdf/1706.03762"));

    let second = records[1].paper().unwrap();
    assert!(second.pdf_url.is_none());
    assert_eq!(second.is_open_access, Some(false));
}

#[tokio::test]
async fn test_search_without_data_is_empty_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0})))
        .mount(&mock_server)
        .await;

    let records = found(test_client(&mock_server).search_papers("nothing", 10).await.unwrap());
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(header("x-api-key", "my-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.api_key = Some("my-key".to_string());
    let client = SemanticScholarClient::new(config).unwrap();

    assert!(matches!(client.search_papers("q", 1).await.unwrap(), SearchOutcome::Found(_)));
}

// =============================================================================
// Retryable Failures
// =============================================================================

#[tokio::test]
async fn test_rate_limit_exhausts_after_six_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .expect(6)
        .mount(&mock_server)
        .await;

    let outcome = test_client(&mock_server).search_papers("q", 10).await.unwrap();

    assert_eq!(
        outcome,
        SearchOutcome::Failed(SearchFailure::Exhausted {
            attempts: 6,
            last: RetryReason::RateLimited
        })
    );
    assert_eq!(request_count(&mock_server).await, 6);
}

#[tokio::test]
async fn test_server_errors_exhaust_after_six_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(6)
        .mount(&mock_server)
        .await;

    let outcome = test_client(&mock_server).search_papers("q", 10).await.unwrap();

    assert_eq!(
        outcome,
        SearchOutcome::Failed(SearchFailure::Exhausted {
            attempts: 6,
            last: RetryReason::ServerError(503)
        })
    );
}

#[tokio::test]
async fn test_recovers_after_transient_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .with_priority(3)
        .mount(&mock_server)
        .await;

    let records = found(test_client(&mock_server).search_papers("q", 10).await.unwrap());
    assert_eq!(records.len(), 2);
    assert_eq!(request_count(&mock_server).await, 4);
}

#[tokio::test]
async fn test_timeouts_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.request_timeout = Duration::from_millis(100);
    let client = SemanticScholarClient::new(config).unwrap();

    let outcome = client.search_papers("slow", 10).await.unwrap();
    assert_eq!(
        outcome,
        SearchOutcome::Failed(SearchFailure::Exhausted { attempts: 6, last: RetryReason::Timeout })
    );
}

// =============================================================================
// Non-retryable Failures
// =============================================================================

#[tokio::test]
async fn test_forbidden_is_fatal_after_one_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).search_papers("q", 10).await.unwrap_err();

    assert!(matches!(err, ClientError::UpstreamStatus { status: 403, .. }));
    assert_eq!(request_count(&mock_server).await, 1);
}

#[tokio::test]
async fn test_bad_request_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid query parameter"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).search_papers("", 10).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_connection_refused_fails_without_retry() {
    // Nothing listens on port 1.
    let client = SemanticScholarClient::new(Config::for_testing("http://127.0.0.1:1")).unwrap();

    let outcome = client.search_papers("q", 10).await.unwrap();
    assert!(matches!(outcome, SearchOutcome::Failed(SearchFailure::Transport(_))));
}

#[tokio::test]
async fn test_malformed_json_fails_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ invalid json here"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = test_client(&mock_server).search_papers("q", 10).await.unwrap();
    assert!(matches!(outcome, SearchOutcome::Failed(SearchFailure::Transport(_))));
}

#[tokio::test]
async fn test_malformed_record_is_passed_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                "not a paper",
                {"paperId": "ok", "title": "Fine", "year": "unknown"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let records = found(test_client(&mock_server).search_papers("q", 10).await.unwrap());
    assert_eq!(records.len(), 2);
    assert!(matches!(&records[0], PaperRecord::Malformed { .. }));

    let kept = records[1].paper().unwrap();
    assert_eq!(kept.title.as_deref(), Some("Fine"));
    assert!(kept.year.is_none());
}

#[tokio::test]
async fn test_unbuildable_url_is_fatal() {
    let client = SemanticScholarClient::new(Config::for_testing("not-a-url")).unwrap();

    let err = client.search_papers("q", 10).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
