//! Integration tests for `PlacesClient` and `SearchSession` using wiremock
//! HTTP mocks.

use std::time::Duration;

use bizdir_places::{PlacesClient, PlacesError, SearchOutcome, SearchQuery, SearchSession};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_detail_retries(1, 0)
}

fn success_body(names: &[&str]) -> serde_json::Value {
    let places: Vec<_> = names.iter().map(|n| json!({ "name": n })).collect();
    json!({ "id": "req-1", "status": "Success", "data": [places] })
}

#[tokio::test]
async fn search_sends_key_and_fixed_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/search-v3"))
        .and(header("X-API-KEY", "test-key"))
        .and(query_param("query", "coffee Sydney"))
        .and(query_param("limit", "5"))
        .and(query_param("skipPlaces", "20"))
        .and(query_param("async", "false"))
        .and(query_param("language", "en"))
        .and(query_param("region", "AU"))
        .and(query_param("dropDuplicates", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(&["Acme"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let report = client
        .search(&SearchQuery::new("coffee", "Sydney").with_skip(25))
        .await
        .expect("search should succeed");

    assert_eq!(report.outcome, SearchOutcome::Success);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results.results[0].business_name, "Acme");
    assert_eq!(report.results.results[0].brand_images, vec!["N/A"]);
}

#[tokio::test]
async fn no_content_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let report = test_client(&server.uri())
        .search(&SearchQuery::new("nothing", "Nowhere"))
        .await
        .expect("204 is not an error");
    assert_eq!(report.outcome, SearchOutcome::NoResults);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn accepted_reports_pending_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "id": "job-42",
            "status": "Pending",
            "results_location": "https://api.app.outscraper.com/requests/job-42"
        })))
        .mount(&server)
        .await;

    let report = test_client(&server.uri())
        .search(&SearchQuery::new("cafe", "Hobart"))
        .await
        .unwrap();
    match report.outcome {
        SearchOutcome::Pending { job_id, .. } => assert_eq!(job_id.as_deref(), Some("job-42")),
        other => panic!("expected pending, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_is_returned_after_a_single_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&SearchQuery::new("cafe", "Perth"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::Unauthorized));
}

#[tokio::test]
async fn payment_required_and_invalid_params_are_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("query", "a b"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("query", "c d"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "errorMessage": "bad region" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&SearchQuery::new("a", "b")).await.unwrap_err();
    assert!(matches!(err, PlacesError::PaymentRequired));

    let err = client.search(&SearchQuery::new("c", "d")).await.unwrap_err();
    match err {
        PlacesError::InvalidParams { message } => assert_eq!(message, "bad region"),
        other => panic!("expected InvalidParams, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_on_search_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&SearchQuery::new("cafe", "Darwin"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::UnexpectedStatus { status: 500 }));
}

#[tokio::test]
async fn zero_limit_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&SearchQuery::new("cafe", "Darwin").with_limit(0))
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::InvalidQuery(_)));
}

#[tokio::test]
async fn fetch_details_requests_fields_and_maps_first_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("query", "Acme Cafe 1 George St"))
        .and(query_param("limit", "1"))
        .and(query_param(
            "fields",
            "business_status,price_level,business_hours,reviews,popular_times,details",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Success",
            "data": [[{
                "name": "Acme Cafe",
                "business_status": "OPERATIONAL",
                "price_level": 2,
                "working_hours": { "Monday": "7AM-3PM" },
                "reviews_data": [{ "review_rating": 5, "review_text": "Great flat white" }]
            }]]
        })))
        .mount(&server)
        .await;

    let details = test_client(&server.uri())
        .fetch_details("Acme Cafe", "1 George St")
        .await
        .expect("details should load");
    assert_eq!(details.business_status.as_deref(), Some("OPERATIONAL"));
    assert_eq!(details.price_level.as_deref(), Some("$$"));
    assert_eq!(details.working_hours, vec!["Monday: 7AM-3PM".to_owned()]);
    assert_eq!(details.reviews.len(), 1);
}

#[tokio::test]
async fn fetch_details_retries_once_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Success",
            "data": [[{ "name": "Acme", "business_status": "CLOSED_TEMPORARILY" }]]
        })))
        .mount(&server)
        .await;

    let details = test_client(&server.uri())
        .fetch_details("Acme", "Sydney")
        .await
        .expect("second attempt should succeed");
    assert_eq!(details.business_status.as_deref(), Some("CLOSED_TEMPORARILY"));
}

#[tokio::test]
async fn fetch_details_gives_up_after_one_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_details("Acme", "Sydney")
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::UnexpectedStatus { status: 503 }));
}

fn slow_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 1, base_url)
        .expect("client construction should not fail")
        .with_detail_retries(1, 0)
}

fn slow_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(success_body(&["Acme"]))
        .set_delay(Duration::from_millis(2500))
}

#[tokio::test]
async fn search_timeout_is_reported_after_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(slow_response())
        .expect(1)
        .mount(&server)
        .await;

    let err = slow_client(&server.uri())
        .search(&SearchQuery::new("coffee", "Sydney"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, PlacesError::Timeout { timeout_secs: 1 }),
        "{err:?}"
    );
    assert_eq!(err.code(), "upstream_error");
}

#[tokio::test]
async fn fetch_details_retries_a_timeout_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(slow_response())
        .expect(2)
        .mount(&server)
        .await;

    let err = slow_client(&server.uri())
        .fetch_details("Acme", "Sydney")
        .await
        .unwrap_err();
    assert!(
        matches!(err, PlacesError::Timeout { timeout_secs: 1 }),
        "{err:?}"
    );
}

#[tokio::test]
async fn fetch_details_does_not_retry_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_details("Acme", "Sydney")
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::Unauthorized));
}

#[tokio::test]
async fn fetch_details_with_no_match_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let details = test_client(&server.uri())
        .fetch_details("Ghost", "Nowhere")
        .await
        .unwrap();
    assert!(details.working_hours.is_empty());
    assert!(details.reviews.is_empty());
}

// -----------------------------------------------------------------------
// SearchSession
// -----------------------------------------------------------------------

#[tokio::test]
async fn load_more_raises_limit_and_replaces_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(&["A"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(&["A", "B"])))
        .mount(&server)
        .await;

    let session = SearchSession::new(test_client(&server.uri()));
    session
        .search(SearchQuery::new("cafe", "Sydney"))
        .await
        .unwrap();
    assert_eq!(session.results().len(), 1);

    let report = session.load_more().await.unwrap();
    assert_eq!(report.results.len(), 2);
    assert_eq!(session.results().len(), 2);
    assert_eq!(session.current_query().map(|q| q.limit), Some(10));
}

#[tokio::test]
async fn load_more_without_search_is_rejected() {
    let server = MockServer::start().await;
    let session = SearchSession::new(test_client(&server.uri()));
    let err = session.load_more().await.unwrap_err();
    assert!(matches!(err, PlacesError::InvalidQuery(_)));
}

#[tokio::test]
async fn failed_search_clears_results_but_failed_load_more_keeps_them() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("query", "cafe Sydney"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(&["A"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("query", "bar Sydney"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = SearchSession::new(test_client(&server.uri()));
    session
        .search(SearchQuery::new("cafe", "Sydney"))
        .await
        .unwrap();

    assert!(session.load_more().await.is_err());
    assert_eq!(session.results().len(), 1, "load_more failure keeps results");
    assert_eq!(session.current_query().map(|q| q.limit), Some(5));

    assert!(session.search(SearchQuery::new("bar", "Sydney")).await.is_err());
    assert!(session.results().is_empty(), "search failure clears results");
    assert!(session.current_query().is_none());
}

#[tokio::test]
async fn overlapping_search_is_rejected_as_busy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body(&["Slow"]))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = SearchSession::new(test_client(&server.uri()));
    let (first, second) = futures::join!(session.search(SearchQuery::new("cafe", "Sydney")), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.search(SearchQuery::new("bar", "Sydney")).await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(PlacesError::Busy)));
    assert!(!session.is_busy());
    assert_eq!(session.results().results[0].business_name, "Slow");
}
