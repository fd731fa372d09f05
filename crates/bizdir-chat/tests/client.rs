//! Integration tests for `ChatClient` using wiremock HTTP mocks.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bizdir_chat::{ChatClient, ChatError, Message, PlaceLookup, Role};
use bizdir_core::SearchResultSet;
use bizdir_places::{normalize_response, PlacesClient, PlacesError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Returns one fixed place and counts calls.
#[derive(Default)]
struct FakeLookup {
    calls: AtomicU32,
}

#[async_trait]
impl PlaceLookup for FakeLookup {
    async fn lookup(&self, query: &str, location: &str) -> Result<SearchResultSet, PlacesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(normalize_response(&json!([[{
            "name": format!("{query} in {location}"),
            "phone": "+61 2 0000 0000"
        }]])))
    }
}

fn test_client(base_url: &str, lookup: Arc<dyn PlaceLookup>) -> ChatClient {
    ChatClient::with_base_url("chat-key", 30, base_url, lookup)
        .expect("client construction should not fail")
}

fn completion(message: serde_json::Value) -> serde_json::Value {
    json!({
        "choices": [{ "message": message }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 }
    })
}

#[tokio::test]
async fn plain_reply_is_appended_with_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer chat-key"))
        .and(body_partial_json(json!({
            "model": "mistralai/Mixtral-8x7B-Instruct-v0.1",
            "tool_choice": "auto",
            "tools": [{ "type": "function", "function": { "name": "get_place_details" } }],
            "messages": [{ "role": "user", "content": "hello" }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(json!({ "content": "Hi! Ask me about a place." }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let lookup = Arc::new(FakeLookup::default());
    let client = test_client(&server.uri(), lookup.clone());
    let turn = client.send(&[], "  hello ").await.expect("send should succeed");

    assert_eq!(
        turn.messages,
        vec![
            Message::user("hello"),
            Message::assistant("Hi! Ask me about a place.")
        ]
    );
    let usage = turn.usage.expect("usage should be present");
    assert_eq!(usage.total_tokens, 20);
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn tool_call_appends_lookup_results_before_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "content": null,
            "tool_calls": [{
                "function": {
                    "name": "get_place_details",
                    "arguments": "{\"query\":\"pizza\",\"location\":\"Melbourne\"}"
                }
            }]
        }))))
        .mount(&server)
        .await;

    let lookup = Arc::new(FakeLookup::default());
    let client = test_client(&server.uri(), lookup.clone());
    let history = vec![Message::system("You help people find places.")];
    let turn = client.send(&history, "find pizza").await.unwrap();

    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    assert_eq!(turn.messages.len(), 4);
    assert_eq!(turn.messages[0].role, Role::System);
    assert_eq!(turn.messages[1], Message::user("find pizza"));

    let tool_message = &turn.messages[2];
    assert_eq!(tool_message.role, Role::Assistant);
    let parsed: serde_json::Value = serde_json::from_str(&tool_message.content).unwrap();
    assert_eq!(parsed[0]["Business Name"], "pizza in Melbourne");
    assert!(tool_message.content.contains('\n'), "tool result is pretty-printed");

    assert_eq!(turn.messages[3], Message::assistant(""));
}

#[tokio::test]
async fn unknown_tool_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "content": "Done.",
            "tool_calls": [{ "function": { "name": "book_table", "arguments": "{}" } }]
        }))))
        .mount(&server)
        .await;

    let lookup = Arc::new(FakeLookup::default());
    let turn = test_client(&server.uri(), lookup.clone())
        .send(&[], "book me a table")
        .await
        .unwrap();
    assert_eq!(turn.messages.len(), 2);
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_tool_arguments_are_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "content": "",
            "tool_calls": [{ "function": { "name": "get_place_details", "arguments": "{not json" } }]
        }))))
        .mount(&server)
        .await;

    let err = test_client(&server.uri(), Arc::new(FakeLookup::default()))
        .send(&[], "pizza")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::ToolArguments { .. }), "{err:?}");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri(), Arc::new(FakeLookup::default()))
        .send(&[], "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Status { status: 503 }));
}

#[tokio::test]
async fn blank_input_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({ "content": "x" }))))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server.uri(), Arc::new(FakeLookup::default()))
        .send(&[], "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::EmptyInput));
}

#[tokio::test]
async fn tool_call_goes_through_places_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "content": "Here is what I found.",
            "tool_calls": [{
                "function": {
                    "name": "get_place_details",
                    "arguments": "{\"query\":\"bakery\",\"location\":\"Adelaide\"}"
                }
            }]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maps/search-v3"))
        .and(query_param("query", "bakery Adelaide"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Success",
            "data": [[{ "name": "Crusty Corner", "type": "Bakery" }]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let places = PlacesClient::with_base_url("places-key", 30, &server.uri()).unwrap();
    let turn = test_client(&server.uri(), Arc::new(places))
        .send(&[], "bakery?")
        .await
        .unwrap();

    assert!(turn.messages[1].content.contains("Crusty Corner"));
    assert_eq!(turn.messages[2].content, "Here is what I found.");
}
