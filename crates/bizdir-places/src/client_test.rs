use super::*;

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

fn params(query: &str) -> Vec<(&'static str, String)> {
    build_search_params(&SearchQuery::new(query, "Sydney"), &Locale::default()).unwrap()
}

#[test]
fn build_url_appends_search_path_and_params() {
    let client = test_client("https://api.app.outscraper.com");
    let url = client.build_url(&params("cafe"));
    assert_eq!(
        url.as_str(),
        "https://api.app.outscraper.com/maps/search-v3?query=cafe+Sydney&limit=5&skipPlaces=0&async=false&language=en&region=AU&dropDuplicates=true"
    );
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("http://localhost:9000/proxy/");
    let url = client.build_url(&params("cafe"));
    assert!(
        url.as_str().starts_with("http://localhost:9000/proxy/maps/search-v3?"),
        "got {url}"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://api.app.outscraper.com");
    let url = client.build_url(&params("fish & chips"));
    assert!(
        url.as_str().contains("fish+%26+chips") || url.as_str().contains("fish%20%26%20chips"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = PlacesClient::with_base_url("k", 30, "not a url").unwrap_err();
    assert!(matches!(err, PlacesError::InvalidBaseUrl { .. }));
}

#[test]
fn debug_output_redacts_api_key() {
    let client = test_client("https://api.app.outscraper.com");
    let debug = format!("{client:?}");
    assert!(!debug.contains("test-key"), "{debug}");
    assert!(debug.contains("[redacted]"));
}

#[test]
fn detail_retries_are_capped_at_one() {
    let client = test_client("https://api.app.outscraper.com").with_detail_retries(5, 0);
    assert_eq!(client.detail_max_retries, 1);
}
