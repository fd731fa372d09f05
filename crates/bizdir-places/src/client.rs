//! HTTP client for the Outscraper Maps search API.
//!
//! Wraps `reqwest` with API key handling and status dispatch. The primary
//! search is attempted exactly once; detail fetches go through
//! [`retry_with_backoff`] with at most one retry.

use std::time::Duration;

use bizdir_core::{AppConfig, PlaceDetails};
use reqwest::{Client, Url};

use crate::details::details_from_places;
use crate::dispatch::{dispatch, Dispatched, SearchReport};
use crate::error::PlacesError;
use crate::normalize::extract_raw_places;
use crate::request::{build_detail_params, build_search_params, Locale, SearchQuery};
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.app.outscraper.com/";
const SEARCH_PATH: &str = "maps/search-v3";
const API_KEY_HEADER: &str = "X-API-KEY";
const DEFAULT_DETAIL_RETRIES: u32 = 1;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Client for the Maps search endpoint.
///
/// Use [`PlacesClient::new`] for production, [`PlacesClient::from_config`]
/// from a binary, or [`PlacesClient::with_base_url`] to point at a mock
/// server in tests.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    locale: Locale,
    timeout_secs: u64,
    detail_max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .field("locale", &self.locale)
            .field("timeout_secs", &self.timeout_secs)
            .field("detail_max_retries", &self.detail_max_retries)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("bizdir/0.1 (places-search)")
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            locale: Locale::default(),
            timeout_secs,
            detail_max_retries: DEFAULT_DETAIL_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Config`] when no places API key is configured,
    /// plus anything [`PlacesClient::with_base_url`] returns.
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        let api_key = config.require_places_api_key()?;
        Ok(Self::with_base_url(
            api_key,
            config.request_timeout_secs,
            &config.places_base_url,
        )?
        .with_locale(Locale::new(
            config.places_language.clone(),
            config.places_region.clone(),
        ))
        .with_detail_retries(config.detail_max_retries, DEFAULT_BACKOFF_BASE_MS))
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Sets the detail-fetch retry policy. `max_retries` is capped at one.
    #[must_use]
    pub fn with_detail_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.detail_max_retries = max_retries.min(1);
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Runs one search and normalizes the results.
    ///
    /// Exactly one request is made; failures are returned to the caller.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::InvalidQuery`] before any request if the query is
    ///   invalid.
    /// - Any error from [`dispatch`] for the response status.
    /// - [`PlacesError::Http`] or [`PlacesError::Timeout`] on transport
    ///   failure.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchReport, PlacesError> {
        let params = build_search_params(query, &self.locale)?;
        tracing::debug!(
            limit = query.limit,
            skip = query.skip,
            "places search"
        );
        let url = self.build_url(&params);
        let dispatched = self.request(&url).await?;
        let report = SearchReport::from(dispatched);
        tracing::info!(
            results = report.results.len(),
            outcome = ?report.outcome,
            "places search complete"
        );
        Ok(report)
    }

    /// Fetches the detail view for one result by name and address.
    ///
    /// Transient failures are retried once; terminal errors are not.
    /// A queued or empty response yields empty details.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::search`], after the retry is exhausted.
    pub async fn fetch_details(
        &self,
        name: &str,
        address: &str,
    ) -> Result<PlaceDetails, PlacesError> {
        let params = build_detail_params(name, address, &self.locale)?;
        let url = self.build_url(&params);
        let dispatched = retry_with_backoff(self.detail_max_retries, self.backoff_base_ms, || {
            self.request(&url)
        })
        .await?;

        Ok(match dispatched {
            Dispatched::Success(data) => details_from_places(&extract_raw_places(&data)),
            Dispatched::Pending { .. } | Dispatched::NoResults => PlaceDetails::default(),
        })
    }

    /// Builds the search URL with properly percent-encoded query parameters.
    fn build_url(&self, params: &[(&'static str, String)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{SEARCH_PATH}", self.base_url.path()));
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request with the API key header and dispatches the
    /// response status.
    async fn request(&self, url: &Url) -> Result<Dispatched, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| PlacesError::from_transport(e, self.timeout_secs))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PlacesError::from_transport(e, self.timeout_secs))?;
        dispatch(status, &body)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
