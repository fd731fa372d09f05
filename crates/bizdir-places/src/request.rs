//! Query parameter construction for the Maps search endpoint.
//!
//! Pure functions only; nothing here touches the network.

use crate::error::PlacesError;

/// Upstream page size. `skipPlaces` must be a multiple of this.
pub const PAGE_SIZE: u32 = 20;

/// Result count for a fresh search from the search form.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Result count for detail fetches and the chat tool.
pub const SINGLE_RESULT_LIMIT: u32 = 1;

/// How much "load more" grows the limit by.
pub const LOAD_MORE_STEP: u32 = 5;

/// Fields requested when expanding a single result.
pub const DETAIL_FIELDS: &str =
    "business_status,price_level,business_hours,reviews,popular_times,details";

/// Fixed locale attached to every request. A deployment constant, never
/// caller-supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub language: String,
    pub region: String,
}

impl Locale {
    pub fn new(language: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: region.into(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", "AU")
    }
}

/// One search, built per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub location: String,
    pub limit: u32,
    pub skip: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: location.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            skip: 0,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// The single free-text search string: `"{text} {location}"`.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!("{} {}", self.text.trim(), self.location.trim())
            .trim()
            .to_string()
    }

    /// Checks the caller-side contract: a positive limit and something to
    /// search for.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidQuery`] if `limit` is zero or both the
    /// text and location are blank.
    pub fn validate(&self) -> Result<(), PlacesError> {
        if self.limit == 0 {
            return Err(PlacesError::InvalidQuery(
                "limit must be at least 1".to_string(),
            ));
        }
        if self.search_text().is_empty() {
            return Err(PlacesError::InvalidQuery(
                "query and location are both empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Floors `skip` to the nearest lower multiple of [`PAGE_SIZE`].
///
/// Misaligned offsets are corrected silently rather than rejected.
#[must_use]
pub fn align_skip(skip: u32) -> u32 {
    skip / PAGE_SIZE * PAGE_SIZE
}

/// Builds the ordered query parameters for a search.
///
/// # Errors
///
/// Returns [`PlacesError::InvalidQuery`] when the query fails
/// [`SearchQuery::validate`].
pub fn build_search_params(
    query: &SearchQuery,
    locale: &Locale,
) -> Result<Vec<(&'static str, String)>, PlacesError> {
    query.validate()?;
    let aligned = align_skip(query.skip);
    if aligned != query.skip {
        tracing::debug!(
            requested = query.skip,
            aligned,
            "skip offset floored to page boundary"
        );
    }

    Ok(vec![
        ("query", query.search_text()),
        ("limit", query.limit.to_string()),
        ("skipPlaces", aligned.to_string()),
        ("async", "false".to_string()),
        ("language", locale.language.clone()),
        ("region", locale.region.clone()),
        ("dropDuplicates", "true".to_string()),
    ])
}

/// Builds the parameters for expanding one result: a single-result search
/// on name and address, with the detail field list.
///
/// # Errors
///
/// Returns [`PlacesError::InvalidQuery`] when name and address are both blank.
pub fn build_detail_params(
    name: &str,
    address: &str,
    locale: &Locale,
) -> Result<Vec<(&'static str, String)>, PlacesError> {
    let query = SearchQuery::new(name, address).with_limit(SINGLE_RESULT_LIMIT);
    let mut params = build_search_params(&query, locale)?;
    params.push(("fields", DETAIL_FIELDS.to_string()));
    Ok(params)
}
