//! Search session state: the current query, its limit and its results.
//!
//! Only one search runs at a time. A search started while another is in
//! flight fails with [`PlacesError::Busy`] and leaves the state untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bizdir_core::SearchResultSet;

use crate::client::PlacesClient;
use crate::dispatch::SearchReport;
use crate::error::PlacesError;
use crate::request::{SearchQuery, LOAD_MORE_STEP};

#[derive(Debug, Default)]
struct SessionState {
    query: Option<SearchQuery>,
    results: SearchResultSet,
}

/// A stateful search over one [`PlacesClient`].
#[derive(Debug)]
pub struct SearchSession {
    client: PlacesClient,
    busy: AtomicBool,
    state: Mutex<SessionState>,
}

/// Clears the busy flag when the search finishes, on every path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SearchSession {
    #[must_use]
    pub fn new(client: PlacesClient) -> Self {
        Self {
            client,
            busy: AtomicBool::new(false),
            state: Mutex::new(SessionState::default()),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Results of the last successful search.
    #[must_use]
    pub fn results(&self) -> SearchResultSet {
        self.lock().results.clone()
    }

    #[must_use]
    pub fn current_query(&self) -> Option<SearchQuery> {
        self.lock().query.clone()
    }

    /// Starts a fresh search, replacing the current results.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Busy`] if another search is in flight, or any
    /// error from [`PlacesClient::search`]. On error the previous results
    /// are cleared.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchReport, PlacesError> {
        let _guard = self.acquire()?;
        match self.client.search(&query).await {
            Ok(report) => {
                self.store(query, &report);
                Ok(report)
            }
            Err(err) => {
                *self.lock() = SessionState::default();
                Err(err)
            }
        }
    }

    /// Re-runs the current search with the limit raised by
    /// [`LOAD_MORE_STEP`], replacing the results.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidQuery`] if there is no current search,
    /// [`PlacesError::Busy`] if another search is in flight, or any error
    /// from [`PlacesClient::search`]. On error the previous results are kept.
    pub async fn load_more(&self) -> Result<SearchReport, PlacesError> {
        let _guard = self.acquire()?;
        let current = self.lock().query.clone().ok_or_else(|| {
            PlacesError::InvalidQuery("no search to load more results for".to_string())
        })?;
        let next_limit = current.limit.saturating_add(LOAD_MORE_STEP);
        let query = current.with_limit(next_limit);
        tracing::debug!(limit = next_limit, "loading more places");

        let report = self.client.search(&query).await?;
        self.store(query, &report);
        Ok(report)
    }

    fn acquire(&self) -> Result<BusyGuard<'_>, PlacesError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                tracing::debug!("search rejected: another search is in flight");
                PlacesError::Busy
            })?;
        Ok(BusyGuard(&self.busy))
    }

    fn store(&self, query: SearchQuery, report: &SearchReport) {
        let mut state = self.lock();
        state.query = Some(query);
        state.results = report.results.clone();
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
