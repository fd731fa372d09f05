//! Client for the Outscraper Maps places search API.
//!
//! Builds search requests, dispatches response statuses, and normalizes the
//! upstream place objects into [`bizdir_core::NormalizedPlace`] records.

pub mod client;
pub mod details;
pub mod dispatch;
pub mod error;
pub mod hours;
pub mod normalize;
pub mod request;
pub(crate) mod retry;
pub mod session;
pub mod types;

pub use client::PlacesClient;
pub use details::{details_from_places, place_details};
pub use dispatch::{dispatch, Dispatched, SearchOutcome, SearchReport};
pub use error::PlacesError;
pub use normalize::{extract_raw_places, normalize_place, normalize_response};
pub use request::{
    align_skip, build_detail_params, build_search_params, Locale, SearchQuery,
    DEFAULT_SEARCH_LIMIT, LOAD_MORE_STEP, PAGE_SIZE, SINGLE_RESULT_LIMIT,
};
pub use session::SearchSession;
pub use types::RawPlace;
