use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use bizdir_core::PlaceDetails;
use bizdir_places::{SearchQuery, SearchReport, DEFAULT_SEARCH_LIMIT};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_places_error, not_configured, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub location: String,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchReport>>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;
    let client = state
        .places
        .as_ref()
        .ok_or_else(|| not_configured(req_id.0.clone(), "places API key"))?;

    let query = SearchQuery::new(params.query, params.location)
        .with_limit(params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .with_skip(params.skip.unwrap_or(0));
    let report = client
        .search(&query)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, report)))
}

pub(super) async fn place_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<DetailParams>, QueryRejection>,
) -> Result<Json<ApiResponse<PlaceDetails>>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;
    let client = state
        .places
        .as_ref()
        .ok_or_else(|| not_configured(req_id.0.clone(), "places API key"))?;

    let details = client
        .fetch_details(&params.name, &params.address)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, details)))
}
