mod chat;
mod places;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use bizdir_chat::{ChatClient, ChatError};
use bizdir_places::{PlacesClient, PlacesError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Shared handler state. A client is `None` when its API key is not
/// configured; only the routes needing it fail.
#[derive(Clone, Default)]
pub struct AppState {
    pub places: Option<Arc<PlacesClient>>,
    pub chat: Option<Arc<ChatClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    places: &'static str,
    chat: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" => StatusCode::BAD_REQUEST,
            "payment_required" => StatusCode::PAYMENT_REQUIRED,
            "busy" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" | "upstream_unauthorized" | "upstream_malformed" => {
                StatusCode::BAD_GATEWAY
            }
            "not_configured" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_places_error(request_id: String, error: &PlacesError) -> ApiError {
    if error.is_terminal() {
        tracing::warn!(error = %error, "places request rejected");
    } else {
        tracing::error!(error = %error, "places request failed");
    }
    ApiError::new(request_id, error.code(), error.to_string())
}

pub(super) fn map_chat_error(request_id: String, error: &ChatError) -> ApiError {
    tracing::error!(error = %error, "chat request failed");
    ApiError::new(request_id, error.code(), error.to_string())
}

pub(super) fn not_configured(request_id: String, what: &str) -> ApiError {
    ApiError::new(
        request_id,
        "not_configured",
        format!("{what} is not configured on this server"),
    )
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
        .expose_headers([HeaderName::from_static("x-request-id")])
}

fn upstream_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/places/search", get(places::search_places))
        .route("/api/v1/places/details", get(places::place_details))
        .route("/api/v1/chat", post(chat::send_message))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .merge(upstream_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(60, Duration::from_secs(60))
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let configured = |present: bool| if present { "configured" } else { "missing_key" };
    Json(ApiResponse::new(
        req_id.0,
        HealthData {
            status: "ok",
            places: configured(state.places.is_some()),
            chat: configured(state.chat.is_some()),
        },
    ))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
