use thiserror::Error;

/// Errors returned by the places API client.
///
/// Every variant's `Display` text is written to be shown to a user as a
/// notice.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("places request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// HTTP 401: the API key was rejected.
    #[error("places API rejected the API key (401 unauthorized)")]
    Unauthorized,

    /// HTTP 402: the account needs billing attention.
    #[error("places API requires payment (402): check the account balance")]
    PaymentRequired,

    /// HTTP 422: the upstream rejected the request parameters.
    #[error("places API rejected the request parameters (422): {message}")]
    InvalidParams { message: String },

    /// Any status the dispatcher has no specific mapping for.
    #[error("unexpected HTTP status {status} from places API")]
    UnexpectedStatus { status: u16 },

    /// HTTP 200 whose body does not report success.
    #[error("places API returned an unsuccessful body: {reason}")]
    MalformedSuccess { reason: String },

    /// The response body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The query was rejected before any request was made.
    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    /// A search was started while another one is still in flight.
    #[error("a search is already in progress")]
    Busy,

    /// The client could not be configured, e.g. no API key is set.
    #[error("places client configuration error: {0}")]
    Config(#[from] bizdir_core::ConfigError),

    /// The configured base URL is not a valid URL.
    #[error("invalid places base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl PlacesError {
    /// Upstream business errors that no retry can fix.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::PaymentRequired
                | Self::InvalidParams { .. }
                | Self::InvalidQuery(_)
                | Self::Config(_)
                | Self::InvalidBaseUrl { .. }
        )
    }

    /// Stable machine-readable code, used by the HTTP backend's error body.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Timeout { .. } | Self::UnexpectedStatus { .. } => {
                "upstream_error"
            }
            Self::Unauthorized => "upstream_unauthorized",
            Self::PaymentRequired => "payment_required",
            Self::InvalidParams { .. } | Self::InvalidQuery(_) => "bad_request",
            Self::MalformedSuccess { .. } | Self::Deserialize { .. } => "upstream_malformed",
            Self::Busy => "busy",
            Self::Config(_) | Self::InvalidBaseUrl { .. } => "internal_error",
        }
    }

    /// Maps a transport error, separating timeouts from other failures.
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Http(err)
        }
    }
}
