use bizdir_places::PlacesError;
use thiserror::Error;

/// Errors returned by the chat client.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The chat API answered with a non-2xx status.
    #[error("chat API error: HTTP {status}")]
    Status { status: u16 },

    /// The user message was empty or whitespace.
    #[error("message is empty")]
    EmptyInput,

    /// The completion carried no choices.
    #[error("chat API returned no choices")]
    EmptyResponse,

    /// The model called a tool with arguments that are not valid JSON.
    #[error("invalid arguments for tool {name}: {source}")]
    ToolArguments {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The place lookup behind the tool call failed.
    #[error("place lookup failed: {0}")]
    Lookup(#[from] PlacesError),

    /// The response body could not be parsed.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("chat client configuration error: {0}")]
    Config(#[from] bizdir_core::ConfigError),

    #[error("invalid chat base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ChatError {
    /// Stable machine-readable code, used by the HTTP backend's error body.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Status { .. } => "upstream_error",
            Self::EmptyInput => "bad_request",
            Self::EmptyResponse | Self::ToolArguments { .. } | Self::Deserialize { .. } => {
                "upstream_malformed"
            }
            Self::Lookup(e) => e.code(),
            Self::Config(_) | Self::InvalidBaseUrl { .. } => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_code() {
        let msg = ChatError::Status { status: 429 }.to_string();
        assert!(msg.contains("429"), "got: {msg}");
    }

    #[test]
    fn lookup_errors_keep_places_code() {
        assert_eq!(
            ChatError::Lookup(PlacesError::PaymentRequired).code(),
            "payment_required"
        );
        assert_eq!(ChatError::EmptyInput.code(), "bad_request");
    }
}
