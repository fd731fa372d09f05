use std::net::SocketAddr;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, loaded once at startup and passed to the clients
/// that need them.
///
/// API keys are optional at load time; the operation that needs one asks
/// for it through [`AppConfig::require_places_api_key`] or
/// [`AppConfig::require_chat_api_key`].
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_language: String,
    pub places_region: String,
    pub request_timeout_secs: u64,
    pub detail_max_retries: u32,
    pub chat_api_key: Option<String>,
    pub chat_base_url: String,
    pub chat_model: String,
    pub host_target_origin: String,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `OUTSCRAPER_API_KEY` was not set.
    pub fn require_places_api_key(&self) -> Result<&str, ConfigError> {
        self.places_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("OUTSCRAPER_API_KEY".to_string()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `TOGETHER_API_KEY` was not set.
    pub fn require_chat_api_key(&self) -> Result<&str, ConfigError> {
        self.chat_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TOGETHER_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_language", &self.places_language)
            .field("places_region", &self.places_region)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("detail_max_retries", &self.detail_max_retries)
            .field(
                "chat_api_key",
                &self.chat_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("chat_base_url", &self.chat_base_url)
            .field("chat_model", &self.chat_model)
            .field("host_target_origin", &self.host_target_origin)
            .finish()
    }
}
