use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so an empty `KEY=` line in `.env` does not
    // produce an empty credential.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw.trim_end_matches('/').to_string())
        } else {
            Err(invalid(var, format!("expected an http(s) URL, got \"{raw}\"")))
        }
    };

    let env = parse_environment(&or_default("BIZDIR_ENV", "development"))?;

    let bind_addr = or_default("BIZDIR_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("BIZDIR_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("BIZDIR_LOG_LEVEL", "info");

    let places_api_key = optional("OUTSCRAPER_API_KEY");
    let places_base_url = parse_url("BIZDIR_PLACES_BASE_URL", "https://api.app.outscraper.com")?;
    let places_language = or_default("BIZDIR_PLACES_LANGUAGE", "en");
    let places_region = or_default("BIZDIR_PLACES_REGION", "AU");

    let request_timeout_secs = parse_u64("BIZDIR_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "BIZDIR_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    // The expand-detail fetch is attempted at most twice in total.
    let detail_max_retries = parse_u32("BIZDIR_DETAIL_MAX_RETRIES", "1")?.min(1);

    let chat_api_key = optional("TOGETHER_API_KEY");
    let chat_base_url = parse_url("BIZDIR_CHAT_BASE_URL", "https://api.together.xyz")?;
    let chat_model = or_default(
        "BIZDIR_CHAT_MODEL",
        "mistralai/Mixtral-8x7B-Instruct-v0.1",
    );

    let host_target_origin = or_default("BIZDIR_HOST_TARGET_ORIGIN", "*");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        places_language,
        places_region,
        request_timeout_secs,
        detail_max_retries,
        chat_api_key,
        chat_base_url,
        chat_model,
        host_target_origin,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BIZDIR_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
