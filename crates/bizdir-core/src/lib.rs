//! Shared domain types and configuration for the bizdir workspace.
//!
//! The records here are what every surface (CLI, HTTP backend, chat tool)
//! hands to its consumers. Upstream-specific shapes live in `bizdir-places`.

pub mod app_config;
pub mod config;
pub mod host;
pub mod place;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use host::{HostBridge, HostMessage};
pub use place::{Hours, NormalizedPlace, PlaceDetails, Review, SearchResultSet, NOT_AVAILABLE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
