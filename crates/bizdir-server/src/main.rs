mod api;
mod middleware;

use std::sync::Arc;

use bizdir_chat::{ChatClient, PlaceLookup};
use bizdir_places::PlacesClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = bizdir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let places = match PlacesClient::from_config(&config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "places search disabled");
            None
        }
    };
    let chat = match &places {
        Some(places) => {
            let lookup: Arc<dyn PlaceLookup> = places.clone();
            match ChatClient::from_config(&config, lookup) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    tracing::warn!(error = %e, "chat disabled");
                    None
                }
            }
        }
        None => {
            tracing::warn!("chat disabled: it needs the places client for tool calls");
            None
        }
    };

    let app = build_app(AppState { places, chat }, default_rate_limit_state());

    tracing::info!(env = %config.env, addr = %config.bind_addr, "bizdir-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
