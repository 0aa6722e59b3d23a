//! HTTP server assembly and lifecycle

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{extract::DefaultBodyLimit, Router};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    error::{CheckError, Result},
    routes,
    state::AppState,
};

/// Check service HTTP server
pub struct Server {
    config: AppConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: AppConfig) -> Result<Self> {
        let state = Arc::new(AppState::from_config(&config)?);
        Ok(Self { config, state })
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let app = self.create_app();
        let addr = self.socket_addr()?;

        info!("starting check service on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;

        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| CheckError::Internal(format!("server error: {e}")))?;

        info!("server stopped gracefully");
        Ok(())
    }

    /// Create the Axum application
    fn create_app(&self) -> Router {
        routes::create_router(self.state.clone())
            .layer(DefaultBodyLimit::max(self.config.server.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.timeout,
            )))
            .layer(TraceLayer::new_for_http())
    }

    fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| {
                CheckError::Config(config::ConfigError::Message(format!(
                    "invalid server address: {e}"
                )))
            })
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C signal");
        },
        _ = terminate => {
            info!("received terminate signal");
        },
    }

    warn!("starting graceful shutdown...");
}
