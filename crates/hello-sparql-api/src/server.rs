//! HTTP server implementation

use crate::config::ApiConfig;
use crate::handlers::AppState;
use crate::routes::create_router;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// SPARQL/SHACL API server
pub struct ApiServer {
    config: ApiConfig,
}

impl ApiServer {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn address(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.config.server.address()?)
    }

    /// Create the application router
    pub fn create_app(&self) -> Router {
        create_router(AppState::new(self.config.clone()))
    }

    /// Start the server
    pub async fn serve(self) -> anyhow::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_with_shutdown(self, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        let addr = self.address()?;
        let app = self.create_app();

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, origins = ?self.config.cors.allowed_origins, "hello-sparql API listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                error!(error = %e, "server error");
                e.into()
            })
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, starting graceful shutdown");
}
