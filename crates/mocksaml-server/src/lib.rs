//! # mocksaml-server
//!
//! Axum server for the mock SAML identity provider.
//!
//! This crate provides the HTTP server combining:
//! - SAML endpoints (metadata, SSO, login submission), plain and per namespace
//! - Index and login pages
//! - Health check endpoints
//!
//! ## Usage
//!
//! ```ignore
//! use mocksaml_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! Server::new(config).run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod router;
pub mod state;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

/// The mock SAML IdP server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// The private key is checked here; an unusable key does not stop the
    /// server but every login will fail with a signing error.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        match config.credentials.check_private_key() {
            Ok(bits) => tracing::info!(modulus_bits = bits, "Signing key loaded"),
            Err(e) => tracing::warn!(error = %e, "Signing key is unusable; logins will fail"),
        }

        Self { config }
    }

    /// Runs the server.
    ///
    /// This binds the configured address and blocks until it receives a shutdown signal.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;

        self.serve(listener).await
    }

    /// Serves requests on an already bound listener until a shutdown signal.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let addr = listener.local_addr()?;
        let app = self.router();

        tracing::info!(
            app_url = %self.config.app_url,
            entity_id = %self.config.entity_id,
            "Server listening on http://{}",
            addr
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Creates the router without starting the server.
    #[must_use]
    pub fn router(&self) -> Router {
        create_router(AppState::new(self.config.clone()))
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
