//! # Mock SAML IdP
//!
//! Main entry point for the mock SAML identity provider.

#![forbid(unsafe_code)]

use mocksaml_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Mock SAML IdP starting...");

    let config = ServerConfig::from_env()?;
    Server::new(config).run().await
}
