//! Application state management.
//!
//! This module defines the shared state that is passed to all request handlers.

use std::sync::Arc;

use mocksaml_protocol::endpoints::SamlState;
use mocksaml_protocol::IdpConfig;

use crate::config::ServerConfig;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Identity provider configuration.
    pub idp: Arc<IdpConfig>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let idp = Arc::new(config.idp_config());
        Self {
            config: Arc::new(config),
            idp,
        }
    }

    /// Gets the SAML state for the protocol endpoints.
    #[must_use]
    pub fn saml_state(&self) -> SamlState {
        SamlState::new(Arc::clone(&self.idp))
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
