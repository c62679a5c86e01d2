//! SAML endpoint handlers.
//!
//! This module provides Axum HTTP handlers for SAML endpoints:
//!
//! - **Metadata Endpoint** - Serves IdP metadata, per namespace
//! - **SSO Endpoint** - Receives AuthnRequests and forwards to the login page
//! - **Auth Endpoint** - Accepts the simulated login and posts the signed response
//!
//! # Example
//!
//! ```rust,ignore
//! use mocksaml_protocol::endpoints::saml_router;
//! use axum::Router;
//!
//! let app = Router::new()
//!     .merge(saml_router())
//!     .with_state(saml_state);
//! ```

mod auth;
mod metadata;
mod router;
mod sso;
mod state;

pub use auth::*;
pub use metadata::*;
pub use router::*;
pub use sso::*;
pub use state::*;
