//! SAML router configuration.
//!
//! Provides the Axum router for all SAML endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::auth::auth_post;
use super::metadata::idp_metadata;
use super::sso::{sso_post, sso_redirect};
use super::state::SamlState;

/// Creates the SAML protocol router.
///
/// # Endpoints
///
/// Every path is also served under `/namespace/{ns}`, which selects the tenant.
///
/// | Method   | Path              | Handler        | Description                     |
/// |----------|-------------------|----------------|---------------------------------|
/// | GET      | `/saml/metadata`  | `idp_metadata` | IdP metadata (`?download=true`) |
/// | GET/POST | `/saml/sso`       | `sso`          | Single Sign-On service          |
/// | POST     | `/saml/auth`      | `auth_post`    | Simulated login submission      |
pub fn saml_router() -> Router<SamlState> {
    Router::new()
        // IdP Metadata
        .route("/saml/metadata", get(idp_metadata))
        .route("/namespace/{ns}/saml/metadata", get(idp_metadata))
        // Single Sign-On Service
        .route("/saml/sso", get(sso_redirect).post(sso_post))
        .route("/namespace/{ns}/saml/sso", get(sso_redirect).post(sso_post))
        // Login submission
        .route("/saml/auth", post(auth_post))
        .route("/namespace/{ns}/saml/auth", post(auth_post))
}
