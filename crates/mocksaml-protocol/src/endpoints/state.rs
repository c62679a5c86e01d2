//! SAML endpoint state and extractors.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::RequestPartsExt;

use crate::error::SamlError;
use crate::identity::IdpConfig;
use crate::types::Namespace;

/// SAML endpoint state.
///
/// The IdP configuration is immutable after startup; handlers share it
/// read-only.
#[derive(Debug, Clone)]
pub struct SamlState {
    /// Identity provider configuration.
    pub idp: Arc<IdpConfig>,
}

impl SamlState {
    /// Creates a new SAML state.
    #[must_use]
    pub fn new(idp: Arc<IdpConfig>) -> Self {
        Self { idp }
    }
}

/// The tenant namespace taken from the `{ns}` path segment, if the route has one.
///
/// Invalid tokens are rejected with [`SamlError::InvalidNamespace`] before a
/// handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantNamespace(pub Option<Namespace>);

impl<S> FromRequestParts<S> for TenantNamespace
where
    S: Send + Sync,
{
    type Rejection = SamlError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .extract::<Option<Path<String>>>()
            .await
            .map_err(|rejection| SamlError::InvalidNamespace(rejection.body_text()))?;

        Namespace::from_optional(raw.as_ref().map(|Path(ns)| ns.as_str())).map(Self)
    }
}
