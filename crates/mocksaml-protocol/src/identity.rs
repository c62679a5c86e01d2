//! IdP configuration and namespace-aware identity resolution.
//!
//! A tenant namespace changes the IdP's Entity ID and the URLs it advertises.
//! Resolution is a pure function of the base value and the namespace: the same
//! inputs always give the same output, and distinct namespaces (absent
//! included) never collide.

use crate::signature::SigningCredentials;
use crate::types::Namespace;

/// Path of the SSO endpoint relative to the application URL.
pub const SSO_PATH: &str = "/saml/sso";

/// Path of the metadata endpoint relative to the application URL.
pub const METADATA_PATH: &str = "/saml/metadata";

/// Path of the login page relative to the application URL.
pub const LOGIN_PATH: &str = "/saml/login";

/// Path of the login submission endpoint relative to the application URL.
pub const AUTH_PATH: &str = "/saml/auth";

/// Identity provider configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct IdpConfig {
    /// Public base URL of the application, e.g. `http://localhost:4000`.
    pub app_url: String,
    /// Base Entity ID, before namespacing.
    pub entity_id: String,
    /// Signing certificate and key.
    pub credentials: SigningCredentials,
}

impl IdpConfig {
    /// Creates a configuration. A trailing `/` on the application URL is dropped.
    #[must_use]
    pub fn new(
        app_url: impl Into<String>,
        entity_id: impl Into<String>,
        credentials: SigningCredentials,
    ) -> Self {
        Self {
            app_url: app_url.into().trim_end_matches('/').to_string(),
            entity_id: entity_id.into(),
            credentials,
        }
    }

    /// Returns the un-namespaced SSO URL.
    #[must_use]
    pub fn sso_url(&self) -> String {
        format!("{}{SSO_PATH}", self.app_url)
    }

    /// Returns a resolver for one namespace.
    #[must_use]
    pub fn resolver<'a>(&'a self, namespace: Option<&'a Namespace>) -> IdentityResolver<'a> {
        IdentityResolver {
            config: self,
            namespace,
        }
    }
}

/// Resolves the Entity ID for a namespace.
///
/// Without a namespace the base Entity ID is returned unchanged; with one, the
/// base (minus a trailing `/`) is followed by `/<namespace>`.
#[must_use]
pub fn resolve_entity_id(base_entity_id: &str, namespace: Option<&Namespace>) -> String {
    match namespace {
        None => base_entity_id.to_string(),
        Some(namespace) => format!("{}/{namespace}", base_entity_id.trim_end_matches('/')),
    }
}

/// Resolves the SSO URL for a namespace.
///
/// The namespace is inserted as a `/namespace/<namespace>` path segment in
/// front of the SSO path, so `http://host/saml/sso` becomes
/// `http://host/namespace/<namespace>/saml/sso`. A base URL that does not end
/// with the SSO path gets the segment appended.
#[must_use]
pub fn resolve_sso_url(base_sso_url: &str, namespace: Option<&Namespace>) -> String {
    let Some(namespace) = namespace else {
        return base_sso_url.to_string();
    };

    let trimmed = base_sso_url.trim_end_matches('/');
    match trimmed.strip_suffix(SSO_PATH) {
        Some(app_url) => format!("{app_url}/namespace/{namespace}{SSO_PATH}"),
        None => format!("{trimmed}/namespace/{namespace}"),
    }
}

/// Identity of the IdP as seen from one tenant namespace.
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver<'a> {
    config: &'a IdpConfig,
    namespace: Option<&'a Namespace>,
}

impl IdentityResolver<'_> {
    /// Returns the namespace this resolver is bound to.
    #[must_use]
    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace
    }

    /// Namespaced Entity ID (the Issuer of every message).
    #[must_use]
    pub fn entity_id(&self) -> String {
        resolve_entity_id(&self.config.entity_id, self.namespace)
    }

    /// Namespaced SSO URL.
    #[must_use]
    pub fn sso_url(&self) -> String {
        resolve_sso_url(&self.config.sso_url(), self.namespace)
    }

    /// Namespaced metadata URL.
    #[must_use]
    pub fn metadata_url(&self) -> String {
        self.app_path(METADATA_PATH)
    }

    /// Namespaced login page URL.
    #[must_use]
    pub fn login_url(&self) -> String {
        self.app_path(LOGIN_PATH)
    }

    /// Namespaced login submission URL.
    #[must_use]
    pub fn auth_url(&self) -> String {
        self.app_path(AUTH_PATH)
    }

    fn app_path(&self, path: &str) -> String {
        format!("{}{}", self.config.app_url, namespace_prefix(self.namespace, path))
    }
}

/// Returns `path` under `/namespace/<namespace>` when a namespace is present.
#[must_use]
pub fn namespace_prefix(namespace: Option<&Namespace>, path: &str) -> String {
    match namespace {
        Some(namespace) => format!("/namespace/{namespace}{path}"),
        None => path.to_string(),
    }
}
