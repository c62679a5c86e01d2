//! Index and login page handlers.
//!
//! Both pages are thin: they show what the identity provider advertises and
//! collect the email address for a simulated login. The login itself goes
//! through the JSON `/saml/auth` endpoint.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use mocksaml_protocol::endpoints::TenantNamespace;
use mocksaml_protocol::metadata::metadata_filename;

use crate::state::AppState;

/// Email domains offered on the login page.
pub const LOGIN_DOMAINS: [&str; 2] = ["example.com", "example.org"];

/// ACS URL offered on the login page when the request carries none.
pub const DEFAULT_ACS_URL: &str = "https://sso.eu.boxyhq.com/api/oauth/saml";

/// Audience offered alongside [`DEFAULT_ACS_URL`].
pub const DEFAULT_LOGIN_AUDIENCE: &str = "https://saml.boxyhq.com";

/// Index page template.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Tenant namespace, empty when absent.
    pub namespace: String,
    /// Namespaced Entity ID.
    pub entity_id: String,
    /// Namespaced SSO URL.
    pub sso_url: String,
    /// Namespaced metadata URL.
    pub metadata_url: String,
    /// File name offered by the metadata download.
    pub metadata_filename: String,
    /// Namespaced login page URL.
    pub login_url: String,
    /// Signing certificate in PEM form.
    pub certificate_pem: String,
}

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    /// Tenant namespace, empty when absent.
    pub namespace: String,
    /// Where the form posts its JSON submission.
    pub auth_url: String,
    /// AuthnRequest ID to answer, empty for IdP-initiated logins.
    pub id: String,
    /// Audience of the assertion.
    pub audience: String,
    /// ACS URL; when empty the page asks for it.
    pub acs_url: String,
    /// Name of the requesting service provider.
    pub provider_name: String,
    /// Relay state to hand back.
    pub relay_state: String,
    /// Selectable email domains.
    pub domains: Vec<&'static str>,
    /// Prefilled ACS URL for IdP-initiated logins.
    pub default_acs_url: &'static str,
    /// Prefilled audience for IdP-initiated logins.
    pub default_audience: &'static str,
}

/// Query parameters of the login page, as forwarded by the SSO endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    /// AuthnRequest ID.
    pub id: Option<String>,
    /// Service provider Entity ID.
    pub audience: Option<String>,
    /// Assertion Consumer Service URL.
    pub acs_url: Option<String>,
    /// Service provider display name.
    pub provider_name: Option<String>,
    /// Relay state.
    pub relay_state: Option<String>,
}

/// Shows the index page.
pub async fn index_page(
    State(state): State<AppState>,
    TenantNamespace(namespace): TenantNamespace,
) -> Response {
    let resolver = state.idp.resolver(namespace.as_ref());

    let template = IndexTemplate {
        namespace: namespace.as_ref().map(ToString::to_string).unwrap_or_default(),
        entity_id: resolver.entity_id(),
        sso_url: resolver.sso_url(),
        metadata_url: resolver.metadata_url(),
        metadata_filename: metadata_filename(namespace.as_ref()),
        login_url: resolver.login_url(),
        certificate_pem: state.idp.credentials.certificate_pem(),
    };

    render(&template)
}

/// Shows the mock login page.
pub async fn login_page(
    State(state): State<AppState>,
    TenantNamespace(namespace): TenantNamespace,
    Query(params): Query<LoginParams>,
) -> Response {
    let resolver = state.idp.resolver(namespace.as_ref());

    let template = LoginTemplate {
        namespace: namespace.as_ref().map(ToString::to_string).unwrap_or_default(),
        auth_url: resolver.auth_url(),
        id: params.id.unwrap_or_default(),
        audience: params.audience.unwrap_or_default(),
        acs_url: params.acs_url.unwrap_or_default(),
        provider_name: params.provider_name.unwrap_or_default(),
        relay_state: params.relay_state.unwrap_or_default(),
        domains: LOGIN_DOMAINS.to_vec(),
        default_acs_url: DEFAULT_ACS_URL,
        default_audience: DEFAULT_LOGIN_AUDIENCE,
    };

    render(&template)
}

fn render(template: &impl Template) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}
