//! Single Sign-On endpoint.
//!
//! Accepts an AuthnRequest over either binding and hands the browser over to
//! the mock login page with the request details prefilled.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::bindings::{DecodedMessage, HttpPostBinding, HttpRedirectBinding};
use crate::error::SamlResult;
use crate::types::{parse_authn_request, Namespace, ParsedAuthnRequest};

use super::state::{SamlState, TenantNamespace};

/// Query parameters for SSO redirect binding.
#[derive(Debug, Default, Deserialize)]
pub struct SsoRedirectParams {
    /// The SAML request (deflated, base64, URL-encoded).
    #[serde(rename = "SAMLRequest")]
    pub saml_request: Option<String>,

    /// Relay state.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

/// Form data for SSO POST binding.
#[derive(Debug, Default, Deserialize)]
pub struct SsoPostForm {
    /// The SAML request (base64-encoded).
    #[serde(rename = "SAMLRequest")]
    pub saml_request: Option<String>,

    /// Relay state.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

/// GET handler for SSO (HTTP-Redirect binding).
pub async fn sso_redirect(
    State(state): State<SamlState>,
    TenantNamespace(namespace): TenantNamespace,
    Query(params): Query<SsoRedirectParams>,
) -> SamlResult<Response> {
    let message = HttpRedirectBinding::decode(
        params.saml_request.as_deref(),
        params.relay_state.as_deref(),
    )?;
    redirect_to_login(&state, namespace.as_ref(), message)
}

/// POST handler for SSO (HTTP-POST binding).
pub async fn sso_post(
    State(state): State<SamlState>,
    TenantNamespace(namespace): TenantNamespace,
    Form(form): Form<SsoPostForm>,
) -> SamlResult<Response> {
    let message = HttpPostBinding::decode(
        form.saml_request.as_deref(),
        None,
        form.relay_state.as_deref(),
    )?;
    redirect_to_login(&state, namespace.as_ref(), message)
}

fn redirect_to_login(
    state: &SamlState,
    namespace: Option<&Namespace>,
    message: DecodedMessage,
) -> SamlResult<Response> {
    let request = parse_authn_request(&message.xml)?;

    tracing::debug!(
        request_id = %request.id,
        issuer = %request.issuer,
        acs_url = ?request.acs_url,
        "Received AuthnRequest"
    );

    let login_url = state.idp.resolver(namespace).login_url();
    let location = login_location(&login_url, &request, message.relay_state.as_deref());

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds the login page URL carrying the request details as query parameters.
///
/// The service provider's issuer becomes the audience of the eventual assertion.
pub(crate) fn login_location(
    login_url: &str,
    request: &ParsedAuthnRequest,
    relay_state: Option<&str>,
) -> String {
    let params = [
        ("id", Some(request.id.as_str())),
        ("audience", Some(request.issuer.as_str())),
        ("acsUrl", request.acs_url.as_deref()),
        ("providerName", request.provider_name.as_deref()),
        ("relayState", relay_state),
    ];

    let query = params
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={}", urlencoding::encode(v))))
        .collect::<Vec<_>>()
        .join("&");

    format!("{login_url}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_location_carries_request_details() {
        let request = ParsedAuthnRequest::new("https://sp.example")
            .with_acs_url("https://sp.example/acs");
        let location = login_location(
            "http://localhost:4000/saml/login",
            &request,
            Some("a b"),
        );

        assert!(location.starts_with("http://localhost:4000/saml/login?id="));
        assert!(location.contains("&audience=https%3A%2F%2Fsp.example&"));
        assert!(location.contains("&acsUrl=https%3A%2F%2Fsp.example%2Facs"));
        assert!(location.ends_with("&relayState=a%20b"));
        assert!(!location.contains("providerName"));
    }
}
