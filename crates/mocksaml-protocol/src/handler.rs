//! Authentication request handling.
//!
//! Turns a simulated login into the document the browser posts to the service
//! provider. Email is the only real input: no password is ever checked.

use crate::bindings::HttpPostBinding;
use crate::builder::build_signed_response;
use crate::error::SamlResult;
use crate::identity::IdpConfig;
use crate::types::{AuthRequest, Namespace};

/// Handles a simulated login for a namespace and returns the auto-submit HTML.
///
/// Every call issues a new assertion, even for identical input.
///
/// # Errors
///
/// - [`SamlError::Validation`](crate::SamlError::Validation) if `email` or
///   `acsUrl` is missing or malformed, or `audience` is blank
/// - [`SamlError::Signing`](crate::SamlError::Signing) if the key cannot sign
pub fn handle_auth_request(
    request: &AuthRequest,
    namespace: Option<&Namespace>,
    config: &IdpConfig,
) -> SamlResult<String> {
    let validated = request.validate().inspect_err(|e| {
        tracing::debug!(error = %e, "Rejected login submission");
    })?;

    let issuer = config.resolver(namespace).entity_id();

    tracing::info!(
        issuer = %issuer,
        acs_url = %validated.acs_url,
        audience = %validated.audience,
        in_response_to = ?validated.in_response_to,
        "Issuing SAML response"
    );

    let encoded = build_signed_response(
        &issuer,
        validated.acs_url,
        validated.email,
        validated.audience,
        validated.in_response_to,
        &config.credentials,
    )
    .inspect_err(|e| {
        tracing::error!(error = %e, issuer = %issuer, "Failed to sign SAML response");
    })?;

    Ok(HttpPostBinding::encode_response(
        &encoded,
        validated.acs_url,
        validated.relay_state,
    ))
}

#[cfg(test)]
mod tests {
    use base64::Engine;

    use super::*;
    use crate::error::SamlError;
    use crate::signature::{SigningCredentials, XmlSignatureValidator};
    use crate::testing;
    use crate::types::DEFAULT_AUDIENCE;
    use crate::xml::{parse_document, XmlElement};

    fn form_field(html: &str, name: &str) -> Option<String> {
        let marker = format!("name=\"{name}\" value=\"");
        let start = html.find(&marker)? + marker.len();
        let end = html[start..].find('"')?;
        Some(html[start..start + end].to_string())
    }

    fn posted_response(html: &str) -> String {
        let encoded = form_field(html, "SAMLResponse").unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
        String::from_utf8(decoded).unwrap()
    }

    fn jackson() -> AuthRequest {
        AuthRequest::new("jackson@example.com", "https://sp.example/acs")
            .with_audience("https://sp.example")
    }

    fn issuer_of(xml: &str) -> String {
        parse_document(xml)
            .unwrap()
            .find_child("Assertion")
            .and_then(|assertion| assertion.find_child("Issuer"))
            .map(XmlElement::text_content)
            .unwrap()
    }

    #[test]
    fn jackson_login_posts_signed_response_to_acs() {
        let config = testing::idp_config();
        let html = handle_auth_request(&jackson(), None, &config).unwrap();

        assert!(html.contains(r#"action="https://sp.example/acs""#));

        let xml = posted_response(&html);
        XmlSignatureValidator::new().validate(&xml).unwrap();

        let root = parse_document(&xml).unwrap();
        assert_eq!(root.attribute("InResponseTo"), None);
        assert_eq!(
            root.find_descendant("NameID").map(XmlElement::text_content),
            Some("jackson@example.com".to_string())
        );
        assert_eq!(
            root.find_descendant("Audience").map(XmlElement::text_content),
            Some("https://sp.example".to_string())
        );
        assert_eq!(issuer_of(&xml), testing::ENTITY_ID);
    }

    #[test]
    fn namespace_changes_only_the_issuer() {
        let config = testing::idp_config();
        let tenant_a = Namespace::parse("tenantA").unwrap();
        let tenant_b = Namespace::parse("tenantB").unwrap();

        let plain = posted_response(&handle_auth_request(&jackson(), None, &config).unwrap());
        let a = posted_response(&handle_auth_request(&jackson(), Some(&tenant_a), &config).unwrap());
        let b = posted_response(&handle_auth_request(&jackson(), Some(&tenant_b), &config).unwrap());

        let issuers = [issuer_of(&plain), issuer_of(&a), issuer_of(&b)];
        assert_ne!(issuers[0], issuers[1]);
        assert_ne!(issuers[0], issuers[2]);
        assert_ne!(issuers[1], issuers[2]);

        for xml in [&plain, &a, &b] {
            let root = parse_document(xml).unwrap();
            assert_eq!(
                root.find_descendant("NameID").map(XmlElement::text_content),
                Some("jackson@example.com".to_string())
            );
            assert_eq!(
                root.find_descendant("Audience").map(XmlElement::text_content),
                Some("https://sp.example".to_string())
            );
        }
    }

    #[test]
    fn request_id_and_relay_state_are_echoed() {
        let config = testing::idp_config();
        let request = jackson().with_id("_req123").with_relay_state("back-to=/home");
        let html = handle_auth_request(&request, None, &config).unwrap();

        assert_eq!(form_field(&html, "RelayState").as_deref(), Some("back-to=/home"));
        let root = parse_document(&posted_response(&html)).unwrap();
        assert_eq!(root.attribute("InResponseTo"), Some("_req123"));
    }

    #[test]
    fn missing_audience_uses_placeholder() {
        let config = testing::idp_config();
        let request = AuthRequest::new("jackson@example.com", "https://sp.example/acs");
        let xml = posted_response(&handle_auth_request(&request, None, &config).unwrap());

        let root = parse_document(&xml).unwrap();
        assert_eq!(
            root.find_descendant("Audience").map(XmlElement::text_content),
            Some(DEFAULT_AUDIENCE.to_string())
        );
    }

    #[test]
    fn missing_email_or_acs_url_is_a_validation_error() {
        let config = testing::idp_config();

        let no_email = AuthRequest {
            acs_url: Some("https://sp.example/acs".to_string()),
            ..AuthRequest::default()
        };
        assert!(matches!(
            handle_auth_request(&no_email, None, &config),
            Err(SamlError::Validation(_))
        ));

        let no_acs = AuthRequest {
            email: Some("jackson@example.com".to_string()),
            ..AuthRequest::default()
        };
        assert!(matches!(
            handle_auth_request(&no_acs, None, &config),
            Err(SamlError::Validation(_))
        ));
    }

    #[test]
    fn bad_key_is_a_signing_error() {
        let material = testing::key_material();
        let credentials =
            SigningCredentials::new(material.certificate_der.clone(), b"bad".to_vec()).unwrap();
        let config = IdpConfig::new(testing::APP_URL, testing::ENTITY_ID, credentials);

        assert!(matches!(
            handle_auth_request(&jackson(), None, &config),
            Err(SamlError::Signing(_))
        ));
    }
}
