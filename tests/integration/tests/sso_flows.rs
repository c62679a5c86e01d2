//! SP-initiated SSO flow integration tests.
//!
//! A service provider sends an AuthnRequest to the SSO URL, the browser lands
//! on the login page, and the login answers the original request.

use std::collections::HashMap;

use serde_json::json;

use mocksaml_protocol::bindings::HttpRedirectBinding;
use mocksaml_protocol::types::ParsedAuthnRequest;
use mocksaml_protocol::xml::parse_document;

use crate::common::{assertion_issuer, descendant_text, posted_response, TestEnv};

const SP_ENTITY_ID: &str = "https://sp.example/metadata";
const SP_ACS_URL: &str = "https://sp.example/acs";

fn query_pairs(location: &str) -> anyhow::Result<HashMap<String, String>> {
    let url = url::Url::parse(location)?;
    Ok(url.query_pairs().into_owned().collect())
}

async fn login_location(env: &TestEnv, response: reqwest::Response) -> anyhow::Result<String> {
    anyhow::ensure!(
        response.status().as_u16() == 302,
        "expected 302 from {}, got {}",
        env.base_url,
        response.status()
    );
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| anyhow::anyhow!("no Location header"))?;
    Ok(location.to_string())
}

/// Tests the HTTP-Redirect binding through to a signed response.
#[tokio::test]
async fn test_redirect_binding_flow() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let request = ParsedAuthnRequest::new(SP_ENTITY_ID)
        .with_acs_url(SP_ACS_URL)
        .with_provider_name("Example SP");
    let sso_url = HttpRedirectBinding::encode_request(
        &request.to_xml(),
        &env.url("/namespace/acme/saml/sso"),
        Some("return-to"),
    )?;

    let response = env.client.get(sso_url).send().await?;
    let location = login_location(&env, response).await?;
    assert!(location.starts_with(&env.url("/namespace/acme/saml/login?")));

    let params = query_pairs(&location)?;
    assert_eq!(params.get("id"), Some(&request.id));
    assert_eq!(params.get("audience").map(String::as_str), Some(SP_ENTITY_ID));
    assert_eq!(params.get("acsUrl").map(String::as_str), Some(SP_ACS_URL));
    assert_eq!(params.get("providerName").map(String::as_str), Some("Example SP"));
    assert_eq!(params.get("relayState").map(String::as_str), Some("return-to"));

    let page = env.client.get(&location).send().await?;
    assert!(page.status().is_success());
    let page = page.text().await?;
    assert!(page.contains(&format!(
        r#"data-action="{}""#,
        env.url("/namespace/acme/saml/auth")
    )));

    let html = env
        .login(
            "/namespace/acme/saml/auth",
            json!({
                "email": "jackson@example.com",
                "acsUrl": params["acsUrl"],
                "audience": params["audience"],
                "id": params["id"],
                "relayState": params["relayState"],
            }),
        )
        .await?;

    let xml = posted_response(&html)?;
    env.verify(&xml)?;

    let root = parse_document(&xml)?;
    assert_eq!(root.attribute("InResponseTo"), Some(request.id.as_str()));
    assert_eq!(root.attribute("Destination"), Some(SP_ACS_URL));
    assert_eq!(
        assertion_issuer(&xml)?.as_deref(),
        Some("https://saml.example.com/entityid/acme")
    );
    assert_eq!(descendant_text(&xml, "Audience")?.as_deref(), Some(SP_ENTITY_ID));

    Ok(())
}

/// Tests the HTTP-POST binding of the SSO endpoint.
#[tokio::test]
async fn test_post_binding_forwards_to_login() -> anyhow::Result<()> {
    use base64::Engine;

    let env = TestEnv::new().await?;

    let request = ParsedAuthnRequest::new(SP_ENTITY_ID).with_acs_url(SP_ACS_URL);
    let encoded = base64::engine::general_purpose::STANDARD.encode(request.to_xml());

    let response = env
        .client
        .post(env.url("/saml/sso"))
        .form(&[("SAMLRequest", encoded.as_str()), ("RelayState", "state")])
        .send()
        .await?;

    let location = login_location(&env, response).await?;
    assert!(location.starts_with(&env.url("/saml/login?")));

    let params = query_pairs(&location)?;
    assert_eq!(params.get("id"), Some(&request.id));
    assert_eq!(params.get("relayState").map(String::as_str), Some("state"));
    assert!(!params.contains_key("providerName"));

    Ok(())
}

/// Tests that a malformed AuthnRequest is rejected.
#[tokio::test]
async fn test_malformed_authn_request_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let url = HttpRedirectBinding::encode_request(
        "<samlp:LogoutRequest xmlns:samlp=\"urn:oasis:names:tc:SAML:2.0:protocol\"/>",
        &env.url("/saml/sso"),
        None,
    )?;

    let response = env.client.get(url).send().await?;
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "invalid_request");

    Ok(())
}
