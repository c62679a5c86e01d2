//! SAML endpoint integration tests.
//!
//! Metadata, login submission and error handling over real HTTP.

use serde_json::json;

use crate::common::{
    assertion_issuer, descendant_text, form_field, posted_response, TestEnv, ENTITY_ID,
};

/// Tests that the IdP metadata endpoint returns the advertised identity.
#[tokio::test]
async fn test_saml_metadata_endpoint() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env.client.get(env.url("/saml/metadata")).send().await?;

    assert!(
        response.status().is_success(),
        "Expected success status, got {}",
        response.status()
    );

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq!(content_type, "application/xml");
    assert!(response.headers().get("content-disposition").is_none());

    let body = response.text().await?;
    assert!(body.starts_with("<?xml"));
    assert!(body.contains(&format!(r#"entityID="{ENTITY_ID}""#)));
    assert!(body.contains("IDPSSODescriptor"));
    assert!(body.contains("X509Certificate"));
    assert!(body.contains(&format!(r#"Location="{}/saml/sso""#, env.base_url)));

    Ok(())
}

/// Tests that metadata is stable across requests.
#[tokio::test]
async fn test_saml_metadata_is_deterministic() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let first = env.client.get(env.url("/namespace/acme/saml/metadata")).send().await?.text().await?;
    let second = env.client.get(env.url("/namespace/acme/saml/metadata")).send().await?.text().await?;

    assert_eq!(first, second);
    assert!(first.contains(&format!(r#"entityID="{ENTITY_ID}/acme""#)));
    assert!(first.contains(&format!(r#"Location="{}/namespace/acme/saml/sso""#, env.base_url)));

    Ok(())
}

/// Tests the metadata download variant.
#[tokio::test]
async fn test_saml_metadata_download() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .get(env.url("/namespace/acme/saml/metadata?download=true"))
        .send()
        .await?;

    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq!(disposition, r#"attachment; filename="mock-saml-metadata-acme.xml""#);

    Ok(())
}

/// Tests an IdP-initiated login end to end.
#[tokio::test]
async fn test_idp_initiated_login() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let html = env
        .login(
            "/saml/auth",
            json!({
                "email": "jackson@example.com",
                "acsUrl": "https://sp.example/acs",
                "audience": "https://sp.example",
                "relayState": "dashboard",
            }),
        )
        .await?;

    assert!(html.contains(r#"action="https://sp.example/acs""#));
    assert_eq!(form_field(&html, "RelayState").as_deref(), Some("dashboard"));

    let xml = posted_response(&html)?;
    env.verify(&xml)?;

    assert_eq!(assertion_issuer(&xml)?.as_deref(), Some(ENTITY_ID));
    assert_eq!(
        descendant_text(&xml, "NameID")?.as_deref(),
        Some("jackson@example.com")
    );
    assert_eq!(
        descendant_text(&xml, "Audience")?.as_deref(),
        Some("https://sp.example")
    );

    Ok(())
}

/// Tests that two tenants get different issuers for the same login.
#[tokio::test]
async fn test_namespaced_logins_use_distinct_issuers() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let body = json!({
        "email": "jackson@example.com",
        "acsUrl": "https://sp.example/acs",
        "audience": "https://sp.example",
    });

    let a = posted_response(&env.login("/namespace/tenantA/saml/auth", body.clone()).await?)?;
    let b = posted_response(&env.login("/namespace/tenantB/saml/auth", body).await?)?;

    env.verify(&a)?;
    env.verify(&b)?;

    let issuer_a = assertion_issuer(&a)?;
    let issuer_b = assertion_issuer(&b)?;
    assert_eq!(issuer_a.as_deref(), Some("https://saml.example.com/entityid/tenantA"));
    assert_eq!(issuer_b.as_deref(), Some("https://saml.example.com/entityid/tenantB"));

    Ok(())
}

/// Tests that a login without an email is rejected.
#[tokio::test]
async fn test_login_validation_error() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .post(env.url("/saml/auth"))
        .json(&json!({ "acsUrl": "https://sp.example/acs" }))
        .send()
        .await?;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "validation_error");
    assert!(body["error_description"].as_str().is_some());

    Ok(())
}

/// Tests that an unsafe namespace token is rejected before any work is done.
#[tokio::test]
async fn test_invalid_namespace_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .get(env.url("/namespace/bad%20tenant/saml/metadata"))
        .send()
        .await?;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "invalid_namespace");

    Ok(())
}

/// Tests the health endpoints.
#[tokio::test]
async fn test_health_endpoints() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    for path in ["/health", "/health/live", "/health/ready"] {
        let response = env.client.get(env.url(path)).send().await?;
        assert!(response.status().is_success(), "{path} returned {}", response.status());
    }

    let health: serde_json::Value = env.client.get(env.url("/health")).send().await?.json().await?;
    assert_eq!(health["status"], "healthy");

    Ok(())
}
