//! Common test utilities and fixtures.

use std::time::Duration;

use base64::Engine;
use reqwest::{redirect, Client};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::sleep;

use mocksaml_protocol::signature::XmlSignatureValidator;
use mocksaml_protocol::xml::{parse_document, XmlElement};
use mocksaml_protocol::SigningCredentials;
use mocksaml_server::{Server, ServerConfig};

/// Base Entity ID the test server is configured with.
pub const ENTITY_ID: &str = "https://saml.example.com/entityid";

/// Test environment running a server on an ephemeral port.
pub struct TestEnv {
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client that does not follow redirects.
    pub client: Client,
    /// DER certificate the server signs with.
    pub certificate_der: Vec<u8>,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Starts a server with freshly generated key material.
    pub async fn new() -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("mocksaml_server=debug,mocksaml_protocol=debug")
            .try_init();

        let key_pair = rcgen::KeyPair::generate_for(&rcgen::PKCS_RSA_SHA256)?;
        let certificate =
            rcgen::CertificateParams::new(vec!["mocksaml.test".to_string()])?.self_signed(&key_pair)?;
        let certificate_der = certificate.der().to_vec();
        let credentials =
            SigningCredentials::from_pem(&certificate.pem(), &key_pair.serialize_pem())?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let mut config = ServerConfig::for_testing(credentials);
        config.app_url = base_url.clone();
        config.entity_id = ENTITY_ID.to_string();

        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        let server = Server::new(config);
        tokio::spawn(async move {
            tokio::select! {
                result = server.serve(listener) => {
                    if let Err(e) = result {
                        tracing::error!("Server error: {}", e);
                    }
                }
                _ = shutdown_rx => {
                    tracing::info!("Server shutdown requested");
                }
            }
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(redirect::Policy::none())
            .build()?;

        wait_for_server(&client, &base_url).await?;

        Ok(Self {
            base_url,
            client,
            certificate_der,
            _shutdown_tx,
        })
    }

    /// Absolute URL for a server path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submits a login as JSON and returns the auto-submit page.
    pub async fn login(&self, path: &str, body: serde_json::Value) -> anyhow::Result<String> {
        let response = self.client.post(self.url(path)).json(&body).send().await?;
        anyhow::ensure!(
            response.status().is_success(),
            "login failed with {}",
            response.status()
        );
        Ok(response.text().await?)
    }

    /// Verifies the signature of a response document against the server's certificate.
    pub fn verify(&self, xml: &str) -> anyhow::Result<()> {
        XmlSignatureValidator::with_trusted_certificate(self.certificate_der.clone())
            .validate(xml)?;
        Ok(())
    }
}

/// Extracts a hidden form field from an auto-submit page.
pub fn form_field(html: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{name}\" value=\"");
    let start = html.find(&marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}

/// Decodes the posted `SAMLResponse` of an auto-submit page.
pub fn posted_response(html: &str) -> anyhow::Result<String> {
    let encoded = form_field(html, "SAMLResponse")
        .ok_or_else(|| anyhow::anyhow!("no SAMLResponse field"))?;
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded)?;
    Ok(String::from_utf8(decoded)?)
}

/// Text of the first descendant with the given local name.
pub fn descendant_text(xml: &str, local_name: &str) -> anyhow::Result<Option<String>> {
    let root = parse_document(xml)?;
    Ok(root.find_descendant(local_name).map(XmlElement::text_content))
}

/// Issuer of the assertion inside a response document.
pub fn assertion_issuer(xml: &str) -> anyhow::Result<Option<String>> {
    let root = parse_document(xml)?;
    Ok(root
        .find_child("Assertion")
        .and_then(|assertion| assertion.find_child("Issuer"))
        .map(XmlElement::text_content))
}

/// Waits until the server answers health checks.
async fn wait_for_server(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let health_url = format!("{base_url}/health/ready");

    for _ in 0..50 {
        if let Ok(response) = client.get(&health_url).send().await {
            if response.status().is_success() {
                return Ok(());
            }
        }
        sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("server at {base_url} did not become ready")
}
