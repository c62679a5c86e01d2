//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.
//! Only the signing key pair is mandatory.

use anyhow::Context;
use mocksaml_protocol::{IdpConfig, SigningCredentials};

/// Default public base URL.
pub const DEFAULT_APP_URL: &str = "http://localhost:4000";

/// Default base Entity ID.
pub const DEFAULT_ENTITY_ID: &str = "https://saml.example.com/entityid";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Public base URL (used in advertised SSO and page URLs).
    pub app_url: String,

    /// Base IdP Entity ID, before namespacing.
    pub entity_id: String,

    /// Signing certificate and private key.
    pub credentials: SigningCredentials,

    /// CORS allowed origins (comma-separated in the environment).
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// `PUBLIC_KEY` and `PRIVATE_KEY` hold base64-encoded PEM documents. The
    /// certificate must parse; the key is only decoded here and checked when
    /// the server starts.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("MOCKSAML_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_port(std::env::var("MOCKSAML_PORT").ok().as_deref())?;

        let app_url = std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string());
        let entity_id =
            std::env::var("ENTITY_ID").unwrap_or_else(|_| DEFAULT_ENTITY_ID.to_string());

        let public_key = std::env::var("PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("PUBLIC_KEY environment variable is required"))?;
        let private_key = std::env::var("PRIVATE_KEY")
            .map_err(|_| anyhow::anyhow!("PRIVATE_KEY environment variable is required"))?;

        let credentials = SigningCredentials::from_base64_pem(&public_key, &private_key)
            .context("invalid PUBLIC_KEY/PRIVATE_KEY")?;

        let cors_origins = std::env::var("MOCKSAML_CORS_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            host,
            port,
            app_url,
            entity_id,
            credentials,
            cors_origins,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing(credentials: SigningCredentials) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            app_url: DEFAULT_APP_URL.to_string(),
            entity_id: DEFAULT_ENTITY_ID.to_string(),
            credentials,
            cors_origins: vec!["*".to_string()],
        }
    }

    /// Returns the identity provider configuration derived from this server config.
    #[must_use]
    pub fn idp_config(&self) -> IdpConfig {
        IdpConfig::new(
            self.app_url.as_str(),
            self.entity_id.as_str(),
            self.credentials.clone(),
        )
    }

    /// Whether any origin may make cross-origin requests.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Default listen port.
pub const DEFAULT_PORT: u16 = 4000;

/// Parses `MOCKSAML_PORT`. Unset means the default; anything unparsable is an error.
fn parse_port(raw: Option<&str>) -> anyhow::Result<u16> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(p) => p
            .trim()
            .parse()
            .with_context(|| format!("invalid MOCKSAML_PORT '{p}'")),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
