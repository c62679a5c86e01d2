//! Simulated login submission.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{SamlError, SamlResult};

/// Audience used when the login submission does not name one.
pub const DEFAULT_AUDIENCE: &str = "https://saml.example.com/entityid";

/// A simulated login, as posted by the mock login page.
///
/// There is no password field: the mock never checks one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Email of the user to assert.
    #[serde(default)]
    pub email: Option<String>,

    /// Assertion Consumer Service URL of the service provider.
    #[serde(default)]
    pub acs_url: Option<String>,

    /// Service provider entity ID.
    #[serde(default)]
    pub audience: Option<String>,

    /// ID of the AuthnRequest being answered, if any.
    #[serde(default)]
    pub id: Option<String>,

    /// Display name of the requesting service provider.
    #[serde(default)]
    pub provider_name: Option<String>,

    /// Opaque relay state to echo back to the service provider.
    #[serde(default)]
    pub relay_state: Option<String>,
}

/// A login submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAuthRequest<'a> {
    /// Subject email.
    pub email: &'a str,
    /// ACS URL the response is posted to.
    pub acs_url: &'a str,
    /// Audience the assertion is restricted to.
    pub audience: &'a str,
    /// Request ID to echo in `InResponseTo`.
    pub in_response_to: Option<&'a str>,
    /// Relay state to post back.
    pub relay_state: Option<&'a str>,
}

impl AuthRequest {
    /// Creates a submission for an email and ACS URL.
    #[must_use]
    pub fn new(email: impl Into<String>, acs_url: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            acs_url: Some(acs_url.into()),
            ..Self::default()
        }
    }

    /// Sets the audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sets the request ID to answer.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the relay state.
    #[must_use]
    pub fn with_relay_state(mut self, relay_state: impl Into<String>) -> Self {
        self.relay_state = Some(relay_state.into());
        self
    }

    /// Checks required fields and applies defaults.
    ///
    /// A blank `id` or `relayState` counts as absent; a missing audience falls
    /// back to [`DEFAULT_AUDIENCE`].
    pub fn validate(&self) -> SamlResult<ValidatedAuthRequest<'_>> {
        let email = non_blank(self.email.as_deref())
            .ok_or_else(|| SamlError::Validation("email is required".to_string()))?;
        validate_email(email)?;

        let acs_url = non_blank(self.acs_url.as_deref())
            .ok_or_else(|| SamlError::Validation("acsUrl is required".to_string()))?;
        validate_acs_url(acs_url)?;

        let audience = match self.audience.as_deref() {
            None => DEFAULT_AUDIENCE,
            Some(audience) => non_blank(Some(audience)).ok_or_else(|| {
                SamlError::Validation("audience must not be blank".to_string())
            })?,
        };

        Ok(ValidatedAuthRequest {
            email,
            acs_url,
            audience,
            in_response_to: non_blank(self.id.as_deref()),
            relay_state: non_blank(self.relay_state.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn validate_email(email: &str) -> SamlResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(SamlError::Validation(format!(
            "email '{email}' is not a valid address"
        )))
    }
}

fn validate_acs_url(acs_url: &str) -> SamlResult<()> {
    let url = Url::parse(acs_url)
        .map_err(|e| SamlError::Validation(format!("acsUrl is not a valid URL: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(SamlError::Validation(format!(
            "acsUrl scheme '{scheme}' is not http or https"
        ))),
    }
}
