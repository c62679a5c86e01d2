//! SAML Response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{format_instant, generate_id, Status, SAMLP_NS, SAML_NS, SAML_VERSION};
use crate::xml::XmlElement;

/// SAML Response.
///
/// Sent by the IdP to the SP's Assertion Consumer Service. The signed
/// assertion travels as a pre-built element so its signature stays intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Unique identifier for this response.
    pub id: String,

    /// Timestamp when this response was issued.
    pub issue_instant: DateTime<Utc>,

    /// The URL this response is being sent to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// The ID of the request this response answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,

    /// The entity ID of the issuer.
    pub issuer: String,

    /// The status of the response.
    pub status: Status,

    /// Assertion element carried by the response.
    #[serde(skip)]
    pub assertion: Option<XmlElement>,
}

impl Response {
    /// Creates a success response with a fresh ID.
    #[must_use]
    pub fn success(issuer: impl Into<String>, issue_instant: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            issue_instant,
            destination: None,
            in_response_to: None,
            issuer: issuer.into(),
            status: Status::success(),
            assertion: None,
        }
    }

    /// Sets the destination.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Sets the ID of the request this response answers.
    #[must_use]
    pub fn in_response_to(mut self, id: impl Into<String>) -> Self {
        self.in_response_to = Some(id.into());
        self
    }

    /// Attaches an assertion element.
    #[must_use]
    pub fn with_assertion(mut self, assertion: XmlElement) -> Self {
        self.assertion = Some(assertion);
        self
    }

    /// Returns true if this response indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Builds the `samlp:Response` element.
    #[must_use]
    pub fn to_element(&self) -> XmlElement {
        XmlElement::new("samlp:Response")
            .declare("samlp", SAMLP_NS)
            .declare("saml", SAML_NS)
            .attr_opt("Destination", self.destination.as_deref())
            .attr("ID", self.id.as_str())
            .attr_opt("InResponseTo", self.in_response_to.as_deref())
            .attr("IssueInstant", format_instant(self.issue_instant))
            .attr("Version", SAML_VERSION)
            .child(XmlElement::new("saml:Issuer").text(self.issuer.as_str()))
            .child(self.status.to_element())
            .child_opt(self.assertion.clone())
    }
}
