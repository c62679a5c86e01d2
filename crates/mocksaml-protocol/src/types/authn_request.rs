//! SAML AuthnRequest types.
//!
//! The mock only reads the handful of fields it forwards to the login page;
//! everything else in an incoming request is ignored.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{format_instant, generate_id, SAMLP_NS, SAML_NS, SAML_VERSION};
use crate::error::{SamlError, SamlResult};
use crate::xml::{parse_document, XmlElement, XML_DECLARATION};

/// The parts of an AuthnRequest the identity provider acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAuthnRequest {
    /// Request ID, echoed back as `InResponseTo`.
    pub id: String,

    /// Entity ID of the requesting service provider.
    pub issuer: String,

    /// Where the response should be posted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acs_url: Option<String>,

    /// Human-readable name of the service provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
}

impl ParsedAuthnRequest {
    /// Creates a request with a fresh ID.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            issuer: issuer.into(),
            acs_url: None,
            provider_name: None,
        }
    }

    /// Sets the assertion consumer service URL.
    #[must_use]
    pub fn with_acs_url(mut self, acs_url: impl Into<String>) -> Self {
        self.acs_url = Some(acs_url.into());
        self
    }

    /// Sets the provider name.
    #[must_use]
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    /// Serializes the request as an XML document, the way a service provider sends it.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let element = XmlElement::new("samlp:AuthnRequest")
            .declare("samlp", SAMLP_NS)
            .declare("saml", SAML_NS)
            .attr_opt("AssertionConsumerServiceURL", self.acs_url.as_deref())
            .attr("ID", self.id.as_str())
            .attr("IssueInstant", format_instant(Utc::now()))
            .attr_opt("ProviderName", self.provider_name.as_deref())
            .attr("Version", SAML_VERSION)
            .child(XmlElement::new("saml:Issuer").text(self.issuer.as_str()));

        format!("{XML_DECLARATION}{}", element.to_canonical_string())
    }
}

/// Parses an AuthnRequest document.
///
/// The root must be an `AuthnRequest` carrying an `ID` attribute and an
/// `Issuer` child; anything else is an invalid request.
pub fn parse_authn_request(xml: &str) -> SamlResult<ParsedAuthnRequest> {
    let root = parse_document(xml)?;

    if root.local_name() != "AuthnRequest" {
        return Err(SamlError::InvalidRequest(format!(
            "expected AuthnRequest, found {}",
            root.local_name()
        )));
    }

    let id = root
        .attribute("ID")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SamlError::InvalidRequest("AuthnRequest has no ID".to_string()))?;

    let issuer = root
        .find_child("Issuer")
        .map(|issuer| issuer.text_content().trim().to_string())
        .filter(|issuer| !issuer.is_empty())
        .ok_or_else(|| SamlError::InvalidRequest("AuthnRequest has no Issuer".to_string()))?;

    Ok(ParsedAuthnRequest {
        id: id.to_string(),
        issuer,
        acs_url: root
            .attribute("AssertionConsumerServiceURL")
            .map(str::to_string),
        provider_name: root.attribute("ProviderName").map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typical_request() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<samlp:AuthnRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol"
    xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"
    ID="_8e8dc5f69a98cc4c1ff3427e5ce34606fd672f91e6"
    Version="2.0"
    ProviderName="SP test"
    IssueInstant="2014-07-16T23:52:45Z"
    Destination="http://localhost:4000/saml/sso"
    ProtocolBinding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST"
    AssertionConsumerServiceURL="https://sp.example/acs">
  <saml:Issuer>https://sp.example</saml:Issuer>
  <samlp:NameIDPolicy Format="urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress" AllowCreate="true"/>
</samlp:AuthnRequest>"#;

        let request = parse_authn_request(xml).unwrap();
        assert_eq!(request.id, "_8e8dc5f69a98cc4c1ff3427e5ce34606fd672f91e6");
        assert_eq!(request.issuer, "https://sp.example");
        assert_eq!(request.acs_url.as_deref(), Some("https://sp.example/acs"));
        assert_eq!(request.provider_name.as_deref(), Some("SP test"));
    }

    #[test]
    fn generated_request_parses_back() {
        let request = ParsedAuthnRequest::new("https://sp.example")
            .with_acs_url("https://sp.example/acs")
            .with_provider_name("Example SP");

        assert_eq!(parse_authn_request(&request.to_xml()).unwrap(), request);
    }

    #[test]
    fn missing_id_or_issuer_is_invalid() {
        let no_id = r#"<samlp:AuthnRequest xmlns:samlp="urn:p"><saml:Issuer xmlns:saml="urn:a">sp</saml:Issuer></samlp:AuthnRequest>"#;
        assert!(matches!(
            parse_authn_request(no_id),
            Err(SamlError::InvalidRequest(_))
        ));

        let no_issuer = r#"<samlp:AuthnRequest xmlns:samlp="urn:p" ID="_1"></samlp:AuthnRequest>"#;
        assert!(matches!(
            parse_authn_request(no_issuer),
            Err(SamlError::InvalidRequest(_))
        ));
    }

    #[test]
    fn other_messages_are_rejected() {
        let xml = r#"<samlp:LogoutRequest xmlns:samlp="urn:p" ID="_1"/>"#;
        assert!(matches!(
            parse_authn_request(xml),
            Err(SamlError::InvalidRequest(_))
        ));
        assert!(matches!(
            parse_authn_request("<broken"),
            Err(SamlError::XmlParse(_))
        ));
    }
}
