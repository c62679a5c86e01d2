//! Signed SAML Response construction.
//!
//! Every call issues a fresh Assertion and Response: new IDs, `IssueInstant`
//! of now, and a short fixed validity window. The Assertion is signed with an
//! enveloped RSA-SHA256 signature over Exclusive C14N, placed right after its
//! `Issuer`; the Response envelope is not signed.

use base64::Engine;
use chrono::Duration;

use crate::error::SamlResult;
use crate::signature::{SigningCredentials, XmlSigner};
use crate::types::{
    generate_id, issue_instant, Assertion, Attribute, AttributeStatement, AuthnContextClass, AuthnStatement,
    Conditions, NameId, Response, Subject, SubjectConfirmation, SubjectConfirmationData,
};
use crate::xml::XML_DECLARATION;

/// How long an issued assertion stays valid.
pub const ASSERTION_VALIDITY: Duration = Duration::minutes(5);

/// Builds a signed SAML Response and returns it base64-encoded.
///
/// `in_response_to` is echoed on the Response and on the subject confirmation
/// when present; it is never fabricated.
///
/// # Errors
///
/// Returns [`SamlError::Signing`](crate::SamlError::Signing) if the private key
/// cannot sign. No unsigned document is ever returned.
pub fn build_signed_response(
    issuer: &str,
    destination: &str,
    email: &str,
    audience: &str,
    in_response_to: Option<&str>,
    credentials: &SigningCredentials,
) -> SamlResult<String> {
    let xml = build_signed_response_xml(issuer, destination, email, audience, in_response_to, credentials)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(xml))
}

/// Builds a signed SAML Response document (not encoded).
pub fn build_signed_response_xml(
    issuer: &str,
    destination: &str,
    email: &str,
    audience: &str,
    in_response_to: Option<&str>,
    credentials: &SigningCredentials,
) -> SamlResult<String> {
    let now = issue_instant();
    let expiry = now + ASSERTION_VALIDITY;

    let mut confirmation_data = SubjectConfirmationData::new(destination, expiry);
    if let Some(id) = in_response_to {
        confirmation_data = confirmation_data.with_in_response_to(id);
    }

    let assertion = Assertion::issued_at(issuer, now)
        .with_subject(
            Subject::new(NameId::email(email))
                .with_confirmation(SubjectConfirmation::bearer(confirmation_data)),
        )
        .with_conditions(Conditions::with_validity(now, ASSERTION_VALIDITY).with_audience(audience))
        .with_authn_statement(
            AuthnStatement::new(now, AuthnContextClass::PasswordProtectedTransport)
                .with_session_index(generate_id()),
        )
        .with_attribute_statement(user_attributes(email));

    let mut assertion_element = assertion.to_element();
    XmlSigner::new(credentials).sign_element(&mut assertion_element)?;

    let mut response = Response::success(issuer, now)
        .with_destination(destination)
        .with_assertion(assertion_element);
    if let Some(id) = in_response_to {
        response = response.in_response_to(id);
    }

    tracing::debug!(
        response_id = %response.id,
        assertion_id = %assertion.id,
        "Built signed SAML response"
    );

    Ok(format!("{XML_DECLARATION}{}", response.to_element().to_canonical_string()))
}

/// Attributes asserted for a mock user: a stable `id` derived from the email,
/// the email itself, and the local part as both first and last name.
fn user_attributes(email: &str) -> AttributeStatement {
    let local_part = email.split_once('@').map_or(email, |(local, _)| local);
    let id = hex::encode(mocksaml_crypto::sha256(email.as_bytes()));

    AttributeStatement::new()
        .with_attribute(Attribute::new("id", id))
        .with_attribute(Attribute::new("email", email))
        .with_attribute(Attribute::new("firstName", local_part))
        .with_attribute(Attribute::new("lastName", local_part))
}
