//! SAML Assertion types.
//!
//! Assertions contain statements about a subject made by an issuer.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthnContextClass, NameId, SAML_NS, SAML_VERSION};
use crate::xml::XmlElement;

/// Formats an instant the way SAML `dateTime` attributes carry it (UTC, microsecond precision).
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Returns the current time, strictly later than any instant this function
/// returned before in the process.
///
/// Concurrent callers that read the clock within the same microsecond are
/// spread one microsecond apart, so no two issued messages share an instant.
#[must_use]
pub fn issue_instant() -> DateTime<Utc> {
    static LAST_ISSUED: AtomicI64 = AtomicI64::new(i64::MIN);

    let now = Utc::now();
    let now_micros = now.timestamp_micros();
    let mut last = LAST_ISSUED.load(Ordering::Relaxed);
    loop {
        let next = now_micros.max(last.saturating_add(1));
        match LAST_ISSUED.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return DateTime::from_timestamp_micros(next).unwrap_or(now),
            Err(actual) => last = actual,
        }
    }
}

/// Generates a fresh XML ID for a message or assertion.
///
/// IDs must be NCNames, so they start with an underscore.
#[must_use]
pub fn generate_id() -> String {
    format!("_{}", uuid::Uuid::new_v4().simple())
}

/// SAML Assertion.
///
/// A package of information that supplies one or more statements made
/// by a SAML authority (the issuer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    /// Unique identifier for this assertion.
    pub id: String,

    /// Timestamp when this assertion was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the identity provider that issued this assertion.
    pub issuer: String,

    /// The subject of this assertion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,

    /// Conditions that must be evaluated for the assertion to be valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,

    /// Authentication statement describing how the subject authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authn_statement: Option<AuthnStatement>,

    /// Attribute statement containing attributes about the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_statement: Option<AttributeStatement>,
}

impl Assertion {
    /// Creates a new assertion issued now with a fresh ID.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self::issued_at(issuer, Utc::now())
    }

    /// Creates a new assertion with a fresh ID and the given issue instant.
    #[must_use]
    pub fn issued_at(issuer: impl Into<String>, issue_instant: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            issue_instant,
            issuer: issuer.into(),
            subject: None,
            conditions: None,
            authn_statement: None,
            attribute_statement: None,
        }
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Sets the conditions.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Sets the authentication statement.
    #[must_use]
    pub fn with_authn_statement(mut self, statement: AuthnStatement) -> Self {
        self.authn_statement = Some(statement);
        self
    }

    /// Sets the attribute statement.
    #[must_use]
    pub fn with_attribute_statement(mut self, statement: AttributeStatement) -> Self {
        self.attribute_statement = Some(statement);
        self
    }

    /// Builds the `saml:Assertion` element.
    ///
    /// The assertion declares the `saml` prefix itself so it stays
    /// self-contained when canonicalized as the signed subtree.
    #[must_use]
    pub fn to_element(&self) -> XmlElement {
        XmlElement::new("saml:Assertion")
            .declare("saml", SAML_NS)
            .attr("ID", self.id.as_str())
            .attr("IssueInstant", format_instant(self.issue_instant))
            .attr("Version", SAML_VERSION)
            .child(XmlElement::new("saml:Issuer").text(self.issuer.as_str()))
            .child_opt(self.subject.as_ref().map(Subject::to_element))
            .child_opt(self.conditions.as_ref().map(Conditions::to_element))
            .child_opt(self.authn_statement.as_ref().map(AuthnStatement::to_element))
            .child_opt(
                self.attribute_statement
                    .as_ref()
                    .map(AttributeStatement::to_element),
            )
    }
}

/// Subject of an assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// The name identifier for the subject.
    pub name_id: NameId,

    /// Subject confirmation data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_confirmations: Vec<SubjectConfirmation>,
}

impl Subject {
    /// Creates a new subject with a name ID.
    #[must_use]
    pub fn new(name_id: NameId) -> Self {
        Self {
            name_id,
            subject_confirmations: Vec::new(),
        }
    }

    /// Adds a subject confirmation.
    #[must_use]
    pub fn with_confirmation(mut self, confirmation: SubjectConfirmation) -> Self {
        self.subject_confirmations.push(confirmation);
        self
    }

    fn to_element(&self) -> XmlElement {
        self.subject_confirmations.iter().fold(
            XmlElement::new("saml:Subject").child(self.name_id.to_element()),
            |element, confirmation| element.child(confirmation.to_element()),
        )
    }
}

/// Subject confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectConfirmation {
    /// The confirmation method.
    pub method: String,

    /// Additional confirmation data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_confirmation_data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    /// Bearer confirmation method URI.
    pub const BEARER: &'static str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

    /// Creates a bearer confirmation.
    #[must_use]
    pub fn bearer(data: SubjectConfirmationData) -> Self {
        Self {
            method: Self::BEARER.to_string(),
            subject_confirmation_data: Some(data),
        }
    }

    fn to_element(&self) -> XmlElement {
        XmlElement::new("saml:SubjectConfirmation")
            .attr("Method", self.method.as_str())
            .child_opt(
                self.subject_confirmation_data
                    .as_ref()
                    .map(SubjectConfirmationData::to_element),
            )
    }
}

/// Data constraining how the subject may be confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectConfirmationData {
    /// Time instant at which the subject can no longer be confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// URI of the endpoint the assertion may be presented to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    /// ID of the request this assertion answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,
}

impl SubjectConfirmationData {
    /// Creates confirmation data bound to a recipient.
    #[must_use]
    pub fn new(recipient: impl Into<String>, not_on_or_after: DateTime<Utc>) -> Self {
        Self {
            not_on_or_after: Some(not_on_or_after),
            recipient: Some(recipient.into()),
            in_response_to: None,
        }
    }

    /// Sets the request ID this confirmation answers.
    #[must_use]
    pub fn with_in_response_to(mut self, id: impl Into<String>) -> Self {
        self.in_response_to = Some(id.into());
        self
    }

    fn to_element(&self) -> XmlElement {
        XmlElement::new("saml:SubjectConfirmationData")
            .attr_opt("InResponseTo", self.in_response_to.as_deref())
            .attr_opt("NotOnOrAfter", self.not_on_or_after.map(format_instant))
            .attr_opt("Recipient", self.recipient.as_deref())
    }
}

/// Conditions under which an assertion is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conditions {
    /// Earliest instant the assertion is valid.
    pub not_before: DateTime<Utc>,

    /// Instant at which the assertion expires.
    pub not_on_or_after: DateTime<Utc>,

    /// Audiences the assertion is addressed to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,
}

impl Conditions {
    /// Creates conditions valid from `not_before` for `validity`.
    #[must_use]
    pub fn with_validity(not_before: DateTime<Utc>, validity: Duration) -> Self {
        Self {
            not_before,
            not_on_or_after: not_before + validity,
            audiences: Vec::new(),
        }
    }

    /// Restricts the assertion to an audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audiences.push(audience.into());
        self
    }

    /// Returns true if `now` falls inside the validity window.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before <= now && now < self.not_on_or_after
    }

    fn to_element(&self) -> XmlElement {
        let restriction = (!self.audiences.is_empty()).then(|| {
            self.audiences.iter().fold(
                XmlElement::new("saml:AudienceRestriction"),
                |element, audience| {
                    element.child(XmlElement::new("saml:Audience").text(audience.as_str()))
                },
            )
        });

        XmlElement::new("saml:Conditions")
            .attr("NotBefore", format_instant(self.not_before))
            .attr("NotOnOrAfter", format_instant(self.not_on_or_after))
            .child_opt(restriction)
    }
}

/// Statement that the subject authenticated at a given time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthnStatement {
    /// When the authentication took place.
    pub authn_instant: DateTime<Utc>,

    /// Session index for the authenticated session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_index: Option<String>,

    /// Authentication context class URI.
    pub authn_context_class_ref: String,
}

impl AuthnStatement {
    /// Creates an authentication statement.
    #[must_use]
    pub fn new(authn_instant: DateTime<Utc>, context: AuthnContextClass) -> Self {
        Self {
            authn_instant,
            session_index: None,
            authn_context_class_ref: context.uri().to_string(),
        }
    }

    /// Sets the session index.
    #[must_use]
    pub fn with_session_index(mut self, session_index: impl Into<String>) -> Self {
        self.session_index = Some(session_index.into());
        self
    }

    fn to_element(&self) -> XmlElement {
        XmlElement::new("saml:AuthnStatement")
            .attr("AuthnInstant", format_instant(self.authn_instant))
            .attr_opt("SessionIndex", self.session_index.as_deref())
            .child(
                XmlElement::new("saml:AuthnContext").child(
                    XmlElement::new("saml:AuthnContextClassRef")
                        .text(self.authn_context_class_ref.as_str()),
                ),
            )
    }
}

/// Collection of attributes about the subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeStatement {
    /// Attributes in emission order.
    pub attributes: Vec<Attribute>,
}

impl AttributeStatement {
    /// Creates an empty attribute statement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Returns the first value of the named attribute.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .and_then(|attribute| attribute.values.first())
            .map(String::as_str)
    }

    fn to_element(&self) -> XmlElement {
        self.attributes.iter().fold(
            XmlElement::new("saml:AttributeStatement"),
            |element, attribute| element.child(attribute.to_element()),
        )
    }
}

/// A named attribute with one or more values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,

    /// Attribute name format URI.
    pub name_format: String,

    /// Attribute values.
    pub values: Vec<String>,
}

impl Attribute {
    /// Unspecified attribute name format.
    pub const FORMAT_UNSPECIFIED: &'static str =
        "urn:oasis:names:tc:SAML:2.0:attrname-format:unspecified";

    /// Creates a single-valued attribute with the unspecified name format.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_format: Self::FORMAT_UNSPECIFIED.to_string(),
            values: vec![value.into()],
        }
    }

    fn to_element(&self) -> XmlElement {
        self.values.iter().fold(
            XmlElement::new("saml:Attribute")
                .attr("Name", self.name.as_str())
                .attr("NameFormat", self.name_format.as_str()),
            |element, value| {
                element.child(XmlElement::new("saml:AttributeValue").text(value.as_str()))
            },
        )
    }
}
