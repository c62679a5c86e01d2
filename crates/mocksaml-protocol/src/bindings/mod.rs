//! SAML bindings implementation.
//!
//! This module implements the SAML 2.0 bindings for message transport:
//!
//! - **HTTP-POST Binding** - Messages are base64-encoded and sent in HTML forms
//! - **HTTP-Redirect Binding** - Messages are deflated, base64-encoded, and URL-encoded
//!
//! # Usage
//!
//! ```rust,ignore
//! use mocksaml_protocol::bindings::{HttpPostBinding, HttpRedirectBinding};
//!
//! // Auto-submitting form carrying an already encoded, signed response
//! let html = HttpPostBinding::encode_response(&encoded_response, "https://sp.example/acs", Some("relay"));
//!
//! // AuthnRequest arriving on the SSO URL as query parameters
//! let message = HttpRedirectBinding::decode(Some(&saml_request), relay_state.as_deref())?;
//! ```

mod post;
mod redirect;

pub use post::*;
pub use redirect::*;

/// SAML message type for binding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamlMessageType {
    /// AuthnRequest message.
    Request,
    /// Response message.
    Response,
}

impl SamlMessageType {
    /// Returns the form parameter name for this message type.
    #[must_use]
    pub const fn form_param(&self) -> &'static str {
        match self {
            Self::Request => "SAMLRequest",
            Self::Response => "SAMLResponse",
        }
    }
}

/// Decoded SAML binding message.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    /// The decoded XML message.
    pub xml: String,
    /// The message type (request or response).
    pub message_type: SamlMessageType,
    /// The RelayState if present.
    pub relay_state: Option<String>,
}
