//! SAML Status types.
//!
//! The identity provider only ever answers with success: a login that cannot
//! be answered fails at the HTTP layer and produces no Response at all.

use serde::{Deserialize, Serialize};

use super::status_codes;
use crate::xml::XmlElement;

/// SAML protocol status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// The top-level status code URI.
    pub status_code: String,
}

impl Status {
    /// Creates a success status.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status_code: status_codes::SUCCESS.to_string(),
        }
    }

    /// Returns true if this status indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == status_codes::SUCCESS
    }

    /// Builds the `samlp:Status` element.
    #[must_use]
    pub fn to_element(&self) -> XmlElement {
        XmlElement::new("samlp:Status")
            .child(XmlElement::new("samlp:StatusCode").attr("Value", self.status_code.as_str()))
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::success()
    }
}
