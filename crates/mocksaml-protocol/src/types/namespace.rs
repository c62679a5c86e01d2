//! Tenant namespace tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SamlError, SamlResult};

/// Maximum accepted length of a namespace token, in bytes.
pub const MAX_NAMESPACE_LEN: usize = 128;

/// A tenant namespace: an opaque, URL-path-safe token.
///
/// Tokens consist of ASCII letters, digits and `-._~` (RFC 3986 unreserved
/// characters), so they can be embedded in URL paths and entity IDs without
/// escaping. The dot segments `.` and `..` are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Parses a namespace token.
    pub fn parse(value: impl Into<String>) -> SamlResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(SamlError::InvalidNamespace("namespace is empty".to_string()));
        }
        if value.len() > MAX_NAMESPACE_LEN {
            return Err(SamlError::InvalidNamespace(format!(
                "namespace exceeds {MAX_NAMESPACE_LEN} bytes"
            )));
        }
        if value == "." || value == ".." {
            return Err(SamlError::InvalidNamespace(format!(
                "namespace '{value}' is a dot segment"
            )));
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')))
        {
            return Err(SamlError::InvalidNamespace(format!(
                "namespace contains invalid character {c:?}"
            )));
        }

        Ok(Self(value))
    }

    /// Parses an optional token; absent or empty input means no namespace.
    pub fn from_optional(value: Option<&str>) -> SamlResult<Option<Self>> {
        match value {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }

    /// Returns the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = SamlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Namespace> for String {
    fn from(namespace: Namespace) -> Self {
        namespace.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_path_safe_tokens() {
        for token in ["tenantA", "tenant-b", "t_1.2~x", "ACME"] {
            assert_eq!(Namespace::parse(token).unwrap().as_str(), token);
        }
    }

    #[test]
    fn rejects_unsafe_tokens() {
        for token in ["", ".", "..", "a/b", "a b", "tenant?x", "caf\u{e9}", "a%2F"] {
            let err = Namespace::parse(token).unwrap_err();
            assert!(matches!(err, SamlError::InvalidNamespace(_)), "{token:?}");
        }
        assert!(Namespace::parse("a".repeat(MAX_NAMESPACE_LEN + 1)).is_err());
        assert!(Namespace::parse("a".repeat(MAX_NAMESPACE_LEN)).is_ok());
    }

    #[test]
    fn empty_optional_is_absent() {
        assert_eq!(Namespace::from_optional(None).unwrap(), None);
        assert_eq!(Namespace::from_optional(Some("")).unwrap(), None);
        assert_eq!(
            Namespace::from_optional(Some("tenantA")).unwrap(),
            Some(Namespace::parse("tenantA").unwrap())
        );
        assert!(Namespace::from_optional(Some("a/b")).is_err());
    }

    #[test]
    fn deserializes_with_validation() {
        let ns: Namespace = serde_json::from_str("\"tenantA\"").unwrap();
        assert_eq!(ns.to_string(), "tenantA");
        assert!(serde_json::from_str::<Namespace>("\"a/b\"").is_err());
    }
}
