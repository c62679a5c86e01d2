//! SAML error types.
//!
//! Provides error types for request validation, response signing, binding decoding
//! and signature verification.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML protocol errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// A login submission is missing a required field or carries a malformed one.
    #[error("validation error: {0}")]
    Validation(String),

    /// The signing key or certificate is unusable.
    #[error("signing error: {0}")]
    Signing(String),

    /// A tenant namespace token is not URL-path-safe.
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Invalid SAML request format or content.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// Deflate decompression error.
    #[error("deflate error: {0}")]
    Deflate(String),

    /// XML signature validation failed.
    #[error("signature validation failed: {0}")]
    SignatureInvalid(String),

    /// Key or certificate material could not be decoded.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SamlError {
    /// Returns a short machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Signing(_) => "signing_error",
            Self::InvalidNamespace(_) => "invalid_namespace",
            Self::InvalidRequest(_) => "invalid_request",
            Self::XmlParse(_) => "xml_parse_error",
            Self::Base64Decode(_) => "base64_decode_error",
            Self::Deflate(_) => "deflate_error",
            Self::SignatureInvalid(_) => "signature_invalid",
            Self::Crypto(_) => "crypto_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::InvalidNamespace(_)
            | Self::InvalidRequest(_)
            | Self::Base64Decode(_)
            | Self::Deflate(_)
            | Self::XmlParse(_) => 400,
            Self::SignatureInvalid(_) => 401,
            Self::Signing(_) | Self::Crypto(_) | Self::Internal(_) => 500,
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error kind.
    pub error: &'static str,
    /// Human-readable description.
    pub error_description: String,
}

impl IntoResponse for SamlError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self, "SAML request failed");
        } else {
            tracing::debug!(error = %self, "SAML request rejected");
        }

        let body = ErrorBody {
            error: self.kind(),
            error_description: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<quick_xml::Error> for SamlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SamlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}

impl From<std::io::Error> for SamlError {
    fn from(err: std::io::Error) -> Self {
        Self::Deflate(err.to_string())
    }
}

impl From<mocksaml_crypto::SignatureError> for SamlError {
    fn from(err: mocksaml_crypto::SignatureError) -> Self {
        Self::Signing(err.to_string())
    }
}
