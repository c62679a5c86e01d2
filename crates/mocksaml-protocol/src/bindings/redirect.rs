//! HTTP-Redirect Binding implementation.
//!
//! Messages travel in the query string: raw DEFLATE, then base64, then URL
//! encoding.

use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::error::{SamlError, SamlResult};

use super::{DecodedMessage, SamlMessageType};

/// Upper bound on an inflated message, in bytes.
const MAX_INFLATED_SIZE: u64 = 1024 * 1024;

/// HTTP-Redirect binding encoder/decoder.
pub struct HttpRedirectBinding;

impl HttpRedirectBinding {
    /// Encodes a SAML request for HTTP-Redirect binding.
    ///
    /// Returns `destination` with the encoded message (and relay state) appended
    /// as query parameters.
    pub fn encode_request(
        xml: &str,
        destination: &str,
        relay_state: Option<&str>,
    ) -> SamlResult<String> {
        let compressed = deflate_compress(xml.as_bytes())?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(compressed);

        let separator = if destination.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{destination}{separator}{}={}",
            SamlMessageType::Request.form_param(),
            urlencoding::encode(&encoded)
        );

        if let Some(rs) = relay_state {
            url.push_str("&RelayState=");
            url.push_str(&urlencoding::encode(rs));
        }

        Ok(url)
    }

    /// Decodes a SAML request from already URL-decoded query parameters.
    pub fn decode(saml_request: Option<&str>, relay_state: Option<&str>) -> SamlResult<DecodedMessage> {
        let encoded = saml_request.ok_or_else(|| {
            SamlError::InvalidRequest("No SAMLRequest parameter".to_string())
        })?;

        let compressed = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        let xml_bytes = deflate_decompress(&compressed)?;

        let xml = String::from_utf8(xml_bytes)
            .map_err(|e| SamlError::InvalidRequest(format!("Invalid UTF-8 in message: {e}")))?;

        Ok(DecodedMessage {
            xml,
            message_type: SamlMessageType::Request,
            relay_state: relay_state.map(String::from),
        })
    }

    /// Decodes a request from a full URL.
    pub fn decode_url(url: &str) -> SamlResult<DecodedMessage> {
        let parsed = url::Url::parse(url)
            .map_err(|e| SamlError::InvalidRequest(format!("Invalid URL: {e}")))?;

        let mut saml_request = None;
        let mut relay_state = None;

        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "SAMLRequest" => saml_request = Some(value.into_owned()),
                "RelayState" => relay_state = Some(value.into_owned()),
                _ => {}
            }
        }

        Self::decode(saml_request.as_deref(), relay_state.as_deref())
    }
}

/// Compresses data using DEFLATE (raw, no zlib header).
fn deflate_compress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| SamlError::Deflate(format!("Compression error: {e}")))?;
    encoder
        .finish()
        .map_err(|e| SamlError::Deflate(format!("Compression finish error: {e}")))
}

/// Decompresses raw DEFLATE data, refusing output larger than [`MAX_INFLATED_SIZE`].
fn deflate_decompress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut decompressed = Vec::new();
    DeflateDecoder::new(data)
        .take(MAX_INFLATED_SIZE + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| SamlError::Deflate(format!("Decompression error: {e}")))?;

    if decompressed.len() as u64 > MAX_INFLATED_SIZE {
        return Err(SamlError::Deflate(format!(
            "inflated message exceeds {MAX_INFLATED_SIZE} bytes"
        )));
    }
    Ok(decompressed)
}
