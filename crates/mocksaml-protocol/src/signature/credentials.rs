//! Signing key material.

use std::fmt;

use base64::Engine;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::{FromDer, X509Certificate};

use crate::error::{SamlError, SamlResult};

/// The IdP's certificate and private key.
///
/// The certificate is checked when the credentials are created, since the
/// metadata cannot be published without it. The private key is only decoded
/// from PEM; whether it is a usable RSA key is found out when signing.
#[derive(Clone)]
pub struct SigningCredentials {
    certificate_der: Vec<u8>,
    private_key_der: Vec<u8>,
}

impl SigningCredentials {
    /// Creates credentials from DER-encoded certificate and private key.
    pub fn new(certificate_der: Vec<u8>, private_key_der: Vec<u8>) -> SamlResult<Self> {
        X509Certificate::from_der(&certificate_der)
            .map_err(|e| SamlError::Crypto(format!("invalid X.509 certificate: {e}")))?;

        Ok(Self {
            certificate_der,
            private_key_der,
        })
    }

    /// Creates credentials from PEM-encoded certificate and private key.
    ///
    /// The key may be a PKCS#8 `PRIVATE KEY` or a PKCS#1 `RSA PRIVATE KEY`.
    pub fn from_pem(certificate_pem: &str, private_key_pem: &str) -> SamlResult<Self> {
        let certificate_der = pem_to_der(certificate_pem, &["CERTIFICATE"])?;
        let private_key_der = pem_to_der(private_key_pem, &["PRIVATE KEY", "RSA PRIVATE KEY"])?;
        Self::new(certificate_der, private_key_der)
    }

    /// Creates credentials from base64-wrapped PEM, the form used in environment variables.
    pub fn from_base64_pem(certificate: &str, private_key: &str) -> SamlResult<Self> {
        let certificate_pem = decode_base64_pem(certificate, "certificate")?;
        let private_key_pem = decode_base64_pem(private_key, "private key")?;
        Self::from_pem(&certificate_pem, &private_key_pem)
    }

    /// Returns the DER-encoded certificate.
    #[must_use]
    pub fn certificate_der(&self) -> &[u8] {
        &self.certificate_der
    }

    /// Returns the DER-encoded private key.
    #[must_use]
    pub fn private_key_der(&self) -> &[u8] {
        &self.private_key_der
    }

    /// Returns the certificate as single-line base64, as embedded in `ds:X509Certificate`.
    #[must_use]
    pub fn certificate_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.certificate_der)
    }

    /// Returns the certificate as PEM with 64-column lines.
    #[must_use]
    pub fn certificate_pem(&self) -> String {
        let encoded = self.certificate_base64();
        let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
        for line in encoded.as_bytes().chunks(64) {
            pem.push_str(&String::from_utf8_lossy(line));
            pem.push('\n');
        }
        pem.push_str("-----END CERTIFICATE-----\n");
        pem
    }

    /// Returns the certificate's RSA public key (PKCS#1 `RSAPublicKey` DER).
    pub fn public_key_der(&self) -> SamlResult<Vec<u8>> {
        public_key_from_certificate(&self.certificate_der)
    }

    /// Checks the private key and returns its modulus size in bits.
    pub fn check_private_key(&self) -> SamlResult<usize> {
        Ok(mocksaml_crypto::rsa_modulus_bits(&self.private_key_der)?)
    }
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("certificate_der", &format_args!("{} bytes", self.certificate_der.len()))
            .field("private_key_der", &"[REDACTED]")
            .finish()
    }
}

/// Extracts the subject public key from a DER certificate.
pub(crate) fn public_key_from_certificate(certificate_der: &[u8]) -> SamlResult<Vec<u8>> {
    let (_, certificate) = X509Certificate::from_der(certificate_der)
        .map_err(|e| SamlError::Crypto(format!("invalid X.509 certificate: {e}")))?;
    Ok(certificate.public_key().subject_public_key.data.to_vec())
}

fn pem_to_der(pem: &str, labels: &[&str]) -> SamlResult<Vec<u8>> {
    let (_, parsed) = parse_x509_pem(pem.trim().as_bytes())
        .map_err(|e| SamlError::Crypto(format!("invalid PEM: {e}")))?;

    if labels.contains(&parsed.label.as_str()) {
        Ok(parsed.contents)
    } else {
        Err(SamlError::Crypto(format!(
            "unexpected PEM block '{}', expected {}",
            parsed.label,
            labels.join(" or ")
        )))
    }
}

fn decode_base64_pem(value: &str, what: &str) -> SamlResult<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(value.trim())
        .map_err(|e| SamlError::Crypto(format!("{what} is not valid base64: {e}")))?;
    String::from_utf8(bytes).map_err(|_| SamlError::Crypto(format!("{what} PEM is not UTF-8")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn loads_pem_and_base64_pem() {
        let material = testing::key_material();

        let from_pem =
            SigningCredentials::from_pem(&material.certificate_pem, &material.private_key_pem)
                .unwrap();
        assert_eq!(from_pem.certificate_der(), material.certificate_der.as_slice());

        let engine = base64::engine::general_purpose::STANDARD;
        let from_env = SigningCredentials::from_base64_pem(
            &engine.encode(&material.certificate_pem),
            &engine.encode(&material.private_key_pem),
        )
        .unwrap();
        assert_eq!(from_env.private_key_der(), from_pem.private_key_der());
        assert_eq!(from_env.check_private_key().unwrap(), 2048);
    }

    #[test]
    fn certificate_pem_roundtrips() {
        let credentials = testing::credentials();
        let pem = credentials.certificate_pem();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(pem.lines().all(|line| line.len() <= 64));

        let (_, parsed) = parse_x509_pem(pem.as_bytes()).unwrap();
        assert_eq!(parsed.contents, credentials.certificate_der());
    }

    #[test]
    fn rejects_bad_certificate() {
        let material = testing::key_material();

        let err = SigningCredentials::new(b"not a cert".to_vec(), material.private_key_der.clone())
            .unwrap_err();
        assert!(matches!(err, SamlError::Crypto(_)));

        // A key in the certificate slot has the wrong PEM label.
        let err =
            SigningCredentials::from_pem(&material.private_key_pem, &material.private_key_pem)
                .unwrap_err();
        assert!(matches!(err, SamlError::Crypto(_)));

        assert!(SigningCredentials::from_base64_pem("%%%", "%%%").is_err());
    }

    #[test]
    fn bad_private_key_is_only_found_when_checked() {
        let material = testing::key_material();
        let credentials =
            SigningCredentials::new(material.certificate_der.clone(), b"garbage".to_vec()).unwrap();

        assert!(matches!(
            credentials.check_private_key(),
            Err(SamlError::Signing(_))
        ));
    }

    #[test]
    fn debug_redacts_private_key() {
        let debug = format!("{:?}", testing::credentials());
        assert!(debug.contains("REDACTED"));
    }
}
