//! RSA PKCS#1 v1.5 signatures.
//!
//! SAML 2.0 relying parties overwhelmingly expect `rsa-sha256`, so [`RsaAlgorithm::Rs256`]
//! is the default. Keys are accepted as PKCS#8 `PRIVATE KEY` or PKCS#1 `RSA PRIVATE KEY`
//! DER; public keys are PKCS#1 `RSAPublicKey` DER as found in a certificate's
//! `subjectPublicKey` bit string.

use aws_lc_rs::{
    rand::SystemRandom,
    signature::{self, RsaKeyPair, UnparsedPublicKey},
};

use crate::error::SignatureError;

/// RSA signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RsaAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-256.
    #[default]
    Rs256,
    /// RSA PKCS#1 v1.5 with SHA-384.
    Rs384,
    /// RSA PKCS#1 v1.5 with SHA-512.
    Rs512,
}

impl RsaAlgorithm {
    /// Returns the XML-DSig algorithm URI.
    #[must_use]
    pub const fn xml_dsig_uri(self) -> &'static str {
        match self {
            Self::Rs256 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256",
            Self::Rs384 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384",
            Self::Rs512 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512",
        }
    }

    fn padding(self) -> &'static dyn signature::RsaEncoding {
        match self {
            Self::Rs256 => &signature::RSA_PKCS1_SHA256,
            Self::Rs384 => &signature::RSA_PKCS1_SHA384,
            Self::Rs512 => &signature::RSA_PKCS1_SHA512,
        }
    }

    fn verification(self) -> &'static dyn signature::VerificationAlgorithm {
        match self {
            Self::Rs256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            Self::Rs384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            Self::Rs512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        }
    }
}

fn parse_key_pair(key_der: &[u8]) -> Result<RsaKeyPair, SignatureError> {
    RsaKeyPair::from_pkcs8(key_der)
        .or_else(|_| RsaKeyPair::from_der(key_der))
        .map_err(|e| SignatureError::InvalidKey(format!("invalid RSA private key: {e}")))
}

/// Signs data with an RSA private key.
///
/// # Arguments
///
/// * `key_der` - RSA private key in DER format (PKCS#8 or PKCS#1)
/// * `data` - Data to sign
/// * `algorithm` - Signature algorithm
///
/// # Errors
///
/// Returns [`SignatureError::InvalidKey`] if the key cannot be parsed and
/// [`SignatureError::Signing`] if the signing operation fails.
pub fn rsa_sign(
    key_der: &[u8],
    data: &[u8],
    algorithm: RsaAlgorithm,
) -> Result<Vec<u8>, SignatureError> {
    let key_pair = parse_key_pair(key_der)?;

    let rng = SystemRandom::new();
    let mut signature = vec![0u8; key_pair.public_modulus_len()];

    key_pair
        .sign(algorithm.padding(), &rng, data, &mut signature)
        .map_err(|e| SignatureError::Signing(format!("RSA signing failed: {e}")))?;

    Ok(signature)
}

/// Verifies an RSA signature.
///
/// # Arguments
///
/// * `public_key_der` - RSA public key in DER format (PKCS#1 `RSAPublicKey`)
/// * `data` - Original data that was signed
/// * `sig` - Signature to verify
/// * `algorithm` - Signature algorithm
///
/// # Errors
///
/// Returns [`SignatureError::Verification`] if the signature does not match.
pub fn rsa_verify(
    public_key_der: &[u8],
    data: &[u8],
    sig: &[u8],
    algorithm: RsaAlgorithm,
) -> Result<(), SignatureError> {
    UnparsedPublicKey::new(algorithm.verification(), public_key_der)
        .verify(data, sig)
        .map_err(|_| SignatureError::Verification)
}

/// Returns the modulus size in bits of an RSA private key.
///
/// Useful for checking key material at startup without signing anything.
pub fn rsa_modulus_bits(key_der: &[u8]) -> Result<usize, SignatureError> {
    Ok(parse_key_pair(key_der)?.public_modulus_len() * 8)
}
