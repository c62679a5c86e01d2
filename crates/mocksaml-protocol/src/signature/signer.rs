//! XML Signature creation.
//!
//! Signs an element tree in place with an enveloped signature. The element is
//! digested in canonical form before the `ds:Signature` is inserted, which is
//! exactly what a verifier gets back after applying the enveloped-signature
//! and Exclusive C14N transforms.

use base64::Engine;

use crate::error::{SamlError, SamlResult};
use crate::types::{canonicalization_algorithms, XMLDSIG_NS};
use crate::xml::XmlElement;

use super::{SignatureAlgorithm, SignatureConfig, SigningCredentials};

/// XML element signer.
pub struct XmlSigner<'a> {
    credentials: &'a SigningCredentials,
    config: SignatureConfig,
}

impl<'a> XmlSigner<'a> {
    /// Creates a signer with the default configuration (RSA-SHA256, certificate embedded).
    #[must_use]
    pub fn new(credentials: &'a SigningCredentials) -> Self {
        Self {
            credentials,
            config: SignatureConfig::default(),
        }
    }

    /// Sets the signature configuration.
    #[must_use]
    pub fn with_config(mut self, config: SignatureConfig) -> Self {
        self.config = config;
        self
    }

    /// Signs `element` in place.
    ///
    /// The element must carry an `ID` attribute and declare every namespace
    /// prefix it uses. The `ds:Signature` is inserted directly after the
    /// element's `Issuer` child, or first if there is none, as the SAML schema
    /// requires.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Signing`] if the element has no ID or the private
    /// key cannot sign. The element is left untouched on error.
    pub fn sign_element(&self, element: &mut XmlElement) -> SamlResult<()> {
        let reference_id = element
            .attribute("ID")
            .ok_or_else(|| SamlError::Signing(format!("<{}> has no ID to sign", element.name)))?
            .to_string();

        let algorithm = self.config.algorithm;
        let engine = base64::engine::general_purpose::STANDARD;

        let digest = mocksaml_crypto::hash(algorithm.hash(), element.to_canonical_string().as_bytes());
        let signed_info = build_signed_info(&reference_id, &engine.encode(digest), algorithm);

        let signature_value = mocksaml_crypto::rsa_sign(
            self.credentials.private_key_der(),
            signed_info.to_canonical_string().as_bytes(),
            algorithm.rsa(),
        )?;

        let certificate = self
            .config
            .include_certificate
            .then(|| self.credentials.certificate_base64());
        let signature = build_signature_element(signed_info, &engine.encode(signature_value), certificate);

        let position = element.child_position("Issuer").map_or(0, |index| index + 1);
        element.insert_child(position, signature);

        tracing::debug!(reference_id = %reference_id, algorithm = algorithm.uri(), "Signed element");
        Ok(())
    }
}

fn ds(local_name: &str) -> XmlElement {
    XmlElement::new(format!("ds:{local_name}"))
}

fn build_signed_info(reference_id: &str, digest_b64: &str, algorithm: SignatureAlgorithm) -> XmlElement {
    let transforms = ds("Transforms")
        .child(ds("Transform").attr("Algorithm", canonicalization_algorithms::ENVELOPED_SIGNATURE))
        .child(ds("Transform").attr("Algorithm", canonicalization_algorithms::EXCLUSIVE_C14N));

    let reference = ds("Reference")
        .attr("URI", format!("#{reference_id}"))
        .child(transforms)
        .child(ds("DigestMethod").attr("Algorithm", algorithm.digest_uri()))
        .child(ds("DigestValue").text(digest_b64));

    ds("SignedInfo")
        .declare("ds", XMLDSIG_NS)
        .child(ds("CanonicalizationMethod").attr("Algorithm", canonicalization_algorithms::EXCLUSIVE_C14N))
        .child(ds("SignatureMethod").attr("Algorithm", algorithm.uri()))
        .child(reference)
}

fn build_signature_element(
    signed_info: XmlElement,
    signature_b64: &str,
    certificate_b64: Option<String>,
) -> XmlElement {
    let key_info = certificate_b64.map(|certificate| {
        ds("KeyInfo").child(ds("X509Data").child(ds("X509Certificate").text(certificate)))
    });

    ds("Signature")
        .declare("ds", XMLDSIG_NS)
        .child(signed_info)
        .child(ds("SignatureValue").text(signature_b64))
        .child_opt(key_info)
}
