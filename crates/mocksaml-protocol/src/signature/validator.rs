//! XML Signature validation.
//!
//! Verifies enveloped signatures of the shape the signer produces: one
//! `ds:Reference` to the parent element's ID, the enveloped-signature and
//! Exclusive C14N transforms, and an RSA `SignatureValue`.

use base64::Engine;

use crate::error::{SamlError, SamlResult};
use crate::types::canonicalization_algorithms;
use crate::xml::{canonicalize, parse_document, NamespaceScope, XmlElement, XmlNode};

use super::credentials::public_key_from_certificate;
use super::{digest_from_uri, SignatureAlgorithm, XmlSignature};

/// XML signature validator.
#[derive(Debug, Clone, Default)]
pub struct XmlSignatureValidator {
    trusted_certificate_der: Option<Vec<u8>>,
}

impl XmlSignatureValidator {
    /// Creates a validator that trusts the certificate embedded in the signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that only accepts signatures made with `certificate_der`.
    #[must_use]
    pub fn with_trusted_certificate(certificate_der: Vec<u8>) -> Self {
        Self {
            trusted_certificate_der: Some(certificate_der),
        }
    }

    /// Validates the first enveloped signature in `xml`.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::SignatureInvalid`] if there is no signature, the
    /// reference does not point at the enclosing element, the digest does not
    /// match, or the signature value does not verify.
    pub fn validate(&self, xml: &str) -> SamlResult<XmlSignature> {
        let root = parse_document(xml)?;

        let (signed, inherited) = find_signed_element(&root, &NamespaceScope::default())
            .ok_or_else(|| invalid("document contains no enveloped signature"))?;
        let signature = signed
            .find_child("Signature")
            .ok_or_else(|| invalid("signature element missing"))?;
        let signed_info = signature
            .find_child("SignedInfo")
            .ok_or_else(|| invalid("SignedInfo missing"))?;

        let c14n = signed_info
            .find_child("CanonicalizationMethod")
            .and_then(|method| method.attribute("Algorithm"));
        if c14n != Some(canonicalization_algorithms::EXCLUSIVE_C14N) {
            return Err(invalid("unsupported canonicalization method"));
        }

        let algorithm = signed_info
            .find_child("SignatureMethod")
            .and_then(|method| method.attribute("Algorithm"))
            .and_then(SignatureAlgorithm::from_uri)
            .ok_or_else(|| invalid("unsupported signature method"))?;

        let reference = signed_info
            .find_child("Reference")
            .ok_or_else(|| invalid("Reference missing"))?;
        let reference_uri = reference.attribute("URI").unwrap_or_default();
        let signed_id = signed
            .attribute("ID")
            .ok_or_else(|| invalid("signed element has no ID"))?;
        if reference_uri.strip_prefix('#') != Some(signed_id) {
            return Err(invalid("reference does not point at the enclosing element"));
        }
        if count_ids(&root, signed_id) != 1 {
            return Err(invalid("referenced ID is not unique"));
        }

        if let Some(transforms) = reference.find_child("Transforms") {
            let supported = transforms.child_elements().all(|transform| {
                matches!(
                    transform.attribute("Algorithm"),
                    Some(
                        canonicalization_algorithms::ENVELOPED_SIGNATURE
                            | canonicalization_algorithms::EXCLUSIVE_C14N
                    )
                )
            });
            if !supported {
                return Err(invalid("unsupported transform"));
            }
        }

        let digest_algorithm = reference
            .find_child("DigestMethod")
            .and_then(|method| method.attribute("Algorithm"))
            .and_then(digest_from_uri)
            .ok_or_else(|| invalid("unsupported digest method"))?;
        let digest_value = element_text(reference, "DigestValue")?;
        let signature_value = element_text(signature, "SignatureValue")?;

        let mut unsigned = signed.clone();
        unsigned.children.retain(
            |node| !matches!(node, XmlNode::Element(child) if child.local_name() == "Signature"),
        );
        let digest =
            mocksaml_crypto::hash(digest_algorithm, canonicalize(&unsigned, &inherited).as_bytes());
        if decode(&digest_value)? != digest {
            return Err(invalid("digest mismatch"));
        }

        let embedded = signature
            .find_descendant("X509Certificate")
            .map(|certificate| strip_whitespace(&certificate.text_content()));
        let certificate_der = match (&self.trusted_certificate_der, &embedded) {
            (Some(trusted), Some(embedded)) => {
                if &decode(embedded)? != trusted {
                    return Err(invalid("embedded certificate is not trusted"));
                }
                trusted.clone()
            }
            (Some(trusted), None) => trusted.clone(),
            (None, Some(embedded)) => decode(embedded)?,
            (None, None) => return Err(invalid("no certificate to verify with")),
        };
        let public_key = public_key_from_certificate(&certificate_der)?;

        let signature_scope = inherited.with_declarations(signed).with_declarations(signature);
        let canonical_signed_info = canonicalize(signed_info, &signature_scope);
        mocksaml_crypto::rsa_verify(
            &public_key,
            canonical_signed_info.as_bytes(),
            &decode(&signature_value)?,
            algorithm.rsa(),
        )
        .map_err(|_| invalid("signature value does not verify"))?;

        tracing::debug!(reference_uri, "XML signature verified");

        Ok(XmlSignature {
            algorithm,
            reference_uri: reference_uri.to_string(),
            digest_value,
            signature_value,
            x509_certificate: embedded,
        })
    }
}

fn invalid(message: &str) -> SamlError {
    SamlError::SignatureInvalid(message.to_string())
}

/// Finds the first element (document order) with a `Signature` child, along
/// with the namespace bindings inherited from its ancestors.
fn find_signed_element<'a>(
    element: &'a XmlElement,
    inherited: &NamespaceScope,
) -> Option<(&'a XmlElement, NamespaceScope)> {
    if element.find_child("Signature").is_some() {
        return Some((element, inherited.clone()));
    }
    let scope = inherited.with_declarations(element);
    element
        .child_elements()
        .find_map(|child| find_signed_element(child, &scope))
}

fn count_ids(element: &XmlElement, id: &str) -> usize {
    usize::from(element.attribute("ID") == Some(id))
        + element
            .child_elements()
            .map(|child| count_ids(child, id))
            .sum::<usize>()
}

fn element_text(parent: &XmlElement, local_name: &str) -> SamlResult<String> {
    parent
        .find_child(local_name)
        .map(|element| strip_whitespace(&element.text_content()))
        .ok_or_else(|| SamlError::SignatureInvalid(format!("{local_name} missing")))
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

fn decode(value: &str) -> SamlResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|e| SamlError::SignatureInvalid(format!("invalid base64: {e}")))
}
