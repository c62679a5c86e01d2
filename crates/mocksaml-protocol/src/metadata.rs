//! IdP metadata generation.
//!
//! Publishes a SAML 2.0 `EntityDescriptor` for the (optionally namespaced)
//! identity provider. The document has no timestamps, IDs or `validUntil`, so
//! it is byte-identical for identical inputs.

use crate::identity::IdpConfig;
use crate::types::{Namespace, NameIdFormat, SamlBinding, MD_NS, SAMLP_NS, XMLDSIG_NS};
use crate::xml::{XmlElement, XML_DECLARATION};

/// Generates the IdP metadata document for a namespace.
#[must_use]
pub fn generate_metadata(config: &IdpConfig, namespace: Option<&Namespace>) -> String {
    let resolver = config.resolver(namespace);
    let sso_url = resolver.sso_url();

    let key_descriptor = XmlElement::new("md:KeyDescriptor").attr("use", "signing").child(
        XmlElement::new("ds:KeyInfo").declare("ds", XMLDSIG_NS).child(
            XmlElement::new("ds:X509Data").child(
                XmlElement::new("ds:X509Certificate").text(config.credentials.certificate_base64()),
            ),
        ),
    );

    let descriptor = XmlElement::new("md:IDPSSODescriptor")
        .attr("WantAuthnRequestsSigned", "false")
        .attr("protocolSupportEnumeration", SAMLP_NS)
        .child(key_descriptor)
        .child(XmlElement::new("md:NameIDFormat").text(NameIdFormat::Email.uri()))
        .child(single_sign_on_service(SamlBinding::HttpRedirect, &sso_url))
        .child(single_sign_on_service(SamlBinding::HttpPost, &sso_url));

    let entity_descriptor = XmlElement::new("md:EntityDescriptor")
        .declare("md", MD_NS)
        .attr("entityID", resolver.entity_id())
        .child(descriptor);

    format!("{XML_DECLARATION}\n{}", entity_descriptor.to_canonical_string())
}

fn single_sign_on_service(binding: SamlBinding, location: &str) -> XmlElement {
    XmlElement::new("md:SingleSignOnService")
        .attr("Binding", binding.uri())
        .attr("Location", location)
}

/// Suggested file name when metadata is downloaded.
#[must_use]
pub fn metadata_filename(namespace: Option<&Namespace>) -> String {
    match namespace {
        Some(namespace) => format!("mock-saml-metadata-{namespace}.xml"),
        None => "mock-saml-metadata.xml".to_string(),
    }
}
