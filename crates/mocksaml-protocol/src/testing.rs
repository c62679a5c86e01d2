//! Shared fixtures for unit tests.

use std::sync::{Arc, OnceLock};

use crate::identity::IdpConfig;
use crate::signature::SigningCredentials;

pub(crate) const APP_URL: &str = "http://localhost:4000";
pub(crate) const ENTITY_ID: &str = "https://saml.example.com/entityid";

pub(crate) struct KeyMaterial {
    pub certificate_der: Vec<u8>,
    pub certificate_pem: String,
    pub private_key_der: Vec<u8>,
    pub private_key_pem: String,
}

/// RSA-2048 self-signed certificate and key, generated once per test binary.
pub(crate) fn key_material() -> &'static KeyMaterial {
    static MATERIAL: OnceLock<KeyMaterial> = OnceLock::new();
    MATERIAL.get_or_init(|| {
        let key_pair = rcgen::KeyPair::generate_for(&rcgen::PKCS_RSA_SHA256).unwrap();
        let certificate = rcgen::CertificateParams::new(vec!["mocksaml.test".to_string()])
            .unwrap()
            .self_signed(&key_pair)
            .unwrap();

        KeyMaterial {
            certificate_der: certificate.der().to_vec(),
            certificate_pem: certificate.pem(),
            private_key_der: key_pair.serialize_der(),
            private_key_pem: key_pair.serialize_pem(),
        }
    })
}

pub(crate) fn credentials() -> SigningCredentials {
    let material = key_material();
    SigningCredentials::new(
        material.certificate_der.clone(),
        material.private_key_der.clone(),
    )
    .unwrap()
}

pub(crate) fn idp_config() -> Arc<IdpConfig> {
    Arc::new(IdpConfig::new(APP_URL, ENTITY_ID, credentials()))
}
