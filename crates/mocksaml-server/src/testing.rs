//! Shared fixtures for unit tests.

use std::sync::OnceLock;

use mocksaml_protocol::SigningCredentials;

use crate::config::ServerConfig;
use crate::state::AppState;

/// RSA-2048 self-signed credentials, generated once per test binary.
pub(crate) fn credentials() -> SigningCredentials {
    static CREDENTIALS: OnceLock<SigningCredentials> = OnceLock::new();
    CREDENTIALS
        .get_or_init(|| {
            let key_pair = rcgen::KeyPair::generate_for(&rcgen::PKCS_RSA_SHA256).unwrap();
            let certificate = rcgen::CertificateParams::new(vec!["mocksaml.test".to_string()])
                .unwrap()
                .self_signed(&key_pair)
                .unwrap();
            SigningCredentials::new(certificate.der().to_vec(), key_pair.serialize_der()).unwrap()
        })
        .clone()
}

pub(crate) fn app_state() -> AppState {
    AppState::new(ServerConfig::for_testing(credentials()))
}
