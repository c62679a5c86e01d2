//! # mocksaml-crypto
//!
//! Cryptographic primitives for the mock SAML identity provider, built on aws-lc-rs.
//!
//! The SAML signing profile used by relying parties in the wild is RSA PKCS#1 v1.5
//! with SHA-256, so that is the default everywhere in this crate. SHA-384 and
//! SHA-512 variants are available for callers that need them.
//!
//! - [`hash`] - SHA-2 message digests
//! - [`rsa`] - RSA PKCS#1 v1.5 signing and verification
//! - [`error`] - Error type shared by the signing operations

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod hash;
pub mod rsa;

pub use error::SignatureError;
pub use hash::{hash, sha256, sha384, sha512, HashAlgorithm};
pub use rsa::{rsa_modulus_bits, rsa_sign, rsa_verify, RsaAlgorithm};
