//! SAML 2.0 Identity Provider core for the mock IdP.
//!
//! This crate implements everything a relying party sees of the identity provider:
//!
//! - **Entity identity resolution** - namespaced Entity IDs and SSO URLs per tenant
//! - **Metadata publication** - deterministic `EntityDescriptor` documents
//! - **Authentication request handling** - validates a simulated login and issues a response
//! - **Assertion/Response building** - signed SAML Responses carrying one Assertion
//! - **XML signature** - enveloped XML-DSig over exclusive-canonical XML
//! - **POST and Redirect bindings** - encoding for both SAML binding types
//!
//! # Architecture
//!
//! - [`types`] - Core SAML types and data structures
//! - [`xml`] - Element tree, canonical serializer and parser
//! - [`signature`] - XML signature signing and validation
//! - [`identity`] - IdP configuration and namespace-aware URL resolution
//! - [`metadata`] - IdP metadata generation
//! - [`builder`] - Signed Response construction
//! - [`handler`] - Authentication request handling
//! - [`bindings`] - POST and Redirect binding implementations
//! - [`endpoints`] - Axum HTTP handlers for SAML endpoints
//! - [`error`] - Error types for SAML operations
//!
//! # Example
//!
//! ```rust,ignore
//! use mocksaml_protocol::endpoints::{saml_router, SamlState};
//! use axum::Router;
//!
//! let app = Router::new()
//!     .merge(saml_router())
//!     .with_state(SamlState::new(idp_config));
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)
//! - [SAML 2.0 Bindings](https://docs.oasis-open.org/security/saml/v2.0/saml-bindings-2.0-os.pdf)
//! - [SAML 2.0 Metadata](https://docs.oasis-open.org/security/saml/v2.0/saml-metadata-2.0-os.pdf)
//! - [XML Signature](https://www.w3.org/TR/xmldsig-core1/)
//! - [Exclusive XML Canonicalization](https://www.w3.org/TR/xml-exc-c14n/)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod builder;
pub mod endpoints;
pub mod error;
pub mod handler;
pub mod identity;
pub mod metadata;
pub mod signature;
pub mod types;
pub mod xml;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::build_signed_response;
pub use error::{SamlError, SamlResult};
pub use handler::handle_auth_request;
pub use identity::{resolve_entity_id, resolve_sso_url, IdentityResolver, IdpConfig};
pub use metadata::generate_metadata;
pub use signature::SigningCredentials;
pub use types::*;
