//! SAML 2.0 types and data structures.
//!
//! Model types for what the identity provider receives (login submissions,
//! AuthnRequests) and what it issues (assertions, responses).

mod assertion;
mod auth_request;
mod authn_request;
mod constants;
mod name_id;
mod namespace;
mod response;
mod status;

pub use assertion::*;
pub use auth_request::*;
pub use authn_request::*;
pub use constants::*;
pub use name_id::*;
pub use namespace::*;
pub use response::*;
pub use status::*;
