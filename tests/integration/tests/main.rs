//! End-to-End Integration Tests
//!
//! These tests start the real server on an ephemeral port and drive it over
//! HTTP the way a browser and a service provider would.

mod common;
mod saml_endpoints;
mod sso_flows;
