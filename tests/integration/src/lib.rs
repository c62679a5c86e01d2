//! End-to-end tests for the mock SAML identity provider live under `tests/`.
