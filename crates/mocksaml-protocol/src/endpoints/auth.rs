//! Login submission endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};

use crate::error::{SamlError, SamlResult};
use crate::handler::handle_auth_request;
use crate::types::AuthRequest;

use super::state::{SamlState, TenantNamespace};

/// POST handler for the mock login form.
///
/// Accepts the JSON login submission and answers with the auto-submit
/// document that carries the signed response to the service provider.
pub async fn auth_post(
    State(state): State<SamlState>,
    TenantNamespace(namespace): TenantNamespace,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> SamlResult<Html<String>> {
    let Json(request) = body.map_err(|rejection| SamlError::Validation(rejection.body_text()))?;

    handle_auth_request(&request, namespace.as_ref(), &state.idp).map(Html)
}
