//! IdP Metadata endpoint.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::{SamlError, SamlResult};
use crate::metadata::{generate_metadata, metadata_filename};

use super::state::{SamlState, TenantNamespace};

/// Query parameters of the metadata endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MetadataParams {
    /// `true` asks for a file download instead of inline display.
    pub download: Option<String>,
}

impl MetadataParams {
    fn wants_download(&self) -> bool {
        matches!(self.download.as_deref(), Some("true" | "1"))
    }
}

/// GET handler for IdP metadata.
pub async fn idp_metadata(
    State(state): State<SamlState>,
    TenantNamespace(namespace): TenantNamespace,
    Query(params): Query<MetadataParams>,
) -> SamlResult<Response> {
    let metadata = generate_metadata(&state.idp, namespace.as_ref());

    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/xml"))],
        metadata,
    )
        .into_response();

    if params.wants_download() {
        let disposition = format!(
            "attachment; filename=\"{}\"",
            metadata_filename(namespace.as_ref())
        );
        let value = HeaderValue::from_str(&disposition)
            .map_err(|e| SamlError::Internal(format!("invalid Content-Disposition: {e}")))?;
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}
