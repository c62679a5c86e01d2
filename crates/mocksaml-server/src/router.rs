//! Router configuration.
//!
//! This module creates the main Axum router that combines all endpoints.

use axum::{http::HeaderValue, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mocksaml_protocol::endpoints::saml_router;

use crate::state::AppState;
use crate::ui;

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let saml = saml_router().with_state(state.saml_state());

    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check));

    let ui_routes = Router::new()
        .route("/", get(ui::index_page))
        .route("/namespace/{ns}", get(ui::index_page))
        .route("/saml/login", get(ui::login_page))
        .route("/namespace/{ns}/saml/login", get(ui::login_page))
        .with_state(state.clone());

    let cors = cors_layer(&state);

    Router::new()
        .merge(saml)
        .merge(health)
        .merge(ui_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if state.config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// Liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe. The server has no backing services to wait for.
async fn readiness_check() -> StatusCode {
    StatusCode::OK
}
