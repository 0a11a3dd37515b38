//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`        - Short URL redirect
//! - `GET  /health`        - Health check: store and cache
//! - `POST /api/shorten`   - Create a short URL
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling (see [`normalized`])

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and tracing.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Wraps a router so that `/abc123/` is routed like `/abc123`.
///
/// Path normalization must run before routing, so it wraps the whole router
/// instead of being added with [`Router::layer`].
pub fn normalized(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
