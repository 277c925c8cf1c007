//! Router construction for the address validation server.

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::address::AddressSchema;
use crate::client::AddressValidationService;
use crate::handlers;
use crate::normalize::AliasTable;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub aliases: Arc<AliasTable>,
    pub schema: Arc<AddressSchema>,
    pub client: Arc<dyn AddressValidationService>,
    pub timeout_ms: u64,
    pub include_raw_response: bool,
}

/// Build the axum router: API routes plus the static page as fallback.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/validate", post(handlers::validate::validate_address))
        .route("/health", get(handlers::health::health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
