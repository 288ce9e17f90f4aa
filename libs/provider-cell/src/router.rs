use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::catalog::ProviderCatalog;

pub fn provider_routes(catalog: Arc<ProviderCatalog>) -> Router {
    Router::new()
        .route("/", get(handlers::list_providers))
        .route("/{provider_id}", get(handlers::get_provider))
        .with_state(catalog)
}
