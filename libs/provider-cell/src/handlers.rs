use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{CatalogError, Provider, ProviderId};
use crate::services::catalog::ProviderCatalog;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => AppError::NotFound(err.to_string()),
            CatalogError::InvalidProvider(_) | CatalogError::DuplicateProvider(_) => {
                AppError::Internal(err.to_string())
            }
            CatalogError::LoadFailed(msg) => AppError::StorageUnavailable(msg),
        }
    }
}

pub async fn list_providers(
    State(catalog): State<Arc<ProviderCatalog>>,
) -> Json<Vec<Provider>> {
    Json(catalog.list_providers())
}

pub async fn get_provider(
    State(catalog): State<Arc<ProviderCatalog>>,
    Path(provider_id): Path<ProviderId>,
) -> Result<Json<Value>, AppError> {
    let provider = catalog.get_provider(provider_id)?;
    Ok(Json(json!(provider)))
}
