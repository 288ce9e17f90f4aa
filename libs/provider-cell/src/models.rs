use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ProviderId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    #[serde(default)]
    pub specialty: String,
}

impl Provider {
    pub fn new(id: ProviderId, name: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            specialty: specialty.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Provider {0} not found")]
    NotFound(ProviderId),

    #[error("Invalid provider record: {0}")]
    InvalidProvider(String),

    #[error("Duplicate provider id {0}")]
    DuplicateProvider(ProviderId),

    #[error("Failed to load providers: {0}")]
    LoadFailed(String),
}
