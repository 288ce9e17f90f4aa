use std::collections::BTreeMap;

use reqwest::Method;
use tracing::{debug, info};

use shared_database::SupabaseClient;

use crate::models::{CatalogError, Provider, ProviderId};

/// Providers every fresh installation starts with.
pub fn seed_providers() -> Vec<Provider> {
    vec![
        Provider::new(1, "João Silva", "Corte Clássico"),
        Provider::new(2, "Carlos Santos", "Barba e Desenho"),
        Provider::new(3, "Pedro Oliveira", "Corte Moderno"),
    ]
}

/// Read-only registry of providers, built once at startup.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    providers: BTreeMap<ProviderId, Provider>,
}

impl ProviderCatalog {
    pub fn new(providers: Vec<Provider>) -> Result<Self, CatalogError> {
        let mut by_id = BTreeMap::new();

        for provider in providers {
            if provider.name.trim().is_empty() {
                return Err(CatalogError::InvalidProvider(format!(
                    "provider {} has an empty name",
                    provider.id
                )));
            }
            let id = provider.id;
            if by_id.insert(id, provider).is_some() {
                return Err(CatalogError::DuplicateProvider(id));
            }
        }

        Ok(Self { providers: by_id })
    }

    pub fn seeded() -> Self {
        Self {
            providers: seed_providers().into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// Load the catalog from the `providers` table.
    pub async fn load_from_supabase(supabase: &SupabaseClient) -> Result<Self, CatalogError> {
        debug!("Loading provider catalog from storage");

        let providers: Vec<Provider> = supabase
            .request(
                Method::GET,
                "/rest/v1/providers?select=id,name,specialty&order=id.asc",
                None,
            )
            .await
            .map_err(|e| CatalogError::LoadFailed(e.to_string()))?;

        let catalog = Self::new(providers)?;
        info!("Loaded {} providers", catalog.len());
        Ok(catalog)
    }

    /// All providers, ordered by id.
    pub fn list_providers(&self) -> Vec<Provider> {
        self.providers.values().cloned().collect()
    }

    pub fn get_provider(&self, id: ProviderId) -> Result<&Provider, CatalogError> {
        self.providers.get(&id).ok_or(CatalogError::NotFound(id))
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_lists_in_id_order() {
        let catalog = ProviderCatalog::seeded();
        let ids: Vec<_> = catalog.list_providers().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_blank_names() {
        let result = ProviderCatalog::new(vec![Provider::new(7, "  ", "Corte")]);
        assert!(matches!(result, Err(CatalogError::InvalidProvider(_))));
    }
}
