use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path};

use provider_cell::{CatalogError, Provider, ProviderCatalog};
use shared_database::SupabaseClient;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

#[test]
fn get_provider_by_id() {
    let catalog = ProviderCatalog::seeded();

    let provider = catalog.get_provider(1).unwrap();
    assert_eq!(provider.name, "João Silva");
    assert_matches!(catalog.get_provider(42), Err(CatalogError::NotFound(42)));
}

#[test]
fn duplicate_ids_are_rejected() {
    let result = ProviderCatalog::new(vec![
        Provider::new(1, "Ana", "Corte"),
        Provider::new(1, "Bia", "Barba"),
    ]);

    assert_matches!(result, Err(CatalogError::DuplicateProvider(1)));
}

#[test]
fn explicit_catalog_is_sorted_by_id() {
    let catalog = ProviderCatalog::new(vec![
        Provider::new(9, "Zé", "Barba"),
        Provider::new(4, "Ana", "Corte"),
    ])
    .unwrap();

    let ids: Vec<_> = catalog.list_providers().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![4, 9]);
}

#[tokio::test]
async fn loads_catalog_from_supabase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::provider_response(1, "João Silva", "Corte Clássico"),
            MockSupabaseResponses::provider_response(2, "Carlos Santos", "Barba e Desenho"),
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    let supabase = SupabaseClient::new(&config).unwrap();

    let catalog = ProviderCatalog::load_from_supabase(&supabase).await.unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get_provider(2).unwrap().specialty, "Barba e Desenho");
}

#[tokio::test]
async fn load_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/providers"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    let supabase = SupabaseClient::new(&config).unwrap();

    let result = ProviderCatalog::load_from_supabase(&supabase).await;
    assert_matches!(result, Err(CatalogError::LoadFailed(_)));
}
