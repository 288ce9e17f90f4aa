use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use appointment_cell::AppointmentContext;
use provider_cell::router::provider_routes;
use provider_cell::ProviderCatalog;

pub fn create_router(catalog: Arc<ProviderCatalog>, appointments: Arc<AppointmentContext>) -> Router {
    Router::new()
        .route("/", get(|| async { "Booking API is running!" }))
        .nest("/providers", provider_routes(catalog))
        .nest("/appointments", appointment_routes(appointments))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use appointment_cell::{InMemoryBookingStore, SlotGrid};
    use shared_utils::test_utils::read_json;

    use super::*;

    fn app() -> Router {
        let catalog = Arc::new(ProviderCatalog::seeded());
        let appointments = Arc::new(AppointmentContext::new(
            Arc::new(InMemoryBookingStore::new()),
            Arc::clone(&catalog),
            Arc::new(SlotGrid::standard()),
            None,
            Duration::from_secs(2),
        ));
        create_router(catalog, appointments)
    }

    #[tokio::test]
    async fn root_reports_liveness() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn nested_routes_share_the_catalog() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/providers").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let providers: Value = read_json(response).await;
        let first_id = providers[0]["id"].as_i64().unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/appointments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "client_name": "A",
                    "provider_id": first_id,
                    "date": "2024-06-01",
                    "slot": "09:00",
                    "service": "Cut",
                    "price": 30
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
