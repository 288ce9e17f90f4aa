use std::time::Duration;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, body_partial_json};
use serde_json::json;

use notification_cell::*;

fn confirmation() -> BookingConfirmation {
    BookingConfirmation {
        client_contact: "+5511977776666".to_string(),
        client_name: "Carla".to_string(),
        provider_name: "Pedro Oliveira".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
        slot: "15:00".to_string(),
        service: "Corte Moderno".to_string(),
    }
}

#[tokio::test]
async fn webhook_posts_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_partial_json(json!({ "to": "+5511977776666" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher =
        WebhookDispatcher::new(format!("{}/send", server.uri()), Duration::from_secs(2)).unwrap();

    assert!(dispatcher.dispatch(&confirmation()).await);
}

#[tokio::test]
async fn webhook_rejection_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let dispatcher = WebhookDispatcher::new(server.uri(), Duration::from_secs(2)).unwrap();

    assert!(!dispatcher.dispatch(&confirmation()).await);
}

#[tokio::test]
async fn slow_gateway_times_out_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let dispatcher = WebhookDispatcher::new(server.uri(), Duration::from_millis(100)).unwrap();

    assert!(!dispatcher.dispatch(&confirmation()).await);
}

#[test]
fn empty_webhook_url_is_rejected() {
    assert_matches!(
        WebhookDispatcher::new("  ", Duration::from_secs(1)),
        Err(NotificationError::Configuration(_))
    );
}

#[test]
fn dispatcher_from_config_falls_back_to_logging() {
    let config = NotificationConfig::default();
    assert!(dispatcher_from_config(&config, Duration::from_secs(1)).is_ok());
}
