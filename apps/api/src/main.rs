use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::{AppointmentContext, BookingStore, InMemoryBookingStore, SlotGrid, SupabaseBookingStore};
use notification_cell::{dispatcher_from_config, notification_channel, NotificationConfig, NotificationWorker};
use provider_cell::ProviderCatalog;
use shared_config::{AppConfig, StorageBackend};
use shared_database::SupabaseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting booking API server");

    let config = AppConfig::from_env();

    let (catalog, store) = open_storage(&config).await?;
    info!("Catalog ready with {} providers", catalog.len());

    // Confirmations leave the request path through a queue drained by one worker.
    let notification_config = NotificationConfig::from(&config);
    if !config.is_notification_configured() {
        warn!("NOTIFICATION_WEBHOOK_URL not set, confirmations will only be logged");
    }
    let dispatcher = dispatcher_from_config(&notification_config, config.storage_timeout())
        .context("Failed to configure notification dispatcher")?;
    let (publisher, receiver) = notification_channel(notification_config.queue_capacity);
    let worker = NotificationWorker::new(receiver, dispatcher).spawn();

    let appointments = Arc::new(AppointmentContext::new(
        store,
        Arc::clone(&catalog),
        Arc::new(SlotGrid::standard()),
        Some(publisher),
        config.storage_timeout(),
    ));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router::create_router(catalog, appointments)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router owned the last publisher; the worker drains what is left and stops.
    match worker.await {
        Ok(stats) => info!(
            "Notification worker finished: {} delivered, {} failed",
            stats.delivered, stats.failed
        ),
        Err(e) => warn!("Notification worker ended abnormally: {}", e),
    }

    Ok(())
}

async fn open_storage(
    config: &AppConfig,
) -> anyhow::Result<(Arc<ProviderCatalog>, Arc<dyn BookingStore>)> {
    match config.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory booking store with seeded providers");
            let store: Arc<dyn BookingStore> = Arc::new(InMemoryBookingStore::new());
            Ok((Arc::new(ProviderCatalog::seeded()), store))
        }
        StorageBackend::Supabase => {
            info!("Using Supabase booking store at {}", config.supabase_url);
            let supabase = Arc::new(SupabaseClient::new(config)?);
            let catalog = ProviderCatalog::load_from_supabase(&supabase)
                .await
                .context("Failed to load provider catalog")?;
            let store: Arc<dyn BookingStore> = Arc::new(SupabaseBookingStore::new(supabase));
            Ok((Arc::new(catalog), store))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
