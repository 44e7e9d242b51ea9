mod auth;
mod booking;
mod channels;
mod db;
mod device;
mod error;
mod middleware;
mod notification;
mod routes;
mod state;
mod workshop;

use booking::BookingRepository;
use channels::{ChannelSet, EmailChannel, PushChannel, SmsChannel, WhatsAppChannel};
use db::{create_pool, run_migrations};
use device::DeviceTokenRepository;
use notification::{NotificationRepository, NotificationService};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workshop::WorkshopRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,workshop_notify=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Repositories
    let notification_repository = NotificationRepository::new(db.clone());
    let booking_repository = BookingRepository::new(db.clone());
    let workshop_repository = WorkshopRepository::new(db.clone());
    let device_repository = DeviceTokenRepository::new(db.clone());

    // Channel adapters share one HTTP client
    let http_client = reqwest::Client::new();
    let channels = ChannelSet {
        push: Arc::new(PushChannel::new(
            http_client.clone(),
            config.fcm_api_url.clone(),
            config.fcm_server_key.clone(),
            Arc::new(device_repository.clone()),
        )),
        sms: Arc::new(SmsChannel::new(
            http_client.clone(),
            config.sms_api_url.clone(),
            config.sms_api_key.clone(),
            config.sms_sender.clone(),
        )),
        whatsapp: Arc::new(WhatsAppChannel::new(
            http_client.clone(),
            config.whatsapp_api_url.clone(),
            config.whatsapp_api_token.clone(),
        )),
        email: Arc::new(EmailChannel::new(
            http_client,
            config.email_api_url.clone(),
            config.email_api_token.clone(),
            config.email_sender.clone(),
        )),
    };

    let notification_service = NotificationService::new(
        Arc::new(notification_repository),
        Arc::new(booking_repository),
        Arc::new(workshop_repository),
        channels,
    );

    let state = AppState {
        db,
        config: config.clone(),
        notification_service,
        device_repository,
    };

    let app = create_router(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
