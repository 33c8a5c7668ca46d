use portfolio_backend::{
    cache::MediaCache,
    config::Config,
    contact::ContactRelay,
    errors::AppError,
    instagram::{InstagramGraphClient, MediaService},
    mailer::SmtpMailTransport,
    oauth::InstagramOAuth,
    routes::create_router,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "portfolio_backend=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::load()?;
    if config.instagram.access_token.is_none() {
        tracing::warn!("INSTAGRAM_ACCESS_TOKEN is not set; media and refresh endpoints will fail");
    }

    // --- Clients ---
    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::InternalServerError(format!("Failed to build HTTP client: {}", e)))?;

    let media = MediaService::new(
        Arc::new(InstagramGraphClient::new(http.clone())),
        MediaCache::new(config.media_cache_ttl),
    );
    let oauth = InstagramOAuth::new(http, &config.instagram);

    let mailer = SmtpMailTransport::new(&config.mail)
        .map_err(|e| AppError::ConfigError(format!("Failed to create SMTP transport: {}", e)))?;
    // Startup check only; a failure is logged and the server still starts.
    mailer.verify().await;
    let contact = ContactRelay::new(Arc::new(mailer), config.mail.recipient.clone());

    // --- Application State ---
    let addr = config.bind_address;
    let state = Arc::new(AppState {
        config,
        media,
        oauth,
        contact,
    });

    let app = create_router(state);

    // --- Server Startup ---
    tracing::info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Failed to bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Server error: {}", e)))?;

    Ok(())
}
