use anyhow::Result;
use axum::{routing::get, Router};
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::Database;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodify::config::Config;
use moodify::services::{Mailer, SpotifyService, TokenService, VisionService};
use moodify::state::AppState;
use moodify::{handlers, tasks};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodify=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Moodify...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Connected to database");

    // Run migrations
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations completed");

    // Construct external service clients once; handlers get them via state
    let vision = VisionService::new(config.vision_api_key.clone());
    let spotify = SpotifyService::new(
        config.spotify_client_id.clone(),
        config.spotify_client_secret.clone(),
    );
    let mailer = Mailer::new(&config)?;
    let tokens = TokenService::new(&config);

    let state = AppState::new(db, config.clone(), vision, spotify, mailer, tokens);

    // Keep the playlist-search token fresh for the life of the process
    let token_refresh = tasks::spawn_token_refresh(state.spotify.clone());
    tracing::info!("Search token refresh task started");

    // Build application routes
    let app = create_router(state.clone());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    token_refresh.stop().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // API routes (JSON)
        .nest("/api", handlers::api_routes())

        // Static file serving for profile photos
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received");
}
