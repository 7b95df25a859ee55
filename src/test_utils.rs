//! Test utilities for Moodify
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite databases (one per test)
//! - AppState factories with redirectable external service URLs
//! - Test data generators

use chrono::{Duration, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::{
    config::Config,
    db::entities::{mood_history, playlist, user},
    services::{Mailer, SpotifyService, TokenService, VisionService},
    state::AppState,
};

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    // Run all migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test configuration with sensible defaults
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        jwt_access_secret: "test-access-secret".to_string(),
        jwt_refresh_secret: "test-refresh-secret".to_string(),
        access_token_ttl_minutes: 60,
        refresh_token_ttl_days: 15,
        spotify_client_id: "test_client_id".to_string(),
        spotify_client_secret: "test_client_secret".to_string(),
        vision_api_key: "test_vision_key".to_string(),
        smtp_host: "localhost".to_string(),
        smtp_username: String::new(),
        smtp_password: String::new(),
        smtp_from: "Moodify <no-reply@moodify.test>".to_string(),
        upload_dir: std::env::temp_dir()
            .join(format!("moodify-test-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        static_dir: std::env::temp_dir()
            .join(format!("moodify-static-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
    }
}

/// Create a complete test AppState with an isolated database. External
/// services point at unroutable localhost ports; tests that exercise them
/// use [`setup_test_app_state_with_urls`] instead.
pub async fn setup_test_app_state() -> AppState {
    setup_test_app_state_with_urls("http://127.0.0.1:9", "http://127.0.0.1:9").await
}

/// Test AppState whose vision and playlist-search clients talk to the given
/// base URLs (normally wiremock servers). The search client's auth and API
/// endpoints share one base.
pub async fn setup_test_app_state_with_urls(vision_base: &str, spotify_base: &str) -> AppState {
    let db = setup_test_db().await;
    let config = test_config();

    let vision = VisionService::with_base_url(
        config.vision_api_key.clone(),
        vision_base.to_string(),
    );
    let spotify = SpotifyService::with_base_urls(
        config.spotify_client_id.clone(),
        config.spotify_client_secret.clone(),
        spotify_base.to_string(),
        spotify_base.to_string(),
    );
    let mailer = Mailer::new(&config).expect("Failed to build test mailer");
    let tokens = TokenService::new(&config);

    AppState::new(db, config, vision, spotify, mailer, tokens)
}

// ============================================================================
// Test Data Factories
// ============================================================================

/// Create a test user in the database. Password is always "password123".
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    is_verified: bool,
) -> user::Model {
    let now = Utc::now().into();
    // Low cost keeps the test suite fast
    let password_hash = bcrypt::hash("password123", 4).expect("Failed to hash test password");

    let model = user::ActiveModel {
        username: Set("testuser".to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        is_verified: Set(is_verified),
        verification_code: Set((!is_verified).then_some(123_456)),
        verification_expires_at: Set((!is_verified)
            .then(|| (Utc::now() + Duration::minutes(15)).into())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model.insert(db).await.expect("Failed to insert test user")
}

/// Create a cached playlist row
pub async fn create_test_playlist(
    db: &DatabaseConnection,
    spotify_id: &str,
    name: &str,
) -> playlist::Model {
    let model = playlist::ActiveModel {
        spotify_id: Set(spotify_id.to_string()),
        name: Set(name.to_string()),
        description: Set(Some(String::new())),
        image_url: Set(None),
        external_url: Set(format!("https://open.spotify.com/playlist/{}", spotify_id)),
        tracks: Set(10),
        embed_url: Set(format!(
            "https://open.spotify.com/embed/playlist/{}?utm_source=generator",
            spotify_id
        )),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    model
        .insert(db)
        .await
        .expect("Failed to insert test playlist")
}

/// Create a mood history entry
pub async fn create_test_history_entry(
    db: &DatabaseConnection,
    user_id: i32,
    dominant: &str,
    mood: &str,
) -> mood_history::Model {
    let model = mood_history::ActiveModel {
        user_id: Set(user_id),
        joy_likelihood: Set("VERY_LIKELY".to_string()),
        sorrow_likelihood: Set("UNLIKELY".to_string()),
        anger_likelihood: Set("UNKNOWN".to_string()),
        surprise_likelihood: Set("UNKNOWN".to_string()),
        dominant: Set(dominant.to_string()),
        confidence_score: Set(1.0),
        mood: Set(mood.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    model
        .insert(db)
        .await
        .expect("Failed to insert test history entry")
}

/// Bearer header value for the given user
pub fn bearer_for(state: &AppState, user_id: i32) -> String {
    let token = state
        .tokens
        .generate_access_token(user_id)
        .expect("Failed to generate test token");
    format!("Bearer {}", token)
}
