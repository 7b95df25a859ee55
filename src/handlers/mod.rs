pub mod health;
pub mod users;
pub mod analyze;
pub mod favorites;
pub mod history;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // User and auth endpoints
        .route("/users/signup", post(users::signup))
        .route("/users/verify", post(users::verify))
        .route("/users/login", post(users::login))
        .route("/users/mobile-login", post(users::mobile_login))
        .route("/users/logout", post(users::logout))
        .route("/users/newaccesstoken", post(users::refresh_access_token))
        .route("/users/mobile-refresh", post(users::mobile_refresh))
        .route("/users/user-profile", put(users::update_profile))
        .route("/users/me", get(users::me))
        .route("/users/dashboard", get(users::dashboard))

        // Emotion analysis
        .route("/analyze-emotion", post(analyze::analyze_emotion))

        // Favorites
        .route(
            "/favorites",
            post(favorites::add_favorite)
                .get(favorites::list_favorites)
                .delete(favorites::remove_favorite),
        )
        .route("/favorites/:id", get(favorites::get_favorite))

        // Mood history
        .route("/history", get(history::list_history))
        .route("/history/:id", get(history::get_history_entry))
}
