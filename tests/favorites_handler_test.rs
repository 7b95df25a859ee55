//! Integration tests for favorite playlist routes

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::util::ServiceExt;

use moodify::handlers;
use moodify::state::AppState;
use moodify::test_utils::*;

fn create_test_router(state: &AppState) -> Router {
    Router::new()
        .nest("/api", handlers::api_routes())
        .with_state(state.clone())
}

async fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: axum::response::Response,
) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn favorites_request(method: &str, auth: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/api/favorites")
        .header(header::AUTHORIZATION, auth)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_add_and_list_favorites() {
    let state = setup_test_app_state().await;
    let user = create_test_user(&state.db, "fan@example.com", true).await;
    let first = create_test_playlist(&state.db, "pl-1", "Morning Boost").await;
    let second = create_test_playlist(&state.db, "pl-2", "Rainy Day").await;
    let auth = bearer_for(&state, user.id);

    for (playlist, tag) in [(&first, "upbeat"), (&second, "melancholic")] {
        let app = create_test_router(&state);
        let response = app
            .oneshot(favorites_request(
                "POST",
                &auth,
                json!({ "playlistId": playlist.id, "moodTag": tag }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    let favorites = body.as_array().unwrap();
    assert_eq!(favorites.len(), 2);
    for favorite in favorites {
        assert!(favorite["playlist"]["name"].is_string());
        assert!(favorite["moodTag"].is_string());
    }
}

#[tokio::test]
async fn test_add_favorite_twice_is_rejected() {
    let state = setup_test_app_state().await;
    let user = create_test_user(&state.db, "fan@example.com", true).await;
    let cached = create_test_playlist(&state.db, "pl-1", "Morning Boost").await;
    let auth = bearer_for(&state, user.id);

    let body = json!({ "playlistId": cached.id, "moodTag": "upbeat" });

    let response = create_test_router(&state)
        .oneshot(favorites_request("POST", &auth, body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_test_router(&state)
        .oneshot(favorites_request("POST", &auth, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: serde_json::Value = parse_json_response(response).await;
    assert_eq!(error["error"], "Playlist already in favorites");
}

#[tokio::test]
async fn test_add_favorite_missing_playlist() {
    let state = setup_test_app_state().await;
    let user = create_test_user(&state.db, "fan@example.com", true).await;
    let auth = bearer_for(&state, user.id);

    let response = create_test_router(&state)
        .oneshot(favorites_request(
            "POST",
            &auth,
            json!({ "playlistId": 404, "moodTag": "chill" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_favorite_blank_mood_tag() {
    let state = setup_test_app_state().await;
    let user = create_test_user(&state.db, "fan@example.com", true).await;
    let cached = create_test_playlist(&state.db, "pl-1", "Morning Boost").await;
    let auth = bearer_for(&state, user.id);

    let response = create_test_router(&state)
        .oneshot(favorites_request(
            "POST",
            &auth,
            json!({ "playlistId": cached.id, "moodTag": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_favorite_by_playlist_id() {
    let state = setup_test_app_state().await;
    let user = create_test_user(&state.db, "fan@example.com", true).await;
    let cached = create_test_playlist(&state.db, "pl-1", "Morning Boost").await;
    let auth = bearer_for(&state, user.id);

    let response = create_test_router(&state)
        .oneshot(favorites_request(
            "POST",
            &auth,
            json!({ "playlistId": cached.id, "moodTag": "upbeat" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_test_router(&state)
        .oneshot(
            Request::builder()
                .uri(format!("/api/favorites/{}", cached.id))
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["moodTag"], "upbeat");
    assert_eq!(body["playlist"]["spotifyId"], "pl-1");
}

#[tokio::test]
async fn test_get_favorite_not_favorited() {
    let state = setup_test_app_state().await;
    let user = create_test_user(&state.db, "fan@example.com", true).await;
    let cached = create_test_playlist(&state.db, "pl-1", "Morning Boost").await;

    let response = create_test_router(&state)
        .oneshot(
            Request::builder()
                .uri(format!("/api/favorites/{}", cached.id))
                .header(header::AUTHORIZATION, bearer_for(&state, user.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_favorite() {
    let state = setup_test_app_state().await;
    let user = create_test_user(&state.db, "fan@example.com", true).await;
    let cached = create_test_playlist(&state.db, "pl-1", "Morning Boost").await;
    let auth = bearer_for(&state, user.id);

    let response = create_test_router(&state)
        .oneshot(favorites_request(
            "POST",
            &auth,
            json!({ "playlistId": cached.id, "moodTag": "upbeat" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_test_router(&state)
        .oneshot(favorites_request(
            "DELETE",
            &auth,
            json!({ "playlistId": cached.id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gone now
    let response = create_test_router(&state)
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_remove_favorite_never_favorited() {
    let state = setup_test_app_state().await;
    let user = create_test_user(&state.db, "fan@example.com", true).await;
    let cached = create_test_playlist(&state.db, "pl-1", "Morning Boost").await;

    let response = create_test_router(&state)
        .oneshot(favorites_request(
            "DELETE",
            &bearer_for(&state, user.id),
            json!({ "playlistId": cached.id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_are_per_user() {
    let state = setup_test_app_state().await;
    let owner = create_test_user(&state.db, "owner@example.com", true).await;
    let other = create_test_user(&state.db, "other@example.com", true).await;
    let cached = create_test_playlist(&state.db, "pl-1", "Morning Boost").await;

    let response = create_test_router(&state)
        .oneshot(favorites_request(
            "POST",
            &bearer_for(&state, owner.id),
            json!({ "playlistId": cached.id, "moodTag": "upbeat" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_test_router(&state)
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::AUTHORIZATION, bearer_for(&state, other.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_favorites_require_auth() {
    let state = setup_test_app_state().await;

    let response = create_test_router(&state)
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
