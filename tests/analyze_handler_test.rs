//! Integration tests for the emotion analysis pipeline
//!
//! External services are stubbed with wiremock so the full
//! upload -> detect -> map -> recommend flow runs against canned responses.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sea_orm::EntityTrait;
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use moodify::db::entities::{mood_history, mood_history_playlist, playlist};
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

const BOUNDARY: &str = "analyze-test-boundary";

/// Multipart body with a single file field
fn multipart_image(field_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"face.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyze_request(body: Vec<u8>, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/analyze-emotion")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn mount_vision_face(server: &MockServer, joy: &str, sorrow: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [{
                "faceAnnotations": [{
                    "joyLikelihood": joy,
                    "sorrowLikelihood": sorrow,
                    "angerLikelihood": "UNKNOWN",
                    "surpriseLikelihood": "UNKNOWN"
                }]
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_spotify(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "stub-token",
            "expires_in": 3600
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "playlists": { "items": items } })),
        )
        .mount(server)
        .await;
}

fn search_items() -> serde_json::Value {
    json!([
        {
            "id": "pl-happy-1",
            "name": "Good Vibes",
            "description": "Nothing but smiles",
            "images": [{ "url": "https://img.example/one.jpg" }],
            "external_urls": { "spotify": "https://open.spotify.com/playlist/pl-happy-1" },
            "tracks": { "total": 30 }
        },
        {
            "id": "pl-happy-2",
            "name": null,
            "description": null,
            "images": null,
            "external_urls": null,
            "tracks": null
        },
        null
    ])
}

async fn assert_upload_dir_empty(state: &AppState) {
    let mut entries = match tokio::fs::read_dir(&state.config.upload_dir).await {
        Ok(entries) => entries,
        // Dir never created means nothing was written either
        Err(_) => return,
    };
    assert!(entries.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_analyze_without_image_field() {
    let state = setup_test_app_state().await;

    let body = multipart_image("photo", b"not the right field");
    let response = create_test_router(&state)
        .oneshot(analyze_request(body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: serde_json::Value = parse_json_response(response).await;
    assert_eq!(error["error"], "No image file uploaded");
}

#[tokio::test]
async fn test_analyze_no_faces_detected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responses": [{}] })))
        .mount(&server)
        .await;

    let state = setup_test_app_state_with_urls(&server.uri(), &server.uri()).await;

    let response = create_test_router(&state)
        .oneshot(analyze_request(multipart_image("image", b"landscape"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: serde_json::Value = parse_json_response(response).await;
    assert_eq!(error["error"], "No faces detected in the image");

    // Temp upload was cleaned up
    assert_upload_dir_empty(&state).await;
}

#[tokio::test]
async fn test_analyze_maps_joy_to_upbeat() {
    let server = MockServer::start().await;
    mount_vision_face(&server, "LIKELY", "UNLIKELY").await;
    mount_spotify(&server, search_items()).await;

    let state = setup_test_app_state_with_urls(&server.uri(), &server.uri()).await;

    let response = create_test_router(&state)
        .oneshot(analyze_request(multipart_image("image", b"jpeg-bytes"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["dominant"], "joy");
    assert_eq!(body["confidenceScore"], 0.8);
    assert_eq!(body["recommendedMusicMood"], "upbeat");
    assert_eq!(body["emotions"]["joy"], "LIKELY");
    assert_eq!(body["emotions"]["sorrow"], "UNLIKELY");

    // Two real items; the null entry is dropped
    let playlists = body["recommendedPlaylists"].as_array().unwrap();
    assert_eq!(playlists.len(), 2);
    for summary in playlists {
        assert!(summary["id"].is_string());
        assert!(summary["embedUrl"]
            .as_str()
            .unwrap()
            .contains("utm_source=generator"));
    }

    // Sparse item got its fallbacks
    let sparse = playlists
        .iter()
        .find(|summary| summary["id"] == "pl-happy-2")
        .unwrap();
    assert_eq!(sparse["name"], "Unnamed Playlist");
    assert_eq!(sparse["tracks"], 0);

    assert_upload_dir_empty(&state).await;
}

#[tokio::test]
async fn test_analyze_neutral_face_maps_to_chill() {
    let server = MockServer::start().await;
    mount_vision_face(&server, "VERY_UNLIKELY", "VERY_UNLIKELY").await;
    mount_spotify(&server, json!([])).await;

    let state = setup_test_app_state_with_urls(&server.uri(), &server.uri()).await;

    let response = create_test_router(&state)
        .oneshot(analyze_request(multipart_image("image", b"blank-stare"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["dominant"], "neutral");
    assert_eq!(body["confidenceScore"], 0.0);
    assert_eq!(body["recommendedMusicMood"], "chill");
}

#[tokio::test]
async fn test_analyze_survives_search_failure() {
    let server = MockServer::start().await;
    mount_vision_face(&server, "VERY_LIKELY", "UNLIKELY").await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = setup_test_app_state_with_urls(&server.uri(), &server.uri()).await;

    let response = create_test_router(&state)
        .oneshot(analyze_request(multipart_image("image", b"jpeg-bytes"), None))
        .await
        .unwrap();

    // Recommendations degrade to empty; the analysis itself still succeeds
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["dominant"], "joy");
    assert_eq!(body["recommendedPlaylists"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_analyze_records_history_for_verified_user() {
    let server = MockServer::start().await;
    mount_vision_face(&server, "LIKELY", "UNLIKELY").await;
    mount_spotify(&server, search_items()).await;

    let state = setup_test_app_state_with_urls(&server.uri(), &server.uri()).await;
    let user = create_test_user(&state.db, "ada@example.com", true).await;
    let auth = bearer_for(&state, user.id);

    let response = create_test_router(&state)
        .oneshot(analyze_request(
            multipart_image("image", b"jpeg-bytes"),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let entries = mood_history::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, user.id);
    assert_eq!(entries[0].dominant, "joy");
    assert_eq!(entries[0].mood, "upbeat");

    let cached = playlist::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(cached.len(), 2);

    let links = mood_history_playlist::Entity::find()
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(links.len(), 2);

    // A second analysis reuses the cached playlist rows
    let response = create_test_router(&state)
        .oneshot(analyze_request(
            multipart_image("image", b"jpeg-bytes"),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let entries = mood_history::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(entries.len(), 2);

    let cached = playlist::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(cached.len(), 2, "playlist cache must not grow duplicates");
}

#[tokio::test]
async fn test_analyze_skips_history_for_unverified_user() {
    let server = MockServer::start().await;
    mount_vision_face(&server, "LIKELY", "UNLIKELY").await;
    mount_spotify(&server, search_items()).await;

    let state = setup_test_app_state_with_urls(&server.uri(), &server.uri()).await;
    let user = create_test_user(&state.db, "new@example.com", false).await;
    let auth = bearer_for(&state, user.id);

    let response = create_test_router(&state)
        .oneshot(analyze_request(
            multipart_image("image", b"jpeg-bytes"),
            Some(&auth),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let entries = mood_history::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(entries.len(), 0);
}

#[tokio::test]
async fn test_analyze_vision_outage_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = setup_test_app_state_with_urls(&server.uri(), &server.uri()).await;

    let response = create_test_router(&state)
        .oneshot(analyze_request(multipart_image("image", b"jpeg-bytes"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_upload_dir_empty(&state).await;
}
