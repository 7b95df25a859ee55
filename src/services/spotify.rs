use base64::{engine::general_purpose, Engine as _};
use governor::{
    clock::DefaultClock, state::direct::NotKeyed, state::InMemoryState, Quota, RateLimiter,
};
use nonzero_ext::nonzero;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};

const SPOTIFY_AUTH_BASE: &str = "https://accounts.spotify.com";
const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Playlist-search client. Authenticates with the client-credentials grant
/// and holds the current access token behind a lock so the refresh task and
/// request handlers share one token.
#[derive(Clone)]
pub struct SpotifyService {
    client: Client,
    client_id: String,
    client_secret: String,
    auth_base: String,
    api_base: String,
    access_token: Arc<RwLock<Option<String>>>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Playlist metadata in the shape the rest of the app consumes: the raw
/// search-result item normalized with fallback URLs and counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub external_url: String,
    pub tracks: i32,
    pub embed_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    playlists: Option<PlaylistPage>,
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    // The search endpoint pads result pages with nulls
    items: Vec<Option<RawPlaylist>>,
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    id: String,
    name: Option<String>,
    description: Option<String>,
    images: Option<Vec<RawImage>>,
    external_urls: Option<ExternalUrls>,
    tracks: Option<TracksRef>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TracksRef {
    total: Option<i32>,
}

impl SpotifyService {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            client_id,
            client_secret,
            SPOTIFY_AUTH_BASE.to_string(),
            SPOTIFY_API_BASE.to_string(),
        )
    }

    /// Point the client at different hosts (used by tests).
    pub fn with_base_urls(
        client_id: String,
        client_secret: String,
        auth_base: String,
        api_base: String,
    ) -> Self {
        // 2 requests per second stays well under the provider's ceiling
        let quota = Quota::per_second(nonzero!(2u32));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            client_id,
            client_secret,
            auth_base,
            api_base,
            access_token: Arc::new(RwLock::new(None)),
            rate_limiter,
        }
    }

    /// Run the client-credentials grant and store the new access token.
    /// Returns the token lifetime in seconds so the refresh task can
    /// schedule the next round.
    pub async fn authenticate(&self) -> Result<i64> {
        self.rate_limiter.until_ready().await;

        let credentials = general_purpose::STANDARD
            .encode(format!("{}:{}", self.client_id, self.client_secret));

        let response = self
            .client
            .post(format!("{}/api/token", self.auth_base))
            .header("Authorization", format!("Basic {}", credentials))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::Authentication(format!(
                "Failed to obtain search token: {}",
                error_text
            )));
        }

        let token: TokenResponse = response.json().await?;
        let expires_in = token.expires_in;

        *self.access_token.write().await = Some(token.access_token);

        Ok(expires_in)
    }

    async fn current_token(&self) -> Result<String> {
        if let Some(token) = self.access_token.read().await.as_ref() {
            return Ok(token.clone());
        }

        // First call before the refresh task has run
        self.authenticate().await?;

        self.access_token
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Internal("search token missing after authentication".into()))
    }

    /// Search playlists for a free-text query. Over-fetches, shuffles, and
    /// truncates to `limit` so repeated identical queries vary their
    /// results. Output order is deliberately non-deterministic.
    pub async fn search_playlists(&self, query: &str, limit: usize) -> Result<Vec<PlaylistSummary>> {
        self.rate_limiter.until_ready().await;

        let token = self.current_token().await?;
        let fetch_count = (limit * 3).clamp(1, 50);

        let url = format!(
            "{}/search?q={}&type=playlist&limit={}",
            self.api_base,
            urlencoding::encode(query),
            fetch_count
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(AppError::ExternalApi(format!(
                "Playlist search error ({}): {}",
                status, error_text
            )));
        }

        let data: SearchResponse = response.json().await?;

        let Some(page) = data.playlists else {
            tracing::warn!("playlist search returned no playlists object for {:?}", query);
            return Ok(Vec::new());
        };

        let mut playlists: Vec<PlaylistSummary> = page
            .items
            .into_iter()
            .flatten()
            .map(Self::summarize)
            .collect();

        playlists.shuffle(&mut rand::thread_rng());
        playlists.truncate(limit);

        Ok(playlists)
    }

    fn summarize(raw: RawPlaylist) -> PlaylistSummary {
        let external_url = raw
            .external_urls
            .and_then(|urls| urls.spotify)
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", raw.id));

        let embed_url = format!(
            "https://open.spotify.com/embed/playlist/{}?utm_source=generator",
            raw.id
        );

        PlaylistSummary {
            name: raw.name.unwrap_or_else(|| "Unnamed Playlist".to_string()),
            description: raw.description.unwrap_or_default(),
            image_url: raw
                .images
                .and_then(|images| images.into_iter().next())
                .map(|image| image.url),
            external_url,
            tracks: raw.tracks.and_then(|tracks| tracks.total).unwrap_or(0),
            embed_url,
            id: raw.id,
        }
    }
}
