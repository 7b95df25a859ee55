use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    db::entities::{favorite_playlist, playlist},
    error::{AppError, Result},
    extractors::AuthUser,
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub playlist_id: i32,
    pub mood_tag: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFavoriteRequest {
    pub playlist_id: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistData {
    pub id: i32,
    pub spotify_id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub external_url: String,
    pub tracks: i32,
    pub embed_url: String,
}

impl From<playlist::Model> for PlaylistData {
    fn from(model: playlist::Model) -> Self {
        Self {
            id: model.id,
            spotify_id: model.spotify_id,
            name: model.name,
            description: model.description,
            image_url: model.image_url,
            external_url: model.external_url,
            tracks: model.tracks,
            embed_url: model.embed_url,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub id: i32,
    pub mood_tag: String,
    pub playlist: Option<PlaylistData>,
    pub created_at: String,
}

/// Favorite a cached playlist. Rejects a second favorite of the same
/// playlist for the same user; the check is application-level by design.
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<AddFavoriteRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.mood_tag.trim().is_empty() {
        return Err(AppError::Validation(
            "playlistId and moodTag are required".to_string(),
        ));
    }

    let found = playlist::Entity::find_by_id(req.playlist_id)
        .one(&state.db)
        .await?;

    if found.is_none() {
        return Err(AppError::NotFound("Playlist not found".to_string()));
    }

    let already_favorited = favorite_playlist::Entity::find()
        .filter(favorite_playlist::Column::UserId.eq(user_id))
        .filter(favorite_playlist::Column::PlaylistId.eq(req.playlist_id))
        .one(&state.db)
        .await?
        .is_some();

    if already_favorited {
        return Err(AppError::Validation(
            "Playlist already in favorites".to_string(),
        ));
    }

    let favorite = favorite_playlist::ActiveModel {
        user_id: Set(user_id),
        playlist_id: Set(req.playlist_id),
        mood_tag: Set(req.mood_tag.trim().to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    favorite.insert(&state.db).await?;

    Ok(Json(json!({ "message": "Playlist added to favorites" })))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<FavoriteResponse>>> {
    let favorites = favorites_for_user(&state.db, user_id).await?;
    Ok(Json(favorites))
}

/// One favorite looked up by playlist row id.
pub async fn get_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(playlist_id): Path<i32>,
) -> Result<Json<FavoriteResponse>> {
    let (favorite, found) = favorite_playlist::Entity::find()
        .filter(favorite_playlist::Column::UserId.eq(user_id))
        .filter(favorite_playlist::Column::PlaylistId.eq(playlist_id))
        .find_also_related(playlist::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found in favorites".to_string()))?;

    Ok(Json(FavoriteResponse {
        id: favorite.id,
        mood_tag: favorite.mood_tag,
        playlist: found.map(PlaylistData::from),
        created_at: favorite.created_at.to_rfc3339(),
    }))
}

/// Unfavorite by playlist id. Removing something that was never favorited
/// reports not-found rather than silently succeeding.
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<RemoveFavoriteRequest>,
) -> Result<Json<serde_json::Value>> {
    let deleted = favorite_playlist::Entity::delete_many()
        .filter(favorite_playlist::Column::UserId.eq(user_id))
        .filter(favorite_playlist::Column::PlaylistId.eq(req.playlist_id))
        .exec(&state.db)
        .await?;

    if deleted.rows_affected == 0 {
        return Err(AppError::NotFound(
            "Playlist not found in favorites".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Playlist removed from favorites" })))
}

pub(crate) async fn favorites_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<FavoriteResponse>> {
    let rows = favorite_playlist::Entity::find()
        .filter(favorite_playlist::Column::UserId.eq(user_id))
        .order_by_desc(favorite_playlist::Column::CreatedAt)
        .find_also_related(playlist::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(favorite, found)| FavoriteResponse {
            id: favorite.id,
            mood_tag: favorite.mood_tag,
            playlist: found.map(PlaylistData::from),
            created_at: favorite.created_at.to_rfc3339(),
        })
        .collect())
}
