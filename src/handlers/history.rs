use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::{
    db::entities::{mood_history, mood_history_playlist, playlist},
    emotion::EmotionLabels,
    error::{AppError, Result},
    extractors::AuthUser,
    handlers::favorites::PlaylistData,
    state::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: i32,
    pub emotions: EmotionLabels,
    pub dominant: String,
    pub confidence_score: f64,
    pub recommended_music_mood: String,
    pub recommended_playlists: Vec<PlaylistData>,
    pub timestamp: String,
}

/// Mood history for the authenticated user, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<HistoryEntryResponse>>> {
    let entries = history_for_user(&state.db, user_id).await?;
    Ok(Json(entries))
}

pub async fn get_history_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<HistoryEntryResponse>> {
    let entry = mood_history::Entity::find_by_id(id)
        .filter(mood_history::Column::UserId.eq(user_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("History entry not found".to_string()))?;

    let response = entry_response(&state.db, entry).await?;
    Ok(Json(response))
}

pub(crate) async fn history_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<HistoryEntryResponse>> {
    let entries = mood_history::Entity::find()
        .filter(mood_history::Column::UserId.eq(user_id))
        .order_by_desc(mood_history::Column::CreatedAt)
        .all(db)
        .await?;

    let mut responses = Vec::with_capacity(entries.len());
    for entry in entries {
        responses.push(entry_response(db, entry).await?);
    }

    Ok(responses)
}

async fn entry_response(
    db: &DatabaseConnection,
    entry: mood_history::Model,
) -> Result<HistoryEntryResponse> {
    let playlists = mood_history_playlist::Entity::find()
        .filter(mood_history_playlist::Column::MoodHistoryId.eq(entry.id))
        .order_by_asc(mood_history_playlist::Column::Position)
        .find_also_related(playlist::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(_, found)| found)
        .map(PlaylistData::from)
        .collect();

    Ok(HistoryEntryResponse {
        id: entry.id,
        emotions: EmotionLabels {
            joy: entry.joy_likelihood,
            sorrow: entry.sorrow_likelihood,
            angry: entry.anger_likelihood,
            surprise: entry.surprise_likelihood,
        },
        dominant: entry.dominant,
        confidence_score: entry.confidence_score,
        recommended_music_mood: entry.mood,
        recommended_playlists: playlists,
        timestamp: entry.created_at.to_rfc3339(),
    })
}
