use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use serde::Serialize;
use std::path::PathBuf;

use crate::{
    db::entities::{mood_history, mood_history_playlist, playlist, user},
    emotion::{self, DominantEmotion, EmotionLabels},
    error::{AppError, Result},
    extractors::OptionalAuthUser,
    services::PlaylistSummary,
    state::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub emotions: EmotionLabels,
    pub dominant: String,
    pub confidence_score: f64,
    pub recommended_music_mood: String,
    pub recommended_playlists: Vec<PlaylistSummary>,
}

const RECOMMENDATION_COUNT: usize = 5;

/// Full analysis pipeline: uploaded image -> face detection -> dominant
/// emotion -> mood -> playlist search. Recommendation failures degrade to an
/// empty list; history is recorded only for verified, authenticated callers.
pub async fn analyze_emotion(
    State(state): State<AppState>,
    OptionalAuthUser(user_id): OptionalAuthUser,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>> {
    let image = read_image_field(&mut multipart).await?;
    let temp_path = save_upload(&state.config.upload_dir, &image).await?;

    let faces = match state.vision.detect_faces(&image).await {
        Ok(faces) => faces,
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }
    };

    if faces.is_empty() {
        tokio::fs::remove_file(&temp_path).await?;
        return Err(AppError::Validation(
            "No faces detected in the image".to_string(),
        ));
    }

    // Only the first detected face is considered
    let labels = faces[0].emotion_labels();
    let scores = emotion::scores_from_labels(&labels);
    let dominant = emotion::dominant_emotion(&scores);
    let mood = emotion::mood_for_emotion(dominant.emotion);

    tokio::fs::remove_file(&temp_path).await?;

    let query = emotion::pick_search_query(mood);
    let playlists = match state
        .spotify
        .search_playlists(&query, RECOMMENDATION_COUNT)
        .await
    {
        Ok(playlists) => playlists,
        Err(e) => {
            tracing::error!("playlist search failed for mood {:?}: {}", mood, e);
            Vec::new()
        }
    };

    if let Some(user_id) = user_id {
        record_history(&state.db, user_id, &labels, &dominant, mood, &playlists).await?;
    }

    Ok(Json(AnalyzeResponse {
        emotions: labels,
        dominant: dominant.emotion.to_string(),
        confidence_score: dominant.confidence(),
        recommended_music_mood: mood.to_string(),
        recommended_playlists: playlists,
    }))
}

async fn read_image_field(multipart: &mut Multipart) -> Result<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid image upload: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(AppError::Validation("No image file uploaded".to_string()))
}

async fn save_upload(upload_dir: &str, image: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir).await?;

    let path = PathBuf::from(upload_dir).join(uuid::Uuid::new_v4().to_string());
    tokio::fs::write(&path, image).await?;

    Ok(path)
}

/// Append a mood-history snapshot for a verified user. Unverified users get
/// recommendations but no record.
async fn record_history(
    db: &DatabaseConnection,
    user_id: i32,
    labels: &EmotionLabels,
    dominant: &DominantEmotion,
    mood: &str,
    playlists: &[PlaylistSummary],
) -> Result<()> {
    let Some(found) = user::Entity::find_by_id(user_id).one(db).await? else {
        return Ok(());
    };

    if !found.is_verified {
        return Ok(());
    }

    let entry = mood_history::ActiveModel {
        user_id: Set(user_id),
        joy_likelihood: Set(labels.joy.clone()),
        sorrow_likelihood: Set(labels.sorrow.clone()),
        anger_likelihood: Set(labels.angry.clone()),
        surprise_likelihood: Set(labels.surprise.clone()),
        dominant: Set(dominant.emotion.to_string()),
        confidence_score: Set(dominant.confidence()),
        mood: Set(mood.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let entry = entry.insert(db).await?;

    for (position, summary) in playlists.iter().enumerate() {
        let cached = upsert_playlist(db, summary).await?;

        let link = mood_history_playlist::ActiveModel {
            mood_history_id: Set(entry.id),
            playlist_id: Set(cached.id),
            position: Set(position as i32),
            ..Default::default()
        };
        link.insert(db).await?;
    }

    Ok(())
}

/// Insert-if-absent on the external playlist id, then read the row back.
/// Concurrent identical requests race harmlessly: the conflict is swallowed
/// and both see the same cached row.
async fn upsert_playlist(
    db: &DatabaseConnection,
    summary: &PlaylistSummary,
) -> Result<playlist::Model> {
    let row = playlist::ActiveModel {
        spotify_id: Set(summary.id.clone()),
        name: Set(summary.name.clone()),
        description: Set(Some(summary.description.clone())),
        image_url: Set(summary.image_url.clone()),
        external_url: Set(summary.external_url.clone()),
        tracks: Set(summary.tracks),
        embed_url: Set(summary.embed_url.clone()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    let insert = playlist::Entity::insert(row).on_conflict(
        OnConflict::column(playlist::Column::SpotifyId)
            .do_nothing()
            .to_owned(),
    );

    match insert.exec(db).await {
        Ok(_) => {}
        Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e.into()),
    }

    playlist::Entity::find()
        .filter(playlist::Column::SpotifyId.eq(&summary.id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal("playlist row missing after upsert".to_string()))
}
