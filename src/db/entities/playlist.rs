use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Local cache row for an externally hosted playlist, keyed by the search
/// provider's id. Created on first sight, never updated afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "playlists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub spotify_id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub external_url: String,
    pub tracks: i32,
    pub embed_url: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorite_playlist::Entity")]
    FavoritePlaylists,
    #[sea_orm(has_many = "super::mood_history_playlist::Entity")]
    MoodHistoryPlaylists,
}

impl Related<super::favorite_playlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoritePlaylists.def()
    }
}

impl Related<super::mood_history_playlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoodHistoryPlaylists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
