use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mood_history_playlists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub mood_history_id: i32,
    pub playlist_id: i32,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mood_history::Entity",
        from = "Column::MoodHistoryId",
        to = "super::mood_history::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    MoodHistory,
    #[sea_orm(
        belongs_to = "super::playlist::Entity",
        from = "Column::PlaylistId",
        to = "super::playlist::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Playlist,
}

impl Related<super::mood_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoodHistory.def()
    }
}

impl Related<super::playlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Playlist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
