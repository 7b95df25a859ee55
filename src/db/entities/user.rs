use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<i32>,
    #[serde(skip_serializing)]
    pub verification_expires_at: Option<DateTimeWithTimeZone>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorite_playlist::Entity")]
    FavoritePlaylists,
    #[sea_orm(has_many = "super::mood_history::Entity")]
    MoodHistory,
}

impl Related<super::favorite_playlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoritePlaylists.def()
    }
}

impl Related<super::mood_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoodHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
