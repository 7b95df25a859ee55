use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only snapshot of one emotion analysis: the raw likelihood labels,
/// the resolved dominant emotion, and the mood used for recommendations.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mood_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub joy_likelihood: String,
    pub sorrow_likelihood: String,
    pub anger_likelihood: String,
    pub surprise_likelihood: String,
    pub dominant: String,
    pub confidence_score: f64,
    pub mood: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::mood_history_playlist::Entity")]
    MoodHistoryPlaylists,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::mood_history_playlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoodHistoryPlaylists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
