use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_playlists_table::Playlists;
use super::m20250101_000004_create_mood_history_table::MoodHistory;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MoodHistoryPlaylists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MoodHistoryPlaylists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MoodHistoryPlaylists::MoodHistoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistoryPlaylists::PlaylistId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistoryPlaylists::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mood_history_playlists_mood_history_id")
                            .from(
                                MoodHistoryPlaylists::Table,
                                MoodHistoryPlaylists::MoodHistoryId,
                            )
                            .to(MoodHistory::Table, MoodHistory::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mood_history_playlists_playlist_id")
                            .from(
                                MoodHistoryPlaylists::Table,
                                MoodHistoryPlaylists::PlaylistId,
                            )
                            .to(Playlists::Table, Playlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mood_history_playlists_mood_history_id")
                    .table(MoodHistoryPlaylists::Table)
                    .col(MoodHistoryPlaylists::MoodHistoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MoodHistoryPlaylists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MoodHistoryPlaylists {
    Table,
    Id,
    MoodHistoryId,
    PlaylistId,
    Position,
}
