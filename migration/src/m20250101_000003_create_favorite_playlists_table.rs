use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;
use super::m20250101_000002_create_playlists_table::Playlists;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FavoritePlaylists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FavoritePlaylists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FavoritePlaylists::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FavoritePlaylists::PlaylistId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FavoritePlaylists::MoodTag)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FavoritePlaylists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_playlists_user_id")
                            .from(FavoritePlaylists::Table, FavoritePlaylists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_playlists_playlist_id")
                            .from(FavoritePlaylists::Table, FavoritePlaylists::PlaylistId)
                            .to(Playlists::Table, Playlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // No unique (user_id, playlist_id) constraint: duplicates are rejected
        // by the handler before insert.
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_playlists_user_id")
                    .table(FavoritePlaylists::Table)
                    .col(FavoritePlaylists::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoritePlaylists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FavoritePlaylists {
    Table,
    Id,
    UserId,
    PlaylistId,
    MoodTag,
    CreatedAt,
}
