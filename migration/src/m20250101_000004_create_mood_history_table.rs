use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MoodHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MoodHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::JoyLikelihood)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::SorrowLikelihood)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::AngerLikelihood)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::SurpriseLikelihood)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::Dominant)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::ConfidenceScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::Mood)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MoodHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mood_history_user_id")
                            .from(MoodHistory::Table, MoodHistory::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mood_history_user_id")
                    .table(MoodHistory::Table)
                    .col(MoodHistory::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MoodHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MoodHistory {
    Table,
    Id,
    UserId,
    JoyLikelihood,
    SorrowLikelihood,
    AngerLikelihood,
    SurpriseLikelihood,
    Dominant,
    ConfidenceScore,
    Mood,
    CreatedAt,
}
