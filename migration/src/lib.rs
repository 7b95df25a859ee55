pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_playlists_table;
mod m20250101_000003_create_favorite_playlists_table;
mod m20250101_000004_create_mood_history_table;
mod m20250101_000005_create_mood_history_playlists_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_playlists_table::Migration),
            Box::new(m20250101_000003_create_favorite_playlists_table::Migration),
            Box::new(m20250101_000004_create_mood_history_table::Migration),
            Box::new(m20250101_000005_create_mood_history_playlists_table::Migration),
        ]
    }
}
