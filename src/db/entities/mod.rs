pub mod user;
pub mod playlist;
pub mod favorite_playlist;
pub mod mood_history;
pub mod mood_history_playlist;

pub use user::Entity as User;
pub use playlist::Entity as Playlist;
pub use favorite_playlist::Entity as FavoritePlaylist;
pub use mood_history::Entity as MoodHistory;
pub use mood_history_playlist::Entity as MoodHistoryPlaylist;
