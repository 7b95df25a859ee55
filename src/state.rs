use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::services::{Mailer, SpotifyService, TokenService, VisionService};

/// Shared per-process state. The external service clients are constructed
/// once in `main` and injected here rather than living as module globals.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub vision: VisionService,
    pub spotify: SpotifyService,
    pub mailer: Mailer,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        vision: VisionService,
        spotify: SpotifyService,
        mailer: Mailer,
        tokens: TokenService,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            vision,
            spotify,
            mailer,
            tokens,
        }
    }
}
