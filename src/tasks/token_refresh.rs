use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::services::SpotifyService;

/// Handle to the periodic search-token refresh task. Dropping it does not
/// stop the task; call [`TokenRefreshHandle::stop`] during shutdown.
pub struct TokenRefreshHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TokenRefreshHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

/// Spawn the task that keeps the playlist-search access token fresh: it
/// authenticates, sleeps until shortly before the token expires, and
/// re-authenticates, until told to shut down.
pub fn spawn_token_refresh(spotify: SpotifyService) -> TokenRefreshHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        loop {
            let wait = match spotify.authenticate().await {
                Ok(expires_in) => {
                    tracing::debug!("search token refreshed, expires in {}s", expires_in);
                    // refresh 60s before expiry, but never spin
                    Duration::from_secs((expires_in - 60).max(30) as u64)
                }
                Err(e) => {
                    tracing::warn!("search token refresh failed, retrying in 30s: {}", e);
                    Duration::from_secs(30)
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown_rx.changed() => {
                    tracing::info!("token refresh task stopping");
                    break;
                }
            }
        }
    });

    TokenRefreshHandle { shutdown, handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stop_terminates_the_task() {
        // Auth endpoint is unreachable, so the task sits in its retry sleep;
        // stop() must still end it promptly.
        let spotify = SpotifyService::with_base_urls(
            "id".to_string(),
            "secret".to_string(),
            "http://127.0.0.1:9".to_string(),
            "http://127.0.0.1:9".to_string(),
        );

        let handle = spawn_token_refresh(spotify);
        tokio::time::sleep(Duration::from_millis(50)).await;

        tokio::time::timeout(Duration::from_secs(5), handle.stop())
            .await
            .expect("refresh task did not stop in time");
    }
}
