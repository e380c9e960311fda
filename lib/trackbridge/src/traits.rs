use async_trait::async_trait;
use shared::{
    music::{Playlist, Track},
    platform::Platform,
};

use crate::error::{BridgeError, CounterError, Result};

/// What the bridge needs from a streaming platform.
#[async_trait]
pub trait MusicPlatform: Send + Sync {
    fn platform(&self) -> Platform;
    fn name(&self) -> &'static str;

    async fn fetch_track(&self, id: &str) -> Result<Track>;

    /// Best match for `title` by `artist`, or `PlatformError::NotFound`.
    async fn search_track(&self, title: &str, artist: &str) -> Result<Track>;

    async fn fetch_playlist(&self, id: &str) -> Result<Playlist>;

    /// Creates `title` in the account `user_platform_id` and fills it with
    /// `track_ids`, acting with the user's own `token`.
    async fn create_playlist(
        &self,
        user_platform_id: &str,
        title: &str,
        token: &str,
        track_ids: &[String],
    ) -> Result<bool>;
}

/// A registered user as the playlist creator needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformUser {
    pub platform_id: String,
    pub platform: Platform,
    pub token: String,
    pub username: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_platform_id(
        &self,
        platform_id: &str,
    ) -> std::result::Result<Option<PlatformUser>, BridgeError>;
}

/// A shared key/value store with an atomic increment that creates
/// missing keys at 1.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn increment(&self, key: &str) -> std::result::Result<i64, CounterError>;
}
