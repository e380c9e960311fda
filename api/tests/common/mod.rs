#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::{
    music::{Playlist, Track},
    platform::Platform,
};
use trackbridge::{
    error::{PlatformError, Result},
    Bridge, BridgeError, MemoryCounterStore, MusicPlatform, PlatformUser, PlatformsBuilder,
    SearchCounter, UserDirectory,
};

/// Knows one song, "Around the World" by Daft Punk, under id "7".
pub struct OneSong(pub Platform);

impl OneSong {
    fn song(&self) -> Track {
        let mut track = Track::placeholder(self.0);
        track.id = "7".to_string();
        track.title = "Around the World".to_string();
        track.artists = vec!["Daft Punk".to_string()];
        track.placeholder = false;
        track
    }
}

#[async_trait]
impl MusicPlatform for OneSong {
    fn platform(&self) -> Platform {
        self.0
    }

    fn name(&self) -> &'static str {
        self.0.as_str()
    }

    async fn fetch_track(&self, id: &str) -> Result<Track> {
        match id {
            "7" => Ok(self.song()),
            _ => Err(PlatformError::NotFound),
        }
    }

    async fn search_track(&self, _title: &str, _artist: &str) -> Result<Track> {
        Ok(self.song())
    }

    async fn fetch_playlist(&self, _id: &str) -> Result<Playlist> {
        Err(PlatformError::NotFound)
    }

    async fn create_playlist(&self, _: &str, _: &str, _: &str, _: &[String]) -> Result<bool> {
        Ok(true)
    }
}

/// Never answers a track fetch. Records when a fetch starts and when the
/// in-flight fetch is dropped.
#[derive(Default)]
pub struct Stalled {
    pub started: Arc<AtomicBool>,
    pub dropped: Arc<AtomicBool>,
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MusicPlatform for Stalled {
    fn platform(&self) -> Platform {
        Platform::Deezer
    }

    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn fetch_track(&self, _id: &str) -> Result<Track> {
        let _guard = SetOnDrop(self.dropped.clone());
        self.started.store(true, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Err(PlatformError::NotFound)
    }

    async fn search_track(&self, _title: &str, _artist: &str) -> Result<Track> {
        Err(PlatformError::NotFound)
    }

    async fn fetch_playlist(&self, _id: &str) -> Result<Playlist> {
        Err(PlatformError::NotFound)
    }

    async fn create_playlist(&self, _: &str, _: &str, _: &str, _: &[String]) -> Result<bool> {
        Ok(false)
    }
}

pub struct NoUsers;

#[async_trait]
impl UserDirectory for NoUsers {
    async fn find_user_by_platform_id(
        &self,
        _platform_id: &str,
    ) -> std::result::Result<Option<PlatformUser>, BridgeError> {
        Ok(None)
    }
}

pub fn bridge_with(
    deezer: Arc<dyn MusicPlatform>,
    spotify: Arc<dyn MusicPlatform>,
) -> (Bridge, Arc<MemoryCounterStore>) {
    let platforms = PlatformsBuilder::new()
        .add_shared(deezer)
        .add_shared(spotify)
        .build()
        .unwrap();
    let store = Arc::new(MemoryCounterStore::new());
    let bridge = Bridge::new(platforms, SearchCounter::new(store.clone()), Arc::new(NoUsers));
    (bridge, store)
}

pub fn bridge() -> (Bridge, Arc<MemoryCounterStore>) {
    bridge_with(
        Arc::new(OneSong(Platform::Deezer)),
        Arc::new(OneSong(Platform::Spotify)),
    )
}
