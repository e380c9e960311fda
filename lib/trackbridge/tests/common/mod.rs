#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::{
    music::{Playlist, PlaylistOwner, Track},
    platform::Platform,
};
use trackbridge::{
    error::{BridgeError, PlatformError, Result},
    Bridge, MemoryCounterStore, MusicPlatform, PlatformUser, PlatformsBuilder, SearchCounter,
    UserDirectory,
};

pub fn track(platform: Platform, id: &str, title: &str, artist: &str, date: &str) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artists: vec![artist.to_string()],
        album: format!("{title} (album)"),
        release_date: date.to_string(),
        platform,
        cover: String::new(),
        duration: 200,
        explicit: false,
        preview: String::new(),
        url: format!("https://example.test/{platform}/{id}"),
        placeholder: false,
    }
}

/// In-memory platform: a catalogue searched by exact title, plus playlists.
pub struct FakePlatform {
    platform: Platform,
    catalogue: Vec<Track>,
    playlists: HashMap<String, Playlist>,
    search_error: Option<u16>,
    create_result: Option<bool>,
    pub created: Mutex<Vec<(String, String, Vec<String>)>>,
}

impl FakePlatform {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            catalogue: Vec::new(),
            playlists: HashMap::new(),
            search_error: None,
            create_result: Some(true),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.catalogue.push(track);
        self
    }

    pub fn with_playlist(mut self, id: &str, title: &str, tracks: Vec<Track>) -> Self {
        self.playlists.insert(
            id.to_string(),
            Playlist {
                id: id.to_string(),
                title: title.to_string(),
                owner: PlaylistOwner {
                    id: "owner-1".to_string(),
                    name: "Owner".to_string(),
                },
                cover: String::new(),
                url: format!("https://example.test/playlist/{id}"),
                tracks,
            },
        );
        self
    }

    pub fn failing_search(mut self, status: u16) -> Self {
        self.search_error = Some(status);
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.create_result = None;
        self
    }
}

#[async_trait]
impl MusicPlatform for FakePlatform {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn name(&self) -> &'static str {
        self.platform.as_str()
    }

    async fn fetch_track(&self, id: &str) -> Result<Track> {
        self.catalogue
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(PlatformError::NotFound)
    }

    async fn search_track(&self, title: &str, _artist: &str) -> Result<Track> {
        if let Some(status) = self.search_error {
            return Err(PlatformError::Api {
                status,
                message: "search unavailable".to_string(),
            });
        }
        self.catalogue
            .iter()
            .find(|t| t.title.eq_ignore_ascii_case(title))
            .cloned()
            .ok_or(PlatformError::NotFound)
    }

    async fn fetch_playlist(&self, id: &str) -> Result<Playlist> {
        self.playlists.get(id).cloned().ok_or(PlatformError::NotFound)
    }

    async fn create_playlist(
        &self,
        user_platform_id: &str,
        title: &str,
        _token: &str,
        track_ids: &[String],
    ) -> Result<bool> {
        let created = self.create_result.ok_or(PlatformError::Api {
            status: 500,
            message: "create failed".to_string(),
        })?;
        self.created.lock().unwrap().push((
            user_platform_id.to_string(),
            title.to_string(),
            track_ids.to_vec(),
        ));
        Ok(created)
    }
}

#[derive(Default)]
pub struct FakeUsers {
    users: HashMap<String, PlatformUser>,
}

impl FakeUsers {
    pub fn with_user(mut self, platform: Platform, platform_id: &str) -> Self {
        self.users.insert(
            platform_id.to_string(),
            PlatformUser {
                platform_id: platform_id.to_string(),
                platform,
                token: format!("token-{platform_id}"),
                username: format!("user-{platform_id}"),
            },
        );
        self
    }
}

#[async_trait]
impl UserDirectory for FakeUsers {
    async fn find_user_by_platform_id(
        &self,
        platform_id: &str,
    ) -> std::result::Result<Option<PlatformUser>, BridgeError> {
        Ok(self.users.get(platform_id).cloned())
    }
}

pub struct Harness {
    pub bridge: Bridge,
    pub counter: Arc<MemoryCounterStore>,
    pub deezer: Arc<FakePlatform>,
    pub spotify: Arc<FakePlatform>,
}

pub fn harness(deezer: FakePlatform, spotify: FakePlatform, users: FakeUsers) -> Harness {
    let deezer = Arc::new(deezer);
    let spotify = Arc::new(spotify);
    let platforms = PlatformsBuilder::new()
        .add_shared(deezer.clone())
        .add_shared(spotify.clone())
        .build()
        .expect("both fakes registered");
    let counter = Arc::new(MemoryCounterStore::new());
    let bridge = Bridge::new(
        platforms,
        SearchCounter::new(counter.clone()),
        Arc::new(users),
    );

    Harness {
        bridge,
        counter,
        deezer,
        spotify,
    }
}
