use std::collections::HashMap;
use std::sync::Arc;

use shared::platform::Platform;

use crate::MusicPlatform;

/// One adapter per platform, resolved by the `Platform` enum.
#[derive(Clone)]
pub struct Platforms {
    deezer: Arc<dyn MusicPlatform>,
    spotify: Arc<dyn MusicPlatform>,
}

impl Platforms {
    pub fn get(&self, platform: Platform) -> &Arc<dyn MusicPlatform> {
        match platform {
            Platform::Deezer => &self.deezer,
            Platform::Spotify => &self.spotify,
        }
    }

    pub fn list(&self) -> Vec<(Platform, &str)> {
        Platform::ALL
            .iter()
            .map(|p| (*p, self.get(*p).name()))
            .collect()
    }
}

#[derive(Default)]
pub struct PlatformsBuilder {
    adapters: HashMap<Platform, Arc<dyn MusicPlatform>>,
}

impl PlatformsBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(self, adapter: impl MusicPlatform + 'static) -> Self {
        self.add_shared(Arc::new(adapter))
    }

    pub fn add_shared(mut self, adapter: Arc<dyn MusicPlatform>) -> Self {
        self.adapters.insert(adapter.platform(), adapter);
        self
    }

    pub fn build(mut self) -> Result<Platforms, &'static str> {
        let deezer = self
            .adapters
            .remove(&Platform::Deezer)
            .ok_or("a deezer adapter is required")?;
        let spotify = self
            .adapters
            .remove(&Platform::Spotify)
            .ok_or("a spotify adapter is required")?;

        Ok(Platforms { deezer, spotify })
    }
}
