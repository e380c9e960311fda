use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// A single track as one platform describes it.
///
/// A counterpart search that comes back empty is represented by a
/// placeholder: same shape, empty fields, `placeholder` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: String,
    pub release_date: String,
    pub platform: Platform,
    pub cover: String,
    /// Length in seconds.
    pub duration: u32,
    pub explicit: bool,
    pub preview: String,
    pub url: String,
    #[serde(default)]
    pub placeholder: bool,
}

impl Track {
    pub fn placeholder(platform: Platform) -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            artists: Vec::new(),
            album: String::new(),
            release_date: String::new(),
            platform,
            cover: String::new(),
            duration: 0,
            explicit: false,
            preview: String::new(),
            url: String::new(),
            placeholder: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// First credited artist, or an empty string when there is none.
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub owner: PlaylistOwner,
    pub cover: String,
    pub url: String,
    pub tracks: Vec<Track>,
}

/// Playlist details without the track list, as sent back to clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistMeta {
    pub id: String,
    pub title: String,
    pub owner: PlaylistOwner,
    pub cover: String,
    pub url: String,
    pub track_count: usize,
}

impl From<&Playlist> for PlaylistMeta {
    fn from(playlist: &Playlist) -> Self {
        Self {
            id: playlist.id.clone(),
            title: playlist.title.clone(),
            owner: playlist.owner.clone(),
            cover: playlist.cover.clone(),
            url: playlist.url.clone(),
            track_count: playlist.tracks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_marked_and_empty() {
        let track = Track::placeholder(Platform::Spotify);
        assert!(track.is_placeholder());
        assert!(track.title.is_empty());
        assert_eq!(track.primary_artist(), "");

        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["placeholder"], true);
        assert_eq!(json["platform"], "spotify");
    }
}
