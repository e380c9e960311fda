use serde::Deserialize;
use shared::{
    music::{Playlist, PlaylistOwner, Track},
    platform::Platform,
};

// Internal structs for deserializing raw API responses

#[derive(Deserialize, Debug)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SpotifyImage {
    pub url: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SpotifyArtist {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct SpotifyAlbum {
    #[serde(default)]
    pub name: String,
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<SpotifyImage>>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SpotifyTrack {
    /// Null for local files in playlists.
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: Option<SpotifyAlbum>,
    #[serde(default)]
    pub duration_ms: u32,
    #[serde(default)]
    pub explicit: bool,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl SpotifyTrack {
    /// `None` for local files and podcast episodes.
    pub fn into_track(self) -> Option<Track> {
        if self.kind == "episode" {
            return None;
        }
        let id = self.id?;
        let album = self.album.unwrap_or_default();
        let cover = album
            .images
            .and_then(|images| images.into_iter().next())
            .map(|image| image.url)
            .unwrap_or_default();

        Some(Track {
            id,
            title: self.name,
            artists: self
                .artists
                .into_iter()
                .map(|a| a.name)
                .filter(|n| !n.is_empty())
                .collect(),
            album: album.name,
            release_date: album.release_date.unwrap_or_default(),
            platform: Platform::Spotify,
            cover,
            duration: self.duration_ms / 1000,
            explicit: self.explicit,
            preview: self.preview_url.unwrap_or_default(),
            url: self.external_urls.spotify.unwrap_or_default(),
            placeholder: false,
        })
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SearchResponse {
    pub tracks: Paging<SpotifyTrack>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct PlaylistItem {
    pub track: Option<SpotifyTrack>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SpotifyOwner {
    #[serde(default)]
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SpotifyPlaylist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub owner: Option<SpotifyOwner>,
    #[serde(default)]
    pub images: Option<Vec<SpotifyImage>>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub tracks: Paging<PlaylistItem>,
}

impl SpotifyPlaylist {
    /// Splits off the first page of items and its continuation link.
    pub fn into_parts(self) -> (Playlist, Vec<PlaylistItem>, Option<String>) {
        let owner = self
            .owner
            .map(|o| PlaylistOwner {
                name: o.display_name.unwrap_or_else(|| o.id.clone()),
                id: o.id,
            })
            .unwrap_or_default();
        let cover = self
            .images
            .and_then(|images| images.into_iter().next())
            .map(|image| image.url)
            .unwrap_or_default();

        let playlist = Playlist {
            id: self.id,
            title: self.name,
            owner,
            cover,
            url: self.external_urls.spotify.unwrap_or_default(),
            tracks: Vec::new(),
        };
        (playlist, self.tracks.items, self.tracks.next)
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct CreatedPlaylist {
    pub id: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SnapshotResponse {
    #[allow(dead_code)]
    pub snapshot_id: String,
}
