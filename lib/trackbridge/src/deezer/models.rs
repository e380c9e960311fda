use serde::Deserialize;
use shared::{
    music::{Playlist, PlaylistOwner, Track},
    platform::Platform,
};

// Internal structs for deserializing raw API responses

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorEnvelope {
    pub error: ApiError,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ApiError {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: u32,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct DeezerArtist {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct DeezerAlbum {
    #[serde(default)]
    pub title: String,
    pub cover_xl: Option<String>,
    pub cover_medium: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DeezerTrack {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub explicit_lyrics: bool,
    #[serde(default)]
    pub preview: String,
    pub release_date: Option<String>,
    pub artist: Option<DeezerArtist>,
    #[serde(default)]
    pub contributors: Vec<DeezerArtist>,
    pub album: Option<DeezerAlbum>,
}

impl From<DeezerTrack> for Track {
    fn from(raw: DeezerTrack) -> Self {
        // Full track objects list every contributor, search hits only the main artist.
        let mut artists: Vec<String> = raw
            .contributors
            .into_iter()
            .map(|c| c.name)
            .filter(|n| !n.is_empty())
            .collect();
        if artists.is_empty() {
            if let Some(artist) = raw.artist {
                if !artist.name.is_empty() {
                    artists.push(artist.name);
                }
            }
        }

        let album = raw.album.unwrap_or_default();
        let release_date = raw
            .release_date
            .or(album.release_date)
            .unwrap_or_default();

        Track {
            id: raw.id.to_string(),
            title: raw.title,
            artists,
            album: album.title,
            release_date,
            platform: Platform::Deezer,
            cover: album.cover_xl.or(album.cover_medium).unwrap_or_default(),
            duration: raw.duration,
            explicit: raw.explicit_lyrics,
            preview: raw.preview,
            url: raw.link,
            placeholder: false,
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub data: Vec<DeezerTrack>,
    pub next: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DeezerCreator {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DeezerPlaylist {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    pub picture_xl: Option<String>,
    pub creator: Option<DeezerCreator>,
    pub tracks: Option<TrackPage>,
}

impl DeezerPlaylist {
    /// Splits off the first page of tracks and its continuation link.
    pub fn into_parts(self) -> (Playlist, Vec<DeezerTrack>, Option<String>) {
        let (first_page, next) = match self.tracks {
            Some(page) => (page.data, page.next),
            None => (Vec::new(), None),
        };
        let owner = self
            .creator
            .map(|c| PlaylistOwner {
                id: c.id.to_string(),
                name: c.name,
            })
            .unwrap_or_default();

        let playlist = Playlist {
            id: self.id.to_string(),
            title: self.title,
            owner,
            cover: self.picture_xl.unwrap_or_default(),
            url: self.link,
            tracks: Vec::new(),
        };
        (playlist, first_page, next)
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct CreatedPlaylist {
    pub id: i64,
}
