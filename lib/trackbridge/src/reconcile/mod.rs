//! Cross-platform reconciliation: the track, playlist and playlist
//! creation flows behind the session gateway.

mod create;
mod playlist;
mod track;

use std::cmp::Ordering;
use std::sync::Arc;

use shared::{music::Track, platform::Platform};
use tracing::{debug, warn};

use crate::{
    counter::SearchCounter,
    error::{BridgeError, PlatformError},
    matching, Platforms, UserDirectory,
};

pub use create::CreateRequest;
pub use playlist::align;

const DEFAULT_SEARCH_CONCURRENCY: usize = 8;

/// Everything a session needs to answer a message. Cheap to share behind
/// an `Arc`; holds no per-message state.
pub struct Bridge {
    platforms: Platforms,
    counter: SearchCounter,
    users: Arc<dyn UserDirectory>,
    search_concurrency: usize,
}

impl Bridge {
    pub fn new(platforms: Platforms, counter: SearchCounter, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            platforms,
            counter,
            users,
            search_concurrency: DEFAULT_SEARCH_CONCURRENCY,
        }
    }

    /// Upper bound on counterpart searches in flight for one playlist.
    pub fn with_search_concurrency(mut self, limit: usize) -> Self {
        self.search_concurrency = limit.max(1);
        self
    }

    pub fn platforms(&self) -> &Platforms {
        &self.platforms
    }

    /// Searches `platform` for an equivalent of `title` by `artist`.
    /// Failures are absorbed here: the caller decides between a
    /// placeholder and dropping the entry.
    async fn search_counterpart(&self, platform: Platform, title: &str, artist: &str) -> Option<Track> {
        match self.platforms.get(platform).search_track(title, artist).await {
            Ok(track) => Some(track),
            Err(PlatformError::NotFound) => {
                debug!("No {} match for '{}' by '{}'", platform, title, artist);
                None
            }
            Err(source) => {
                let err = BridgeError::UpstreamSearch { platform, source };
                warn!("{} ('{}' by '{}')", err, title, artist);
                None
            }
        }
    }
}

/// Deezer's record takes Spotify's release date: Spotify's album dates
/// are treated as authoritative. Placeholders and empty dates change nothing.
pub(crate) fn merge_release_date(deezer: &mut Track, spotify: &Track) {
    if deezer.is_placeholder() || spotify.is_placeholder() || spotify.release_date.is_empty() {
        return;
    }
    deezer.release_date = spotify.release_date.clone();
}

/// Date merge for two independently filtered lists: each Deezer entry is
/// paired with the Spotify entry for the same recording, never by position.
/// Pairs are assigned best score first, one to one, so an exact twin is
/// never taken by a weaker match earlier in the list.
pub(crate) fn merge_release_dates(deezer: &mut [Track], spotify: &[Track]) {
    let mut pairs: Vec<(usize, usize, f64)> = deezer
        .iter()
        .enumerate()
        .flat_map(|(i, d)| {
            spotify
                .iter()
                .enumerate()
                .filter(move |(_, s)| matching::is_same_recording(d, s))
                .map(move |(j, s)| (i, j, matching::similarity(d, s)))
        })
        .collect();
    pairs.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

    let mut deezer_taken = vec![false; deezer.len()];
    let mut spotify_taken = vec![false; spotify.len()];
    for (i, j, _) in pairs {
        if deezer_taken[i] || spotify_taken[j] {
            continue;
        }
        deezer_taken[i] = true;
        spotify_taken[j] = true;
        merge_release_date(&mut deezer[i], &spotify[j]);
    }
}
