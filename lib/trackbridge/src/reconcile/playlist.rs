use futures::{future, stream, StreamExt};
use shared::{
    music::{Playlist, PlaylistMeta, Track},
    platform::{EntityKind, Platform},
    session::{PlatformTracks, PlaylistResponse},
};
use tracing::{info, warn};

use super::{merge_release_dates, Bridge};
use crate::{
    error::{BridgeError, PlatformError},
    extract::{extract, ExtractedIdentifier},
};

/// Trims the longer list from the tail so both end up the length of the
/// shorter one.
pub fn align<T>(a: &mut Vec<T>, b: &mut Vec<T>) {
    let len = a.len().min(b.len());
    a.truncate(len);
    b.truncate(len);
}

impl Bridge {
    pub async fn playlist_from_url(&self, url: &str) -> Result<PlaylistResponse, BridgeError> {
        let source = extract(url)?;
        self.reconcile_playlist(&source).await
    }

    /// Fetches the playlist from its own platform and searches the other
    /// platform for each track. Tracks without a counterpart are dropped
    /// before the two lists are aligned.
    pub async fn reconcile_playlist(
        &self,
        source: &ExtractedIdentifier,
    ) -> Result<PlaylistResponse, BridgeError> {
        if source.kind != EntityKind::Playlist {
            return Err(BridgeError::MalformedUrl {
                platform: source.host,
                url: source.id.clone(),
                reason: format!("expected a playlist link, got a {}", source.kind),
            });
        }

        let playlist = match self.platforms.get(source.host).fetch_playlist(&source.id).await {
            Ok(playlist) => playlist,
            Err(PlatformError::NotFound) => {
                warn!("{} playlist {} not found, answering with an empty one", source.host, source.id);
                Playlist::default()
            }
            Err(e) => {
                return Err(BridgeError::UpstreamFetch {
                    platform: source.host,
                    kind: EntityKind::Playlist,
                    source: e,
                })
            }
        };

        let counterpart = source.host.counterpart();
        let searches: Vec<_> = playlist
            .tracks
            .iter()
            .map(|track| self.search_counterpart(counterpart, &track.title, track.primary_artist()))
            .collect();
        let matches: Vec<Track> = stream::iter(searches)
            .buffered(self.search_concurrency)
            .filter_map(future::ready)
            .collect()
            .await;

        info!(
            "Playlist '{}': {} of {} tracks found on {}",
            playlist.title,
            matches.len(),
            playlist.tracks.len(),
            counterpart
        );

        let meta = PlaylistMeta::from(&playlist);
        let source_tracks = playlist.tracks;
        let (mut deezer, mut spotify) = match source.host {
            Platform::Deezer => (source_tracks, matches),
            Platform::Spotify => (matches, source_tracks),
        };

        align(&mut deezer, &mut spotify);
        merge_release_dates(&mut deezer, &spotify);
        self.counter.record().await;

        Ok(PlaylistResponse {
            playlist_title: meta.title.clone(),
            payload: (deezer.clone(), spotify.clone()),
            owner: meta.owner.clone(),
            playlist_meta: meta,
            platforms: PlatformTracks { deezer, spotify },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::align;

    #[test]
    fn align_trims_whichever_side_is_longer() {
        let mut a = vec![1, 2, 3, 4, 5];
        let mut b = vec![1, 2, 3];
        align(&mut a, &mut b);
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(b, vec![1, 2, 3]);

        let mut a = vec![1, 2];
        let mut b = vec![1, 2, 3, 4];
        align(&mut a, &mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(b, vec![1, 2]);
    }

    #[test]
    fn align_handles_empty_side() {
        let mut a: Vec<u8> = vec![];
        let mut b = vec![1, 2];
        align(&mut a, &mut b);
        assert!(a.is_empty() && b.is_empty());
    }
}
