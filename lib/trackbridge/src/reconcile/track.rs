use shared::{
    music::Track,
    platform::{EntityKind, Platform},
    session::TrackPair,
};
use tracing::info;

use super::{merge_release_date, Bridge};
use crate::{
    error::BridgeError,
    extract::{extract, ExtractedIdentifier},
};

impl Bridge {
    pub async fn track_from_url(&self, url: &str) -> Result<TrackPair, BridgeError> {
        let source = extract(url)?;
        self.reconcile_track(&source).await
    }

    /// Looks the track up on its own platform, then searches both
    /// platforms for it concurrently. Always yields one entry per side.
    pub async fn reconcile_track(&self, source: &ExtractedIdentifier) -> Result<TrackPair, BridgeError> {
        if source.kind != EntityKind::Track {
            return Err(BridgeError::MalformedUrl {
                platform: source.host,
                url: source.id.clone(),
                reason: format!("expected a track link, got a {}", source.kind),
            });
        }

        let seed = self
            .platforms
            .get(source.host)
            .fetch_track(&source.id)
            .await
            .map_err(|e| BridgeError::UpstreamFetch {
                platform: source.host,
                kind: EntityKind::Track,
                source: e,
            })?;

        let artist = seed.primary_artist();
        info!(
            "Reconciling {} track {}: '{}' by '{}'",
            source.host, source.id, seed.title, artist
        );

        // The source platform is searched too so both sides come back in
        // the same shape.
        let (deezer, spotify) = tokio::join!(
            self.search_counterpart(Platform::Deezer, &seed.title, artist),
            self.search_counterpart(Platform::Spotify, &seed.title, artist),
        );
        let mut deezer = deezer.unwrap_or_else(|| Track::placeholder(Platform::Deezer));
        let spotify = spotify.unwrap_or_else(|| Track::placeholder(Platform::Spotify));

        merge_release_date(&mut deezer, &spotify);
        self.counter.record().await;

        Ok(TrackPair(vec![deezer], vec![spotify]))
    }
}
