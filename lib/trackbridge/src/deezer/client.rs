use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    music::{Playlist, Track},
    platform::Platform,
};
use tracing::{debug, info, warn};
use url::Url;

use super::models::{ApiError, CreatedPlaylist, DeezerPlaylist, DeezerTrack, ErrorEnvelope, TrackPage};
use crate::{
    error::{PlatformError, Result},
    matching,
    retry::{with_retry, RetryPolicy},
    MusicPlatform,
};

const DEFAULT_API_BASE: &str = "https://api.deezer.com";
const SEARCH_LIMIT: usize = 5;
const MAX_PLAYLIST_PAGES: usize = 50;

// Error codes Deezer puts in 200 responses
const QUOTA_EXCEEDED: u32 = 4;
const OAUTH_PERMISSION: u32 = 200;
const OAUTH_INVALID_TOKEN: u32 = 300;
const NO_DATA: u32 = 800;

#[derive(Debug, Clone)]
pub struct DeezerClient {
    base_url: Url,
    client: Client,
    retry: RetryPolicy,
}

#[derive(Default)]
pub struct DeezerClientBuilder {
    base_url: Option<String>,
    client: Option<Client>,
    retry: Option<RetryPolicy>,
}

impl DeezerClientBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn build(self) -> Result<DeezerClient> {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_API_BASE);
        let base_url = Url::parse(&format!("{}/", base.trim_end_matches('/')))?;

        Ok(DeezerClient {
            base_url,
            client: self.client.unwrap_or_default(),
            retry: self.retry.unwrap_or_default(),
        })
    }
}

impl DeezerClient {
    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Request: GET {}", url.path());
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Request: POST {}", url.path());
        let response = self.client.post(url).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                404 => PlatformError::NotFound,
                code => PlatformError::Api {
                    status: code,
                    message: text,
                },
            });
        }

        // Deezer reports most failures as a 200 carrying an error object
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
            return Err(map_api_error(envelope.error));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

fn map_api_error(error: ApiError) -> PlatformError {
    match error.code {
        NO_DATA => PlatformError::NotFound,
        QUOTA_EXCEEDED => PlatformError::Api {
            status: 429,
            message: error.message,
        },
        OAUTH_PERMISSION | OAUTH_INVALID_TOKEN => PlatformError::Auth(error.message),
        code => PlatformError::Api {
            status: 400,
            message: format!("{} ({}): {}", error.kind, code, error.message),
        },
    }
}

/// Deezer's advanced search syntax; quotes inside values would end the
/// quoted term early.
fn search_query(title: &str, artist: &str) -> String {
    let title = title.replace('"', "");
    let artist = artist.replace('"', "");
    if artist.trim().is_empty() {
        format!("track:\"{}\"", title.trim())
    } else {
        format!("track:\"{}\" artist:\"{}\"", title.trim(), artist.trim())
    }
}

#[async_trait]
impl MusicPlatform for DeezerClient {
    fn platform(&self) -> Platform {
        Platform::Deezer
    }

    fn name(&self) -> &'static str {
        "Deezer"
    }

    async fn fetch_track(&self, id: &str) -> Result<Track> {
        let url = self.endpoint(&format!("track/{id}"))?;
        let track: DeezerTrack =
            with_retry(&self.retry, "Deezer track fetch", || self.get_json(url.clone())).await?;
        Ok(track.into())
    }

    async fn search_track(&self, title: &str, artist: &str) -> Result<Track> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", &search_query(title, artist))
            .append_pair("limit", &SEARCH_LIMIT.to_string());

        let page: TrackPage =
            with_retry(&self.retry, "Deezer track search", || self.get_json(url.clone())).await?;
        let candidates = page.data.into_iter().map(Track::from).collect();

        matching::best_candidate(title, artist, candidates).ok_or(PlatformError::NotFound)
    }

    async fn fetch_playlist(&self, id: &str) -> Result<Playlist> {
        let url = self.endpoint(&format!("playlist/{id}"))?;
        let raw: DeezerPlaylist =
            with_retry(&self.retry, "Deezer playlist fetch", || self.get_json(url.clone())).await?;

        let (mut playlist, first_page, mut next) = raw.into_parts();
        playlist.tracks.extend(first_page.into_iter().map(Track::from));

        let mut pages = 0;
        while let Some(link) = next.take() {
            if pages >= MAX_PLAYLIST_PAGES {
                warn!(
                    "Playlist {} has more than {} pages, keeping {} tracks",
                    id,
                    MAX_PLAYLIST_PAGES,
                    playlist.tracks.len()
                );
                break;
            }
            pages += 1;

            let page_url = Url::parse(&link)?;
            let page: TrackPage = with_retry(&self.retry, "Deezer playlist page", || {
                self.get_json(page_url.clone())
            })
            .await?;
            playlist.tracks.extend(page.data.into_iter().map(Track::from));
            next = page.next;
        }

        info!(
            "Fetched Deezer playlist '{}' with {} tracks",
            playlist.title,
            playlist.tracks.len()
        );
        Ok(playlist)
    }

    async fn create_playlist(
        &self,
        user_platform_id: &str,
        title: &str,
        token: &str,
        track_ids: &[String],
    ) -> Result<bool> {
        // Creation is not idempotent, a retried timeout could duplicate the playlist
        let once = self.retry.single_attempt();

        let mut url = self.endpoint(&format!("user/{user_platform_id}/playlists"))?;
        url.query_pairs_mut()
            .append_pair("title", title)
            .append_pair("access_token", token);
        let created: CreatedPlaylist =
            with_retry(&once, "Deezer playlist create", || self.post_json(url.clone())).await?;
        info!(
            "Created Deezer playlist {} for user {}",
            created.id, user_platform_id
        );

        if track_ids.is_empty() {
            return Ok(true);
        }

        let mut url = self.endpoint(&format!("playlist/{}/tracks", created.id))?;
        url.query_pairs_mut()
            .append_pair("songs", &track_ids.join(","))
            .append_pair("access_token", token);
        with_retry(&once, "Deezer playlist add tracks", || {
            self.post_json::<bool>(url.clone())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_uses_advanced_syntax() {
        assert_eq!(
            search_query("Harder, Better", "Daft Punk"),
            r#"track:"Harder, Better" artist:"Daft Punk""#
        );
        assert_eq!(search_query("Say \"Hi\"", ""), r#"track:"Say Hi""#);
    }

    #[test]
    fn api_error_codes_map_to_platform_errors() {
        let err = |code| ApiError {
            kind: "DataException".to_string(),
            message: "no data".to_string(),
            code,
        };
        assert!(matches!(map_api_error(err(800)), PlatformError::NotFound));
        assert!(matches!(
            map_api_error(err(4)),
            PlatformError::Api { status: 429, .. }
        ));
        assert!(matches!(map_api_error(err(300)), PlatformError::Auth(_)));
        assert!(matches!(
            map_api_error(err(600)),
            PlatformError::Api { status: 400, .. }
        ));
    }

    #[test]
    fn builder_normalizes_base_url() {
        let client = DeezerClientBuilder::new()
            .base_url("http://127.0.0.1:9000/deezer/")
            .build()
            .unwrap();
        assert_eq!(
            client.endpoint("track/1").unwrap().as_str(),
            "http://127.0.0.1:9000/deezer/track/1"
        );
    }
}
