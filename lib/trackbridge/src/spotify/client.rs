use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use shared::{
    music::{Playlist, Track},
    platform::Platform,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{
    CreatedPlaylist, ErrorBody, Paging, PlaylistItem, SearchResponse, SnapshotResponse,
    SpotifyPlaylist, SpotifyTrack, TokenResponse,
};
use crate::{
    error::{PlatformError, Result},
    matching,
    retry::{with_retry, RetryPolicy},
    MusicPlatform,
};

const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_BASE: &str = "https://accounts.spotify.com";
const SEARCH_LIMIT: usize = 5;
const MAX_PLAYLIST_PAGES: usize = 100;
/// Spotify accepts at most 100 URIs per add-tracks call
const ADD_TRACKS_CHUNK: usize = 100;
/// Refresh the app token this long before Spotify says it expires
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct AppToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Catalog calls use a client-credentials app token; playlist creation
/// uses the token of the user it acts for.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    api_base: Url,
    auth_base: Url,
    client_id: String,
    client_secret: String,
    client: Client,
    retry: RetryPolicy,
    app_token: Arc<Mutex<Option<AppToken>>>,
}

#[derive(Default)]
pub struct SpotifyClientBuilder {
    api_base: Option<String>,
    auth_base: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    client: Option<Client>,
    retry: Option<RetryPolicy>,
}

impl SpotifyClientBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.client_id = Some(client_id.to_string());
        self.client_secret = Some(client_secret.to_string());
        self
    }

    pub fn api_base(mut self, url: &str) -> Self {
        self.api_base = Some(url.to_string());
        self
    }

    pub fn auth_base(mut self, url: &str) -> Self {
        self.auth_base = Some(url.to_string());
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

    pub fn build(self) -> Result<SpotifyClient> {
        let client_id = self
            .client_id
            .filter(|s| !s.is_empty())
            .ok_or(PlatformError::NotConfigured)?;
        let client_secret = self
            .client_secret
            .filter(|s| !s.is_empty())
            .ok_or(PlatformError::NotConfigured)?;

        Ok(SpotifyClient {
            api_base: base_url(self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE))?,
            auth_base: base_url(self.auth_base.as_deref().unwrap_or(DEFAULT_AUTH_BASE))?,
            client_id,
            client_secret,
            client: self.client.unwrap_or_default(),
            retry: self.retry.unwrap_or_default(),
            app_token: Arc::new(Mutex::new(None)),
        })
    }
}

fn base_url(raw: &str) -> Result<Url> {
    Ok(Url::parse(&format!("{}/", raw.trim_end_matches('/')))?)
}

impl SpotifyClient {
    async fn app_token(&self) -> Result<String> {
        let mut cached = self.app_token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        let url = self.auth_base.join("api/token")?;
        let response = self
            .client
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(PlatformError::Auth(format!(
                "token request failed ({status}): {text}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = (token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        info!("Obtained Spotify app token, valid for {}s", token.expires_in);

        *cached = Some(AppToken {
            value: token.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        });
        Ok(token.access_token)
    }

    async fn catalog_get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let token = self.app_token().await?;
        debug!("Request: GET {}", url.path());
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let result = Self::handle_response(response).await;

        if let Err(PlatformError::Auth(_)) = &result {
            warn!("Spotify rejected the app token, dropping it");
            *self.app_token.lock().await = None;
        }
        result
    }

    async fn user_post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        token: &str,
        body: &B,
    ) -> Result<T> {
        debug!("Request: POST {}", url.path());
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }

        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);
        Err(match status.as_u16() {
            401 => PlatformError::Auth(message),
            404 => PlatformError::NotFound,
            code => PlatformError::Api {
                status: code,
                message,
            },
        })
    }
}

fn search_query(title: &str, artist: &str) -> String {
    if artist.trim().is_empty() {
        format!("track:{}", title.trim())
    } else {
        format!("track:{} artist:{}", title.trim(), artist.trim())
    }
}

fn track_uri(id: &str) -> String {
    if id.starts_with("spotify:track:") {
        id.to_string()
    } else {
        format!("spotify:track:{id}")
    }
}

#[async_trait]
impl MusicPlatform for SpotifyClient {
    fn platform(&self) -> Platform {
        Platform::Spotify
    }

    fn name(&self) -> &'static str {
        "Spotify"
    }

    async fn fetch_track(&self, id: &str) -> Result<Track> {
        let url = self.api_base.join(&format!("tracks/{id}"))?;
        let raw: SpotifyTrack =
            with_retry(&self.retry, "Spotify track fetch", || self.catalog_get(url.clone())).await?;
        raw.into_track().ok_or(PlatformError::NotFound)
    }

    async fn search_track(&self, title: &str, artist: &str) -> Result<Track> {
        let mut url = self.api_base.join("search")?;
        url.query_pairs_mut()
            .append_pair("q", &search_query(title, artist))
            .append_pair("type", "track")
            .append_pair("limit", &SEARCH_LIMIT.to_string());

        let response: SearchResponse =
            with_retry(&self.retry, "Spotify track search", || self.catalog_get(url.clone())).await?;
        let candidates = response
            .tracks
            .items
            .into_iter()
            .filter_map(SpotifyTrack::into_track)
            .collect();

        matching::best_candidate(title, artist, candidates).ok_or(PlatformError::NotFound)
    }

    async fn fetch_playlist(&self, id: &str) -> Result<Playlist> {
        let url = self.api_base.join(&format!("playlists/{id}"))?;
        let raw: SpotifyPlaylist = with_retry(&self.retry, "Spotify playlist fetch", || {
            self.catalog_get(url.clone())
        })
        .await?;

        let (mut playlist, first_page, mut next) = raw.into_parts();
        let mut items = first_page;

        let mut pages = 0;
        while let Some(link) = next.take() {
            if pages >= MAX_PLAYLIST_PAGES {
                warn!(
                    "Playlist {} has more than {} pages, keeping {} items",
                    id,
                    MAX_PLAYLIST_PAGES,
                    items.len()
                );
                break;
            }
            pages += 1;

            let page_url = Url::parse(&link)?;
            let page: Paging<PlaylistItem> = with_retry(&self.retry, "Spotify playlist page", || {
                self.catalog_get(page_url.clone())
            })
            .await?;
            items.extend(page.items);
            next = page.next;
        }

        playlist.tracks = items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(SpotifyTrack::into_track)
            .collect();

        info!(
            "Fetched Spotify playlist '{}' with {} tracks",
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

        let url = self
            .api_base
            .join(&format!("users/{user_platform_id}/playlists"))?;
        let body = json!({ "name": title, "public": false });
        let created: CreatedPlaylist = with_retry(&once, "Spotify playlist create", || {
            self.user_post(url.clone(), token, &body)
        })
        .await?;
        info!(
            "Created Spotify playlist {} for user {}",
            created.id, user_platform_id
        );

        let url = self
            .api_base
            .join(&format!("playlists/{}/tracks", created.id))?;
        for chunk in track_ids.chunks(ADD_TRACKS_CHUNK) {
            let body = json!({ "uris": chunk.iter().map(|id| track_uri(id)).collect::<Vec<_>>() });
            let _: SnapshotResponse = with_retry(&once, "Spotify playlist add tracks", || {
                self.user_post(url.clone(), token, &body)
            })
            .await?;
        }

        Ok(true)
    }
}
