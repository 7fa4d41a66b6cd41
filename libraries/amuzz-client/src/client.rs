//! Amuzz backend client.

use crate::config::ClientConfig;
use crate::error::{from_response, from_send};
use crate::payload::{CreatePlaylistRequest, ListEnvelope, PlaylistEnvelope, SongPayload};
use amuzz_core::{
    AuthToken, GatewayError, PlaylistGateway, PlaylistId, PlaylistSummary, Result, Track, TrackId,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

/// HTTP implementation of [`PlaylistGateway`].
///
/// Every call is a single request with bearer auth; nothing is cached or
/// retried. Failures come back as [`GatewayError`].
///
/// # Example
///
/// ```ignore
/// use amuzz_client::{AmuzzClient, ClientConfig};
/// use amuzz_core::{AuthToken, PlaylistGateway};
///
/// let client = AmuzzClient::new(ClientConfig::new("https://api.amuzz.app"))?;
/// let token = AuthToken::new("…");
///
/// for playlist in client.fetch_playlists(&token).await? {
///     println!("{} ({})", playlist.name, playlist.id);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AmuzzClient {
    http: Client,
    base_url: String,
}

impl AmuzzClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Amuzz/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// The normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and fail on any non-2xx status.
    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(from_send)?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(from_response(response).await)
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let body = response.text().await.map_err(from_send)?;
        serde_json::from_str(&body)
            .map_err(|e| GatewayError::Decode(format!("Failed to parse {}: {}", what, e)))
    }
}

/// Validate and normalize a base URL.
fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(GatewayError::invalid_input("base URL cannot be empty"));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| GatewayError::invalid_input(format!("invalid base URL: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GatewayError::invalid_input(
            "base URL must start with http:// or https://",
        ));
    }

    Ok(trimmed.to_string())
}

#[async_trait]
impl PlaylistGateway for AmuzzClient {
    async fn fetch_playlists(&self, token: &AuthToken) -> Result<Vec<PlaylistSummary>> {
        let url = self.endpoint("/api/playlists");
        debug!(url = %url, "Fetching playlists");

        let response = Self::send(self.http.get(&url).bearer_auth(token.expose())).await?;
        let playlists = Self::decode::<ListEnvelope<PlaylistSummary>>(response, "playlists")
            .await?
            .into_vec();

        debug!(count = playlists.len(), "Fetched playlists");
        Ok(playlists)
    }

    async fn fetch_playlist_songs(
        &self,
        playlist_id: &PlaylistId,
        token: &AuthToken,
    ) -> Result<Vec<Track>> {
        let url = self.endpoint(&format!("/api/playlists/{}/songs", playlist_id));
        debug!(url = %url, "Fetching playlist songs");

        let response = match Self::send(self.http.get(&url).bearer_auth(token.expose())).await {
            Ok(response) => response,
            // Older backends only serve the songs embedded in the playlist
            Err(e) if e.status() == Some(404) => {
                let fallback = self.endpoint(&format!("/api/playlists/{}", playlist_id));
                debug!(url = %fallback, "Songs endpoint missing, trying playlist endpoint");
                Self::send(self.http.get(&fallback).bearer_auth(token.expose()))
                    .await
                    .map_err(|_| e)?
            }
            Err(e) => return Err(e),
        };
        let songs = Self::decode::<ListEnvelope<Track>>(response, "playlist songs")
            .await?
            .into_vec();

        debug!(%playlist_id, count = songs.len(), "Fetched playlist songs");
        Ok(songs)
    }

    async fn create_playlist(&self, token: &AuthToken, name: &str) -> Result<PlaylistSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatewayError::invalid_input("playlist name is required"));
        }

        let url = self.endpoint("/api/playlists");
        let response = Self::send(
            self.http
                .post(&url)
                .bearer_auth(token.expose())
                .json(&CreatePlaylistRequest { name }),
        )
        .await?;

        let playlist = Self::decode::<PlaylistEnvelope>(response, "created playlist")
            .await?
            .into_inner();

        info!(playlist_id = %playlist.id, name = %playlist.name, "Created playlist");
        Ok(playlist)
    }

    async fn add_song_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track: &Track,
        token: &AuthToken,
    ) -> Result<()> {
        let payload = SongPayload::from_track(track)?;
        let url = self.endpoint(&format!("/api/playlists/{}/songs", playlist_id));
        debug!(url = %url, song_id = %payload.song_id, "Adding song to playlist");

        Self::send(
            self.http
                .post(&url)
                .bearer_auth(token.expose())
                .json(&payload),
        )
        .await?;
        Ok(())
    }

    async fn delete_song(
        &self,
        playlist_id: &PlaylistId,
        song_id: &TrackId,
        token: &AuthToken,
    ) -> Result<()> {
        let url = self.endpoint(&format!(
            "/api/playlists/{}/songs/{}",
            playlist_id, song_id
        ));
        debug!(url = %url, "Removing song from playlist");

        Self::send(self.http.delete(&url).bearer_auth(token.expose())).await?;
        Ok(())
    }

    async fn delete_playlist(&self, playlist_id: &PlaylistId, token: &AuthToken) -> Result<()> {
        let url = self.endpoint(&format!("/api/playlists/{}", playlist_id));
        debug!(url = %url, "Deleting playlist");

        Self::send(self.http.delete(&url).bearer_auth(token.expose())).await?;
        info!(%playlist_id, "Deleted playlist");
        Ok(())
    }

    async fn fetch_mood_tracks(&self, mood: &str) -> Result<Vec<Track>> {
        let mood = mood.trim();
        if mood.is_empty() {
            return Err(GatewayError::invalid_input("mood is required"));
        }

        let mut url = Url::parse(&self.endpoint("/api/music/mood/"))
            .map_err(|e| GatewayError::invalid_input(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::invalid_input("base URL cannot carry a path"))?
            .pop_if_empty()
            .push(mood);
        debug!(url = %url, "Fetching mood tracks");

        let response = Self::send(self.http.get(url)).await?;
        let tracks = Self::decode::<ListEnvelope<Track>>(response, "mood tracks")
            .await?
            .into_vec();

        debug!(mood, count = tracks.len(), "Fetched mood tracks");
        Ok(tracks)
    }
}
