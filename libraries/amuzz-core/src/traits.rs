//! Core traits for Amuzz
use crate::error::Result;
use crate::types::{AuthToken, PlaylistId, PlaylistSummary, Track, TrackId};
use async_trait::async_trait;

/// Playlist backend gateway
///
/// Request/response contract with the Amuzz backend. Implementations talk
/// HTTP with bearer auth (see `amuzz-client`); tests use in-memory fakes.
/// Every failure is reported as a `GatewayError`, never as a panic.
#[async_trait]
pub trait PlaylistGateway: Send + Sync {
    /// List the playlists owned by the token's user.
    ///
    /// Summaries carry whatever count the backend embedded; they are not
    /// treated as authoritative by the reconciler unless `has_real_count` is set.
    async fn fetch_playlists(&self, token: &AuthToken) -> Result<Vec<PlaylistSummary>>;

    /// Fetch the songs of one playlist
    async fn fetch_playlist_songs(
        &self,
        playlist_id: &PlaylistId,
        token: &AuthToken,
    ) -> Result<Vec<Track>>;

    /// Create a playlist and return the server's summary of it
    async fn create_playlist(&self, token: &AuthToken, name: &str) -> Result<PlaylistSummary>;

    /// Add a song to a playlist
    async fn add_song_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track: &Track,
        token: &AuthToken,
    ) -> Result<()>;

    /// Remove a song from a playlist
    async fn delete_song(
        &self,
        playlist_id: &PlaylistId,
        song_id: &TrackId,
        token: &AuthToken,
    ) -> Result<()>;

    /// Delete a whole playlist
    async fn delete_playlist(&self, playlist_id: &PlaylistId, token: &AuthToken) -> Result<()>;

    /// Suggested tracks for a mood (public endpoint, no token)
    async fn fetch_mood_tracks(&self, mood: &str) -> Result<Vec<Track>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use std::sync::Arc;

    /// Public endpoints only; everything else is rejected
    struct OfflineGateway;

    #[async_trait]
    impl PlaylistGateway for OfflineGateway {
        async fn fetch_playlists(&self, _token: &AuthToken) -> Result<Vec<PlaylistSummary>> {
            Err(GatewayError::Unauthorized)
        }

        async fn fetch_playlist_songs(
            &self,
            _playlist_id: &PlaylistId,
            _token: &AuthToken,
        ) -> Result<Vec<Track>> {
            Err(GatewayError::Unauthorized)
        }

        async fn create_playlist(&self, _token: &AuthToken, _name: &str) -> Result<PlaylistSummary> {
            Err(GatewayError::Unauthorized)
        }

        async fn add_song_to_playlist(
            &self,
            _playlist_id: &PlaylistId,
            _track: &Track,
            _token: &AuthToken,
        ) -> Result<()> {
            Err(GatewayError::Unauthorized)
        }

        async fn delete_song(
            &self,
            _playlist_id: &PlaylistId,
            _song_id: &TrackId,
            _token: &AuthToken,
        ) -> Result<()> {
            Err(GatewayError::Unauthorized)
        }

        async fn delete_playlist(&self, _playlist_id: &PlaylistId, _token: &AuthToken) -> Result<()> {
            Err(GatewayError::Unauthorized)
        }

        async fn fetch_mood_tracks(&self, mood: &str) -> Result<Vec<Track>> {
            Ok(vec![Track::new("1", mood, "Offline", "file:///1.mp3")])
        }
    }

    #[tokio::test]
    async fn gateway_is_usable_as_trait_object() {
        let gateway: Arc<dyn PlaylistGateway> = Arc::new(OfflineGateway);
        let token = AuthToken::new("t");

        let tracks = gateway.fetch_mood_tracks("calm").await.unwrap();
        assert_eq!(tracks[0].name, "calm");

        let err = gateway.fetch_playlists(&token).await.unwrap_err();
        assert_eq!(err, GatewayError::Unauthorized);
    }
}
