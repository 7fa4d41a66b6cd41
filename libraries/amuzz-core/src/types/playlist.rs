//! Playlist domain types
use crate::types::{PlaylistId, Track};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-side projection of a server-owned playlist
///
/// `song_count` is maintained locally and is only trusted when
/// `has_real_count` is set; see the reconciler in `amuzz-playlists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    /// Server-assigned identifier
    pub id: PlaylistId,

    /// Playlist name
    #[serde(default)]
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of songs, possibly an estimate
    #[serde(default, alias = "songCount")]
    pub song_count: u32,

    /// Whether `song_count` was verified against the server
    #[serde(default, alias = "hasRealCount")]
    pub has_real_count: bool,

    /// When the count was last verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counted_at: Option<DateTime<Utc>>,

    /// Songs embedded in the listing response, when the backend sends them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<Track>>,
}

impl PlaylistSummary {
    /// Create an empty, unverified summary
    pub fn new(id: impl Into<PlaylistId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            song_count: 0,
            has_real_count: false,
            counted_at: None,
            songs: None,
        }
    }

    /// Record an authoritative count taken now
    pub fn set_real_count(&mut self, count: usize) {
        self.song_count = u32::try_from(count).unwrap_or(u32::MAX);
        self.has_real_count = true;
        self.counted_at = Some(Utc::now());
    }

    /// Fall back to an unverified zero count
    pub fn set_fallback_count(&mut self) {
        self.song_count = 0;
        self.has_real_count = false;
        self.counted_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_shape_with_camel_case_counts() {
        let json = r#"{"id": 5, "name": "Gym", "songCount": 4}"#;
        let playlist: PlaylistSummary = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.id.as_str(), "5");
        assert_eq!(playlist.song_count, 4);
        assert!(!playlist.has_real_count);
        assert!(playlist.songs.is_none());
    }

    #[test]
    fn real_and_fallback_counts() {
        let mut playlist = PlaylistSummary::new("1", "Chill");
        playlist.set_real_count(12);
        assert_eq!(playlist.song_count, 12);
        assert!(playlist.has_real_count);
        assert!(playlist.counted_at.is_some());

        playlist.set_fallback_count();
        assert_eq!(playlist.song_count, 0);
        assert!(!playlist.has_real_count);
    }
}
