//! Request and response bodies for the playlist endpoints.

use amuzz_core::{GatewayError, PlaylistSummary, Result, Track};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/playlists`
#[derive(Debug, Serialize)]
pub(crate) struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
}

/// Body of `POST /api/playlists/{id}/songs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongPayload {
    pub song_id: String,
    pub name: String,
    pub artist: String,
    pub audio_url: String,
    pub image_url: Option<String>,
    pub duration: Option<f64>,
    /// JSON array encoded as a string, e.g. `["rock","indie"]`
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub album_name: Option<String>,
}

impl SongPayload {
    /// Build the payload for `track`
    ///
    /// Fails before any request is made if a field the backend requires is
    /// blank. Unparseable release dates and non-finite durations are dropped.
    pub fn from_track(track: &Track) -> Result<Self> {
        let song_id = track.catalogue_id().as_str().trim().to_string();
        require("song_id", &song_id)?;
        require("name", &track.name)?;
        require("artist", &track.artist)?;
        require("audio_url", &track.audio_url)?;

        Ok(Self {
            song_id,
            name: track.name.clone(),
            artist: track.artist.clone(),
            audio_url: track.audio_url.clone(),
            image_url: track.image_url.clone().filter(|s| !s.is_empty()),
            duration: track.duration_seconds.filter(|d| d.is_finite()),
            genre: track.genre.as_deref().and_then(genre_json),
            release_date: track
                .release_date
                .as_deref()
                .filter(|d| is_valid_date(d))
                .map(str::to_string),
            album_name: track.album_name.clone().filter(|s| !s.is_empty()),
        })
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(GatewayError::invalid_input(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

/// Encode genres the way the backend stores them: a JSON array in a string
///
/// Input that already is a JSON array is passed through; a comma separated
/// label list becomes one entry per label.
fn genre_json(genre: &str) -> Option<String> {
    let genre = genre.trim();
    if genre.is_empty() {
        return None;
    }
    if serde_json::from_str::<Vec<String>>(genre).is_ok() {
        return Some(genre.to_string());
    }

    let labels: Vec<&str> = genre
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    serde_json::to_string(&labels).ok()
}

fn is_valid_date(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// List bodies come back bare or wrapped, depending on the endpoint
///
/// `GET /api/playlists/{id}` nests the songs in the playlist object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Bare(Vec<T>),
    Songs { songs: Vec<T> },
    Playlists { playlists: Vec<T> },
    Data { data: Vec<T> },
    Nested { playlist: NestedSongs<T> },
}

#[derive(Debug, Deserialize)]
pub(crate) struct NestedSongs<T> {
    #[serde(default = "Vec::new")]
    songs: Vec<T>,
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items)
            | Self::Songs { songs: items }
            | Self::Playlists { playlists: items }
            | Self::Data { data: items }
            | Self::Nested {
                playlist: NestedSongs { songs: items },
            } => items,
        }
    }
}

/// Create responses are either the playlist itself or `{ "playlist": … }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PlaylistEnvelope {
    Wrapped { playlist: PlaylistSummary },
    Bare(PlaylistSummary),
}

impl PlaylistEnvelope {
    pub fn into_inner(self) -> PlaylistSummary {
        match self {
            Self::Wrapped { playlist } | Self::Bare(playlist) => playlist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new("42", "Song", "Band", "https://cdn.test/42.mp3")
    }

    #[test]
    fn payload_uses_catalogue_id() {
        let mut t = track();
        t.song_id = Some("jam-7".into());
        let payload = SongPayload::from_track(&t).unwrap();
        assert_eq!(payload.song_id, "jam-7");
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut t = track();
        t.artist = "  ".into();
        assert_eq!(
            SongPayload::from_track(&t),
            Err(GatewayError::invalid_input("artist is required"))
        );

        let mut t = track();
        t.audio_url.clear();
        assert!(SongPayload::from_track(&t).is_err());
    }

    #[test]
    fn genre_becomes_json_array_string() {
        assert_eq!(genre_json("rock"), Some(r#"["rock"]"#.to_string()));
        assert_eq!(
            genre_json("rock, indie"),
            Some(r#"["rock","indie"]"#.to_string())
        );
        assert_eq!(genre_json(r#"["jazz"]"#), Some(r#"["jazz"]"#.to_string()));
        assert_eq!(genre_json("  "), None);
    }

    #[test]
    fn invalid_release_date_is_dropped() {
        let mut t = track();
        t.release_date = Some("2021-13-45".into());
        assert_eq!(SongPayload::from_track(&t).unwrap().release_date, None);

        t.release_date = Some("2021-06-01".into());
        assert_eq!(
            SongPayload::from_track(&t).unwrap().release_date.as_deref(),
            Some("2021-06-01")
        );

        t.release_date = Some("2021-06-01T10:00:00Z".into());
        assert!(SongPayload::from_track(&t).unwrap().release_date.is_some());
    }

    #[test]
    fn envelopes_unwrap() {
        let bare: ListEnvelope<u32> = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);

        let songs: ListEnvelope<u32> = serde_json::from_str(r#"{"songs":[3]}"#).unwrap();
        assert_eq!(songs.into_vec(), vec![3]);

        let data: ListEnvelope<u32> = serde_json::from_str(r#"{"data":[4]}"#).unwrap();
        assert_eq!(data.into_vec(), vec![4]);

        let nested: ListEnvelope<u32> =
            serde_json::from_str(r#"{"playlist":{"id":1,"songs":[5,6]}}"#).unwrap();
        assert_eq!(nested.into_vec(), vec![5, 6]);

        let no_songs: ListEnvelope<u32> =
            serde_json::from_str(r#"{"playlist":{"id":1}}"#).unwrap();
        assert!(no_songs.into_vec().is_empty());
    }

    #[test]
    fn playlist_envelope_accepts_both_shapes() {
        let wrapped: PlaylistEnvelope =
            serde_json::from_str(r#"{"playlist":{"id":3,"name":"A"}}"#).unwrap();
        assert_eq!(wrapped.into_inner().id.as_str(), "3");

        let bare: PlaylistEnvelope = serde_json::from_str(r#"{"id":4,"name":"B"}"#).unwrap();
        assert_eq!(bare.into_inner().name, "B");
    }
}
