//! Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Deserializer, Serialize};

/// A queueable audio item
///
/// Deserializes from both backend shapes: mood suggestions
/// (`audio`, `image`) and stored playlist songs (`audio_url`, `image_url`,
/// `song_id`, `duration`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Identifier, unique within a queue. For stored playlist songs this is
    /// the row id used by the delete endpoint.
    pub id: TrackId,

    /// Catalogue id of the song, when it differs from `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_id: Option<TrackId>,

    /// Track title
    #[serde(default)]
    pub name: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,

    /// Resolvable audio URL, required for playback
    #[serde(default, alias = "audio")]
    pub audio_url: String,

    /// Cover art URL
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Duration hint. The player trusts the audio resource instead.
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    /// Genre label(s), comma separated when the backend sends a list
    #[serde(
        default,
        alias = "genres",
        deserialize_with = "deserialize_genre",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre: Option<String>,

    /// Album name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,

    /// Release date as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl Track {
    /// Create a track with the fields playback needs
    pub fn new(
        id: impl Into<TrackId>,
        name: impl Into<String>,
        artist: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            song_id: None,
            name: name.into(),
            artist: artist.into(),
            audio_url: audio_url.into(),
            image_url: None,
            duration_seconds: None,
            genre: None,
            album_name: None,
            release_date: None,
        }
    }

    /// Set the cover art URL
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set the duration hint
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Id the backend knows the song by (`song_id`, falling back to `id`)
    pub fn catalogue_id(&self) -> &TrackId {
        self.song_id.as_ref().unwrap_or(&self.id)
    }

    /// Whether the track can be bound to an audio output
    pub fn is_playable(&self) -> bool {
        !self.audio_url.trim().is_empty()
    }
}

fn deserialize_genre<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Genre {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Genre>::deserialize(deserializer)? {
        Some(Genre::One(s)) if !s.is_empty() => Some(s),
        Some(Genre::Many(list)) if !list.is_empty() => Some(list.join(", ")),
        _ => None,
    })
}
