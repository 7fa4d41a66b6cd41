//! Playlist change events
//!
//! One event per user-visible playlist mutation. Events carry the surface
//! that caused them (`source`) so a publisher can recognise its own echo.

use amuzz_core::{PlaylistId, PlaylistSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Source tag used when the publisher does not name itself
pub const UNKNOWN_SOURCE: &str = "unknown";

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// What happened to a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistAction {
    /// One song was added to `playlist_id`
    SongAdded,
    /// One song was removed from `playlist_id`
    SongRemoved,
    /// A playlist was created; the summary travels in `playlist`
    PlaylistCreated,
    /// `playlist_id` changed in some way that needs a recount
    PlaylistUpdated,
    /// Everything should be reloaded from the server
    Refresh,
}

/// A message on the [`EventBus`](crate::EventBus)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEvent {
    pub action: PlaylistAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<PlaylistId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist: Option<PlaylistSummary>,

    /// Logical origin, e.g. `"player"` or `"results"`
    #[serde(default = "unknown_source")]
    pub source: String,

    /// Publish time, milliseconds since the epoch on the wire
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Process-local publish order, for diagnostics only
    #[serde(default)]
    pub sequence: u64,
}

fn unknown_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

/// Blank sources become [`UNKNOWN_SOURCE`]
pub(crate) fn source_or_unknown(source: impl Into<String>) -> String {
    let source = source.into();
    if source.trim().is_empty() {
        unknown_source()
    } else {
        source
    }
}

impl PlaylistEvent {
    fn new(action: PlaylistAction, source: impl Into<String>) -> Self {
        Self {
            action,
            playlist_id: None,
            playlist: None,
            source: source_or_unknown(source),
            timestamp: Utc::now(),
            sequence: SEQUENCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn song_added(playlist_id: impl Into<PlaylistId>, source: impl Into<String>) -> Self {
        Self {
            playlist_id: Some(playlist_id.into()),
            ..Self::new(PlaylistAction::SongAdded, source)
        }
    }

    pub fn song_removed(playlist_id: impl Into<PlaylistId>, source: impl Into<String>) -> Self {
        Self {
            playlist_id: Some(playlist_id.into()),
            ..Self::new(PlaylistAction::SongRemoved, source)
        }
    }

    pub fn playlist_created(playlist: PlaylistSummary, source: impl Into<String>) -> Self {
        Self {
            playlist_id: Some(playlist.id.clone()),
            playlist: Some(playlist),
            ..Self::new(PlaylistAction::PlaylistCreated, source)
        }
    }

    pub fn playlist_updated(playlist_id: impl Into<PlaylistId>, source: impl Into<String>) -> Self {
        Self {
            playlist_id: Some(playlist_id.into()),
            ..Self::new(PlaylistAction::PlaylistUpdated, source)
        }
    }

    pub fn refresh(source: impl Into<String>) -> Self {
        Self::new(PlaylistAction::Refresh, source)
    }

    /// Re-tag the event with another source
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source_or_unknown(source);
        self
    }

    /// Target playlist, from `playlist_id` or the embedded summary
    pub fn target(&self) -> Option<&PlaylistId> {
        self.playlist_id
            .as_ref()
            .or_else(|| self.playlist.as_ref().map(|p| &p.id))
    }
}
