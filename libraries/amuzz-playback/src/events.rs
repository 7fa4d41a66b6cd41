//! Player Events
//!
//! Event-based communication for UI synchronization.
//! Events are emitted at key points:
//! - State changes (play/pause/empty)
//! - Track changes (open, next, previous, natural end)
//! - Position updates (only while playing)
//! - Volume, queue and visibility changes
//! - Playback failures

use serde::{Deserialize, Serialize};

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackStateEvent,
    },

    /// A different track was bound to the output
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// Cursor position of the new track
        index: usize,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Track reached its natural end
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Duration became known from the audio resource
    DurationKnown {
        /// Track duration in milliseconds
        duration_ms: u64,
    },

    /// Position update (only emitted while playing)
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration, if known
        duration_ms: Option<u64>,
    },

    /// User moved the playhead
    Seeked {
        /// New position in milliseconds
        position_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// Slider level (0.0 - 1.0)
        level: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Queue replaced or cleared
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Player shown/hidden or expanded/collapsed
    VisibilityChanged {
        /// Player shown at all
        visible: bool,
        /// Full player instead of mini player
        expanded: bool,
    },

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}

/// Playback state for events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStateEvent {
    /// No queue loaded
    Empty,
    /// Track loaded, paused
    Paused,
    /// Playing audio
    Playing,
}

impl From<crate::types::PlaybackState> for PlaybackStateEvent {
    fn from(state: crate::types::PlaybackState) -> Self {
        match state {
            crate::types::PlaybackState::Empty => PlaybackStateEvent::Empty,
            crate::types::PlaybackState::Paused => PlaybackStateEvent::Paused,
            crate::types::PlaybackState::Playing => PlaybackStateEvent::Playing,
        }
    }
}
