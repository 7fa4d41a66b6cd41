//! Error types for playback management

use amuzz_core::TrackId;
use thiserror::Error;

/// Playback errors
///
/// Raised by the audio output or by the controller when a track cannot be
/// played. The controller never retries; it parks in the paused state and
/// keeps the error for the UI to render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Track has no resolvable audio URL
    #[error("Track {0} has no audio URL")]
    UnplayableTrack(TrackId),

    /// The audio resource could not be loaded (unreachable, unsupported format)
    #[error("Failed to load track {track_id}: {message}")]
    Load {
        /// Track that failed
        track_id: TrackId,
        /// Reason reported by the output
        message: String,
    },

    /// The output refused to start playing (decode error, autoplay policy)
    #[error("Failed to start track {track_id}: {message}")]
    Start {
        /// Track that failed
        track_id: TrackId,
        /// Reason reported by the output
        message: String,
    },

    /// Seeking within the bound resource failed
    #[error("Seek failed: {0}")]
    Seek(String),

    /// Generic output failure
    #[error("Audio output error: {0}")]
    Output(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
