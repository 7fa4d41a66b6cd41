//! Core types for playback management

use amuzz_core::Track;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Macro state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No queue loaded
    Empty,

    /// Track loaded, clock stopped
    Paused,

    /// Track loaded, clock advancing
    Playing,
}

/// Seek request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Fraction of the track duration (0.0 - 1.0)
    Fraction(f64),

    /// Absolute position in seconds
    Seconds(f64),
}

/// Identifies one binding of a track to the audio output.
///
/// Issued by the controller every time it loads a track and echoed back by
/// the platform on every callback, so callbacks from an earlier binding can
/// be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadId(pub(crate) u64);

impl LoadId {
    /// Raw sequence number
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Configuration for the player controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume (0.0 - 1.0, default: 1.0)
    pub initial_volume: f32,

    /// Start in the expanded (full) layout (default: false)
    pub start_expanded: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            start_expanded: false,
        }
    }
}

/// Read-only view of the live player state, for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    /// Macro state
    pub state: PlaybackState,
    /// Track under the cursor
    pub current_track: Option<Track>,
    /// Cursor position
    pub current_index: Option<usize>,
    /// Number of queued tracks
    pub queue_len: usize,
    /// Whether the clock is advancing
    pub is_playing: bool,
    /// Slider volume (0.0 - 1.0)
    pub volume: f32,
    /// Mute flag
    pub muted: bool,
    /// Volume actually sent to the output
    pub effective_volume: f32,
    /// Observed position
    pub position: Duration,
    /// Observed duration, once metadata has loaded
    pub duration: Option<Duration>,
    /// Player shown at all
    pub visible: bool,
    /// Full player instead of mini player
    pub expanded: bool,
    /// Last playback failure, if the UI should show one
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.initial_volume, 1.0);
        assert!(!config.start_expanded);
    }

    #[test]
    fn load_id_display() {
        assert_eq!(LoadId(7).to_string(), "load#7");
        assert_eq!(LoadId(7).value(), 7);
    }
}
