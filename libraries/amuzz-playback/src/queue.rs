//! Playback queue
//!
//! An ordered list of tracks plus a cursor. The queue is replaced
//! wholesale every time the player is opened; there is no incremental
//! append. Navigation wraps around in both directions.

use amuzz_core::Track;

/// Ordered sequence of tracks plus a cursor
///
/// ```text
///   tracks:  [ X ][ Y ][ Z ]
///                   ^
///            current_index = 1
/// ```
///
/// Insertion order is play order. Duplicate ids are allowed when the caller
/// queues the same track twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackQueue {
    /// Tracks in play order
    tracks: Vec<Track>,

    /// Cursor; only meaningful while `tracks` is non-empty
    current_index: usize,
}

impl PlaybackQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the queue for an "open player" request
    ///
    /// If `siblings` contains `track` (matched by id) the cursor lands on the
    /// first match and the siblings become the queue. Otherwise the track is
    /// queued on its own and `siblings` is ignored.
    pub fn open(track: Track, siblings: Vec<Track>) -> Self {
        match siblings.iter().position(|t| t.id == track.id) {
            Some(index) => Self {
                tracks: siblings,
                current_index: index,
            },
            None => Self::single(track),
        }
    }

    /// Queue holding one track
    pub fn single(track: Track) -> Self {
        Self {
            tracks: vec![track],
            current_index: 0,
        }
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// Cursor position, `None` when empty
    pub fn current_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.current_index)
        }
    }

    /// Move the cursor forward, wrapping to the start
    ///
    /// Returns false (and leaves the cursor alone) for queues of one or zero
    /// tracks: there is no "next" to go to.
    pub fn advance(&mut self) -> bool {
        let len = self.tracks.len();
        if len <= 1 {
            return false;
        }
        self.current_index = (self.current_index + 1) % len;
        true
    }

    /// Move the cursor backward, wrapping to the end
    ///
    /// Same single-track rule as [`advance`](Self::advance).
    pub fn retreat(&mut self) -> bool {
        let len = self.tracks.len();
        if len <= 1 {
            return false;
        }
        self.current_index = if self.current_index == 0 {
            len - 1
        } else {
            self.current_index - 1
        };
        true
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current_index = 0;
    }

    /// All tracks in play order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Get queue length
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
