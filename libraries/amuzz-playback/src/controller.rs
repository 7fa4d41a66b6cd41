//! Player controller - core orchestration
//!
//! Owns the queue, volume, visibility flags and the single audio output,
//! and turns UI calls plus audio callbacks into state transitions.

use crate::{
    error::PlaybackError,
    events::PlayerEvent,
    output::AudioOutput,
    queue::PlaybackQueue,
    types::{LoadId, PlaybackState, PlayerConfig, PlayerSnapshot, SeekTarget},
    volume::Volume,
};
use amuzz_core::Track;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Central playback state machine
///
/// States:
/// ```text
///            open_player                 play / pause
///   Empty ───────────────▶ Playing ◀──────────────────▶ Paused
///     ▲                      │ next / previous / ended     │
///     └──── close_player ────┴─────────────────────────────┘
/// ```
///
/// UI operations are expected to be serialized by the caller's event loop.
/// Audio callbacks (`on_*`) may arrive late; each carries the [`LoadId`] of
/// the binding that produced it and is dropped unless that binding is
/// still current.
pub struct PlayerController {
    // State
    queue: PlaybackQueue,
    is_playing: bool,
    visible: bool,
    expanded: bool,

    // Settings
    volume: Volume,

    // Observed from the audio resource
    position: Duration,
    duration: Option<Duration>,

    // The one audio resource
    output: Box<dyn AudioOutput>,
    bound: Option<LoadId>,
    next_load_id: u64,

    // Last failure, cleared on the next successful load or explicit play
    last_error: Option<PlaybackError>,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl PlayerController {
    /// Create new controller driving `output`
    pub fn new(config: PlayerConfig, output: Box<dyn AudioOutput>) -> Self {
        let volume = Volume::new(config.initial_volume);
        let mut controller = Self {
            queue: PlaybackQueue::new(),
            is_playing: false,
            visible: false,
            expanded: config.start_expanded,
            volume,
            position: Duration::ZERO,
            duration: None,
            output,
            bound: None,
            next_load_id: 0,
            last_error: None,
            pending_events: Vec::new(),
        };
        let gain = controller.volume.gain();
        controller.output.set_gain(gain);
        controller
    }

    // ===== Queue lifecycle =====

    /// Open the player on `track`, with `siblings` as the surrounding list
    ///
    /// Replaces any previous queue. If `siblings` does not contain `track`
    /// the queue is just `[track]`. Starts playback immediately.
    pub fn open_player(&mut self, track: Track, siblings: Vec<Track>) {
        info!(track_id = %track.id, siblings = siblings.len(), "Opening player");

        self.queue = PlaybackQueue::open(track, siblings);
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });

        if !self.visible {
            self.visible = true;
            self.emit_visibility();
        }

        self.load_current(None, true);
    }

    /// Open the player on a single track
    pub fn open_single(&mut self, track: Track) {
        let siblings = vec![track.clone()];
        self.open_player(track, siblings);
    }

    /// Stop output, clear the queue and hide the player
    ///
    /// Idempotent: a second call changes nothing and emits nothing.
    pub fn close_player(&mut self) {
        let was_empty = self.queue.is_empty();

        self.unbind();
        self.position = Duration::ZERO;
        self.duration = None;

        if !was_empty {
            self.queue.clear();
            self.emit(PlayerEvent::QueueChanged { length: 0 });
        }

        let was_playing = self.is_playing;
        self.is_playing = false;
        if !was_empty || was_playing {
            self.emit_state_changed();
        }

        if self.visible {
            self.visible = false;
            self.emit_visibility();
        }

        if !was_empty {
            info!("Player closed");
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// No-op on an empty queue or when already playing. If the current track
    /// failed to load earlier, this is the explicit retry.
    pub fn play(&mut self) {
        if self.queue.is_empty() || self.is_playing {
            return;
        }

        self.last_error = None;

        if self.bound.is_some() {
            self.start_output();
        } else {
            self.load_current(None, true);
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if !self.is_playing {
            return;
        }

        self.output.pause();
        self.is_playing = false;
        self.emit_state_changed();
    }

    /// Skip to next track, wrapping to the start
    ///
    /// Queues of zero or one track have no next track; nothing happens.
    pub fn next_track(&mut self) {
        let previous = self.current_track_id();
        if self.queue.advance() {
            self.load_current(previous, true);
        } else {
            debug!(len = self.queue.len(), "next_track ignored");
        }
    }

    /// Go to previous track, wrapping to the end
    pub fn previous_track(&mut self) {
        let previous = self.current_track_id();
        if self.queue.retreat() {
            self.load_current(previous, true);
        } else {
            debug!(len = self.queue.len(), "previous_track ignored");
        }
    }

    // ===== Seek =====

    /// Move the playhead within the current track
    ///
    /// Out-of-range targets clamp to `[0, duration]`. Without a bound track
    /// or a known duration this is a no-op.
    pub fn seek(&mut self, target: SeekTarget) {
        if self.bound.is_none() {
            return;
        }
        let Some(duration) = self.duration else {
            debug!("Seek ignored, duration unknown");
            return;
        };

        let total = duration.as_secs_f64();
        let seconds = match target {
            SeekTarget::Fraction(f) if f.is_finite() => f.clamp(0.0, 1.0) * total,
            SeekTarget::Seconds(s) if s.is_finite() => s.clamp(0.0, total),
            _ => return,
        };
        let position = Duration::from_secs_f64(seconds);

        match self.output.seek(position) {
            Ok(()) => {
                self.position = position;
                self.emit(PlayerEvent::Seeked {
                    position_ms: millis(position),
                });
            }
            Err(e) => {
                warn!(error = %e, "Seek failed");
                self.emit(PlayerEvent::Error {
                    message: e.to_string(),
                });
                self.last_error = Some(e);
            }
        }
    }

    // ===== Volume =====

    /// Set slider volume (0.0 - 1.0); zero mutes, above zero unmutes
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_gain();
    }

    /// Toggle mute, keeping the slider level
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_gain();
    }

    // ===== Layout =====

    /// Show the full player
    pub fn expand_player(&mut self) {
        if !self.expanded {
            self.expanded = true;
            self.emit_visibility();
        }
    }

    /// Show the mini player
    pub fn collapse_player(&mut self) {
        if self.expanded {
            self.expanded = false;
            self.emit_visibility();
        }
    }

    // ===== Audio callbacks =====

    /// Metadata for the bound resource arrived
    pub fn on_metadata_loaded(&mut self, load_id: LoadId, duration: Duration) {
        if !self.is_current(load_id, "metadata") {
            return;
        }
        if duration.is_zero() {
            return;
        }

        self.duration = Some(duration);
        self.emit(PlayerEvent::DurationKnown {
            duration_ms: millis(duration),
        });
    }

    /// Periodic clock tick from the bound resource
    ///
    /// Ticks are ignored while paused so progress only moves during playback.
    pub fn on_time_update(&mut self, load_id: LoadId, position: Duration) {
        if !self.is_current(load_id, "time update") || !self.is_playing {
            return;
        }

        self.position = match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
        self.emit(PlayerEvent::PositionUpdate {
            position_ms: millis(self.position),
            duration_ms: self.duration.map(millis),
        });
    }

    /// The platform confirmed that playback started
    pub fn on_play_started(&mut self, load_id: LoadId) {
        if !self.is_current(load_id, "play started") {
            return;
        }

        // The user paused while the start was pending
        if !self.is_playing {
            debug!(%load_id, "Start confirmed after pause, pausing output");
            self.output.pause();
        }
    }

    /// The platform reported that playback could not start
    pub fn on_play_failed(&mut self, load_id: LoadId, message: impl Into<String>) {
        if !self.is_current(load_id, "play failed") {
            return;
        }

        let Some(track_id) = self.queue.current().map(|t| t.id.clone()) else {
            return;
        };
        self.fail(PlaybackError::Start {
            track_id,
            message: message.into(),
        });
    }

    /// The bound resource played to its end
    ///
    /// Multi-track queues advance (wrapping). A single-track queue stops in
    /// the paused state with the cursor unchanged.
    pub fn on_track_ended(&mut self, load_id: LoadId) {
        if !self.is_current(load_id, "ended") {
            return;
        }

        self.position = Duration::ZERO;
        if let Some(track_id) = self.current_track_id() {
            self.emit(PlayerEvent::TrackFinished { track_id });
        }

        if self.queue.len() > 1 {
            self.next_track();
            return;
        }

        if let Err(e) = self.output.seek(Duration::ZERO) {
            debug!(error = %e, "Rewind after end failed");
        }
        if self.is_playing {
            self.output.pause();
            self.is_playing = false;
            self.emit_state_changed();
        }
    }

    // ===== State Queries =====

    /// Get current macro state
    pub fn state(&self) -> PlaybackState {
        if self.queue.is_empty() {
            PlaybackState::Empty
        } else if self.is_playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    /// Whether the clock is advancing
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Get currently loaded track
    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    /// Cursor position
    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    /// The queue
    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    /// Binding currently held by the output
    pub fn active_load(&self) -> Option<LoadId> {
        self.bound
    }

    /// Slider level (0.0 - 1.0)
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Volume actually applied to the output
    pub fn effective_volume(&self) -> f32 {
        self.volume.gain()
    }

    /// Observed playback position
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Observed duration of the current track
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Player shown at all
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Full player instead of mini player
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Last playback failure
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    /// Snapshot of everything the UI renders
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state(),
            current_track: self.queue.current().cloned(),
            current_index: self.queue.current_index(),
            queue_len: self.queue.len(),
            is_playing: self.is_playing,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            effective_volume: self.volume.gain(),
            position: self.position,
            duration: self.duration,
            visible: self.visible,
            expanded: self.expanded,
            last_error: self.last_error.as_ref().map(ToString::to_string),
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events that have been emitted since the last drain.
    /// The UI should call this after every operation or callback.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Bind the track under the cursor and optionally start it
    fn load_current(&mut self, previous_track_id: Option<String>, autoplay: bool) {
        let Some(track) = self.queue.current().cloned() else {
            return;
        };
        let index = self.queue.current_index().unwrap_or(0);

        self.unbind();
        self.position = Duration::ZERO;
        self.duration = None;
        self.last_error = None;

        self.emit(PlayerEvent::TrackChanged {
            track_id: track.id.to_string(),
            index,
            previous_track_id,
        });

        if !track.is_playable() {
            self.fail(PlaybackError::UnplayableTrack(track.id));
            return;
        }

        self.next_load_id += 1;
        let load_id = LoadId(self.next_load_id);

        if let Err(e) = self.output.load(&track.audio_url, load_id) {
            self.fail(PlaybackError::Load {
                track_id: track.id,
                message: e.to_string(),
            });
            return;
        }

        self.bound = Some(load_id);
        debug!(%load_id, track_id = %track.id, index, "Track bound");
        self.output.set_gain(self.volume.gain());

        if autoplay {
            self.start_output();
        }
    }

    /// Ask the output to play the bound resource
    fn start_output(&mut self) {
        match self.output.play() {
            Ok(()) => {
                if !self.is_playing {
                    self.is_playing = true;
                    self.emit_state_changed();
                }
            }
            Err(e) => {
                let Some(track_id) = self.queue.current().map(|t| t.id.clone()) else {
                    return;
                };
                self.fail(PlaybackError::Start {
                    track_id,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Release the output binding, if any
    fn unbind(&mut self) {
        if let Some(load_id) = self.bound.take() {
            self.output.unload();
            debug!(%load_id, "Track unbound");
        }
    }

    /// Park in the paused state and record the failure
    fn fail(&mut self, error: PlaybackError) {
        warn!(error = %error, "Playback failed");

        if self.is_playing {
            self.output.pause();
            self.is_playing = false;
        }
        self.emit(PlayerEvent::Error {
            message: error.to_string(),
        });
        self.emit_state_changed();
        self.last_error = Some(error);
    }

    fn is_current(&self, load_id: LoadId, what: &str) -> bool {
        if self.bound == Some(load_id) {
            true
        } else {
            debug!(%load_id, current = ?self.bound, callback = what, "Discarding stale callback");
            false
        }
    }

    fn current_track_id(&self) -> Option<String> {
        self.queue.current().map(|t| t.id.to_string())
    }

    fn apply_gain(&mut self) {
        self.output.set_gain(self.volume.gain());
        self.emit(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn emit_state_changed(&mut self) {
        let state = self.state();
        self.emit(PlayerEvent::StateChanged {
            state: state.into(),
        });
    }

    fn emit_visibility(&mut self) {
        self.emit(PlayerEvent::VisibilityChanged {
            visible: self.visible,
            expanded: self.expanded,
        });
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NullOutput;

    fn create_test_track(id: &str) -> Track {
        Track::new(id, format!("Track {}", id), "Artist", format!("https://cdn/{}.mp3", id))
    }

    fn controller() -> PlayerController {
        PlayerController::new(PlayerConfig::default(), Box::new(NullOutput::new()))
    }

    #[test]
    fn new_controller_is_empty_and_hidden() {
        let player = controller();
        assert_eq!(player.state(), PlaybackState::Empty);
        assert!(!player.is_visible());
        assert!(player.active_load().is_none());
    }

    #[test]
    fn load_ids_increase_per_binding() {
        let mut player = controller();
        let tracks = vec![create_test_track("a"), create_test_track("b")];
        player.open_player(tracks[0].clone(), tracks);
        let first = player.active_load().unwrap();

        player.next_track();
        let second = player.active_load().unwrap();
        assert!(second > first);
    }

    #[test]
    fn unplayable_track_parks_paused_with_error() {
        let mut player = controller();
        player.open_single(Track::new("x", "No audio", "Artist", ""));

        assert_eq!(player.state(), PlaybackState::Paused);
        assert!(player.active_load().is_none());
        assert!(matches!(
            player.last_error(),
            Some(PlaybackError::UnplayableTrack(_))
        ));
    }

    #[test]
    fn play_on_empty_queue_is_noop() {
        let mut player = controller();
        player.play();
        assert_eq!(player.state(), PlaybackState::Empty);
        assert!(!player.has_pending_events());
    }

    #[test]
    fn expand_and_collapse_are_orthogonal_to_playback() {
        let mut player = controller();
        player.open_single(create_test_track("a"));
        player.expand_player();
        assert!(player.is_expanded());
        assert!(player.is_playing());

        player.collapse_player();
        assert!(!player.is_expanded());
        assert!(player.is_playing());
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
