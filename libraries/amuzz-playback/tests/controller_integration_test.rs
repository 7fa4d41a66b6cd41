//! Integration tests for the player controller
//!
//! Drives the controller the way a UI plus an asynchronous audio element
//! would, with a recording output standing in for the element.

use amuzz_core::Track;
use amuzz_playback::{
    AudioOutput, LoadId, PlaybackError, PlaybackState, PlaybackStateEvent, PlayerConfig,
    PlayerController, PlayerEvent, SeekTarget,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Test Helpers =====

#[derive(Debug, Default)]
struct OutputLog {
    bound: Option<LoadId>,
    loads: Vec<(String, LoadId)>,
    unloads: usize,
    plays: usize,
    pauses: usize,
    seeks: Vec<Duration>,
    gain: f32,
    /// Set when `load` was called while a resource was still bound
    double_bind: bool,
    fail_load: bool,
    fail_play: bool,
}

/// Recording output; the log is shared so tests can inspect it after
/// handing the output to the controller
#[derive(Clone, Default)]
struct MockOutput {
    log: Arc<Mutex<OutputLog>>,
}

impl MockOutput {
    fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, OutputLog> {
        self.log.lock().unwrap()
    }
}

impl AudioOutput for MockOutput {
    fn load(&mut self, url: &str, load_id: LoadId) -> amuzz_playback::Result<()> {
        let mut log = self.log();
        if log.bound.is_some() {
            log.double_bind = true;
        }
        if log.fail_load {
            return Err(PlaybackError::Output("unsupported format".into()));
        }
        log.bound = Some(load_id);
        log.loads.push((url.to_string(), load_id));
        Ok(())
    }

    fn play(&mut self) -> amuzz_playback::Result<()> {
        let mut log = self.log();
        if log.fail_play {
            return Err(PlaybackError::Output("autoplay blocked".into()));
        }
        log.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.log().pauses += 1;
    }

    fn unload(&mut self) {
        let mut log = self.log();
        log.bound = None;
        log.unloads += 1;
    }

    fn seek(&mut self, position: Duration) -> amuzz_playback::Result<()> {
        self.log().seeks.push(position);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.log().gain = gain;
    }
}

fn track(id: &str) -> Track {
    Track::new(id, format!("Song {}", id), "Artist", format!("https://cdn.test/{}.mp3", id))
}

fn xyz() -> Vec<Track> {
    vec![track("x"), track("y"), track("z")]
}

fn player() -> (PlayerController, MockOutput) {
    let output = MockOutput::new();
    let controller = PlayerController::new(PlayerConfig::default(), Box::new(output.clone()));
    (controller, output)
}

fn current_id(player: &PlayerController) -> String {
    player.current_track().unwrap().id.to_string()
}

// ===== Opening and navigation =====

#[test]
fn open_then_walk_forward_wraps_around() {
    let (mut player, output) = player();

    player.open_player(track("x"), xyz());
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.state(), PlaybackState::Playing);
    assert!(player.is_visible());

    player.next_track();
    assert_eq!(player.current_index(), Some(1));
    assert_eq!(current_id(&player), "y");
    assert!(player.is_playing());
    assert_eq!(output.log().loads.last().unwrap().0, "https://cdn.test/y.mp3");

    player.next_track();
    player.next_track();
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(current_id(&player), "x");
}

#[test]
fn previous_from_first_wraps_to_last() {
    let (mut player, _output) = player();
    player.open_player(track("x"), xyz());

    player.previous_track();
    assert_eq!(player.current_index(), Some(2));
    assert_eq!(current_id(&player), "z");
}

#[test]
fn open_without_list_queues_single_track() {
    let (mut player, output) = player();

    player.open_single(track("a"));
    assert_eq!(player.queue().len(), 1);

    player.next_track();
    assert_eq!(player.current_index(), Some(0));
    player.previous_track();
    assert_eq!(player.current_index(), Some(0));

    // No reload happened for the no-op navigation
    assert_eq!(output.log().loads.len(), 1);
}

#[test]
fn open_with_list_missing_the_track_queues_only_that_track() {
    let (mut player, _output) = player();
    player.open_player(track("q"), xyz());

    assert_eq!(player.queue().len(), 1);
    assert_eq!(current_id(&player), "q");
}

#[test]
fn reopening_replaces_queue() {
    let (mut player, _output) = player();
    player.open_player(track("x"), xyz());
    player.open_player(track("b"), vec![track("a"), track("b")]);

    assert_eq!(player.queue().len(), 2);
    assert_eq!(player.current_index(), Some(1));
    assert_eq!(current_id(&player), "b");
}

#[test]
fn never_more_than_one_resource_bound() {
    let (mut player, output) = player();

    player.open_player(track("x"), xyz());
    player.next_track();
    player.previous_track();
    player.open_player(track("z"), xyz());
    player.next_track();
    player.close_player();
    player.open_single(track("a"));

    let log = output.log();
    assert!(!log.double_bind, "load called while another resource was bound");
    assert_eq!(log.loads.len(), 6);
    assert_eq!(log.unloads, 5);
}

// ===== Play / pause / close =====

#[test]
fn pause_and_resume_do_not_rebind() {
    let (mut player, output) = player();
    player.open_player(track("x"), xyz());
    player.drain_events();

    player.pause();
    assert_eq!(player.state(), PlaybackState::Paused);
    player.pause();

    player.play();
    player.play();
    assert_eq!(player.state(), PlaybackState::Playing);

    let log = output.log();
    assert_eq!(log.loads.len(), 1);
    assert_eq!(log.pauses, 1);
    assert_eq!(log.plays, 2);

    let events = player.drain_events();
    assert_eq!(
        events,
        vec![
            PlayerEvent::StateChanged {
                state: PlaybackStateEvent::Paused
            },
            PlayerEvent::StateChanged {
                state: PlaybackStateEvent::Playing
            },
        ]
    );
}

#[test]
fn close_twice_is_same_as_once() {
    let (mut player, output) = player();
    player.open_player(track("y"), xyz());

    player.close_player();
    let first = player.snapshot();
    player.drain_events();

    player.close_player();
    let second = player.snapshot();

    assert_eq!(first, second);
    assert_eq!(second.state, PlaybackState::Empty);
    assert!(!second.is_playing);
    assert!(!second.visible);
    assert!(!player.has_pending_events());
    assert_eq!(output.log().unloads, 1);
    assert!(output.log().bound.is_none());
}

#[test]
fn close_on_fresh_player_is_noop() {
    let (mut player, output) = player();
    player.close_player();

    assert_eq!(player.state(), PlaybackState::Empty);
    assert!(!player.has_pending_events());
    assert_eq!(output.log().unloads, 0);
}

#[test]
fn play_after_close_does_nothing() {
    let (mut player, output) = player();
    player.open_single(track("a"));
    player.close_player();

    player.play();
    assert_eq!(player.state(), PlaybackState::Empty);
    assert_eq!(output.log().loads.len(), 1);
}

// ===== Track end =====

#[test]
fn end_of_single_track_stops_without_restart() {
    let (mut player, output) = player();
    player.open_single(track("a"));
    let load_id = player.active_load().unwrap();

    player.on_metadata_loaded(load_id, Duration::from_secs(200));
    player.on_time_update(load_id, Duration::from_secs(199));
    player.on_track_ended(load_id);

    assert!(!player.is_playing());
    assert_eq!(player.state(), PlaybackState::Paused);
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.position(), Duration::ZERO);

    let log = output.log();
    assert_eq!(log.loads.len(), 1);
    assert_eq!(log.seeks.last(), Some(&Duration::ZERO));
    assert_eq!(log.pauses, 1);
    assert_eq!(log.plays, 1);
}

#[test]
fn end_of_track_in_list_advances_and_wraps() {
    let (mut player, _output) = player();
    player.open_player(track("z"), xyz());
    let load_id = player.active_load().unwrap();
    player.drain_events();

    player.on_track_ended(load_id);

    assert_eq!(player.current_index(), Some(0));
    assert!(player.is_playing());

    let events = player.drain_events();
    assert_eq!(
        events[0],
        PlayerEvent::TrackFinished {
            track_id: "z".into()
        }
    );
    assert!(events.contains(&PlayerEvent::TrackChanged {
        track_id: "x".into(),
        index: 0,
        previous_track_id: Some("z".into()),
    }));
}

// ===== Stale callbacks =====

#[test]
fn callbacks_from_previous_track_are_discarded() {
    let (mut player, _output) = player();
    player.open_player(track("x"), xyz());
    let old = player.active_load().unwrap();

    player.next_track();
    let current = player.active_load().unwrap();
    player.drain_events();

    player.on_metadata_loaded(old, Duration::from_secs(999));
    player.on_time_update(old, Duration::from_secs(42));
    player.on_play_failed(old, "decode error");
    player.on_track_ended(old);

    assert_eq!(player.duration(), None);
    assert_eq!(player.position(), Duration::ZERO);
    assert!(player.is_playing());
    assert!(player.last_error().is_none());
    assert_eq!(player.current_index(), Some(1));
    assert!(!player.has_pending_events());

    player.on_metadata_loaded(current, Duration::from_secs(120));
    assert_eq!(player.duration(), Some(Duration::from_secs(120)));
}

#[test]
fn callbacks_after_close_are_discarded() {
    let (mut player, _output) = player();
    player.open_single(track("a"));
    let load_id = player.active_load().unwrap();
    player.close_player();
    player.drain_events();

    player.on_track_ended(load_id);
    player.on_time_update(load_id, Duration::from_secs(3));

    assert_eq!(player.state(), PlaybackState::Empty);
    assert!(!player.has_pending_events());
}

#[test]
fn time_updates_ignored_while_paused() {
    let (mut player, _output) = player();
    player.open_single(track("a"));
    let load_id = player.active_load().unwrap();
    player.on_metadata_loaded(load_id, Duration::from_secs(60));

    player.on_time_update(load_id, Duration::from_secs(5));
    assert_eq!(player.position(), Duration::from_secs(5));

    player.pause();
    player.drain_events();
    player.on_time_update(load_id, Duration::from_secs(6));

    assert_eq!(player.position(), Duration::from_secs(5));
    assert!(!player.has_pending_events());
}

#[test]
fn late_start_confirmation_after_pause_pauses_output() {
    let (mut player, output) = player();
    player.open_single(track("a"));
    let load_id = player.active_load().unwrap();

    player.pause();
    let pauses = output.log().pauses;

    player.on_play_started(load_id);
    assert_eq!(output.log().pauses, pauses + 1);
    assert!(!player.is_playing());
}

// ===== Failures =====

#[test]
fn load_failure_parks_paused_with_error() {
    let (mut player, output) = player();
    output.log().fail_load = true;

    player.open_single(track("a"));

    assert_eq!(player.state(), PlaybackState::Paused);
    assert!(player.active_load().is_none());
    assert!(matches!(player.last_error(), Some(PlaybackError::Load { .. })));
    assert!(player
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlayerEvent::Error { .. })));
}

#[test]
fn asynchronous_play_failure_is_not_retried() {
    let (mut player, output) = player();
    player.open_single(track("a"));
    let load_id = player.active_load().unwrap();

    player.on_play_failed(load_id, "NotAllowedError");

    assert!(!player.is_playing());
    assert!(matches!(player.last_error(), Some(PlaybackError::Start { .. })));
    assert_eq!(output.log().plays, 1);

    // Explicit play retries and clears the error
    player.play();
    assert!(player.is_playing());
    assert!(player.last_error().is_none());
    assert_eq!(output.log().plays, 2);
}

#[test]
fn synchronous_play_failure_keeps_binding() {
    let (mut player, output) = player();
    output.log().fail_play = true;

    player.open_single(track("a"));

    assert!(!player.is_playing());
    assert!(player.active_load().is_some());
    assert!(player.snapshot().last_error.is_some());
}

// ===== Seek =====

#[test]
fn seek_clamps_to_duration() {
    let (mut player, output) = player();
    player.open_single(track("a"));
    let load_id = player.active_load().unwrap();
    player.on_metadata_loaded(load_id, Duration::from_secs(100));

    player.seek(SeekTarget::Fraction(0.25));
    assert_eq!(player.position(), Duration::from_secs(25));

    player.seek(SeekTarget::Seconds(500.0));
    assert_eq!(player.position(), Duration::from_secs(100));

    player.seek(SeekTarget::Seconds(-3.0));
    assert_eq!(player.position(), Duration::ZERO);

    player.seek(SeekTarget::Fraction(1.7));
    assert_eq!(player.position(), Duration::from_secs(100));

    assert_eq!(output.log().seeks.len(), 4);
}

#[test]
fn seek_without_duration_is_noop() {
    let (mut player, output) = player();
    player.seek(SeekTarget::Seconds(10.0));

    player.open_single(track("a"));
    player.seek(SeekTarget::Fraction(0.5));
    player.seek(SeekTarget::Seconds(f64::NAN));

    assert_eq!(player.position(), Duration::ZERO);
    assert!(output.log().seeks.is_empty());
}

// ===== Volume =====

#[test]
fn mute_toggle_keeps_slider_level() {
    let (mut player, output) = player();

    player.set_volume(0.7);
    assert!(!player.is_muted());

    player.toggle_mute();
    assert_eq!(player.effective_volume(), 0.0);
    assert_eq!(player.volume(), 0.7);
    assert_eq!(output.log().gain, 0.0);

    player.toggle_mute();
    assert_eq!(player.effective_volume(), 0.7);
    assert_eq!(output.log().gain, 0.7);
}

#[test]
fn slider_to_zero_mutes_and_back_up_unmutes() {
    let (mut player, _output) = player();
    player.set_volume(0.0);
    assert!(player.is_muted());

    player.set_volume(0.2);
    assert!(!player.is_muted());
    assert_eq!(player.effective_volume(), 0.2);
}

#[test]
fn gain_is_applied_to_every_new_binding() {
    let output = MockOutput::new();
    let config = PlayerConfig {
        initial_volume: 0.5,
        ..PlayerConfig::default()
    };
    let mut player = PlayerController::new(config, Box::new(output.clone()));

    player.toggle_mute();
    player.open_player(track("x"), xyz());
    assert_eq!(output.log().gain, 0.0);

    player.toggle_mute();
    player.next_track();
    assert_eq!(output.log().gain, 0.5);
}

// ===== Layout =====

#[test]
fn expand_collapse_emit_visibility() {
    let (mut player, _output) = player();
    player.open_single(track("a"));
    player.drain_events();

    player.expand_player();
    player.expand_player();
    player.collapse_player();

    assert_eq!(
        player.drain_events(),
        vec![
            PlayerEvent::VisibilityChanged {
                visible: true,
                expanded: true
            },
            PlayerEvent::VisibilityChanged {
                visible: true,
                expanded: false
            },
        ]
    );
}
