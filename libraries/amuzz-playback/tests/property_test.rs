//! Property-based tests for the player controller
//!
//! Uses proptest to check navigation, volume and close invariants across
//! random queues and operation sequences.

use amuzz_core::Track;
use amuzz_playback::{NullOutput, PlaybackState, PlayerConfig, PlayerController};
use proptest::prelude::*;

// ===== Helpers =====

fn queue_of(len: usize) -> Vec<Track> {
    (0..len)
        .map(|i| {
            Track::new(
                format!("t{}", i),
                format!("Song {}", i),
                "Artist",
                format!("https://cdn.test/{}.mp3", i),
            )
        })
        .collect()
}

fn player() -> PlayerController {
    PlayerController::new(PlayerConfig::default(), Box::new(NullOutput::new()))
}

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    Play,
    Pause,
    Volume(f32),
    ToggleMute,
    Close,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Play),
        Just(Op::Pause),
        (0.0f32..=1.0).prop_map(Op::Volume),
        Just(Op::ToggleMute),
        Just(Op::Close),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: next/previous move the cursor modulo the queue length
    #[test]
    fn navigation_wraps_modulo_len(len in 2usize..20, start in 0usize..20, forward in any::<bool>()) {
        let start = start % len;
        let tracks = queue_of(len);
        let mut player = player();
        player.open_player(tracks[start].clone(), tracks);

        if forward {
            player.next_track();
            prop_assert_eq!(player.current_index(), Some((start + 1) % len));
        } else {
            player.previous_track();
            prop_assert_eq!(player.current_index(), Some((start + len - 1) % len));
        }
    }

    /// Property: len steps forward come back to the starting track
    #[test]
    fn full_cycle_returns_to_start(len in 1usize..15, start in 0usize..15) {
        let start = start % len;
        let tracks = queue_of(len);
        let mut player = player();
        player.open_player(tracks[start].clone(), tracks);

        for _ in 0..len {
            player.next_track();
        }
        prop_assert_eq!(player.current_index(), Some(start));

        for _ in 0..len {
            player.previous_track();
        }
        prop_assert_eq!(player.current_index(), Some(start));
    }

    /// Property: slider level decides the mute flag
    #[test]
    fn volume_level_decides_mute(level in -1.0f32..2.0) {
        let mut player = player();
        player.toggle_mute();
        player.set_volume(level);

        prop_assert_eq!(player.is_muted(), level <= 0.0);
        prop_assert!((0.0..=1.0).contains(&player.effective_volume()));
    }

    /// Property: two mute toggles restore the effective volume
    #[test]
    fn double_toggle_restores_effective_volume(ops in prop::collection::vec(arbitrary_op(), 0..10)) {
        let tracks = queue_of(3);
        let mut player = player();
        player.open_player(tracks[0].clone(), tracks);
        for op in ops {
            if let Op::Volume(v) = op {
                player.set_volume(v);
            } else if let Op::ToggleMute = op {
                player.toggle_mute();
            }
        }

        let before = player.effective_volume();
        player.toggle_mute();
        player.toggle_mute();
        prop_assert_eq!(player.effective_volume(), before);
    }

    /// Property: closing twice equals closing once, whatever came before
    #[test]
    fn close_is_idempotent(len in 1usize..6, ops in prop::collection::vec(arbitrary_op(), 0..20)) {
        let tracks = queue_of(len);
        let mut player = player();
        player.open_player(tracks[0].clone(), tracks);

        for op in ops {
            match op {
                Op::Next => player.next_track(),
                Op::Previous => player.previous_track(),
                Op::Play => player.play(),
                Op::Pause => player.pause(),
                Op::Volume(v) => player.set_volume(v),
                Op::ToggleMute => player.toggle_mute(),
                Op::Close => player.close_player(),
            }
        }

        player.close_player();
        let once = player.snapshot();
        player.close_player();
        let twice = player.snapshot();

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(twice.state, PlaybackState::Empty);
        prop_assert!(!twice.is_playing);
        prop_assert!(player.active_load().is_none());
    }

    /// Property: playing implies a valid cursor
    #[test]
    fn playing_implies_valid_index(len in 1usize..6, ops in prop::collection::vec(arbitrary_op(), 0..30)) {
        let tracks = queue_of(len);
        let mut player = player();
        player.open_player(tracks[0].clone(), tracks);

        for op in ops {
            match op {
                Op::Next => player.next_track(),
                Op::Previous => player.previous_track(),
                Op::Play => player.play(),
                Op::Pause => player.pause(),
                Op::Volume(v) => player.set_volume(v),
                Op::ToggleMute => player.toggle_mute(),
                Op::Close => player.close_player(),
            }

            if player.is_playing() {
                let index = player.current_index();
                prop_assert!(index.is_some());
                prop_assert!(index.unwrap_or(usize::MAX) < player.queue().len());
            }
        }
    }
}
