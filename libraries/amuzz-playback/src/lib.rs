//! Amuzz - Player Core
//!
//! Platform-agnostic player state machine for Amuzz.
//!
//! This crate provides:
//! - Queue of tracks with a wrapping cursor
//! - Volume control (linear 0.0 - 1.0, slider-coupled mute)
//! - Play / pause / seek / next / previous
//! - Mini and full player layout flags
//! - Stale-callback protection for asynchronous audio backends
//!
//! # Architecture
//!
//! `amuzz-playback` does not talk to any audio device or network:
//! - The audio element is abstracted by [`AudioOutput`]
//! - Asynchronous results come back through `on_*` callbacks tagged with a
//!   [`LoadId`]
//! - UI state is pushed out as [`PlayerEvent`]s and read with
//!   [`PlayerController::snapshot`]
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use amuzz_core::Track;
//! use amuzz_playback::{NullOutput, PlaybackState, PlayerConfig, PlayerController};
//!
//! let mut player = PlayerController::new(PlayerConfig::default(), Box::new(NullOutput::new()));
//!
//! let x = Track::new("x", "Intro", "Band", "https://cdn.example/x.mp3");
//! let y = Track::new("y", "Verse", "Band", "https://cdn.example/y.mp3");
//!
//! player.open_player(x.clone(), vec![x, y]);
//! assert_eq!(player.state(), PlaybackState::Playing);
//!
//! player.next_track();
//! assert_eq!(player.current_index(), Some(1));
//!
//! player.set_volume(0.0);
//! assert!(player.is_muted());
//!
//! player.close_player();
//! assert_eq!(player.state(), PlaybackState::Empty);
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use amuzz_playback::{AudioOutput, LoadId, Result};
//! use std::time::Duration;
//!
//! struct MyOutput;
//!
//! impl AudioOutput for MyOutput {
//!     fn load(&mut self, url: &str, load_id: LoadId) -> Result<()> {
//!         // Start fetching `url`; report metadata later with `load_id`
//!         Ok(())
//!     }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn unload(&mut self) {}
//!     fn seek(&mut self, _position: Duration) -> Result<()> { Ok(()) }
//!     fn set_gain(&mut self, _gain: f32) {}
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller;
pub mod error;
pub mod events;
pub mod output;
pub mod queue;
pub mod types;
pub mod volume;

// Re-exports
pub use controller::PlayerController;
pub use error::{PlaybackError, Result};
pub use events::{PlaybackStateEvent, PlayerEvent};
pub use output::{AudioOutput, NullOutput};
pub use queue::PlaybackQueue;
pub use types::{LoadId, PlaybackState, PlayerConfig, PlayerSnapshot, SeekTarget};
pub use volume::Volume;
