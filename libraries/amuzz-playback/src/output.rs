//! Platform-agnostic audio output trait
//!
//! Abstracts the single audio element / device stream the player drives
//! (an HTML media element, a desktop stream, a test double).

use crate::error::Result;
use crate::types::LoadId;
use std::time::Duration;

/// The one audio resource the player owns
///
/// The controller is the only caller. It always calls [`unload`](Self::unload)
/// before binding a different track, so at most one resource is ever bound.
///
/// Completion of asynchronous work is reported back through the
/// controller's `on_*` callbacks, tagged with the [`LoadId`] passed to
/// [`load`](Self::load).
pub trait AudioOutput: Send {
    /// Bind an audio resource
    ///
    /// # Returns
    /// * `Ok(())` - Resource accepted; metadata arrives later via `on_metadata_loaded`
    /// * `Err(_)` - Resource rejected synchronously (bad URL, unsupported scheme)
    fn load(&mut self, url: &str, load_id: LoadId) -> Result<()>;

    /// Request playback of the bound resource
    ///
    /// May succeed immediately and still fail later (`on_play_failed`).
    fn play(&mut self) -> Result<()>;

    /// Pause the bound resource
    fn pause(&mut self);

    /// Release the bound resource and silence output
    fn unload(&mut self);

    /// Move the playback position of the bound resource
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Set the output multiplier (0.0 = silent, 1.0 = full volume)
    fn set_gain(&mut self, gain: f32);
}

/// Output that accepts everything and plays nothing
///
/// Useful for headless front ends and for driving the state machine from
/// scripted callbacks.
#[derive(Debug, Default)]
pub struct NullOutput {
    bound: Option<LoadId>,
}

impl NullOutput {
    /// Create a new null output
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding currently held, if any
    pub fn bound(&self) -> Option<LoadId> {
        self.bound
    }
}

impl AudioOutput for NullOutput {
    fn load(&mut self, _url: &str, load_id: LoadId) -> Result<()> {
        self.bound = Some(load_id);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn unload(&mut self) {
        self.bound = None;
    }

    fn seek(&mut self, _position: Duration) -> Result<()> {
        Ok(())
    }

    fn set_gain(&mut self, _gain: f32) {}
}
