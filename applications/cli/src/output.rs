//! Headless audio output
//!
//! The terminal has no audio element, so the CLI drives the player against an
//! output that only traces what it was asked to do.

use amuzz_playback::{AudioOutput, LoadId};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct LoggingOutput {
    bound: Option<(LoadId, String)>,
    gain: f32,
}

impl LoggingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL of the bound resource, if any
    pub fn bound_url(&self) -> Option<&str> {
        self.bound.as_ref().map(|(_, url)| url.as_str())
    }
}

impl AudioOutput for LoggingOutput {
    fn load(&mut self, url: &str, load_id: LoadId) -> amuzz_playback::Result<()> {
        info!(%load_id, url, "Binding audio");
        self.bound = Some((load_id, url.to_string()));
        Ok(())
    }

    fn play(&mut self) -> amuzz_playback::Result<()> {
        if let Some((load_id, _)) = &self.bound {
            info!(%load_id, gain = self.gain, "Play");
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some((load_id, _)) = &self.bound {
            info!(%load_id, "Pause");
        }
    }

    fn unload(&mut self) {
        if let Some((load_id, _)) = self.bound.take() {
            debug!(%load_id, "Released audio");
        }
    }

    fn seek(&mut self, position: Duration) -> amuzz_playback::Result<()> {
        debug!(position_ms = position.as_millis() as u64, "Seek");
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }
}
