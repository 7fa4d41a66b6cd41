//! Volume control
//!
//! One slider doubles as the mute control: dragging it to zero mutes,
//! dragging it up unmutes. Toggling mute keeps the slider level and
//! restores the last audible level on unmute.

/// Volume controller (linear 0.0 - 1.0, matching the media element's volume)
#[derive(Debug, Clone)]
pub struct Volume {
    /// Slider level (0.0 - 1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Last non-zero level, restored on unmute
    restore_level: f32,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (0.0 - 1.0, default: 1.0)
    pub fn new(level: f32) -> Self {
        let mut volume = Self {
            level: 1.0,
            muted: false,
            restore_level: 1.0,
        };
        volume.set_level(level);
        volume
    }

    /// Set slider level, clamped to 0.0 - 1.0.
    ///
    /// Zero mutes, anything above zero unmutes. NaN is ignored.
    pub fn set_level(&mut self, level: f32) {
        if level.is_nan() {
            return;
        }

        self.level = level.clamp(0.0, 1.0);
        if self.level > 0.0 {
            self.restore_level = self.level;
            self.muted = false;
        } else {
            self.muted = true;
        }
    }

    /// Get current slider level (0.0 - 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        if self.level > 0.0 {
            self.restore_level = self.level;
        }
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    ///
    /// If the slider sits at zero, it jumps back to the last audible level.
    pub fn unmute(&mut self) {
        self.muted = false;
        if self.level == 0.0 {
            self.level = self.restore_level;
        }
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Effective output multiplier
    ///
    /// Returns 0.0 if muted, otherwise the slider level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(0.5);

        vol.set_level(1.5);
        assert_eq!(vol.level(), 1.0);

        vol.set_level(-0.2);
        assert_eq!(vol.level(), 0.0);
        assert!(vol.is_muted());
    }

    #[test]
    fn zero_level_mutes_and_positive_unmutes() {
        let mut vol = Volume::new(0.6);
        vol.set_level(0.0);
        assert!(vol.is_muted());
        assert_eq!(vol.gain(), 0.0);

        vol.set_level(0.3);
        assert!(!vol.is_muted());
        assert_eq!(vol.gain(), 0.3);
    }

    #[test]
    fn toggle_mute_keeps_level() {
        let mut vol = Volume::new(0.7);

        vol.toggle_mute();
        assert!(vol.is_muted());
        assert_eq!(vol.gain(), 0.0);
        assert_eq!(vol.level(), 0.7);

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.gain(), 0.7);
    }

    #[test]
    fn unmute_from_zero_restores_last_audible_level() {
        let mut vol = Volume::new(0.4);
        vol.set_level(0.0);
        assert!(vol.is_muted());

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 0.4);
        assert_eq!(vol.gain(), 0.4);
    }

    #[test]
    fn nan_is_ignored() {
        let mut vol = Volume::new(0.5);
        vol.set_level(f32::NAN);
        assert_eq!(vol.level(), 0.5);
    }

    #[test]
    fn zero_initial_volume_starts_muted() {
        let mut vol = Volume::new(0.0);
        assert!(vol.is_muted());

        // Nothing audible was ever set, unmute falls back to full volume
        vol.unmute();
        assert_eq!(vol.gain(), 1.0);
    }
}
