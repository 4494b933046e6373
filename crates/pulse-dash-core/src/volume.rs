//! Volume slider state.

pub const DEFAULT_VOLUME_PCT: u8 = 100;

/// Integer percent slider with its `"{n}%"` readout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeControl {
    percent: u8,
    readout: String,
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME_PCT as i32)
    }
}

impl VolumeControl {
    pub fn new(percent: i32) -> Self {
        let mut control = Self {
            percent: 0,
            readout: String::new(),
        };
        control.input(percent);
        control
    }

    /// Applies slider input, clamped to 0-100. Returns the player gain.
    pub fn input(&mut self, percent: i32) -> f32 {
        self.percent = percent.clamp(0, 100) as u8;
        self.readout = format!("{}%", self.percent);
        self.gain()
    }

    /// Moves the slider by `delta` percent
    pub fn nudge(&mut self, delta: i32) -> f32 {
        self.input(self.percent as i32 + delta)
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn readout(&self) -> &str {
        &self.readout
    }

    /// Gain in 0.0-1.0
    pub fn gain(&self) -> f32 {
        self.percent as f32 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_updates_readout() {
        let mut volume = VolumeControl::default();
        assert_eq!(volume.readout(), "100%");

        assert_eq!(volume.input(40), 0.4);
        assert_eq!(volume.percent(), 40);
        assert_eq!(volume.readout(), "40%");
    }

    #[test]
    fn test_input_is_clamped() {
        let mut volume = VolumeControl::new(250);
        assert_eq!(volume.percent(), 100);
        volume.input(-3);
        assert_eq!(volume.readout(), "0%");
        assert_eq!(volume.gain(), 0.0);
    }

    #[test]
    fn test_nudge() {
        let mut volume = VolumeControl::new(98);
        volume.nudge(5);
        assert_eq!(volume.percent(), 100);
        volume.nudge(-5);
        volume.nudge(-5);
        assert_eq!(volume.readout(), "90%");
    }
}
