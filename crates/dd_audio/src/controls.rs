//! Device-independent music controls: pause flag and stepped volume.

/// Volume is stored in tenths so repeated steps never drift off the 0.1 grid.
const MIN_VOLUME_STEPS: u8 = 1;
const MAX_VOLUME_STEPS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicControls {
    paused: bool,
    volume_steps: u8,
}

impl MusicControls {
    /// `initial_volume` is snapped to the nearest 0.1 within `[0.1, 1.0]`.
    pub fn new(initial_volume: f32) -> Self {
        Self {
            paused: false,
            volume_steps: volume_to_steps(initial_volume),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn volume(&self) -> f32 {
        self.volume_steps as f32 / MAX_VOLUME_STEPS as f32
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn volume_up(&mut self) -> f32 {
        self.volume_steps = (self.volume_steps + 1).min(MAX_VOLUME_STEPS);
        self.volume()
    }

    pub fn volume_down(&mut self) -> f32 {
        self.volume_steps = self.volume_steps.saturating_sub(1).max(MIN_VOLUME_STEPS);
        self.volume()
    }
}

impl Default for MusicControls {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn volume_to_steps(volume: f32) -> u8 {
    let steps = (volume * MAX_VOLUME_STEPS as f32).round();
    if steps.is_nan() {
        return MAX_VOLUME_STEPS;
    }
    (steps as i32).clamp(MIN_VOLUME_STEPS as i32, MAX_VOLUME_STEPS as i32) as u8
}
