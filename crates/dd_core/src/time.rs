//! Variable-step frame clock.
//!
//! Gameplay integrates with the measured wall-clock delta of each frame, so a
//! slow frame moves everything further instead of running extra steps. The
//! delta is capped so a long stall (window drag, debugger break) cannot launch
//! the player through the floor. `next_deadline` paces redraws to `target_fps`.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub max_frame_dt: f64,
    pub target_frame_time: Option<f64>,
    pub total_time: f64,
    pub frame_count: u64,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(Instant::now(), target_fps)
    }

    pub fn starting_at(now: Instant, target_fps: u32) -> Self {
        let target_frame_time = (target_fps > 0).then(|| 1.0 / target_fps as f64);
        let nominal_dt = target_frame_time.unwrap_or(1.0 / 60.0);
        Self {
            max_frame_dt: 0.25,
            target_frame_time,
            total_time: 0.0,
            frame_count: 0,
            real_dt: 0.0,
            last_instant: now,
            fps_samples: [nominal_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / nominal_dt,
            smoothed_frame_time_ms: nominal_dt * 1000.0,
        }
    }

    /// Measure the delta since the previous frame and return it in seconds.
    pub fn begin_frame(&mut self) -> f32 {
        self.begin_frame_at(Instant::now())
    }

    pub fn begin_frame_at(&mut self, now: Instant) -> f32 {
        self.real_dt = now.saturating_duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.real_dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping delta to {}ms",
                self.real_dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            self.real_dt = self.max_frame_dt;
        }

        self.total_time += self.real_dt;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        self.real_dt as f32
    }

    /// Earliest instant the next frame should start, or `None` when uncapped.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.target_frame_time
            .map(|t| self.last_instant + Duration::from_secs_f64(t))
    }
}
