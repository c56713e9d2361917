use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;
pub const MAX_FRAME_DT: f64 = 0.25;

/// Per-frame wall clock. `dt` is capped so a stall (window drag, debugger)
/// does not fling the camera across the level.
pub struct FrameClock {
    pub dt: f64,
    pub frame_count: u64,
    pub total_time: f64,
    last_instant: Instant,

    samples: [f64; FPS_SAMPLE_COUNT],
    sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            dt: 0.0,
            frame_count: 0,
            total_time: 0.0,
            last_instant: Instant::now(),
            samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed)
    }

    /// Feed an explicit frame delta. Returns the capped value.
    pub fn advance(&mut self, elapsed: f64) -> f64 {
        let mut dt = elapsed.max(0.0);
        if dt > MAX_FRAME_DT {
            log::debug!(
                "Frame took {:.1}ms, capping to {}ms",
                dt * 1000.0,
                MAX_FRAME_DT * 1000.0
            );
            dt = MAX_FRAME_DT;
        }
        self.dt = dt;
        self.total_time += dt;
        self.frame_count += 1;

        self.samples[self.sample_index] = dt;
        self.sample_index = (self.sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
