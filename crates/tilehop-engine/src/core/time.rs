/// Game logic rate. Every per-frame constant (speeds, timers) assumes it.
pub const FRAME_RATE: f32 = 60.0;

/// Fixed timestep accumulator.
/// Turns variable host frame times into a whole number of 60 Hz game frames.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    /// One step per frame at [`FRAME_RATE`].
    pub fn per_frame() -> Self {
        Self::new(1.0 / FRAME_RATE)
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        // A stalled tab would otherwise replay seconds of game time at once.
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Drop any partial frame, e.g. after a pause.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}
