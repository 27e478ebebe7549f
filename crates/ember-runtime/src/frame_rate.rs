//! Rolling frames-per-window measurement

/// Length of the frame-rate sampling window in seconds
pub const FRAME_RATE_WINDOW: f64 = 1.0;

/// Counts frames and publishes how many were rendered in the last full window.
#[derive(Debug, Clone)]
pub struct FrameRateCounter {
    /// Frames counted in the current window
    frame_count: u32,
    /// Frames counted in the last completed window
    frame_rate: u32,
    /// Game time at which the current window started
    last_sample: f64,
    /// Window length in seconds
    window: f64,
    total_frames: u64,
}

impl Default for FrameRateCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRateCounter {
    pub fn new() -> Self {
        Self::with_window(FRAME_RATE_WINDOW)
    }

    pub fn with_window(window: f64) -> Self {
        Self {
            frame_count: 0,
            frame_rate: 0,
            last_sample: 0.0,
            window,
            total_frames: 0,
        }
    }

    /// Count one frame at game time `now` and return `now`.
    ///
    /// Once a full window has elapsed since the last sample, the count is
    /// published as the frame rate and a new window starts.
    pub fn tick(&mut self, now: f64) -> f64 {
        self.frame_count += 1;
        self.total_frames += 1;
        if now - self.last_sample >= self.window {
            self.frame_rate = self.frame_count;
            self.frame_count = 0;
            self.last_sample = now;
        }
        now
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Frames counted so far in the current window
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    /// Forget all counts and restart the window at `now`.
    pub fn reset(&mut self, now: f64) {
        self.frame_count = 0;
        self.frame_rate = 0;
        self.total_frames = 0;
        self.last_sample = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_until_window_elapses() {
        let mut counter = FrameRateCounter::new();
        for i in 1..=59 {
            counter.tick(i as f64 / 60.0);
        }
        assert_eq!(counter.frame_rate(), 0);
        assert_eq!(counter.frame_count(), 59);

        counter.tick(1.0);
        assert_eq!(counter.frame_rate(), 60);
        assert_eq!(counter.frame_count(), 0);
    }

    #[test]
    fn window_restarts_from_sample_time() {
        let mut counter = FrameRateCounter::new();
        counter.tick(1.0);
        assert_eq!(counter.frame_rate(), 1);

        for i in 1..=30 {
            counter.tick(1.0 + i as f64 / 30.0);
        }
        assert_eq!(counter.frame_rate(), 30);
    }

    #[test]
    fn tick_returns_sample_time() {
        let mut counter = FrameRateCounter::new();
        assert_eq!(counter.tick(0.25), 0.25);
    }

    #[test]
    fn total_frames_survive_window_resets() {
        let mut counter = FrameRateCounter::with_window(0.5);
        for i in 0..10 {
            counter.tick(i as f64 * 0.1);
        }
        assert_eq!(counter.total_frames(), 10);

        counter.reset(2.0);
        assert_eq!(counter.total_frames(), 0);
        assert_eq!(counter.frame_rate(), 0);
    }
}
