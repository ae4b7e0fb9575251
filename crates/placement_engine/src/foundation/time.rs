//! Frame timing driven by host refresh timestamps

/// Longest step a single tick may integrate, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Frame clock for the cooperative refresh loop
///
/// The host passes the display refresh timestamp on every tick; the clock
/// derives the delta time from consecutive timestamps. The first tick has a
/// delta of zero, and long pauses (backgrounded app, debugger) are clamped to
/// `max_delta` so a resumed session does not teleport objects.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    start_timestamp: Option<f64>,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}

impl FrameClock {
    /// Create a new clock with the given delta clamp
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_timestamp: None,
            start_timestamp: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: max_delta.max(0.0),
        }
    }

    /// Advance the clock to `timestamp` (seconds)
    ///
    /// Returns the delta time for this frame, or `None` when the timestamp
    /// is not a finite number. Timestamps that go backwards yield a zero
    /// delta.
    pub fn advance(&mut self, timestamp: f64) -> Option<f32> {
        if !timestamp.is_finite() {
            return None;
        }

        let delta = match self.last_timestamp {
            Some(last) => ((timestamp - last).max(0.0) as f32).min(self.max_delta),
            None => {
                self.start_timestamp = Some(timestamp);
                0.0
            }
        };

        self.last_timestamp = Some(timestamp);
        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
        Some(delta)
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Accumulated simulated time (sum of clamped deltas)
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Wall-clock seconds since the first tick
    pub fn elapsed_since_start(&self) -> f64 {
        match (self.start_timestamp, self.last_timestamp) {
            (Some(start), Some(last)) => last - start,
            _ => 0.0,
        }
    }
}
