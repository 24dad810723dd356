//! Simulation clock

use std::time::Duration;

/// Fixed-step simulation time
///
/// The engine advances the clock by a fixed delta per frame, so a run is
/// reproducible regardless of how long each frame took on the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one frame of length `delta`
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Length of the last frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Length of the last frame in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Simulated time since start
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Frames advanced since start
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Back to frame zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_advance() {
        let mut time = Time::new();
        assert_eq!(time.frame_count(), 0);
        assert_eq!(time.delta_seconds(), 0.0);

        time.advance(Duration::from_millis(250));
        time.advance(Duration::from_millis(250));

        assert_eq!(time.frame_count(), 2);
        assert_eq!(time.delta_seconds(), 0.25);
        assert_eq!(time.elapsed_seconds(), 0.5);
    }

    #[test]
    fn test_time_reset() {
        let mut time = Time::new();
        time.advance(Duration::from_secs(1));
        time.reset();
        assert_eq!(time.frame_count(), 0);
        assert_eq!(time.elapsed_seconds(), 0.0);
    }
}
