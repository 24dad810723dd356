//! Debug and statistics module

use std::collections::VecDeque;
use std::time::Duration;

use crate::ai::{ConeFan, Guard};
use crate::ecs::{Name, World};

/// Tracks how long simulation steps take on the wall clock
#[derive(Debug)]
pub struct FrameStats {
    /// Step time history for averaging
    step_times: VecDeque<Duration>,
    /// Maximum samples to keep
    max_samples: usize,
    avg_step_time_ms: f32,
    min_step_time_ms: f32,
    max_step_time_ms: f32,
    /// Total steps recorded
    total_frames: u64,
}

impl FrameStats {
    const DEFAULT_SAMPLES: usize = 120;

    pub fn new() -> Self {
        Self::with_samples(Self::DEFAULT_SAMPLES)
    }

    /// Keep at most `max_samples` step times in the rolling window
    pub fn with_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            step_times: VecDeque::with_capacity(max_samples),
            max_samples,
            avg_step_time_ms: 0.0,
            min_step_time_ms: 0.0,
            max_step_time_ms: 0.0,
            total_frames: 0,
        }
    }

    /// Record how long one step took
    pub fn record_frame(&mut self, elapsed: Duration) {
        self.total_frames += 1;

        if self.step_times.len() >= self.max_samples {
            self.step_times.pop_front();
        }
        self.step_times.push_back(elapsed);

        self.update_stats();
    }

    fn update_stats(&mut self) {
        if self.step_times.is_empty() {
            return;
        }

        let mut total = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;

        for &dt in &self.step_times {
            total += dt;
            min = min.min(dt);
            max = max.max(dt);
        }

        let count = self.step_times.len() as f32;
        self.avg_step_time_ms = total.as_secs_f32() / count * 1000.0;
        self.min_step_time_ms = min.as_secs_f32() * 1000.0;
        self.max_step_time_ms = max.as_secs_f32() * 1000.0;
    }

    /// Steps per second the simulation could sustain at the average step time
    pub fn steps_per_second(&self) -> f32 {
        if self.avg_step_time_ms > 0.0 {
            1000.0 / self.avg_step_time_ms
        } else {
            0.0
        }
    }

    pub fn avg_step_time_ms(&self) -> f32 {
        self.avg_step_time_ms
    }

    pub fn min_step_time_ms(&self) -> f32 {
        self.min_step_time_ms
    }

    pub fn max_step_time_ms(&self) -> f32 {
        self.max_step_time_ms
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Get a formatted stats string
    pub fn format_stats(&self) -> String {
        format!(
            "Step: {:.3}ms (min: {:.3}, max: {:.3}) | Frames: {}",
            self.avg_step_time_ms, self.min_step_time_ms, self.max_step_time_ms, self.total_frames
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Debug overlay state
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Draw guard vision cones
    pub show_cones: bool,
    /// Step timing statistics
    pub frame_stats: FrameStats,
    /// Custom debug lines
    custom_lines: Vec<String>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the cone overlay
    pub fn toggle_cones(&mut self) {
        self.show_cones = !self.show_cones;
    }

    /// Add a custom debug line
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.custom_lines.push(line.into());
    }

    /// Clear custom lines
    pub fn clear_lines(&mut self) {
        self.custom_lines.clear();
    }

    /// Stats line, then one line per guard, then custom lines
    pub fn all_lines(&self, world: &World) -> Vec<String> {
        let mut lines = vec![self.frame_stats.format_stats()];
        lines.extend(guard_lines(world));
        lines.extend(self.custom_lines.iter().cloned());
        lines
    }

    /// Vision cones to draw this frame, empty while the overlay is off
    pub fn cone_fans(&self, world: &World) -> Vec<ConeFan> {
        if !self.show_cones {
            return Vec::new();
        }
        world
            .inner
            .query::<&Guard>()
            .iter()
            .map(|(_, guard)| guard.cone_fan())
            .collect()
    }

    /// Record how long a step took
    pub fn record_frame(&mut self, elapsed: Duration) {
        self.frame_stats.record_frame(elapsed);
    }
}

fn guard_lines(world: &World) -> Vec<String> {
    let mut lines: Vec<String> = world
        .inner
        .query::<(&Name, &Guard)>()
        .iter()
        .map(|(_, (name, guard))| {
            let position = guard.position();
            format!(
                "{}: {} at ({:.1}, {:.1})",
                name.0,
                guard.state(),
                position.x,
                position.y
            )
        })
        .collect();
    lines.sort();
    lines
}
