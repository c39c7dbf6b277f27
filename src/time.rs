//! Frame timing for the host loop.
//!
//! The engine runs on whatever `dt` it is handed; this timer turns wall-clock
//! frames into those deltas. A long stall (window dragged, tab hidden,
//! debugger break) is clamped to [`MAX_DELTA`] so the lattice never takes one
//! giant step.
//!
//! ```ignore
//! use spacetime_fabric::time::Time;
//!
//! let mut time = Time::new();
//! loop {
//!     let dt = time.tick();
//!     sim.on_frame(dt);
//! }
//! ```

use std::time::{Duration, Instant};

/// Largest delta, in seconds, a single frame may report.
pub const MAX_DELTA: f32 = 0.1;

/// Clamp a raw frame delta into `[0, MAX_DELTA]`. NaN becomes 0.
#[inline]
pub fn clamp_delta(dt: f32) -> f32 {
    if dt.is_nan() {
        0.0
    } else {
        dt.clamp(0.0, MAX_DELTA)
    }
}

/// Wall-clock frame timer.
#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    /// Sum of reported deltas; excludes paused spans and clamped-away time.
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
        }
    }

    /// Advance one frame and return its clamped delta in seconds.
    ///
    /// Returns 0 while paused.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.delta_secs = if self.paused { 0.0 } else { clamp_delta(raw) };
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        let since = now.duration_since(self.fps_update_time);
        if since >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Delta reported by the last [`tick`](Self::tick).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
