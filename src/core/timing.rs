//=========================================================================
// Frame Timing
//=========================================================================
//
// Frame clock and FPS counter used by the loop driver.
//
// FrameClock:  wall-clock delta per iteration, clamped to MAX_FRAME_DELTA
// FpsCounter:  frames painted per one-second period
//
// Both take the current instant as an argument so the loop decides when
// time is sampled. The clock's time source is injectable for tests.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

/// Largest step handed to the simulation, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Length of one FPS measuring period.
pub const FPS_PERIOD: Duration = Duration::from_secs(1);

//=== FrameClock ==========================================================

/// Tracks process start and the previous tick.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: fn() -> Instant,
    start: Instant,
    last: Instant,
}

impl FrameClock {
    /// Clock reading the system's monotonic time.
    pub fn new() -> Self {
        Self::with_source(Instant::now)
    }

    /// Clock reading time from `source`.
    pub fn with_source(source: fn() -> Instant) -> Self {
        let now = source();
        Self {
            source,
            start: now,
            last: now,
        }
    }

    /// Samples the time source.
    pub fn now(&self) -> Instant {
        (self.source)()
    }

    /// Restarts the clock: process time and the previous tick become now.
    pub fn restart(&mut self) {
        let now = self.now();
        self.start = now;
        self.last = now;
    }

    /// Makes `now` the previous tick, so the next delta starts here.
    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }

    /// Returns the clamped delta since the previous tick and advances.
    ///
    /// A time source that did not move (or moved backwards) yields zero;
    /// callers skip the iteration in that case.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        delta.min(MAX_FRAME_DELTA)
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

//=== FpsCounter ==========================================================

/// Counts painted frames and publishes a reading once per period.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    period_start: Instant,
    painted: u32,
    skipped: u32,
    fps: u32,
    ms: f32,
    idle: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            period_start: now,
            painted: 0,
            skipped: 0,
            fps: 0,
            ms: 0.0,
            idle: 0,
        }
    }

    /// Records one iteration. Returns `true` when a period completed and
    /// a new reading is available.
    pub fn update(&mut self, painted: bool, now: Instant) -> bool {
        if painted {
            self.painted += 1;
        } else {
            self.skipped += 1;
        }

        let period = now.saturating_duration_since(self.period_start);
        if period < FPS_PERIOD {
            return false;
        }

        let seconds = period.as_secs_f32();
        self.fps = (self.painted as f32 / seconds).round() as u32;
        self.ms = if self.painted > 0 {
            seconds * 1000.0 / self.painted as f32
        } else {
            0.0
        };

        self.idle = self.skipped;
        self.period_start = now;
        self.painted = 0;
        self.skipped = 0;
        true
    }

    /// Frames painted per second over the last completed period.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Milliseconds per painted frame over the last completed period.
    pub fn ms(&self) -> f32 {
        self.ms
    }

    /// Iterations that skipped painting during the last completed period.
    pub fn idle(&self) -> u32 {
        self.idle
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
