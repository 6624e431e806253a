use std::rc::Rc;

use super::{DurationS, FrameTimeS, WallClock};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds (clamped).
    pub dt: DurationS,

    /// Wall time sampled at the tick. Passed to `update`/`draw` as the draw time.
    pub now: FrameTimeS,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Turns wall-clock samples into per-frame `FrameTime`s for the engine loop.
///
/// `dt` stays within `[dt_min, dt_max]`: a stalled host (debugger, suspended
/// app) resumes with one bounded step.
#[derive(Clone)]
pub struct FrameClock {
    clock: Rc<dyn WallClock>,
    last: FrameTimeS,
    frame_index: u64,
    dt_min: DurationS,
    dt_max: DurationS,
}

impl FrameClock {
    /// `dt` clamped to [0.1 ms, 250 ms].
    pub fn new(clock: Rc<dyn WallClock>) -> Self {
        Self::with_clamps(clock, 0.0001, 0.25)
    }

    pub fn with_clamps(clock: Rc<dyn WallClock>, dt_min: DurationS, dt_max: DurationS) -> Self {
        debug_assert!(dt_min <= dt_max);
        let last = clock.now();
        Self {
            clock,
            last,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Re-samples the baseline so the next `dt` starts from now.
    pub fn reset(&mut self) {
        self.last = self.clock.now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.clock.now();
        let dt = (now - self.last).clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("last", &self.last)
            .field("frame_index", &self.frame_index)
            .finish()
    }
}
