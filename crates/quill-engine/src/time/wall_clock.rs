use std::cell::Cell;
use std::time::Instant;

use super::{DurationS, WallTimeS};

/// Source of monotonic wall time.
pub trait WallClock {
    fn now(&self) -> WallTimeS;
}

/// Wall clock backed by `Instant`, measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> WallTimeS {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Manually driven clock for tests and deterministic playback.
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Cell<WallTimeS>,
}

impl FakeClock {
    pub fn new(start: WallTimeS) -> Self {
        Self { now: Cell::new(start) }
    }

    pub fn set(&self, t: WallTimeS) {
        debug_assert!(t >= self.now.get(), "FakeClock must not run backwards");
        self.now.set(t);
    }

    pub fn advance(&self, dt: DurationS) {
        self.set(self.now.get() + dt);
    }
}

impl WallClock for FakeClock {
    fn now(&self) -> WallTimeS {
        self.now.get()
    }
}
