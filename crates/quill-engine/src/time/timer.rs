use std::rc::Rc;

use super::{DurationS, WallClock, WallTimeS};

/// Deadline timer over a [`WallClock`].
///
/// Used to bracket per-frame work (e.g. manipulation-tool updates) so slow
/// frames show up in the logs.
#[derive(Clone)]
pub struct Timer {
    clock: Rc<dyn WallClock>,
    start: WallTimeS,
    budget: DurationS,
}

impl Timer {
    pub fn new(clock: Rc<dyn WallClock>, budget: DurationS) -> Self {
        let start = clock.now();
        Self { clock, start, budget }
    }

    pub fn elapsed(&self) -> DurationS {
        self.clock.now() - self.start
    }

    pub fn budget(&self) -> DurationS {
        self.budget
    }

    pub fn expired(&self) -> bool {
        self.elapsed() > self.budget
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("start", &self.start)
            .field("budget", &self.budget)
            .finish()
    }
}
