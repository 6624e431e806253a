use crate::time::{DurationS, FrameTimeS};

use super::Animation;

/// Progress curve applied before the value reaches the apply closure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Cubic smoothstep: zero slope at both ends.
    SmoothStep,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Animation over a fixed duration starting at its first update.
///
/// Every update hands the eased progress in [0, 1] to the apply closure.
/// Progress 1.0 is always applied exactly once, on the update that reaches
/// the end, after which the animation reports finished.
pub struct TimedAnimation {
    duration: DurationS,
    easing: Easing,
    start: Option<FrameTimeS>,
    finished: bool,
    apply: Box<dyn FnMut(f32)>,
}

impl TimedAnimation {
    pub fn new(duration: DurationS, easing: Easing, apply: impl FnMut(f32) + 'static) -> Self {
        Self {
            duration: duration.max(0.0),
            easing,
            start: None,
            finished: false,
            apply: Box::new(apply),
        }
    }

    pub fn duration(&self) -> DurationS {
        self.duration
    }
}

impl Animation for TimedAnimation {
    fn update(&mut self, t: FrameTimeS) {
        if self.finished {
            return;
        }
        let start = *self.start.get_or_insert(t);
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            ((t - start) / self.duration).clamp(0.0, 1.0)
        };
        (self.apply)(self.easing.apply(progress as f32));
        self.finished = progress >= 1.0;
    }

    fn has_finished(&self) -> bool {
        self.finished
    }
}

impl std::fmt::Debug for TimedAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedAnimation")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("start", &self.start)
            .field("finished", &self.finished)
            .finish()
    }
}
