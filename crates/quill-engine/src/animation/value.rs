use std::cell::Cell;
use std::rc::Rc;

use crate::funcs::lerp;
use crate::time::DurationS;

use super::{Easing, TimedAnimation};

/// Scalar shared between an owner and the animations that drive it.
///
/// Clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct AnimatedValue(Rc<Cell<f32>>);

impl AnimatedValue {
    pub fn new(value: f32) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.0.set(value);
    }

    /// Builds an animation moving this value from `from` to `to`.
    pub fn animate_to(&self, from: f32, to: f32, duration: DurationS, easing: Easing) -> TimedAnimation {
        let target = self.clone();
        TimedAnimation::new(duration, easing, move |p| target.set(lerp(from, to, p)))
    }
}
