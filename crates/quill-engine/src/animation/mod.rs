//! Time-driven animations.
//!
//! Animations are advanced once per frame with the frame's draw time and
//! report when they are done. They mutate transient visual state only
//! (overlay opacity and the like); nothing in the scene graph is animated.

mod sequential;
mod timed;
mod value;

pub use sequential::SequentialAnimation;
pub use timed::{Easing, TimedAnimation};
pub use value::AnimatedValue;

use crate::time::FrameTimeS;

/// A unit of time-driven work.
pub trait Animation {
    /// Advances the animation to time `t`.
    fn update(&mut self, t: FrameTimeS);

    fn has_finished(&self) -> bool;
}
