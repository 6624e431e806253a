//! Time subsystem.
//!
//! All engine times are `f64` seconds:
//! - `WallTimeS` comes from a [`WallClock`] (monotonic, arbitrary epoch)
//! - `FrameTimeS` is the wall time sampled once per frame by [`FrameClock`]
//! - `InputTimeS` is the device timestamp carried by input samples
//!
//! Components take a shared `Rc<dyn WallClock>` so tests can substitute a
//! [`FakeClock`].

mod frame_clock;
mod timer;
mod wall_clock;

pub use frame_clock::{FrameClock, FrameTime};
pub use timer::Timer;
pub use wall_clock::{FakeClock, SystemClock, WallClock};

pub type WallTimeS = f64;
pub type FrameTimeS = f64;
pub type InputTimeS = f64;
pub type DurationS = f64;
