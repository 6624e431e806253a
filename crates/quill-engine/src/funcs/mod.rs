//! Scalar and vector interpolation helpers.
//!
//! Used by line modifiers (pressure curves), animations (progress easing), and
//! the input synthesizer (time/position lerps).

mod lerp;
mod piecewise;

pub use lerp::{inv_lerp, lerp, normalize, Lerp};
pub use piecewise::PiecewiseInterpolator;
