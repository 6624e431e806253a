//! Coordinate and geometry types shared across the engine.
//!
//! Two spaces are in use:
//! - screen: pixels, origin top-left, +Y down (what input devices report)
//! - world: document units, +Y up (what the scene graph stores)
//!
//! `camera::Camera` converts between them.

mod rect;
mod rot_rect;
mod transform;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use rot_rect::RotRect;
pub use transform::Transform;
pub use vec2::Vec2;
pub use viewport::Viewport;
