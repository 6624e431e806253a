//! Paint model shared between modifiers, shapes, and renderers.
//!
//! Colors are linear premultiplied alpha throughout.

pub mod color;

pub use color::Color;
