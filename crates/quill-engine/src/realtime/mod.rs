//! Real-time stroke and manipulation pipeline.
//!
//! - `modifiers`: per-vertex styling for strokes in progress
//! - `line_builder`: turns input samples into ribbon meshes
//! - `manipulation`: selection handles and their overlay renderers

pub mod line_builder;
pub mod manipulation;
pub mod modifiers;

pub use line_builder::StrokeBuilder;
pub use manipulation::{ElementManipulationToolHandle, ManipulationToolRenderer};
pub use modifiers::{LineModParams, LineModifier, LineModifierKind};
