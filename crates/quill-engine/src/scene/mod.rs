//! Scene types.
//!
//! Responsibilities:
//! - own the drawable elements ([`SceneGraph`], addressed by [`ElementId`])
//! - store renderer-agnostic draw commands
//! - provide deterministic ordering (z-index + insertion order)

mod cmd;
mod element_renderer;
mod graph;
mod list;
mod z_index;

pub use cmd::{DrawCmd, MeshCmd};
pub use element_renderer::ElementRenderer;
pub use graph::{Element, ElementId, SceneGraph};
pub use list::{DrawItem, DrawList, DrawTarget};
pub use z_index::{SortKey, ZIndex};
