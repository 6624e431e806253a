//! CPU-side geometry: vertices, indexed meshes, and overlay shapes.

mod mesh;
mod shape;
mod vertex;

pub use mesh::{Mesh, ShaderType};
pub use shape::Shape;
pub use vertex::Vertex;
