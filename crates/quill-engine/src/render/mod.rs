//! Mesh resource management.
//!
//! Renderers and the scene graph own CPU meshes and push them into a
//! [`MeshStore`] when they change. The store forwards to a [`MeshBackend`]:
//! - [`MemoryMeshBackend`] keeps byte copies (headless runs, tests)
//! - [`WgpuMeshBackend`] creates vertex/index buffers on a wgpu device
//!
//! Draw commands reference meshes by [`MeshKey`] only, so recording a frame
//! never touches the GPU.

mod gpu;
mod resources;
mod wgpu_backend;

pub use gpu::{Gpu, GpuInit};
pub use resources::{MemoryMeshBackend, MeshBackend, MeshKey, MeshResources, MeshStore, StoredMesh};
pub use wgpu_backend::{GpuMesh, WgpuMeshBackend};
