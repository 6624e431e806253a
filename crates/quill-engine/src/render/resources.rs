use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};

use crate::geometry::Mesh;

/// Stable handle for a mesh living in GPU (or GPU-like) memory.
///
/// Keys are process-unique, so the scene graph and overlay renderers can
/// allocate them independently.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MeshKey(u64);

static NEXT_MESH_KEY: AtomicU64 = AtomicU64::new(1);

impl MeshKey {
    pub fn next() -> Self {
        MeshKey(NEXT_MESH_KEY.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Storage a mesh upload lands in.
pub trait MeshBackend {
    fn upload(&mut self, key: MeshKey, mesh: &Mesh) -> Result<()>;
    fn release(&mut self, key: MeshKey);
}

/// Object-safe view of mesh resources, handed to renderers during
/// synchronization.
pub trait MeshStore {
    /// Uploads (or replaces) the mesh stored under `key`.
    fn upload(&mut self, key: MeshKey, mesh: &Mesh) -> Result<()>;

    /// Frees the mesh stored under `key`. Unknown keys are ignored.
    fn release(&mut self, key: MeshKey);

    /// True once `key` has been uploaded and not released since.
    fn is_synchronized(&self, key: MeshKey) -> bool;
}

/// Tracks which meshes a backend holds and how often each was replaced.
#[derive(Debug)]
pub struct MeshResources<B: MeshBackend> {
    backend: B,
    generations: HashMap<MeshKey, u64>,
}

impl<B: MeshBackend> MeshResources<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            generations: HashMap::new(),
        }
    }

    pub fn allocate_key(&self) -> MeshKey {
        MeshKey::next()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Number of uploads done under `key` since it was last released.
    pub fn generation(&self, key: MeshKey) -> Option<u64> {
        self.generations.get(&key).copied()
    }

    /// Number of live meshes.
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }
}

impl<B: MeshBackend> MeshStore for MeshResources<B> {
    fn upload(&mut self, key: MeshKey, mesh: &Mesh) -> Result<()> {
        self.backend
            .upload(key, mesh)
            .with_context(|| format!("failed to upload mesh {}", key.raw()))?;
        *self.generations.entry(key).or_insert(0) += 1;
        Ok(())
    }

    fn release(&mut self, key: MeshKey) {
        if self.generations.remove(&key).is_some() {
            self.backend.release(key);
        }
    }

    fn is_synchronized(&self, key: MeshKey) -> bool {
        self.generations.contains_key(&key)
    }
}

/// Byte copy of an uploaded mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMesh {
    pub vertex_bytes: Vec<u8>,
    pub index_bytes: Vec<u8>,
    pub index_count: u32,
}

/// Backend that keeps uploads in memory. Used headless and in tests.
#[derive(Debug, Default)]
pub struct MemoryMeshBackend {
    meshes: HashMap<MeshKey, StoredMesh>,
    upload_count: u64,
}

impl MemoryMeshBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MeshKey) -> Option<&StoredMesh> {
        self.meshes.get(&key)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total uploads performed, including replacements.
    pub fn upload_count(&self) -> u64 {
        self.upload_count
    }

    /// Total vertex + index bytes currently held.
    pub fn resident_bytes(&self) -> usize {
        self.meshes
            .values()
            .map(|m| m.vertex_bytes.len() + m.index_bytes.len())
            .sum()
    }
}

impl MeshBackend for MemoryMeshBackend {
    fn upload(&mut self, key: MeshKey, mesh: &Mesh) -> Result<()> {
        anyhow::ensure!(
            mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()),
            "mesh index out of range ({} vertices)",
            mesh.vertices.len()
        );
        self.meshes.insert(
            key,
            StoredMesh {
                vertex_bytes: mesh.vertex_bytes().to_vec(),
                index_bytes: mesh.index_bytes().to_vec(),
                index_count: mesh.indices.len() as u32,
            },
        );
        self.upload_count += 1;
        Ok(())
    }

    fn release(&mut self, key: MeshKey) {
        self.meshes.remove(&key);
    }
}
