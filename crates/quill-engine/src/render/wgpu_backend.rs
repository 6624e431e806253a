use std::collections::HashMap;

use anyhow::Result;
use wgpu::util::DeviceExt;

use crate::geometry::Mesh;

use super::resources::{MeshBackend, MeshKey};

/// GPU buffers for one uploaded mesh.
#[derive(Debug)]
pub struct GpuMesh {
    pub vbo: wgpu::Buffer,
    pub ibo: wgpu::Buffer,
    pub index_count: u32,
}

/// Mesh backend that creates wgpu vertex/index buffers.
///
/// Buffers are recreated on every upload; uploads only happen for meshes
/// whose geometry changed.
#[derive(Debug)]
pub struct WgpuMeshBackend {
    device: wgpu::Device,
    meshes: HashMap<MeshKey, GpuMesh>,
}

impl WgpuMeshBackend {
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            device,
            meshes: HashMap::new(),
        }
    }

    pub fn get(&self, key: MeshKey) -> Option<&GpuMesh> {
        self.meshes.get(&key)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl MeshBackend for WgpuMeshBackend {
    fn upload(&mut self, key: MeshKey, mesh: &Mesh) -> Result<()> {
        anyhow::ensure!(!mesh.vertices.is_empty(), "refusing to upload an empty mesh");

        let vbo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quill mesh vbo"),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quill mesh ibo"),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        if let Some(old) = self.meshes.insert(
            key,
            GpuMesh {
                vbo,
                ibo,
                index_count: mesh.indices.len() as u32,
            },
        ) {
            old.vbo.destroy();
            old.ibo.destroy();
        }
        Ok(())
    }

    fn release(&mut self, key: MeshKey) {
        if let Some(old) = self.meshes.remove(&key) {
            old.vbo.destroy();
            old.ibo.destroy();
        }
    }
}
