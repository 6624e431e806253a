use crate::coords::{Rect, Transform, Vec2};
use crate::paint::Color;

use super::Vertex;

/// Shader a mesh is drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ShaderType {
    /// Uses the per-vertex premultiplied color.
    #[default]
    ColoredVertShader,
    /// Ignores vertex colors; draws with a uniform color.
    SingleColorShader,
    /// Samples a texture through `Vertex::aux`.
    TexturedVertShader,
}

/// Indexed triangle mesh.
///
/// Vertex positions are in object space; `object_matrix` maps them into world
/// space. Indices are `u16`, so a mesh holds at most [`Mesh::MAX_VERTICES`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub object_matrix: Transform,
    pub shader_type: ShaderType,
}

impl Mesh {
    pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

    pub fn new(shader_type: ShaderType) -> Self {
        Self {
            shader_type,
            ..Default::default()
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when `extra` more vertices would not fit the index type.
    #[inline]
    pub fn is_full(&self, extra: usize) -> bool {
        self.vertices.len() + extra > Self::MAX_VERTICES
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex, returning its index.
    pub fn push_vertex(&mut self, v: Vertex) -> u16 {
        debug_assert!(!self.is_full(1), "mesh exceeds u16 index range");
        let idx = self.vertices.len() as u16;
        self.vertices.push(v);
        idx
    }

    pub fn push_triangle(&mut self, a: u16, b: u16, c: u16) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends a filled quad given counter-clockwise corners.
    pub fn push_quad(&mut self, corners: [Vec2; 4], color: Color) {
        let base = self.vertices.len() as u16;
        for p in corners {
            self.push_vertex(Vertex::new(p, color));
        }
        self.push_triangle(base, base + 1, base + 2);
        self.push_triangle(base, base + 2, base + 3);
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Bounds of the vertices in object space.
    pub fn local_mbr(&self) -> Option<Rect> {
        Rect::bounding(self.vertices.iter().map(Vertex::position))
    }

    /// Bounds of the vertices after `object_matrix`.
    pub fn world_mbr(&self) -> Option<Rect> {
        let m = self.object_matrix;
        Rect::bounding(self.vertices.iter().map(|v| m.apply(v.position())))
    }
}
