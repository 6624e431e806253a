use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;

/// Mesh vertex as uploaded to the GPU.
///
/// `color` is linear premultiplied RGBA; `aux` carries texture coordinates
/// or per-shader extras (stroke-relative coordinates for ribbons).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
    pub aux: [f32; 2],
}

impl Vertex {
    #[inline]
    pub fn new(pos: Vec2, color: Color) -> Self {
        Self {
            pos: [pos.x, pos.y],
            color: color.to_array(),
            aux: [0.0, 0.0],
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.pos[0], self.pos[1])
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.color = color.to_array();
    }

    /// Alpha channel of the vertex color.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.color[3]
    }
}
