use crate::coords::{RotRect, Vec2};
use crate::paint::Color;

use super::{Mesh, ShaderType, Vertex};

/// Simple overlay geometry (fills, borders, bars) with visibility and upload
/// tracking.
///
/// Geometry setters rebuild the mesh and only mark the shape dirty when the
/// result differs from what is already held, so recomputing a placement
/// with unchanged inputs is free.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    mesh: Mesh,
    visible: bool,
    dirty: bool,
}

impl Default for Shape {
    fn default() -> Self {
        Self::new()
    }
}

impl Shape {
    pub fn new() -> Self {
        Self {
            mesh: Mesh::new(ShaderType::ColoredVertShader),
            visible: true,
            dirty: true,
        }
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// True when the mesh changed since the last [`Shape::mark_clean`].
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Forces the next synchronize to upload, e.g. after the mesh was freed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Fills `rect`.
    pub fn set_fill(&mut self, rect: RotRect, color: Color) {
        let mut mesh = Mesh::new(ShaderType::ColoredVertShader);
        mesh.push_quad(rect.corners(), color);
        self.replace_mesh(mesh);
    }

    /// Draws a border of `width` centered on the edges of `rect`.
    pub fn set_border(&mut self, rect: RotRect, width: f32, color: Color) {
        let half = width.max(0.0) / 2.0;
        let outer = RotRect::new(rect.center, rect.dims + Vec2::new(2.0 * half, 2.0 * half), rect.rotation);
        let inner_dims = Vec2::new((rect.dims.x - 2.0 * half).max(0.0), (rect.dims.y - 2.0 * half).max(0.0));
        let inner = RotRect::new(rect.center, inner_dims, rect.rotation);

        let mut mesh = Mesh::new(ShaderType::ColoredVertShader);
        let o: Vec<u16> = outer
            .corners()
            .into_iter()
            .map(|p| mesh.push_vertex(Vertex::new(p, color)))
            .collect();
        let i: Vec<u16> = inner
            .corners()
            .into_iter()
            .map(|p| mesh.push_vertex(Vertex::new(p, color)))
            .collect();
        for k in 0..4 {
            let n = (k + 1) % 4;
            mesh.push_triangle(o[k], o[n], i[n]);
            mesh.push_triangle(o[k], i[n], i[k]);
        }
        self.replace_mesh(mesh);
    }

    /// Draws a straight bar of `width` from `from` to `to`.
    pub fn set_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let dir = (to - from).normalized_or_zero();
        let normal = if dir == Vec2::zero() { Vec2::new(0.0, 1.0) } else { dir.perp() };
        let n = normal * (width / 2.0);
        let mut mesh = Mesh::new(ShaderType::ColoredVertShader);
        mesh.push_quad([from - n, to - n, to + n, from + n], color);
        self.replace_mesh(mesh);
    }

    fn replace_mesh(&mut self, mesh: Mesh) {
        if mesh != self.mesh {
            self.mesh = mesh;
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rr() -> RotRect {
        RotRect::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 4.0), 0.2)
    }

    #[test]
    fn same_geometry_does_not_redirty() {
        let mut s = Shape::new();
        s.set_fill(rr(), Color::black());
        s.mark_clean();
        s.set_fill(rr(), Color::black());
        assert!(!s.is_dirty());
        s.set_fill(rr(), Color::white());
        assert!(s.is_dirty());
    }

    #[test]
    fn border_is_a_ring_of_eight_triangles() {
        let mut s = Shape::new();
        s.set_border(rr(), 1.0, Color::black());
        assert_eq!(s.mesh().vertices.len(), 8);
        assert_eq!(s.mesh().triangle_count(), 8);
    }

    #[test]
    fn line_spans_endpoints() {
        let mut s = Shape::new();
        s.set_line(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0), 2.0, Color::black());
        let mbr = s.mesh().world_mbr().unwrap();
        assert_eq!(mbr.width(), 2.0);
        assert_eq!(mbr.height(), 10.0);
    }
}
