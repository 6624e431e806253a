use crate::camera::Camera;
use crate::coords::Vec2;
use crate::funcs::lerp;
use crate::geometry::{Mesh, Vertex};
use crate::input::SInput;

use super::modifiers::LineModifier;

/// Builds a stroke ribbon mesh from input samples as they arrive.
///
/// Each sample adds a left/right vertex pair at `center ± normal * radius`
/// in world space and stitches it to the previous pair with two triangles.
/// The normal of the first pair is +Y since no direction is known yet.
#[derive(Debug, Clone)]
pub struct StrokeBuilder {
    modifier: LineModifier,
    base_radius: f32,
    mesh: Mesh,
    centerline: Vec<Vec2>,
    length: f32,
    truncated: bool,
}

impl StrokeBuilder {
    /// `base_radius` is in world units, before the modifier's width multiplier.
    pub fn new(modifier: LineModifier, base_radius: f32) -> Self {
        let mesh = Mesh::new(modifier.shader_type());
        Self {
            modifier,
            base_radius,
            mesh,
            centerline: Vec::new(),
            length: 0.0,
            truncated: false,
        }
    }

    /// Appends one sample. Returns `false` once the mesh cannot grow further.
    pub fn add_input(&mut self, input: &SInput, cam: &Camera) -> bool {
        if self.mesh.is_full(2) {
            if !self.truncated {
                log::debug!("stroke exceeds mesh capacity; ignoring further samples");
                self.truncated = true;
            }
            return false;
        }

        let center = cam.convert_screen_to_world(input.screen_pos);
        let radius = self.radius_for(input.pressure);

        let normal = match self.centerline.last() {
            Some(&prev) => {
                self.length += center.distance(prev);
                (center - prev).normalized_or_zero().perp()
            }
            None => Vec2::zero().perp(),
        };
        let normal = if normal == Vec2::zero() { Vec2::new(0.0, 1.0) } else { normal };

        let mut left = Vertex::new(center + normal * radius, Default::default());
        let mut right = Vertex::new(center - normal * radius, Default::default());
        left.aux = [-1.0, self.length];
        right.aux = [1.0, self.length];
        self.modifier.on_add_vert(&mut left, center, radius, input.pressure);
        self.modifier.on_add_vert(&mut right, center, radius, input.pressure);

        let l = self.mesh.push_vertex(left);
        let r = self.mesh.push_vertex(right);
        if !self.centerline.is_empty() {
            let (pl, pr) = (l - 2, r - 2);
            self.mesh.push_triangle(pl, pr, r);
            self.mesh.push_triangle(pl, r, l);
        }
        self.centerline.push(center);
        true
    }

    /// Radius for a sample: pressure thins the ribbon down to the modifier's
    /// `min_radius_ratio`; unknown pressure keeps the full radius.
    fn radius_for(&self, pressure: f32) -> f32 {
        let params = self.modifier.params();
        let full = self.base_radius * params.width_multiplier;
        if pressure < 0.0 {
            return full;
        }
        full * lerp(params.min_radius_ratio, 1.0, pressure.clamp(0.0, 1.0))
    }

    /// Mesh built so far, suitable for live drawing.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// World-space sample centers in arrival order.
    pub fn centerline(&self) -> &[Vec2] {
        &self.centerline
    }

    pub fn modifier(&self) -> &LineModifier {
        &self.modifier
    }

    pub fn point_count(&self) -> usize {
        self.centerline.len()
    }

    /// Completes the stroke. `None` when no sample was added.
    pub fn finish(self) -> Option<Mesh> {
        if self.centerline.is_empty() {
            None
        } else {
            Some(self.mesh)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::input::synth;
    use crate::paint::Color;
    use crate::realtime::modifiers::LineModifierKind;
    use approx::assert_abs_diff_eq;

    fn cam() -> Camera {
        Camera::new(Viewport::new(100.0, 100.0), 96.0)
    }

    fn builder(kind: LineModifierKind) -> StrokeBuilder {
        StrokeBuilder::new(LineModifier::new(kind, Color::black()), 2.0)
    }

    #[test]
    fn empty_builder_finishes_to_none() {
        assert!(builder(LineModifierKind::Solid).finish().is_none());
    }

    #[test]
    fn each_sample_adds_a_vertex_pair() {
        let cam = cam();
        let mut b = builder(LineModifierKind::Solid);
        for input in synth::create_exact_line(Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0), 3, 0.0, 1.0) {
            assert!(b.add_input(&input, &cam));
        }
        let mesh = b.finish().unwrap();
        assert_eq!(mesh.vertices.len(), 10);
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn ribbon_is_offset_along_the_normal() {
        let cam = cam();
        let mut b = builder(LineModifierKind::Solid);
        for input in synth::create_exact_line(Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0), 0, 0.0, 1.0) {
            b.add_input(&input, &cam);
        }
        // Horizontal stroke at world y = 50; the second pair sits 2 units above and below.
        let v = &b.mesh().vertices;
        assert_abs_diff_eq!(v[2].pos[1], 52.0, epsilon = 1e-4);
        assert_abs_diff_eq!(v[3].pos[1], 48.0, epsilon = 1e-4);
        assert_eq!(b.centerline().len(), 2);
    }

    #[test]
    fn first_pair_uses_up_normal() {
        let cam = cam();
        let mut b = builder(LineModifierKind::Solid);
        let tap = synth::create_tap(Vec2::new(50.0, 50.0), 0.0);
        b.add_input(&tap[0], &cam);
        let v = &b.mesh().vertices;
        assert_abs_diff_eq!(v[0].pos[0], 50.0, epsilon = 1e-4);
        assert_abs_diff_eq!(v[0].pos[1], 52.0, epsilon = 1e-4);
    }

    #[test]
    fn highlighter_widens_ribbon() {
        let cam = cam();
        let mut b = builder(LineModifierKind::Highlighter);
        let tap = synth::create_tap(Vec2::new(50.0, 50.0), 0.0);
        b.add_input(&tap[0], &cam);
        assert_abs_diff_eq!(b.mesh().vertices[0].pos[1], 53.0, epsilon = 1e-4);
    }
}
