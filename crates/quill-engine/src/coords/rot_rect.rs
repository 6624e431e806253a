use super::{Rect, Transform, Vec2};

/// Oriented rectangle: center, full dimensions, and a counter-clockwise rotation
/// in radians.
///
/// Local frame convention: +X is "right", +Y is "top". Selection handles are
/// named in this frame, so a rotated region keeps stable handle names.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RotRect {
    pub center: Vec2,
    pub dims: Vec2,
    pub rotation: f32,
}

impl RotRect {
    #[inline]
    pub const fn new(center: Vec2, dims: Vec2, rotation: f32) -> Self {
        Self { center, dims, rotation }
    }

    /// Unrotated region covering `rect`.
    #[inline]
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.normalized();
        Self::new(r.center(), r.size, 0.0)
    }

    /// Unit vector along the local +X axis, in world space.
    #[inline]
    pub fn axis_x(self) -> Vec2 {
        Vec2::new(1.0, 0.0).rotated(self.rotation)
    }

    /// Unit vector along the local +Y axis, in world space.
    #[inline]
    pub fn axis_y(self) -> Vec2 {
        Vec2::new(0.0, 1.0).rotated(self.rotation)
    }

    /// Maps a point in normalized local coordinates (`[-0.5, 0.5]` on both axes
    /// spans the rect) to world space.
    #[inline]
    pub fn local_to_world(self, local: Vec2) -> Vec2 {
        self.center
            + self.axis_x() * (local.x * self.dims.x)
            + self.axis_y() * (local.y * self.dims.y)
    }

    /// Inverse of [`RotRect::local_to_world`].
    #[inline]
    pub fn world_to_local(self, p: Vec2) -> Vec2 {
        let d = p - self.center;
        let sx = if self.dims.x.abs() > f32::EPSILON { self.dims.x } else { 1.0 };
        let sy = if self.dims.y.abs() > f32::EPSILON { self.dims.y } else { 1.0 };
        Vec2::new(d.dot(self.axis_x()) / sx, d.dot(self.axis_y()) / sy)
    }

    /// Inclusive containment in the rect's own frame.
    pub fn contains(self, p: Vec2) -> bool {
        let d = p - self.center;
        d.dot(self.axis_x()).abs() <= self.dims.x.abs() / 2.0
            && d.dot(self.axis_y()).abs() <= self.dims.y.abs() / 2.0
    }

    /// Corners in counter-clockwise order starting at local left-bottom.
    pub fn corners(self) -> [Vec2; 4] {
        [
            self.local_to_world(Vec2::new(-0.5, -0.5)),
            self.local_to_world(Vec2::new(0.5, -0.5)),
            self.local_to_world(Vec2::new(0.5, 0.5)),
            self.local_to_world(Vec2::new(-0.5, 0.5)),
        ]
    }

    /// Axis-aligned bounds of the rotated corners.
    pub fn mbr(self) -> Rect {
        // corners() is never empty.
        Rect::bounding(self.corners()).unwrap_or_default()
    }

    /// Transform taking the unit square centered at the origin onto this rect.
    pub fn to_transform(self) -> Transform {
        Transform::scale(self.dims.x, self.dims.y)
            .then(Transform::rotation(self.rotation))
            .then(Transform::translation(self.center.x, self.center.y))
    }

    /// Applies an affine transform to the rect.
    ///
    /// Shear is not representable; the result keeps the transformed center,
    /// the transformed axis lengths, and the rotation of the transformed X axis.
    pub fn transformed(self, t: &Transform) -> RotRect {
        let center = t.apply(self.center);
        let x_edge = t.apply_vector(self.axis_x() * self.dims.x);
        let y_edge = t.apply_vector(self.axis_y() * self.dims.y);
        RotRect::new(
            center,
            Vec2::new(x_edge.length(), y_edge.length()),
            x_edge.y.atan2(x_edge.x),
        )
    }
}
