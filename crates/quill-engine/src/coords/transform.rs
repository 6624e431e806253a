use super::Vec2;

/// 2D affine transform.
///
/// Maps `p` to `(a*x + c*y + tx, b*x + d*y + ty)`. Column-major like the GPU
/// side expects, see [`Transform::to_mat4`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Transform { tx, ty, ..Self::IDENTITY }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Transform { a: sx, d: sy, ..Self::IDENTITY }
    }

    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Transform { a: c, b: s, c: -s, d: c, tx: 0.0, ty: 0.0 }
    }

    /// Returns the transform applying `self` first, then `next`.
    #[inline]
    pub fn then(self, next: Transform) -> Transform {
        Transform {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Applies the linear part only (no translation).
    #[inline]
    pub fn apply_vector(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when singular.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        let a = self.d * inv;
        let b = -self.b * inv;
        let c = -self.c * inv;
        let d = self.a * inv;
        Some(Transform {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }

    /// Column-major 4x4 matrix, for uniform uploads.
    pub fn to_mat4(&self) -> [[f32; 4]; 4] {
        [
            [self.a, self.b, 0.0, 0.0],
            [self.c, self.d, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [self.tx, self.ty, 0.0, 1.0],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn then_applies_in_order() {
        let t = Transform::scale(2.0, 2.0).then(Transform::translation(1.0, 0.0));
        assert_eq!(t.apply(Vec2::new(1.0, 1.0)), Vec2::new(3.0, 2.0));
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform::rotation(0.4)
            .then(Transform::scale(3.0, 0.5))
            .then(Transform::translation(-2.0, 7.0));
        let inv = t.inverse().unwrap();
        let p = Vec2::new(1.5, -4.0);
        let back = inv.apply(t.apply(p));
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-4);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-4);
    }

    #[test]
    fn singular_has_no_inverse() {
        assert!(Transform::scale(0.0, 1.0).inverse().is_none());
    }
}
