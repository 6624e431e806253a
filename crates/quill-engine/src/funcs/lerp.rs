use crate::coords::Vec2;
use crate::paint::Color;

/// Types that can be linearly interpolated.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, to: f32, t: f32) -> f32 {
        self + (to - self) * t
    }
}

impl Lerp for f64 {
    #[inline]
    fn lerp(self, to: f64, t: f32) -> f64 {
        self + (to - self) * t as f64
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

impl Lerp for Color {
    #[inline]
    fn lerp(self, to: Color, t: f32) -> Color {
        Color::from_premul(
            self.r.lerp(to.r, t),
            self.g.lerp(to.g, t),
            self.b.lerp(to.b, t),
            self.a.lerp(to.a, t),
        )
    }
}

/// Unclamped linear interpolation; `t` outside [0, 1] extrapolates.
#[inline]
pub fn lerp<T: Lerp>(from: T, to: T, t: f32) -> T {
    from.lerp(to, t)
}

/// Inverse of `lerp` for scalars: where `value` falls between `from` and `to`.
///
/// Returns 0 for a degenerate range.
#[inline]
pub fn inv_lerp(from: f32, to: f32, value: f32) -> f32 {
    let span = to - from;
    if span.abs() <= f32::EPSILON { 0.0 } else { (value - from) / span }
}

/// `inv_lerp` clamped to [0, 1].
#[inline]
pub fn normalize(from: f32, to: f32, value: f32) -> f32 {
    inv_lerp(from, to, value).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0f32, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0f32, 6.0, 1.0), 6.0);
        assert_eq!(lerp(Vec2::new(0.0, 0.0), Vec2::new(4.0, -2.0), 0.5), Vec2::new(2.0, -1.0));
    }

    #[test]
    fn lerp_f64_time() {
        assert_eq!(lerp(1.0f64, 2.0, 0.25), 1.25);
    }

    #[test]
    fn inv_lerp_degenerate_range() {
        assert_eq!(inv_lerp(3.0, 3.0, 10.0), 0.0);
    }

    #[test]
    fn normalize_clamps() {
        assert_eq!(normalize(0.0, 10.0, 15.0), 1.0);
        assert_eq!(normalize(0.0, 10.0, -5.0), 0.0);
        assert_eq!(normalize(0.0, 10.0, 2.5), 0.25);
    }
}
