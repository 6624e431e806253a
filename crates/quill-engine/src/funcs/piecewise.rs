use super::lerp::{inv_lerp, lerp};

/// Piecewise-linear function defined by control points sorted by `x`.
///
/// Inputs below the first point or above the last are clamped to the end
/// values, so any finite input yields a value inside the curve's range.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseInterpolator {
    points: Vec<(f32, f32)>,
}

impl PiecewiseInterpolator {
    /// Creates an interpolator from `(x, y)` control points.
    ///
    /// # Panics
    /// Panics if `points` is empty or not sorted by strictly increasing `x`.
    pub fn new(points: Vec<(f32, f32)>) -> Self {
        assert!(!points.is_empty(), "PiecewiseInterpolator needs at least one point");
        assert!(
            points.windows(2).all(|w| w[0].0 < w[1].0),
            "PiecewiseInterpolator points must be sorted by increasing x"
        );
        Self { points }
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    pub fn get_value(&self, x: f32) -> f32 {
        // new() guarantees at least one point.
        let (first, last) = (self.points[0], self.points[self.points.len() - 1]);
        if x.is_nan() || x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }

        // First segment whose right end is past x.
        let idx = self.points.partition_point(|p| p.0 <= x);
        let (x0, y0) = self.points[idx - 1];
        let (x1, y1) = self.points[idx];
        lerp(y0, y1, inv_lerp(x0, x1, x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn curve() -> PiecewiseInterpolator {
        PiecewiseInterpolator::new(vec![(0.0, 0.0), (1.0, 10.0), (3.0, 12.0)])
    }

    #[test]
    fn clamps_outside_range() {
        assert_eq!(curve().get_value(-4.0), 0.0);
        assert_eq!(curve().get_value(99.0), 12.0);
        assert_eq!(curve().get_value(f32::NAN), 0.0);
    }

    #[test]
    fn interpolates_within_segments() {
        assert_abs_diff_eq!(curve().get_value(0.5), 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(curve().get_value(2.0), 11.0, epsilon = 1e-6);
    }

    #[test]
    fn hits_control_points_exactly() {
        assert_eq!(curve().get_value(1.0), 10.0);
    }

    #[test]
    #[should_panic]
    fn unsorted_points_panic() {
        PiecewiseInterpolator::new(vec![(1.0, 0.0), (0.5, 1.0)]);
    }
}
