use super::Vec2;

/// Axis-aligned rectangle: min corner plus size.
///
/// Element MBRs live in world space (+Y up), so `origin` is the
/// bottom-left corner there; screen extents use the same type with +Y down.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    #[inline]
    fn spanning(min: Vec2, max: Vec2) -> Self {
        Self { origin: min, size: max - min }
    }

    /// MBR of a point set; `None` when there are no points.
    pub fn bounding<I: IntoIterator<Item = Vec2>>(points: I) -> Option<Rect> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(lo, hi), p| {
            (Vec2::new(lo.x.min(p.x), lo.y.min(p.y)), Vec2::new(hi.x.max(p.x), hi.y.max(p.y)))
        });
        Some(Rect::spanning(min, max))
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    /// Zero-area (or inverted) rects are empty. A single point's MBR is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Same area with non-negative size.
    pub fn normalized(self) -> Self {
        let (a, b) = (self.origin, self.max());
        Rect::spanning(Vec2::new(a.x.min(b.x), a.y.min(b.y)), Vec2::new(a.x.max(b.x), a.y.max(b.y)))
    }

    /// Overlap of two rects; touching edges do not overlap.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let (a, b) = (self.normalized(), other.normalized());
        let min = Vec2::new(a.origin.x.max(b.origin.x), a.origin.y.max(b.origin.y));
        let max = Vec2::new(a.max().x.min(b.max().x), a.max().y.min(b.max().y));
        let overlap = Rect::spanning(min, max);
        (!overlap.is_empty()).then_some(overlap)
    }

    /// MBR of both rects.
    pub fn union(self, other: Rect) -> Rect {
        let (a, b) = (self.normalized(), other.normalized());
        Rect::bounding([a.min(), a.max(), b.min(), b.max()]).unwrap_or(a)
    }
}
