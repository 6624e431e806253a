use crate::coords::Vec2;
use crate::funcs::PiecewiseInterpolator;
use crate::geometry::Vertex;
use crate::paint::Color;

/// Ballpoint pen: full color at normal pressure, fading out as pressure
/// gets light.
#[derive(Debug, Clone)]
pub struct BallpointModifier {
    rgba: Color,
    opacity: PiecewiseInterpolator,
    last_opacity: Option<f32>,
}

impl BallpointModifier {
    /// Pressure to opacity-multiplier control points.
    pub const OPACITY_CURVE: [(f32, f32); 4] = [(0.0, 0.3), (0.1, 0.45), (0.3, 1.0), (1.0, 1.0)];

    pub fn new(rgba: Color) -> Self {
        Self {
            rgba,
            opacity: PiecewiseInterpolator::new(Self::OPACITY_CURVE.to_vec()),
            last_opacity: None,
        }
    }

    /// Opacity multiplier for a pressure sample. Unknown (negative) pressure
    /// draws at full strength.
    pub fn opacity_for(&self, pressure: f32) -> f32 {
        if pressure < 0.0 {
            return 1.0;
        }
        self.opacity.get_value(pressure)
    }

    pub fn on_add_vert(&mut self, vert: &mut Vertex, _center: Vec2, _radius: f32, pressure: f32) {
        let k = self.opacity_for(pressure);
        vert.set_color(self.rgba.with_opacity(k));
        self.last_opacity = Some(k);
    }

    /// Multiplier applied to the most recent vertex.
    pub fn last_opacity(&self) -> Option<f32> {
        self.last_opacity
    }
}
