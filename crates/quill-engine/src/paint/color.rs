/// Premultiplied linear RGBA.
///
/// Stroke vertices, tool shapes and the GPU blend state (`One,
/// OneMinusSrcAlpha`) all assume `r`, `g` and `b` already carry alpha.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::from_premul(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::from_premul(1.0, 1.0, 1.0, 1.0)
    }

    /// Straight-alpha components in [0, 1]; out-of-range input is clamped.
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        let premul = |c: f32| c.clamp(0.0, 1.0) * a;
        Self::from_premul(premul(r), premul(g), premul(b), a)
    }

    /// Straight-alpha 8-bit channels, as brush palettes are usually written.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let unit = |c: u8| f32::from(c) / 255.0;
        Self::from_straight(unit(r), unit(g), unit(b), unit(a))
    }

    /// Multiplies coverage by `opacity` (clamped to [0, 1]).
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let k = opacity.clamp(0.0, 1.0);
        Self::from_premul(self.r * k, self.g * k, self.b * k, self.a * k)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
