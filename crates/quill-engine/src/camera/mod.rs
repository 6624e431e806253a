//! 2D document camera.
//!
//! Maps world space (+Y up) onto the screen (+Y down, origin top-left).

use crate::coords::{Rect, Transform, Vec2, Viewport};

/// Scale range a camera starts with, in screen pixels per world unit.
pub const DEFAULT_SCALE_LIMITS: (f32, f32) = (1e-3, 1e3);

/// Camera state: what part of the world is visible and at which scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    screen: Viewport,
    ppi: f32,
    /// World point shown at the screen center.
    center: Vec2,
    /// Screen pixels per world unit.
    scale: f32,
    /// Counter-clockwise world rotation in radians.
    rotation: f32,
    /// `scale` always stays within `[min_scale, max_scale]`.
    min_scale: f32,
    max_scale: f32,
}

impl Camera {
    /// Camera whose world window coincides with the screen (1 px per unit).
    pub fn new(screen: Viewport, ppi: f32) -> Self {
        debug_assert!(screen.is_valid(), "camera screen must have positive size");
        Self {
            screen,
            ppi,
            center: screen.center(),
            scale: 1.0,
            rotation: 0.0,
            min_scale: DEFAULT_SCALE_LIMITS.0,
            max_scale: DEFAULT_SCALE_LIMITS.1,
        }
    }

    #[inline]
    pub fn screen(&self) -> Viewport {
        self.screen
    }

    #[inline]
    pub fn ppi(&self) -> f32 {
        self.ppi
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_screen(&mut self, screen: Viewport) {
        debug_assert!(screen.is_valid(), "camera screen must have positive size");
        self.screen = screen;
    }

    #[inline]
    pub fn scale_limits(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    /// Bounds future zooms; the current scale is pulled into range.
    pub fn set_scale_limits(&mut self, min_scale: f32, max_scale: f32) {
        assert!(
            min_scale > 0.0 && min_scale <= max_scale && max_scale.is_finite(),
            "invalid camera scale limits [{min_scale}, {max_scale}]"
        );
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self.scale = self.scale.clamp(min_scale, max_scale);
    }

    pub fn set_position(&mut self, center: Vec2, scale: f32, rotation: f32) {
        debug_assert!(scale > 0.0 && scale.is_finite(), "camera scale must be positive");
        self.center = center;
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        self.rotation = rotation;
    }

    /// Centers `world` on screen, fitting it entirely (aspect preserved).
    pub fn set_world_window(&mut self, world: Rect) {
        let w = world.normalized();
        let sx = self.screen.width / w.width().max(f32::EPSILON);
        let sy = self.screen.height / w.height().max(f32::EPSILON);
        self.set_position(w.center(), sx.min(sy), 0.0);
    }

    /// Pans by a screen-space delta.
    pub fn translate_screen(&mut self, delta_px: Vec2) {
        let world_delta = self.screen_to_world_transform().apply_vector(delta_px);
        self.center -= world_delta;
    }

    /// Zooms by `factor` keeping the world point under `screen_pos` fixed.
    /// The resulting scale is clamped to the scale limits.
    pub fn zoom_about(&mut self, screen_pos: Vec2, factor: f32) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if scale == self.scale {
            return;
        }
        let anchor = self.convert_screen_to_world(screen_pos);
        self.scale = scale;
        let moved = self.convert_screen_to_world(screen_pos);
        self.center += anchor - moved;
    }

    pub fn world_to_screen_transform(&self) -> Transform {
        Transform::translation(-self.center.x, -self.center.y)
            .then(Transform::rotation(-self.rotation))
            .then(Transform::scale(self.scale, -self.scale))
            .then(Transform::translation(self.screen.width / 2.0, self.screen.height / 2.0))
    }

    pub fn screen_to_world_transform(&self) -> Transform {
        Transform::translation(-self.screen.width / 2.0, -self.screen.height / 2.0)
            .then(Transform::scale(1.0 / self.scale, -1.0 / self.scale))
            .then(Transform::rotation(self.rotation))
            .then(Transform::translation(self.center.x, self.center.y))
    }

    #[inline]
    pub fn convert_world_to_screen(&self, p: Vec2) -> Vec2 {
        self.world_to_screen_transform().apply(p)
    }

    #[inline]
    pub fn convert_screen_to_world(&self, p: Vec2) -> Vec2 {
        self.screen_to_world_transform().apply(p)
    }

    /// Converts a screen distance in pixels into world units.
    #[inline]
    pub fn convert_distance_screen_to_world(&self, px: f32) -> f32 {
        px / self.scale
    }

    /// World-space rectangle currently visible (axis-aligned bounds).
    pub fn world_window(&self) -> Rect {
        let s = self.screen;
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(s.width, 0.0),
            Vec2::new(s.width, s.height),
            Vec2::new(0.0, s.height),
        ];
        let to_world = self.screen_to_world_transform();
        Rect::bounding(corners.map(|p| to_world.apply(p))).unwrap_or_default()
    }
}
