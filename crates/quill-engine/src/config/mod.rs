//! Engine configuration.
//!
//! Plain structs with sensible defaults; hosts override individual fields.

use crate::camera::DEFAULT_SCALE_LIMITS;
use crate::logging::LoggingConfig;
use crate::paint::Color;
use crate::realtime::manipulation::ROTATION_HANDLE_OFFSET_PX;
use crate::realtime::modifiers::LineModifierKind;
use crate::time::DurationS;

/// Look of the element manipulation overlay. Sizes are in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulationStyle {
    /// Edge length of the square handles.
    pub handle_size_px: f32,
    /// Distance from the top edge to the rotation handle.
    pub rotation_offset_px: f32,
    pub outline_width_px: f32,
    pub glow_width_px: f32,
    /// How far from a handle a touch still grabs it.
    pub hit_slop_px: f32,
    pub outline_color: Color,
    pub glow_color: Color,
    pub handle_color: Color,
    /// Duration of the glow fade-in after a new selection.
    pub glow_fade_in: DurationS,
}

impl Default for ManipulationStyle {
    fn default() -> Self {
        Self {
            handle_size_px: 12.0,
            rotation_offset_px: ROTATION_HANDLE_OFFSET_PX,
            outline_width_px: 1.5,
            glow_width_px: 8.0,
            hit_slop_px: 24.0,
            outline_color: Color::from_srgb_u8(26, 115, 232, 255),
            glow_color: Color::from_srgb_u8(26, 115, 232, 96),
            handle_color: Color::white(),
            glow_fade_in: 0.25,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub manipulation: ManipulationStyle,

    /// Brush used for new strokes.
    pub line_modifier: LineModifierKind,
    pub brush_color: Color,
    /// Stroke radius in screen pixels at the camera scale the stroke starts at.
    pub stroke_radius_px: f32,

    /// Frame budget for the manipulation overlay update; slower updates are
    /// logged as warnings.
    pub update_budget: DurationS,

    /// Delta-time clamps for the frame clock.
    pub frame_dt_min: DurationS,
    pub frame_dt_max: DurationS,

    /// Zoom factor per 100 px of vertical wheel delta.
    pub wheel_zoom_per_100px: f32,
    /// Camera scale range (screen pixels per world unit) zooming stays in.
    pub min_camera_scale: f32,
    pub max_camera_scale: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            manipulation: ManipulationStyle::default(),
            line_modifier: LineModifierKind::Ballpoint,
            brush_color: Color::black(),
            stroke_radius_px: 2.0,
            update_budget: 0.004,
            frame_dt_min: 0.0001,
            frame_dt_max: 0.25,
            wheel_zoom_per_100px: 1.25,
            min_camera_scale: DEFAULT_SCALE_LIMITS.0,
            max_camera_scale: DEFAULT_SCALE_LIMITS.1,
        }
    }
}
