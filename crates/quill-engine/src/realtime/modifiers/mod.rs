//! Line modifiers: per-vertex styling applied while a stroke is built.
//!
//! A modifier is created per stroke with the brush color and sees every
//! vertex the line builder emits, together with the sample's center point,
//! radius, and pressure.

mod ballpoint;

use serde::{Deserialize, Serialize};

use crate::coords::Vec2;
use crate::geometry::Vertex;
use crate::paint::Color;

pub use ballpoint::BallpointModifier;
pub use crate::geometry::ShaderType;

/// How the line builder should size the stroke ribbon.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineModParams {
    /// Multiplier on the brush radius.
    pub width_multiplier: f32,
    /// Smallest fraction of the radius pressure may shrink a sample to.
    /// 1.0 disables pressure thinning.
    pub min_radius_ratio: f32,
}

impl Default for LineModParams {
    fn default() -> Self {
        Self {
            width_multiplier: 1.0,
            min_radius_ratio: 1.0,
        }
    }
}

/// Selects a modifier in configuration and playback.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineModifierKind {
    Solid,
    #[default]
    Ballpoint,
    Highlighter,
}

const HIGHLIGHTER_OPACITY: f32 = 0.4;
const HIGHLIGHTER_WIDTH: f32 = 1.5;

/// Modifier state for one stroke.
#[derive(Debug, Clone)]
pub enum LineModifier {
    /// Constant color.
    Solid { rgba: Color },
    Ballpoint(BallpointModifier),
    /// Constant translucent color on a wider ribbon.
    Highlighter { rgba: Color },
}

impl LineModifier {
    pub fn new(kind: LineModifierKind, rgba: Color) -> Self {
        match kind {
            LineModifierKind::Solid => LineModifier::Solid { rgba },
            LineModifierKind::Ballpoint => LineModifier::Ballpoint(BallpointModifier::new(rgba)),
            LineModifierKind::Highlighter => LineModifier::Highlighter {
                rgba: rgba.with_opacity(HIGHLIGHTER_OPACITY),
            },
        }
    }

    pub fn kind(&self) -> LineModifierKind {
        match self {
            LineModifier::Solid { .. } => LineModifierKind::Solid,
            LineModifier::Ballpoint(_) => LineModifierKind::Ballpoint,
            LineModifier::Highlighter { .. } => LineModifierKind::Highlighter,
        }
    }

    /// Styles `vert`, emitted for a sample at `center` with `radius` and
    /// `pressure` (negative when unknown).
    pub fn on_add_vert(&mut self, vert: &mut Vertex, center: Vec2, radius: f32, pressure: f32) {
        match self {
            LineModifier::Solid { rgba } | LineModifier::Highlighter { rgba } => vert.set_color(*rgba),
            LineModifier::Ballpoint(m) => m.on_add_vert(vert, center, radius, pressure),
        }
    }

    pub fn shader_type(&self) -> ShaderType {
        ShaderType::ColoredVertShader
    }

    pub fn params(&self) -> LineModParams {
        match self {
            LineModifier::Highlighter { .. } => LineModParams {
                width_multiplier: HIGHLIGHTER_WIDTH,
                ..LineModParams::default()
            },
            _ => LineModParams::default(),
        }
    }
}
