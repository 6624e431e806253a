use serde::{Deserialize, Serialize};

use crate::coords::{RotRect, Transform, Vec2};
use crate::realtime::manipulation::{element_manipulation_tool_handle_anchor, ElementManipulationToolHandle};

/// Smallest scale factor a resize drag can reach; resizing never flips.
pub const MIN_DRAG_SCALE: f32 = 0.01;

/// What contacts do on the canvas.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Every contact draws a stroke.
    #[default]
    Line,
    /// Taps select, drags move/resize/rotate the selection.
    Manipulate,
}

/// A manipulation drag in progress.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Drag {
    pub contact: u32,
    pub handle: ElementManipulationToolHandle,
    start: Vec2,
    region: RotRect,
    pub transform: Transform,
}

impl Drag {
    pub fn new(contact: u32, handle: ElementManipulationToolHandle, start: Vec2, region: RotRect) -> Self {
        Self {
            contact,
            handle,
            start,
            region,
            transform: Transform::IDENTITY,
        }
    }

    pub fn update(&mut self, current: Vec2) {
        self.transform = drag_transform(self.handle, self.region, self.start, current);
    }
}

/// World transform produced by dragging `handle` of `region` from `start`
/// to `current` (both world points).
///
/// - body (`None`): translation
/// - `Rotation`: rotation about the region center
/// - sides/corners: scale in the region's own frame, keeping the opposite
///   side or corner fixed
pub fn drag_transform(
    handle: ElementManipulationToolHandle,
    region: RotRect,
    start: Vec2,
    current: Vec2,
) -> Transform {
    use ElementManipulationToolHandle as H;

    match handle {
        H::None => {
            let d = current - start;
            Transform::translation(d.x, d.y)
        }
        H::Rotation => {
            let c = region.center;
            let (a, b) = (start - c, current - c);
            if a == Vec2::zero() || b == Vec2::zero() {
                return Transform::IDENTITY;
            }
            let angle = b.y.atan2(b.x) - a.y.atan2(a.x);
            about(c, Transform::rotation(angle))
        }
        h => {
            let lp = h.local_position();
            let cur = region.world_to_local(current);
            let sx = if h.scales_x() { ((cur.x + lp.x) / (2.0 * lp.x)).max(MIN_DRAG_SCALE) } else { 1.0 };
            let sy = if h.scales_y() { ((cur.y + lp.y) / (2.0 * lp.y)).max(MIN_DRAG_SCALE) } else { 1.0 };

            let local_scale = Transform::rotation(-region.rotation)
                .then(Transform::scale(sx, sy))
                .then(Transform::rotation(region.rotation));
            about(element_manipulation_tool_handle_anchor(h, region), local_scale)
        }
    }
}

/// `t` applied with `pivot` as the origin.
fn about(pivot: Vec2, t: Transform) -> Transform {
    Transform::translation(-pivot.x, -pivot.y)
        .then(t)
        .then(Transform::translation(pivot.x, pivot.y))
}
