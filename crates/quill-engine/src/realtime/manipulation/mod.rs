//! Selection-box handles and the overlay renderers for the element
//! manipulation tool.
//!
//! Handles are named in the selection region's own frame with +Y up, so a
//! rotated region keeps stable names: `Top` is always the local max-Y edge.

mod renderer;

pub use renderer::{
    ElementManipulationToolRenderer,
    ManipulationToolRenderer,
    SingleElementManipulationToolRenderer,
};

use crate::camera::Camera;
use crate::coords::{RotRect, Vec2};

/// Distance, in screen pixels, between the top edge midpoint and the
/// rotation handle.
pub const ROTATION_HANDLE_OFFSET_PX: f32 = 40.0;

/// A grab point on the selection box.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementManipulationToolHandle {
    /// No handle: the body of the selection.
    None,
    Right,
    Top,
    Left,
    Bottom,
    RightTop,
    LeftTop,
    LeftBottom,
    RightBottom,
    Rotation,
}

/// Every handle value, suitable for iterating over.
pub const ALL_HANDLES: &[ElementManipulationToolHandle] = &[
    ElementManipulationToolHandle::None,
    ElementManipulationToolHandle::Right,
    ElementManipulationToolHandle::Top,
    ElementManipulationToolHandle::Left,
    ElementManipulationToolHandle::Bottom,
    ElementManipulationToolHandle::RightTop,
    ElementManipulationToolHandle::LeftTop,
    ElementManipulationToolHandle::LeftBottom,
    ElementManipulationToolHandle::RightBottom,
    ElementManipulationToolHandle::Rotation,
];

impl ElementManipulationToolHandle {
    /// Position in normalized local coordinates (`[-0.5, 0.5]` spans the
    /// region). `None` and `Rotation` sit at the center.
    pub fn local_position(self) -> Vec2 {
        use ElementManipulationToolHandle as H;
        match self {
            H::None | H::Rotation => Vec2::zero(),
            H::Right => Vec2::new(0.5, 0.0),
            H::Top => Vec2::new(0.0, 0.5),
            H::Left => Vec2::new(-0.5, 0.0),
            H::Bottom => Vec2::new(0.0, -0.5),
            H::RightTop => Vec2::new(0.5, 0.5),
            H::LeftTop => Vec2::new(-0.5, 0.5),
            H::LeftBottom => Vec2::new(-0.5, -0.5),
            H::RightBottom => Vec2::new(0.5, -0.5),
        }
    }

    /// True for handles that resize the region along its local X axis.
    pub fn scales_x(self) -> bool {
        self.local_position().x != 0.0
    }

    /// True for handles that resize the region along its local Y axis.
    pub fn scales_y(self) -> bool {
        self.local_position().y != 0.0
    }
}

/// World position of `handle` on `world_rect`. `None` is the center.
pub fn element_manipulation_tool_handle_position(
    handle: ElementManipulationToolHandle,
    camera: &Camera,
    world_rect: RotRect,
) -> Vec2 {
    handle_position_with_offset(handle, camera, world_rect, ROTATION_HANDLE_OFFSET_PX)
}

/// Like [`element_manipulation_tool_handle_position`] with a custom
/// rotation-handle offset in screen pixels.
pub fn handle_position_with_offset(
    handle: ElementManipulationToolHandle,
    camera: &Camera,
    world_rect: RotRect,
    rotation_offset_px: f32,
) -> Vec2 {
    match handle {
        ElementManipulationToolHandle::Rotation => {
            let top = world_rect.local_to_world(ElementManipulationToolHandle::Top.local_position());
            let up = if world_rect.dims.y < 0.0 { -world_rect.axis_y() } else { world_rect.axis_y() };
            top + up * camera.convert_distance_screen_to_world(rotation_offset_px)
        }
        h => world_rect.local_to_world(h.local_position()),
    }
}

/// World position of the point that stays fixed while `handle` is dragged:
/// the opposite side or corner. `None` and `Rotation` anchor at the center.
pub fn element_manipulation_tool_handle_anchor(
    handle: ElementManipulationToolHandle,
    world_rect: RotRect,
) -> Vec2 {
    match handle {
        ElementManipulationToolHandle::None | ElementManipulationToolHandle::Rotation => {
            world_rect.center
        }
        h => world_rect.local_to_world(-h.local_position()),
    }
}

/// Handle under `screen_pos`, if any.
///
/// Handles within `slop_px` of the point win, closest first. Otherwise a
/// point inside the region hits the body (`Some(None)`); anything else
/// misses.
pub fn handle_at(
    camera: &Camera,
    world_rect: RotRect,
    screen_pos: Vec2,
    slop_px: f32,
    rotation_offset_px: f32,
) -> Option<ElementManipulationToolHandle> {
    let closest = ALL_HANDLES
        .iter()
        .copied()
        .filter(|h| *h != ElementManipulationToolHandle::None)
        .map(|h| {
            let p = handle_position_with_offset(h, camera, world_rect, rotation_offset_px);
            (h, camera.convert_world_to_screen(p).distance(screen_pos))
        })
        .filter(|(_, d)| *d <= slop_px)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((h, _)) = closest {
        return Some(h);
    }
    world_rect
        .contains(camera.convert_screen_to_world(screen_pos))
        .then_some(ElementManipulationToolHandle::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use approx::assert_abs_diff_eq;
    use super::ElementManipulationToolHandle as H;

    fn cam() -> Camera {
        Camera::new(Viewport::new(400.0, 400.0), 96.0)
    }

    fn region() -> RotRect {
        RotRect::new(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0), 0.35)
    }

    fn close(a: Vec2, b: Vec2) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-3);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-3);
    }

    // ── position ──────────────────────────────────────────────────────────

    #[test]
    fn none_is_center() {
        close(element_manipulation_tool_handle_position(H::None, &cam(), region()), region().center);
    }

    #[test]
    fn sides_and_corners_on_unrotated_rect() {
        let r = RotRect::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0), 0.0);
        let c = cam();
        close(element_manipulation_tool_handle_position(H::Top, &c, r), Vec2::new(0.0, 1.0));
        close(element_manipulation_tool_handle_position(H::Right, &c, r), Vec2::new(2.0, 0.0));
        close(element_manipulation_tool_handle_position(H::LeftBottom, &c, r), Vec2::new(-2.0, -1.0));
        close(element_manipulation_tool_handle_position(H::RightTop, &c, r), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn rotation_handle_is_offset_in_screen_pixels() {
        let r = RotRect::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0), 0.0);
        let mut c = cam();
        close(element_manipulation_tool_handle_position(H::Rotation, &c, r), Vec2::new(0.0, 41.0));
        c.set_position(Vec2::zero(), 4.0, 0.0);
        close(element_manipulation_tool_handle_position(H::Rotation, &c, r), Vec2::new(0.0, 11.0));
    }

    #[test]
    fn rotation_handle_follows_region_rotation() {
        let r = RotRect::new(Vec2::zero(), Vec2::new(4.0, 2.0), core::f32::consts::FRAC_PI_2);
        close(element_manipulation_tool_handle_position(H::Rotation, &cam(), r), Vec2::new(-41.0, 0.0));
    }

    // ── anchor ────────────────────────────────────────────────────────────

    #[test]
    fn anchor_is_opposite_of_position() {
        let c = cam();
        for &h in ALL_HANDLES {
            if matches!(h, H::None | H::Rotation) {
                close(element_manipulation_tool_handle_anchor(h, region()), region().center);
                continue;
            }
            let p = element_manipulation_tool_handle_position(h, &c, region());
            let a = element_manipulation_tool_handle_anchor(h, region());
            close((p + a) / 2.0, region().center);
        }
    }

    #[test]
    fn anchor_pairs() {
        let r = region();
        let c = cam();
        let pos = |h| element_manipulation_tool_handle_position(h, &c, r);
        close(element_manipulation_tool_handle_anchor(H::Right, r), pos(H::Left));
        close(element_manipulation_tool_handle_anchor(H::Top, r), pos(H::Bottom));
        close(element_manipulation_tool_handle_anchor(H::RightTop, r), pos(H::LeftBottom));
        close(element_manipulation_tool_handle_anchor(H::LeftTop, r), pos(H::RightBottom));
    }

    // ── hit testing ───────────────────────────────────────────────────────

    #[test]
    fn handle_at_prefers_handles_then_body() {
        let c = cam();
        let r = RotRect::new(Vec2::new(200.0, 200.0), Vec2::new(100.0, 60.0), 0.0);
        let right = c.convert_world_to_screen(Vec2::new(250.0, 200.0));
        assert_eq!(handle_at(&c, r, right + Vec2::new(3.0, 0.0), 10.0, 40.0), Some(H::Right));
        let center = c.convert_world_to_screen(r.center);
        assert_eq!(handle_at(&c, r, center, 10.0, 40.0), Some(H::None));
        assert_eq!(handle_at(&c, r, Vec2::new(5.0, 5.0), 10.0, 40.0), None);
        let rot = c.convert_world_to_screen(Vec2::new(200.0, 270.0));
        assert_eq!(handle_at(&c, r, rot, 10.0, 40.0), Some(H::Rotation));
    }

    #[test]
    fn all_handles_lists_every_variant_once() {
        assert_eq!(ALL_HANDLES.len(), 10);
        let set: std::collections::HashSet<_> = ALL_HANDLES.iter().collect();
        assert_eq!(set.len(), 10);
    }
}
