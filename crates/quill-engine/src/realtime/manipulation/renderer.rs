use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;

use crate::animation::{AnimatedValue, Animation, Easing, SequentialAnimation};
use crate::camera::Camera;
use crate::config::ManipulationStyle;
use crate::coords::{Rect, RotRect, Transform, Vec2};
use crate::geometry::Shape;
use crate::render::{MeshKey, MeshStore};
use crate::scene::{DrawCmd, DrawTarget, ElementId, ElementRenderer, MeshCmd, ZIndex};
use crate::time::{DurationS, FrameTimeS, Timer, WallClock};

use super::{handle_position_with_offset, ElementManipulationToolHandle, ALL_HANDLES};

/// Overlay drawn while elements are being selected and manipulated.
///
/// Renderers never own the scene graph or GPU resources; both are passed
/// per call.
pub trait ManipulationToolRenderer {
    /// Records the overlay. `transform` is the in-progress manipulation,
    /// applied to the manipulated elements.
    fn draw(&self, cam: &Camera, draw_time: FrameTimeS, transform: Transform, target: &mut DrawTarget<'_>);

    /// Per-frame update: advances animations and lays the overlay out
    /// around `region` with `transform` applied.
    fn update(
        &mut self,
        cam: &Camera,
        draw_time: FrameTimeS,
        element_mbr: Rect,
        region: RotRect,
        transform: Transform,
    );

    /// Shows or hides the overlay without discarding it.
    fn enable(&mut self, enabled: bool);

    /// Uploads changed overlay meshes. Must run before `draw` after the
    /// layout changed.
    fn synchronize(&mut self, resources: &mut dyn MeshStore) -> Result<()>;

    /// Replaces the selection. An empty selection turns the overlay off.
    fn set_elements(&mut self, cam: &Camera, elements: &[ElementId], element_mbr: Rect, region: RotRect);

    /// Frees every mesh this renderer uploaded. Called before the renderer is
    /// replaced; a later `synchronize` uploads again.
    fn release(&mut self, resources: &mut dyn MeshStore);
}

/// Shape plus the key its mesh is uploaded under.
#[derive(Debug)]
struct KeyedShape {
    shape: Shape,
    key: MeshKey,
}

impl KeyedShape {
    fn new() -> Self {
        Self {
            shape: Shape::new(),
            key: MeshKey::next(),
        }
    }

    fn synchronize(&mut self, resources: &mut dyn MeshStore) -> Result<()> {
        if !self.shape.is_dirty() {
            return Ok(());
        }
        if self.shape.mesh().is_empty() {
            resources.release(self.key);
        } else {
            resources.upload(self.key, self.shape.mesh())?;
        }
        self.shape.mark_clean();
        Ok(())
    }

    fn release(&mut self, resources: &mut dyn MeshStore) {
        resources.release(self.key);
        self.shape.mark_dirty();
    }

    fn command(&self, opacity: f32) -> DrawCmd {
        DrawCmd::Mesh(MeshCmd {
            mesh: self.key,
            transform: Transform::IDENTITY,
            opacity,
            shader: self.shape.mesh().shader_type,
        })
    }
}

/// Selection box overlay: outline with a fading glow, a rotation bar, and
/// one square per side/corner handle plus the rotation handle.
///
/// The manipulated elements themselves are drawn here too, with the
/// in-progress transform, so the host can hide them from the regular scene
/// pass while a drag is underway.
pub struct ElementManipulationToolRenderer {
    style: ManipulationStyle,
    clock: Rc<dyn WallClock>,
    update_budget: DurationS,
    element_renderer: ElementRenderer,

    elements: Vec<ElementId>,
    enabled: bool,

    outline: KeyedShape,
    outline_glow: KeyedShape,
    rotation_bar: KeyedShape,
    /// One shape per entry of `ALL_HANDLES` except `None`, in that order.
    handle_shapes: Vec<(ElementManipulationToolHandle, KeyedShape)>,

    glow_opacity: AnimatedValue,
    glow_animation: SequentialAnimation,

    warned_unsynchronized: Cell<bool>,
}

impl ElementManipulationToolRenderer {
    pub fn new(style: ManipulationStyle, clock: Rc<dyn WallClock>, update_budget: DurationS) -> Self {
        let handle_shapes = ALL_HANDLES
            .iter()
            .copied()
            .filter(|h| *h != ElementManipulationToolHandle::None)
            .map(|h| (h, KeyedShape::new()))
            .collect();
        Self {
            style,
            clock,
            update_budget,
            element_renderer: ElementRenderer::new(ZIndex::MANIPULATED),
            elements: Vec::new(),
            enabled: true,
            outline: KeyedShape::new(),
            outline_glow: KeyedShape::new(),
            rotation_bar: KeyedShape::new(),
            handle_shapes,
            glow_opacity: AnimatedValue::new(0.0),
            glow_animation: SequentialAnimation::new(),
            warned_unsynchronized: Cell::new(false),
        }
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current glow opacity multiplier.
    pub fn glow_opacity(&self) -> f32 {
        self.glow_opacity.get()
    }

    /// Shape drawn for `handle`, if it has one.
    pub fn handle_shape(&self, handle: ElementManipulationToolHandle) -> Option<&Shape> {
        self.handle_shapes
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, s)| &s.shape)
    }

    pub fn outline(&self) -> &Shape {
        &self.outline.shape
    }

    /// True when any overlay mesh still needs uploading.
    pub fn needs_synchronize(&self) -> bool {
        self.shapes().any(|s| s.shape.is_dirty())
    }

    fn shapes(&self) -> impl Iterator<Item = &KeyedShape> {
        [&self.outline_glow, &self.outline, &self.rotation_bar]
            .into_iter()
            .chain(self.handle_shapes.iter().map(|(_, s)| s))
    }

    fn shapes_mut(&mut self) -> impl Iterator<Item = &mut KeyedShape> {
        [&mut self.outline_glow, &mut self.outline, &mut self.rotation_bar]
            .into_iter()
            .chain(self.handle_shapes.iter_mut().map(|(_, s)| s))
    }

    /// Lays every overlay shape out around `region`. Idempotent.
    fn set_outline_position(&mut self, cam: &Camera, region: RotRect) {
        let px = |v: f32| cam.convert_distance_screen_to_world(v);
        let style = &self.style;

        self.outline
            .shape
            .set_border(region, px(style.outline_width_px), style.outline_color);
        self.outline_glow
            .shape
            .set_border(region, px(style.glow_width_px), style.glow_color);

        let top = handle_position_with_offset(ElementManipulationToolHandle::Top, cam, region, style.rotation_offset_px);
        let knob = handle_position_with_offset(
            ElementManipulationToolHandle::Rotation,
            cam,
            region,
            style.rotation_offset_px,
        );
        self.rotation_bar
            .shape
            .set_line(top, knob, px(style.outline_width_px), style.outline_color);

        let size = px(style.handle_size_px);
        for (handle, keyed) in &mut self.handle_shapes {
            let pos = handle_position_with_offset(*handle, cam, region, style.rotation_offset_px);
            keyed
                .shape
                .set_fill(RotRect::new(pos, Vec2::new(size, size), region.rotation), style.handle_color);
        }
    }

    fn set_outline_visible(&mut self, visible: bool) {
        for s in self.shapes_mut() {
            s.shape.set_visible(visible);
        }
    }

    fn update_with_timer(
        &mut self,
        cam: &Camera,
        draw_time: FrameTimeS,
        _element_mbr: Rect,
        region: RotRect,
        transform: Transform,
        timer: &Timer,
    ) {
        self.glow_animation.update(draw_time);
        if !self.elements.is_empty() {
            self.set_outline_position(cam, region.transformed(&transform));
        }

        log::trace!("manipulation overlay update took {:.3} ms", timer.elapsed() * 1000.0);
        if timer.expired() {
            log::warn!(
                "manipulation overlay update over budget: {:.3} ms > {:.3} ms",
                timer.elapsed() * 1000.0,
                timer.budget() * 1000.0
            );
        }
    }
}

impl ManipulationToolRenderer for ElementManipulationToolRenderer {
    fn draw(&self, cam: &Camera, draw_time: FrameTimeS, transform: Transform, target: &mut DrawTarget<'_>) {
        if !self.enabled || self.elements.is_empty() {
            return;
        }

        for id in &self.elements {
            self.element_renderer
                .draw(*id, target.scene, cam, draw_time, transform, target.list);
        }

        let layers = [
            (&self.outline_glow, ZIndex::TOOL_GLOW, self.glow_opacity.get()),
            (&self.outline, ZIndex::TOOL_OUTLINE, 1.0),
            (&self.rotation_bar, ZIndex::TOOL_ROTATION_BAR, 1.0),
        ];
        let handles = self
            .handle_shapes
            .iter()
            .map(|(_, s)| (s, ZIndex::TOOL_HANDLES, 1.0));

        for (keyed, z, opacity) in layers.into_iter().chain(handles) {
            if !keyed.shape.is_visible() || keyed.shape.mesh().is_empty() {
                continue;
            }
            if keyed.shape.is_dirty() {
                if !self.warned_unsynchronized.replace(true) {
                    log::debug!("manipulation overlay drawn before synchronize; skipping stale shapes");
                }
                continue;
            }
            target.list.push(z, keyed.command(opacity));
        }
    }

    fn update(
        &mut self,
        cam: &Camera,
        draw_time: FrameTimeS,
        element_mbr: Rect,
        region: RotRect,
        transform: Transform,
    ) {
        let timer = Timer::new(self.clock.clone(), self.update_budget);
        self.update_with_timer(cam, draw_time, element_mbr, region, transform, &timer);
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.set_outline_visible(enabled);
    }

    fn synchronize(&mut self, resources: &mut dyn MeshStore) -> Result<()> {
        for s in self.shapes_mut() {
            s.synchronize(resources)?;
        }
        Ok(())
    }

    fn set_elements(&mut self, cam: &Camera, elements: &[ElementId], _element_mbr: Rect, region: RotRect) {
        self.elements = elements.to_vec();
        self.glow_animation.clear();
        if self.elements.is_empty() {
            self.glow_opacity.set(0.0);
            return;
        }

        self.set_outline_position(cam, region);
        self.glow_opacity.set(0.0);
        self.glow_animation.push(Box::new(self.glow_opacity.animate_to(
            0.0,
            1.0,
            self.style.glow_fade_in,
            Easing::SmoothStep,
        )));
    }

    fn release(&mut self, resources: &mut dyn MeshStore) {
        for s in self.shapes_mut() {
            s.release(resources);
        }
    }
}

impl std::fmt::Debug for ElementManipulationToolRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementManipulationToolRenderer")
            .field("elements", &self.elements)
            .field("enabled", &self.enabled)
            .field("glow_opacity", &self.glow_opacity.get())
            .finish()
    }
}

/// Manipulation overlay for a single element: just the element itself,
/// drawn with the in-progress transform.
#[derive(Debug, Default)]
pub struct SingleElementManipulationToolRenderer {
    id: Option<ElementId>,
    renderer: ElementRenderer,
}

impl SingleElementManipulationToolRenderer {
    pub fn new() -> Self {
        Self {
            id: None,
            renderer: ElementRenderer::new(ZIndex::MANIPULATED),
        }
    }

    pub fn element(&self) -> Option<ElementId> {
        self.id
    }
}

impl ManipulationToolRenderer for SingleElementManipulationToolRenderer {
    fn draw(&self, cam: &Camera, draw_time: FrameTimeS, transform: Transform, target: &mut DrawTarget<'_>) {
        if let Some(id) = self.id {
            self.renderer
                .draw(id, target.scene, cam, draw_time, transform, target.list);
        }
    }

    fn update(&mut self, _cam: &Camera, _draw_time: FrameTimeS, _mbr: Rect, _region: RotRect, _transform: Transform) {}

    fn enable(&mut self, _enabled: bool) {}

    fn synchronize(&mut self, _resources: &mut dyn MeshStore) -> Result<()> {
        Ok(())
    }

    fn set_elements(&mut self, _cam: &Camera, elements: &[ElementId], _mbr: Rect, _region: RotRect) {
        assert!(
            elements.len() <= 1,
            "single-element manipulation renderer got {} elements",
            elements.len()
        );
        self.id = elements.first().copied();
    }

    fn release(&mut self, _resources: &mut dyn MeshStore) {}
}
