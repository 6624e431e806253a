//! Engine session.
//!
//! Owns the scene, the mesh resources and the renderers, routes input to the
//! active tool, and runs the per-frame update/synchronize/draw pass.
//!
//! Frame contract:
//! - `dispatch_input` any number of times
//! - `frame` once: blocking-state poll, overlay update, mesh uploads, draw
//!   list rebuild, then sequence points and input-frame reset

mod replay;
mod tool;

pub use replay::{replay, ReplayStats};
pub use tool::{drag_transform, Tool, MIN_DRAG_SCALE};

use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use anyhow::Result;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::coords::{Transform, Viewport};
use crate::geometry::Mesh;
use crate::host::{
    BlockingState,
    DeferredCommand,
    EngineFlag,
    EngineListener,
    ListenerDispatch,
    LoggingEvent,
    ToolEvent,
};
use crate::input::{Flag, InputFrame, InputState, InputType, SInput};
use crate::realtime::manipulation::{
    handle_at,
    ElementManipulationToolHandle,
    ElementManipulationToolRenderer,
    ManipulationToolRenderer,
};
use crate::realtime::modifiers::{LineModifier, LineModifierKind};
use crate::realtime::StrokeBuilder;
use crate::render::{MeshBackend, MeshKey, MeshResources, MeshStore};
use crate::scene::{DrawCmd, DrawList, DrawTarget, ElementId, ElementRenderer, MeshCmd, SceneGraph, ZIndex};
use crate::time::{FrameClock, FrameTimeS, WallClock};

use tool::Drag;

/// Summary of one `Engine::frame` call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameStats {
    pub frame_index: u64,
    pub now: FrameTimeS,
    /// Commands recorded into the draw list.
    pub draw_items: usize,
    /// Strokes still in progress.
    pub live_strokes: usize,
}

/// A stroke being drawn by one contact.
#[derive(Debug)]
struct LiveStroke {
    builder: StrokeBuilder,
    key: MeshKey,
    dirty: bool,
}

/// Interactive drawing session over a mesh backend `B`.
pub struct Engine<B: MeshBackend> {
    config: EngineConfig,
    camera: Camera,
    frame_clock: FrameClock,

    input: InputState,
    input_frame: InputFrame,

    scene: SceneGraph,
    resources: MeshResources<B>,
    element_renderer: ElementRenderer,
    manipulation: Box<dyn ManipulationToolRenderer>,
    draw_list: DrawList,

    listeners: ListenerDispatch,
    blocking: BlockingState,
    was_blocked: bool,

    tool: Tool,
    flags: HashSet<EngineFlag>,

    /// Keyed by contact id; ordered so live strokes draw deterministically.
    strokes: BTreeMap<u32, LiveStroke>,
    /// Live-stroke meshes to free at the next synchronize.
    released_keys: Vec<MeshKey>,

    selection: Vec<ElementId>,
    drag: Option<Drag>,

    undo_stack: Vec<ElementId>,
    redo_stack: Vec<ElementId>,

    pending_sequence_points: Vec<i32>,
    camera_moving: bool,
    camera_input_this_frame: bool,
}

impl<B: MeshBackend> Engine<B> {
    pub fn new(config: EngineConfig, backend: B, screen: Viewport, ppi: f32, clock: Rc<dyn WallClock>) -> Self {
        log::info!(
            "engine created: screen {}x{} @ {} ppi",
            screen.width,
            screen.height,
            ppi
        );
        let manipulation = Box::new(ElementManipulationToolRenderer::new(
            config.manipulation.clone(),
            clock.clone(),
            config.update_budget,
        ));
        let mut camera = Camera::new(screen, ppi);
        camera.set_scale_limits(config.min_camera_scale, config.max_camera_scale);
        Self {
            camera,
            frame_clock: FrameClock::with_clamps(clock, config.frame_dt_min, config.frame_dt_max),
            input: InputState::default(),
            input_frame: InputFrame::default(),
            scene: SceneGraph::new(),
            resources: MeshResources::new(backend),
            element_renderer: ElementRenderer::default(),
            manipulation,
            draw_list: DrawList::new(),
            listeners: ListenerDispatch::new(),
            blocking: BlockingState::new(),
            was_blocked: false,
            tool: Tool::default(),
            flags: HashSet::new(),
            strokes: BTreeMap::new(),
            released_keys: Vec::new(),
            selection: Vec::new(),
            drag: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending_sequence_points: Vec::new(),
            camera_moving: false,
            camera_input_this_frame: false,
            config,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replaces the camera; the configured scale limits still apply.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.camera
            .set_scale_limits(self.config.min_camera_scale, self.config.max_camera_scale);
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn resources(&self) -> &MeshResources<B> {
        &self.resources
    }

    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    /// Downs, moves and ups accepted since the last `frame`.
    pub fn input_frame(&self) -> &InputFrame {
        &self.input_frame
    }

    /// Draw list recorded by the last `frame`.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn live_stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn is_camera_moving(&self) -> bool {
        self.camera_moving
    }

    // ── host wiring ───────────────────────────────────────────────────────

    pub fn add_listener(&mut self, listener: Rc<dyn EngineListener>) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&mut self, listener: &Rc<dyn EngineListener>) -> bool {
        self.listeners.remove(listener)
    }

    /// Handle for background work; blocking through it is picked up at the
    /// next frame boundary.
    pub fn blocking_state(&self) -> BlockingState {
        self.blocking.clone()
    }

    pub fn is_blocked(&self) -> bool {
        self.blocking.is_blocked()
    }

    /// Blocks or unblocks from the foreground. Notifies immediately; deferred
    /// commands still run at the next frame boundary.
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocking.set_blocked(blocked);
        self.observe_blocking();
    }

    /// Replaces the manipulation overlay, e.g. with a single-element one.
    pub fn set_manipulation_renderer(&mut self, renderer: Box<dyn ManipulationToolRenderer>) {
        let mut outgoing = std::mem::replace(&mut self.manipulation, renderer);
        outgoing.release(&mut self.resources);
        let selection = std::mem::take(&mut self.selection);
        self.apply_selection(selection);
    }

    pub fn flag(&self, flag: EngineFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn set_flag(&mut self, flag: EngineFlag, enabled: bool) {
        let changed = if enabled { self.flags.insert(flag) } else { self.flags.remove(&flag) };
        if changed {
            log::debug!("flag {flag:?} -> {enabled}");
            self.listeners.send(|l| l.flag_changed(flag, enabled));
        }
    }

    /// Reports `id` to listeners at the end of the next frame, after the
    /// input dispatched before it has been processed.
    pub fn add_sequence_point(&mut self, id: i32) {
        self.pending_sequence_points.push(id);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        log::debug!("tool {:?} -> {:?}", self.tool, tool);
        self.cancel_contacts();
        self.tool = tool;
        if tool == Tool::Line {
            self.select(&[]);
        }
    }

    // ── scene commands ────────────────────────────────────────────────────

    /// Adds a finished mesh as an undoable element. Ignored while blocked.
    pub fn add_element(&mut self, mesh: Mesh) -> Option<ElementId> {
        if self.is_blocked() {
            log::debug!("engine blocked; dropping element add");
            return None;
        }
        Some(self.commit_element(mesh))
    }

    /// Selects `ids` (unknown and duplicate ids are dropped). An empty slice
    /// clears the selection.
    pub fn select(&mut self, ids: &[ElementId]) {
        let mut selection = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.scene.contains(id) && !selection.contains(&id) {
                selection.push(id);
            }
        }
        if selection == self.selection {
            return;
        }
        self.apply_selection(selection);
        let event = ToolEvent::SelectionChanged { elements: ToolEvent::ids(&self.selection) };
        self.listeners.send(|l| l.tool_event(&event));
    }

    /// Hides the most recently added element. Deferred while blocked.
    pub fn undo(&mut self) -> bool {
        if self.is_blocked() {
            log::debug!("engine blocked; deferring undo");
            self.blocking.defer(DeferredCommand::Undo);
            return false;
        }
        self.apply_undo()
    }

    /// Re-shows the most recently undone element. Deferred while blocked.
    pub fn redo(&mut self) -> bool {
        if self.is_blocked() {
            log::debug!("engine blocked; deferring redo");
            self.blocking.defer(DeferredCommand::Redo);
            return false;
        }
        self.apply_redo()
    }

    // ── input ─────────────────────────────────────────────────────────────

    /// Feeds one input sample. Returns whether it was accepted.
    pub fn dispatch_input(&mut self, input: SInput) -> bool {
        if self.is_blocked() {
            log::debug!("engine blocked; dropping input id={} t={}", input.id, input.time_s);
            return false;
        }
        if !self.input.apply_input(&mut self.input_frame, input) {
            return false;
        }

        if input.flags.has(Flag::Cancel) {
            self.cancel_contacts();
            return true;
        }
        if input.input_type == InputType::Wheel || input.flags.has(Flag::Wheel) {
            self.handle_wheel(&input);
            return true;
        }
        if self.flag(EngineFlag::ReadOnly) {
            return true;
        }

        match self.tool {
            Tool::Line => self.handle_stroke_input(&input),
            Tool::Manipulate => self.handle_manipulate_input(&input),
        }
        true
    }

    fn handle_wheel(&mut self, input: &SInput) {
        if self.flag(EngineFlag::LockCamera) {
            return;
        }
        let d = input.wheel_delta;
        if input.flags.has(Flag::Control) {
            let factor = self.config.wheel_zoom_per_100px.powf(-d.y / 100.0);
            self.camera.zoom_about(input.screen_pos, factor);
        } else {
            self.camera.translate_screen(-d);
        }
        self.camera_input_this_frame = true;
        self.set_camera_moving(true);
    }

    fn handle_stroke_input(&mut self, input: &SInput) {
        if input.is_down() {
            if let Some(old) = self.strokes.remove(&input.id) {
                self.released_keys.push(old.key);
            }
            let kind = if self.flag(EngineFlag::Highlighter) {
                LineModifierKind::Highlighter
            } else {
                self.config.line_modifier
            };
            let radius = self.camera.convert_distance_screen_to_world(self.config.stroke_radius_px);
            let mut builder = StrokeBuilder::new(LineModifier::new(kind, self.config.brush_color), radius);
            builder.add_input(input, &self.camera);
            self.strokes.insert(
                input.id,
                LiveStroke { builder, key: self.resources.allocate_key(), dirty: true },
            );
            return;
        }

        if !input.in_contact() && !input.is_up() {
            return;
        }
        let Some(stroke) = self.strokes.get_mut(&input.id) else {
            return;
        };
        stroke.dirty |= stroke.builder.add_input(input, &self.camera);
        if input.is_up() {
            self.commit_stroke(input.id);
        }
    }

    fn commit_stroke(&mut self, contact: u32) {
        let Some(stroke) = self.strokes.remove(&contact) else {
            return;
        };
        self.released_keys.push(stroke.key);
        let points = stroke.builder.point_count();
        let Some(mesh) = stroke.builder.finish() else {
            return;
        };

        let id = self.commit_element(mesh);
        log::debug!("stroke {id} committed with {points} points");
        let tool_event = ToolEvent::StrokeCommitted { element: id.raw(), points };
        let logging_event = LoggingEvent::new("stroke_committed").with_element(id);
        self.listeners.send(|l| {
            l.tool_event(&tool_event);
            l.logging_event_fired(&logging_event);
        });
    }

    fn handle_manipulate_input(&mut self, input: &SInput) {
        let world = self.camera.convert_screen_to_world(input.screen_pos);

        if input.is_down() {
            if self.drag.is_some() {
                return;
            }
            if let Some(region) = self.scene.region_of(&self.selection) {
                let style = &self.config.manipulation;
                if let Some(handle) =
                    handle_at(&self.camera, region, input.screen_pos, style.hit_slop_px, style.rotation_offset_px)
                {
                    self.drag = Some(Drag::new(input.id, handle, world, region));
                    return;
                }
            }
            match self.scene.element_at(world) {
                Some(id) => {
                    self.select(&[id]);
                    if let Some(region) = self.scene.region_of(&self.selection) {
                        self.drag = Some(Drag::new(input.id, ElementManipulationToolHandle::None, world, region));
                    }
                }
                None => self.select(&[]),
            }
            return;
        }

        let Some(drag) = self.drag.as_mut().filter(|d| d.contact == input.id) else {
            return;
        };
        if input.in_contact() || input.is_up() {
            drag.update(world);
        }
        if input.is_up() {
            self.commit_drag();
        }
    }

    fn commit_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if drag.transform == Transform::IDENTITY {
            return;
        }
        for &id in &self.selection {
            self.scene.apply_transform(id, &drag.transform);
        }
        log::debug!("{:?} drag committed on {} elements", drag.handle, self.selection.len());

        let selection = std::mem::take(&mut self.selection);
        self.apply_selection(selection);
        let event = ToolEvent::ElementsTransformed { elements: ToolEvent::ids(&self.selection) };
        let logging_event = LoggingEvent::new("elements_transformed");
        self.listeners.send(|l| {
            l.tool_event(&event);
            l.logging_event_fired(&logging_event);
        });
    }

    /// Drops strokes and drags in progress.
    fn cancel_contacts(&mut self) {
        if !self.strokes.is_empty() {
            log::debug!("cancelling {} live strokes", self.strokes.len());
        }
        let keys = std::mem::take(&mut self.strokes).into_values().map(|s| s.key);
        self.released_keys.extend(keys);
        self.drag = None;
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Runs one frame: update, upload, draw. The result is in [`Engine::draw_list`].
    pub fn frame(&mut self) -> Result<FrameStats> {
        let time = self.frame_clock.tick();

        self.observe_blocking();
        if !self.is_blocked() {
            for cmd in self.blocking.drain() {
                match cmd {
                    DeferredCommand::Undo => self.apply_undo(),
                    DeferredCommand::Redo => self.apply_redo(),
                };
            }
        }

        if !self.camera_input_this_frame {
            self.set_camera_moving(false);
        }
        self.camera_input_this_frame = false;

        let transform = self.drag_transform();
        if let (Some(mbr), Some(region)) = (self.scene.mbr_of(&self.selection), self.scene.region_of(&self.selection)) {
            self.manipulation.update(&self.camera, time.now, mbr, region, transform);
        }

        self.synchronize()?;
        self.record(time.now, transform);

        for id in self.pending_sequence_points.drain(..) {
            self.listeners.send(|l| l.sequence_point_reached(id));
        }
        self.input_frame.clear();

        Ok(FrameStats {
            frame_index: time.frame_index,
            now: time.now,
            draw_items: self.draw_list.len(),
            live_strokes: self.strokes.len(),
        })
    }

    fn synchronize(&mut self) -> Result<()> {
        for key in self.released_keys.drain(..) {
            self.resources.release(key);
        }
        for stroke in self.strokes.values_mut().filter(|s| s.dirty) {
            if !stroke.builder.mesh().is_empty() {
                self.resources.upload(stroke.key, stroke.builder.mesh())?;
            }
            stroke.dirty = false;
        }
        self.scene.synchronize(&mut self.resources)?;
        self.manipulation.synchronize(&mut self.resources)
    }

    fn record(&mut self, now: FrameTimeS, transform: Transform) {
        self.draw_list.clear();

        for &id in self.scene.ids() {
            if self.selection.contains(&id) {
                continue;
            }
            self.element_renderer
                .draw(id, &self.scene, &self.camera, now, Transform::IDENTITY, &mut self.draw_list);
        }

        for stroke in self.strokes.values() {
            if !self.resources.is_synchronized(stroke.key) {
                continue;
            }
            let mesh = stroke.builder.mesh();
            self.draw_list.push(
                ZIndex::LIVE_STROKE,
                DrawCmd::Mesh(MeshCmd {
                    mesh: stroke.key,
                    transform: mesh.object_matrix,
                    opacity: 1.0,
                    shader: mesh.shader_type,
                }),
            );
        }

        let mut target = DrawTarget::new(&self.scene, &mut self.draw_list);
        self.manipulation.draw(&self.camera, now, transform, &mut target);
    }

    fn drag_transform(&self) -> Transform {
        self.drag.map_or(Transform::IDENTITY, |d| d.transform)
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn commit_element(&mut self, mesh: Mesh) -> ElementId {
        let id = self.scene.add(mesh);
        self.undo_stack.push(id);
        for dropped in std::mem::take(&mut self.redo_stack) {
            self.scene.remove(dropped);
        }
        self.notify_undo_redo();
        id
    }

    fn apply_undo(&mut self) -> bool {
        let Some(id) = self.undo_stack.pop() else {
            return false;
        };
        self.scene.set_visible(id, false);
        self.redo_stack.push(id);
        if self.selection.contains(&id) {
            let rest: Vec<ElementId> = self.selection.iter().copied().filter(|s| *s != id).collect();
            self.select(&rest);
        }
        log::debug!("undo {id}");
        let event = LoggingEvent::new("undo").with_element(id);
        self.listeners.send(|l| l.logging_event_fired(&event));
        self.notify_undo_redo();
        true
    }

    fn apply_redo(&mut self) -> bool {
        let Some(id) = self.redo_stack.pop() else {
            return false;
        };
        self.scene.set_visible(id, true);
        self.undo_stack.push(id);
        log::debug!("redo {id}");
        let event = LoggingEvent::new("redo").with_element(id);
        self.listeners.send(|l| l.logging_event_fired(&event));
        self.notify_undo_redo();
        true
    }

    fn notify_undo_redo(&self) {
        let (can_undo, can_redo) = (self.can_undo(), self.can_redo());
        self.listeners.send(|l| l.undo_redo_state_changed(can_undo, can_redo));
    }

    /// Hands the selection to the overlay renderer.
    fn apply_selection(&mut self, selection: Vec<ElementId>) {
        self.selection = selection;
        self.drag = None;
        let mbr = self.scene.mbr_of(&self.selection).unwrap_or_default();
        let region = self.scene.region_of(&self.selection).unwrap_or_default();
        self.manipulation
            .set_elements(&self.camera, &self.selection, mbr, region);
    }

    fn observe_blocking(&mut self) {
        let blocked = self.blocking.is_blocked();
        if blocked == self.was_blocked {
            return;
        }
        self.was_blocked = blocked;
        log::info!("engine {}", if blocked { "blocked" } else { "unblocked" });
        if blocked {
            self.cancel_contacts();
        }
        self.listeners.send(|l| l.blocking_state_changed(blocked));
    }

    fn set_camera_moving(&mut self, moving: bool) {
        if moving == self.camera_moving {
            return;
        }
        self.camera_moving = moving;
        self.listeners.send(|l| l.camera_movement_state_changed(moving));
    }
}

impl<B: MeshBackend> std::fmt::Debug for Engine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("camera", &self.camera)
            .field("elements", &self.scene.len())
            .field("tool", &self.tool)
            .field("selection", &self.selection)
            .field("live_strokes", &self.strokes.len())
            .field("blocked", &self.was_blocked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RecordedEvent, RecordingListener};
    use crate::input::synth;
    use crate::realtime::manipulation::SingleElementManipulationToolRenderer;
    use crate::render::MemoryMeshBackend;
    use crate::coords::Vec2;
    use crate::time::FakeClock;

    fn screen_center(camera: &Camera) -> Vec2 {
        camera.screen().center()
    }

    fn wheel(engine: &mut Engine<MemoryMeshBackend>, pos: Vec2, dy: f32, t: f64, modifiers: u32) {
        for input in synth::create_scroll_wheel_event(pos, 0.0, dy, t, modifiers) {
            engine.dispatch_input(input);
        }
    }

    struct Harness {
        clock: Rc<FakeClock>,
        engine: Engine<MemoryMeshBackend>,
        listener: Rc<RecordingListener>,
    }

    fn harness() -> Harness {
        let clock = Rc::new(FakeClock::new(0.0));
        let mut engine = Engine::new(
            EngineConfig::default(),
            MemoryMeshBackend::new(),
            Viewport::new(400.0, 400.0),
            96.0,
            clock.clone(),
        );
        let listener = Rc::new(RecordingListener::new());
        engine.add_listener(listener.clone());
        Harness { clock, engine, listener }
    }

    fn draw_line(h: &mut Harness, from: Vec2, to: Vec2) {
        for input in synth::create_exact_line(from, to, 3, h.clock.now(), h.clock.now() + 0.1) {
            h.engine.dispatch_input(input);
        }
        h.clock.advance(0.2);
        h.engine.frame().unwrap();
    }

    // ── strokes ───────────────────────────────────────────────────────────

    #[test]
    fn line_commits_one_element() {
        let mut h = harness();
        draw_line(&mut h, Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));
        assert_eq!(h.engine.scene().len(), 1);
        assert_eq!(h.engine.live_stroke_count(), 0);
        assert_eq!(h.engine.draw_list().len(), 1);
        assert!(h.engine.can_undo());
        assert!(matches!(
            h.listener.tool_events().as_slice(),
            [ToolEvent::StrokeCommitted { points: 5, .. }]
        ));
    }

    #[test]
    fn live_stroke_draws_before_commit() {
        let mut h = harness();
        let line = synth::create_exact_line(Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0), 3, 0.0, 0.1);
        for input in &line[..3] {
            h.engine.dispatch_input(*input);
        }
        let stats = h.engine.frame().unwrap();
        assert_eq!(stats.live_strokes, 1);
        assert_eq!(h.engine.draw_list().items()[0].key.z, ZIndex::LIVE_STROKE);
        assert!(h.engine.scene().is_empty());
    }

    #[test]
    fn two_contacts_draw_two_strokes() {
        let mut h = harness();
        let inputs = synth::create_exact_multi_touch_lines(
            Vec2::new(10.0, 10.0),
            Vec2::new(100.0, 10.0),
            Vec2::new(10.0, 200.0),
            Vec2::new(100.0, 200.0),
            0.0,
            0.1,
            0.0,
            0.1,
            2,
            2,
        );
        for input in inputs {
            h.engine.dispatch_input(input);
        }
        h.engine.frame().unwrap();
        assert_eq!(h.engine.scene().len(), 2);
    }

    #[test]
    fn cancel_drops_live_strokes() {
        let mut h = harness();
        let line = synth::create_exact_line(Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0), 3, 0.0, 0.1);
        h.engine.dispatch_input(line[0]);
        h.engine.dispatch_input(line[1]);
        let mut cancel = line[2];
        cancel.flags.set(Flag::Cancel, true);
        h.engine.dispatch_input(cancel);
        h.engine.frame().unwrap();
        assert_eq!(h.engine.live_stroke_count(), 0);
        assert!(h.engine.scene().is_empty());
        assert!(h.engine.resources().is_empty());
    }

    #[test]
    fn read_only_flag_drops_strokes() {
        let mut h = harness();
        h.engine.set_flag(EngineFlag::ReadOnly, true);
        h.engine.set_flag(EngineFlag::ReadOnly, true);
        draw_line(&mut h, Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));
        assert!(h.engine.scene().is_empty());
        let flags = h.listener.filter_map(|e| match e {
            RecordedEvent::Flag { flag, enabled } => Some((*flag, *enabled)),
            _ => None,
        });
        assert_eq!(flags, vec![(EngineFlag::ReadOnly, true)]);
    }

    // ── undo / redo ───────────────────────────────────────────────────────

    #[test]
    fn undo_hides_and_redo_restores() {
        let mut h = harness();
        draw_line(&mut h, Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));
        assert!(h.engine.undo());
        h.engine.frame().unwrap();
        assert!(h.engine.draw_list().is_empty());
        assert!(h.engine.can_redo());

        assert!(h.engine.redo());
        h.engine.frame().unwrap();
        assert_eq!(h.engine.draw_list().len(), 1);
        assert!(!h.engine.redo());
    }

    #[test]
    fn new_stroke_discards_redo_history() {
        let mut h = harness();
        draw_line(&mut h, Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));
        h.engine.undo();
        draw_line(&mut h, Vec2::new(10.0, 200.0), Vec2::new(100.0, 200.0));
        assert!(!h.engine.can_redo());
        assert_eq!(h.engine.scene().len(), 1);
    }

    // ── blocking ──────────────────────────────────────────────────────────

    #[test]
    fn blocked_engine_drops_input_and_defers_undo() {
        let mut h = harness();
        draw_line(&mut h, Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));

        let worker = h.engine.blocking_state();
        worker.set_blocked(true);
        h.engine.frame().unwrap();
        assert!(!h.engine.undo());
        draw_line(&mut h, Vec2::new(10.0, 200.0), Vec2::new(100.0, 200.0));
        assert_eq!(h.engine.scene().visible_count(), 1);

        worker.set_blocked(false);
        h.engine.frame().unwrap();
        assert_eq!(h.engine.scene().visible_count(), 0);
        assert_eq!(h.listener.blocking_changes(), vec![true, false]);
    }

    // ── camera ────────────────────────────────────────────────────────────

    #[test]
    fn wheel_pans_and_control_wheel_zooms() {
        let mut h = harness();
        let center = screen_center(h.engine.camera());
        let before = h.engine.camera().convert_screen_to_world(center);

        wheel(&mut h.engine, center, 100.0, 0.0, 0);
        let after = h.engine.camera().convert_screen_to_world(center);
        assert!((after - before).length() > 1.0);

        let zoom = Flag::Control.bit();
        wheel(&mut h.engine, center, -100.0, 0.1, zoom);
        assert!((h.engine.camera().scale() - 1.25).abs() < 1e-4);
    }

    #[test]
    fn control_wheel_zoom_out_stays_within_scale_limits() {
        let mut h = harness();
        let center = screen_center(h.engine.camera());
        let zoom = Flag::Control.bit();
        for i in 0..10 {
            wheel(&mut h.engine, center, 10_000.0, i as f64 * 0.01, zoom);
        }
        let cam = *h.engine.camera();
        assert!(cam.scale() > 0.0);
        assert_eq!(cam.scale(), h.engine.config().min_camera_scale);
        assert!(cam.convert_screen_to_world(center).is_finite());

        h.clock.advance(1.0);
        draw_line(&mut h, Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));
        assert_eq!(h.engine.scene().len(), 1);
        let mbr = h.engine.scene().get(h.engine.scene().ids()[0]).unwrap().mbr();
        assert!(mbr.origin.is_finite() && mbr.size.is_finite());
    }

    #[test]
    fn set_camera_applies_configured_scale_limits() {
        let mut h = harness();
        let mut cam = *h.engine.camera();
        cam.set_scale_limits(1e-6, 1e6);
        cam.zoom_about(Vec2::zero(), 1e-5);
        h.engine.set_camera(cam);
        let config = h.engine.config();
        assert_eq!(h.engine.camera().scale_limits(), (config.min_camera_scale, config.max_camera_scale));
        assert_eq!(h.engine.camera().scale(), h.engine.config().min_camera_scale);
    }

    #[test]
    fn camera_movement_state_settles_after_a_quiet_frame() {
        let mut h = harness();
        let center = screen_center(h.engine.camera());
        wheel(&mut h.engine, center, 10.0, 0.0, 0);
        assert!(h.engine.is_camera_moving());
        h.engine.frame().unwrap();
        assert!(h.engine.is_camera_moving());
        h.engine.frame().unwrap();
        assert!(!h.engine.is_camera_moving());
        let moving = h.listener.filter_map(|e| match e {
            RecordedEvent::CameraMoving(m) => Some(*m),
            _ => None,
        });
        assert_eq!(moving, vec![true, false]);
    }

    #[test]
    fn lock_camera_ignores_wheel() {
        let mut h = harness();
        h.engine.set_flag(EngineFlag::LockCamera, true);
        let cam = *h.engine.camera();
        let center = screen_center(&cam);
        wheel(&mut h.engine, center, 10.0, 0.0, 0);
        assert_eq!(*h.engine.camera(), cam);
    }

    // ── manipulation ──────────────────────────────────────────────────────

    #[test]
    fn tap_selects_and_drag_moves() {
        let mut h = harness();
        draw_line(&mut h, Vec2::new(100.0, 200.0), Vec2::new(300.0, 200.0));
        let id = h.engine.scene().ids()[0];
        let before = h.engine.scene().get(id).unwrap().mbr();

        h.engine.set_tool(Tool::Manipulate);
        let drag = synth::create_exact_line(Vec2::new(200.0, 200.0), Vec2::new(200.0, 150.0), 2, 1.0, 1.1);
        for input in drag {
            h.engine.dispatch_input(input);
        }
        h.engine.frame().unwrap();

        assert_eq!(h.engine.selection(), &[id]);
        let after = h.engine.scene().get(id).unwrap().mbr();
        // 50 px up on screen is +50 world units.
        assert!((after.center().y - before.center().y - 50.0).abs() < 1e-3);
        assert!(h
            .listener
            .tool_events()
            .iter()
            .any(|e| matches!(e, ToolEvent::ElementsTransformed { .. })));
    }

    #[test]
    fn selection_draws_overlay_and_tap_on_empty_clears() {
        let mut h = harness();
        draw_line(&mut h, Vec2::new(100.0, 200.0), Vec2::new(300.0, 200.0));
        h.engine.set_tool(Tool::Manipulate);
        for input in synth::create_tap(Vec2::new(200.0, 200.0), 1.0) {
            h.engine.dispatch_input(input);
        }
        h.engine.frame().unwrap();
        assert_eq!(h.engine.selection().len(), 1);
        assert!(h.engine.draw_list().len() > 1);

        for input in synth::create_tap(Vec2::new(20.0, 380.0), 2.0) {
            h.engine.dispatch_input(input);
        }
        h.engine.frame().unwrap();
        assert!(h.engine.selection().is_empty());
        assert_eq!(h.engine.draw_list().len(), 1);
    }

    #[test]
    fn swapping_overlay_renderer_frees_its_meshes() {
        let mut h = harness();
        draw_line(&mut h, Vec2::new(100.0, 200.0), Vec2::new(300.0, 200.0));
        let id = h.engine.scene().ids()[0];
        h.engine.select(&[id]);
        h.engine.frame().unwrap();
        // element + 12 overlay shapes
        assert_eq!(h.engine.resources().len(), 13);

        h.engine
            .set_manipulation_renderer(Box::new(SingleElementManipulationToolRenderer::new()));
        h.engine.select(&[]);
        h.engine.frame().unwrap();
        assert_eq!(h.engine.resources().len(), h.engine.scene().len());
    }

    // ── input frame ───────────────────────────────────────────────────────

    #[test]
    fn input_frame_collects_until_next_frame() {
        let mut h = harness();
        let line = synth::create_exact_line(Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0), 1, 0.0, 0.1);
        for input in &line[..2] {
            h.engine.dispatch_input(*input);
        }
        assert!(h.engine.input_frame().downs.contains(&line[0].id));
        assert!(!h.engine.input_frame().is_empty());
        h.engine.frame().unwrap();
        assert!(h.engine.input_frame().is_empty());
    }

    #[test]
    fn sequence_points_fire_at_frame_boundary() {
        let mut h = harness();
        h.engine.add_sequence_point(4);
        assert!(h.listener.sequence_points().is_empty());
        h.engine.frame().unwrap();
        assert_eq!(h.listener.sequence_points(), vec![4]);
    }
}
