use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::scene::ElementId;

/// Tool activity reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolEvent {
    /// A stroke was committed to the scene.
    StrokeCommitted { element: u32, points: usize },
    /// The selection changed; empty when cleared.
    SelectionChanged { elements: Vec<u32> },
    /// A manipulation drag was committed.
    ElementsTransformed { elements: Vec<u32> },
}

impl ToolEvent {
    pub(crate) fn ids(ids: &[ElementId]) -> Vec<u32> {
        ids.iter().map(|id| id.raw()).collect()
    }
}

/// Engine switches a host can flip and observe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineFlag {
    /// Strokes and manipulation are ignored; camera input still works.
    ReadOnly,
    /// Pan/zoom input is ignored.
    LockCamera,
    /// New strokes use the highlighter instead of the configured brush.
    Highlighter,
}

/// Usage event, fired for significant user actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingEvent {
    pub name: String,
    pub element: Option<u32>,
}

impl LoggingEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), element: None }
    }

    pub fn with_element(mut self, id: ElementId) -> Self {
        self.element = Some(id.raw());
        self
    }
}

/// Host callbacks. Every method has an empty default body, so hosts only
/// implement what they care about.
///
/// Callbacks take `&self`; listeners that record state use interior
/// mutability.
pub trait EngineListener {
    fn image_export_complete(&self, width_px: u32, height_px: u32, img_bytes: &[u8], fingerprint: u64) {
        let _ = (width_px, height_px, img_bytes, fingerprint);
    }

    fn pdf_save_complete(&self, pdf_bytes: &[u8]) {
        let _ = pdf_bytes;
    }

    fn tool_event(&self, event: &ToolEvent) {
        let _ = event;
    }

    fn sequence_point_reached(&self, id: i32) {
        let _ = id;
    }

    fn undo_redo_state_changed(&self, can_undo: bool, can_redo: bool) {
        let _ = (can_undo, can_redo);
    }

    fn flag_changed(&self, flag: EngineFlag, enabled: bool) {
        let _ = (flag, enabled);
    }

    fn logging_event_fired(&self, event: &LoggingEvent) {
        let _ = event;
    }

    /// Fired when the camera starts or stops moving (pan/zoom).
    fn camera_movement_state_changed(&self, is_moving: bool) {
        let _ = is_moving;
    }

    /// Fired when background work starts or stops blocking scene changes.
    fn blocking_state_changed(&self, is_blocked: bool) {
        let _ = is_blocked;
    }
}

/// Fans events out to registered listeners in registration order.
#[derive(Default, Clone)]
pub struct ListenerDispatch {
    listeners: Vec<Rc<dyn EngineListener>>,
}

impl ListenerDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Rc<dyn EngineListener>) {
        self.listeners.push(listener);
    }

    /// Unregisters `listener` (compared by pointer). Returns whether it was
    /// registered.
    pub fn remove(&mut self, listener: &Rc<dyn EngineListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Rc::ptr_eq(l, listener));
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Calls `f` on every listener.
    pub fn send(&self, f: impl Fn(&dyn EngineListener)) {
        for l in &self.listeners {
            f(l.as_ref());
        }
    }
}

impl std::fmt::Debug for ListenerDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerDispatch")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// FNV-1a 64-bit hash of an exported pixel buffer.
pub fn fingerprint(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(PRIME))
}

/// Everything a [`RecordingListener`] saw, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    ImageExport { width_px: u32, height_px: u32, fingerprint: u64 },
    PdfSave { len: usize },
    Tool(ToolEvent),
    SequencePoint(i32),
    UndoRedo { can_undo: bool, can_redo: bool },
    Flag { flag: EngineFlag, enabled: bool },
    Logging(LoggingEvent),
    CameraMoving(bool),
    Blocking(bool),
}

/// Listener that records every event; for tests and the replay tool.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: RefCell<Vec<RecordedEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Events for which `f` returns `Some`, mapped.
    pub fn filter_map<T>(&self, f: impl FnMut(&RecordedEvent) -> Option<T>) -> Vec<T> {
        self.events.borrow().iter().filter_map(f).collect()
    }

    pub fn blocking_changes(&self) -> Vec<bool> {
        self.filter_map(|e| match e {
            RecordedEvent::Blocking(b) => Some(*b),
            _ => None,
        })
    }

    pub fn sequence_points(&self) -> Vec<i32> {
        self.filter_map(|e| match e {
            RecordedEvent::SequencePoint(id) => Some(*id),
            _ => None,
        })
    }

    pub fn tool_events(&self) -> Vec<ToolEvent> {
        self.filter_map(|e| match e {
            RecordedEvent::Tool(t) => Some(t.clone()),
            _ => None,
        })
    }

    fn record(&self, e: RecordedEvent) {
        self.events.borrow_mut().push(e);
    }
}

impl EngineListener for RecordingListener {
    fn image_export_complete(&self, width_px: u32, height_px: u32, _img_bytes: &[u8], fingerprint: u64) {
        self.record(RecordedEvent::ImageExport { width_px, height_px, fingerprint });
    }

    fn pdf_save_complete(&self, pdf_bytes: &[u8]) {
        self.record(RecordedEvent::PdfSave { len: pdf_bytes.len() });
    }

    fn tool_event(&self, event: &ToolEvent) {
        self.record(RecordedEvent::Tool(event.clone()));
    }

    fn sequence_point_reached(&self, id: i32) {
        self.record(RecordedEvent::SequencePoint(id));
    }

    fn undo_redo_state_changed(&self, can_undo: bool, can_redo: bool) {
        self.record(RecordedEvent::UndoRedo { can_undo, can_redo });
    }

    fn flag_changed(&self, flag: EngineFlag, enabled: bool) {
        self.record(RecordedEvent::Flag { flag, enabled });
    }

    fn logging_event_fired(&self, event: &LoggingEvent) {
        self.record(RecordedEvent::Logging(event.clone()));
    }

    fn camera_movement_state_changed(&self, is_moving: bool) {
        self.record(RecordedEvent::CameraMoving(is_moving));
    }

    fn blocking_state_changed(&self, is_blocked: bool) {
        self.record(RecordedEvent::Blocking(is_blocked));
    }
}
